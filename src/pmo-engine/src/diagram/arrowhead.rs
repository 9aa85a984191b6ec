// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::diagram::common::{Point, escape_xml_attr, format_number};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowheadType {
    Flow,
    Exception,
}

/// Renders an arrowhead whose tip sits at `tip`, pointing along `angle`
/// degrees (0 points right, 90 points down).
pub fn render_arrowhead(tip: Point, angle: f64, size: f64, typ: ArrowheadType) -> String {
    let r = size;
    let (x, y) = (tip.x, tip.y);
    let path = format!(
        "M{},{}L{},{}L{},{}z",
        format_number(x),
        format_number(y),
        format_number(x - r * 1.5),
        format_number(y + r / 1.5),
        format_number(x - r * 1.5),
        format_number(y - r / 1.5)
    );

    let path_class = match typ {
        ArrowheadType::Flow => "pmo-arrowhead",
        ArrowheadType::Exception => "pmo-arrowhead pmo-arrowhead-exception",
    };

    let transform = format!(
        "rotate({},{},{})",
        format_number(angle),
        format_number(x),
        format_number(y)
    );

    format!(
        "<path d=\"{}\" class=\"{}\" transform=\"{}\"></path>",
        escape_xml_attr(&path),
        path_class,
        escape_xml_attr(&transform)
    )
}
