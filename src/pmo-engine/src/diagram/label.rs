// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::diagram::common::{
    Rect, escape_xml_attr, escape_xml_text, format_number, merge_bounds,
};
use crate::diagram::constants::{CHAR_WIDTH, LABEL_PADDING, LINE_SPACING};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelSide {
    Bottom,
    Right,
    Center,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TextAnchor {
    Start,
    Middle,
}

impl TextAnchor {
    fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
        }
    }
}

pub struct LabelProps {
    pub cx: f64,
    pub cy: f64,
    pub side: LabelSide,
    /// Half-extents of the shape the label hangs off.
    pub rw: f64,
    pub rh: f64,
    pub text: String,
    pub class: &'static str,
}

impl LabelProps {
    pub fn new(cx: f64, cy: f64, side: LabelSide, text: String) -> Self {
        LabelProps {
            cx,
            cy,
            side,
            rw: 0.0,
            rh: 0.0,
            text,
            class: "pmo-label",
        }
    }

    pub fn with_radii(mut self, rw: f64, rh: f64) -> Self {
        self.rw = rw;
        self.rh = rh;
        self
    }

    pub fn with_class(mut self, class: &'static str) -> Self {
        self.class = class;
        self
    }

    fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }
}

struct LabelLayout {
    x: f64,
    y: f64,
    align: TextAnchor,
}

fn block_height(lines: usize) -> f64 {
    12.0 + (lines as f64 - 1.0) * LINE_SPACING
}

fn label_layout(props: &LabelProps) -> LabelLayout {
    let lines = props.lines().len();
    let (cx, cy) = (props.cx, props.cy);

    match props.side {
        LabelSide::Bottom => LabelLayout {
            x: cx,
            y: cy + props.rh + LABEL_PADDING,
            align: TextAnchor::Middle,
        },
        LabelSide::Right => LabelLayout {
            x: cx + props.rw + LABEL_PADDING,
            y: cy - block_height(lines) / 2.0 - 3.0,
            align: TextAnchor::Start,
        },
        LabelSide::Center => LabelLayout {
            x: cx,
            y: cy - block_height(lines) / 2.0 - 3.0,
            align: TextAnchor::Middle,
        },
    }
}

pub fn label_bounds(props: &LabelProps) -> Rect {
    let lines = props.lines();
    let max_chars = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = max_chars as f64 * CHAR_WIDTH + 10.0;
    let height = LINE_SPACING * lines.len() as f64;
    let layout = label_layout(props);

    let top = layout.y.round();
    let left = match layout.align {
        TextAnchor::Start => layout.x,
        TextAnchor::Middle => layout.x - width / 2.0,
    };

    Rect {
        top,
        left,
        right: left + width,
        bottom: top + height,
    }
}

pub fn render_label(props: &LabelProps) -> String {
    let layout = label_layout(props);
    let lines = props.lines();

    let mut svg = String::new();
    svg.push_str(&format!(
        "<text class=\"{}\" x=\"{}\" y=\"{}\" style=\"text-anchor:{}\">",
        props.class,
        format_number(layout.x),
        format_number(layout.y),
        layout.align.as_str()
    ));

    for (i, line) in lines.iter().enumerate() {
        let dy = if i == 0 {
            "1em".to_string()
        } else {
            format!("{}px", LINE_SPACING as i64)
        };

        svg.push_str(&format!(
            "<tspan x=\"{}\" dy=\"{}\">",
            format_number(layout.x),
            escape_xml_attr(&dy)
        ));
        svg.push_str(&escape_xml_text(line));
        svg.push_str("</tspan>");
    }

    svg.push_str("</text>");
    svg
}

/// Shape bounds merged with the bounds of its label.
pub fn element_with_label_bounds(element_bounds: Rect, label_props: &LabelProps) -> Rect {
    merge_bounds(element_bounds, label_bounds(label_props))
}

/// Breaks `text` on spaces so no line exceeds `max_chars`, except single
/// words longer than that.
pub fn wrap_words(text: &str, max_chars: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}
