// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::diagram::common::{Rect, escape_xml_attr, escape_xml_text, format_number};
use crate::diagram::constants::*;
use crate::diagram::label::{
    LabelProps, LabelSide, element_with_label_bounds, render_label, wrap_words,
};
use crate::diagram::layout::PlacedNode;
use crate::lookup::PhaseRecord;
use crate::pages::phase_url;

pub fn gradient_ref(record: &PhaseRecord) -> String {
    format!("url(#pmo-grad-{})", record.gradient.token())
}

fn name_label(node: &PlacedNode, record: &PhaseRecord, wrap: usize) -> LabelProps {
    let r = node.radius();
    LabelProps::new(
        node.center.x,
        node.center.y,
        LabelSide::Bottom,
        wrap_words(&record.name, wrap),
    )
    .with_radii(r, r)
}

fn circle(node: &PlacedNode, fill: &str) -> String {
    format!(
        "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"></circle>",
        format_number(node.center.x),
        format_number(node.center.y),
        format_number(node.radius()),
        escape_xml_attr(fill)
    )
}

// --- Phase ---

/// A gradient-filled circle with the short label inside and the full name
/// below, linked to the phase's detail page.
pub fn render_phase(node: &PlacedNode, record: &PhaseRecord, wrap: usize) -> String {
    let class = if record.placeholder {
        "pmo-phase pmo-placeholder"
    } else {
        "pmo-phase"
    };
    let inner = LabelProps::new(
        node.center.x,
        node.center.y,
        LabelSide::Center,
        record.short_label.clone(),
    )
    .with_class("pmo-node-label");

    let mut svg = String::new();
    svg.push_str(&format!(
        "<g class=\"{}\" id=\"{}\" data-phase=\"{}\">",
        class,
        escape_xml_attr(&node.key),
        escape_xml_attr(&record.id)
    ));
    svg.push_str(&format!(
        "<a href=\"{}\">",
        escape_xml_attr(&phase_url(&record.id))
    ));
    svg.push_str(&circle(node, &gradient_ref(record)));
    svg.push_str(&render_label(&inner));
    svg.push_str(&render_label(&name_label(node, record, wrap)));
    svg.push_str("</a></g>");
    svg
}

pub fn phase_bounds(node: &PlacedNode, record: &PhaseRecord, wrap: usize) -> Rect {
    element_with_label_bounds(node.shape_bounds(), &name_label(node, record, wrap))
}

// --- Exception ---

pub fn render_exception(node: &PlacedNode, record: &PhaseRecord, wrap: usize) -> String {
    let inner = LabelProps::new(
        node.center.x,
        node.center.y,
        LabelSide::Center,
        record.id.clone(),
    )
    .with_class("pmo-node-label");

    let mut svg = String::new();
    svg.push_str(&format!(
        "<g class=\"pmo-exception\" id=\"{}\" data-phase=\"{}\">",
        escape_xml_attr(&node.key),
        escape_xml_attr(&record.id)
    ));
    svg.push_str(&circle(node, &gradient_ref(record)));
    svg.push_str(&render_label(&inner));
    svg.push_str(&render_label(&name_label(node, record, wrap)));
    svg.push_str("</g>");
    svg
}

pub fn exception_bounds(node: &PlacedNode, record: &PhaseRecord, wrap: usize) -> Rect {
    phase_bounds(node, record, wrap)
}

// --- Decision ---

fn decision_label(node: &PlacedNode) -> LabelProps {
    let r = node.radius();
    LabelProps::new(
        node.center.x,
        node.center.y,
        LabelSide::Bottom,
        node.label.clone().unwrap_or_default(),
    )
    .with_radii(r, r)
}

pub fn render_decision(node: &PlacedNode) -> String {
    let (cx, cy, r) = (node.center.x, node.center.y, node.radius());
    let points = format!(
        "{},{} {},{} {},{} {},{}",
        format_number(cx),
        format_number(cy - r),
        format_number(cx + r),
        format_number(cy),
        format_number(cx),
        format_number(cy + r),
        format_number(cx - r),
        format_number(cy)
    );

    let mut svg = String::new();
    svg.push_str(&format!(
        "<g class=\"pmo-decision\" id=\"{}\">",
        escape_xml_attr(&node.key)
    ));
    svg.push_str(&format!("<polygon points=\"{points}\"></polygon>"));
    svg.push_str(&format!(
        "<text class=\"pmo-node-label\" x=\"{}\" y=\"{}\" style=\"text-anchor:middle\">?</text>",
        format_number(cx),
        format_number(cy + 5.0)
    ));
    if node.label.is_some() {
        svg.push_str(&render_label(&decision_label(node)));
    }
    svg.push_str("</g>");
    svg
}

pub fn decision_bounds(node: &PlacedNode) -> Rect {
    if node.label.is_some() {
        element_with_label_bounds(node.shape_bounds(), &decision_label(node))
    } else {
        node.shape_bounds()
    }
}

// --- Lane ---

pub fn render_lane(track_id: &str, title: &str, bounds: Rect) -> String {
    let title_props = LabelProps::new(
        bounds.left + LANE_PADDING / 2.0,
        bounds.top + LANE_TITLE_HEIGHT / 2.0 + 4.0,
        LabelSide::Right,
        title.to_string(),
    )
    .with_class("pmo-lane-title");

    let mut svg = String::new();
    svg.push_str(&format!(
        "<g class=\"pmo-lane\" data-track=\"{}\">",
        escape_xml_attr(track_id)
    ));
    svg.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" ry=\"{}\"></rect>",
        format_number(bounds.left),
        format_number(bounds.top),
        format_number(bounds.width()),
        format_number(bounds.height()),
        format_number(LANE_CORNER_RADIUS),
        format_number(LANE_CORNER_RADIUS)
    ));
    svg.push_str(&render_label(&title_props));
    svg.push_str("</g>");
    svg
}

/// Legend swatch row used by the HTML shell.
pub fn render_legend_entry(x: f64, y: f64, fill: &str, text: &str) -> String {
    format!(
        "<g class=\"pmo-legend-entry\"><circle cx=\"{}\" cy=\"{}\" r=\"8\" fill=\"{}\"></circle><text x=\"{}\" y=\"{}\">{}</text></g>",
        format_number(x),
        format_number(y),
        escape_xml_attr(fill),
        format_number(x + 14.0),
        format_number(y + 4.0),
        escape_xml_text(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::diagram::common::Point;
    use crate::diagram::layout::NodeKind;
    use crate::lookup::lookup_phase;

    fn node(key: &str, kind: NodeKind, x: f64, y: f64) -> PlacedNode {
        PlacedNode {
            key: key.to_string(),
            kind,
            phase_id: Some(key.to_string()),
            label: None,
            center: Point::new(x, y),
        }
    }

    #[test]
    fn test_render_phase() {
        let record = lookup_phase(Catalog::builtin(), "2E");
        let svg = render_phase(&node("enterprise:2E", NodeKind::Phase, 100.0, 100.0), &record, 12);
        assert!(svg.starts_with("<g class=\"pmo-phase\" id=\"enterprise:2E\" data-phase=\"2E\">"));
        assert!(svg.contains("<a href=\"phase-2E.html\">"));
        assert!(svg.contains("<circle cx=\"100\" cy=\"100\" r=\"34\""));
        assert!(svg.contains(&format!("fill=\"url(#pmo-grad-{})\"", record.gradient.token())));
        assert!(svg.contains(">Plan</tspan>"));
        assert!(svg.contains(">Enterprise</tspan>"));
        assert!(svg.ends_with("</a></g>"));
    }

    #[test]
    fn test_render_placeholder_phase() {
        let record = lookup_phase(Catalog::builtin(), "ZZ");
        let svg = render_phase(&node("ZZ", NodeKind::Phase, 0.0, 0.0), &record, 12);
        assert!(svg.contains("pmo-placeholder"));
        assert!(svg.contains("url(#pmo-grad-neutral)"));
        assert!(svg.contains(">Phase ZZ</tspan>"));
    }

    #[test]
    fn test_phase_bounds_include_name() {
        let record = lookup_phase(Catalog::builtin(), "3E");
        let n = node("3E", NodeKind::Phase, 100.0, 100.0);
        let bounds = phase_bounds(&n, &record, 12);
        assert!(bounds.bottom > 100.0 + PHASE_RADIUS);
        assert!(bounds.top <= 100.0 - PHASE_RADIUS);
    }

    #[test]
    fn test_render_exception() {
        let record = lookup_phase(Catalog::builtin(), "D");
        let svg = render_exception(&node("exception:D", NodeKind::Exception, 50.0, 50.0), &record, 12);
        assert!(svg.contains("class=\"pmo-exception\""));
        assert!(svg.contains("r=\"22\""));
        assert!(svg.contains(">Dropped</tspan>"));
    }

    #[test]
    fn test_render_decision() {
        let mut n = node("decision", NodeKind::Decision, 200.0, 100.0);
        n.label = Some("Criteria\nMatrix".to_string());
        let svg = render_decision(&n);
        assert!(svg.contains("<polygon points=\"200,70 230,100 200,130 170,100\">"));
        assert!(svg.contains(">Matrix</tspan>"));
        assert!(decision_bounds(&n).bottom > 130.0);

        n.label = None;
        assert_eq!(decision_bounds(&n).bottom, 130.0);
    }

    #[test]
    fn test_render_lane() {
        let bounds = Rect {
            top: 10.0,
            left: 20.0,
            right: 320.0,
            bottom: 150.0,
        };
        let svg = render_lane("enterprise", "Enterprise", bounds);
        assert!(svg.contains("data-track=\"enterprise\""));
        assert!(svg.contains("<rect x=\"20\" y=\"10\" width=\"300\" height=\"140\" rx=\"12\""));
        assert!(svg.contains("pmo-lane-title"));
    }

    #[test]
    fn test_render_legend_entry() {
        let svg = render_legend_entry(0.0, 0.0, "url(#pmo-grad-sky)", "Enterprise & Product");
        assert!(svg.contains("Enterprise &amp; Product"));
    }
}
