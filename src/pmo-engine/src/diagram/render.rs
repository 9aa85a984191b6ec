// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::time::Instant;

use tracing::debug;

use crate::catalog::Catalog;
use crate::config::{ConnectorStyle, LayoutConfig, OverlayConfig};
use crate::datamodel::Gradient;
use crate::diagram::common::{Rect, calc_view_box};
use crate::diagram::connector::render_path;
use crate::diagram::constants::VIEW_BOX_MARGIN;
use crate::diagram::elements::{
    decision_bounds, exception_bounds, gradient_ref, phase_bounds, render_decision,
    render_exception, render_lane, render_legend_entry, render_phase,
};
use crate::diagram::layout::{DiagramLayout, NodeKind, layout_tracks};
use crate::lookup::lookup_phase;

const RENDER_STYLES: &str = r#"
.pmo-canvas text {
  fill: #1f2937;
  font-size: 12px;
  font-family: "Inter", "Open Sans", "Arial", sans-serif;
  white-space: nowrap;
}

.pmo-canvas a {
  cursor: pointer;
}

/* Phase */
.pmo-phase circle {
  stroke-width: 2px;
  stroke: #ffffff;
}

.pmo-phase .pmo-node-label {
  fill: #ffffff;
  font-weight: 600;
}

.pmo-phase.pmo-placeholder circle {
  stroke: #9ca3af;
  stroke-dasharray: 4px;
}

/* Exception */
.pmo-exception circle {
  stroke-width: 1.5px;
  stroke: #6b7280;
  stroke-dasharray: 3px;
}

/* Decision */
.pmo-decision polygon {
  stroke-width: 1.5px;
  stroke: #92400e;
  fill: #fef3c7;
}

/* Lane */
.pmo-lane rect {
  stroke-width: 1px;
  stroke: #cbd5e1;
  fill: #f8fafc;
}

.pmo-lane-title {
  font-weight: 600;
  fill: #475569;
}

/* Connector */
.pmo-connector {
  stroke-width: 1.5px;
  stroke: #64748b;
  fill: none;
}

.pmo-connector-exception {
  stroke: #9ca3af;
  stroke-dasharray: 5px 4px;
}

.pmo-connector-label {
  font-size: 11px;
  text-anchor: middle;
  fill: #475569;
}

/* Arrowhead */
path.pmo-arrowhead {
  stroke-width: 1px;
  stroke-linejoin: round;
  stroke: #64748b;
  fill: #64748b;
}

path.pmo-arrowhead-exception {
  stroke: #9ca3af;
  fill: #9ca3af;
}
"#;

// lanes, connectors, nodes, legend
const Z_MAX: usize = 4;
const LEGEND_GAP: f64 = 28.0;
const LEGEND_ENTRY_WIDTH: f64 = 150.0;

fn gradient_defs() -> String {
    let mut defs = String::new();
    for gradient in Gradient::ALL {
        let (from, to) = gradient.stops();
        defs.push_str(&format!(
            "<linearGradient id=\"pmo-grad-{}\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"1\"><stop offset=\"0%\" stop-color=\"{}\"></stop><stop offset=\"100%\" stop-color=\"{}\"></stop></linearGradient>",
            gradient.token(),
            from,
            to
        ));
    }
    defs
}

fn render_connectors(
    layout: &DiagramLayout,
    config: &LayoutConfig,
    overlay: &OverlayConfig,
) -> Vec<String> {
    match config.connector_style {
        ConnectorStyle::Fixed => {
            let table = layout.coordinate_table();
            layout
                .links
                .iter()
                .filter_map(|link| {
                    let path = layout.route_fixed(&table, link, config.fixed_curvature);
                    if path.is_none() {
                        debug!(from = %link.from, to = %link.to, "no coordinates for connector");
                    }
                    path.map(|p| render_path(&p, link.kind, link.label.as_deref()))
                })
                .collect()
        }
        ConnectorStyle::Anchored => {
            // a fresh overlay always measures on its first poll
            let mut connectors = layout.overlay(config, overlay);
            connectors.poll(&layout.measured_bounds(), Instant::now());
            vec![connectors.render()]
        }
    }
}

fn legend_entries(catalog: &Catalog, layout: &DiagramLayout) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    if let Some(first) = layout.nodes.iter().find(|n| n.kind == NodeKind::Phase) {
        let record = lookup_phase(catalog, first.phase_id.as_deref().unwrap_or(&first.key));
        entries.push((gradient_ref(&record), "Shared phase".to_string()));
    }
    for lane in &layout.lanes {
        let phase_id = lane
            .members
            .first()
            .and_then(|key| layout.node(key))
            .and_then(|n| n.phase_id.clone());
        if let Some(phase_id) = phase_id {
            let record = lookup_phase(catalog, &phase_id);
            entries.push((gradient_ref(&record), format!("{} track", lane.title)));
        }
    }
    if layout.nodes.iter().any(|n| n.kind == NodeKind::Exception) {
        entries.push((
            format!("url(#pmo-grad-{})", Gradient::Neutral.token()),
            "Exception state".to_string(),
        ));
    }
    entries
}

/// Renders a placed layout to a standalone SVG document.
pub fn render_svg(
    catalog: &Catalog,
    layout: &DiagramLayout,
    config: &LayoutConfig,
    overlay: &OverlayConfig,
) -> String {
    let mut z_layers: Vec<Vec<String>> = vec![Vec::new(); Z_MAX];
    let mut bounds: Vec<Option<Rect>> = Vec::new();

    for lane in &layout.lanes {
        if let Some(b) = layout.lane_bounds(lane) {
            z_layers[0].push(render_lane(&lane.track_id, &lane.title, b));
            bounds.push(Some(b));
        }
    }

    // connector bounds intentionally not collected
    z_layers[1].extend(render_connectors(layout, config, overlay));

    for node in &layout.nodes {
        let (svg, b) = match node.kind {
            NodeKind::Phase => {
                let record = lookup_phase(catalog, node.phase_id.as_deref().unwrap_or(&node.key));
                (
                    render_phase(node, &record, config.label_wrap),
                    phase_bounds(node, &record, config.label_wrap),
                )
            }
            NodeKind::Exception => {
                let record = lookup_phase(catalog, node.phase_id.as_deref().unwrap_or(&node.key));
                (
                    render_exception(node, &record, config.label_wrap),
                    exception_bounds(node, &record, config.label_wrap),
                )
            }
            NodeKind::Decision => (render_decision(node), decision_bounds(node)),
        };
        z_layers[2].push(svg);
        bounds.push(Some(b));
    }

    if config.show_legend
        && let Some(extent) = calc_view_box(&bounds)
    {
        let y = extent.bottom + LEGEND_GAP;
        let mut x = extent.left + 8.0;
        let mut legend = String::from("<g class=\"pmo-legend\">");
        for (fill, text) in legend_entries(catalog, layout) {
            legend.push_str(&render_legend_entry(x, y, &fill, &text));
            bounds.push(Some(Rect {
                top: y - 8.0,
                left: x - 8.0,
                right: x + LEGEND_ENTRY_WIDTH - 16.0,
                bottom: y + 8.0,
            }));
            x += LEGEND_ENTRY_WIDTH;
        }
        legend.push_str("</g>");
        z_layers[3].push(legend);
    }

    let view_box = calc_view_box(&bounds);
    let margin = VIEW_BOX_MARGIN;
    let (vb_str, width, height) = if let Some(vb) = view_box {
        let left = vb.left.floor() as i64 - margin;
        let top = vb.top.floor() as i64 - margin;
        let width = (vb.right - left as f64).ceil() as i64 + margin;
        let height = (vb.bottom - top as f64).ceil() as i64 + margin;
        (format!("{left} {top} {width} {height}"), width, height)
    } else {
        ("0 0 100 100".to_string(), 100, 100)
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg style=\"width: {width}; height: {height};\" xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{vb_str}\" width=\"{width}\" height=\"{height}\" preserveAspectRatio=\"xMinYMin\" class=\"pmo-canvas\">"
    ));
    svg.push_str("<style>\n");
    svg.push_str(RENDER_STYLES);
    svg.push_str("\n</style>\n");
    svg.push_str("<defs>");
    svg.push_str(&gradient_defs());
    svg.push_str("</defs>");
    svg.push_str("<g>");
    for layer in &z_layers {
        for fragment in layer {
            svg.push_str(fragment);
        }
    }
    svg.push_str("</g>");
    svg.push_str("</svg>");
    svg
}

/// Lays out the catalog's tracks and exception states, then renders them.
pub fn render_lifecycle_svg(
    catalog: &Catalog,
    config: &LayoutConfig,
    overlay: &OverlayConfig,
) -> String {
    let exceptions: Vec<String> = catalog
        .exceptions
        .iter()
        .map(|e| e.phase.id.clone())
        .collect();
    let layout = layout_tracks(&catalog.tracks, &exceptions, config);
    render_svg(catalog, &layout, config, overlay)
}
