// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Connector routing.
//!
//! Fixed layouts draw straight lines or quadratic curves between table
//! coordinates; anchored layouts draw cubic curves between resolved
//! anchors. Both pick a dominant axis by comparing the absolute deltas
//! between the endpoints, with ties going to the horizontal axis.

use float_cmp::approx_eq;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::diagram::anchor::{AnchorRequest, BoundsSource, resolve_anchor};
use crate::diagram::arrowhead::{ArrowheadType, render_arrowhead};
use crate::diagram::common::{Point, escape_xml_attr, escape_xml_text, format_number, is_zero};
use crate::diagram::constants::ARROWHEAD_RADIUS;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveAxis {
    Horizontal,
    Vertical,
    #[default]
    Auto,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    #[default]
    Flow,
    Exception,
}

/// Horizontal when `|dx| >= |dy|`.
pub fn dominant_axis(from: Point, to: Point) -> CurveAxis {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    if approx_eq!(f64, dx, dy, epsilon = 0.5) {
        trace!(dx, dy, "connector deltas nearly equal, axis choice is a tie-break");
    }
    if dx >= dy {
        CurveAxis::Horizontal
    } else {
        CurveAxis::Vertical
    }
}

fn resolve_axis(axis: CurveAxis, from: Point, to: Point) -> CurveAxis {
    match axis {
        CurveAxis::Auto => dominant_axis(from, to),
        fixed => fixed,
    }
}

/// A path between two points with enough information to place an
/// arrowhead at its end.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutedPath {
    pub d: String,
    pub start: Point,
    pub end: Point,
    /// Direction of travel at `end`, in degrees.
    pub end_angle: f64,
}

fn angle_between(from: Point, to: Point) -> f64 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees()
}

/// Tangent direction arriving at `end` from `control`, falling back to the
/// chord when the control point coincides with the end.
fn arrival_angle(start: Point, control: Point, end: Point) -> f64 {
    if is_zero(end.x - control.x) && is_zero(end.y - control.y) {
        angle_between(start, end)
    } else {
        angle_between(control, end)
    }
}

pub fn straight_path(from: Point, to: Point) -> RoutedPath {
    RoutedPath {
        d: format!(
            "M{},{}L{},{}",
            format_number(from.x),
            format_number(from.y),
            format_number(to.x),
            format_number(to.y)
        ),
        start: from,
        end: to,
        end_angle: angle_between(from, to),
    }
}

/// Control point for the fixed-layout quadratic: offset from `from` by
/// `curvature` of the delta along the dominant axis only.
pub fn quadratic_control(from: Point, to: Point, curvature: f64) -> Point {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    match dominant_axis(from, to) {
        CurveAxis::Vertical => Point::new(from.x, from.y + dy * curvature),
        _ => Point::new(from.x + dx * curvature, from.y),
    }
}

pub fn quadratic_path(from: Point, to: Point, curvature: f64) -> RoutedPath {
    quadratic_path_via(from, quadratic_control(from, to, curvature), to)
}

/// Quadratic through an explicit control point.
pub fn quadratic_path_via(from: Point, c: Point, to: Point) -> RoutedPath {
    RoutedPath {
        d: format!(
            "M{},{}Q{},{} {},{}",
            format_number(from.x),
            format_number(from.y),
            format_number(c.x),
            format_number(c.y),
            format_number(to.x),
            format_number(to.y)
        ),
        start: from,
        end: to,
        end_angle: arrival_angle(from, c, to),
    }
}

/// The two control points of the anchored cubic. `curvature` is clamped to
/// `0..=1` and is the fraction of the delta each control point travels
/// along `axis` from its endpoint.
pub fn cubic_controls(from: Point, to: Point, curvature: f64, axis: CurveAxis) -> (Point, Point) {
    let k = if curvature.is_finite() {
        curvature.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    match resolve_axis(axis, from, to) {
        CurveAxis::Vertical => (
            Point::new(from.x, from.y + dy * k),
            Point::new(to.x, to.y - dy * k),
        ),
        _ => (
            Point::new(from.x + dx * k, from.y),
            Point::new(to.x - dx * k, to.y),
        ),
    }
}

pub fn cubic_path(from: Point, to: Point, curvature: f64, axis: CurveAxis) -> RoutedPath {
    let (c1, c2) = cubic_controls(from, to, curvature, axis);
    RoutedPath {
        d: format!(
            "M{},{}C{},{} {},{} {},{}",
            format_number(from.x),
            format_number(from.y),
            format_number(c1.x),
            format_number(c1.y),
            format_number(c2.x),
            format_number(c2.y),
            format_number(to.x),
            format_number(to.y)
        ),
        start: from,
        end: to,
        end_angle: arrival_angle(from, c2, to),
    }
}

/// One anchored connector: two anchor requests plus drawing options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectorSpec {
    pub from: AnchorRequest,
    pub to: AnchorRequest,
    #[serde(default = "default_curvature")]
    pub curvature: f64,
    #[serde(default)]
    pub axis: CurveAxis,
    #[serde(default)]
    pub kind: LineKind,
    #[serde(default)]
    pub label: Option<String>,
}

fn default_curvature() -> f64 {
    0.5
}

impl ConnectorSpec {
    pub fn new(from: AnchorRequest, to: AnchorRequest) -> Self {
        ConnectorSpec {
            from,
            to,
            curvature: default_curvature(),
            axis: CurveAxis::Auto,
            kind: LineKind::Flow,
            label: None,
        }
    }
}

/// Resolves both endpoints and routes a cubic between them. `None` when
/// either endpoint can't be resolved right now.
pub fn route_anchored(source: &dyn BoundsSource, spec: &ConnectorSpec) -> Option<RoutedPath> {
    let from = resolve_anchor(source, &spec.from)?;
    let to = resolve_anchor(source, &spec.to)?;
    Some(cubic_path(from, to, spec.curvature, spec.axis))
}

fn line_class(kind: LineKind) -> &'static str {
    match kind {
        LineKind::Flow => "pmo-connector",
        LineKind::Exception => "pmo-connector pmo-connector-exception",
    }
}

fn arrowhead_type(kind: LineKind) -> ArrowheadType {
    match kind {
        LineKind::Flow => ArrowheadType::Flow,
        LineKind::Exception => ArrowheadType::Exception,
    }
}

/// SVG group for an already-routed path, with an arrowhead and an
/// optional label at the midpoint of the chord.
pub fn render_path(path: &RoutedPath, kind: LineKind, label: Option<&str>) -> String {
    let mut svg = String::new();
    svg.push_str("<g>");
    svg.push_str(&format!(
        "<path d=\"{}\" class=\"{}\"></path>",
        escape_xml_attr(&path.d),
        line_class(kind)
    ));
    svg.push_str(&render_arrowhead(
        path.end,
        path.end_angle,
        ARROWHEAD_RADIUS,
        arrowhead_type(kind),
    ));
    if let Some(label) = label {
        let mid = Point::new(
            (path.start.x + path.end.x) / 2.0,
            (path.start.y + path.end.y) / 2.0 - 4.0,
        );
        svg.push_str(&format!(
            "<text class=\"pmo-connector-label\" x=\"{}\" y=\"{}\">{}</text>",
            format_number(mid.x),
            format_number(mid.y),
            escape_xml_text(label)
        ));
    }
    svg.push_str("</g>");
    svg
}

/// Anchored connector markup, or an empty string when an endpoint is
/// unresolved.
pub fn render_anchored(source: &dyn BoundsSource, spec: &ConnectorSpec) -> String {
    match route_anchored(source, spec) {
        Some(path) => render_path(&path, spec.kind, spec.label.as_deref()),
        None => String::new(),
    }
}
