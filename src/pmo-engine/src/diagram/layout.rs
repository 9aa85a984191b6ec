// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Lifecycle layout.
//!
//! A [`LayoutDescription`] is derived once from the tracks: the phases every
//! track shares at the start, a decision diamond where they diverge, one lane
//! per track for the divergent middle, and the shared tail. Placing it
//! produces a [`DiagramLayout`] whose node centers form the fixed coordinate
//! table; the same layout can be measured as element boxes for anchored
//! connectors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{LayoutConfig, OverlayConfig};
use crate::datamodel::Track;
use crate::diagram::anchor::{AnchorMode, AnchorRequest, MeasuredBounds};
use crate::diagram::common::{Point, Rect, calc_view_box, is_zero};
use crate::diagram::connector::{
    ConnectorSpec, CurveAxis, LineKind, RoutedPath, dominant_axis, quadratic_control,
    quadratic_path_via, straight_path,
};
use crate::diagram::constants::{
    DECISION_HALF_DIAGONAL, EXCEPTION_RADIUS, LANE_PADDING, LANE_TITLE_HEIGHT, LINE_SPACING,
    PHASE_RADIUS,
};
use crate::diagram::overlay::ConnectorOverlay;

pub const DECISION_KEY: &str = "decision";

/// Named node centers. Either produced by [`DiagramLayout::coordinate_table`]
/// or hand-authored and applied with [`DiagramLayout::apply_table`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordinateTable {
    entries: BTreeMap<String, Point>,
}

impl CoordinateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, center: Point) {
        self.entries.insert(key.to_string(), center);
    }

    pub fn get(&self, key: &str) -> Option<Point> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), *p))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneDescription {
    pub track_id: String,
    pub title: String,
    /// The phases only this track visits.
    pub phases: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDescription {
    pub shared_prefix: Vec<String>,
    /// Label of the diamond where the lanes split; `None` for one lane.
    pub decision: Option<String>,
    pub lanes: Vec<LaneDescription>,
    pub shared_suffix: Vec<String>,
    pub exceptions: Vec<String>,
}

fn common_prefix_len(tracks: &[Track]) -> usize {
    let first = &tracks[0].phases;
    tracks[1..]
        .iter()
        .map(|t| {
            first
                .iter()
                .zip(t.phases.iter())
                .take_while(|(a, b)| a == b)
                .count()
        })
        .min()
        .unwrap_or(first.len())
}

fn common_suffix_len(tracks: &[Track], prefix: usize) -> usize {
    let shortest = tracks.iter().map(|t| t.phases.len()).min().unwrap_or(0);
    let limit = shortest.saturating_sub(prefix);
    let first = &tracks[0].phases;
    tracks[1..]
        .iter()
        .map(|t| {
            first
                .iter()
                .rev()
                .zip(t.phases.iter().rev())
                .take_while(|(a, b)| a == b)
                .count()
        })
        .min()
        .unwrap_or(0)
        .min(limit)
}

impl LayoutDescription {
    pub fn from_tracks(tracks: &[Track], exceptions: &[String], decision_label: &str) -> Self {
        let mut desc = LayoutDescription {
            exceptions: exceptions.to_vec(),
            ..Default::default()
        };
        if tracks.is_empty() {
            return desc;
        }
        if tracks.len() == 1 {
            desc.shared_prefix = tracks[0].phases.clone();
            return desc;
        }

        let prefix = common_prefix_len(tracks);
        let suffix = common_suffix_len(tracks, prefix);
        let lanes: Vec<LaneDescription> = tracks
            .iter()
            .map(|t| LaneDescription {
                track_id: t.id.clone(),
                title: t.name.clone(),
                phases: t.phases[prefix..t.phases.len() - suffix].to_vec(),
            })
            .collect();

        desc.shared_prefix = tracks[0].phases[..prefix].to_vec();
        desc.shared_suffix = tracks[0].phases[tracks[0].phases.len() - suffix..].to_vec();
        if lanes.iter().any(|l| !l.phases.is_empty()) {
            desc.decision = Some(decision_label.to_string());
            desc.lanes = lanes;
        }
        desc
    }

    pub fn place(&self, config: &LayoutConfig) -> DiagramLayout {
        let h = config.horizontal_spacing;
        let lane_count = self.lanes.len().max(1);
        let center_y = config.start_y + (lane_count - 1) as f64 * config.lane_spacing / 2.0;
        let mut layout = DiagramLayout::default();
        let mut x = config.start_x;
        let mut tail: Option<String> = None;

        for id in &self.shared_prefix {
            layout.push_node(id, NodeKind::Phase, Some(id), Point::new(x, center_y));
            layout.link_from(tail.as_deref(), id, LineKind::Flow, None);
            tail = Some(id.clone());
            x += h;
        }

        let mut lane_tails: Vec<(Option<String>, Option<String>)> = Vec::new();
        if let Some(label) = &self.decision {
            layout.push_decision(label, Point::new(x, center_y));
            layout.link_from(tail.as_deref(), DECISION_KEY, LineKind::Flow, None);
            tail = Some(DECISION_KEY.to_string());
            x += h;

            let widest = self.lanes.iter().map(|l| l.phases.len()).max().unwrap_or(0);
            for (i, lane) in self.lanes.iter().enumerate() {
                let y = config.start_y + i as f64 * config.lane_spacing;
                let mut members = Vec::with_capacity(lane.phases.len());
                let mut lane_tail = Some(DECISION_KEY.to_string());
                for (j, id) in lane.phases.iter().enumerate() {
                    let key = format!("{}:{}", lane.track_id, id);
                    layout.push_node(&key, NodeKind::Phase, Some(id), Point::new(x + j as f64 * h, y));
                    // the lane title rides on its first connector
                    let label = (j == 0).then(|| lane.title.clone());
                    layout.link_from(lane_tail.as_deref(), &key, LineKind::Flow, label);
                    members.push(key.clone());
                    lane_tail = Some(key);
                }
                let title = lane.title.clone();
                layout.lanes.push(PlacedLane {
                    track_id: lane.track_id.clone(),
                    title: title.clone(),
                    members,
                });
                // an empty middle links the decision straight to the tail
                let label = lane.phases.is_empty().then_some(title);
                lane_tails.push((lane_tail, label));
            }
            x += widest as f64 * h;
        }

        for (k, id) in self.shared_suffix.iter().enumerate() {
            layout.push_node(id, NodeKind::Phase, Some(id), Point::new(x, center_y));
            if k == 0 && !lane_tails.is_empty() {
                for (lane_tail, label) in std::mem::take(&mut lane_tails) {
                    layout.link_from(lane_tail.as_deref(), id, LineKind::Flow, label);
                }
            } else {
                layout.link_from(tail.as_deref(), id, LineKind::Flow, None);
            }
            tail = Some(id.clone());
            x += h;
        }

        if config.show_exceptions && !self.exceptions.is_empty() {
            let source = self
                .decision
                .as_ref()
                .map(|_| DECISION_KEY.to_string())
                .or_else(|| self.shared_prefix.last().cloned());
            if let Some(source) = source {
                let origin = layout.node(&source).map(|n| n.center);
                if let Some(origin) = origin {
                    let bottom = config.start_y + (lane_count - 1) as f64 * config.lane_spacing;
                    let y = bottom + config.lane_spacing * 0.8;
                    let spread = h * 0.6;
                    let mid = (self.exceptions.len() - 1) as f64 / 2.0;
                    for (i, id) in self.exceptions.iter().enumerate() {
                        let key = format!("exception:{id}");
                        let cx = origin.x + (i as f64 - mid) * spread;
                        layout.push_node(&key, NodeKind::Exception, Some(id), Point::new(cx, y));
                        layout.link_from(Some(&source), &key, LineKind::Exception, None);
                    }
                }
            }
        }

        layout
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Phase,
    Decision,
    Exception,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedNode {
    /// Unique within a layout. Lane phases are prefixed with the track id
    /// so a phase can appear in more than one lane.
    pub key: String,
    pub kind: NodeKind,
    pub phase_id: Option<String>,
    pub label: Option<String>,
    pub center: Point,
}

impl PlacedNode {
    /// Half extent of the node's shape, not counting its label.
    pub fn radius(&self) -> f64 {
        match self.kind {
            NodeKind::Phase => PHASE_RADIUS,
            NodeKind::Decision => DECISION_HALF_DIAGONAL,
            NodeKind::Exception => EXCEPTION_RADIUS,
        }
    }

    pub fn shape_bounds(&self) -> Rect {
        let r = self.radius();
        Rect::around(self.center, r, r)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedLane {
    pub track_id: String,
    pub title: String,
    pub members: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub from: String,
    pub to: String,
    pub kind: LineKind,
    pub label: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramLayout {
    pub nodes: Vec<PlacedNode>,
    pub lanes: Vec<PlacedLane>,
    pub links: Vec<LinkSpec>,
}

impl DiagramLayout {
    fn push_node(&mut self, key: &str, kind: NodeKind, phase_id: Option<&str>, center: Point) {
        self.nodes.push(PlacedNode {
            key: key.to_string(),
            kind,
            phase_id: phase_id.map(str::to_string),
            label: None,
            center,
        });
    }

    fn push_decision(&mut self, label: &str, center: Point) {
        self.nodes.push(PlacedNode {
            key: DECISION_KEY.to_string(),
            kind: NodeKind::Decision,
            phase_id: None,
            label: Some(label.to_string()),
            center,
        });
    }

    fn link_from(&mut self, from: Option<&str>, to: &str, kind: LineKind, label: Option<String>) {
        if let Some(from) = from {
            self.links.push(LinkSpec {
                from: from.to_string(),
                to: to.to_string(),
                kind,
                label,
            });
        }
    }

    pub fn node(&self, key: &str) -> Option<&PlacedNode> {
        self.nodes.iter().find(|n| n.key == key)
    }

    /// Style A: the node centers as a table.
    pub fn coordinate_table(&self) -> CoordinateTable {
        let mut table = CoordinateTable::new();
        for node in &self.nodes {
            table.insert(&node.key, node.center);
        }
        table
    }

    /// Moves every node named in `table`. Keys the layout doesn't have are
    /// ignored, as are nodes the table doesn't mention.
    pub fn apply_table(&mut self, table: &CoordinateTable) {
        for node in &mut self.nodes {
            if let Some(center) = table.get(&node.key) {
                node.center = center;
            }
        }
    }

    /// Box around a lane's members, with room for the title above and the
    /// node names below.
    pub fn lane_bounds(&self, lane: &PlacedLane) -> Option<Rect> {
        let boxes: Vec<Option<Rect>> = lane
            .members
            .iter()
            .map(|key| self.node(key).map(PlacedNode::shape_bounds))
            .collect();
        let inner = calc_view_box(&boxes)?;
        Some(Rect {
            top: inner.top - LANE_PADDING - LANE_TITLE_HEIGHT,
            left: inner.left - LANE_PADDING,
            right: inner.right + LANE_PADDING,
            bottom: inner.bottom + LANE_PADDING + 2.0 * LINE_SPACING,
        })
    }

    /// Style B: element boxes as a page would report them. The container
    /// sits at the origin so resolved anchors are in diagram coordinates.
    pub fn measured_bounds(&self) -> MeasuredBounds {
        let boxes: Vec<Option<Rect>> = self.nodes.iter().map(|n| Some(n.shape_bounds())).collect();
        let extent = calc_view_box(&boxes).unwrap_or(Rect {
            top: 0.0,
            left: 0.0,
            right: 0.0,
            bottom: 0.0,
        });
        let mut measured = MeasuredBounds::new(Rect {
            top: 0.0,
            left: 0.0,
            right: extent.right.max(0.0),
            bottom: extent.bottom.max(0.0),
        });
        for node in &self.nodes {
            measured.insert(&node.key, node.shape_bounds());
        }
        measured
    }

    /// Anchored connector requests for every link, picking facing edges
    /// along the dominant axis.
    pub fn anchored_connectors(&self, config: &LayoutConfig) -> Vec<ConnectorSpec> {
        self.links
            .iter()
            .map(|link| {
                let (from_mode, to_mode) = match (self.node(&link.from), self.node(&link.to)) {
                    (Some(a), Some(b)) => facing_anchors(a.center, b.center),
                    _ => (AnchorMode::Center, AnchorMode::Center),
                };
                let mut spec = ConnectorSpec::new(
                    AnchorRequest::new(&link.from, from_mode).with_padding(config.anchor_padding),
                    AnchorRequest::new(&link.to, to_mode).with_padding(config.anchor_padding),
                );
                spec.curvature = config.anchored_curvature;
                spec.kind = link.kind;
                spec.label = link.label.clone();
                spec
            })
            .collect()
    }

    /// A connector overlay over this layout's links that re-measures on
    /// the configured poll interval.
    pub fn overlay(&self, config: &LayoutConfig, overlay: &OverlayConfig) -> ConnectorOverlay {
        ConnectorOverlay::new(self.anchored_connectors(config), overlay.poll_interval())
    }

    /// Style A routing for one link: a straight line when the endpoints
    /// share an axis, otherwise a quadratic. Endpoints are pulled in to the
    /// shape edges. `None` when either key has no entry in `table`.
    pub fn route_fixed(
        &self,
        table: &CoordinateTable,
        link: &LinkSpec,
        curvature: f64,
    ) -> Option<RoutedPath> {
        let from = table.get(&link.from)?;
        let to = table.get(&link.to)?;
        let r_from = self.node(&link.from).map_or(0.0, PlacedNode::radius);
        let r_to = self.node(&link.to).map_or(0.0, PlacedNode::radius);

        if is_zero(to.x - from.x) || is_zero(to.y - from.y) {
            let (start, end) = (toward(from, to, r_from), toward(to, from, r_to));
            return Some(straight_path(start, end));
        }
        let control = quadratic_control(from, to, curvature);
        Some(quadratic_path_via(
            toward(from, control, r_from),
            control,
            toward(to, control, r_to),
        ))
    }
}

/// `from` moved `distance` toward `target`.
fn toward(from: Point, target: Point, distance: f64) -> Point {
    let dx = target.x - from.x;
    let dy = target.y - from.y;
    let len = (dx * dx + dy * dy).sqrt();
    if is_zero(len) {
        return from;
    }
    from.offset(dx / len * distance, dy / len * distance)
}

fn facing_anchors(from: Point, to: Point) -> (AnchorMode, AnchorMode) {
    match dominant_axis(from, to) {
        CurveAxis::Vertical if to.y >= from.y => (AnchorMode::Bottom, AnchorMode::Top),
        CurveAxis::Vertical => (AnchorMode::Top, AnchorMode::Bottom),
        _ if to.x >= from.x => (AnchorMode::Right, AnchorMode::Left),
        _ => (AnchorMode::Left, AnchorMode::Right),
    }
}

/// Layout for `tracks` with the catalog's exception states, using the
/// configured decision label.
pub fn layout_tracks(tracks: &[Track], exceptions: &[String], config: &LayoutConfig) -> DiagramLayout {
    LayoutDescription::from_tracks(tracks, exceptions, &config.decision_label).place(config)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::catalog::Catalog;
    use crate::diagram::connector::route_anchored;

    fn track(id: &str, phases: &[&str]) -> Track {
        Track {
            id: id.to_string(),
            name: id.to_uppercase(),
            phases: phases.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn builtin_layout() -> DiagramLayout {
        let catalog = Catalog::builtin();
        let exceptions: Vec<String> = catalog.exceptions.iter().map(|e| e.phase.id.clone()).collect();
        layout_tracks(&catalog.tracks, &exceptions, &LayoutConfig::default())
    }

    #[test]
    fn test_description_splits_shared_prefix_and_suffix() {
        let catalog = Catalog::builtin();
        let desc = LayoutDescription::from_tracks(&catalog.tracks, &[], "Criteria");
        assert_eq!(desc.shared_prefix, vec!["0", "1"]);
        assert_eq!(desc.shared_suffix, vec!["4", "5", "6"]);
        assert_eq!(desc.decision.as_deref(), Some("Criteria"));
        assert_eq!(desc.lanes.len(), 2);
        assert_eq!(desc.lanes[0].phases, vec!["2E", "3E"]);
        assert_eq!(desc.lanes[1].phases, vec!["2P", "3P"]);
    }

    #[test]
    fn test_single_track_has_no_lanes() {
        let desc = LayoutDescription::from_tracks(&[track("a", &["0", "1", "2"])], &[], "D");
        assert_eq!(desc.shared_prefix.len(), 3);
        assert!(desc.decision.is_none());
        assert!(desc.lanes.is_empty());
    }

    #[test]
    fn test_identical_tracks_collapse() {
        let desc = LayoutDescription::from_tracks(
            &[track("a", &["0", "1"]), track("b", &["0", "1"])],
            &[],
            "D",
        );
        assert_eq!(desc.shared_prefix, vec!["0", "1"]);
        assert!(desc.shared_suffix.is_empty());
        assert!(desc.decision.is_none());
    }

    #[test]
    fn test_suffix_never_overlaps_prefix() {
        // b is a prefix of a; nothing is left for a shared tail
        let desc = LayoutDescription::from_tracks(
            &[track("a", &["0", "1", "0", "1"]), track("b", &["0", "1"])],
            &[],
            "D",
        );
        assert_eq!(desc.shared_prefix, vec!["0", "1"]);
        assert!(desc.shared_suffix.is_empty());
        assert_eq!(desc.lanes[0].phases, vec!["0", "1"]);
        assert!(desc.lanes[1].phases.is_empty());
    }

    #[test]
    fn test_empty_tracks() {
        let layout = layout_tracks(&[], &["D".to_string()], &LayoutConfig::default());
        assert!(layout.nodes.is_empty());
        assert!(layout.links.is_empty());
    }

    #[test]
    fn test_builtin_layout_shape() {
        let layout = builtin_layout();
        // 5 shared + 4 lane + decision + 2 exceptions
        assert_eq!(layout.nodes.len(), 12);
        assert_eq!(layout.lanes.len(), 2);
        let decision = layout.node(DECISION_KEY).unwrap();
        let discovery = layout.node("1").unwrap();
        assert_eq!(decision.center.y, discovery.center.y);
        assert!(decision.center.x > discovery.center.x);

        let plan = layout.node("enterprise:2E").unwrap();
        let define = layout.node("product:2P").unwrap();
        assert_eq!(plan.center.x, define.center.x);
        assert!(plan.center.y < decision.center.y && define.center.y > decision.center.y);

        // both lanes merge into Development
        let into_build: Vec<&LinkSpec> = layout.links.iter().filter(|l| l.to == "4").collect();
        assert_eq!(into_build.len(), 2);

        let exception_links = layout
            .links
            .iter()
            .filter(|l| l.kind == LineKind::Exception)
            .count();
        assert_eq!(exception_links, 2);
        assert!(
            layout
                .links
                .iter()
                .any(|l| l.from == DECISION_KEY && l.label.as_deref() == Some("Enterprise"))
        );
    }

    #[test]
    fn test_exceptions_hidden_by_config() {
        let catalog = Catalog::builtin();
        let config = LayoutConfig {
            show_exceptions: false,
            ..LayoutConfig::default()
        };
        let layout = layout_tracks(&catalog.tracks, &["D".to_string()], &config);
        assert!(layout.nodes.iter().all(|n| n.kind != NodeKind::Exception));
    }

    #[test]
    fn test_coordinate_table_round_trip_and_override() {
        let mut layout = builtin_layout();
        let table = layout.coordinate_table();
        assert_eq!(table.len(), layout.nodes.len());
        assert_eq!(table.get("0"), Some(Point::new(80.0, 175.0)));

        let mut overrides = CoordinateTable::new();
        overrides.insert("0", Point::new(10.0, 20.0));
        overrides.insert("not-a-node", Point::new(0.0, 0.0));
        layout.apply_table(&overrides);
        assert_eq!(layout.node("0").unwrap().center, Point::new(10.0, 20.0));
        assert!(layout.node("not-a-node").is_none());

        let json = serde_json::to_string(&overrides).unwrap();
        let back: CoordinateTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, overrides);
    }

    #[test]
    fn test_route_fixed_straight_and_curved() {
        let layout = builtin_layout();
        let table = layout.coordinate_table();
        let straight = layout.links.iter().find(|l| l.from == "0" && l.to == "1").unwrap();
        let path = layout.route_fixed(&table, straight, 0.35).unwrap();
        assert!(path.d.contains('L'));
        assert_eq!(path.start.x, 80.0 + PHASE_RADIUS);
        assert_eq!(path.end.x, 230.0 - PHASE_RADIUS);

        let curved = layout
            .links
            .iter()
            .find(|l| l.from == DECISION_KEY && l.to == "enterprise:2E")
            .unwrap();
        let path = layout.route_fixed(&table, curved, 0.35).unwrap();
        assert!(path.d.contains('Q'));

        let missing = LinkSpec {
            from: "0".to_string(),
            to: "ZZ".to_string(),
            kind: LineKind::Flow,
            label: None,
        };
        assert!(layout.route_fixed(&table, &missing, 0.35).is_none());
    }

    #[test]
    fn test_anchored_connectors_resolve_against_measurements() {
        let layout = builtin_layout();
        let config = LayoutConfig::default();
        let measured = layout.measured_bounds();
        let specs = layout.anchored_connectors(&config);
        assert_eq!(specs.len(), layout.links.len());
        for spec in &specs {
            assert!(route_anchored(&measured, spec).is_some());
        }
        let first = &specs[0];
        assert_eq!(first.from.mode, AnchorMode::Right);
        assert_eq!(first.to.mode, AnchorMode::Left);
    }

    #[test]
    fn test_overlay_polls_on_configured_interval() {
        let layout = builtin_layout();
        let measured = layout.measured_bounds();
        let t0 = Instant::now();

        let slow = OverlayConfig {
            poll_interval_ms: 1000,
        };
        let mut overlay = layout.overlay(&LayoutConfig::default(), &slow);
        assert!(overlay.poll(&measured, t0));
        assert!(!overlay.poll(&measured, t0 + Duration::from_millis(500)));
        assert!(overlay.poll(&measured, t0 + Duration::from_millis(1000)));

        let mut overlay = layout.overlay(&LayoutConfig::default(), &OverlayConfig::default());
        assert!(overlay.poll(&measured, t0));
        assert!(overlay.poll(&measured, t0 + Duration::from_millis(500)));
        assert_eq!(overlay.specs().len(), layout.links.len());
        assert_eq!(overlay.unresolved_count(), 0);
    }

    #[test]
    fn test_lane_bounds_cover_members() {
        let layout = builtin_layout();
        let lane = &layout.lanes[0];
        let bounds = layout.lane_bounds(lane).unwrap();
        for key in &lane.members {
            let c = layout.node(key).unwrap().center;
            assert!(c.x > bounds.left && c.x < bounds.right);
            assert!(c.y > bounds.top && c.y < bounds.bottom);
        }
        let empty = PlacedLane {
            track_id: "x".to_string(),
            title: "X".to_string(),
            members: vec![],
        };
        assert!(layout.lane_bounds(&empty).is_none());
    }
}
