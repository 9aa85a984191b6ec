// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Anchor resolution against measured element boxes.
//!
//! A [`BoundsSource`] answers "where is element X right now" the way a
//! rendered page answers a bounding-box query. Anchors are resolved
//! relative to the container's top-left corner, so the overlay drawing the
//! connectors can be positioned independently of the page scroll offset.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::diagram::common::{Point, Rect};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorMode {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnchorRequest {
    pub id: String,
    #[serde(default)]
    pub mode: AnchorMode,
    /// Outward offset from the chosen edge; ignored for `Center`.
    #[serde(default)]
    pub padding: f64,
}

impl AnchorRequest {
    pub fn new(id: &str, mode: AnchorMode) -> Self {
        AnchorRequest {
            id: id.to_string(),
            mode,
            padding: 0.0,
        }
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }
}

pub trait BoundsSource {
    /// Box of the overlay container, or `None` if it isn't mounted.
    fn container_bounds(&self) -> Option<Rect>;
    /// Box of one element, or `None` if it isn't mounted yet.
    fn element_bounds(&self, id: &str) -> Option<Rect>;
}

/// Point on `bounds` for `mode`, pushed `padding` outward from that edge.
pub fn anchor_point(bounds: &Rect, mode: AnchorMode, padding: f64) -> Point {
    let c = bounds.center();
    match mode {
        AnchorMode::Center => c,
        AnchorMode::Top => Point::new(c.x, bounds.top - padding),
        AnchorMode::Bottom => Point::new(c.x, bounds.bottom + padding),
        AnchorMode::Left => Point::new(bounds.left - padding, c.y),
        AnchorMode::Right => Point::new(bounds.right + padding, c.y),
    }
}

/// Resolves `request` against the current measurements, relative to the
/// container. Returns `None` when the element or the container is missing.
pub fn resolve_anchor(source: &dyn BoundsSource, request: &AnchorRequest) -> Option<Point> {
    let container = source.container_bounds()?;
    let element = source.element_bounds(&request.id)?;
    let relative = element.relative_to(&container);
    Some(anchor_point(&relative, request.mode, request.padding))
}

/// A snapshot of element boxes keyed by id. This is what a laid-out
/// diagram hands to the anchored connector router, and what tests use to
/// stand in for a live page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasuredBounds {
    pub container: Option<Rect>,
    pub elements: HashMap<String, Rect>,
}

impl MeasuredBounds {
    pub fn new(container: Rect) -> Self {
        MeasuredBounds {
            container: Some(container),
            elements: HashMap::new(),
        }
    }

    pub fn insert(&mut self, id: &str, bounds: Rect) {
        self.elements.insert(id.to_string(), bounds);
    }

    pub fn remove(&mut self, id: &str) -> Option<Rect> {
        self.elements.remove(id)
    }
}

impl BoundsSource for MeasuredBounds {
    fn container_bounds(&self) -> Option<Rect> {
        self.container
    }

    fn element_bounds(&self, id: &str) -> Option<Rect> {
        self.elements.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> MeasuredBounds {
        let mut page = MeasuredBounds::new(Rect {
            top: 100.0,
            left: 50.0,
            right: 1050.0,
            bottom: 700.0,
        });
        page.insert(
            "discovery",
            Rect {
                top: 200.0,
                left: 150.0,
                right: 250.0,
                bottom: 260.0,
            },
        );
        page
    }

    #[test]
    fn test_modes_relative_to_container() {
        let page = page();
        let at = |mode| resolve_anchor(&page, &AnchorRequest::new("discovery", mode)).unwrap();
        assert_eq!(at(AnchorMode::Center), Point::new(150.0, 130.0));
        assert_eq!(at(AnchorMode::Top), Point::new(150.0, 100.0));
        assert_eq!(at(AnchorMode::Bottom), Point::new(150.0, 160.0));
        assert_eq!(at(AnchorMode::Left), Point::new(100.0, 130.0));
        assert_eq!(at(AnchorMode::Right), Point::new(200.0, 130.0));
    }

    #[test]
    fn test_padding_pushes_outward() {
        let page = page();
        let req = AnchorRequest::new("discovery", AnchorMode::Right).with_padding(8.0);
        assert_eq!(resolve_anchor(&page, &req), Some(Point::new(208.0, 130.0)));
        let req = AnchorRequest::new("discovery", AnchorMode::Top).with_padding(8.0);
        assert_eq!(resolve_anchor(&page, &req), Some(Point::new(150.0, 92.0)));
        let req = AnchorRequest::new("discovery", AnchorMode::Center).with_padding(8.0);
        assert_eq!(resolve_anchor(&page, &req), Some(Point::new(150.0, 130.0)));
    }

    #[test]
    fn test_unmounted_element_or_container() {
        let mut page = page();
        assert!(resolve_anchor(&page, &AnchorRequest::new("missing", AnchorMode::Center)).is_none());
        page.container = None;
        assert!(
            resolve_anchor(&page, &AnchorRequest::new("discovery", AnchorMode::Center)).is_none()
        );
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let req: AnchorRequest = serde_json::from_str(r#"{"id": "n1"}"#).unwrap();
        assert_eq!(req.mode, AnchorMode::Center);
        assert_eq!(req.padding, 0.0);
        let req: AnchorRequest =
            serde_json::from_str(r#"{"id": "n1", "mode": "bottom", "padding": 4}"#).unwrap();
        assert_eq!(req.mode, AnchorMode::Bottom);
    }
}
