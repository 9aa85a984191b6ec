// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Anchored connectors that stay aligned with the elements they join.
//!
//! Element boxes move when fonts load or content reflows, without any event
//! the overlay could listen for. The overlay therefore re-measures on two
//! triggers: an explicit resize notification, and a fixed poll interval
//! since the last measurement. The caller supplies the clock.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::diagram::anchor::BoundsSource;
use crate::diagram::connector::{ConnectorSpec, RoutedPath, render_path, route_anchored};

pub struct ConnectorOverlay {
    specs: Vec<ConnectorSpec>,
    routed: Vec<Option<RoutedPath>>,
    interval: Duration,
    last_measured: Option<Instant>,
    resize_pending: bool,
    measurements: u64,
}

impl ConnectorOverlay {
    pub fn new(specs: Vec<ConnectorSpec>, interval: Duration) -> Self {
        let routed = vec![None; specs.len()];
        ConnectorOverlay {
            specs,
            routed,
            interval,
            last_measured: None,
            resize_pending: false,
            measurements: 0,
        }
    }

    pub fn specs(&self) -> &[ConnectorSpec] {
        &self.specs
    }

    /// Forces a re-measure on the next poll.
    pub fn notify_resize(&mut self) {
        self.resize_pending = true;
    }

    pub fn needs_measure(&self, now: Instant) -> bool {
        match self.last_measured {
            None => true,
            Some(_) if self.resize_pending => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// Re-routes every connector if a resize is pending or the poll
    /// interval has elapsed. Returns whether a measurement happened.
    pub fn poll(&mut self, source: &dyn BoundsSource, now: Instant) -> bool {
        if !self.needs_measure(now) {
            return false;
        }
        self.remeasure(source, now);
        true
    }

    pub fn remeasure(&mut self, source: &dyn BoundsSource, now: Instant) {
        self.routed = self
            .specs
            .iter()
            .map(|spec| route_anchored(source, spec))
            .collect();
        self.last_measured = Some(now);
        self.resize_pending = false;
        self.measurements += 1;
        debug!(
            connectors = self.specs.len(),
            unresolved = self.unresolved_count(),
            "re-measured connector overlay"
        );
    }

    pub fn measurements(&self) -> u64 {
        self.measurements
    }

    pub fn unresolved_count(&self) -> usize {
        self.routed.iter().filter(|r| r.is_none()).count()
    }

    /// Connectors that resolved at the last measurement.
    pub fn routed(&self) -> impl Iterator<Item = (&ConnectorSpec, &RoutedPath)> {
        self.specs
            .iter()
            .zip(self.routed.iter())
            .filter_map(|(spec, path)| path.as_ref().map(|p| (spec, p)))
    }

    /// Markup for the resolved connectors; unresolved ones are omitted.
    pub fn render(&self) -> String {
        let mut svg = String::from("<g class=\"pmo-overlay\">");
        for (spec, path) in self.routed() {
            svg.push_str(&render_path(path, spec.kind, spec.label.as_deref()));
        }
        svg.push_str("</g>");
        svg
    }
}
