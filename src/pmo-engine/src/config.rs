// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::{Error, ErrorCode, ErrorKind, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorStyle {
    /// Straight lines or quadratic curves between coordinate-table entries.
    #[default]
    Fixed,
    /// Cubic curves between anchors resolved from measured element boxes.
    Anchored,
}

/// Diagram layout configuration.
///
/// All spacing and dimension values are in SVG user units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Center of the first node.
    pub start_x: f64,
    pub start_y: f64,
    /// Distance between consecutive node centers along a track.
    pub horizontal_spacing: f64,
    /// Distance between lane center lines.
    pub lane_spacing: f64,
    /// Control-point offset for fixed-layout quadratics, as a fraction of
    /// the endpoint delta.
    pub fixed_curvature: f64,
    /// Fraction of the delta each anchored cubic control point travels.
    pub anchored_curvature: f64,
    /// Outward gap between a node edge and an anchored connector end.
    pub anchor_padding: f64,
    pub connector_style: ConnectorStyle,
    pub show_exceptions: bool,
    pub show_legend: bool,
    /// Characters per line before node names wrap.
    pub label_wrap: usize,
    pub decision_label: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            start_x: 80.0,
            start_y: 90.0,
            horizontal_spacing: 150.0,
            lane_spacing: 170.0,
            fixed_curvature: 0.35,
            anchored_curvature: 0.5,
            anchor_padding: 4.0,
            connector_style: ConnectorStyle::Fixed,
            show_exceptions: true,
            show_legend: true,
            label_wrap: 12,
            decision_label: "Criteria\nMatrix".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// How often anchored connectors are re-measured without a resize.
    pub poll_interval_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
        }
    }
}

impl OverlayConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub debounce_ms: u64,
    pub history_limit: usize,
    pub storage_key: String,
    /// Directory for the file-backed store; the CLI picks one when unset.
    pub storage_dir: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            history_limit: 50,
            storage_key: "pmo-flow-editor".to_string(),
            storage_dir: None,
        }
    }
}

impl EditorConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub layout: LayoutConfig,
    pub overlay: OverlayConfig,
    pub editor: EditorConfig,
}

impl AtlasConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AtlasConfig = toml::from_str(contents).map_err(|err| {
            Error::new(ErrorKind::Config, ErrorCode::BadConfig, Some(err.to_string()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|err| {
            Error::new(
                ErrorKind::Config,
                ErrorCode::StorageIo,
                Some(format!("{}: {err}", path.display())),
            )
        })?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<()> {
        let bad = |msg: &str| {
            Err(Error::new(
                ErrorKind::Config,
                ErrorCode::BadConfig,
                Some(msg.to_string()),
            ))
        };
        let spacing = [self.layout.horizontal_spacing, self.layout.lane_spacing];
        if spacing.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return bad("layout spacing must be positive and finite");
        }
        if !(0.0..=1.0).contains(&self.layout.anchored_curvature) {
            return bad("layout.anchored_curvature must be within 0..=1");
        }
        if self.editor.history_limit == 0 {
            return bad("editor.history_limit must be at least 1");
        }
        if self.editor.storage_key.trim().is_empty() {
            return bad("editor.storage_key must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AtlasConfig::default();
        assert_eq!(config.overlay.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.editor.debounce(), Duration::from_millis(300));
        assert_eq!(config.editor.history_limit, 50);
        assert_eq!(config.layout.connector_style, ConnectorStyle::Fixed);
        assert!((config.layout.horizontal_spacing - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AtlasConfig::from_toml_str(
            r#"
            [layout]
            connector_style = "anchored"
            lane_spacing = 200.0

            [editor]
            storage_key = "pmo-flow-editor-v2"
            "#,
        )
        .unwrap();
        assert_eq!(config.layout.connector_style, ConnectorStyle::Anchored);
        assert!((config.layout.lane_spacing - 200.0).abs() < f64::EPSILON);
        assert!((config.layout.horizontal_spacing - 150.0).abs() < f64::EPSILON);
        assert_eq!(config.editor.storage_key, "pmo-flow-editor-v2");
        assert_eq!(config.overlay.poll_interval_ms, 250);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AtlasConfig::from_toml_str("[layout]\nanchored_curvature = 1.5\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::BadConfig);
        assert!(AtlasConfig::from_toml_str("[editor]\nhistory_limit = 0\n").is_err());
        assert!(AtlasConfig::from_toml_str("[layout\n").is_err());
        assert!(AtlasConfig::from_toml_str("[layout]\nlane_spacing = -1.0\n").is_err());
        // TOML spells these nan and inf
        let err = AtlasConfig::from_toml_str("[layout]\nhorizontal_spacing = nan\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::BadConfig);
        assert!(AtlasConfig::from_toml_str("[layout]\nlane_spacing = inf\n").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = AtlasConfig::load(Path::new("/nonexistent/pmo.toml")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Config);
    }
}
