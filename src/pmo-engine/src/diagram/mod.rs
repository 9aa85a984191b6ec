// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

pub mod anchor;
mod arrowhead;
pub mod common;
pub mod connector;
pub mod constants;
mod elements;
mod label;
pub mod layout;
pub mod overlay;
mod render;
#[cfg(feature = "png_render")]
pub mod render_png;

pub use anchor::{AnchorMode, AnchorRequest, BoundsSource, MeasuredBounds, resolve_anchor};
pub use connector::{ConnectorSpec, CurveAxis, LineKind, RoutedPath, render_anchored};
pub use layout::{CoordinateTable, DiagramLayout, LayoutDescription, layout_tracks};
pub use overlay::ConnectorOverlay;
pub use render::{render_lifecycle_svg, render_svg};
