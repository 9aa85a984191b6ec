// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod common;
pub mod config;
pub mod datamodel;
pub mod diagram;
pub mod editor;
pub mod export;
pub mod lookup;
pub mod pages;
pub mod scoring;
pub mod search;

pub use self::catalog::Catalog;
pub use self::common::{Error, ErrorCode, ErrorKind, Result};
pub use self::config::{AtlasConfig, ConnectorStyle, EditorConfig, LayoutConfig, OverlayConfig};
pub use self::editor::{Editor, FlowGraph};
pub use self::lookup::{PhaseRecord, lookup_phase};
pub use self::scoring::{Assessment, Band, Score, assess, assess_raw, classify_total};
pub use self::search::{SearchEntry, SearchIndex};
