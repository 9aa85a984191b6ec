// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! SVG-to-PNG rasterization using resvg.
//!
//! Fonts come from the host system, so text appearance follows whatever
//! the machine running the export has installed.

use std::sync::Arc;

use resvg::tiny_skia;
use resvg::usvg;

use crate::catalog::Catalog;
use crate::common::{Error, ErrorCode, ErrorKind, Result};
use crate::config::{LayoutConfig, OverlayConfig};

/// Target size of the output image. Only one dimension is honored; the
/// other follows the SVG's aspect ratio. With neither set the SVG's own
/// size is used.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngRenderOpts {
    pub width: Option<u32>,
    /// Ignored when `width` is set.
    pub height: Option<u32>,
}

fn png_err(details: String) -> Error {
    Error::new(ErrorKind::Export, ErrorCode::ExportFailed, Some(details))
}

pub fn render_png(
    catalog: &Catalog,
    config: &LayoutConfig,
    overlay: &OverlayConfig,
    opts: &PngRenderOpts,
) -> Result<Vec<u8>> {
    let svg = super::render_lifecycle_svg(catalog, config, overlay);
    svg_to_png(&svg, opts)
}

pub fn svg_to_png(svg_str: &str, opts: &PngRenderOpts) -> Result<Vec<u8>> {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();

    let usvg_opts = usvg::Options {
        font_family: "Arial".to_string(),
        fontdb: Arc::new(fontdb),
        ..usvg::Options::default()
    };

    let tree = usvg::Tree::from_str(svg_str, &usvg_opts)
        .map_err(|e| png_err(format!("failed to parse SVG: {e}")))?;

    let svg_size = tree.size();
    let svg_w = svg_size.width();
    let svg_h = svg_size.height();

    let (px_w, px_h) = match (opts.width, opts.height) {
        (Some(w), _) => {
            let scale = w as f32 / svg_w;
            (w, (svg_h * scale).ceil() as u32)
        }
        (None, Some(h)) => {
            let scale = h as f32 / svg_h;
            ((svg_w * scale).ceil() as u32, h)
        }
        (None, None) => (svg_w.ceil() as u32, svg_h.ceil() as u32),
    };

    if px_w == 0 || px_h == 0 {
        return Err(png_err("computed image dimensions are zero".to_string()));
    }

    let mut pixmap = tiny_skia::Pixmap::new(px_w, px_h)
        .ok_or_else(|| png_err("failed to allocate pixmap".to_string()))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let transform = tiny_skia::Transform::from_scale(px_w as f32 / svg_w, px_h as f32 / svg_h);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| png_err(format!("failed to encode PNG: {e}")))
}
