// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! File exports: the lifecycle diagram as SVG (and PNG with `png_render`),
//! a plain-text phase dump for word processors, the RACI roll-up as CSV
//! and the static HTML site.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::catalog::Catalog;
use crate::common::{Error, ErrorCode, ErrorKind, Result};
use crate::config::{LayoutConfig, OverlayConfig};
use crate::diagram::render_lifecycle_svg;
use crate::export_err;
use crate::lookup::{PhaseRecord, lookup_phase};
use crate::pages::{SEARCH_INDEX_FILE, build_site, search_index_json};
use crate::search::SearchIndex;

const CRLF: &str = "\r\n";

pub const RACI_CSV_HEADER: [&str; 5] = ["phase_id", "phase", "role", "designation", "responsibility"];

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(err) = fs::create_dir_all(parent)
    {
        return export_err!(ExportFailed, format!("{}: {err}", parent.display()));
    }
    match fs::write(path, contents) {
        Ok(()) => {
            info!(path = %path.display(), bytes = contents.len(), "exported");
            Ok(())
        }
        Err(err) => export_err!(ExportFailed, format!("{}: {err}", path.display())),
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push_str(CRLF);
}

fn push_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    push_line(out, heading);
    for item in items {
        push_line(out, &format!("  - {item}"));
    }
    push_line(out, "");
}

/// A phase as plain text with CRLF line endings, readable by Word when
/// saved as `.doc`.
pub fn phase_text(record: &PhaseRecord) -> String {
    let details = &record.details;
    let mut out = String::new();

    push_line(&mut out, &format!("{} ({})", record.name, record.id));
    push_line(&mut out, &"=".repeat(record.name.chars().count() + record.id.len() + 3));
    push_line(&mut out, "");
    if !record.description.is_empty() {
        push_line(&mut out, &record.description);
        push_line(&mut out, "");
    }
    if !details.owner.is_empty() {
        push_line(&mut out, &format!("Owner: {}", details.owner));
    }
    if !details.focus.is_empty() {
        push_line(&mut out, &format!("Process focus: {}", details.focus));
    }
    if !details.owner.is_empty() || !details.focus.is_empty() {
        push_line(&mut out, "");
    }
    push_list(&mut out, "Inputs", &details.inputs);
    push_list(&mut out, "Outputs", &details.outputs);
    push_list(&mut out, "Key tasks", &details.tasks);
    push_list(&mut out, "Gate criteria", &details.gate_criteria);
    if !details.raci.is_empty() {
        push_line(&mut out, "RACI");
        for entry in &details.raci {
            push_line(&mut out, &format!("  {}: {}", entry.role, entry.responsibility));
        }
    }
    out
}

fn csv_err(err: csv::Error) -> Error {
    Error::new(ErrorKind::Export, ErrorCode::ExportFailed, Some(err.to_string()))
}

/// Every RACI entry in track order, one row per (phase, role).
pub fn raci_csv(catalog: &Catalog) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(RACI_CSV_HEADER).map_err(csv_err)?;
    for id in catalog.track_phase_ids() {
        let record = lookup_phase(catalog, id);
        for entry in &record.details.raci {
            let designation = entry.designation().map(String::from).unwrap_or_default();
            wtr.write_record([
                record.id.as_str(),
                record.name.as_str(),
                entry.role.as_str(),
                designation.as_str(),
                entry.responsibility.as_str(),
            ])
            .map_err(csv_err)?;
        }
    }

    let bytes = match wtr.into_inner() {
        Ok(bytes) => bytes,
        Err(err) => return export_err!(ExportFailed, err.to_string()),
    };
    match String::from_utf8(bytes) {
        Ok(csv) => Ok(csv),
        Err(err) => export_err!(ExportFailed, err.to_string()),
    }
}

pub fn write_svg(
    path: &Path,
    catalog: &Catalog,
    config: &LayoutConfig,
    overlay: &OverlayConfig,
) -> Result<()> {
    write_file(path, render_lifecycle_svg(catalog, config, overlay).as_bytes())
}

#[cfg(feature = "png_render")]
pub fn write_png(
    path: &Path,
    catalog: &Catalog,
    config: &LayoutConfig,
    overlay: &OverlayConfig,
    opts: &crate::diagram::render_png::PngRenderOpts,
) -> Result<()> {
    let png = crate::diagram::render_png::render_png(catalog, config, overlay, opts)?;
    write_file(path, &png)
}

pub fn write_phase_text(path: &Path, catalog: &Catalog, id: &str) -> Result<()> {
    write_file(path, phase_text(&lookup_phase(catalog, id)).as_bytes())
}

pub fn write_raci_csv(path: &Path, catalog: &Catalog) -> Result<()> {
    write_file(path, raci_csv(catalog)?.as_bytes())
}

/// Writes every site page plus the search index into `dir`. Returns the
/// number of files written.
pub fn write_site(
    dir: &Path,
    catalog: &Catalog,
    config: &LayoutConfig,
    overlay: &OverlayConfig,
) -> Result<usize> {
    let pages = build_site(catalog, config, overlay);
    for page in &pages {
        write_file(&dir.join(&page.file_name), page.html.as_bytes())?;
    }

    let index = SearchIndex::build(catalog);
    let json = match search_index_json(&index) {
        Ok(json) => json,
        Err(err) => return export_err!(ExportFailed, err.to_string()),
    };
    write_file(&dir.join(SEARCH_INDEX_FILE), json.as_bytes())?;

    Ok(pages.len() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_text_uses_crlf() {
        let text = phase_text(&lookup_phase(Catalog::builtin(), "1"));
        assert!(text.starts_with("Discovery (1)\r\n"));
        assert!(text.contains("Gate criteria\r\n  - Discovery brief reviewed by the sponsor\r\n"));
        assert!(text.contains("  Business Sponsor: Accountable: approves the track decision\r\n"));
        // no bare newlines
        assert_eq!(text.matches('\n').count(), text.matches("\r\n").count());
    }

    #[test]
    fn test_placeholder_phase_text() {
        let text = phase_text(&lookup_phase(Catalog::builtin(), "ZZ"));
        assert_eq!(text, "Phase ZZ (ZZ)\r\n=============\r\n\r\n");
    }

    #[test]
    fn test_raci_csv() {
        let csv = raci_csv(Catalog::builtin()).unwrap();
        let mut rdr = csv::ReaderBuilder::new().from_reader(csv.as_bytes());
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), RACI_CSV_HEADER);

        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert!(!rows.is_empty());
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[0][1], "Idea Intake");
        assert_eq!(&rows[0][3], "R");
        // responsibilities contain ':' and stay in one field
        assert!(rows.iter().all(|r| r.len() == RACI_CSV_HEADER.len()));
    }

    #[test]
    fn test_write_site() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_site(
            dir.path(),
            Catalog::builtin(),
            &LayoutConfig::default(),
            &OverlayConfig::default(),
        )
        .unwrap();
        assert_eq!(written, 16);
        assert!(dir.path().join("index.html").exists());
        assert!(dir.path().join("phase-2P.html").exists());
        let index = fs::read_to_string(dir.path().join(SEARCH_INDEX_FILE)).unwrap();
        assert!(index.contains("faq-raci"));
    }

    #[test]
    fn test_write_svg_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("lifecycle.svg");
        write_svg(
            &path,
            Catalog::builtin(),
            &LayoutConfig::default(),
            &OverlayConfig::default(),
        )
        .unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("<svg"));
    }

    #[test]
    fn test_write_failure_is_export_error() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should go
        let err = write_raci_csv(dir.path(), Catalog::builtin()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Export);
        assert_eq!(err.code, ErrorCode::ExportFailed);
    }
}
