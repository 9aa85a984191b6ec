// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Static HTML site: one shell template with header, nav and breadcrumb,
//! filled in per page.

use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::config::{LayoutConfig, OverlayConfig};
use crate::datamodel::RaciEntry;
use crate::diagram::common::{escape_xml_attr, escape_xml_text};
use crate::diagram::render_lifecycle_svg;
use crate::lookup::{PhaseRecord, lookup_phase};
use crate::scoring::{Band, CRITERIA, DISCUSSION_TOTAL, MAX_SCORE, MIN_SCORE};
use crate::search::{SearchEntry, SearchIndex};

pub const SEARCH_INDEX_FILE: &str = "search-index.json";
pub const SEARCH_PAGE_FILE: &str = "search.html";

const SHELL: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>__TITLE__ | PMO Lifecycle</title>
<style>
body { margin: 0; font-family: Arial, sans-serif; color: #1f2937; background: #f8fafc; }
.pmo-header { display: flex; align-items: center; gap: 24px; padding: 12px 24px; background: #0f172a; }
.pmo-brand { color: #fff; font-weight: bold; text-decoration: none; }
.pmo-nav a { color: #cbd5e1; margin-right: 16px; text-decoration: none; }
.pmo-nav a.active { color: #fff; border-bottom: 2px solid #38bdf8; }
.pmo-breadcrumb { padding: 8px 24px; font-size: 13px; color: #64748b; }
.pmo-breadcrumb a { color: #0369a1; }
main { padding: 0 24px 48px; max-width: 1100px; }
table { border-collapse: collapse; margin: 12px 0; }
th, td { border: 1px solid #cbd5e1; padding: 6px 10px; text-align: left; vertical-align: top; }
th { background: #e2e8f0; }
.pmo-placeholder-note { color: #9ca3af; font-style: italic; }
.pmo-band { font-weight: bold; }
</style>
</head>
<body>
<header class="pmo-header">
<a class="pmo-brand" href="index.html">PMO Lifecycle</a>
<nav class="pmo-nav">__NAV__</nav>
</header>
<nav class="pmo-breadcrumb" aria-label="Breadcrumb">__BREADCRUMB__</nav>
<main>
__BODY__
</main>
</body>
</html>
"##;

/// A rendered page and the file name it is written under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SitePage {
    pub file_name: String,
    pub title: String,
    pub html: String,
}

pub fn phase_url(id: &str) -> String {
    format!("phase-{id}.html")
}

fn nav(catalog: &Catalog, active_url: &str) -> String {
    catalog
        .pages
        .iter()
        .map(|page| {
            let class = if page.url == active_url {
                " class=\"active\""
            } else {
                ""
            };
            format!(
                "<a href=\"{}\"{class}>{}</a>",
                escape_xml_attr(&page.url),
                escape_xml_text(&page.title)
            )
        })
        .collect()
}

/// Home, then each `(title, url)` step; the last step is the current page
/// and is not linked.
fn breadcrumb(steps: &[(&str, &str)]) -> String {
    let mut crumbs = vec!["<a href=\"index.html\">Home</a>".to_string()];
    for (i, (title, url)) in steps.iter().enumerate() {
        if i + 1 == steps.len() {
            crumbs.push(format!("<span aria-current=\"page\">{}</span>", escape_xml_text(title)));
        } else {
            crumbs.push(format!(
                "<a href=\"{}\">{}</a>",
                escape_xml_attr(url),
                escape_xml_text(title)
            ));
        }
    }
    crumbs.join(" / ")
}

fn shell(catalog: &Catalog, title: &str, active_url: &str, crumbs: &[(&str, &str)], body: &str) -> String {
    // body goes last so its text is never scanned for placeholders
    SHELL
        .replace("__TITLE__", &escape_xml_text(title))
        .replace("__NAV__", &nav(catalog, active_url))
        .replace("__BREADCRUMB__", &breadcrumb(crumbs))
        .replace("__BODY__", body)
}

fn page_title<'a>(catalog: &'a Catalog, url: &str, fallback: &'a str) -> &'a str {
    catalog
        .pages
        .iter()
        .find(|p| p.url == url)
        .map(|p| p.title.as_str())
        .unwrap_or(fallback)
}

fn list(items: &[String]) -> String {
    let mut html = String::from("<ul>");
    for item in items {
        html.push_str(&format!("<li>{}</li>", escape_xml_text(item)));
    }
    html.push_str("</ul>");
    html
}

fn section(id: Option<&str>, heading: &str, inner: &str) -> String {
    let id_attr = id.map(|id| format!(" id=\"{id}\"")).unwrap_or_default();
    format!("<section{id_attr}><h2>{heading}</h2>{inner}</section>")
}

fn raci_table(entries: &[RaciEntry]) -> String {
    let mut html = String::from("<table><tr><th>Role</th><th>Responsibility</th></tr>");
    for entry in entries {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            escape_xml_text(&entry.role),
            escape_xml_text(&entry.responsibility)
        ));
    }
    html.push_str("</table>");
    html
}

pub fn index_page(catalog: &Catalog, config: &LayoutConfig, overlay: &OverlayConfig) -> SitePage {
    let url = "index.html";
    let title = page_title(catalog, url, "Lifecycle Overview");

    let mut body = format!("<h1>{}</h1>", escape_xml_text(title));
    body.push_str("<figure class=\"pmo-diagram\">");
    body.push_str(&render_lifecycle_svg(catalog, config, overlay));
    body.push_str("</figure>");

    let mut tracks = String::new();
    for track in &catalog.tracks {
        let steps: Vec<String> = track
            .phases
            .iter()
            .map(|id| {
                let record = lookup_phase(catalog, id);
                format!(
                    "<a href=\"{}\">{}</a>",
                    phase_url(&record.id),
                    escape_xml_text(&record.name)
                )
            })
            .collect();
        tracks.push_str(&format!(
            "<p><strong>{}</strong>: {}</p>",
            escape_xml_text(&track.name),
            steps.join(" &#8594; ")
        ));
    }
    body.push_str(&section(Some("tracks"), "Tracks", &tracks));

    if !catalog.exceptions.is_empty() {
        let mut exceptions = String::from("<ul>");
        for state in &catalog.exceptions {
            exceptions.push_str(&format!(
                "<li><a href=\"{}\">{}</a>: {}</li>",
                phase_url(&state.phase.id),
                escape_xml_text(&state.phase.name),
                escape_xml_text(&state.phase.description)
            ));
        }
        exceptions.push_str("</ul>");
        body.push_str(&section(Some("exceptions"), "Exception states", &exceptions));
    }

    SitePage {
        file_name: url.to_string(),
        title: title.to_string(),
        html: shell(catalog, title, url, &[], &body),
    }
}

/// The detail view for a single phase. Sections with no data are left out;
/// a placeholder record gets a short notice instead.
pub fn phase_page(catalog: &Catalog, record: &PhaseRecord) -> SitePage {
    let url = phase_url(&record.id);
    let details = &record.details;

    let mut body = format!(
        "<article class=\"pmo-phase-detail\" data-phase=\"{}\"><h1>{}</h1>",
        escape_xml_attr(&record.id),
        escape_xml_text(&record.name)
    );
    if record.placeholder || details.is_empty() {
        body.push_str("<p class=\"pmo-placeholder-note\">No details are recorded for this phase.</p>");
    }
    if !record.description.is_empty() {
        body.push_str(&format!("<p>{}</p>", escape_xml_text(&record.description)));
    }
    if !details.owner.is_empty() {
        body.push_str(&format!(
            "<p><strong>Owner:</strong> {}</p>",
            escape_xml_text(&details.owner)
        ));
    }
    if !details.focus.is_empty() {
        body.push_str(&section(
            Some("focus"),
            "Process focus",
            &format!("<p>{}</p>", escape_xml_text(&details.focus)),
        ));
    }
    if !details.inputs.is_empty() {
        body.push_str(&section(Some("inputs"), "Inputs", &list(&details.inputs)));
    }
    if !details.outputs.is_empty() {
        body.push_str(&section(Some("outputs"), "Outputs", &list(&details.outputs)));
    }
    if !details.tasks.is_empty() {
        body.push_str(&section(Some("tasks"), "Key tasks", &list(&details.tasks)));
    }
    if !details.gate_criteria.is_empty() {
        body.push_str(&section(Some("gate"), "Gate criteria", &list(&details.gate_criteria)));
    }
    if !details.raci.is_empty() {
        body.push_str(&section(Some("raci"), "RACI", &raci_table(&details.raci)));
    }

    let mut neighbors = String::new();
    for track in &catalog.tracks {
        let Some(pos) = track.phases.iter().position(|id| *id == record.id) else {
            continue;
        };
        let prev = pos.checked_sub(1).and_then(|i| track.phases.get(i));
        let next = track.phases.get(pos + 1);
        let link = |id: &String, rel: &str| {
            let target = lookup_phase(catalog, id);
            format!(
                "<a rel=\"{rel}\" href=\"{}\">{}</a>",
                phase_url(&target.id),
                escape_xml_text(&target.name)
            )
        };
        neighbors.push_str(&format!(
            "<li>{}: {} | {}</li>",
            escape_xml_text(&track.name),
            prev.map(|id| link(id, "prev")).unwrap_or_else(|| "start".to_string()),
            next.map(|id| link(id, "next")).unwrap_or_else(|| "end".to_string()),
        ));
    }
    if !neighbors.is_empty() {
        body.push_str(&section(
            Some("tracks"),
            "In the lifecycle",
            &format!("<ul>{neighbors}</ul>"),
        ));
    }
    body.push_str("</article>");

    let overview = page_title(catalog, "index.html", "Lifecycle Overview");
    SitePage {
        file_name: url.clone(),
        title: record.name.clone(),
        html: shell(
            catalog,
            &record.name,
            "",
            &[(overview, "index.html"), (record.name.as_str(), url.as_str())],
            &body,
        ),
    }
}

/// Every RACI entry grouped by phase, plus a role x phase roll-up of
/// designation letters.
pub fn raci_page(catalog: &Catalog) -> SitePage {
    let url = "raci.html";
    let title = page_title(catalog, url, "RACI Matrix");
    let phases: Vec<PhaseRecord> = catalog
        .track_phase_ids()
        .into_iter()
        .map(|id| lookup_phase(catalog, id))
        .filter(|r| !r.details.raci.is_empty())
        .collect();

    // role -> phase id -> letters
    let mut rollup: BTreeMap<&str, BTreeMap<&str, String>> = BTreeMap::new();
    for record in &phases {
        for entry in &record.details.raci {
            let letters = rollup
                .entry(entry.role.as_str())
                .or_default()
                .entry(record.id.as_str())
                .or_default();
            if let Some(letter) = entry.designation()
                && !letters.contains(letter)
            {
                letters.push(letter);
            }
        }
    }

    let mut matrix = String::from("<table><tr><th>Role</th>");
    for record in &phases {
        matrix.push_str(&format!(
            "<th><a href=\"{}\">{}</a></th>",
            phase_url(&record.id),
            escape_xml_text(&record.short_label)
        ));
    }
    matrix.push_str("</tr>");
    for (role, cells) in &rollup {
        matrix.push_str(&format!("<tr><td>{}</td>", escape_xml_text(role)));
        for record in &phases {
            let letters = cells.get(record.id.as_str()).map(String::as_str).unwrap_or("");
            matrix.push_str(&format!("<td>{letters}</td>"));
        }
        matrix.push_str("</tr>");
    }
    matrix.push_str("</table>");

    let mut body = format!("<h1>{}</h1>", escape_xml_text(title));
    body.push_str(&section(Some("rollup"), "Roll-up", &matrix));
    for record in &phases {
        body.push_str(&section(
            Some(format!("raci-{}", record.id).as_str()),
            &format!(
                "<a href=\"{}#raci\">{}</a>",
                phase_url(&record.id),
                escape_xml_text(&record.name)
            ),
            &raci_table(&record.details.raci),
        ));
    }

    SitePage {
        file_name: url.to_string(),
        title: title.to_string(),
        html: shell(catalog, title, url, &[(title, url)], &body),
    }
}

/// The criteria matrix: level descriptions per criterion and the band
/// each possible total falls into.
pub fn criteria_page(catalog: &Catalog) -> SitePage {
    let url = "criteria.html";
    let title = page_title(catalog, url, "Criteria Matrix");

    let mut levels = String::from("<table><tr><th>Criterion</th>");
    for score in MIN_SCORE..=MAX_SCORE {
        levels.push_str(&format!("<th>{score}</th>"));
    }
    levels.push_str("</tr>");
    for criterion in &CRITERIA {
        levels.push_str(&format!(
            "<tr><td><strong>{}</strong><br>{}</td>",
            escape_xml_text(criterion.name),
            escape_xml_text(criterion.question)
        ));
        for level in criterion.levels {
            levels.push_str(&format!("<td>{}</td>", escape_xml_text(level)));
        }
        levels.push_str("</tr>");
    }
    levels.push_str("</table>");

    let lowest = MIN_SCORE * CRITERIA.len() as u8;
    let highest = MAX_SCORE * CRITERIA.len() as u8;
    let bands = [
        (Band::ProductOverride, format!("{lowest} to {}", DISCUSSION_TOTAL - 1)),
        (Band::DiscussionRequired, DISCUSSION_TOTAL.to_string()),
        (Band::EnterpriseTrack, format!("{} to {highest}", DISCUSSION_TOTAL + 1)),
    ];
    let mut thresholds =
        String::from("<table><tr><th>Total</th><th>Result</th><th>Recommendation</th></tr>");
    for (band, range) in bands {
        thresholds.push_str(&format!(
            "<tr><td>{range}</td><td class=\"pmo-band\">{}</td><td>{}</td></tr>",
            escape_xml_text(band.title()),
            escape_xml_text(band.recommendation())
        ));
    }
    thresholds.push_str("</table>");

    let mut body = format!("<h1>{}</h1>", escape_xml_text(title));
    body.push_str(&format!(
        "<p>Score each criterion from {MIN_SCORE} to {MAX_SCORE} and add the three scores. Run <code>pmo score</code> to classify a request.</p>"
    ));
    body.push_str(&section(Some("levels"), "Criteria", &levels));
    body.push_str(&section(Some("bands"), "Thresholds", &thresholds));

    SitePage {
        file_name: url.to_string(),
        title: title.to_string(),
        html: shell(catalog, title, url, &[(title, url)], &body),
    }
}

pub fn faq_page(catalog: &Catalog) -> SitePage {
    let url = "faq.html";
    let title = page_title(catalog, url, "Frequently Asked Questions");
    let mut body = format!("<h1>{}</h1>", escape_xml_text(title));
    for entry in &catalog.faq {
        body.push_str(&format!(
            "<section id=\"{}\"><h2>{}</h2><p>{}</p></section>",
            escape_xml_attr(&entry.id),
            escape_xml_text(&entry.question),
            escape_xml_text(&entry.answer)
        ));
    }
    SitePage {
        file_name: url.to_string(),
        title: title.to_string(),
        html: shell(catalog, title, url, &[(title, url)], &body),
    }
}

/// Results for one query, in the order `SearchIndex::search` returns them.
pub fn search_page(catalog: &Catalog, query: &str, results: &[&SearchEntry]) -> SitePage {
    let title = "Search";
    let mut body = format!(
        "<h1>Search results for &quot;{}&quot;</h1>",
        escape_xml_text(query)
    );
    if results.is_empty() {
        body.push_str("<p class=\"pmo-placeholder-note\">No results.</p>");
    } else {
        body.push_str("<ol class=\"pmo-results\">");
        for entry in results {
            body.push_str(&format!(
                "<li><a href=\"{}\">{}</a> <small>{}</small><p>{}</p></li>",
                escape_xml_attr(&entry.url),
                escape_xml_text(&entry.title),
                escape_xml_text(&entry.page),
                escape_xml_text(&entry.content)
            ));
        }
        body.push_str("</ol>");
    }
    SitePage {
        file_name: SEARCH_PAGE_FILE.to_string(),
        title: title.to_string(),
        html: shell(catalog, title, "", &[(title, SEARCH_PAGE_FILE)], &body),
    }
}

/// Every page of the site: the overview, the reference pages and one
/// detail page per phase and exception state.
pub fn build_site(
    catalog: &Catalog,
    config: &LayoutConfig,
    overlay: &OverlayConfig,
) -> Vec<SitePage> {
    let mut pages = vec![
        index_page(catalog, config, overlay),
        raci_page(catalog),
        criteria_page(catalog),
        faq_page(catalog),
    ];
    let ids = catalog
        .track_phase_ids()
        .into_iter()
        .chain(catalog.exceptions.iter().map(|e| e.phase.id.as_str()));
    for id in ids {
        pages.push(phase_page(catalog, &lookup_phase(catalog, id)));
    }
    pages
}

/// The search records as JSON, for client-side lookup on the static site.
pub fn search_index_json(index: &SearchIndex) -> serde_json::Result<String> {
    serde_json::to_string_pretty(index.entries())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> &'static Catalog {
        Catalog::builtin()
    }

    #[test]
    fn test_phase_url() {
        assert_eq!(phase_url("2E"), "phase-2E.html");
    }

    #[test]
    fn test_shell_fills_every_placeholder() {
        let page = faq_page(catalog());
        assert!(page.html.starts_with("<!DOCTYPE html>"));
        for marker in ["__TITLE__", "__NAV__", "__BREADCRUMB__", "__BODY__"] {
            assert!(!page.html.contains(marker), "{marker} left in page");
        }
        assert!(page.html.contains("<a href=\"faq.html\" class=\"active\">"));
        assert!(page.html.contains("<span aria-current=\"page\">Frequently Asked Questions</span>"));
    }

    #[test]
    fn test_faq_anchors() {
        let page = faq_page(catalog());
        assert!(page.html.contains("<section id=\"faq-raci\">"));
        assert!(page.html.contains("What does each RACI designation mean?"));
    }

    #[test]
    fn test_phase_page_sections() {
        let record = lookup_phase(catalog(), "1");
        let page = phase_page(catalog(), &record);
        assert_eq!(page.file_name, "phase-1.html");
        assert!(page.html.contains("<section id=\"gate\">"));
        assert!(page.html.contains("<section id=\"raci\">"));
        assert!(page.html.contains("Criteria matrix completed and scored"));
        // Discovery is shared, so it links forward on both tracks
        assert!(page.html.contains("href=\"phase-2E.html\""));
        assert!(page.html.contains("href=\"phase-2P.html\""));
        assert!(!page.html.contains("pmo-placeholder-note"));
    }

    #[test]
    fn test_exception_page_has_no_gate() {
        let record = lookup_phase(catalog(), "H");
        let page = phase_page(catalog(), &record);
        assert!(!page.html.contains("<section id=\"gate\">"));
        assert!(!page.html.contains("<section id=\"raci\">"));
        assert!(page.html.contains("<strong>Owner:</strong>"));
    }

    #[test]
    fn test_placeholder_page() {
        let record = lookup_phase(catalog(), "ZZ");
        let page = phase_page(catalog(), &record);
        assert!(page.html.contains("Phase ZZ"));
        assert!(page.html.contains("pmo-placeholder-note"));
    }

    #[test]
    fn test_criteria_page_thresholds() {
        let page = criteria_page(catalog());
        assert!(page.html.contains("<td>3 to 8</td>"));
        assert!(page.html.contains("<td>9</td><td class=\"pmo-band\">Discussion Required</td>"));
        assert!(page.html.contains("<td>10 to 15</td>"));
        assert!(page.html.contains("Named enterprise objective"));
    }

    #[test]
    fn test_raci_rollup() {
        let page = raci_page(catalog());
        assert!(page.html.contains("<td>Business Sponsor</td>"));
        assert!(page.html.contains("<section id=\"raci-0\">"));
        assert!(page.html.contains("<td>A</td>"));
    }

    #[test]
    fn test_index_embeds_diagram() {
        let page = index_page(catalog(), &LayoutConfig::default(), &OverlayConfig::default());
        assert!(page.html.contains("<svg"));
        assert!(page.html.contains("class=\"pmo-canvas\""));
        assert!(page.html.contains("<strong>Product</strong>"));
    }

    #[test]
    fn test_build_site_pages() {
        let pages = build_site(catalog(), &LayoutConfig::default(), &OverlayConfig::default());
        let names: Vec<&str> = pages.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(&names[..4], ["index.html", "raci.html", "criteria.html", "faq.html"]);
        // nine track phases and two exception states
        assert_eq!(names.len(), 4 + 9 + 2);
        assert!(names.contains(&"phase-D.html"));
    }

    #[test]
    fn test_search_page() {
        let index = SearchIndex::build(catalog());
        let results = index.search("raci");
        let page = search_page(catalog(), "raci <b>", &results);
        assert!(page.html.contains("&quot;raci &lt;b&gt;&quot;"));
        assert!(page.html.contains("faq.html#faq-raci"));

        let empty = search_page(catalog(), "xylophone", &[]);
        assert!(empty.html.contains("No results."));
    }

    #[test]
    fn test_search_index_json() {
        let index = SearchIndex::build(catalog());
        let json = search_index_json(&index).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entries = parsed.as_array().unwrap();
        assert_eq!(entries.len(), index.len());
        assert_eq!(entries[0]["type"], "page");
    }
}
