// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::pages;

pub const MAX_RESULTS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Page,
    Faq,
    Phase,
    Gate,
    Raci,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub page: String,
    pub url: String,
}

/// Flat list of searchable records, built once from a catalog. Matching is
/// case-insensitive substring search with no ranking beyond source order.
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
    // lowercased (title, content), parallel to `entries`
    folded: Vec<(String, String)>,
}

impl SearchIndex {
    pub fn build(catalog: &Catalog) -> Self {
        let mut entries = Vec::new();

        for page in &catalog.pages {
            entries.push(SearchEntry {
                id: format!("page-{}", page.id),
                title: page.title.clone(),
                content: page.summary.clone(),
                entry_type: EntryType::Page,
                page: page.title.clone(),
                url: page.url.clone(),
            });
        }

        for faq in &catalog.faq {
            entries.push(SearchEntry {
                id: faq.id.clone(),
                title: faq.question.clone(),
                content: faq.answer.clone(),
                entry_type: EntryType::Faq,
                page: "FAQ".to_string(),
                url: format!("faq.html#{}", faq.id),
            });
        }

        for phase in &catalog.phases {
            let url = pages::phase_url(&phase.id);
            let details = &phase.details;
            entries.push(SearchEntry {
                id: format!("phase-{}", phase.id),
                title: phase.name.clone(),
                content: format!("{} {}", phase.description, details.focus),
                entry_type: EntryType::Phase,
                page: phase.name.clone(),
                url: url.clone(),
            });
            if !details.gate_criteria.is_empty() {
                entries.push(SearchEntry {
                    id: format!("gate-{}", phase.id),
                    title: format!("{} gate criteria", phase.name),
                    content: details.gate_criteria.join("; "),
                    entry_type: EntryType::Gate,
                    page: phase.name.clone(),
                    url: format!("{url}#gate"),
                });
            }
            if !details.raci.is_empty() {
                let content = details
                    .raci
                    .iter()
                    .map(|r| format!("{}: {}", r.role, r.responsibility))
                    .collect::<Vec<_>>()
                    .join("; ");
                entries.push(SearchEntry {
                    id: format!("raci-{}", phase.id),
                    title: format!("{} RACI", phase.name),
                    content,
                    entry_type: EntryType::Raci,
                    page: phase.name.clone(),
                    url: format!("{url}#raci"),
                });
            }
        }

        let folded = entries
            .iter()
            .map(|e| (e.title.to_lowercase(), e.content.to_lowercase()))
            .collect();

        SearchIndex { entries, folded }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    /// Entries whose title or content contains any whitespace-separated
    /// token of `query`, at most `MAX_RESULTS`. A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&SearchEntry> {
        let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if tokens.is_empty() {
            return vec![];
        }

        self.entries
            .iter()
            .zip(self.folded.iter())
            .filter(|(_, (title, content))| {
                tokens
                    .iter()
                    .any(|t| title.contains(t.as_str()) || content.contains(t.as_str()))
            })
            .map(|(entry, _)| entry)
            .take(MAX_RESULTS)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn index() -> SearchIndex {
        SearchIndex::build(Catalog::builtin())
    }

    #[test]
    fn test_raci_query_finds_faq_entry() {
        let index = index();
        let results = index.search("raci");
        assert!(results.len() <= MAX_RESULTS);
        assert!(
            results
                .iter()
                .any(|r| r.title == "What does each RACI designation mean?")
        );
    }

    #[test]
    fn test_case_insensitive() {
        let index = index();
        let lower = index.search("discovery");
        let upper = index.search("DISCOVERY");
        assert!(!lower.is_empty());
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_blank_query() {
        assert!(index().search("   ").is_empty());
        assert!(index().search("").is_empty());
    }

    #[test]
    fn test_no_match() {
        assert!(index().search("xylophone").is_empty());
    }

    #[test]
    fn test_any_token_matches() {
        let idx = index();
        let results = idx.search("xylophone hypercare");
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| {
            let text = format!("{} {}", r.title, r.content).to_lowercase();
            text.contains("hypercare")
        }));
    }

    #[test]
    fn test_source_order_pages_first() {
        let idx = index();
        let results = idx.search("matrix");
        assert_eq!(results[0].entry_type, EntryType::Page);
    }

    #[test]
    fn test_phase_entries_link_to_phase_pages() {
        let idx = index();
        let results = idx.search("Portfolio Funding");
        let phase = results
            .iter()
            .find(|r| r.entry_type == EntryType::Phase && r.title == "Portfolio Funding")
            .unwrap();
        assert_eq!(phase.url, "phase-3E.html");
    }

    proptest! {
        #[test]
        fn results_bounded_and_relevant(query in "[a-zA-Z]{1,6}( [a-zA-Z]{1,6}){0,2}") {
            let index = index();
            let results = index.search(&query);
            prop_assert!(results.len() <= MAX_RESULTS);
            let tokens: Vec<String> = query.split_whitespace().map(|t| t.to_lowercase()).collect();
            for r in results {
                let title = r.title.to_lowercase();
                let content = r.content.to_lowercase();
                prop_assert!(tokens.iter().any(|t| title.contains(t.as_str()) || content.contains(t.as_str())));
            }
        }
    }
}
