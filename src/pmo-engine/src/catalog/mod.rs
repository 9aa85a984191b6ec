// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Static process data: lifecycle phases, exception states, tracks, FAQ
//! entries and the reference pages of the generated site.

mod faq;
mod phases;

use lazy_static::lazy_static;

use crate::datamodel::{ExceptionState, FaqEntry, PageInfo, Phase, Track};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    pub phases: Vec<Phase>,
    pub exceptions: Vec<ExceptionState>,
    pub tracks: Vec<Track>,
    pub faq: Vec<FaqEntry>,
    pub pages: Vec<PageInfo>,
}

lazy_static! {
    static ref BUILTIN: Catalog = Catalog {
        phases: phases::builtin_phases(),
        exceptions: phases::builtin_exceptions(),
        tracks: phases::builtin_tracks(),
        faq: faq::builtin_faq(),
        pages: faq::builtin_pages(),
    };
}

impl Catalog {
    /// The catalog compiled into the binary, built on first use.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Finds a phase or exception state by exact id.
    pub fn get_phase(&self, id: &str) -> Option<&Phase> {
        self.phases
            .iter()
            .find(|p| p.id == id)
            .or_else(|| self.exceptions.iter().map(|e| &e.phase).find(|p| p.id == id))
    }

    pub fn get_track(&self, id: &str) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|t| t.id == id || t.name.eq_ignore_ascii_case(id))
    }

    /// Track phase ids with no matching record, as `(track id, phase id)`.
    /// Rendering tolerates these; this exists for `pmo check` and tests.
    pub fn dangling_references(&self) -> Vec<(String, String)> {
        self.tracks
            .iter()
            .flat_map(|t| {
                t.phases
                    .iter()
                    .filter(|id| self.get_phase(id).is_none())
                    .map(move |id| (t.id.clone(), id.clone()))
            })
            .collect()
    }

    /// Phase ids in first-appearance order across all tracks.
    pub fn track_phase_ids(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for id in self.tracks.iter().flat_map(|t| t.phases.iter()) {
            if !seen.contains(&id.as_str()) {
                seen.push(id);
            }
        }
        seen
    }
}
