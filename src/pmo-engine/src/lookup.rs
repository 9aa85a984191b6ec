// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::datamodel::{DetailBundle, Gradient, Phase};

/// A phase normalized for display. Unknown ids produce a placeholder
/// instead of an error so a diagram never fails to render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PhaseRecord {
    pub id: String,
    pub name: String,
    pub short_label: String,
    pub description: String,
    pub gradient: Gradient,
    pub details: DetailBundle,
    pub placeholder: bool,
}

impl PhaseRecord {
    fn from_phase(phase: &Phase) -> Self {
        PhaseRecord {
            id: phase.id.clone(),
            name: phase.name.clone(),
            short_label: phase
                .short_label
                .clone()
                .unwrap_or_else(|| phase.name.clone()),
            description: phase.description.clone(),
            gradient: phase.gradient,
            details: phase.details.clone(),
            placeholder: false,
        }
    }

    fn placeholder(id: &str) -> Self {
        PhaseRecord {
            id: id.to_string(),
            name: format!("Phase {id}"),
            short_label: id.to_string(),
            description: String::new(),
            gradient: Gradient::Neutral,
            details: DetailBundle::default(),
            placeholder: true,
        }
    }
}

pub fn lookup_phase(catalog: &Catalog, id: &str) -> PhaseRecord {
    match catalog.get_phase(id) {
        Some(phase) => PhaseRecord::from_phase(phase),
        None => {
            debug!(phase_id = id, "unknown phase id, using placeholder");
            PhaseRecord::placeholder(id)
        }
    }
}
