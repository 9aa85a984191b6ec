// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use serde::Serialize;

/// Cosmetic two-stop color gradient used to fill a phase node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gradient {
    Slate,
    Sky,
    Indigo,
    Emerald,
    Amber,
    Rose,
    Violet,
    Teal,
    Neutral,
}

impl Gradient {
    pub const ALL: [Gradient; 9] = [
        Gradient::Slate,
        Gradient::Sky,
        Gradient::Indigo,
        Gradient::Emerald,
        Gradient::Amber,
        Gradient::Rose,
        Gradient::Violet,
        Gradient::Teal,
        Gradient::Neutral,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Gradient::Slate => "slate",
            Gradient::Sky => "sky",
            Gradient::Indigo => "indigo",
            Gradient::Emerald => "emerald",
            Gradient::Amber => "amber",
            Gradient::Rose => "rose",
            Gradient::Violet => "violet",
            Gradient::Teal => "teal",
            Gradient::Neutral => "neutral",
        }
    }

    /// (from, to) stop colors.
    pub fn stops(self) -> (&'static str, &'static str) {
        match self {
            Gradient::Slate => ("#64748b", "#334155"),
            Gradient::Sky => ("#38bdf8", "#0369a1"),
            Gradient::Indigo => ("#818cf8", "#4338ca"),
            Gradient::Emerald => ("#34d399", "#047857"),
            Gradient::Amber => ("#fbbf24", "#b45309"),
            Gradient::Rose => ("#fb7185", "#be123c"),
            Gradient::Violet => ("#a78bfa", "#6d28d9"),
            Gradient::Teal => ("#2dd4bf", "#0f766e"),
            Gradient::Neutral => ("#d1d5db", "#9ca3af"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RaciEntry {
    pub role: String,
    pub responsibility: String,
}

impl RaciEntry {
    /// The R/A/C/I letter, taken from a "Responsible: ..." style prefix.
    pub fn designation(&self) -> Option<char> {
        let (prefix, _) = self.responsibility.split_once(':')?;
        match prefix.trim() {
            "Responsible" => Some('R'),
            "Accountable" => Some('A'),
            "Consulted" => Some('C'),
            "Informed" => Some('I'),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DetailBundle {
    pub owner: String,
    pub focus: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub tasks: Vec<String>,
    pub gate_criteria: Vec<String>,
    pub raci: Vec<RaciEntry>,
}

impl DetailBundle {
    pub fn is_empty(&self) -> bool {
        self.owner.is_empty()
            && self.focus.is_empty()
            && self.inputs.is_empty()
            && self.outputs.is_empty()
            && self.tasks.is_empty()
            && self.gate_criteria.is_empty()
            && self.raci.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Phase {
    pub id: String,
    pub name: String,
    pub short_label: Option<String>,
    pub description: String,
    pub gradient: Gradient,
    pub details: DetailBundle,
}

/// Terminal markers a project can land in outside the normal flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionKind {
    Dropped,
    OnHold,
}

/// Same shape as a phase; the detail bundle never carries gate criteria
/// or RACI entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExceptionState {
    pub kind: ExceptionKind,
    pub phase: Phase,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub phases: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FaqEntry {
    pub id: String,
    pub question: String,
    pub answer: String,
}

/// A static reference page in the generated site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(responsibility: &str) -> RaciEntry {
        RaciEntry {
            role: "Project Manager".to_string(),
            responsibility: responsibility.to_string(),
        }
    }

    #[test]
    fn test_raci_designation() {
        assert_eq!(entry("Responsible: runs discovery").designation(), Some('R'));
        assert_eq!(entry("Accountable: signs closure").designation(), Some('A'));
        assert_eq!(entry("Consulted: reviews").designation(), Some('C'));
        assert_eq!(entry("Informed:").designation(), Some('I'));
        assert_eq!(entry("Owns the plan").designation(), None);
        assert_eq!(entry("Sponsor: approves").designation(), None);
    }
}
