// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::datamodel::{
    DetailBundle, ExceptionKind, ExceptionState, Gradient, Phase, RaciEntry, Track,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn raci(entries: &[(&str, &str)]) -> Vec<RaciEntry> {
    entries
        .iter()
        .map(|(role, responsibility)| RaciEntry {
            role: role.to_string(),
            responsibility: responsibility.to_string(),
        })
        .collect()
}

struct PhaseRow<'a> {
    id: &'a str,
    name: &'a str,
    short_label: Option<&'a str>,
    description: &'a str,
    gradient: Gradient,
    owner: &'a str,
    focus: &'a str,
    inputs: &'a [&'a str],
    outputs: &'a [&'a str],
    tasks: &'a [&'a str],
    gate_criteria: &'a [&'a str],
    raci: &'a [(&'a str, &'a str)],
}

impl PhaseRow<'_> {
    fn build(&self) -> Phase {
        Phase {
            id: self.id.to_string(),
            name: self.name.to_string(),
            short_label: self.short_label.map(|s| s.to_string()),
            description: self.description.to_string(),
            gradient: self.gradient,
            details: DetailBundle {
                owner: self.owner.to_string(),
                focus: self.focus.to_string(),
                inputs: strings(self.inputs),
                outputs: strings(self.outputs),
                tasks: strings(self.tasks),
                gate_criteria: strings(self.gate_criteria),
                raci: raci(self.raci),
            },
        }
    }
}

const PHASE_ROWS: &[PhaseRow<'static>] = &[
    PhaseRow {
        id: "0",
        name: "Idea Intake",
        short_label: Some("Intake"),
        description: "A request enters the PMO funnel and is logged with a sponsor and a problem statement.",
        gradient: Gradient::Slate,
        owner: "PMO intake coordinator with the requesting business sponsor",
        focus: "Capture the request consistently so it can be triaged against the rest of the portfolio.",
        inputs: &["Intake request form", "Sponsor problem statement"],
        outputs: &["Logged intake record", "Triage priority"],
        tasks: &[
            "Confirm a named business sponsor",
            "Check the portfolio for duplicate or overlapping requests",
            "Assign a triage priority",
        ],
        gate_criteria: &[
            "Sponsor identified and engaged",
            "Problem statement is specific and measurable",
        ],
        raci: &[
            ("PMO Intake Coordinator", "Responsible: logs and triages the request"),
            ("Business Sponsor", "Accountable: owns the problem statement"),
            ("Portfolio Manager", "Consulted: flags overlaps with in-flight work"),
            ("Department Leads", "Informed: receive the weekly intake digest"),
        ],
    },
    PhaseRow {
        id: "1",
        name: "Discovery",
        short_label: None,
        description: "The team validates the problem, sketches options and scores the request on the criteria matrix.",
        gradient: Gradient::Sky,
        owner: "Assigned project manager and business analyst",
        focus: "Understand the problem well enough to choose between the Enterprise and Product tracks.",
        inputs: &["Logged intake record", "Stakeholder interviews", "Current-state process maps"],
        outputs: &["Discovery brief", "Criteria matrix score", "Track recommendation"],
        tasks: &[
            "Interview impacted stakeholders",
            "Document current-state pain points",
            "Score the request on the criteria matrix",
            "Recommend a delivery track",
        ],
        gate_criteria: &[
            "Discovery brief reviewed by the sponsor",
            "Criteria matrix completed and scored",
            "Track decision recorded",
        ],
        raci: &[
            ("Project Manager", "Responsible: runs discovery and drafts the brief"),
            ("Business Sponsor", "Accountable: approves the track decision"),
            ("Business Analyst", "Responsible: maps current-state process"),
            ("Architecture Review Board", "Consulted: sanity-checks technical options"),
            ("PMO Director", "Informed: sees the score and recommendation"),
        ],
    },
    PhaseRow {
        id: "2E",
        name: "Enterprise Planning",
        short_label: Some("Plan"),
        description: "Cross-functional initiatives build an integrated plan, budget and resourcing model.",
        gradient: Gradient::Indigo,
        owner: "Enterprise program manager with finance partner",
        focus: "Produce a plan that survives portfolio-level scrutiny across departments.",
        inputs: &["Discovery brief", "Criteria matrix score", "Capacity forecast"],
        outputs: &["Integrated project plan", "Budget estimate", "Risk register"],
        tasks: &[
            "Build the integrated schedule",
            "Estimate budget with finance",
            "Secure named resources from each department",
            "Open the risk register",
        ],
        gate_criteria: &[
            "Budget estimate within +/- 20% confidence",
            "Resource commitments signed by department leads",
            "Top five risks have owners and mitigations",
        ],
        raci: &[
            ("Program Manager", "Responsible: owns the integrated plan"),
            ("Executive Sponsor", "Accountable: signs off on scope and budget"),
            ("Finance Partner", "Consulted: validates cost model"),
            ("Department Leads", "Consulted: commit resources"),
            ("Steering Committee", "Informed: receives plan summary"),
        ],
    },
    PhaseRow {
        id: "3E",
        name: "Portfolio Funding",
        short_label: Some("Fund"),
        description: "The steering committee ranks the initiative against the portfolio and releases funding.",
        gradient: Gradient::Violet,
        owner: "Steering committee chaired by the PMO director",
        focus: "Make an explicit funding decision relative to everything else competing for capacity.",
        inputs: &["Integrated project plan", "Budget estimate", "Portfolio ranking"],
        outputs: &["Funding decision", "Approved baseline"],
        tasks: &[
            "Present the plan to the steering committee",
            "Rank against the active portfolio",
            "Record the funding decision and baseline",
        ],
        gate_criteria: &[
            "Funding approved or explicitly deferred",
            "Scope, schedule and cost baseline locked",
        ],
        raci: &[
            ("PMO Director", "Accountable: chairs the funding decision"),
            ("Program Manager", "Responsible: presents the plan"),
            ("Finance Partner", "Consulted: confirms budget availability"),
            ("All Sponsors", "Informed: see the updated portfolio ranking"),
        ],
    },
    PhaseRow {
        id: "2P",
        name: "Product Definition",
        short_label: Some("Define"),
        description: "Single-team product work is shaped into an outcome, a backlog and a release hypothesis.",
        gradient: Gradient::Emerald,
        owner: "Product owner with the delivery team lead",
        focus: "Define the smallest release that tests the outcome the sponsor cares about.",
        inputs: &["Discovery brief", "Criteria matrix score", "Product roadmap"],
        outputs: &["Outcome statement", "Initial backlog", "Release hypothesis"],
        tasks: &[
            "Write the outcome statement",
            "Slice the initial backlog",
            "Agree on success metrics",
        ],
        gate_criteria: &[
            "Outcome and success metrics agreed with the sponsor",
            "Backlog ready for the first two iterations",
        ],
        raci: &[
            ("Product Owner", "Accountable: owns outcome and backlog"),
            ("Delivery Team Lead", "Responsible: sizes and slices the backlog"),
            ("UX Designer", "Consulted: validates user flows"),
            ("PMO Analyst", "Informed: tracks the product in the portfolio view"),
        ],
    },
    PhaseRow {
        id: "3P",
        name: "Roadmap Alignment",
        short_label: Some("Align"),
        description: "The product slot is confirmed on the owning team's roadmap without portfolio-level funding.",
        gradient: Gradient::Teal,
        owner: "Product owner",
        focus: "Fit the work into existing team capacity and make the trade-off visible.",
        inputs: &["Release hypothesis", "Team roadmap", "Capacity plan"],
        outputs: &["Roadmap commitment", "Deferred-items list"],
        tasks: &[
            "Place the release on the team roadmap",
            "Record what was deferred to make room",
        ],
        gate_criteria: &[
            "Roadmap slot confirmed by the team lead",
            "Trade-offs communicated to affected sponsors",
        ],
        raci: &[
            ("Product Owner", "Accountable: confirms the roadmap slot"),
            ("Delivery Team Lead", "Responsible: validates capacity"),
            ("Affected Sponsors", "Informed: told what moved"),
        ],
    },
    PhaseRow {
        id: "4",
        name: "Development",
        short_label: Some("Build"),
        description: "The team builds, tests and iterates against the approved baseline or release hypothesis.",
        gradient: Gradient::Amber,
        owner: "Delivery team lead with the project manager",
        focus: "Deliver working increments and surface variance early.",
        inputs: &["Approved baseline or roadmap commitment", "Backlog", "Risk register"],
        outputs: &["Tested increments", "Status reports", "Change requests"],
        tasks: &[
            "Run iterations and demo increments",
            "Report status weekly",
            "Raise change requests for scope variance",
        ],
        gate_criteria: &[
            "Acceptance criteria met for the release scope",
            "No open severity-one defects",
            "Operational readiness checklist started",
        ],
        raci: &[
            ("Delivery Team Lead", "Responsible: builds and tests"),
            ("Project Manager", "Accountable: schedule and variance reporting"),
            ("QA Lead", "Responsible: test strategy and sign-off"),
            ("Business Sponsor", "Consulted: accepts increments"),
        ],
    },
    PhaseRow {
        id: "5",
        name: "Deployment",
        short_label: Some("Deploy"),
        description: "The release goes live with training, communications and a hypercare window.",
        gradient: Gradient::Rose,
        owner: "Project manager with operations",
        focus: "Move the change into production with the people who will run it ready.",
        inputs: &["Tested release", "Operational readiness checklist", "Training plan"],
        outputs: &["Production release", "Hypercare log"],
        tasks: &[
            "Execute the cutover plan",
            "Deliver end-user training",
            "Staff the hypercare window",
        ],
        gate_criteria: &[
            "Operations accepts the handover",
            "Hypercare exit criteria met",
        ],
        raci: &[
            ("Operations Manager", "Accountable: accepts the system into service"),
            ("Project Manager", "Responsible: runs cutover and hypercare"),
            ("Change Manager", "Responsible: training and communications"),
            ("Service Desk", "Informed: briefed before go-live"),
        ],
    },
    PhaseRow {
        id: "6",
        name: "Closure",
        short_label: Some("Close"),
        description: "Benefits are measured, lessons are captured and the project is formally closed.",
        gradient: Gradient::Slate,
        owner: "PMO analyst with the business sponsor",
        focus: "Confirm the outcome was delivered and feed lessons back into intake.",
        inputs: &["Hypercare log", "Success metrics", "Final financials"],
        outputs: &["Closure report", "Lessons learned", "Benefits tracking plan"],
        tasks: &[
            "Compare outcomes to success metrics",
            "Run the lessons-learned retrospective",
            "Archive project artifacts",
        ],
        gate_criteria: &[
            "Closure report signed by the sponsor",
            "Lessons learned published to the PMO library",
        ],
        raci: &[
            ("PMO Analyst", "Responsible: compiles the closure report"),
            ("Business Sponsor", "Accountable: signs closure"),
            ("Project Manager", "Consulted: contributes lessons learned"),
            ("PMO Director", "Informed: portfolio updated"),
        ],
    },
];

pub(crate) fn builtin_phases() -> Vec<Phase> {
    PHASE_ROWS.iter().map(PhaseRow::build).collect()
}

fn exception(
    kind: ExceptionKind,
    id: &str,
    name: &str,
    description: &str,
    owner: &str,
    focus: &str,
) -> ExceptionState {
    ExceptionState {
        kind,
        phase: Phase {
            id: id.to_string(),
            name: name.to_string(),
            short_label: None,
            description: description.to_string(),
            gradient: Gradient::Neutral,
            details: DetailBundle {
                owner: owner.to_string(),
                focus: focus.to_string(),
                ..DetailBundle::default()
            },
        },
    }
}

pub(crate) fn builtin_exceptions() -> Vec<ExceptionState> {
    vec![
        exception(
            ExceptionKind::Dropped,
            "D",
            "Dropped",
            "The request was withdrawn or declined and leaves the lifecycle.",
            "Business sponsor",
            "Record why the request stopped so the portfolio view stays honest.",
        ),
        exception(
            ExceptionKind::OnHold,
            "H",
            "On Hold",
            "Work is paused pending capacity, funding or a dependency.",
            "PMO director",
            "Keep the request visible with an explicit review date.",
        ),
    ]
}

pub(crate) fn builtin_tracks() -> Vec<Track> {
    let track = |id: &str, name: &str, phases: &[&str]| Track {
        id: id.to_string(),
        name: name.to_string(),
        phases: strings(phases),
    };
    vec![
        track(
            "enterprise",
            "Enterprise",
            &["0", "1", "2E", "3E", "4", "5", "6"],
        ),
        track("product", "Product", &["0", "1", "2P", "3P", "4", "5", "6"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_ids_unique() {
        let phases = builtin_phases();
        let mut ids: Vec<&str> = phases.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), phases.len());
    }

    #[test]
    fn test_every_phase_has_gate_and_raci() {
        for phase in builtin_phases() {
            assert!(!phase.details.gate_criteria.is_empty(), "{}", phase.id);
            assert!(!phase.details.raci.is_empty(), "{}", phase.id);
        }
    }

    #[test]
    fn test_exceptions_have_no_gate_or_raci() {
        for state in builtin_exceptions() {
            assert!(state.phase.details.gate_criteria.is_empty());
            assert!(state.phase.details.raci.is_empty());
        }
    }

    #[test]
    fn test_tracks_share_prefix_and_suffix() {
        let tracks = builtin_tracks();
        let (a, b) = (&tracks[0].phases, &tracks[1].phases);
        assert_eq!(a[..2], b[..2]);
        assert_eq!(a[a.len() - 3..], b[b.len() - 3..]);
        assert_ne!(a[2], b[2]);
    }
}
