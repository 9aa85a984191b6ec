// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::datamodel::{FaqEntry, PageInfo};

const FAQ_ROWS: &[(&str, &str, &str)] = &[
    (
        "faq-tracks",
        "How is a request routed to the Enterprise or Product track?",
        "During Discovery the request is scored on the criteria matrix. A total above 9 goes to the Enterprise track, exactly 9 needs a discussion with the PMO director, and below 9 stays on the Product track.",
    ),
    (
        "faq-raci",
        "What does each RACI designation mean?",
        "Responsible does the work, Accountable owns the outcome and signs off, Consulted gives input before decisions, and Informed is kept up to date after decisions.",
    ),
    (
        "faq-gates",
        "Who approves a gate?",
        "The Accountable role listed for the phase confirms the gate criteria are met. The PMO analyst records the decision.",
    ),
    (
        "faq-hold",
        "What happens when a project is put On Hold?",
        "The project keeps its place in the portfolio with an explicit review date. It re-enters the lifecycle at the phase where it paused.",
    ),
    (
        "faq-dropped",
        "Can a dropped request come back?",
        "Yes. A dropped request re-enters through Idea Intake with a reference to the original record.",
    ),
    (
        "faq-editor",
        "Where are my flow editor changes saved?",
        "The flow editor saves to a local store on your machine. Nothing is sent to a server, and resetting the editor restores the template.",
    ),
];

pub(crate) fn builtin_faq() -> Vec<FaqEntry> {
    FAQ_ROWS
        .iter()
        .map(|(id, question, answer)| FaqEntry {
            id: id.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
        })
        .collect()
}

const PAGE_ROWS: &[(&str, &str, &str, &str)] = &[
    (
        "lifecycle",
        "Lifecycle Overview",
        "Flowchart of both delivery tracks from intake to closure.",
        "index.html",
    ),
    (
        "raci",
        "RACI Matrix",
        "Every role and responsibility across the lifecycle phases.",
        "raci.html",
    ),
    (
        "criteria",
        "Criteria Matrix",
        "Score a request to choose between the Enterprise and Product tracks.",
        "criteria.html",
    ),
    (
        "faq",
        "Frequently Asked Questions",
        "Answers to common questions about the PMO process.",
        "faq.html",
    ),
];

pub(crate) fn builtin_pages() -> Vec<PageInfo> {
    PAGE_ROWS
        .iter()
        .map(|(id, title, summary, url)| PageInfo {
            id: id.to_string(),
            title: title.to_string(),
            summary: summary.to_string(),
            url: url.to_string(),
        })
        .collect()
}
