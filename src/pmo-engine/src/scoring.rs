// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The criteria matrix used during Discovery to pick a delivery track.

use std::fmt;

use serde::Serialize;

use crate::common::{Error, ErrorCode, ErrorKind, Result};

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;
pub const DISCUSSION_TOTAL: u8 = 9;

/// One criterion score, restricted to `MIN_SCORE..=MAX_SCORE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Score(u8);

impl Score {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Score {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        if (MIN_SCORE..=MAX_SCORE).contains(&value) {
            Ok(Score(value))
        } else {
            Err(Error::new(
                ErrorKind::Scoring,
                ErrorCode::InvalidScore,
                Some(format!("{value} is not one of {MIN_SCORE}..={MAX_SCORE}")),
            ))
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    ProductOverride,
    DiscussionRequired,
    EnterpriseTrack,
}

impl Band {
    pub fn title(self) -> &'static str {
        match self {
            Band::ProductOverride => "Product Override",
            Band::DiscussionRequired => "Discussion Required",
            Band::EnterpriseTrack => "Enterprise Track",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            Band::ProductOverride => {
                "Keep the request on the Product track and confirm the roadmap slot with the owning team."
            }
            Band::DiscussionRequired => {
                "The score sits on the threshold. Schedule a review with the PMO director before choosing a track."
            }
            Band::EnterpriseTrack => {
                "Route the request to the Enterprise track for integrated planning and portfolio funding."
            }
        }
    }

    pub fn track_id(self) -> Option<&'static str> {
        match self {
            Band::ProductOverride => Some("product"),
            Band::DiscussionRequired => None,
            Band::EnterpriseTrack => Some("enterprise"),
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub total: u8,
    pub band: Band,
}

pub fn classify_total(total: u8) -> Band {
    if total < DISCUSSION_TOTAL {
        Band::ProductOverride
    } else if total == DISCUSSION_TOTAL {
        Band::DiscussionRequired
    } else {
        Band::EnterpriseTrack
    }
}

pub fn assess(impact: Score, reach: Score, investment: Score) -> Assessment {
    let total = impact.value() + reach.value() + investment.value();
    Assessment {
        total,
        band: classify_total(total),
    }
}

/// Validates three raw scores and classifies their sum.
pub fn assess_raw(impact: u8, reach: u8, investment: u8) -> Result<Assessment> {
    Ok(assess(
        Score::try_from(impact)?,
        Score::try_from(reach)?,
        Score::try_from(investment)?,
    ))
}

pub struct Criterion {
    pub name: &'static str,
    pub question: &'static str,
    /// Meaning of each level, lowest first.
    pub levels: [&'static str; 5],
}

pub const CRITERIA: [Criterion; 3] = [
    Criterion {
        name: "Strategic Impact",
        question: "How directly does the request move an enterprise objective?",
        levels: [
            "Local convenience",
            "Team objective",
            "Department objective",
            "Multiple department objectives",
            "Named enterprise objective",
        ],
    },
    Criterion {
        name: "Cross-Functional Reach",
        question: "How many teams must change how they work?",
        levels: [
            "One team",
            "Two teams, same department",
            "Two departments",
            "Three or more departments",
            "Whole organization",
        ],
    },
    Criterion {
        name: "Investment Scale",
        question: "How large is the expected spend and effort?",
        levels: [
            "Within team capacity",
            "Under one quarter of one team",
            "One to two quarters",
            "Dedicated budget line",
            "Capital-level investment",
        ],
    },
];
