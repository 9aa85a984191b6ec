// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

pub const PHASE_RADIUS: f64 = 34.0;
pub const EXCEPTION_RADIUS: f64 = 22.0;
pub const DECISION_HALF_DIAGONAL: f64 = 30.0;
pub const ARROWHEAD_RADIUS: f64 = 6.0;
pub const LINE_SPACING: f64 = 14.0;
pub const LABEL_PADDING: f64 = 6.0;
pub const LANE_PADDING: f64 = 24.0;
pub const LANE_TITLE_HEIGHT: f64 = 22.0;
pub const LANE_CORNER_RADIUS: f64 = 12.0;
pub const CHAR_WIDTH: f64 = 6.5;
pub const VIEW_BOX_MARGIN: i64 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_fits_between_phases() {
        assert!(DECISION_HALF_DIAGONAL < PHASE_RADIUS);
        assert!(EXCEPTION_RADIUS < PHASE_RADIUS);
    }
}
