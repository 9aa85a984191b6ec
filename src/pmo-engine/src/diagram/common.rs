// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in diagram (or container-relative) pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn around(center: Point, half_width: f64, half_height: f64) -> Rect {
        Rect {
            top: center.y - half_height,
            left: center.x - half_width,
            right: center.x + half_width,
            bottom: center.y + half_height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point {
            x: (self.left + self.right) / 2.0,
            y: (self.top + self.bottom) / 2.0,
        }
    }

    /// The same box expressed relative to `origin`'s top-left corner.
    pub fn relative_to(&self, origin: &Rect) -> Rect {
        Rect {
            top: self.top - origin.top,
            left: self.left - origin.left,
            right: self.right - origin.left,
            bottom: self.bottom - origin.top,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Escape text content for XML (inside elements)
pub fn escape_xml_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape attribute values for XML (inside double-quoted attributes)
pub fn escape_xml_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Shortest stable rendering of a coordinate: integers have no decimal
/// point, everything else is rounded to two places with trailing zeros
/// removed so path strings stay compact and deterministic.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "0".to_string();
    }
    let rounded = (n * 100.0).round() / 100.0;
    if rounded == rounded.trunc() && rounded.abs() < 1e15 {
        // avoids "-0"
        return format!("{}", rounded as i64);
    }
    let s = format!("{rounded:.2}");
    s.trim_end_matches('0').to_string()
}

pub fn merge_bounds(a: Rect, b: Rect) -> Rect {
    Rect {
        top: a.top.min(b.top),
        left: a.left.min(b.left),
        right: a.right.max(b.right),
        bottom: a.bottom.max(b.bottom),
    }
}

pub fn calc_view_box(bounds: &[Option<Rect>]) -> Option<Rect> {
    bounds
        .iter()
        .flatten()
        .copied()
        .reduce(merge_bounds)
}

pub fn is_zero(n: f64) -> bool {
    n.abs() < 0.0000001
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml_text() {
        assert_eq!(escape_xml_text("Plan & Fund"), "Plan &amp; Fund");
        assert_eq!(escape_xml_text("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml_text(""), "");
    }

    #[test]
    fn test_escape_xml_attr() {
        assert_eq!(escape_xml_attr("say \"hi\""), "say &quot;hi&quot;");
        assert_eq!(escape_xml_attr("a & b"), "a &amp; b");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(45.0), "45");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-3.125), "-3.13");
        assert_eq!(format_number(10.004), "10");
        assert_eq!(format_number(1.0 / 3.0), "0.33");
        assert_eq!(format_number(f64::NAN), "0");
    }

    #[test]
    fn test_rect_helpers() {
        let r = Rect::around(Point::new(100.0, 50.0), 20.0, 10.0);
        assert_eq!(r.left, 80.0);
        assert_eq!(r.bottom, 60.0);
        assert_eq!(r.width(), 40.0);
        assert_eq!(r.height(), 20.0);
        assert_eq!(r.center(), Point::new(100.0, 50.0));

        let container = Rect {
            top: 10.0,
            left: 30.0,
            right: 500.0,
            bottom: 400.0,
        };
        let rel = r.relative_to(&container);
        assert_eq!(rel.left, 50.0);
        assert_eq!(rel.top, 30.0);
        assert_eq!(rel.width(), r.width());
    }

    #[test]
    fn test_calc_view_box() {
        assert!(calc_view_box(&[]).is_none());
        assert!(calc_view_box(&[None, None]).is_none());

        let r1 = Rect {
            top: 10.0,
            left: 20.0,
            right: 30.0,
            bottom: 40.0,
        };
        let r2 = Rect {
            top: 5.0,
            left: 25.0,
            right: 35.0,
            bottom: 45.0,
        };
        let result = calc_view_box(&[Some(r1), None, Some(r2)]).unwrap();
        assert_eq!(result.top, 5.0);
        assert_eq!(result.left, 20.0);
        assert_eq!(result.right, 35.0);
        assert_eq!(result.bottom, 45.0);
    }

    #[test]
    fn test_is_zero() {
        assert!(is_zero(0.0));
        assert!(is_zero(0.00000001));
        assert!(!is_zero(0.001));
    }
}
