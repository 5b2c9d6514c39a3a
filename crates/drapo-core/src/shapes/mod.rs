//! Geometry of the interactive shapes.
//!
//! Everything here works on pixel coordinates and is free of canvas state:
//! shapes convert to data coordinates only when pushing geometry to their
//! artists, so the update rules hold on log axes as well.

pub mod cursor;
pub mod line;
pub mod rect;

use std::fmt;

use kurbo::{ParamCurveNearest, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for interactive objects.
pub type ShapeId = Uuid;

/// The closed set of interactive object types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Cursor,
    Line,
    Rect,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Cursor, ShapeKind::Line, ShapeKind::Rect];

    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Cursor => "Cursor",
            ShapeKind::Line => "Draggable Line",
            ShapeKind::Rect => "Draggable Rectangle",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Role of a drawable element within its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementRole {
    /// Line endpoint (0 or 1).
    Endpoint(usize),
    /// Segment joining the two line endpoints.
    Link,
    /// Rectangle corner, counter-clockwise from the bottom-left one.
    Corner(usize),
    /// Rectangle edge `j`, joining corners `j` and `j + 1`.
    Edge(usize),
    /// Rectangle center.
    Center,
    /// Horizontal cursor line.
    HLine,
    /// Vertical cursor line.
    VLine,
    /// Mark left at recorded click `i`.
    Mark(usize),
}

impl ElementRole {
    /// Whether the element is a single tracked point (as opposed to a segment).
    pub fn is_point(&self) -> bool {
        matches!(
            self,
            ElementRole::Endpoint(_) | ElementRole::Corner(_) | ElementRole::Center
        )
    }
}

/// How a shape follows the mouse during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionMode {
    /// Rigid rectangle translation.
    Center,
    /// A vertical rectangle edge slides horizontally.
    VertEdge { edge: usize },
    /// A horizontal rectangle edge slides vertically.
    HorzEdge { edge: usize },
    /// One rectangle corner follows the mouse, the opposite corner stays put.
    Corner(usize),
    /// Rigid line translation.
    Whole,
    /// One line endpoint follows the mouse.
    Edge(usize),
}

/// Distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    if a == b {
        return p.distance(a);
    }
    kurbo::Line::new(a, b).nearest(p, 1e-9).distance_sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((distance_to_segment(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-9);
        // Beyond the end the distance is to the endpoint.
        assert!((distance_to_segment(Point::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-9);
        assert!((distance_to_segment(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_roles() {
        assert!(ElementRole::Corner(2).is_point());
        assert!(ElementRole::Center.is_point());
        assert!(!ElementRole::Edge(1).is_point());
        assert!(!ElementRole::Link.is_point());
    }
}
