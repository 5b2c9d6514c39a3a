//! Rectangle geometry: four corners, four edges and a center.
//!
//! Corners are numbered counter-clockwise from the bottom-left one:
//!
//! ```text
//!   3 ───── edge 2 ───── 2
//!   │                    │
//! edge 3               edge 1
//!   │                    │
//!   0 ───── edge 0 ───── 1
//! ```
//!
//! Edge `j` joins corners `j` and `j + 1`, so corner `i` touches edges `i`
//! and `i - 1` (mod 4). Even edges are horizontal, odd edges vertical.

use kurbo::Point;

use super::{ElementRole, MotionMode, distance_to_segment};
use crate::transform::DataTransform;

/// Size of a new rectangle relative to the view box.
pub const DEFAULT_RELATIVE_SIZE: f64 = 0.5;

pub fn next_corner(i: usize) -> usize {
    (i + 1) % 4
}

pub fn prev_corner(i: usize) -> usize {
    (i + 3) % 4
}

pub fn opposite_corner(i: usize) -> usize {
    (i + 2) % 4
}

/// Corners joined by edge `j`.
pub fn edge_corners(j: usize) -> (usize, usize) {
    (j % 4, next_corner(j))
}

/// Edges touching corner `i`.
pub fn corner_edges(i: usize) -> (usize, usize) {
    (i % 4, prev_corner(i))
}

pub fn is_horizontal(j: usize) -> bool {
    j % 2 == 0
}

/// Edge shared by two corners, if they are adjacent.
pub fn shared_edge(a: usize, b: usize) -> Option<usize> {
    if next_corner(a) == b % 4 {
        Some(a % 4)
    } else if next_corner(b) == a % 4 {
        Some(b % 4)
    } else {
        None
    }
}

/// Corner shared by two edges, if they are adjacent.
pub fn shared_corner(a: usize, b: usize) -> Option<usize> {
    if next_corner(a) == b % 4 {
        Some(b % 4)
    } else if next_corner(b) == a % 4 {
        Some(a % 4)
    } else {
        None
    }
}

/// Motion mode for dragging edge `j`.
pub fn edge_mode(j: usize) -> MotionMode {
    if is_horizontal(j) {
        MotionMode::HorzEdge { edge: j % 4 }
    } else {
        MotionMode::VertEdge { edge: j % 4 }
    }
}

/// Tracked points of a rectangle, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPoints {
    pub corners: [Point; 4],
    pub center: Point,
}

impl RectPoints {
    /// Axis-aligned rectangle from two opposite corners.
    pub fn from_box(p0: Point, p1: Point) -> Self {
        let corners = [
            Point::new(p0.x, p0.y),
            Point::new(p1.x, p0.y),
            Point::new(p1.x, p1.y),
            Point::new(p0.x, p1.y),
        ];
        Self {
            corners,
            center: p0.midpoint(p1),
        }
    }

    /// Endpoints of edge `j`.
    pub fn edge(&self, j: usize) -> (Point, Point) {
        let (a, b) = edge_corners(j);
        (self.corners[a], self.corners[b])
    }

    pub fn map(&self, f: impl Fn(Point) -> Point) -> Self {
        Self {
            corners: self.corners.map(&f),
            center: f(self.center),
        }
    }
}

/// Default rectangle centered in the view box, in pixels.
pub fn default_points(transform: &DataTransform) -> RectPoints {
    let (lo, hi) = transform.view_px();
    let margin = (1.0 - DEFAULT_RELATIVE_SIZE) / 2.0;
    let at = |f: f64| Point::new(lo.x + f * (hi.x - lo.x), lo.y + f * (hi.y - lo.y));
    RectPoints::from_box(at(margin), at(1.0 - margin))
}

/// Rectangle `(x, y, width, height)` given in data coordinates, in pixels.
pub fn points_from_position(transform: &DataTransform, (x, y, w, h): (f64, f64, f64, f64)) -> RectPoints {
    let p0 = transform.data_to_px(Point::new(x, y));
    let p1 = transform.data_to_px(Point::new(x + w, y + h));
    RectPoints::from_box(p0, p1)
}

/// `(xmin, ymin, width, height)` of a set of corners.
pub fn position_of(corners: &[Point; 4]) -> (f64, f64, f64, f64) {
    let xmin = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let xmax = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let ymin = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let ymax = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    (xmin, ymin, xmax - xmin, ymax - ymin)
}

/// Elements of a rectangle hit by a press at `click`.
pub fn hit_test(points: &RectPoints, click: Point, point_radius: f64, edge_radius: f64) -> Vec<ElementRole> {
    let mut picked = Vec::new();
    for (i, corner) in points.corners.iter().enumerate() {
        if corner.distance(click) <= point_radius {
            picked.push(ElementRole::Corner(i));
        }
    }
    for j in 0..4 {
        let (a, b) = points.edge(j);
        if distance_to_segment(click, a, b) <= edge_radius {
            picked.push(ElementRole::Edge(j));
        }
    }
    if points.center.distance(click) <= point_radius {
        picked.push(ElementRole::Center);
    }
    picked
}

/// Tracked points after moving the mouse from `click` to `mouse`.
///
/// `pressed` holds the positions at press time. Modes that do not apply to
/// rectangles leave it where it was.
pub fn moved(mode: MotionMode, pressed: &RectPoints, click: Point, mouse: Point) -> RectPoints {
    let delta = mouse - click;
    match mode {
        MotionMode::Center => pressed.map(|p| p + delta),
        MotionMode::HorzEdge { edge } => {
            let (a, b) = edge_corners(edge);
            let mut out = *pressed;
            out.corners[a].y += delta.y;
            out.corners[b].y += delta.y;
            out.center.y += delta.y / 2.0;
            out
        }
        MotionMode::VertEdge { edge } => {
            let (a, b) = edge_corners(edge);
            let mut out = *pressed;
            out.corners[a].x += delta.x;
            out.corners[b].x += delta.x;
            out.center.x += delta.x / 2.0;
            out
        }
        MotionMode::Corner(k) if k < 4 => {
            let mut out = *pressed;
            let (prev, next) = (prev_corner(k), next_corner(k));
            out.corners[k] = mouse;
            // The neighbour along the horizontal edge shares y with the
            // picked corner, the one along the vertical edge shares x.
            if is_horizontal(k) {
                out.corners[next].y = mouse.y;
                out.corners[prev].x = mouse.x;
            } else {
                out.corners[next].x = mouse.x;
                out.corners[prev].y = mouse.y;
            }
            out.center = mouse.midpoint(out.corners[opposite_corner(k)]);
            out
        }
        _ => *pressed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::ViewLimits;
    use kurbo::{Rect, Vec2};

    fn unit() -> RectPoints {
        RectPoints::from_box(Point::new(100.0, 100.0), Point::new(200.0, 150.0))
    }

    fn assert_close(a: Point, b: Point) {
        assert!(a.distance(b) < 1e-9, "{a:?} != {b:?}");
    }

    fn assert_axis_aligned(r: &RectPoints) {
        for j in 0..4 {
            let (a, b) = r.edge(j);
            if is_horizontal(j) {
                assert!((a.y - b.y).abs() < 1e-9, "edge {j} not horizontal");
            } else {
                assert!((a.x - b.x).abs() < 1e-9, "edge {j} not vertical");
            }
        }
    }

    #[test]
    fn test_adjacency() {
        for i in 0..4 {
            let (e_next, e_prev) = corner_edges(i);
            assert!(edge_corners(e_next).0 == i);
            assert!(edge_corners(e_prev).1 == i);
            assert_eq!(shared_edge(i, next_corner(i)), Some(i));
            assert_eq!(shared_edge(i, opposite_corner(i)), None);
            assert_eq!(shared_corner(i, prev_corner(i)), Some(i));
        }
        assert_eq!(shared_edge(3, 0), Some(3));
        assert_eq!(shared_corner(3, 0), Some(0));
        assert_eq!(shared_corner(0, 2), None);
    }

    #[test]
    fn test_edge_orientation() {
        let r = unit();
        assert_axis_aligned(&r);
        assert_eq!(edge_mode(0), MotionMode::HorzEdge { edge: 0 });
        assert_eq!(edge_mode(3), MotionMode::VertEdge { edge: 3 });
    }

    #[test]
    fn test_default_points_centered() {
        let t = DataTransform::new(
            Rect::new(0.0, 0.0, 400.0, 200.0),
            ViewLimits::new(0.0, 1.0, 0.0, 1.0),
        );
        let r = default_points(&t);
        assert_close(r.corners[0], Point::new(100.0, 50.0));
        assert_close(r.corners[2], Point::new(300.0, 150.0));
        assert_close(r.center, Point::new(200.0, 100.0));
    }

    #[test]
    fn test_position_roundtrip() {
        let t = DataTransform::new(
            Rect::new(0.0, 0.0, 400.0, 200.0),
            ViewLimits::new(0.0, 10.0, 0.0, 10.0),
        );
        let r = points_from_position(&t, (1.0, 2.0, 3.0, 4.0));
        let data = r.corners.map(|p| t.px_to_data(p));
        let (x, y, w, h) = position_of(&data);
        assert!((x - 1.0).abs() < 1e-9 && (y - 2.0).abs() < 1e-9);
        assert!((w - 3.0).abs() < 1e-9 && (h - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_center_motion_is_rigid() {
        let r = unit();
        let out = moved(MotionMode::Center, &r, Point::new(150.0, 125.0), Point::new(170.0, 115.0));
        let d = Vec2::new(20.0, -10.0);
        for i in 0..4 {
            assert_close(out.corners[i], r.corners[i] + d);
        }
        assert_close(out.center, r.center + d);
    }

    #[test]
    fn test_corner_motion_keeps_opposite() {
        let r = unit();
        for k in 0..4 {
            let mouse = Point::new(120.0 + k as f64, 300.0 - k as f64);
            let out = moved(MotionMode::Corner(k), &r, r.corners[k], mouse);
            assert_close(out.corners[k], mouse);
            assert_close(out.corners[opposite_corner(k)], r.corners[opposite_corner(k)]);
            assert_close(out.center, mouse.midpoint(r.corners[opposite_corner(k)]));
            assert_axis_aligned(&out);
        }
    }

    #[test]
    fn test_horizontal_edge_motion() {
        let r = unit();
        let out = moved(MotionMode::HorzEdge { edge: 2 }, &r, Point::new(150.0, 150.0), Point::new(180.0, 170.0));
        // Only the y of corners 2 and 3 changes.
        assert_close(out.corners[2], Point::new(200.0, 170.0));
        assert_close(out.corners[3], Point::new(100.0, 170.0));
        assert_close(out.corners[0], r.corners[0]);
        assert_close(out.corners[1], r.corners[1]);
        assert_close(out.center, Point::new(150.0, 135.0));
        assert_axis_aligned(&out);
    }

    #[test]
    fn test_vertical_edge_motion() {
        let r = unit();
        let out = moved(MotionMode::VertEdge { edge: 3 }, &r, Point::new(100.0, 120.0), Point::new(80.0, 60.0));
        assert_close(out.corners[3], Point::new(80.0, 150.0));
        assert_close(out.corners[0], Point::new(80.0, 100.0));
        assert_close(out.corners[1], r.corners[1]);
        assert_close(out.center, Point::new(140.0, 125.0));
        assert_axis_aligned(&out);
    }

    #[test]
    fn test_hit_test() {
        let r = unit();
        assert_eq!(
            hit_test(&r, Point::new(101.0, 101.0), 9.0, 5.0),
            vec![ElementRole::Corner(0), ElementRole::Edge(0), ElementRole::Edge(3)]
        );
        assert_eq!(hit_test(&r, Point::new(150.0, 152.0), 9.0, 5.0), vec![ElementRole::Edge(2)]);
        assert_eq!(hit_test(&r, Point::new(151.0, 126.0), 9.0, 5.0), vec![ElementRole::Center]);
        assert!(hit_test(&r, Point::new(300.0, 300.0), 9.0, 5.0).is_empty());
    }
}
