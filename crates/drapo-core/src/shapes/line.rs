//! Line geometry: two endpoints joined by a link.

use kurbo::{Point, Vec2};

use super::{ElementRole, MotionMode, distance_to_segment};
use crate::transform::DataTransform;

/// Relative position of the first endpoint of a new line in the view box.
pub const DEFAULT_START: (f64, f64) = (0.2, 0.2);
/// Relative position of the second endpoint of a new line in the view box.
pub const DEFAULT_END: (f64, f64) = (0.8, 0.8);
/// Upper bound on overlap avoidance shifts.
pub const AVOID_MAX_ITERATIONS: usize = 1000;

/// Default endpoints of a new line, in pixels.
pub fn default_endpoints(transform: &DataTransform) -> [Point; 2] {
    let (lo, hi) = transform.view_px();
    let at = |(fx, fy): (f64, f64)| Point::new(lo.x + fx * (hi.x - lo.x), lo.y + fy * (hi.y - lo.y));
    [at(DEFAULT_START), at(DEFAULT_END)]
}

/// Result of overlap avoidance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub endpoints: [Point; 2],
    /// False when the iteration bound was hit; `endpoints` is then the last
    /// position tried.
    pub converged: bool,
    pub shifts: usize,
}

/// Shift `endpoints` diagonally (left and up by `min_dist`) until no
/// endpoint lies closer than `min_dist` to any of `existing`.
pub fn avoid_overlap(endpoints: [Point; 2], existing: &[Point], min_dist: f64) -> Placement {
    let shift = Vec2::new(-min_dist, min_dist);
    let mut endpoints = endpoints;
    for shifts in 0..AVOID_MAX_ITERATIONS {
        let too_close = existing
            .iter()
            .any(|other| endpoints.iter().any(|p| p.distance(*other) < min_dist));
        if !too_close {
            return Placement {
                endpoints,
                converged: true,
                shifts,
            };
        }
        endpoints = endpoints.map(|p| p + shift);
    }
    Placement {
        endpoints,
        converged: false,
        shifts: AVOID_MAX_ITERATIONS,
    }
}

/// Elements of a line hit by a press at `click`.
pub fn hit_test(endpoints: [Point; 2], click: Point, point_radius: f64, link_radius: f64) -> Vec<ElementRole> {
    let mut picked: Vec<ElementRole> = endpoints
        .iter()
        .enumerate()
        .filter(|(_, p)| p.distance(click) <= point_radius)
        .map(|(i, _)| ElementRole::Endpoint(i))
        .collect();
    if distance_to_segment(click, endpoints[0], endpoints[1]) <= link_radius {
        picked.push(ElementRole::Link);
    }
    picked
}

/// Endpoints after moving the mouse from `click` to `mouse`.
///
/// `pressed` holds the endpoint positions at press time. Modes that do not
/// apply to lines leave the line where it was.
pub fn moved(mode: MotionMode, pressed: [Point; 2], click: Point, mouse: Point) -> [Point; 2] {
    match mode {
        MotionMode::Whole => {
            let delta = mouse - click;
            pressed.map(|p| p + delta)
        }
        MotionMode::Edge(i) if i < 2 => {
            let mut out = pressed;
            out[i] = mouse;
            out
        }
        _ => pressed,
    }
}
