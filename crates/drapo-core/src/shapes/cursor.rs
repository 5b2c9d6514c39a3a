//! Cursor geometry: crosshair lines clipped to the view limits, and click marks.

use kurbo::Point;

use crate::canvas::Geometry;
use crate::style::MarkShape;
use crate::transform::ViewLimits;

/// Horizontal line through `y` spanning the x limits (data coordinates).
pub fn hline(limits: &ViewLimits, y: f64) -> Geometry {
    Geometry::segment(Point::new(limits.x.0, y), Point::new(limits.x.1, y))
}

/// Vertical line through `x` spanning the y limits (data coordinates).
pub fn vline(limits: &ViewLimits, x: f64) -> Geometry {
    Geometry::segment(Point::new(x, limits.y.0), Point::new(x, limits.y.1))
}

/// Geometries of the mark left at a recorded click.
pub fn mark(shape: MarkShape, at: Point, limits: &ViewLimits) -> Vec<Geometry> {
    match shape {
        MarkShape::Glyph(_) => vec![Geometry::point(at)],
        MarkShape::HLine => vec![hline(limits, at.y)],
        MarkShape::VLine => vec![vline(limits, at.x)],
        MarkShape::Crosshair => vec![hline(limits, at.y), vline(limits, at.x)],
    }
}
