//! Data ⇄ pixel transform for a plotting region.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Scaling applied along one axis before the affine mapping to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisScale {
    #[default]
    Linear,
    /// Base-10 logarithmic axis.
    Log,
}

impl AxisScale {
    fn forward(self, value: f64) -> f64 {
        match self {
            AxisScale::Linear => value,
            AxisScale::Log => value.max(f64::MIN_POSITIVE).log10(),
        }
    }

    fn inverse(self, value: f64) -> f64 {
        match self {
            AxisScale::Linear => value,
            AxisScale::Log => 10f64.powf(value),
        }
    }
}

/// Visible data range of a region, `(min, max)` per axis.
///
/// Limits may be inverted (`min > max`) when an axis is flipped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewLimits {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl ViewLimits {
    pub fn new(x0: f64, x1: f64, y0: f64, y1: f64) -> Self {
        Self {
            x: (x0, x1),
            y: (y0, y1),
        }
    }
}

/// Transform between data coordinates and pixel coordinates of a region.
///
/// Pixel space follows the plotting convention: `bbox.y0` is the bottom of
/// the region and y grows upwards. The transform is a pure value derived
/// from the canvas; objects re-derive it on resize, press and rescale
/// instead of sharing a mutable instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataTransform {
    /// Region extent in pixels.
    pub bbox: Rect,
    /// Visible data limits.
    pub limits: ViewLimits,
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
}

impl DataTransform {
    /// Create a linear transform.
    pub fn new(bbox: Rect, limits: ViewLimits) -> Self {
        Self {
            bbox,
            limits,
            x_scale: AxisScale::Linear,
            y_scale: AxisScale::Linear,
        }
    }

    /// Set the axis scales.
    pub fn with_scales(mut self, x_scale: AxisScale, y_scale: AxisScale) -> Self {
        self.x_scale = x_scale;
        self.y_scale = y_scale;
        self
    }

    /// Replace the visible limits (pan/zoom).
    pub fn with_limits(mut self, limits: ViewLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Replace the pixel extent (resize).
    pub fn with_bbox(mut self, bbox: Rect) -> Self {
        self.bbox = bbox;
        self
    }

    /// Convert a data point to pixel coordinates.
    pub fn data_to_px(&self, point: Point) -> Point {
        let fx = fraction(self.x_scale, point.x, self.limits.x);
        let fy = fraction(self.y_scale, point.y, self.limits.y);
        self.relative_to_px(fx, fy)
    }

    /// Convert a pixel point to data coordinates.
    pub fn px_to_data(&self, point: Point) -> Point {
        let fx = ratio(point.x - self.bbox.x0, self.bbox.width());
        let fy = ratio(point.y - self.bbox.y0, self.bbox.height());
        Point::new(
            unfraction(self.x_scale, fx, self.limits.x),
            unfraction(self.y_scale, fy, self.limits.y),
        )
    }

    /// Pixel position of a point given as a fraction of the region box.
    pub fn relative_to_px(&self, fx: f64, fy: f64) -> Point {
        Point::new(
            self.bbox.x0 + fx * self.bbox.width(),
            self.bbox.y0 + fy * self.bbox.height(),
        )
    }

    /// Whether a pixel point lies inside the region.
    pub fn contains_px(&self, point: Point) -> bool {
        let x = (self.bbox.x0.min(self.bbox.x1))..=(self.bbox.x0.max(self.bbox.x1));
        let y = (self.bbox.y0.min(self.bbox.y1))..=(self.bbox.y0.max(self.bbox.y1));
        x.contains(&point.x) && y.contains(&point.y)
    }

    /// Lower-left and upper-right corners of the view box in pixels.
    pub fn view_px(&self) -> (Point, Point) {
        let lo = self.data_to_px(Point::new(self.limits.x.0, self.limits.y.0));
        let hi = self.data_to_px(Point::new(self.limits.x.1, self.limits.y.1));
        (lo, hi)
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den.abs() < f64::EPSILON { 0.0 } else { num / den }
}

fn fraction(scale: AxisScale, value: f64, (min, max): (f64, f64)) -> f64 {
    let lo = scale.forward(min);
    let hi = scale.forward(max);
    ratio(scale.forward(value) - lo, hi - lo)
}

fn unfraction(scale: AxisScale, frac: f64, (min, max): (f64, f64)) -> f64 {
    let lo = scale.forward(min);
    let hi = scale.forward(max);
    scale.inverse(lo + frac * (hi - lo))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear() -> DataTransform {
        DataTransform::new(
            Rect::new(50.0, 40.0, 450.0, 340.0),
            ViewLimits::new(0.0, 10.0, 0.0, 10.0),
        )
    }

    #[test]
    fn test_linear_mapping() {
        let t = linear();
        let px = t.data_to_px(Point::new(5.0, 5.0));
        assert!((px.x - 250.0).abs() < 1e-9);
        assert!((px.y - 190.0).abs() < 1e-9);
    }

    #[test]
    fn test_roundtrip_linear() {
        let t = linear();
        let original = Point::new(3.7, 8.1);
        let back = t.px_to_data(t.data_to_px(original));
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_log_axis_midpoint_is_geometric_mean() {
        let t = DataTransform::new(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            ViewLimits::new(1.0, 100.0, 1.0, 10.0),
        )
        .with_scales(AxisScale::Log, AxisScale::Linear);
        let mid = t.px_to_data(Point::new(50.0, 50.0));
        assert!((mid.x - 10.0).abs() < 1e-9);
        assert!((mid.y - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_roundtrip_log() {
        let t = linear()
            .with_limits(ViewLimits::new(0.1, 1000.0, 1e-3, 1.0))
            .with_scales(AxisScale::Log, AxisScale::Log);
        let original = Point::new(42.0, 0.02);
        let back = t.px_to_data(t.data_to_px(original));
        assert!((back.x - original.x).abs() / original.x < 1e-10);
        assert!((back.y - original.y).abs() / original.y < 1e-10);
    }

    #[test]
    fn test_relative_position() {
        let t = linear();
        let p = t.px_to_data(t.relative_to_px(0.2, 0.8));
        assert!((p.x - 2.0).abs() < 1e-9);
        assert!((p.y - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_limits_do_not_produce_nan() {
        let t = linear().with_limits(ViewLimits::new(1.0, 1.0, 0.0, 10.0));
        let px = t.data_to_px(Point::new(1.0, 5.0));
        assert!(px.x.is_finite());
    }

    #[test]
    fn test_contains() {
        let t = linear();
        assert!(t.contains_px(Point::new(100.0, 100.0)));
        assert!(!t.contains_px(Point::new(10.0, 100.0)));
    }
}
