//! Plotting surface abstraction.
//!
//! A [`Canvas`] owns the plotting regions, the drawable artists placed in
//! them and the host event loop. Interactive objects never draw pixels
//! themselves: they create artists, move them and ask the canvas to paint.

use std::time::Duration;

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::input::CanvasEvent;
use crate::style::ArtistStyle;
use crate::transform::DataTransform;

/// Identifier of a plotting region (a set of axes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub u32);

/// Identifier of an artist owned by the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtistId(pub u64);

/// Geometry of an artist, in data coordinates of its region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Unconnected vertices, drawn with the style's marker.
    Points(Vec<Point>),
    /// Connected vertices, drawn with the style's line style.
    Polyline(Vec<Point>),
}

impl Geometry {
    pub fn point(p: Point) -> Self {
        Geometry::Points(vec![p])
    }

    pub fn segment(a: Point, b: Point) -> Self {
        Geometry::Polyline(vec![a, b])
    }

    pub fn vertices(&self) -> &[Point] {
        match self {
            Geometry::Points(points) | Geometry::Polyline(points) => points,
        }
    }

    /// Same geometry with every vertex mapped through `f`.
    pub fn map(&self, f: impl Fn(Point) -> Point) -> Self {
        match self {
            Geometry::Points(points) => Geometry::Points(points.iter().copied().map(f).collect()),
            Geometry::Polyline(points) => {
                Geometry::Polyline(points.iter().copied().map(f).collect())
            }
        }
    }
}

/// An artist to be added to a region.
#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    pub region: RegionId,
    pub geometry: Geometry,
    pub style: ArtistStyle,
    /// Animated artists are skipped by [`Canvas::draw`] and only painted
    /// through [`Canvas::draw_artist`].
    pub animated: bool,
}

impl Artist {
    pub fn new(region: RegionId, geometry: Geometry, style: ArtistStyle) -> Self {
        Self {
            region,
            geometry,
            style,
            animated: false,
        }
    }
}

/// Plotting surface used by interactive objects.
///
/// Operations on unknown artist ids are ignored.
pub trait Canvas {
    /// Saved pixels of a region, produced by [`Canvas::copy_region`].
    type Snapshot;

    /// Region that currently has focus, if the surface has any region.
    fn current_region(&self) -> Option<RegionId>;

    fn has_region(&self, region: RegionId) -> bool;

    /// Current data ⇄ pixel transform of a region.
    fn transform(&self, region: RegionId) -> Option<DataTransform>;

    fn add_artist(&mut self, artist: Artist) -> ArtistId;

    fn set_geometry(&mut self, id: ArtistId, geometry: Geometry);

    fn set_animated(&mut self, id: ArtistId, animated: bool);

    fn remove_artist(&mut self, id: ArtistId);

    /// Full redraw of every region, skipping animated artists.
    fn draw(&mut self);

    /// Save the current pixels of a region.
    fn copy_region(&mut self, region: RegionId) -> Self::Snapshot;

    /// Put saved pixels back into the back buffer.
    fn restore_region(&mut self, snapshot: &Self::Snapshot);

    /// Paint one artist into the back buffer.
    fn draw_artist(&mut self, id: ArtistId);

    /// Present the back buffer of a region on screen.
    fn blit(&mut self, region: RegionId);

    /// Run one step of the host event loop.
    ///
    /// Returns `None` when the timeout elapsed or the loop has finished.
    fn next_event(&mut self, timeout: Option<Duration>) -> Option<CanvasEvent>;
}
