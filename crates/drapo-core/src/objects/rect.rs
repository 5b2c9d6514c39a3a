//! Draggable rectangle.

use std::fmt;
use std::time::Duration;

use kurbo::Point;

use super::{DRAGGABLE_EVENTS, Interactive, Outcome, PressContext, TypeState, begin_drag, end_drag};
use crate::canvas::{Artist, ArtistId, Canvas, Geometry, RegionId};
use crate::error::{DrapoError, DrapoResult};
use crate::input::{CanvasEvent, EventKind, Key, KeyEvent, MouseButton, PointerEvent};
use crate::options::{RectOptions, timeout_duration};
use crate::selection::resolve_rect_pick;
use crate::shapes::rect::{
    RectPoints, default_points, edge_corners, hit_test, moved, points_from_position, position_of,
};
use crate::shapes::{ElementRole, MotionMode, ShapeId, ShapeKind};
use crate::style::{ArtistStyle, LineStyle, Marker, Rgba};

#[derive(Debug, Clone, Copy, PartialEq)]
struct RectArtists {
    corners: [ArtistId; 4],
    edges: [ArtistId; 4],
    center: ArtistId,
}

impl RectArtists {
    fn all(&self) -> Vec<ArtistId> {
        let mut all = Vec::with_capacity(9);
        all.extend(self.corners);
        all.extend(self.edges);
        all.push(self.center);
        all
    }
}

/// An axis-aligned rectangle with draggable corners, edges and center.
///
/// Dragging a corner resizes with the opposite corner fixed, dragging an
/// edge moves it along its normal, dragging the center moves the whole
/// rectangle. Right click deletes it, `enter` records its position and
/// deletes it.
#[derive(Debug, Clone)]
pub struct Rect {
    id: ShapeId,
    region: RegionId,
    color: Rgba,
    marker: Marker,
    marker_size: f64,
    line_style: LineStyle,
    line_width: f64,
    pick_radius: f64,
    /// Corners and center in data coordinates.
    points: RectPoints,
    artists: Option<RectArtists>,
    drag: Option<PressContext<RectPoints>>,
    recorded: Option<(f64, f64, f64, f64)>,
    blocking: bool,
    timeout: Option<Duration>,
}

impl Rect {
    /// Create a rectangle in `region` and draw it.
    pub fn create<C: Canvas>(
        id: ShapeId,
        region: RegionId,
        options: &RectOptions,
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) -> DrapoResult<Self> {
        let transform = canvas.transform(region).ok_or(DrapoError::NoSurface)?;
        let color = state.palette.resolve(options.color.as_deref());
        let px = match options.position {
            Some(position) => points_from_position(&transform, position),
            None => default_points(&transform),
        };

        let mut rect = Self {
            id,
            region,
            color,
            marker: Marker::parse_or(&options.marker, Marker::Point),
            marker_size: options.marker_size,
            line_style: LineStyle::parse_or(&options.line_style, LineStyle::Solid),
            line_width: options.line_width,
            pick_radius: options.pick_radius,
            points: px.map(|p| transform.px_to_data(p)),
            artists: None,
            drag: None,
            recorded: None,
            blocking: options.blocking,
            timeout: timeout_duration(options.timeout),
        };
        rect.artists = Some(rect.add_artists(canvas));
        state.render.set_fast(options.fast_render);
        Ok(rect)
    }

    fn add_artists<C: Canvas>(&self, canvas: &mut C) -> RectArtists {
        let corner_style = ArtistStyle::marker(self.color, self.marker, self.marker_size);
        let edge_style = ArtistStyle::segment(self.color, self.line_width, self.line_style);
        let center_style = ArtistStyle::marker(self.color, Marker::Plus, self.marker_size);

        let corners = self
            .points
            .corners
            .map(|p| canvas.add_artist(Artist::new(self.region, Geometry::point(p), corner_style)));
        let edges = [0, 1, 2, 3].map(|j| {
            canvas.add_artist(Artist::new(self.region, self.edge_geometry(j), edge_style))
        });
        let center = canvas.add_artist(Artist::new(
            self.region,
            Geometry::point(self.points.center),
            center_style,
        ));
        RectArtists {
            corners,
            edges,
            center,
        }
    }

    fn edge_geometry(&self, j: usize) -> Geometry {
        let (a, b) = edge_corners(j);
        Geometry::segment(self.points.corners[a], self.points.corners[b])
    }

    fn sync_artists<C: Canvas>(&self, canvas: &mut C) {
        let Some(artists) = self.artists else {
            return;
        };
        for (artist, p) in artists.corners.iter().zip(self.points.corners) {
            canvas.set_geometry(*artist, Geometry::point(p));
        }
        for (j, artist) in artists.edges.iter().enumerate() {
            canvas.set_geometry(*artist, self.edge_geometry(j));
        }
        canvas.set_geometry(artists.center, Geometry::point(self.points.center));
    }

    /// `(xmin, ymin, width, height)` in data coordinates, None once erased.
    pub fn position(&self) -> Option<(f64, f64, f64, f64)> {
        self.artists.map(|_| position_of(&self.points.corners))
    }

    /// Position recorded with `enter`.
    pub fn recorded(&self) -> Option<(f64, f64, f64, f64)> {
        self.recorded
    }

    /// Corners and center in data coordinates.
    pub fn points(&self) -> &RectPoints {
        &self.points
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn motion_mode(&self) -> Option<MotionMode> {
        self.drag.map(|d| d.mode)
    }

    fn point_radius(&self) -> f64 {
        self.pick_radius + self.marker_size / 2.0
    }

    fn on_press<C: Canvas>(
        &mut self,
        event: &PointerEvent,
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) -> Outcome {
        let Some(artists) = self.artists else {
            return Outcome::Ignored;
        };
        if event.region != Some(self.region) {
            return Outcome::Ignored;
        }
        let Some(transform) = canvas.transform(self.region) else {
            return Outcome::Ignored;
        };
        let px = self.points.map(|p| transform.data_to_px(p));
        let picked = hit_test(&px, event.position, self.point_radius(), self.pick_radius);
        if picked.is_empty() {
            return Outcome::Ignored;
        }

        match event.button {
            Some(MouseButton::Right) => Outcome::Delete,
            Some(MouseButton::Left) => {
                let Some(mode) = self.resolve_pick(&picked) else {
                    log::warn!("rectangle picked without any element, ignoring press");
                    return Outcome::Ignored;
                };
                begin_drag(self.id, &artists.all(), canvas, state);
                self.drag = Some(PressContext {
                    mode,
                    click: event.position,
                    pressed: px,
                    transform,
                });
                log::debug!("rectangle {} dragged in {mode:?} mode", self.id);
                Outcome::Handled
            }
            _ => Outcome::Ignored,
        }
    }

    fn finish_drag<C: Canvas>(&mut self, canvas: &mut C, state: &mut TypeState<C::Snapshot>) {
        if self.drag.take().is_none() {
            return;
        }
        end_drag(self.id, self.region, &self.artists(), canvas, state);
    }
}

impl Interactive for Rect {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Rect
    }

    fn region(&self) -> Option<RegionId> {
        Some(self.region)
    }

    fn artists(&self) -> Vec<ArtistId> {
        self.artists.map(|a| a.all()).unwrap_or_default()
    }

    fn is_erased(&self) -> bool {
        self.artists.is_none()
    }

    fn is_blocking(&self) -> bool {
        self.blocking
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        DRAGGABLE_EVENTS
    }

    fn resolve_pick(&self, picked: &[ElementRole]) -> Option<MotionMode> {
        resolve_rect_pick(picked)
    }

    fn recompute_geometry<C: Canvas>(&mut self, canvas: &mut C, mouse: Point) -> Vec<ArtistId> {
        let Some(drag) = self.drag else {
            return Vec::new();
        };
        let px = moved(drag.mode, &drag.pressed, drag.click, mouse);
        self.points = px.map(|p| drag.transform.px_to_data(p));
        self.sync_artists(canvas);
        self.artists()
    }

    fn on_key<C: Canvas>(
        &mut self,
        key: &KeyEvent,
        _canvas: &mut C,
        _state: &mut TypeState<C::Snapshot>,
    ) -> Outcome {
        if key.region.is_some_and(|r| r != self.region) {
            return Outcome::Ignored;
        }
        if key.key.key == Key::Enter {
            let Some(position) = self.position() else {
                return Outcome::Ignored;
            };
            self.recorded = Some(position);
            log::info!("rectangle position recorded, rectangle deleted");
            return Outcome::Delete;
        }
        Outcome::Ignored
    }

    fn handle_event<C: Canvas>(
        &mut self,
        event: &CanvasEvent,
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) -> Outcome {
        match event {
            CanvasEvent::ButtonPress(press) => self.on_press(press, canvas, state),
            CanvasEvent::Motion(motion) => {
                if self.drag.is_some() && state.coordinator.is_leader(self.id) {
                    Outcome::Repaint {
                        region: self.region,
                        mouse: motion.position,
                    }
                } else {
                    Outcome::Ignored
                }
            }
            CanvasEvent::ButtonRelease(_) => {
                if self.drag.is_none() {
                    return Outcome::Ignored;
                }
                self.finish_drag(canvas, state);
                Outcome::Handled
            }
            CanvasEvent::RegionLeave(region) if *region == self.region && self.drag.is_some() => {
                self.finish_drag(canvas, state);
                Outcome::Handled
            }
            // The press was anchored in the old pixel space.
            CanvasEvent::Resize if self.drag.is_some() => {
                log::debug!("rectangle {}: canvas resized, drag cancelled", self.id);
                self.finish_drag(canvas, state);
                Outcome::Handled
            }
            CanvasEvent::KeyPress(key) => self.on_key(key, canvas, state),
            CanvasEvent::Close => Outcome::Delete,
            _ => Outcome::Ignored,
        }
    }

    fn erase<C: Canvas>(&mut self, canvas: &mut C, state: &mut TypeState<C::Snapshot>) {
        self.drag = None;
        let Some(artists) = self.artists.take() else {
            return;
        };
        for artist in artists.all() {
            canvas.remove_artist(artist);
        }
        state.coordinator.evict(self.id);
        state.render.settle(canvas, self.region);
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ShapeKind::Rect)?;
        match self.position() {
            Some((x, y, w, h)) => write!(f, " at ({x:.3}, {y:.3}) size {w:.3}x{h:.3}"),
            None => write!(f, " (erased)"),
        }
    }
}
