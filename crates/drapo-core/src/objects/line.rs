//! Draggable line.

use std::fmt;
use std::time::Duration;

use kurbo::Point;

use super::{DRAGGABLE_EVENTS, Interactive, Outcome, PressContext, TypeState, begin_drag, end_drag};
use crate::canvas::{Artist, ArtistId, Canvas, Geometry, RegionId};
use crate::error::{DrapoError, DrapoResult};
use crate::input::{CanvasEvent, EventKind, Key, KeyEvent, MouseButton, PointerEvent};
use crate::options::{LineOptions, timeout_duration};
use crate::selection::resolve_line_pick;
use crate::shapes::line::{avoid_overlap, default_endpoints, hit_test, moved};
use crate::shapes::{ElementRole, MotionMode, ShapeId, ShapeKind};
use crate::style::{ArtistStyle, LineStyle, Marker, Rgba};

#[derive(Debug, Clone, Copy, PartialEq)]
struct LineArtists {
    ends: [ArtistId; 2],
    link: ArtistId,
}

impl LineArtists {
    fn all(&self) -> [ArtistId; 3] {
        [self.ends[0], self.ends[1], self.link]
    }
}

/// A segment with two draggable endpoints.
///
/// Dragging an endpoint moves it alone; dragging the link moves the whole
/// line. Right click deletes it, `enter` records the endpoints and deletes it.
#[derive(Debug, Clone)]
pub struct Line {
    id: ShapeId,
    region: RegionId,
    color: Rgba,
    marker: Marker,
    marker_size: f64,
    line_style: LineStyle,
    line_width: f64,
    pick_radius: f64,
    /// Endpoints in data coordinates.
    endpoints: [Point; 2],
    artists: Option<LineArtists>,
    drag: Option<PressContext<[Point; 2]>>,
    recorded: Option<[Point; 2]>,
    blocking: bool,
    timeout: Option<Duration>,
}

impl Line {
    /// Create a line in `region` and draw it.
    ///
    /// `existing` lists endpoints (pixels) of other lines in the region,
    /// which the new line avoids when the options ask for it.
    pub fn create<C: Canvas>(
        id: ShapeId,
        region: RegionId,
        options: &LineOptions,
        existing: &[Point],
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) -> DrapoResult<Self> {
        let transform = canvas.transform(region).ok_or(DrapoError::NoSurface)?;
        let color = state.palette.resolve(options.color.as_deref());

        let mut px = default_endpoints(&transform);
        if options.avoid_overlap {
            let placement = avoid_overlap(px, existing, 3.0 * options.pick_radius);
            if !placement.converged {
                log::warn!("could not place line away from existing ones, keeping last position");
            }
            px = placement.endpoints;
        }

        let mut line = Self {
            id,
            region,
            color,
            marker: Marker::parse_or(&options.marker, Marker::Point),
            marker_size: options.marker_size,
            line_style: LineStyle::parse_or(&options.line_style, LineStyle::Solid),
            line_width: options.line_width,
            pick_radius: options.pick_radius,
            endpoints: px.map(|p| transform.px_to_data(p)),
            artists: None,
            drag: None,
            recorded: None,
            blocking: options.blocking,
            timeout: timeout_duration(options.timeout),
        };
        line.artists = Some(line.add_artists(canvas));
        state.render.set_fast(options.fast_render);
        Ok(line)
    }

    fn add_artists<C: Canvas>(&self, canvas: &mut C) -> LineArtists {
        let point_style = ArtistStyle::marker(self.color, self.marker, self.marker_size);
        let ends = self
            .endpoints
            .map(|p| canvas.add_artist(Artist::new(self.region, Geometry::point(p), point_style)));
        let link = canvas.add_artist(Artist::new(
            self.region,
            Geometry::segment(self.endpoints[0], self.endpoints[1]),
            ArtistStyle::segment(self.color, self.line_width, self.line_style),
        ));
        LineArtists { ends, link }
    }

    fn sync_artists<C: Canvas>(&self, canvas: &mut C) {
        let Some(artists) = self.artists else {
            return;
        };
        for (artist, p) in artists.ends.iter().zip(self.endpoints) {
            canvas.set_geometry(*artist, Geometry::point(p));
        }
        canvas.set_geometry(artists.link, Geometry::segment(self.endpoints[0], self.endpoints[1]));
    }

    /// Endpoints in data coordinates, None once erased.
    pub fn endpoints(&self) -> Option<[Point; 2]> {
        self.artists.map(|_| self.endpoints)
    }

    /// Endpoints recorded with `enter`.
    pub fn recorded(&self) -> Option<[Point; 2]> {
        self.recorded
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Motion mode of the ongoing drag.
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
        let px = self.endpoints.map(|p| transform.data_to_px(p));
        let picked = hit_test(px, event.position, self.point_radius(), self.pick_radius);
        if picked.is_empty() {
            return Outcome::Ignored;
        }

        match event.button {
            Some(MouseButton::Right) => Outcome::Delete,
            Some(MouseButton::Left) => {
                let Some(mode) = self.resolve_pick(&picked) else {
                    log::warn!("line picked without any element, ignoring press");
                    return Outcome::Ignored;
                };
                begin_drag(self.id, &artists.all(), canvas, state);
                self.drag = Some(PressContext {
                    mode,
                    click: event.position,
                    pressed: px,
                    transform,
                });
                log::debug!("line {} dragged in {mode:?} mode", self.id);
                Outcome::Handled
            }
            _ => Outcome::Ignored,
        }
    }

    fn finish_drag<C: Canvas>(&mut self, canvas: &mut C, state: &mut TypeState<C::Snapshot>) {
        if self.drag.take().is_none() {
            return;
        }
        let artists = self.artists.map(|a| a.all().to_vec()).unwrap_or_default();
        end_drag(self.id, self.region, &artists, canvas, state);
    }
}

impl Interactive for Line {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Line
    }

    fn region(&self) -> Option<RegionId> {
        Some(self.region)
    }

    fn artists(&self) -> Vec<ArtistId> {
        self.artists.map(|a| a.all().to_vec()).unwrap_or_default()
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
        resolve_line_pick(picked)
    }

    fn recompute_geometry<C: Canvas>(&mut self, canvas: &mut C, mouse: Point) -> Vec<ArtistId> {
        let Some(drag) = self.drag else {
            return Vec::new();
        };
        let px = moved(drag.mode, drag.pressed, drag.click, mouse);
        self.endpoints = px.map(|p| drag.transform.px_to_data(p));
        self.sync_artists(canvas);
        self.artists()
    }

    fn on_key<C: Canvas>(
        &mut self,
        key: &KeyEvent,
        _canvas: &mut C,
        _state: &mut TypeState<C::Snapshot>,
    ) -> Outcome {
        if key.region.is_some_and(|r| r != self.region) || self.artists.is_none() {
            return Outcome::Ignored;
        }
        if key.key.key == Key::Enter {
            self.recorded = Some(self.endpoints);
            log::info!("line position recorded, line deleted");
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
                log::debug!("line {}: canvas resized, drag cancelled", self.id);
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

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ShapeKind::Line)?;
        if self.artists.is_none() {
            write!(f, " (erased)")?;
        }
        Ok(())
    }
}
