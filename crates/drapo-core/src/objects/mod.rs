//! Interactive objects: the shapes users drag around.

mod cursor;
mod line;
mod rect;

pub use cursor::Cursor;
pub use line::Line;
pub use rect::Rect;

use std::fmt;
use std::time::Duration;

use kurbo::Point;

use crate::canvas::{ArtistId, Canvas, RegionId};
use crate::input::{CanvasEvent, EventKind, KeyEvent};
use crate::motion::{Leave, MotionCoordinator};
use crate::render::RenderEngine;
use crate::shapes::{ElementRole, MotionMode, ShapeId, ShapeKind};
use crate::style::Palette;
use crate::transform::DataTransform;

/// State shared by every object of one type on a figure.
#[derive(Debug)]
pub struct TypeState<S> {
    pub coordinator: MotionCoordinator,
    pub render: RenderEngine<S>,
    pub palette: Palette,
}

impl<S> Default for TypeState<S> {
    fn default() -> Self {
        Self {
            coordinator: MotionCoordinator::new(),
            render: RenderEngine::default(),
            palette: Palette::default(),
        }
    }
}

/// What the figure must do after an object handled an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Ignored,
    Handled,
    /// Repaint the moving objects of the type, with the mouse at `mouse`.
    Repaint { region: RegionId, mouse: Point },
    /// Hard-delete the object.
    Delete,
}

/// Press information kept for the duration of a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressContext<P> {
    pub mode: MotionMode,
    /// Mouse position at press, in pixels.
    pub click: Point,
    /// Tracked points at press, in pixels.
    pub pressed: P,
    /// Transform at press; motion is converted back to data with it.
    pub transform: DataTransform,
}

/// Common interface of the interactive object types.
pub trait Interactive {
    fn id(&self) -> ShapeId;

    fn kind(&self) -> ShapeKind;

    /// Region the object lives in (None for a cursor outside every region).
    fn region(&self) -> Option<RegionId>;

    /// Canvas artists currently making up the object.
    fn artists(&self) -> Vec<ArtistId>;

    /// Whether the object was soft-erased (no artists left on the canvas).
    fn is_erased(&self) -> bool;

    /// Whether creating the object waits for it to be deleted.
    fn is_blocking(&self) -> bool;

    fn timeout(&self) -> Option<Duration>;

    /// Events the object listens to while connected.
    fn subscriptions(&self) -> &'static [EventKind];

    /// Motion mode for a set of picked elements.
    fn resolve_pick(&self, picked: &[ElementRole]) -> Option<MotionMode>;

    /// Move the object's artists for the mouse at `mouse` (pixels) and
    /// return the artists that changed.
    fn recompute_geometry<C: Canvas>(&mut self, canvas: &mut C, mouse: Point) -> Vec<ArtistId>;

    fn on_key<C: Canvas>(
        &mut self,
        key: &KeyEvent,
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) -> Outcome;

    fn handle_event<C: Canvas>(
        &mut self,
        event: &CanvasEvent,
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) -> Outcome;

    /// Remove the object's artists; the object stays connected.
    fn erase<C: Canvas>(&mut self, canvas: &mut C, state: &mut TypeState<C::Snapshot>);
}

/// Any interactive object.
#[derive(Debug, Clone)]
pub enum InteractiveObject {
    Cursor(Cursor),
    Line(Line),
    Rect(Rect),
}

macro_rules! dispatch {
    ($self:expr, $obj:ident => $body:expr) => {
        match $self {
            InteractiveObject::Cursor($obj) => $body,
            InteractiveObject::Line($obj) => $body,
            InteractiveObject::Rect($obj) => $body,
        }
    };
}

impl InteractiveObject {
    pub fn as_cursor(&self) -> Option<&Cursor> {
        match self {
            InteractiveObject::Cursor(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            InteractiveObject::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_rect(&self) -> Option<&Rect> {
        match self {
            InteractiveObject::Rect(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_cursor_mut(&mut self) -> Option<&mut Cursor> {
        match self {
            InteractiveObject::Cursor(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_cursor(self) -> Option<Cursor> {
        match self {
            InteractiveObject::Cursor(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_line(self) -> Option<Line> {
        match self {
            InteractiveObject::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn into_rect(self) -> Option<Rect> {
        match self {
            InteractiveObject::Rect(r) => Some(r),
            _ => None,
        }
    }
}

impl Interactive for InteractiveObject {
    fn id(&self) -> ShapeId {
        dispatch!(self, o => o.id())
    }

    fn kind(&self) -> ShapeKind {
        dispatch!(self, o => o.kind())
    }

    fn region(&self) -> Option<RegionId> {
        dispatch!(self, o => o.region())
    }

    fn artists(&self) -> Vec<ArtistId> {
        dispatch!(self, o => o.artists())
    }

    fn is_erased(&self) -> bool {
        dispatch!(self, o => o.is_erased())
    }

    fn is_blocking(&self) -> bool {
        dispatch!(self, o => o.is_blocking())
    }

    fn timeout(&self) -> Option<Duration> {
        dispatch!(self, o => o.timeout())
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        dispatch!(self, o => o.subscriptions())
    }

    fn resolve_pick(&self, picked: &[ElementRole]) -> Option<MotionMode> {
        dispatch!(self, o => o.resolve_pick(picked))
    }

    fn recompute_geometry<C: Canvas>(&mut self, canvas: &mut C, mouse: Point) -> Vec<ArtistId> {
        dispatch!(self, o => o.recompute_geometry(canvas, mouse))
    }

    fn on_key<C: Canvas>(
        &mut self,
        key: &KeyEvent,
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) -> Outcome {
        dispatch!(self, o => o.on_key(key, canvas, state))
    }

    fn handle_event<C: Canvas>(
        &mut self,
        event: &CanvasEvent,
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) -> Outcome {
        dispatch!(self, o => o.handle_event(event, canvas, state))
    }

    fn erase<C: Canvas>(&mut self, canvas: &mut C, state: &mut TypeState<C::Snapshot>) {
        dispatch!(self, o => o.erase(canvas, state))
    }
}

impl fmt::Display for InteractiveObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, o => fmt::Display::fmt(o, f))
    }
}

impl From<Cursor> for InteractiveObject {
    fn from(cursor: Cursor) -> Self {
        InteractiveObject::Cursor(cursor)
    }
}

impl From<Line> for InteractiveObject {
    fn from(line: Line) -> Self {
        InteractiveObject::Line(line)
    }
}

impl From<Rect> for InteractiveObject {
    fn from(rect: Rect) -> Self {
        InteractiveObject::Rect(rect)
    }
}

/// Events draggable shapes listen to.
pub(crate) const DRAGGABLE_EVENTS: &[EventKind] = &[
    EventKind::Press,
    EventKind::Release,
    EventKind::Motion,
    EventKind::Key,
    EventKind::Leave,
    EventKind::Resize,
    EventKind::Close,
];

pub(crate) fn set_animated<C: Canvas>(canvas: &mut C, artists: &[ArtistId], animated: bool) {
    for artist in artists {
        canvas.set_animated(*artist, animated);
    }
}

/// Register a shape that starts being dragged.
pub(crate) fn begin_drag<C: Canvas>(
    id: ShapeId,
    artists: &[ArtistId],
    canvas: &mut C,
    state: &mut TypeState<C::Snapshot>,
) {
    state.coordinator.begin(id);
    if state.render.is_fast() {
        set_animated(canvas, artists, true);
    }
}

/// Retire a dragged shape; the last one out settles the canvas.
pub(crate) fn end_drag<C: Canvas>(
    id: ShapeId,
    region: RegionId,
    artists: &[ArtistId],
    canvas: &mut C,
    state: &mut TypeState<C::Snapshot>,
) {
    set_animated(canvas, artists, false);
    if let Leave::Left { emptied: true, .. } = state.coordinator.end(id) {
        state.render.settle(canvas, region);
    }
}
