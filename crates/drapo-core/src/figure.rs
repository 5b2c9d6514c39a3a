//! Figure: registry of interactive objects on one canvas, event routing and
//! object lifecycle.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use kurbo::Point;

use crate::canvas::{ArtistId, Canvas, RegionId};
use crate::error::{DrapoError, DrapoResult};
use crate::input::{CanvasEvent, EventKind};
use crate::motion::MotionCoordinator;
use crate::objects::{Cursor, Interactive, InteractiveObject, Line, Outcome, Rect, TypeState};
use crate::options::{CursorOptions, LineOptions, RectOptions};
use crate::render::{RenderEngine, RepaintPath};
use crate::shapes::{ShapeId, ShapeKind};
use crate::style::Palette;

/// Which objects [`Figure::delete_others`] removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteScope {
    /// Every other object of the same type.
    #[default]
    All,
    /// Other objects of the same type in the same region.
    Region,
}

/// How a blocking wait ended.
#[derive(Debug)]
pub enum BlockEnd {
    /// The object was deleted; it is handed back so its recorded data can
    /// be read.
    Deleted(Box<InteractiveObject>),
    TimedOut,
    /// The host event loop finished.
    LoopEnded,
}

/// Interactive objects living on one canvas.
///
/// The figure owns the canvas, the objects, and the per-type motion,
/// render and palette state. Events are fed either by the host through
/// [`Figure::handle_event`] or pulled from the canvas by
/// [`Figure::process_events`] and the blocking helpers.
pub struct Figure<C: Canvas> {
    canvas: C,
    objects: Vec<InteractiveObject>,
    subscriptions: HashMap<ShapeId, Vec<EventKind>>,
    states: HashMap<ShapeKind, TypeState<C::Snapshot>>,
    /// Objects currently blocking, innermost last.
    blocking: Vec<ShapeId>,
    /// Blocking objects deleted while their wait runs.
    released: HashMap<ShapeId, InteractiveObject>,
    /// Objects created with the blocking option, once their wait ended.
    finished: HashMap<ShapeId, InteractiveObject>,
}

impl<C: Canvas> Figure<C> {
    pub fn new(canvas: C) -> Self {
        Self {
            canvas,
            objects: Vec::new(),
            subscriptions: HashMap::new(),
            states: HashMap::new(),
            blocking: Vec::new(),
            released: HashMap::new(),
            finished: HashMap::new(),
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: ShapeId) -> Option<&InteractiveObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    /// Objects in creation order.
    pub fn objects(&self) -> impl Iterator<Item = &InteractiveObject> {
        self.objects.iter()
    }

    /// Ids of the objects of one type, in creation order.
    pub fn objects_of(&self, kind: ShapeKind) -> Vec<ShapeId> {
        self.objects
            .iter()
            .filter(|o| o.kind() == kind)
            .map(|o| o.id())
            .collect()
    }

    /// `"Draggable Line #2/3"`: rank among objects of the same type.
    pub fn describe(&self, id: ShapeId) -> Option<String> {
        let kind = self.get(id)?.kind();
        let same = self.objects_of(kind);
        let rank = same.iter().position(|o| *o == id)? + 1;
        Some(format!("{kind} #{rank}/{}", same.len()))
    }

    pub fn coordinator(&self, kind: ShapeKind) -> Option<&MotionCoordinator> {
        self.states.get(&kind).map(|s| &s.coordinator)
    }

    pub fn render_engine(&self, kind: ShapeKind) -> Option<&RenderEngine<C::Snapshot>> {
        self.states.get(&kind).map(|s| &s.render)
    }

    pub fn palette(&self, kind: ShapeKind) -> Option<&Palette> {
        self.states.get(&kind).map(|s| &s.palette)
    }

    pub fn is_subscribed(&self, id: ShapeId, event: EventKind) -> bool {
        self.subscriptions
            .get(&id)
            .is_some_and(|kinds| kinds.contains(&event))
    }

    /// Object created with the blocking option, once its wait is over.
    pub fn take_finished(&mut self, id: ShapeId) -> Option<InteractiveObject> {
        self.finished.remove(&id)
    }

    fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.objects.iter().position(|o| o.id() == id)
    }

    pub(crate) fn parts_mut(&mut self, kind: ShapeKind) -> (&mut C, &mut TypeState<C::Snapshot>) {
        (&mut self.canvas, self.states.entry(kind).or_default())
    }

    fn resolve_region(&self, requested: Option<RegionId>) -> DrapoResult<RegionId> {
        if let Some(region) = requested {
            if self.canvas.has_region(region) {
                return Ok(region);
            }
            log::warn!("region {region:?} not found, using the current region");
        }
        self.canvas.current_region().ok_or(DrapoError::NoSurface)
    }

    /// Create a cursor, deleting any other cursor of the figure.
    pub fn add_cursor(&mut self, options: CursorOptions) -> DrapoResult<ShapeId> {
        let region = self.resolve_region(None)?;
        for other in self.objects_of(ShapeKind::Cursor) {
            self.delete(other);
        }
        let id = ShapeId::new_v4();
        let (canvas, state) = self.parts_mut(ShapeKind::Cursor);
        let cursor = Cursor::create(id, &options, region, canvas, state);
        // Animated lines of a positioned cursor are shown by `register`.
        canvas.draw();
        Ok(self.register(cursor.into()))
    }

    /// Create a draggable line.
    pub fn add_line(&mut self, options: LineOptions) -> DrapoResult<ShapeId> {
        let region = self.resolve_region(options.region)?;
        let transform = self.canvas.transform(region).ok_or(DrapoError::NoSurface)?;
        let existing: Vec<Point> = self
            .objects
            .iter()
            .filter_map(|o| o.as_line())
            .filter(|l| l.region() == Some(region))
            .filter_map(|l| l.endpoints())
            .flatten()
            .map(|p| transform.data_to_px(p))
            .collect();

        let id = ShapeId::new_v4();
        let (canvas, state) = self.parts_mut(ShapeKind::Line);
        let line = Line::create(id, region, &options, &existing, canvas, state)?;
        state.render.settle(canvas, region);
        Ok(self.register(line.into()))
    }

    /// Create a draggable rectangle.
    pub fn add_rect(&mut self, options: RectOptions) -> DrapoResult<ShapeId> {
        let region = self.resolve_region(options.region)?;
        let id = ShapeId::new_v4();
        let (canvas, state) = self.parts_mut(ShapeKind::Rect);
        let rect = Rect::create(id, region, &options, canvas, state)?;
        state.render.settle(canvas, region);
        Ok(self.register(rect.into()))
    }

    fn register(&mut self, object: InteractiveObject) -> ShapeId {
        let id = object.id();
        let blocking = object.is_blocking();
        let timeout = object.timeout();
        self.subscriptions.insert(id, object.subscriptions().to_vec());
        self.invalidate_others(object.kind());
        log::info!("{object} created");
        self.objects.push(object);
        self.redraw_keeping_moving();

        if blocking {
            if let Ok(BlockEnd::Deleted(object)) = self.block_on(id, timeout) {
                self.finished.insert(id, *object);
            }
        }
        id
    }

    /// Remove an object's artists, keeping it connected.
    pub fn erase(&mut self, id: ShapeId) -> DrapoResult<()> {
        let index = self.index_of(id).ok_or(DrapoError::UnknownShape(id))?;
        let kind = self.objects[index].kind();
        let state = self.states.entry(kind).or_default();
        self.objects[index].erase(&mut self.canvas, state);
        self.invalidate_others(kind);
        self.redraw_keeping_moving();
        Ok(())
    }

    /// Erase, disconnect and forget an object.
    ///
    /// Deleting a blocking object ends its wait.
    pub fn delete(&mut self, id: ShapeId) -> Option<InteractiveObject> {
        let index = self.index_of(id)?;
        let mut object = self.objects.remove(index);
        let state = self.states.entry(object.kind()).or_default();
        object.erase(&mut self.canvas, state);
        state.coordinator.evict(id);
        self.subscriptions.remove(&id);
        self.invalidate_others(object.kind());
        self.redraw_keeping_moving();
        log::info!("{object} deleted");

        if self.blocking.contains(&id) {
            self.released.insert(id, object.clone());
        }
        Some(object)
    }

    /// Delete the other objects of the same type as `id`.
    pub fn delete_others(&mut self, id: ShapeId, scope: DeleteScope) -> usize {
        let Some(me) = self.get(id) else {
            return 0;
        };
        let (kind, region) = (me.kind(), me.region());
        let others: Vec<ShapeId> = self
            .objects
            .iter()
            .filter(|o| o.kind() == kind && o.id() != id)
            .filter(|o| scope == DeleteScope::All || o.region() == region)
            .map(|o| o.id())
            .collect();
        for other in &others {
            self.delete(*other);
        }
        others.len()
    }

    /// Delete every object.
    pub fn clear(&mut self) {
        let ids: Vec<ShapeId> = self.objects.iter().map(|o| o.id()).collect();
        for id in ids {
            self.delete(id);
        }
    }

    /// Remove the click marks of a cursor.
    pub fn erase_marks(&mut self, id: ShapeId) -> DrapoResult<()> {
        let index = self.index_of(id).ok_or(DrapoError::UnknownShape(id))?;
        let state = self.states.entry(ShapeKind::Cursor).or_default();
        let cursor = self.objects[index]
            .as_cursor_mut()
            .ok_or(DrapoError::UnknownShape(id))?;
        cursor.erase_marks(&mut self.canvas, state);
        self.invalidate_others(ShapeKind::Cursor);
        self.redraw_keeping_moving();
        Ok(())
    }

    /// Forget the recorded clicks of a cursor.
    pub fn erase_data(&mut self, id: ShapeId) -> DrapoResult<()> {
        let index = self.index_of(id).ok_or(DrapoError::UnknownShape(id))?;
        let cursor = self.objects[index]
            .as_cursor_mut()
            .ok_or(DrapoError::UnknownShape(id))?;
        cursor.erase_data();
        Ok(())
    }

    /// Drop the backgrounds of every type but `kind` after its shapes
    /// changed the static scene; they are recaptured on their next repaint.
    fn invalidate_others(&mut self, kind: ShapeKind) {
        for (other, state) in self.states.iter_mut() {
            if *other != kind {
                state.render.invalidate();
            }
        }
    }

    /// Full redraw that keeps the animated moving shapes on screen.
    ///
    /// Nothing is drawn while no animated shape moves.
    fn redraw_keeping_moving(&mut self) {
        let mut artists: Vec<ArtistId> = Vec::new();
        let mut regions: Vec<RegionId> = Vec::new();
        for state in self.states.values().filter(|s| s.render.is_fast()) {
            for object in state.coordinator.moving().iter().filter_map(|id| self.get(*id)) {
                if let Some(region) = object.region() {
                    if !regions.contains(&region) {
                        regions.push(region);
                    }
                }
                artists.extend(object.artists());
            }
        }
        if artists.is_empty() {
            return;
        }
        self.canvas.draw();
        for artist in artists {
            self.canvas.draw_artist(artist);
        }
        for region in regions {
            self.canvas.blit(region);
        }
    }

    /// Route one event to the subscribed objects.
    pub fn handle_event(&mut self, event: CanvasEvent) {
        if matches!(event, CanvasEvent::Resize | CanvasEvent::ViewChanged(_)) {
            for state in self.states.values_mut() {
                state.render.invalidate();
            }
        }

        let kind = event.kind();
        let targets: Vec<ShapeId> = self
            .objects
            .iter()
            .map(|o| o.id())
            .filter(|id| self.is_subscribed(*id, kind))
            .collect();

        let mut repaints: Vec<(ShapeKind, RegionId, Point)> = Vec::new();
        for id in targets {
            // Earlier handlers may have deleted it.
            let Some(index) = self.index_of(id) else {
                continue;
            };
            let shape_kind = self.objects[index].kind();
            let state = self.states.entry(shape_kind).or_default();
            let outcome = self.objects[index].handle_event(&event, &mut self.canvas, state);
            // Only pointer motion leaves the static scene alone.
            if outcome != Outcome::Ignored && kind != EventKind::Motion {
                self.invalidate_others(shape_kind);
            }
            match outcome {
                Outcome::Repaint { region, mouse } => {
                    if !repaints.iter().any(|(k, ..)| *k == shape_kind) {
                        repaints.push((shape_kind, region, mouse));
                    }
                }
                Outcome::Delete => {
                    self.delete(id);
                }
                Outcome::Handled | Outcome::Ignored => {}
            }
        }

        for (shape_kind, region, mouse) in repaints {
            self.repaint(shape_kind, region, mouse);
        }
    }

    /// Recompute every moving object of a type and show the result.
    ///
    /// Shapes of other types moving in the same region are painted over it:
    /// animated ones as an overlay, the others through a fresh background.
    fn repaint(&mut self, kind: ShapeKind, region: RegionId, mouse: Point) -> RepaintPath {
        let mut overlay: Vec<ArtistId> = Vec::new();
        let mut recapture = false;
        for (other, state) in &self.states {
            if *other == kind {
                continue;
            }
            let artists: Vec<ArtistId> = state
                .coordinator
                .moving()
                .iter()
                .filter_map(|id| self.get(*id))
                .filter(|o| o.region() == Some(region))
                .flat_map(|o| o.artists())
                .collect();
            if artists.is_empty() {
                continue;
            }
            if state.render.is_fast() {
                overlay.extend(artists);
            } else {
                recapture = true;
            }
        }

        let state = self.states.entry(kind).or_default();
        if recapture {
            state.coordinator.request_snapshot();
        }
        let moving = state.coordinator.moving().to_vec();
        let objects = &mut self.objects;
        let TypeState {
            coordinator,
            render,
            ..
        } = state;
        let path = render.repaint(&mut self.canvas, region, coordinator, &overlay, |canvas| {
            objects
                .iter_mut()
                .filter(|o| moving.contains(&o.id()))
                .flat_map(|o| o.recompute_geometry(canvas, mouse))
                .collect()
        });
        log::trace!("{kind} repaint: {path:?}");
        path
    }

    /// Handle every event the canvas has ready, without waiting.
    pub fn process_events(&mut self) -> usize {
        let mut count = 0;
        while let Some(event) = self.canvas.next_event(Some(Duration::ZERO)) {
            self.handle_event(event);
            count += 1;
        }
        count
    }

    /// Pump the canvas event loop until `id` is deleted, `timeout` elapses
    /// or the loop finishes.
    pub fn block_on(&mut self, id: ShapeId, timeout: Option<Duration>) -> DrapoResult<BlockEnd> {
        if !self.contains(id) {
            return Err(DrapoError::UnknownShape(id));
        }
        self.blocking.push(id);
        let start = Instant::now();

        let end = loop {
            if let Some(object) = self.released.remove(&id) {
                break BlockEnd::Deleted(Box::new(object));
            }
            let remaining = match timeout {
                Some(limit) => match limit.checked_sub(start.elapsed()) {
                    Some(left) if !left.is_zero() => Some(left),
                    _ => break BlockEnd::TimedOut,
                },
                None => None,
            };
            match self.canvas.next_event(remaining) {
                Some(event) => self.handle_event(event),
                None if timeout.is_some_and(|limit| start.elapsed() >= limit) => {
                    break BlockEnd::TimedOut;
                }
                None => break BlockEnd::LoopEnded,
            }
        };

        self.blocking.retain(|b| *b != id);
        match &end {
            BlockEnd::Deleted(object) => log::info!("blocking wait ended: {object} deleted"),
            BlockEnd::TimedOut => log::info!("blocking wait timed out"),
            BlockEnd::LoopEnded => log::info!("blocking wait ended with the event loop"),
        }
        Ok(end)
    }
}
