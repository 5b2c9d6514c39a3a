//! Crosshair cursor that can record clicks.

use std::fmt;
use std::time::Duration;

use kurbo::Point;

use super::{Interactive, Outcome, TypeState};
use crate::canvas::{Artist, ArtistId, Canvas, Geometry, RegionId};
use crate::input::{CanvasEvent, EventKind, Key, KeyEvent, MouseButton, PointerEvent};
use crate::options::{CursorOptions, timeout_duration};
use crate::shapes::cursor::{hline, mark, vline};
use crate::shapes::{ElementRole, MotionMode, ShapeId, ShapeKind};
use crate::style::{ArtistStyle, LineStyle, MarkShape, Marker, Rgba};
use crate::transform::ViewLimits;

/// Width step of shift+up/down, also the minimum width.
pub const WIDTH_STEP: f64 = 0.5;

const CURSOR_EVENTS: &[EventKind] = &[
    EventKind::Press,
    EventKind::Release,
    EventKind::Motion,
    EventKind::Key,
    EventKind::Enter,
    EventKind::Leave,
    EventKind::ViewChanged,
    EventKind::Close,
];

#[derive(Debug, Clone, Copy, PartialEq)]
struct CursorLines {
    horizontal: Option<ArtistId>,
    vertical: Option<ArtistId>,
}

impl CursorLines {
    fn all(&self) -> Vec<ArtistId> {
        self.horizontal.into_iter().chain(self.vertical).collect()
    }
}

/// Mouse press seen by the cursor, used to tell clicks from pan/zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CursorPress {
    region: Option<RegionId>,
    limits: Option<ViewLimits>,
}

#[derive(Debug, Clone, PartialEq)]
struct Mark {
    region: RegionId,
    artists: Vec<ArtistId>,
}

/// Horizontal and vertical lines following the mouse across a region.
///
/// The cursor hides while a button is held so the host can pan and zoom;
/// a press/release pair counts as a click only if the view limits did not
/// change in between. Recorded clicks can be marked on the plot.
///
/// Keys: space toggles visibility, shift+up/down changes the width,
/// shift+left/right cycles colors, `a` adds a point at the mouse, `z`
/// removes the last one and `enter` stops.
#[derive(Debug, Clone)]
pub struct Cursor {
    id: ShapeId,
    color: Rgba,
    line_style: LineStyle,
    line_width: f64,
    horizontal: bool,
    vertical: bool,
    show_clicks: bool,
    record_clicks: bool,
    add_button: MouseButton,
    remove_button: MouseButton,
    stop_button: MouseButton,
    max_clicks: usize,
    mark_shape: MarkShape,
    mark_size: f64,
    mark_line_style: LineStyle,
    blocking: bool,
    timeout: Option<Duration>,

    visible: bool,
    /// Region the mouse is in.
    region: Option<RegionId>,
    /// Last pointer position and its region.
    pointer: Option<(Point, RegionId)>,
    press: Option<CursorPress>,
    lines: Option<CursorLines>,
    clicks: Vec<Point>,
    marks: Vec<Mark>,
}

impl Cursor {
    /// Create a cursor.
    ///
    /// With an initial position the lines are drawn in `region` right away;
    /// otherwise they appear once the mouse is in a region.
    pub fn create<C: Canvas>(
        id: ShapeId,
        options: &CursorOptions,
        region: RegionId,
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) -> Self {
        let color = state.palette.resolve(options.color.as_deref());
        state.render.set_fast(options.fast_render);
        let mut cursor = Self {
            id,
            color,
            line_style: LineStyle::parse_or(&options.line_style, LineStyle::Dotted),
            line_width: options.line_width,
            horizontal: options.horizontal,
            vertical: options.vertical,
            show_clicks: options.show_clicks,
            record_clicks: options.record_clicks,
            add_button: MouseButton::from_index(options.add_button),
            remove_button: MouseButton::from_index(options.remove_button),
            stop_button: MouseButton::from_index(options.stop_button),
            max_clicks: options.max_clicks,
            mark_shape: MarkShape::parse_or(&options.mark_shape, MarkShape::Glyph(Marker::Plus)),
            mark_size: options.mark_size,
            mark_line_style: LineStyle::parse_or(&options.mark_line_style, LineStyle::Solid),
            blocking: options.blocking,
            timeout: timeout_duration(options.timeout),
            visible: options.visible_initially,
            region: None,
            pointer: None,
            press: None,
            lines: None,
            clicks: Vec::new(),
            marks: Vec::new(),
        };

        if let Some((x, y)) = options.position {
            match canvas.transform(region) {
                Some(transform) => {
                    let px = transform.data_to_px(Point::new(x, y));
                    cursor.region = Some(region);
                    cursor.pointer = Some((px, region));
                    if cursor.visible {
                        cursor.create_lines(region, px, canvas, state);
                    }
                }
                None => log::warn!("cursor: no transform for {region:?}, initial position ignored"),
            }
        }
        cursor
    }

    /// Recorded click positions, in data coordinates.
    pub fn click_data(&self) -> &[Point] {
        &self.clicks
    }

    pub fn click_count(&self) -> usize {
        self.clicks.len()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Number of marks on the plot.
    pub fn mark_count(&self) -> usize {
        self.marks.len()
    }

    /// Forget recorded clicks (marks stay on the plot).
    pub fn erase_data(&mut self) {
        self.clicks.clear();
    }

    /// Remove click marks from the plot (recorded clicks are kept).
    pub fn erase_marks<C: Canvas>(&mut self, canvas: &mut C, state: &mut TypeState<C::Snapshot>) {
        let region = self.marks.last().map(|m| m.region);
        for mark in self.marks.drain(..) {
            for artist in mark.artists {
                canvas.remove_artist(artist);
            }
        }
        match region {
            Some(region) => state.render.settle(canvas, region),
            None => canvas.draw(),
        }
    }

    fn line_style_of(&self) -> ArtistStyle {
        ArtistStyle::segment(self.color, self.line_width, self.line_style)
    }

    /// Draw the lines through `px` in `region`.
    fn create_lines<C: Canvas>(
        &mut self,
        region: RegionId,
        px: Point,
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) {
        if self.lines.is_some() {
            return;
        }
        let Some(transform) = canvas.transform(region) else {
            return;
        };
        let at = transform.px_to_data(px);
        let style = self.line_style_of();
        let animated = state.render.is_fast();
        let mut add = |geometry: Geometry| {
            let mut artist = Artist::new(region, geometry, style);
            artist.animated = animated;
            canvas.add_artist(artist)
        };
        let horizontal = self.horizontal.then(|| add(hline(&transform.limits, at.y)));
        let vertical = self.vertical.then(|| add(vline(&transform.limits, at.x)));
        self.lines = Some(CursorLines {
            horizontal,
            vertical,
        });
        state.coordinator.begin(self.id);
    }

    fn erase_lines<C: Canvas>(&mut self, canvas: &mut C, state: &mut TypeState<C::Snapshot>) {
        let Some(lines) = self.lines.take() else {
            return;
        };
        for artist in lines.all() {
            canvas.remove_artist(artist);
        }
        state.coordinator.evict(self.id);
        canvas.draw();
    }

    fn restyle<C: Canvas>(&mut self, canvas: &mut C, state: &mut TypeState<C::Snapshot>) {
        if self.lines.is_none() {
            return;
        }
        self.erase_lines(canvas, state);
        if let Some((px, region)) = self.pointer {
            self.create_lines(region, px, canvas, state);
        }
    }

    fn add_point<C: Canvas>(
        &mut self,
        region: RegionId,
        at: Point,
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) {
        if self.record_clicks {
            self.clicks.push(at);
        }
        if self.show_clicks {
            let Some(transform) = canvas.transform(region) else {
                return;
            };
            let style = match self.mark_shape {
                MarkShape::Glyph(marker) => ArtistStyle::marker(self.color, marker, self.mark_size),
                _ => ArtistStyle::segment(self.color, self.line_width, self.mark_line_style),
            };
            let artists = mark(self.mark_shape, at, &transform.limits)
                .into_iter()
                .map(|geometry| canvas.add_artist(Artist::new(region, geometry, style)))
                .collect();
            self.marks.push(Mark { region, artists });
        }
        if self.record_clicks || self.show_clicks {
            state.render.settle(canvas, region);
        }
    }

    fn remove_point<C: Canvas>(&mut self, canvas: &mut C, state: &mut TypeState<C::Snapshot>) {
        if self.record_clicks {
            self.clicks.pop();
        }
        if self.show_clicks {
            if let Some(last) = self.marks.pop() {
                for artist in last.artists {
                    canvas.remove_artist(artist);
                }
                state.render.settle(canvas, last.region);
            }
        }
    }

    fn quota_reached(&self) -> bool {
        self.record_clicks && self.clicks.len() >= self.max_clicks
    }

    fn enter_region<C: Canvas>(
        &mut self,
        region: RegionId,
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) {
        self.region = Some(region);
        if self.visible && self.press.is_none() {
            if let Some((px, r)) = self.pointer.filter(|(_, r)| *r == region) {
                self.create_lines(r, px, canvas, state);
            }
        }
    }

    fn leave_region<C: Canvas>(&mut self, canvas: &mut C, state: &mut TypeState<C::Snapshot>) {
        self.region = None;
        if self.visible && self.press.is_none() {
            self.erase_lines(canvas, state);
        }
    }

    /// Follow region changes reported through pointer events.
    fn track_pointer<C: Canvas>(
        &mut self,
        event: &PointerEvent,
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) {
        self.pointer = event.region.map(|r| (event.position, r));
        match (self.region, event.region) {
            (Some(current), Some(r)) if current != r => {
                self.leave_region(canvas, state);
                self.enter_region(r, canvas, state);
            }
            (None, Some(r)) => self.enter_region(r, canvas, state),
            (Some(_), None) => self.leave_region(canvas, state),
            _ => {}
        }
    }

    fn repaint_here(&self) -> Outcome {
        match (self.lines, self.pointer) {
            (Some(_), Some((mouse, region))) => Outcome::Repaint { region, mouse },
            _ => Outcome::Handled,
        }
    }

    fn on_motion<C: Canvas>(
        &mut self,
        event: &PointerEvent,
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) -> Outcome {
        self.track_pointer(event, canvas, state);
        if !self.visible || self.press.is_some() {
            return Outcome::Ignored;
        }
        let Some(region) = self.region else {
            return Outcome::Ignored;
        };
        self.create_lines(region, event.position, canvas, state);
        self.repaint_here()
    }

    fn on_press<C: Canvas>(
        &mut self,
        event: &PointerEvent,
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) -> Outcome {
        self.track_pointer(event, canvas, state);
        self.press = Some(CursorPress {
            region: event.region,
            limits: event.region.and_then(|r| canvas.transform(r)).map(|t| t.limits),
        });
        if self.visible {
            self.erase_lines(canvas, state);
        }
        Outcome::Handled
    }

    fn on_release<C: Canvas>(
        &mut self,
        event: &PointerEvent,
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) -> Outcome {
        self.track_pointer(event, canvas, state);
        let press = self.press.take();
        if self.visible {
            if let Some(region) = self.region {
                self.create_lines(region, event.position, canvas, state);
            }
        }

        // Pan/zoom changes the limits between press and release: not a click.
        let click_region = press.and_then(|press| {
            let region = event.region.filter(|r| press.region == Some(*r))?;
            let limits = canvas.transform(region).map(|t| t.limits);
            (limits == press.limits).then_some(region)
        });
        if let (Some(region), Some(button)) = (click_region, event.button) {
            if button == self.add_button {
                if let Some(transform) = canvas.transform(region) {
                    self.add_point(region, transform.px_to_data(event.position), canvas, state);
                }
            } else if button == self.remove_button {
                self.remove_point(canvas, state);
            }
        } else if press.is_some() {
            log::debug!("cursor: release after pan/zoom, click ignored");
        }

        if self.quota_reached() || event.button == Some(self.stop_button) {
            log::info!("cursor disconnected (max number of clicks, or stop button pressed)");
            return Outcome::Delete;
        }
        self.repaint_here()
    }
}

impl Interactive for Cursor {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Cursor
    }

    fn region(&self) -> Option<RegionId> {
        self.region
    }

    fn artists(&self) -> Vec<ArtistId> {
        self.lines.map(|l| l.all()).unwrap_or_default()
    }

    fn is_erased(&self) -> bool {
        self.lines.is_none()
    }

    fn is_blocking(&self) -> bool {
        self.blocking
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        CURSOR_EVENTS
    }

    /// The cursor has no pickable elements.
    fn resolve_pick(&self, _picked: &[ElementRole]) -> Option<MotionMode> {
        None
    }

    fn recompute_geometry<C: Canvas>(&mut self, canvas: &mut C, mouse: Point) -> Vec<ArtistId> {
        let (Some(lines), Some(region)) = (self.lines, self.region) else {
            return Vec::new();
        };
        let Some(transform) = canvas.transform(region) else {
            return Vec::new();
        };
        let at = transform.px_to_data(mouse);
        if let Some(h) = lines.horizontal {
            canvas.set_geometry(h, hline(&transform.limits, at.y));
        }
        if let Some(v) = lines.vertical {
            canvas.set_geometry(v, vline(&transform.limits, at.x));
        }
        lines.all()
    }

    fn on_key<C: Canvas>(
        &mut self,
        key: &KeyEvent,
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) -> Outcome {
        if let (Some(px), Some(region)) = (key.position, key.region) {
            self.pointer = Some((px, region));
        }

        match (key.key.key, key.key.shift) {
            (Key::Space, _) => {
                if self.region.is_some() {
                    if self.visible {
                        self.erase_lines(canvas, state);
                    } else if let Some((px, region)) = self.pointer {
                        self.create_lines(region, px, canvas, state);
                    }
                }
                self.visible = !self.visible;
            }
            (Key::Up, true) => {
                self.line_width += WIDTH_STEP;
                self.restyle(canvas, state);
            }
            (Key::Down, true) => {
                self.line_width = (self.line_width - WIDTH_STEP).max(WIDTH_STEP);
                self.restyle(canvas, state);
            }
            (Key::Right, true) => {
                self.color = state.palette.cycle(self.color, 1);
                self.restyle(canvas, state);
            }
            (Key::Left, true) => {
                self.color = state.palette.cycle(self.color, -1);
                self.restyle(canvas, state);
            }
            (Key::Char('a'), _) => match self.pointer {
                Some((px, region)) => match canvas.transform(region) {
                    Some(transform) => {
                        self.add_point(region, transform.px_to_data(px), canvas, state)
                    }
                    None => log::debug!("cursor: no transform for {region:?}, point not added"),
                },
                None => log::debug!("cursor: pointer outside regions, point not added"),
            },
            (Key::Char('z'), _) => self.remove_point(canvas, state),
            (Key::Enter, _) => {}
            _ => return Outcome::Ignored,
        }

        if self.quota_reached() || key.key.key == Key::Enter {
            log::info!("cursor disconnected (max number of clicks, or stop key pressed)");
            return Outcome::Delete;
        }
        state.coordinator.request_snapshot();
        self.repaint_here()
    }

    fn handle_event<C: Canvas>(
        &mut self,
        event: &CanvasEvent,
        canvas: &mut C,
        state: &mut TypeState<C::Snapshot>,
    ) -> Outcome {
        match event {
            CanvasEvent::Motion(motion) => self.on_motion(motion, canvas, state),
            CanvasEvent::ButtonPress(press) => self.on_press(press, canvas, state),
            CanvasEvent::ButtonRelease(release) => self.on_release(release, canvas, state),
            CanvasEvent::KeyPress(key) => self.on_key(key, canvas, state),
            CanvasEvent::RegionEnter(region) => {
                self.enter_region(*region, canvas, state);
                self.repaint_here()
            }
            CanvasEvent::RegionLeave(region) if self.region == Some(*region) => {
                self.leave_region(canvas, state);
                Outcome::Handled
            }
            CanvasEvent::ViewChanged(region) if self.region == Some(*region) => {
                if self.press.is_some() {
                    Outcome::Ignored
                } else {
                    self.repaint_here()
                }
            }
            CanvasEvent::Close => Outcome::Delete,
            _ => Outcome::Ignored,
        }
    }

    fn erase<C: Canvas>(&mut self, canvas: &mut C, state: &mut TypeState<C::Snapshot>) {
        self.erase_lines(canvas, state);
    }
}

fn button_name(button: MouseButton) -> String {
    match button {
        MouseButton::Left => "left".to_string(),
        MouseButton::Middle => "middle".to_string(),
        MouseButton::Right => "right".to_string(),
        MouseButton::Other(n) => format!("button {n}"),
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ShapeKind::Cursor)?;
        let button = button_name(self.add_button);
        if self.show_clicks {
            write!(f, ", marks {button} clicks")?;
        }
        if self.record_clicks {
            write!(
                f,
                ", records {button} clicks ({}/{})",
                self.clicks.len(),
                self.max_clicks
            )?;
        }
        if !self.show_clicks && !self.record_clicks {
            write!(f, ", clicks not recorded")?;
        }
        Ok(())
    }
}
