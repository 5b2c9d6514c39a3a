//! Headless canvas.
//!
//! A display-list raster model: "pixels" are the painted artists, already
//! mapped to pixel coordinates. The back buffer and the screen are kept
//! apart so the blit path can be checked against a full redraw. Events come
//! from a scripted queue instead of a window.

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use drapo_core::canvas::{Artist, ArtistId, Canvas, Geometry, RegionId};
use drapo_core::input::{CanvasEvent, KeyEvent, KeyPress, MouseButton, PointerEvent};
use drapo_core::style::ArtistStyle;
use drapo_core::transform::{AxisScale, DataTransform, ViewLimits};
use kurbo::{Point, Rect};
use peniko::Color;

use crate::{CanvasError, CanvasResult};

/// One artist as painted, geometry in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Painted {
    pub artist: ArtistId,
    pub region: RegionId,
    pub geometry: Geometry,
    pub style: ArtistStyle,
}

/// Saved back buffer content of one region.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    region: RegionId,
    items: Vec<Painted>,
}

impl Snapshot {
    pub fn region(&self) -> RegionId {
        self.region
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Paint operation counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaintStats {
    /// Full redraws.
    pub draws: usize,
    pub snapshots: usize,
    pub restores: usize,
    pub blits: usize,
    /// Single artists painted with `draw_artist`.
    pub artist_draws: usize,
}

#[derive(Debug, Clone)]
struct Region {
    id: RegionId,
    transform: DataTransform,
}

/// In-memory canvas with scripted input.
#[derive(Debug, Default)]
pub struct HeadlessCanvas {
    regions: Vec<Region>,
    current: Option<RegionId>,
    artists: BTreeMap<ArtistId, Artist>,
    next_artist: u64,
    back: Vec<Painted>,
    screen: Vec<Painted>,
    events: VecDeque<CanvasEvent>,
    pointer: Option<Point>,
    stats: PaintStats,
}

impl HeadlessCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas with a single region.
    pub fn with_region(bbox: Rect, limits: ViewLimits) -> CanvasResult<(Self, RegionId)> {
        let mut canvas = Self::new();
        let region = canvas.add_region(bbox, limits)?;
        Ok((canvas, region))
    }

    /// Add a region covering `bbox` (pixels, y up). The first region
    /// becomes the current one.
    pub fn add_region(&mut self, bbox: Rect, limits: ViewLimits) -> CanvasResult<RegionId> {
        if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return Err(CanvasError::EmptyRegion(bbox));
        }
        let id = RegionId(self.regions.len() as u32);
        self.regions.push(Region {
            id,
            transform: DataTransform::new(bbox, limits),
        });
        if self.current.is_none() {
            self.current = Some(id);
        }
        log::debug!("headless: region {id:?} added at {bbox:?}");
        Ok(id)
    }

    pub fn set_current(&mut self, region: RegionId) -> CanvasResult<()> {
        self.region(region)?;
        self.current = Some(region);
        Ok(())
    }

    fn region(&self, region: RegionId) -> CanvasResult<&Region> {
        self.regions
            .iter()
            .find(|r| r.id == region)
            .ok_or(CanvasError::UnknownRegion(region))
    }

    fn region_mut(&mut self, region: RegionId) -> CanvasResult<&mut Region> {
        self.regions
            .iter_mut()
            .find(|r| r.id == region)
            .ok_or(CanvasError::UnknownRegion(region))
    }

    /// Change the view limits of a region, as a pan or zoom would.
    ///
    /// Only the state changes; queue [`CanvasEvent::ViewChanged`] to notify.
    pub fn set_limits(&mut self, region: RegionId, limits: ViewLimits) -> CanvasResult<()> {
        let r = self.region_mut(region)?;
        r.transform = r.transform.with_limits(limits);
        Ok(())
    }

    /// Switch the axis scales of a region.
    pub fn set_scales(
        &mut self,
        region: RegionId,
        x_scale: AxisScale,
        y_scale: AxisScale,
    ) -> CanvasResult<()> {
        let r = self.region_mut(region)?;
        r.transform = r.transform.with_scales(x_scale, y_scale);
        Ok(())
    }

    /// Move or resize a region. Queue [`CanvasEvent::Resize`] to notify.
    pub fn resize(&mut self, region: RegionId, bbox: Rect) -> CanvasResult<()> {
        if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return Err(CanvasError::EmptyRegion(bbox));
        }
        let r = self.region_mut(region)?;
        r.transform = r.transform.with_bbox(bbox);
        Ok(())
    }

    /// Topmost region under a pixel position.
    pub fn region_at(&self, px: Point) -> Option<RegionId> {
        self.regions
            .iter()
            .rev()
            .find(|r| r.transform.contains_px(px))
            .map(|r| r.id)
    }

    pub fn artist(&self, id: ArtistId) -> Option<&Artist> {
        self.artists.get(&id)
    }

    pub fn artist_count(&self) -> usize {
        self.artists.len()
    }

    pub fn stats(&self) -> PaintStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = PaintStats::default();
    }

    fn paint(&self, id: ArtistId, artist: &Artist) -> Option<Painted> {
        let region = self.region(artist.region).ok()?;
        Some(Painted {
            artist: id,
            region: artist.region,
            geometry: artist.geometry.map(|p| region.transform.data_to_px(p)),
            style: artist.style,
        })
    }

    /// What the screen shows, sorted by artist.
    pub fn visible(&self) -> Vec<Painted> {
        let mut items = self.screen.clone();
        items.sort_by_key(|p| p.artist);
        items
    }

    /// What a full redraw with every artist (animated ones included) would
    /// show, sorted by artist.
    pub fn composed(&self) -> Vec<Painted> {
        self.artists
            .iter()
            .filter_map(|(id, a)| self.paint(*id, a))
            .collect()
    }

    /// Painted items on screen drawn with `color`.
    pub fn count_color(&self, color: Color) -> usize {
        self.screen.iter().filter(|p| p.style.color() == color).count()
    }

    /// Whether an artist is on screen.
    pub fn is_on_screen(&self, id: ArtistId) -> bool {
        self.screen.iter().any(|p| p.artist == id)
    }

    // Scripted input.

    pub fn push_event(&mut self, event: CanvasEvent) {
        self.events.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Pointer event at `px`, queueing region leave/enter first when the
    /// pointer crosses a region boundary.
    fn pointer_event(&mut self, px: Point) -> PointerEvent {
        let before = self.pointer.and_then(|p| self.region_at(p));
        let after = self.region_at(px);
        if before != after {
            if let Some(region) = before {
                self.push_event(CanvasEvent::RegionLeave(region));
            }
            if let Some(region) = after {
                self.push_event(CanvasEvent::RegionEnter(region));
            }
        }
        self.pointer = Some(px);
        PointerEvent::new(px, after)
    }

    pub fn move_to(&mut self, px: Point) {
        let event = self.pointer_event(px);
        self.push_event(CanvasEvent::Motion(event));
    }

    pub fn press_at(&mut self, px: Point, button: MouseButton) {
        let event = self.pointer_event(px).with_button(button);
        self.push_event(CanvasEvent::ButtonPress(event));
    }

    pub fn release_at(&mut self, px: Point, button: MouseButton) {
        let event = self.pointer_event(px).with_button(button);
        self.push_event(CanvasEvent::ButtonRelease(event));
    }

    pub fn click(&mut self, px: Point, button: MouseButton) {
        self.press_at(px, button);
        self.release_at(px, button);
    }

    /// Press at `from`, move to `to` in `steps` motions, release.
    pub fn drag(&mut self, from: Point, to: Point, steps: usize, button: MouseButton) {
        self.press_at(from, button);
        let steps = steps.max(1);
        for i in 1..=steps {
            self.move_to(from.lerp(to, i as f64 / steps as f64));
        }
        self.release_at(to, button);
    }

    /// Key press at the last pointer position.
    pub fn key(&mut self, key: KeyPress) {
        let position = self.pointer;
        let region = position.and_then(|px| self.region_at(px));
        self.push_event(CanvasEvent::KeyPress(KeyEvent {
            key,
            position,
            region,
        }));
    }

    pub fn close(&mut self) {
        self.push_event(CanvasEvent::Close);
    }
}

impl Canvas for HeadlessCanvas {
    type Snapshot = Snapshot;

    fn current_region(&self) -> Option<RegionId> {
        self.current
    }

    fn has_region(&self, region: RegionId) -> bool {
        self.region(region).is_ok()
    }

    fn transform(&self, region: RegionId) -> Option<DataTransform> {
        self.region(region).ok().map(|r| r.transform)
    }

    fn add_artist(&mut self, artist: Artist) -> ArtistId {
        let id = ArtistId(self.next_artist);
        self.next_artist += 1;
        self.artists.insert(id, artist);
        id
    }

    fn set_geometry(&mut self, id: ArtistId, geometry: Geometry) {
        if let Some(artist) = self.artists.get_mut(&id) {
            artist.geometry = geometry;
        }
    }

    fn set_animated(&mut self, id: ArtistId, animated: bool) {
        if let Some(artist) = self.artists.get_mut(&id) {
            artist.animated = animated;
        }
    }

    fn remove_artist(&mut self, id: ArtistId) {
        self.artists.remove(&id);
    }

    fn draw(&mut self) {
        self.back = self
            .artists
            .iter()
            .filter(|(_, a)| !a.animated)
            .filter_map(|(id, a)| self.paint(*id, a))
            .collect();
        self.screen = self.back.clone();
        self.stats.draws += 1;
    }

    fn copy_region(&mut self, region: RegionId) -> Snapshot {
        self.stats.snapshots += 1;
        Snapshot {
            region,
            items: self.back.iter().filter(|p| p.region == region).cloned().collect(),
        }
    }

    fn restore_region(&mut self, snapshot: &Snapshot) {
        self.back.retain(|p| p.region != snapshot.region);
        self.back.extend(snapshot.items.iter().cloned());
        self.stats.restores += 1;
    }

    fn draw_artist(&mut self, id: ArtistId) {
        let Some(artist) = self.artists.get(&id) else {
            return;
        };
        if let Some(painted) = self.paint(id, artist) {
            self.back.push(painted);
            self.stats.artist_draws += 1;
        }
    }

    fn blit(&mut self, region: RegionId) {
        self.screen.retain(|p| p.region != region);
        self.screen
            .extend(self.back.iter().filter(|p| p.region == region).cloned());
        self.stats.blits += 1;
    }

    fn next_event(&mut self, _timeout: Option<Duration>) -> Option<CanvasEvent> {
        self.events.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drapo_core::style::{LineStyle, Rgba};

    fn canvas() -> (HeadlessCanvas, RegionId) {
        HeadlessCanvas::with_region(
            Rect::new(0.0, 0.0, 200.0, 200.0),
            ViewLimits::new(0.0, 1.0, 0.0, 1.0),
        )
        .unwrap()
    }

    fn segment(region: RegionId) -> Artist {
        Artist::new(
            region,
            Geometry::segment(Point::new(0.0, 0.0), Point::new(1.0, 1.0)),
            ArtistStyle::segment(Rgba::rgb(255, 0, 0), 1.0, LineStyle::Solid),
        )
    }

    #[test]
    fn test_empty_region_rejected() {
        let mut canvas = HeadlessCanvas::new();
        let err = canvas
            .add_region(Rect::new(0.0, 0.0, 0.0, 10.0), ViewLimits::new(0.0, 1.0, 0.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, CanvasError::EmptyRegion(_)));
        assert_eq!(canvas.current_region(), None);
    }

    #[test]
    fn test_draw_maps_to_pixels_and_skips_animated() {
        let (mut canvas, region) = canvas();
        let a = canvas.add_artist(segment(region));
        let mut animated = segment(region);
        animated.animated = true;
        let b = canvas.add_artist(animated);

        canvas.draw();
        let visible = canvas.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].artist, a);
        assert_eq!(
            visible[0].geometry.vertices(),
            &[Point::new(0.0, 0.0), Point::new(200.0, 200.0)]
        );
        assert!(!canvas.is_on_screen(b));
    }

    #[test]
    fn test_restore_draw_blit_matches_composed() {
        let (mut canvas, region) = canvas();
        canvas.add_artist(segment(region));
        let mut moving = segment(region);
        moving.animated = true;
        let m = canvas.add_artist(moving);

        canvas.draw();
        let snapshot = canvas.copy_region(region);
        assert_eq!(snapshot.len(), 1);

        canvas.set_geometry(m, Geometry::point(Point::new(0.5, 0.5)));
        canvas.restore_region(&snapshot);
        canvas.draw_artist(m);
        canvas.blit(region);

        assert_eq!(canvas.visible(), canvas.composed());
        assert_eq!(
            canvas.stats(),
            PaintStats {
                draws: 1,
                snapshots: 1,
                restores: 1,
                blits: 1,
                artist_draws: 1,
            }
        );
    }

    #[test]
    fn test_region_at_and_scripted_events() {
        let mut canvas = HeadlessCanvas::new();
        let left = canvas
            .add_region(Rect::new(0.0, 0.0, 100.0, 100.0), ViewLimits::new(0.0, 1.0, 0.0, 1.0))
            .unwrap();
        let right = canvas
            .add_region(Rect::new(120.0, 0.0, 220.0, 100.0), ViewLimits::new(0.0, 1.0, 0.0, 1.0))
            .unwrap();
        assert_eq!(canvas.region_at(Point::new(50.0, 50.0)), Some(left));
        assert_eq!(canvas.region_at(Point::new(150.0, 50.0)), Some(right));
        assert_eq!(canvas.region_at(Point::new(110.0, 50.0)), None);

        canvas.drag(Point::new(10.0, 10.0), Point::new(150.0, 10.0), 2, MouseButton::Left);
        // enter, press, motion, leave, enter, motion, release
        assert_eq!(canvas.pending_events(), 7);
        assert_eq!(canvas.next_event(None), Some(CanvasEvent::RegionEnter(left)));
        let Some(CanvasEvent::ButtonPress(press)) = canvas.next_event(None) else {
            panic!("expected a press");
        };
        assert_eq!(press.region, Some(left));
        assert_eq!(press.button, Some(MouseButton::Left));
        let Some(CanvasEvent::Motion(motion)) = canvas.next_event(None) else {
            panic!("expected a motion");
        };
        assert_eq!(motion.position, Point::new(80.0, 10.0));
        assert_eq!(motion.region, Some(left));
        assert_eq!(canvas.next_event(None), Some(CanvasEvent::RegionLeave(left)));
        assert_eq!(canvas.next_event(None), Some(CanvasEvent::RegionEnter(right)));
        let Some(CanvasEvent::Motion(motion)) = canvas.next_event(None) else {
            panic!("expected a motion");
        };
        assert_eq!(motion.region, Some(right));
    }

    #[test]
    fn test_set_limits_changes_transform() {
        let (mut canvas, region) = canvas();
        let before = canvas.transform(region);
        canvas.set_limits(region, ViewLimits::new(0.0, 2.0, 0.0, 2.0)).unwrap();
        assert_ne!(canvas.transform(region), before);
        assert!(canvas.set_limits(RegionId(9), ViewLimits::new(0.0, 1.0, 0.0, 1.0)).is_err());
    }
}
