//! Repainting of moving shapes.
//!
//! Two paths produce the same picture:
//!
//! - full redraw: recompute the moving shapes, then redraw the whole canvas;
//! - fast path: capture the background once per episode (with the moving
//!   artists animated, so they are left out of it), then for every motion
//!   restore it, recompute, paint only the moving artists and blit.
//!
//! Shapes of other types moving in the same gesture are passed as an
//! overlay: they are animated too, so every repaint paints them on top.

use crate::canvas::{ArtistId, Canvas, RegionId};
use crate::motion::MotionCoordinator;
use crate::transform::DataTransform;

/// Which path a repaint took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepaintPath {
    /// Whole canvas redrawn.
    Full,
    /// Background (re)captured, then moving artists blitted.
    Captured,
    /// Moving artists blitted on the saved background.
    Blitted,
}

#[derive(Debug)]
struct Background<S> {
    snapshot: S,
    region: RegionId,
    transform: Option<DataTransform>,
}

/// Background snapshot and fast-path flag of one shape type.
#[derive(Debug)]
pub struct RenderEngine<S> {
    fast: bool,
    background: Option<Background<S>>,
}

impl<S> Default for RenderEngine<S> {
    fn default() -> Self {
        Self::new(true)
    }
}

impl<S> RenderEngine<S> {
    pub fn new(fast: bool) -> Self {
        Self {
            fast,
            background: None,
        }
    }

    pub fn is_fast(&self) -> bool {
        self.fast
    }

    /// Select the path for later repaints (the last created shape decides).
    pub fn set_fast(&mut self, fast: bool) {
        if self.fast != fast {
            log::debug!("render: fast path {}", if fast { "on" } else { "off" });
            self.background = None;
        }
        self.fast = fast;
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    /// Drop the saved background (resize, rescale).
    pub fn invalidate(&mut self) {
        self.background = None;
    }

    fn is_stale<C: Canvas<Snapshot = S>>(&self, canvas: &C, region: RegionId) -> bool {
        match &self.background {
            Some(bg) => bg.region != region || bg.transform != canvas.transform(region),
            None => true,
        }
    }

    fn capture<C: Canvas<Snapshot = S>>(&mut self, canvas: &mut C, region: RegionId) {
        let snapshot = canvas.copy_region(region);
        self.background = Some(Background {
            snapshot,
            region,
            transform: canvas.transform(region),
        });
    }

    /// Recompute the moving shapes through `update` and show the result.
    ///
    /// `update` returns the artists that moved; only they are painted on the
    /// fast path. `overlay` lists animated artists of other shapes moving in
    /// the same region, painted after them on either path.
    pub fn repaint<C, F>(
        &mut self,
        canvas: &mut C,
        region: RegionId,
        coordinator: &mut MotionCoordinator,
        overlay: &[ArtistId],
        update: F,
    ) -> RepaintPath
    where
        C: Canvas<Snapshot = S>,
        F: FnOnce(&mut C) -> Vec<ArtistId>,
    {
        if !self.fast {
            coordinator.take_snapshot_needed();
            update(canvas);
            canvas.draw();
            if !overlay.is_empty() {
                for artist in overlay {
                    canvas.draw_artist(*artist);
                }
                canvas.blit(region);
            }
            return RepaintPath::Full;
        }

        let mut path = RepaintPath::Blitted;
        if coordinator.take_snapshot_needed() || self.is_stale(canvas, region) {
            canvas.draw();
            self.capture(canvas, region);
            path = RepaintPath::Captured;
            log::trace!("render: background captured for {region:?}");
        }
        if let Some(bg) = &self.background {
            canvas.restore_region(&bg.snapshot);
        }
        for artist in update(canvas) {
            canvas.draw_artist(artist);
        }
        for artist in overlay {
            canvas.draw_artist(*artist);
        }
        canvas.blit(region);
        path
    }

    /// Full redraw at the end of an episode or after marks changed; the
    /// background is recaptured right away on the fast path.
    pub fn settle<C: Canvas<Snapshot = S>>(&mut self, canvas: &mut C, region: RegionId) {
        canvas.draw();
        if self.fast {
            self.capture(canvas, region);
        } else {
            self.background = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Artist, Geometry};
    use crate::input::CanvasEvent;
    use crate::transform::ViewLimits;
    use kurbo::Rect;
    use std::time::Duration;
    use uuid::Uuid;

    /// Records paint operations by name.
    struct Recorder {
        ops: Vec<&'static str>,
        transform: DataTransform,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                ops: Vec::new(),
                transform: DataTransform::new(
                    Rect::new(0.0, 0.0, 100.0, 100.0),
                    ViewLimits::new(0.0, 1.0, 0.0, 1.0),
                ),
            }
        }
    }

    impl Canvas for Recorder {
        type Snapshot = ();

        fn current_region(&self) -> Option<RegionId> {
            Some(RegionId(0))
        }
        fn has_region(&self, region: RegionId) -> bool {
            region == RegionId(0)
        }
        fn transform(&self, _region: RegionId) -> Option<DataTransform> {
            Some(self.transform)
        }
        fn add_artist(&mut self, _artist: Artist) -> ArtistId {
            ArtistId(0)
        }
        fn set_geometry(&mut self, _id: ArtistId, _geometry: Geometry) {}
        fn set_animated(&mut self, _id: ArtistId, _animated: bool) {}
        fn remove_artist(&mut self, _id: ArtistId) {}
        fn draw(&mut self) {
            self.ops.push("draw");
        }
        fn copy_region(&mut self, _region: RegionId) {
            self.ops.push("copy");
        }
        fn restore_region(&mut self, _snapshot: &()) {
            self.ops.push("restore");
        }
        fn draw_artist(&mut self, _id: ArtistId) {
            self.ops.push("draw_artist");
        }
        fn blit(&mut self, _region: RegionId) {
            self.ops.push("blit");
        }
        fn next_event(&mut self, _timeout: Option<Duration>) -> Option<CanvasEvent> {
            None
        }
    }

    fn moved(canvas: &mut Recorder) -> Vec<ArtistId> {
        canvas.ops.push("update");
        vec![ArtistId(1), ArtistId(2)]
    }

    #[test]
    fn test_fast_path_captures_once_per_episode() {
        let mut canvas = Recorder::new();
        let mut engine = RenderEngine::new(true);
        let mut coordinator = MotionCoordinator::new();
        coordinator.begin(Uuid::new_v4());

        let first = engine.repaint(&mut canvas, RegionId(0), &mut coordinator, &[], moved);
        assert_eq!(first, RepaintPath::Captured);
        assert_eq!(
            canvas.ops,
            ["draw", "copy", "restore", "update", "draw_artist", "draw_artist", "blit"]
        );

        canvas.ops.clear();
        let second = engine.repaint(&mut canvas, RegionId(0), &mut coordinator, &[], moved);
        assert_eq!(second, RepaintPath::Blitted);
        assert_eq!(canvas.ops, ["restore", "update", "draw_artist", "draw_artist", "blit"]);
    }

    #[test]
    fn test_rescale_forces_recapture() {
        let mut canvas = Recorder::new();
        let mut engine = RenderEngine::new(true);
        let mut coordinator = MotionCoordinator::new();
        coordinator.begin(Uuid::new_v4());
        engine.repaint(&mut canvas, RegionId(0), &mut coordinator, &[], moved);

        canvas.transform = canvas.transform.with_limits(ViewLimits::new(0.0, 2.0, 0.0, 1.0));
        let path = engine.repaint(&mut canvas, RegionId(0), &mut coordinator, &[], moved);
        assert_eq!(path, RepaintPath::Captured);

        engine.invalidate();
        assert!(!engine.has_background());
        let path = engine.repaint(&mut canvas, RegionId(0), &mut coordinator, &[], moved);
        assert_eq!(path, RepaintPath::Captured);
    }

    #[test]
    fn test_full_path_redraws() {
        let mut canvas = Recorder::new();
        let mut engine = RenderEngine::new(false);
        let mut coordinator = MotionCoordinator::new();
        coordinator.begin(Uuid::new_v4());
        let path = engine.repaint(&mut canvas, RegionId(0), &mut coordinator, &[], moved);
        assert_eq!(path, RepaintPath::Full);
        assert_eq!(canvas.ops, ["update", "draw"]);
        assert!(!coordinator.snapshot_needed());
    }

    #[test]
    fn test_overlay_painted_after_moving_artists() {
        let mut canvas = Recorder::new();
        let mut coordinator = MotionCoordinator::new();
        coordinator.begin(Uuid::new_v4());

        let mut fast = RenderEngine::new(true);
        fast.repaint(&mut canvas, RegionId(0), &mut coordinator, &[ArtistId(7)], moved);
        assert_eq!(
            canvas.ops,
            [
                "draw",
                "copy",
                "restore",
                "update",
                "draw_artist",
                "draw_artist",
                "draw_artist",
                "blit"
            ]
        );

        canvas.ops.clear();
        let mut full = RenderEngine::new(false);
        full.repaint(&mut canvas, RegionId(0), &mut coordinator, &[ArtistId(7)], moved);
        assert_eq!(canvas.ops, ["update", "draw", "draw_artist", "blit"]);
    }

    #[test]
    fn test_settle_recaptures_on_fast_path() {
        let mut canvas = Recorder::new();
        let mut engine = RenderEngine::<()>::new(true);
        engine.settle(&mut canvas, RegionId(0));
        assert!(engine.has_background());
        assert_eq!(canvas.ops, ["draw", "copy"]);

        engine.set_fast(false);
        assert!(!engine.has_background());
        canvas.ops.clear();
        engine.settle(&mut canvas, RegionId(0));
        assert_eq!(canvas.ops, ["draw"]);
    }
}
