//! Drapo Core Library
//!
//! Draggable objects on interactive plots: cursors following the mouse,
//! lines and rectangles dragged by their points, edges or body, and blocking
//! helpers collecting clicks. Backend-agnostic: any canvas implementing
//! [`Canvas`] can host them.

pub mod canvas;
pub mod error;
pub mod figure;
pub mod ginput;
pub mod input;
pub mod motion;
pub mod objects;
pub mod options;
pub mod render;
pub mod selection;
pub mod shapes;
pub mod style;
pub mod transform;

pub use canvas::{Artist, ArtistId, Canvas, Geometry, RegionId};
pub use error::{DrapoError, DrapoResult};
pub use figure::{BlockEnd, DeleteScope, Figure};
pub use ginput::{ginput, linput, rinput};
pub use input::{CanvasEvent, EventKind, Key, KeyEvent, KeyPress, MouseButton, PointerEvent};
pub use motion::{MotionCoordinator, MotionPhase};
pub use objects::{Cursor, Interactive, InteractiveObject, Line, Outcome, Rect, TypeState};
pub use options::{CursorOptions, GinputOptions, LineOptions, RectOptions, RinputOptions};
pub use render::{RenderEngine, RepaintPath};
pub use shapes::{ElementRole, MotionMode, ShapeId, ShapeKind};
pub use style::{ArtistStyle, LineStyle, MarkShape, Marker, Palette, Rgba};
pub use transform::{AxisScale, DataTransform, ViewLimits};
