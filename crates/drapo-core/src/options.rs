//! Construction options of the interactive objects.
//!
//! Appearance fields are plain strings in the usual plotting notation
//! (`"r"`, `"#eeeeee"`, `"--"`, `"+"`). They are resolved when the object is
//! created; anything unrecognized is logged and replaced by the default.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::canvas::RegionId;
use crate::error::DrapoResult;

fn from_json<T: DeserializeOwned>(json: &str) -> DrapoResult<T> {
    Ok(serde_json::from_str(json)?)
}

/// Timeout in seconds, `0` (or less) meaning no timeout.
pub fn timeout_duration(seconds: f64) -> Option<Duration> {
    (seconds > 0.0 && seconds.is_finite()).then(|| Duration::from_secs_f64(seconds))
}

/// Options of a [`Cursor`](crate::objects::Cursor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorOptions {
    /// Line color; the palette default when unset.
    pub color: Option<String>,
    pub line_style: String,
    pub line_width: f64,
    pub horizontal: bool,
    pub vertical: bool,
    pub fast_render: bool,
    /// Leave a mark at every recorded click.
    pub show_clicks: bool,
    /// Store click positions.
    pub record_clicks: bool,
    pub add_button: u16,
    pub remove_button: u16,
    pub stop_button: u16,
    pub max_clicks: usize,
    pub blocking: bool,
    pub visible_initially: bool,
    /// Data position `(x, y)` in the current region to draw the lines at
    /// right away; otherwise they appear with the first pointer event.
    pub position: Option<(f64, f64)>,
    /// Seconds; 0 waits forever.
    pub timeout: f64,
    /// `"+"`-like glyph, `"hline"`, `"vline"` or `"crosshair"`.
    pub mark_shape: String,
    pub mark_size: f64,
    pub mark_line_style: String,
}

impl Default for CursorOptions {
    fn default() -> Self {
        Self {
            color: None,
            line_style: ":".to_string(),
            line_width: 1.0,
            horizontal: true,
            vertical: true,
            fast_render: true,
            show_clicks: false,
            record_clicks: false,
            add_button: 1,
            remove_button: 3,
            stop_button: 2,
            max_clicks: 1000,
            blocking: false,
            visible_initially: true,
            position: None,
            timeout: 0.0,
            mark_shape: "+".to_string(),
            mark_size: 10.0,
            mark_line_style: "-".to_string(),
        }
    }
}

impl CursorOptions {
    pub fn from_json(json: &str) -> DrapoResult<Self> {
        from_json(json)
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_line_style(mut self, style: impl Into<String>) -> Self {
        self.line_style = style.into();
        self
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }

    pub fn with_lines(mut self, horizontal: bool, vertical: bool) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }

    pub fn with_fast_render(mut self, fast: bool) -> Self {
        self.fast_render = fast;
        self
    }

    pub fn with_show_clicks(mut self, show: bool) -> Self {
        self.show_clicks = show;
        self
    }

    pub fn with_record_clicks(mut self, record: bool) -> Self {
        self.record_clicks = record;
        self
    }

    /// Buttons adding, removing and stopping (1 = left, 2 = middle, 3 = right).
    pub fn with_buttons(mut self, add: u16, remove: u16, stop: u16) -> Self {
        self.add_button = add;
        self.remove_button = remove;
        self.stop_button = stop;
        self
    }

    pub fn with_max_clicks(mut self, max_clicks: usize) -> Self {
        self.max_clicks = max_clicks;
        self
    }

    pub fn with_blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible_initially = visible;
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some((x, y));
        self
    }

    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn with_marks(mut self, shape: impl Into<String>, size: f64) -> Self {
        self.mark_shape = shape.into();
        self.mark_size = size;
        self
    }
}

/// Options of a [`Line`](crate::objects::Line).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineOptions {
    /// Region to place the line in; the current region when unset.
    pub region: Option<RegionId>,
    /// Pick tolerance in pixels.
    pub pick_radius: f64,
    pub color: Option<String>,
    pub marker: String,
    pub marker_size: f64,
    pub line_style: String,
    pub line_width: f64,
    /// Shift the new line away from existing ones.
    pub avoid_overlap: bool,
    pub fast_render: bool,
    pub blocking: bool,
    pub timeout: f64,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            region: None,
            pick_radius: 5.0,
            color: None,
            marker: ".".to_string(),
            marker_size: 5.0,
            line_style: "-".to_string(),
            line_width: 1.0,
            avoid_overlap: true,
            fast_render: true,
            blocking: false,
            timeout: 0.0,
        }
    }
}

impl LineOptions {
    pub fn from_json(json: &str) -> DrapoResult<Self> {
        from_json(json)
    }

    pub fn with_region(mut self, region: RegionId) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_pick_radius(mut self, radius: f64) -> Self {
        self.pick_radius = radius;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>, size: f64) -> Self {
        self.marker = marker.into();
        self.marker_size = size;
        self
    }

    pub fn with_line_style(mut self, style: impl Into<String>) -> Self {
        self.line_style = style.into();
        self
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }

    pub fn with_avoid_overlap(mut self, avoid: bool) -> Self {
        self.avoid_overlap = avoid;
        self
    }

    pub fn with_fast_render(mut self, fast: bool) -> Self {
        self.fast_render = fast;
        self
    }

    pub fn with_blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout = seconds;
        self
    }
}

/// Options of a [`Rect`](crate::objects::Rect).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectOptions {
    pub region: Option<RegionId>,
    /// `(x, y, width, height)` in data coordinates; centered in the view
    /// when unset.
    pub position: Option<(f64, f64, f64, f64)>,
    pub pick_radius: f64,
    pub color: Option<String>,
    pub marker: String,
    pub marker_size: f64,
    pub line_style: String,
    pub line_width: f64,
    pub fast_render: bool,
    pub blocking: bool,
    pub timeout: f64,
}

impl Default for RectOptions {
    fn default() -> Self {
        Self {
            region: None,
            position: None,
            pick_radius: 5.0,
            color: None,
            marker: ".".to_string(),
            marker_size: 8.0,
            line_style: "-".to_string(),
            line_width: 1.0,
            fast_render: true,
            blocking: false,
            timeout: 0.0,
        }
    }
}

impl RectOptions {
    pub fn from_json(json: &str) -> DrapoResult<Self> {
        from_json(json)
    }

    pub fn with_region(mut self, region: RegionId) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_position(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.position = Some((x, y, width, height));
        self
    }

    pub fn with_pick_radius(mut self, radius: f64) -> Self {
        self.pick_radius = radius;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>, size: f64) -> Self {
        self.marker = marker.into();
        self.marker_size = size;
        self
    }

    pub fn with_line_style(mut self, style: impl Into<String>) -> Self {
        self.line_style = style.into();
        self
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }

    pub fn with_fast_render(mut self, fast: bool) -> Self {
        self.fast_render = fast;
        self
    }

    pub fn with_blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout = seconds;
        self
    }
}

/// Options of [`rinput`](crate::ginput::rinput): a rectangle whose wait the
/// helper runs itself.
pub type RinputOptions = RectOptions;

/// Options of [`ginput`](crate::ginput::ginput).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GinputOptions {
    pub max_clicks: usize,
    pub timeout: f64,
    pub show_clicks: bool,
    pub add_button: u16,
    pub remove_button: u16,
    pub stop_button: u16,
    pub color: Option<String>,
    pub line_style: String,
    pub line_width: f64,
    pub horizontal: bool,
    pub vertical: bool,
    pub fast_render: bool,
    pub mark_shape: String,
    pub mark_size: f64,
}

impl Default for GinputOptions {
    fn default() -> Self {
        Self {
            max_clicks: 1,
            timeout: 0.0,
            show_clicks: true,
            add_button: 1,
            remove_button: 3,
            stop_button: 2,
            color: None,
            line_style: ":".to_string(),
            line_width: 1.0,
            horizontal: true,
            vertical: true,
            fast_render: true,
            mark_shape: "+".to_string(),
            mark_size: 10.0,
        }
    }
}

impl GinputOptions {
    pub fn from_json(json: &str) -> DrapoResult<Self> {
        from_json(json)
    }

    pub fn with_max_clicks(mut self, max_clicks: usize) -> Self {
        self.max_clicks = max_clicks;
        self
    }

    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn with_show_clicks(mut self, show: bool) -> Self {
        self.show_clicks = show;
        self
    }

    pub fn with_buttons(mut self, add: u16, remove: u16, stop: u16) -> Self {
        self.add_button = add;
        self.remove_button = remove;
        self.stop_button = stop;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_fast_render(mut self, fast: bool) -> Self {
        self.fast_render = fast;
        self
    }

    /// Recording cursor for these options; [`ginput`](crate::ginput::ginput)
    /// runs the blocking wait itself.
    pub fn cursor_options(&self) -> CursorOptions {
        CursorOptions {
            color: self.color.clone(),
            line_style: self.line_style.clone(),
            line_width: self.line_width,
            horizontal: self.horizontal,
            vertical: self.vertical,
            fast_render: self.fast_render,
            show_clicks: self.show_clicks,
            record_clicks: true,
            add_button: self.add_button,
            remove_button: self.remove_button,
            stop_button: self.stop_button,
            max_clicks: self.max_clicks,
            blocking: false,
            visible_initially: true,
            position: None,
            timeout: self.timeout,
            mark_shape: self.mark_shape.clone(),
            mark_size: self.mark_size,
            mark_line_style: "-".to_string(),
        }
    }
}
