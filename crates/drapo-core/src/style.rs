//! Appearance of drawable elements: colors, palette, line styles, markers.

use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Serialize};

/// Color stored as RGBA8 so it can be compared and serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Not completely black, so the element stays visible on dark backgrounds.
    pub const fn near_black() -> Self {
        Self::rgb(0x11, 0x11, 0x11)
    }

    /// Not completely white, so the element stays visible on light backgrounds.
    pub const fn near_white() -> Self {
        Self::rgb(0xee, 0xee, 0xee)
    }

    /// Parse a color given as a single-letter plot code (`"r"`, `"k"`, ...),
    /// a CSS color name or a hex string.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        let short = match spec {
            "k" => Some(Self::rgb(0, 0, 0)),
            "w" => Some(Self::rgb(255, 255, 255)),
            "r" => Some(Self::rgb(255, 0, 0)),
            "g" => Some(Self::rgb(0, 128, 0)),
            "b" => Some(Self::rgb(0, 0, 255)),
            "c" => Some(Self::rgb(0, 191, 191)),
            "m" => Some(Self::rgb(191, 0, 191)),
            "y" => Some(Self::rgb(191, 191, 0)),
            _ => None,
        };
        short.or_else(|| {
            parse_color(spec)
                .ok()
                .map(|c| Self::from(c.to_alpha_color::<Srgb>()))
        })
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Colors an object type cycles through.
///
/// User-supplied colors that are not in the palette yet are appended, so
/// they become part of the cycle for every object of the type.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: vec![
                Rgba::near_black(),
                Rgba::rgb(255, 0, 0),
                Rgba::rgb(0, 0, 255),
                Rgba::rgb(0, 128, 0),
                Rgba::near_white(),
            ],
        }
    }
}

impl Palette {
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Default color of the type (first palette entry).
    pub fn default_color(&self) -> Rgba {
        self.colors.first().copied().unwrap_or(Rgba::near_black())
    }

    /// Resolve a requested color, registering it in the palette.
    ///
    /// Unknown colors fall back to the default with a warning.
    pub fn resolve(&mut self, spec: Option<&str>) -> Rgba {
        let Some(spec) = spec else {
            return self.default_color();
        };
        match Rgba::parse(spec) {
            Some(color) => {
                if !self.colors.contains(&color) {
                    self.colors.push(color);
                }
                color
            }
            None => {
                log::warn!("color {spec:?} not recognized, falling back to default");
                self.default_color()
            }
        }
    }

    /// Step `step` entries away from `current`, wrapping around.
    pub fn cycle(&self, current: Rgba, step: isize) -> Rgba {
        if self.colors.is_empty() {
            return current;
        }
        let len = self.colors.len() as isize;
        let index = self.colors.iter().position(|c| *c == current).unwrap_or(0) as isize;
        self.colors[(index + step).rem_euclid(len) as usize]
    }
}

/// Dash pattern of a connecting segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl LineStyle {
    /// Parse plot-style codes (`"-"`, `"--"`, `":"`, `"-."`) or names.
    pub fn parse(spec: &str) -> Option<Self> {
        match spec.trim() {
            "-" | "solid" => Some(LineStyle::Solid),
            "--" | "dashed" => Some(LineStyle::Dashed),
            ":" | "dotted" => Some(LineStyle::Dotted),
            "-." | "dashdot" => Some(LineStyle::DashDot),
            _ => None,
        }
    }

    /// Parse with a warning and a fallback.
    pub fn parse_or(spec: &str, fallback: LineStyle) -> Self {
        Self::parse(spec).unwrap_or_else(|| {
            log::warn!("line style {spec:?} not recognized, using {fallback:?}");
            fallback
        })
    }
}

/// Point marker glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Marker {
    #[default]
    Point,
    Pixel,
    Circle,
    Plus,
    Cross,
    Square,
    Diamond,
    Star,
    TriangleUp,
    TriangleDown,
}

impl Marker {
    /// Parse a single-glyph marker code (`"."`, `"+"`, `"o"`, ...).
    pub fn parse(spec: &str) -> Option<Self> {
        match spec.trim() {
            "." => Some(Marker::Point),
            "," => Some(Marker::Pixel),
            "o" => Some(Marker::Circle),
            "+" => Some(Marker::Plus),
            "x" => Some(Marker::Cross),
            "s" => Some(Marker::Square),
            "D" | "d" => Some(Marker::Diamond),
            "*" => Some(Marker::Star),
            "^" => Some(Marker::TriangleUp),
            "v" => Some(Marker::TriangleDown),
            _ => None,
        }
    }

    pub fn parse_or(spec: &str, fallback: Marker) -> Self {
        Self::parse(spec).unwrap_or_else(|| {
            log::warn!("marker {spec:?} not recognized, using {fallback:?}");
            fallback
        })
    }
}

/// Shape of the mark left at a recorded click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkShape {
    /// Point marker at the click.
    Glyph(Marker),
    /// Horizontal line spanning the region.
    HLine,
    /// Vertical line spanning the region.
    VLine,
    /// Both lines.
    Crosshair,
}

impl Default for MarkShape {
    fn default() -> Self {
        MarkShape::Glyph(Marker::Plus)
    }
}

impl MarkShape {
    pub fn parse(spec: &str) -> Option<Self> {
        match spec.trim() {
            "hline" => Some(MarkShape::HLine),
            "vline" => Some(MarkShape::VLine),
            "crosshair" => Some(MarkShape::Crosshair),
            other => Marker::parse(other).map(MarkShape::Glyph),
        }
    }

    pub fn parse_or(spec: &str, fallback: MarkShape) -> Self {
        Self::parse(spec).unwrap_or_else(|| {
            log::warn!("mark shape {spec:?} not recognized, using {fallback:?}");
            fallback
        })
    }
}

/// Full appearance of one drawable element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArtistStyle {
    pub color: Rgba,
    pub line_width: f64,
    pub line_style: LineStyle,
    /// Marker drawn at each vertex (None = plain polyline).
    pub marker: Option<Marker>,
    pub marker_size: f64,
}

impl Default for ArtistStyle {
    fn default() -> Self {
        Self {
            color: Rgba::near_black(),
            line_width: 1.0,
            line_style: LineStyle::Solid,
            marker: None,
            marker_size: 5.0,
        }
    }
}

impl ArtistStyle {
    /// Style of a connecting segment.
    pub fn segment(color: Rgba, line_width: f64, line_style: LineStyle) -> Self {
        Self {
            color,
            line_width,
            line_style,
            marker: None,
            marker_size: 0.0,
        }
    }

    /// Style of a point marker.
    pub fn marker(color: Rgba, marker: Marker, marker_size: f64) -> Self {
        Self {
            color,
            line_width: 1.0,
            line_style: LineStyle::Solid,
            marker: Some(marker),
            marker_size,
        }
    }

    pub fn color(&self) -> Color {
        self.color.into()
    }
}
