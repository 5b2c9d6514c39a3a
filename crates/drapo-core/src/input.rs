//! Input events delivered by the canvas event loop.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use winit::keyboard::{Key as WinitKey, ModifiersState, NamedKey};

use crate::canvas::RegionId;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(u16),
}

impl MouseButton {
    /// Button from its conventional number (1 = left, 2 = middle, 3 = right).
    pub fn from_index(index: u16) -> Self {
        match index {
            1 => MouseButton::Left,
            2 => MouseButton::Middle,
            3 => MouseButton::Right,
            n => MouseButton::Other(n),
        }
    }
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Back => MouseButton::Other(8),
            winit::event::MouseButton::Forward => MouseButton::Other(9),
            winit::event::MouseButton::Other(n) => MouseButton::Other(n),
        }
    }
}

/// Keys interactive objects react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Space,
    Enter,
    Up,
    Down,
    Left,
    Right,
    Other,
}

/// A key together with the shift modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }

    /// Convert a winit logical key.
    pub fn from_winit(key: &WinitKey, modifiers: ModifiersState) -> Self {
        let key = match key {
            WinitKey::Named(NamedKey::Space) => Key::Space,
            WinitKey::Named(NamedKey::Enter) => Key::Enter,
            WinitKey::Named(NamedKey::ArrowUp) => Key::Up,
            WinitKey::Named(NamedKey::ArrowDown) => Key::Down,
            WinitKey::Named(NamedKey::ArrowLeft) => Key::Left,
            WinitKey::Named(NamedKey::ArrowRight) => Key::Right,
            WinitKey::Character(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(' '), None) => Key::Space,
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other,
                }
            }
            _ => Key::Other,
        };
        Self {
            key,
            shift: modifiers.shift_key(),
        }
    }
}

/// Pointer state attached to button and motion events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Position in canvas pixels.
    pub position: Point,
    /// Region under the pointer, if any.
    pub region: Option<RegionId>,
    /// Button pressed or released (None for plain motion).
    pub button: Option<MouseButton>,
}

impl PointerEvent {
    pub fn new(position: Point, region: Option<RegionId>) -> Self {
        Self {
            position,
            region,
            button: None,
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }
}

/// Key press with the pointer location at the time of the press.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: KeyPress,
    pub position: Option<Point>,
    pub region: Option<RegionId>,
}

/// Event produced by the canvas event loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CanvasEvent {
    ButtonPress(PointerEvent),
    ButtonRelease(PointerEvent),
    Motion(PointerEvent),
    KeyPress(KeyEvent),
    RegionEnter(RegionId),
    RegionLeave(RegionId),
    /// The host changed the view limits of a region (pan/zoom).
    ViewChanged(RegionId),
    Resize,
    Close,
}

impl CanvasEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            CanvasEvent::ButtonPress(_) => EventKind::Press,
            CanvasEvent::ButtonRelease(_) => EventKind::Release,
            CanvasEvent::Motion(_) => EventKind::Motion,
            CanvasEvent::KeyPress(_) => EventKind::Key,
            CanvasEvent::RegionEnter(_) => EventKind::Enter,
            CanvasEvent::RegionLeave(_) => EventKind::Leave,
            CanvasEvent::ViewChanged(_) => EventKind::ViewChanged,
            CanvasEvent::Resize => EventKind::Resize,
            CanvasEvent::Close => EventKind::Close,
        }
    }
}

/// Event categories an object can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Press,
    Release,
    Motion,
    Key,
    Enter,
    Leave,
    ViewChanged,
    Resize,
    Close,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_from_index() {
        assert_eq!(MouseButton::from_index(1), MouseButton::Left);
        assert_eq!(MouseButton::from_index(3), MouseButton::Right);
        assert_eq!(MouseButton::from_index(5), MouseButton::Other(5));
    }

    #[test]
    fn test_from_winit_button() {
        assert_eq!(
            MouseButton::from(winit::event::MouseButton::Middle),
            MouseButton::Middle
        );
    }

    #[test]
    fn test_from_winit_key() {
        let up = KeyPress::from_winit(&WinitKey::Named(NamedKey::ArrowUp), ModifiersState::SHIFT);
        assert_eq!(up, KeyPress::shifted(Key::Up));

        let a = KeyPress::from_winit(&WinitKey::Character("a".into()), ModifiersState::empty());
        assert_eq!(a, KeyPress::new(Key::Char('a')));
    }

    #[test]
    fn test_event_kind() {
        let e = CanvasEvent::Motion(PointerEvent::new(Point::ZERO, None));
        assert_eq!(e.kind(), EventKind::Motion);
        assert_eq!(CanvasEvent::Close.kind(), EventKind::Close);
    }
}
