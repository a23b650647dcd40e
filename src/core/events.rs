//! Input and window event records.

use crate::gfx::Point;

/// Identifier of a physical input device, assigned by the input stack.
pub type DeviceId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
}

/// A keyboard event as delivered by an input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// Originating keyboard device.
    pub device: DeviceId,
    pub action: KeyAction,
    /// Key scan code.
    pub key: u32,
    /// Active modifier mask.
    pub mods: u32,
}

/// A pointing device event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// Relative movement.
    Move(Point),
    Press(u32),
    Release(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    /// Originating pointing device.
    pub device: DeviceId,
    pub action: PointerAction,
}

/// Events delivered to a window's owning client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The window gained keyboard focus.
    Focus,
    /// The window lost keyboard focus.
    Unfocus,
    Keyboard(KeyboardEvent),
    /// A pointer button event, position in window-local coordinates.
    Button {
        button: u32,
        pressed: bool,
        pos: Point,
    },
    /// The user asked the window to close.
    Close,
}
