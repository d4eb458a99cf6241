#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub kind: PointerKind,
    /// DOM button index, 0 for the primary button.
    pub button: i16,
    pub client_x: f64,
    pub client_y: f64,
    /// The event target is (inside) the timeline's reset control.
    pub on_reset_control: bool,
}

impl PointerEvent {
    pub fn mouse(pointer_id: i32, client_x: f64, client_y: f64) -> Self {
        Self {
            pointer_id: PointerId(pointer_id),
            kind: PointerKind::Mouse,
            button: 0,
            client_x,
            client_y,
            on_reset_control: false,
        }
    }

    pub fn touch(pointer_id: i32, client_x: f64, client_y: f64) -> Self {
        Self {
            kind: PointerKind::Touch,
            ..Self::mouse(pointer_id, client_x, client_y)
        }
    }
}

/// How a pointer gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEnd {
    Up,
    Leave,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub delta_x: f64,
    pub delta_y: f64,
    pub ctrl: bool,
}

impl WheelEvent {
    pub fn new(delta_x: f64, delta_y: f64) -> Self {
        Self {
            delta_x,
            delta_y,
            ctrl: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Enter,
    Space,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Enter" => Key::Enter,
            " " => Key::Space,
            other => Key::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn with_shift(key: Key) -> Self {
        Self { key, shift: true }
    }
}

/// A bounding box in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// What the host should do with the DOM event after a handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventResponse {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl EventResponse {
    pub const IGNORED: Self = Self {
        prevent_default: false,
        stop_propagation: false,
    };

    pub const PREVENT: Self = Self {
        prevent_default: true,
        stop_propagation: false,
    };

    pub const CONSUMED: Self = Self {
        prevent_default: true,
        stop_propagation: true,
    };
}

/// A horizontally scrollable container that can capture pointers.
pub trait ScrollContainer {
    fn scroll_left(&self) -> f64;

    fn set_scroll_left(&mut self, value: f64);

    fn scroll_to_origin_smooth(&mut self);

    fn capture_pointer(&mut self, pointer: PointerId);

    fn release_pointer(&mut self, pointer: PointerId);
}
