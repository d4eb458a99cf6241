use vitrine_host::{PointerEnd, PointerId};

/// Clamp a vertical offset to `-max..=max`.
pub fn clamp_offset(value: f64, max: f64) -> f64 {
    value.max(-max).min(max)
}

/// Read the widget's max-offset attribute. Missing, blank or non-numeric
/// values give `default`; negative values count by magnitude.
pub fn parse_max_offset(attr: Option<&str>, default: f64) -> f64 {
    attr.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map(f64::abs)
        .unwrap_or(default)
}

/// Result of a pointer move during an active gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragMove {
    pub scroll_left: f64,
    pub offset: f64,
    /// The gesture has crossed the drag threshold at some point.
    pub moved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEnd {
    pub pointer: PointerId,
    pub was_drag: bool,
}

/// Pointer gesture bookkeeping for one timeline. The vertical offset lives
/// here and outlasts individual gestures.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineDragState {
    pointer: Option<PointerId>,
    start_x: f64,
    start_y: f64,
    start_scroll: f64,
    start_offset: f64,
    offset: f64,
    max_offset: f64,
    moved: bool,
}

impl TimelineDragState {
    pub fn new(max_offset: f64) -> Self {
        Self {
            pointer: None,
            start_x: 0.0,
            start_y: 0.0,
            start_scroll: 0.0,
            start_offset: 0.0,
            offset: 0.0,
            max_offset: max_offset.abs(),
            moved: false,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn max_offset(&self) -> f64 {
        self.max_offset
    }

    pub fn is_active(&self) -> bool {
        self.pointer.is_some()
    }

    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// The only way the offset changes. Returns the clamped value.
    pub fn set_offset(&mut self, value: f64) -> f64 {
        self.offset = clamp_offset(value, self.max_offset);
        self.offset
    }

    pub fn reset_offset(&mut self) -> f64 {
        self.set_offset(0.0)
    }

    pub fn begin(&mut self, pointer: PointerId, x: f64, y: f64, scroll_left: f64) {
        self.pointer = Some(pointer);
        self.start_x = x;
        self.start_y = y;
        self.start_scroll = scroll_left;
        self.start_offset = self.offset;
        self.moved = false;
    }

    /// Track a move of the gesture's pointer; moves of other pointers and
    /// moves outside a gesture give `None`.
    pub fn update(
        &mut self,
        pointer: PointerId,
        x: f64,
        y: f64,
        threshold: f64,
    ) -> Option<DragMove> {
        if self.pointer != Some(pointer) {
            return None;
        }
        let dx = x - self.start_x;
        let dy = y - self.start_y;
        if dx.abs() > threshold || dy.abs() > threshold {
            self.moved = true;
        }
        let offset = self.set_offset(self.start_offset + dy);
        Some(DragMove {
            scroll_left: self.start_scroll - dx,
            offset,
            moved: self.moved,
        })
    }

    /// Finish the gesture. A leave ends it whatever the pointer; up and
    /// cancel only for the gesture's own pointer.
    pub fn end(&mut self, pointer: PointerId, how: PointerEnd) -> Option<GestureEnd> {
        let active = self.pointer?;
        if active != pointer && how != PointerEnd::Leave {
            return None;
        }
        self.pointer = None;
        Some(GestureEnd {
            pointer: active,
            was_drag: self.moved,
        })
    }
}
