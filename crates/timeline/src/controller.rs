use std::rc::Rc;

use vitrine_config::TimelineConfig;
use vitrine_host::{
    EventResponse, FrameHandle, FrameScheduler, Key, KeyEvent, PointerEnd, PointerEvent,
    PointerKind, ScrollContainer, WheelEvent, WidgetId,
};

use crate::drag::{TimelineDragState, parse_max_offset};
use crate::nodes::EventNodes;

/// What the page found inside one timeline widget.
pub struct TimelineMarkup {
    /// The timeline element itself; it scrolls horizontally.
    pub scroller: Box<dyn ScrollContainer>,
    pub has_track: bool,
    pub node_count: usize,
    pub has_reset: bool,
    /// Raw `data-max-offset` attribute.
    pub max_offset: Option<String>,
}

impl TimelineMarkup {
    pub fn new(scroller: Box<dyn ScrollContainer>, node_count: usize) -> Self {
        Self {
            scroller,
            has_track: true,
            node_count,
            has_reset: true,
            max_offset: None,
        }
    }

    pub fn with_max_offset(mut self, attr: impl Into<String>) -> Self {
        self.max_offset = Some(attr.into());
        self
    }
}

#[derive(Clone)]
pub struct TimelineServices {
    pub scheduler: Rc<dyn FrameScheduler>,
    pub config: Rc<TimelineConfig>,
}

/// DOM state the host mirrors onto the timeline after each handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineView {
    /// Value of the track's `--track-offset-y` property.
    pub track_offset: String,
    /// `is-grabbing` class on the timeline.
    pub grabbing: bool,
    /// `is-open` class per event node.
    pub open: Vec<bool>,
}

#[derive(Debug, Default)]
struct ClickSuppression {
    frames_left: u32,
    pending: Option<FrameHandle>,
}

pub struct TimelineController {
    id: WidgetId,
    scroller: Box<dyn ScrollContainer>,
    drag: TimelineDragState,
    nodes: EventNodes,
    has_reset: bool,
    grabbing: bool,
    suppression: ClickSuppression,
    services: TimelineServices,
}

impl TimelineController {
    /// Returns `None` when the widget has no track to offset.
    pub fn setup(id: WidgetId, markup: TimelineMarkup, services: TimelineServices) -> Option<Self> {
        if !markup.has_track {
            log::debug!("timeline {id:?} has no track, skipping");
            return None;
        }
        let max_offset = parse_max_offset(
            markup.max_offset.as_deref(),
            services.config.default_max_offset,
        );
        Some(Self {
            id,
            scroller: markup.scroller,
            drag: TimelineDragState::new(max_offset),
            nodes: EventNodes::new(markup.node_count),
            has_reset: markup.has_reset,
            grabbing: false,
            suppression: ClickSuppression::default(),
            services,
        })
    }

    /// Carry the offset and bound over from an earlier setup of the same
    /// widget.
    pub fn adopt_offset(&mut self, previous: &TimelineDragState) {
        self.drag = TimelineDragState::new(previous.max_offset());
        self.drag.set_offset(previous.offset());
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn offset(&self) -> f64 {
        self.drag.offset()
    }

    pub fn max_offset(&self) -> f64 {
        self.drag.max_offset()
    }

    pub fn set_offset(&mut self, value: f64) -> f64 {
        self.drag.set_offset(value)
    }

    pub fn reset_offset(&mut self) -> f64 {
        self.drag.reset_offset()
    }

    pub fn drag_state(&self) -> &TimelineDragState {
        &self.drag
    }

    pub fn nodes(&self) -> &EventNodes {
        &self.nodes
    }

    pub fn scroll_left(&self) -> f64 {
        self.scroller.scroll_left()
    }

    pub fn is_grabbing(&self) -> bool {
        self.grabbing
    }

    pub fn is_click_suppressed(&self) -> bool {
        self.suppression.frames_left > 0
    }

    pub fn view(&self) -> TimelineView {
        TimelineView {
            track_offset: format!("{}px", self.drag.offset()),
            grabbing: self.grabbing,
            open: self.nodes.flags().to_vec(),
        }
    }

    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> EventResponse {
        if event.kind == PointerKind::Mouse && event.button != 0 {
            return EventResponse::IGNORED;
        }
        if event.on_reset_control {
            return EventResponse::IGNORED;
        }
        self.drag.begin(
            event.pointer_id,
            event.client_x,
            event.client_y,
            self.scroller.scroll_left(),
        );
        self.scroller.capture_pointer(event.pointer_id);
        EventResponse::IGNORED
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> EventResponse {
        let threshold = self.services.config.drag_threshold;
        let Some(step) =
            self.drag
                .update(event.pointer_id, event.client_x, event.client_y, threshold)
        else {
            return EventResponse::IGNORED;
        };
        if step.moved {
            self.grabbing = true;
        }
        self.scroller.set_scroll_left(step.scroll_left);
        if step.moved {
            EventResponse::PREVENT
        } else {
            EventResponse::IGNORED
        }
    }

    pub fn on_pointer_end(&mut self, event: &PointerEvent, how: PointerEnd) -> EventResponse {
        let Some(end) = self.drag.end(event.pointer_id, how) else {
            return EventResponse::IGNORED;
        };
        self.grabbing = false;
        self.scroller.release_pointer(end.pointer);
        if end.was_drag {
            self.suppress_clicks();
        }
        EventResponse::IGNORED
    }

    pub fn on_wheel(&mut self, event: &WheelEvent) -> EventResponse {
        if event.ctrl {
            return EventResponse::IGNORED;
        }
        if event.delta_y.abs() > event.delta_x.abs() {
            let factor = self.services.config.wheel_factor;
            self.drag.set_offset(self.drag.offset() - event.delta_y * factor);
        } else {
            let delta = if event.delta_x != 0.0 && !event.delta_x.is_nan() {
                event.delta_x
            } else {
                event.delta_y
            };
            let left = self.scroller.scroll_left();
            self.scroller.set_scroll_left(left + delta);
        }
        EventResponse::PREVENT
    }

    pub fn on_node_click(&mut self, index: usize) -> EventResponse {
        if index >= self.nodes.len() {
            return EventResponse::IGNORED;
        }
        self.toggle_node(index);
        EventResponse::CONSUMED
    }

    pub fn on_node_key(&mut self, index: usize, event: &KeyEvent) -> EventResponse {
        if index >= self.nodes.len() || !matches!(event.key, Key::Enter | Key::Space) {
            return EventResponse::IGNORED;
        }
        self.toggle_node(index);
        EventResponse::PREVENT
    }

    pub fn on_reset_click(&mut self) {
        if !self.has_reset {
            return;
        }
        self.scroller.scroll_to_origin_smooth();
        self.drag.reset_offset();
    }

    /// Returns `true` if the frame was ours.
    pub fn on_animation_frame(&mut self, handle: FrameHandle) -> bool {
        if self.suppression.pending != Some(handle) {
            return false;
        }
        self.suppression.pending = None;
        self.suppression.frames_left = self.suppression.frames_left.saturating_sub(1);
        if self.suppression.frames_left > 0 {
            self.suppression.pending = Some(self.services.scheduler.request_frame());
        }
        true
    }

    fn toggle_node(&mut self, index: usize) {
        if self.is_click_suppressed() {
            log::debug!("timeline {:?} ignoring node {index} right after a drag", self.id);
            return;
        }
        self.nodes.toggle(index);
    }

    fn suppress_clicks(&mut self) {
        let frames = self.services.config.click_suppress_frames;
        if frames == 0 {
            return;
        }
        if let Some(handle) = self.suppression.pending.take() {
            self.services.scheduler.cancel_frame(handle);
        }
        self.suppression.frames_left = frames;
        self.suppression.pending = Some(self.services.scheduler.request_frame());
    }
}
