//! In-memory host used by the demo binary and the controller tests.
//!
//! Every type here is a cheap handle: clones share state, so a test can keep
//! one clone while the controller owns another.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::{
    AnalysisBackend, AnalysisContext, AnalysisError, DrawSurface, FrameHandle, FrameScheduler,
    LineCap, MediaElement, MediaEvent, Point, PointerId, ScrollContainer, Size, StrokeStyle,
};

/// A media element that plays by being told how much time has passed.
pub struct SimMedia {
    src: String,
    paused: Cell<bool>,
    time: Cell<f64>,
    duration: Cell<f64>,
    events: RefCell<VecDeque<MediaEvent>>,
}

impl SimMedia {
    pub fn new(src: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            src: src.into(),
            paused: Cell::new(true),
            time: Cell::new(0.0),
            duration: Cell::new(f64::NAN),
            events: RefCell::new(VecDeque::new()),
        })
    }

    pub fn load_metadata(&self, duration: f64) {
        self.duration.set(duration);
        self.push(MediaEvent::LoadedMetadata);
    }

    /// Advance playback by `seconds`, reaching the end if the duration is hit.
    pub fn advance(&self, seconds: f64) {
        if self.paused.get() {
            return;
        }
        let duration = self.duration.get();
        let next = self.time.get() + seconds;
        if duration.is_finite() && next >= duration {
            self.time.set(duration);
            self.paused.set(true);
            self.push(MediaEvent::TimeUpdate);
            self.push(MediaEvent::Pause);
            self.push(MediaEvent::Ended);
        } else {
            self.time.set(next);
            self.push(MediaEvent::TimeUpdate);
        }
    }

    /// Drain the events queued since the last call, oldest first.
    pub fn take_events(&self) -> Vec<MediaEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    fn push(&self, event: MediaEvent) {
        self.events.borrow_mut().push_back(event);
    }
}

impl MediaElement for SimMedia {
    fn is_paused(&self) -> bool {
        self.paused.get()
    }

    fn current_time(&self) -> f64 {
        self.time.get()
    }

    fn set_current_time(&self, seconds: f64) {
        let mut value = seconds.max(0.0);
        let duration = self.duration.get();
        if duration.is_finite() {
            value = value.min(duration);
        }
        self.time.set(value);
        self.push(MediaEvent::TimeUpdate);
    }

    fn duration(&self) -> f64 {
        self.duration.get()
    }

    fn source_url(&self) -> String {
        self.src.clone()
    }

    fn play(&self) {
        if self.paused.get() {
            self.paused.set(false);
            self.push(MediaEvent::Play);
        }
    }

    fn pause(&self) {
        if !self.paused.get() {
            self.paused.set(true);
            self.push(MediaEvent::Pause);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear {
        width: f64,
        height: f64,
    },
    Stroke {
        points: Vec<Point>,
        gradient_x1: f64,
        start: String,
        end: String,
        line_width: f64,
        cap: LineCap,
    },
}

#[derive(Debug, Default)]
struct SurfaceLog {
    client: Size,
    backing: (u32, u32),
    scale: f64,
    transform_resets: usize,
    calls: Vec<DrawCall>,
}

/// A drawing surface that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface(Rc<RefCell<SurfaceLog>>);

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        let surface = Self::default();
        surface.set_client_size(width, height);
        surface
    }

    pub fn set_client_size(&self, width: f64, height: f64) {
        self.0.borrow_mut().client = Size::new(width, height);
    }

    pub fn calls(&self) -> Vec<DrawCall> {
        self.0.borrow().calls.clone()
    }

    pub fn stroke_count(&self) -> usize {
        self.0
            .borrow()
            .calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Stroke { .. }))
            .count()
    }

    /// Points of the most recent stroke.
    pub fn last_stroke(&self) -> Option<Vec<Point>> {
        self.0.borrow().calls.iter().rev().find_map(|call| match call {
            DrawCall::Stroke { points, .. } => Some(points.clone()),
            DrawCall::Clear { .. } => None,
        })
    }

    pub fn clear_log(&self) {
        self.0.borrow_mut().calls.clear();
    }

    pub fn scale(&self) -> f64 {
        self.0.borrow().scale
    }

    pub fn transform_resets(&self) -> usize {
        self.0.borrow().transform_resets
    }
}

impl DrawSurface for RecordingSurface {
    fn client_size(&self) -> Size {
        self.0.borrow().client
    }

    fn backing_size(&self) -> (u32, u32) {
        self.0.borrow().backing
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.0.borrow_mut().backing = (width, height);
    }

    fn reset_transform_and_scale(&mut self, scale: f64) {
        let mut log = self.0.borrow_mut();
        log.scale = scale;
        log.transform_resets += 1;
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.0
            .borrow_mut()
            .calls
            .push(DrawCall::Clear { width, height });
    }

    fn stroke(&mut self, points: &[Point], style: &StrokeStyle<'_>) {
        self.0.borrow_mut().calls.push(DrawCall::Stroke {
            points: points.to_vec(),
            gradient_x1: style.gradient.x1,
            start: style.gradient.start.to_string(),
            end: style.gradient.end.to_string(),
            line_width: style.line_width,
            cap: style.cap,
        });
    }
}

/// Frame scheduler whose frames fire only when the caller says so.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: Cell<u64>,
    pending: RefCell<Vec<FrameHandle>>,
    cancelled: Cell<usize>,
}

impl ManualScheduler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn pending(&self) -> Vec<FrameHandle> {
        self.pending.borrow().clone()
    }

    /// Take every pending frame, as one repaint would deliver them.
    pub fn take_due(&self) -> Vec<FrameHandle> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled.get()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self) -> FrameHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let handle = FrameHandle(id);
        self.pending.borrow_mut().push(handle);
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let mut pending = self.pending.borrow_mut();
        let before = pending.len();
        pending.retain(|h| *h != handle);
        if pending.len() != before {
            self.cancelled.set(self.cancelled.get() + 1);
        }
    }
}

#[derive(Debug, Default)]
struct ScrollState {
    left: f64,
    max_left: f64,
    captured: Option<PointerId>,
    smooth_scrolls: usize,
}

/// A scroll container with a fixed scrollable width.
#[derive(Debug, Clone, Default)]
pub struct SimScroller(Rc<RefCell<ScrollState>>);

impl SimScroller {
    pub fn new(max_left: f64) -> Self {
        let scroller = Self::default();
        scroller.0.borrow_mut().max_left = max_left.max(0.0);
        scroller
    }

    pub fn left(&self) -> f64 {
        self.0.borrow().left
    }

    pub fn captured(&self) -> Option<PointerId> {
        self.0.borrow().captured
    }

    pub fn smooth_scrolls(&self) -> usize {
        self.0.borrow().smooth_scrolls
    }
}

impl ScrollContainer for SimScroller {
    fn scroll_left(&self) -> f64 {
        self.0.borrow().left
    }

    fn set_scroll_left(&mut self, value: f64) {
        let mut state = self.0.borrow_mut();
        state.left = value.max(0.0).min(state.max_left);
    }

    fn scroll_to_origin_smooth(&mut self) {
        let mut state = self.0.borrow_mut();
        state.left = 0.0;
        state.smooth_scrolls += 1;
    }

    fn capture_pointer(&mut self, pointer: PointerId) {
        self.0.borrow_mut().captured = Some(pointer);
    }

    fn release_pointer(&mut self, pointer: PointerId) {
        let mut state = self.0.borrow_mut();
        if state.captured == Some(pointer) {
            state.captured = None;
        }
    }
}

/// How a [`ScriptedAnalysis`] backend behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisScript {
    Working,
    Unsupported,
    FailOnAttach,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    pub opened: usize,
    pub closed: usize,
    pub resumed: usize,
    pub reads: usize,
}

/// Analysis backend that replays a fixed sample pattern.
#[derive(Debug, Clone)]
pub struct ScriptedAnalysis {
    script: AnalysisScript,
    samples: Rc<[u8]>,
    start_suspended: bool,
    stats: Rc<RefCell<AnalysisStats>>,
}

impl ScriptedAnalysis {
    pub fn new(script: AnalysisScript) -> Self {
        Self {
            script,
            samples: Rc::from(vec![128u8]),
            start_suspended: false,
            stats: Rc::default(),
        }
    }

    pub fn with_samples(mut self, samples: Vec<u8>) -> Self {
        self.samples = Rc::from(samples);
        self
    }

    pub fn start_suspended(mut self) -> Self {
        self.start_suspended = true;
        self
    }

    pub fn stats(&self) -> AnalysisStats {
        *self.stats.borrow()
    }
}

impl AnalysisBackend for ScriptedAnalysis {
    fn open_context(&self) -> Result<Box<dyn AnalysisContext>, AnalysisError> {
        if self.script == AnalysisScript::Unsupported {
            return Err(AnalysisError::Unsupported);
        }
        self.stats.borrow_mut().opened += 1;
        Ok(Box::new(ScriptedContext {
            fail_attach: self.script == AnalysisScript::FailOnAttach,
            samples: self.samples.clone(),
            suspended: self.start_suspended,
            stats: self.stats.clone(),
        }))
    }
}

struct ScriptedContext {
    fail_attach: bool,
    samples: Rc<[u8]>,
    suspended: bool,
    stats: Rc<RefCell<AnalysisStats>>,
}

impl AnalysisContext for ScriptedContext {
    fn attach(
        &mut self,
        media: &dyn MediaElement,
        _fft_size: usize,
        _smoothing: f64,
    ) -> Result<(), AnalysisError> {
        if self.fail_attach {
            return Err(AnalysisError::CrossOrigin(media.source_url()));
        }
        Ok(())
    }

    fn read_time_domain(&mut self, buffer: &mut [u8]) {
        self.stats.borrow_mut().reads += 1;
        for (slot, value) in buffer.iter_mut().zip(self.samples.iter().cycle()) {
            *slot = *value;
        }
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) {
        self.suspended = false;
        self.stats.borrow_mut().resumed += 1;
    }

    fn close(&mut self) {
        self.stats.borrow_mut().closed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_media_pause_is_idempotent() {
        let media = SimMedia::new("https://example.org/a.mp3");
        media.play();
        media.pause();
        media.pause();
        assert_eq!(media.take_events(), vec![MediaEvent::Play, MediaEvent::Pause]);
    }

    #[test]
    fn test_sim_media_reaches_end() {
        let media = SimMedia::new("a.mp3");
        media.load_metadata(2.0);
        media.play();
        media.take_events();
        media.advance(5.0);
        assert!(media.is_paused());
        assert_eq!(media.current_time(), 2.0);
        assert_eq!(
            media.take_events(),
            vec![MediaEvent::TimeUpdate, MediaEvent::Pause, MediaEvent::Ended]
        );
    }

    #[test]
    fn test_manual_scheduler_cancel() {
        let scheduler = ManualScheduler::new();
        let a = scheduler.request_frame();
        let b = scheduler.request_frame();
        scheduler.cancel_frame(a);
        scheduler.cancel_frame(a);
        assert_eq!(scheduler.pending(), vec![b]);
        assert_eq!(scheduler.cancelled(), 1);
    }

    #[test]
    fn test_sim_scroller_clamps() {
        let mut scroller = SimScroller::new(300.0);
        scroller.set_scroll_left(-20.0);
        assert_eq!(scroller.left(), 0.0);
        scroller.set_scroll_left(1000.0);
        assert_eq!(scroller.left(), 300.0);
    }
}
