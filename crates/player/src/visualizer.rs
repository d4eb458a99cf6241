//! Waveform drawing for a single player.
//!
//! The redraw loop is cooperative: each animation frame draws once and asks
//! for another frame only while the media is still playing. At most one frame
//! is pending at any time; every start and stop cancels the pending one first.

use std::f64::consts::PI;
use std::rc::Rc;

use vitrine_config::PlayerConfig;
use vitrine_host::{
    AnalysisBackend, AnalysisContext, DrawSurface, FrameHandle, FrameScheduler, LineCap,
    LinearGradient, MediaElement, MotionPreference, PageEnvironment, Point, StrokeStyle,
    is_file_url,
};

/// Whether real-time analysis is available for a player.
///
/// Moves out of `Untried` at most once and never comes back.
pub enum AnalysisCapability {
    Untried,
    Enabled(Box<dyn AnalysisContext>),
    Disabled,
}

/// [`AnalysisCapability`] without the context, for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityState {
    Untried,
    Enabled,
    Disabled,
}

impl AnalysisCapability {
    pub fn state(&self) -> CapabilityState {
        match self {
            AnalysisCapability::Untried => CapabilityState::Untried,
            AnalysisCapability::Enabled(_) => CapabilityState::Enabled,
            AnalysisCapability::Disabled => CapabilityState::Disabled,
        }
    }
}

/// Gradient endpoints for the waveform stroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accents {
    pub start: String,
    pub end: String,
}

impl Accents {
    /// Resolve the widget's two style properties; blank values fall back to
    /// `default` and to the start color respectively.
    pub fn resolve(start: Option<&str>, end: Option<&str>, default: &str) -> Self {
        let start = non_blank(start).unwrap_or(default).to_string();
        let end = non_blank(end).map(str::to_string).unwrap_or_else(|| start.clone());
        Self { start, end }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub struct VisualizerEngine {
    surface: Box<dyn DrawSurface>,
    scheduler: Rc<dyn FrameScheduler>,
    motion: MotionPreference,
    config: Rc<PlayerConfig>,
    accents: Accents,
    capability: AnalysisCapability,
    /// Reused every frame; sized once when analysis is enabled.
    samples: Vec<u8>,
    points: Vec<Point>,
    pending: Option<FrameHandle>,
    fallback_phase: f64,
}

impl VisualizerEngine {
    pub fn new(
        surface: Box<dyn DrawSurface>,
        scheduler: Rc<dyn FrameScheduler>,
        motion: MotionPreference,
        config: Rc<PlayerConfig>,
        accents: Accents,
        device_pixel_ratio: f64,
    ) -> Self {
        let mut engine = Self {
            surface,
            scheduler,
            motion,
            config,
            accents,
            capability: AnalysisCapability::Untried,
            samples: Vec::new(),
            points: Vec::new(),
            pending: None,
            fallback_phase: 0.0,
        };
        engine.resize(device_pixel_ratio);
        engine.draw_baseline();
        engine
    }

    pub fn capability(&self) -> CapabilityState {
        self.capability.state()
    }

    pub fn fallback_phase(&self) -> f64 {
        self.fallback_phase
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Try to build the analysis graph, once per player.
    pub fn ensure_analysis(
        &mut self,
        media: &dyn MediaElement,
        env: &PageEnvironment,
        backend: &dyn AnalysisBackend,
    ) {
        if !matches!(self.capability, AnalysisCapability::Untried) {
            return;
        }

        let source = media.source_url();
        if env.file_origin || is_file_url(&source) {
            self.capability = AnalysisCapability::Disabled;
            log::info!(
                "waveform analysis disabled for local file playback, drawing synthetic wave"
            );
            return;
        }

        let mut context = match backend.open_context() {
            Ok(context) => context,
            Err(e) => {
                self.capability = AnalysisCapability::Disabled;
                log::warn!("waveform analysis disabled: {e}");
                return;
            }
        };

        let analysis = &self.config.analysis;
        match context.attach(media, analysis.fft_size, analysis.smoothing) {
            Ok(()) => {
                self.samples = vec![128; analysis.fft_size.max(1)];
                self.capability = AnalysisCapability::Enabled(context);
            }
            Err(e) => {
                context.close();
                self.capability = AnalysisCapability::Disabled;
                log::warn!("waveform analysis disabled for '{source}': {e}");
            }
        }
    }

    pub fn resume_if_suspended(&mut self) {
        if let AnalysisCapability::Enabled(context) = &mut self.capability {
            if context.is_suspended() {
                context.resume();
            }
        }
    }

    /// Begin the redraw loop, or draw a flat line when motion is reduced.
    pub fn start(&mut self, media: &dyn MediaElement) {
        self.cancel_pending();
        if self.motion.prefers_reduced() {
            self.draw_baseline();
            return;
        }
        self.render_frame();
        self.schedule_if_playing(media);
    }

    pub fn stop(&mut self) {
        self.cancel_pending();
        self.draw_baseline();
    }

    /// Returns `false` if `handle` is not this engine's pending frame.
    pub fn on_animation_frame(&mut self, handle: FrameHandle, media: &dyn MediaElement) -> bool {
        if self.pending != Some(handle) {
            return false;
        }
        self.pending = None;
        self.render_frame();
        self.schedule_if_playing(media);
        true
    }

    /// Match the backing store to the displayed size at `ratio`.
    pub fn resize(&mut self, ratio: f64) {
        let size = self.surface.client_size();
        if size.is_empty() {
            return;
        }
        let width = (size.width * ratio).floor() as u32;
        let height = (size.height * ratio).floor() as u32;
        if self.surface.backing_size() != (width, height) {
            self.surface.set_backing_size(width, height);
            self.surface.reset_transform_and_scale(ratio);
        }
    }

    fn schedule_if_playing(&mut self, media: &dyn MediaElement) {
        if !media.is_paused() {
            self.pending = Some(self.scheduler.request_frame());
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    fn draw_baseline(&mut self) {
        let size = self.surface.client_size();
        self.surface.clear(size.width, size.height);
        self.points.clear();
        self.points.push(Point::new(0.0, size.height / 2.0));
        self.points.push(Point::new(size.width, size.height / 2.0));
        self.stroke_points(size.width);
    }

    fn render_frame(&mut self) {
        let size = self.surface.client_size();
        let (width, height) = (size.width, size.height);
        self.surface.clear(width, height);
        self.points.clear();

        match &mut self.capability {
            AnalysisCapability::Enabled(context) => {
                context.read_time_domain(&mut self.samples);
                let margin = self.config.sample_margin;
                let slice = width / self.samples.len().max(1) as f64;
                for (i, value) in self.samples.iter().enumerate() {
                    let y = *value as f64 / 255.0 * (height - 2.0 * margin) + margin;
                    self.points.push(Point::new(i as f64 * slice, y));
                }
            }
            AnalysisCapability::Untried | AnalysisCapability::Disabled => {
                self.fallback_phase += self.config.fallback_phase_step;
                if width > 0.0 {
                    let amplitude = height / self.config.fallback_amplitude_divisor;
                    let span = 2.0 * PI * self.config.fallback_periods;
                    let mut x = 0.0;
                    while x <= width {
                        let angle = x / width * span + self.fallback_phase;
                        let y = height / 2.0 + angle.sin() * amplitude;
                        self.points.push(Point::new(x, y));
                        x += self.config.fallback_x_step;
                    }
                }
            }
        }

        self.stroke_points(width);
    }

    fn stroke_points(&mut self, width: f64) {
        let style = StrokeStyle {
            gradient: LinearGradient {
                x0: 0.0,
                x1: width,
                start: &self.accents.start,
                end: &self.accents.end,
            },
            line_width: self.config.stroke_width,
            cap: LineCap::Round,
        };
        self.surface.stroke(&self.points, &style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_host::sim::{
        AnalysisScript, DrawCall, ManualScheduler, RecordingSurface, ScriptedAnalysis, SimMedia,
    };

    struct Rig {
        surface: RecordingSurface,
        scheduler: Rc<ManualScheduler>,
        motion: MotionPreference,
        media: Rc<SimMedia>,
        engine: VisualizerEngine,
    }

    fn rig() -> Rig {
        let surface = RecordingSurface::new(300.0, 60.0);
        let scheduler = ManualScheduler::new();
        let motion = MotionPreference::new(false);
        let media = SimMedia::new("https://example.org/track.mp3");
        let engine = VisualizerEngine::new(
            Box::new(surface.clone()),
            scheduler.clone(),
            motion.clone(),
            Rc::new(PlayerConfig::default()),
            Accents::resolve(Some("#ff0000"), Some("#0000ff"), "#38bdf8"),
            2.0,
        );
        Rig {
            surface,
            scheduler,
            motion,
            media,
            engine,
        }
    }

    #[test]
    fn test_accents_resolve() {
        let accents = Accents::resolve(Some("  "), None, "#38bdf8");
        assert_eq!(accents.start, "#38bdf8");
        assert_eq!(accents.end, "#38bdf8");

        let accents = Accents::resolve(Some(" #111 "), None, "#38bdf8");
        assert_eq!(accents.end, "#111");
    }

    #[test]
    fn test_new_sizes_surface_and_draws_baseline() {
        let rig = rig();
        assert_eq!(rig.surface.scale(), 2.0);
        assert_eq!(rig.surface.transform_resets(), 1);
        assert_eq!(
            rig.surface.last_stroke(),
            Some(vec![Point::new(0.0, 30.0), Point::new(300.0, 30.0)])
        );
    }

    #[test]
    fn test_resize_only_resets_transform_on_change() {
        let mut rig = rig();
        rig.engine.resize(2.0);
        assert_eq!(rig.surface.transform_resets(), 1);

        rig.surface.set_client_size(400.5, 60.0);
        rig.engine.resize(2.0);
        assert_eq!(rig.surface.transform_resets(), 2);

        rig.surface.set_client_size(0.0, 60.0);
        rig.engine.resize(3.0);
        assert_eq!(rig.surface.transform_resets(), 2);
    }

    #[test]
    fn test_loop_runs_only_while_playing() {
        let mut rig = rig();
        rig.media.play();
        rig.engine.start(&*rig.media);
        assert_eq!(rig.scheduler.pending().len(), 1);

        for _ in 0..3 {
            for handle in rig.scheduler.take_due() {
                assert!(rig.engine.on_animation_frame(handle, &*rig.media));
            }
            assert_eq!(rig.scheduler.pending().len(), 1);
        }

        rig.media.pause();
        for handle in rig.scheduler.take_due() {
            rig.engine.on_animation_frame(handle, &*rig.media);
        }
        assert!(rig.scheduler.pending().is_empty());
        assert_eq!(rig.engine.pending_frame(), None);
    }

    #[test]
    fn test_restart_never_leaves_two_frames_pending() {
        let mut rig = rig();
        rig.media.play();
        rig.engine.start(&*rig.media);
        rig.engine.start(&*rig.media);
        rig.engine.start(&*rig.media);
        assert_eq!(rig.scheduler.pending().len(), 1);
        assert_eq!(rig.scheduler.cancelled(), 2);
    }

    #[test]
    fn test_stale_frame_is_ignored() {
        let mut rig = rig();
        rig.media.play();
        rig.engine.start(&*rig.media);
        let stale = rig.scheduler.pending()[0];
        rig.engine.stop();
        assert!(!rig.engine.on_animation_frame(stale, &*rig.media));
        assert!(rig.scheduler.pending().is_empty());
    }

    #[test]
    fn test_stop_draws_baseline() {
        let mut rig = rig();
        rig.media.play();
        rig.engine.start(&*rig.media);
        rig.engine.stop();
        let points = rig.surface.last_stroke().expect("stroke");
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.y == 30.0));
    }

    #[test]
    fn test_reduced_motion_draws_single_baseline() {
        let mut rig = rig();
        rig.motion.set_reduced(true);
        rig.media.play();
        rig.surface.clear_log();
        rig.engine.start(&*rig.media);

        assert!(rig.scheduler.pending().is_empty());
        assert_eq!(rig.surface.stroke_count(), 1);
        assert_eq!(rig.surface.last_stroke().map(|p| p.len()), Some(2));

        // The preference is read on every start, not frozen.
        rig.motion.set_reduced(false);
        rig.engine.start(&*rig.media);
        assert_eq!(rig.scheduler.pending().len(), 1);
    }

    #[test]
    fn test_synthetic_wave_shape_and_phase() {
        let mut rig = rig();
        rig.media.play();
        rig.surface.clear_log();
        rig.engine.start(&*rig.media);

        let points = rig.surface.last_stroke().expect("stroke");
        // x = 0, 2, ..., 300
        assert_eq!(points.len(), 151);
        assert_eq!(points[0].x, 0.0);
        assert_eq!(points[150].x, 300.0);
        for p in &points {
            assert!(p.y >= 30.0 - 20.0 - 1e-9 && p.y <= 30.0 + 20.0 + 1e-9);
        }
        let expected = 30.0 + (0.04f64).sin() * 20.0;
        assert!((points[0].y - expected).abs() < 1e-9);

        let handle = rig.scheduler.take_due()[0];
        rig.engine.on_animation_frame(handle, &*rig.media);
        assert!((rig.engine.fallback_phase() - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_synthetic_wave_spans_six_periods() {
        let surface = RecordingSurface::new(600.0, 60.0);
        let scheduler = ManualScheduler::new();
        let media = SimMedia::new("https://example.org/track.mp3");
        let mut engine = VisualizerEngine::new(
            Box::new(surface.clone()),
            scheduler,
            MotionPreference::new(false),
            Rc::new(PlayerConfig::default()),
            Accents::resolve(None, None, "#38bdf8"),
            1.0,
        );
        media.play();
        surface.clear_log();
        engine.start(&*media);

        let points = surface.last_stroke().expect("stroke");
        let peaks = points
            .windows(3)
            .filter(|w| w[1].y > w[0].y && w[1].y >= w[2].y)
            .count();
        assert_eq!(peaks, 6);
    }

    #[test]
    fn test_stroke_style() {
        let mut rig = rig();
        rig.media.play();
        rig.engine.start(&*rig.media);
        let calls = rig.surface.calls();
        let Some(DrawCall::Stroke {
            gradient_x1,
            start,
            end,
            line_width,
            cap,
            ..
        }) = calls.last().cloned()
        else {
            panic!("expected a stroke");
        };
        assert_eq!(gradient_x1, 300.0);
        assert_eq!(start, "#ff0000");
        assert_eq!(end, "#0000ff");
        assert_eq!(line_width, 2.0);
        assert_eq!(cap, LineCap::Round);
        assert_eq!(
            calls[calls.len() - 2],
            DrawCall::Clear {
                width: 300.0,
                height: 60.0
            }
        );
    }

    #[test]
    fn test_analysed_wave_maps_samples() {
        let mut rig = rig();
        let backend = ScriptedAnalysis::new(AnalysisScript::Working).with_samples(vec![0, 255]);
        rig.engine
            .ensure_analysis(&*rig.media, &PageEnvironment::default(), &backend);
        assert_eq!(rig.engine.capability(), CapabilityState::Enabled);

        rig.media.play();
        rig.engine.start(&*rig.media);
        let points = rig.surface.last_stroke().expect("stroke");
        assert_eq!(points.len(), 2048);
        assert_eq!(points[0], Point::new(0.0, 2.0));
        assert_eq!(points[1].y, 58.0);
        assert!((points[1].x - 300.0 / 2048.0).abs() < 1e-12);
        assert_eq!(rig.engine.fallback_phase(), 0.0);
    }

    #[test]
    fn test_local_file_source_disables_analysis() {
        let mut rig = rig();
        let media = SimMedia::new("file:///music/track.mp3");
        let backend = ScriptedAnalysis::new(AnalysisScript::Working);
        rig.engine
            .ensure_analysis(&*media, &PageEnvironment::default(), &backend);
        assert_eq!(rig.engine.capability(), CapabilityState::Disabled);
        assert_eq!(backend.stats().opened, 0);
    }

    #[test]
    fn test_attach_failure_releases_context_permanently() {
        let mut rig = rig();
        let backend = ScriptedAnalysis::new(AnalysisScript::FailOnAttach);
        let env = PageEnvironment::default();
        rig.engine.ensure_analysis(&*rig.media, &env, &backend);
        rig.engine.ensure_analysis(&*rig.media, &env, &backend);

        assert_eq!(rig.engine.capability(), CapabilityState::Disabled);
        assert_eq!(backend.stats().opened, 1);
        assert_eq!(backend.stats().closed, 1);
    }

    #[test]
    fn test_unsupported_backend_disables() {
        let mut rig = rig();
        let backend = ScriptedAnalysis::new(AnalysisScript::Unsupported);
        rig.engine
            .ensure_analysis(&*rig.media, &PageEnvironment::default(), &backend);
        assert_eq!(rig.engine.capability(), CapabilityState::Disabled);
    }

    #[test]
    fn test_resume_suspended_context() {
        let mut rig = rig();
        let backend = ScriptedAnalysis::new(AnalysisScript::Working).start_suspended();
        rig.engine
            .ensure_analysis(&*rig.media, &PageEnvironment::default(), &backend);
        rig.engine.resume_if_suspended();
        rig.engine.resume_if_suspended();
        assert_eq!(backend.stats().resumed, 1);
    }
}
