use std::rc::Rc;

use vitrine_config::PlayerConfig;
use vitrine_host::{
    AnalysisBackend, DrawSurface, EventResponse, FrameHandle, FrameScheduler, Key, KeyEvent,
    MediaElement, MediaEvent, MotionPreference, PageEnvironment, Rect, WidgetId,
};

use crate::registry::PlaybackRegistry;
use crate::session::{PlaybackSession, PlaybackState};
use crate::time::{elapsed_fraction, format_time, scrub_fraction};
use crate::visualizer::{Accents, VisualizerEngine};

/// What the page found inside one audio widget.
///
/// Every part is required; [`PlayerController::setup`] gives up on a widget
/// that lacks any of them.
#[derive(Default)]
pub struct PlayerMarkup {
    pub media: Option<Rc<dyn MediaElement>>,
    pub surface: Option<Box<dyn DrawSurface>>,
    pub has_toggle: bool,
    pub has_scrubber: bool,
    pub has_progress: bool,
    pub has_current_label: bool,
    pub has_duration_label: bool,
    pub track_name: Option<String>,
    /// The scrubber's existing accessible label, if the markup set one.
    pub scrubber_label: Option<String>,
    pub accent: Option<String>,
    pub accent_end: Option<String>,
}

impl PlayerMarkup {
    /// Markup with every required part present.
    pub fn complete(media: Rc<dyn MediaElement>, surface: Box<dyn DrawSurface>) -> Self {
        Self {
            media: Some(media),
            surface: Some(surface),
            has_toggle: true,
            has_scrubber: true,
            has_progress: true,
            has_current_label: true,
            has_duration_label: true,
            ..Self::default()
        }
    }

    pub fn with_track_name(mut self, name: impl Into<String>) -> Self {
        self.track_name = Some(name.into());
        self
    }

    pub fn with_accents(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.accent = Some(start.into());
        self.accent_end = Some(end.into());
        self
    }
}

/// Page-wide collaborators shared by every player.
#[derive(Clone)]
pub struct PlayerServices {
    pub registry: Rc<PlaybackRegistry>,
    pub scheduler: Rc<dyn FrameScheduler>,
    pub analysis: Rc<dyn AnalysisBackend>,
    pub motion: MotionPreference,
    pub env: PageEnvironment,
    pub config: Rc<PlayerConfig>,
}

/// DOM state the host mirrors onto the widget after each handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    /// `is-playing` class on the toggle.
    pub toggle_playing: bool,
    pub toggle_label: String,
    pub scrubber_label: String,
    /// Inline width of the progress fill.
    pub progress_width: String,
    pub aria_value_now: String,
    pub current_label: String,
    pub duration_label: String,
}

pub struct PlayerController {
    id: WidgetId,
    track_name: String,
    session: PlaybackSession,
    visualizer: VisualizerEngine,
    view: PlayerView,
    services: PlayerServices,
}

impl PlayerController {
    pub fn setup(id: WidgetId, markup: PlayerMarkup, services: PlayerServices) -> Option<Self> {
        let PlayerMarkup {
            media: Some(media),
            surface: Some(surface),
            has_toggle: true,
            has_scrubber: true,
            has_progress: true,
            has_current_label: true,
            has_duration_label: true,
            track_name,
            scrubber_label,
            accent,
            accent_end,
        } = markup
        else {
            log::debug!("audio widget {id:?} is missing required parts, skipping");
            return None;
        };

        let config = services.config.clone();
        let track_name = track_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| config.default_track_name.clone());
        let scrubber_label = scrubber_label
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| format!("{} {track_name}", config.labels.progress));
        let accents = Accents::resolve(
            accent.as_deref(),
            accent_end.as_deref(),
            &config.default_accent,
        );

        let visualizer = VisualizerEngine::new(
            surface,
            services.scheduler.clone(),
            services.motion.clone(),
            config.clone(),
            accents,
            services.env.device_pixel_ratio,
        );

        let view = PlayerView {
            toggle_playing: false,
            toggle_label: format!("{} {track_name}", config.labels.play),
            scrubber_label,
            progress_width: "0%".to_string(),
            aria_value_now: "0.0".to_string(),
            current_label: format_time(0.0),
            duration_label: format_time(0.0),
        };

        Some(Self {
            id,
            track_name,
            session: PlaybackSession::new(media),
            visualizer,
            view,
            services,
        })
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn track_name(&self) -> &str {
        &self.track_name
    }

    pub fn view(&self) -> &PlayerView {
        &self.view
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn visualizer(&self) -> &VisualizerEngine {
        &self.visualizer
    }

    pub fn media(&self) -> &Rc<dyn MediaElement> {
        self.session.media()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.session.playback_state()
    }

    pub fn on_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::LoadedMetadata => self.on_loaded_metadata(),
            MediaEvent::TimeUpdate => self.on_time_update(),
            MediaEvent::Play => self.on_play(),
            MediaEvent::Pause => self.on_pause(),
            MediaEvent::Ended => self.on_ended(),
        }
    }

    /// Play/pause button.
    pub fn on_toggle_click(&mut self) {
        let media = self.session.media().clone();
        if media.is_paused() {
            self.visualizer.ensure_analysis(
                &*media,
                &self.services.env,
                &*self.services.analysis,
            );
            media.play();
        } else {
            media.pause();
        }
    }

    pub fn on_scrubber_click(&mut self, client_x: f64, bounds: Rect) {
        let duration = self.session.duration_secs();
        if duration <= 0.0 {
            return;
        }
        if let Some(fraction) = scrub_fraction(client_x, bounds) {
            self.session.seek(fraction * duration);
        }
    }

    pub fn on_scrubber_key(&mut self, event: &KeyEvent) -> EventResponse {
        let duration = self.session.duration_secs();
        if duration <= 0.0 {
            return EventResponse::IGNORED;
        }
        let config = &self.services.config;
        let step = if event.shift {
            config.seek_step_modified_secs
        } else {
            config.seek_step_secs
        };
        let current = self.session.current_time();
        match event.key {
            Key::ArrowRight => {
                self.session.seek(duration.min(current + step));
                EventResponse::PREVENT
            }
            Key::ArrowLeft => {
                self.session.seek((current - step).max(0.0));
                EventResponse::PREVENT
            }
            _ => EventResponse::IGNORED,
        }
    }

    /// Returns `true` if the frame belonged to this player.
    pub fn on_animation_frame(&mut self, handle: FrameHandle) -> bool {
        let media = self.session.media().clone();
        self.visualizer.on_animation_frame(handle, &*media)
    }

    pub fn on_resize(&mut self, device_pixel_ratio: f64) {
        self.visualizer.resize(device_pixel_ratio);
    }

    fn on_loaded_metadata(&mut self) {
        let duration = self.session.record_duration();
        self.view.duration_label = format_time(duration);
    }

    fn on_time_update(&mut self) {
        let current = self.session.current_time();
        let percent = elapsed_fraction(current, self.session.duration_secs()) * 100.0;
        self.view.current_label = format_time(current);
        self.view.progress_width = format!("{percent}%");
        self.view.aria_value_now = format!("{percent:.1}");
    }

    fn on_ended(&mut self) {
        self.session.media().pause();
        self.session.seek(0.0);
    }

    fn on_play(&mut self) {
        self.services.registry.pause_all_except(self.id);
        self.session.mark_started();
        self.view.toggle_playing = true;
        let label = &self.services.config.labels.pause;
        self.view.toggle_label = format!("{label} {}", self.track_name);
        let media = self.session.media().clone();
        self.visualizer.start(&*media);
        self.visualizer.resume_if_suspended();
    }

    fn on_pause(&mut self) {
        self.view.toggle_playing = false;
        let label = &self.services.config.labels.play;
        self.view.toggle_label = format!("{label} {}", self.track_name);
        self.visualizer.stop();
    }
}
