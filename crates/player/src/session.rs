use std::rc::Rc;

use vitrine_host::MediaElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Never started.
    Idle,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }
}

/// Playback facts for one player. The media element itself belongs to the
/// page; the session only holds a handle to it.
pub struct PlaybackSession {
    media: Rc<dyn MediaElement>,
    duration: Option<f64>,
    started: bool,
}

impl PlaybackSession {
    pub fn new(media: Rc<dyn MediaElement>) -> Self {
        Self {
            media,
            duration: None,
            started: false,
        }
    }

    pub fn media(&self) -> &Rc<dyn MediaElement> {
        &self.media
    }

    /// Record the duration reported with the metadata. Only the first report
    /// counts; unusable values are stored as zero.
    pub fn record_duration(&mut self) -> f64 {
        if let Some(duration) = self.duration {
            return duration;
        }
        let reported = self.media.duration();
        let duration = if reported.is_finite() && reported > 0.0 {
            reported
        } else {
            0.0
        };
        self.duration = Some(duration);
        duration
    }

    /// Zero until metadata has loaded.
    pub fn duration_secs(&self) -> f64 {
        self.duration.unwrap_or(0.0)
    }

    pub fn current_time(&self) -> f64 {
        self.media.current_time()
    }

    pub fn seek(&self, seconds: f64) {
        self.media.set_current_time(seconds);
    }

    pub fn mark_started(&mut self) {
        self.started = true;
    }

    pub fn is_playing(&self) -> bool {
        !self.media.is_paused()
    }

    pub fn playback_state(&self) -> PlaybackState {
        if self.is_playing() {
            PlaybackState::Playing
        } else if self.started {
            PlaybackState::Paused
        } else {
            PlaybackState::Idle
        }
    }
}
