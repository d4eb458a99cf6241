/// A playable media resource owned by the page.
///
/// `play` and `pause` are requests: the host answers them later by dispatching
/// [`MediaEvent::Play`] or [`MediaEvent::Pause`] to the owning controller.
/// Pausing an element that is already paused dispatches nothing.
pub trait MediaElement {
    fn is_paused(&self) -> bool;

    fn current_time(&self) -> f64;

    fn set_current_time(&self, seconds: f64);

    /// Duration in seconds. May be NaN before metadata loads.
    fn duration(&self) -> f64;

    /// The resolved source URL, empty if none is set.
    fn source_url(&self) -> String;

    fn play(&self);

    fn pause(&self);
}

/// Lifecycle events a media element reports back to its controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    LoadedMetadata,
    TimeUpdate,
    Play,
    Pause,
    Ended,
}
