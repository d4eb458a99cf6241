//! The audio player widget: playback state, scrubber, waveform and
//! page-wide exclusive playback.

pub mod controller;
pub mod deck;
pub mod registry;
pub mod session;
pub mod time;
pub mod visualizer;

pub use controller::{PlayerController, PlayerMarkup, PlayerServices, PlayerView};
pub use deck::PlayerDeck;
pub use registry::PlaybackRegistry;
pub use session::{PlaybackSession, PlaybackState};
pub use time::{ClockTime, elapsed_fraction, format_time, scrub_fraction};
pub use visualizer::{Accents, AnalysisCapability, CapabilityState, VisualizerEngine};
