//! The seam between the widget controllers and whatever page hosts them.
//!
//! Controllers never touch a DOM directly. They consume a media element, a
//! drawing surface, a frame scheduler, a scroll container and an analysis
//! backend through the traits below, and receive input and lifecycle events as
//! plain values. [`sim`] provides in-memory implementations of every trait.

mod analysis;
mod env;
mod input;
mod media;
mod schedule;
pub mod sim;
mod surface;

pub use analysis::{AnalysisBackend, AnalysisContext, AnalysisError};
pub use env::{MotionPreference, PageEnvironment, WidgetId, is_file_url};
pub use input::{
    EventResponse, Key, KeyEvent, PointerEnd, PointerEvent, PointerId, PointerKind, Rect,
    ScrollContainer, WheelEvent,
};
pub use media::{MediaElement, MediaEvent};
pub use schedule::{FrameHandle, FrameScheduler};
pub use surface::{DrawSurface, LineCap, LinearGradient, Point, Size, StrokeStyle};
