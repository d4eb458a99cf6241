pub mod board;
pub mod controller;
pub mod drag;
pub mod nodes;

pub use board::TimelineBoard;
pub use controller::{TimelineController, TimelineMarkup, TimelineServices, TimelineView};
pub use drag::{TimelineDragState, clamp_offset, parse_max_offset};
pub use nodes::EventNodes;
