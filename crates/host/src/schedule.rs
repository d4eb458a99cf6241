/// Identifier of a scheduled animation-frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// The host's "call me before the next repaint" primitive.
///
/// Every scheduled handle is later delivered to all interested controllers
/// through their `on_animation_frame` method; each controller ignores handles
/// it did not request.
pub trait FrameScheduler {
    fn request_frame(&self) -> FrameHandle;

    /// Cancelling an unknown or already delivered handle is a no-op.
    fn cancel_frame(&self, handle: FrameHandle);
}
