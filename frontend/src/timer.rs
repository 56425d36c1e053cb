/// Identifies a scheduled callback so it can be cancelled later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Delayed and repeating callbacks. The browser build backs this with
/// gloo timers; tests drive a fake clock.
pub trait Scheduler {
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle;

    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerHandle;

    /// Cancelling a handle that already fired is a no-op.
    fn cancel(&self, handle: TimerHandle);
}
