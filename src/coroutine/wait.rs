use crate::coroutine::{Continuation, Coroutine, Resume};
use crate::foundation::core::{FrameIndex, TICKS_PER_SECOND};
use crate::foundation::error::{TickreelError, TickreelResult};

/// Suspends for a fixed number of ticks, then completes (or delegates into its continuation).
pub struct WaitFrames {
    remaining: u64,
    next: Continuation,
}

/// Wait `frames` ticks. `wait_frames(0)` completes on its first resumption.
pub fn wait_frames(frames: u64) -> WaitFrames {
    WaitFrames {
        remaining: frames,
        next: Continuation::default(),
    }
}

impl WaitFrames {
    /// Delegate into `next` after the wait.
    pub fn then(mut self, next: impl Coroutine + 'static) -> Self {
        self.next.set(Box::new(next));
        self
    }
}

impl Coroutine for WaitFrames {
    fn resume(&mut self, now: FrameIndex) -> TickreelResult<Resume> {
        if self.remaining > 0 {
            self.remaining -= 1;
            return Ok(Resume::Suspend);
        }
        self.next.resume(now)
    }

    fn is_unbounded(&self) -> bool {
        self.next.is_unbounded()
    }

    fn label(&self) -> &'static str {
        "wait_frames"
    }
}

/// Suspends while the global clock is before an absolute time.
///
/// The deadline is absolute: if the clock is already past it, the first resumption completes
/// without suspending.
pub struct WaitUntilTime {
    secs: f64,
    reached: bool,
    next: Continuation,
}

/// Wait until the global clock reaches `secs` seconds (tick `secs * 60`).
pub fn wait_until_time(secs: f64) -> WaitUntilTime {
    WaitUntilTime {
        secs,
        reached: false,
        next: Continuation::default(),
    }
}

impl WaitUntilTime {
    /// Delegate into `next` once the deadline is reached.
    pub fn then(mut self, next: impl Coroutine + 'static) -> Self {
        self.next.set(Box::new(next));
        self
    }

    /// Deadline as a (possibly fractional) tick.
    pub fn deadline_tick(&self) -> f64 {
        self.secs * f64::from(TICKS_PER_SECOND)
    }
}

impl Coroutine for WaitUntilTime {
    fn resume(&mut self, now: FrameIndex) -> TickreelResult<Resume> {
        if !self.reached {
            if !self.secs.is_finite() {
                return Err(TickreelError::animation(format!(
                    "wait_until_time deadline must be finite, got {}",
                    self.secs
                )));
            }
            if (now.0 as f64) < self.deadline_tick() {
                return Ok(Resume::Suspend);
            }
            self.reached = true;
        }
        self.next.resume(now)
    }

    fn is_unbounded(&self) -> bool {
        self.next.is_unbounded()
    }

    fn label(&self) -> &'static str {
        "wait_until_time"
    }
}

#[cfg(test)]
#[path = "../../tests/unit/coroutine/wait.rs"]
mod tests;
