//! Frame-synchronous coroutine protocol.
//!
//! A [`Coroutine`] is resumed once per tick with the current [`FrameIndex`] and answers with a
//! [`Resume`]:
//!
//! - [`Resume::Suspend`]: nothing more to do this tick.
//! - [`Resume::Frame`]: a new object list (the first resumption of a scene must produce one).
//! - [`Resume::Spawn`]: fork. The scheduler takes ownership of the wrapped coroutine, adds it to
//!   its running set, and resumes the yielding coroutine again on the same tick.
//! - [`Resume::Done`]: completion.
//!
//! Delegation (blocking composition) has no variant of its own: the delegating coroutine holds
//! the inner one and forwards its answers until it reports [`Resume::Done`], then carries on
//! within the same resumption. Every primitive accepts an optional continuation that it
//! delegates into once its own body has finished.

use std::fmt;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::TickreelResult;
use crate::scene::object::Frame;

pub mod pin;
pub mod random_move;
pub mod tween;
pub mod wait;

pub use pin::{PinTo, pin_to};
pub use random_move::{RandomMove, RandomRange, random_move};
pub use tween::{Tween, tween};
pub use wait::{WaitFrames, WaitUntilTime, wait_frames, wait_until_time};

/// Owned, type-erased coroutine.
pub type BoxCoroutine = Box<dyn Coroutine>;

/// What a coroutine produced for one resumption.
pub enum Resume {
    /// Suspended until the next tick.
    Suspend,
    /// New object list to draw from now on.
    Frame(Frame),
    /// Fork: hand this coroutine to the scheduler's running set.
    Spawn(BoxCoroutine),
    /// Finished; must not be resumed again.
    Done,
}

impl Resume {
    /// Return `true` for [`Resume::Done`].
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Debug for Resume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suspend => f.write_str("Suspend"),
            Self::Frame(frame) => write!(f, "Frame({} objects)", frame.len()),
            Self::Spawn(co) => write!(f, "Spawn({})", co.label()),
            Self::Done => f.write_str("Done"),
        }
    }
}

/// A suspended computation stepped in lock-step with the frame clock.
pub trait Coroutine {
    /// Run until the next suspension point.
    ///
    /// `now` is the global tick being produced; coroutines may read it to know "now".
    fn resume(&mut self, now: FrameIndex) -> TickreelResult<Resume>;

    /// Return `true` when this coroutine never completes on its own.
    ///
    /// Such coroutines must be spawned; delegating into one would starve the caller forever.
    fn is_unbounded(&self) -> bool {
        false
    }

    /// Short name used in logs.
    fn label(&self) -> &'static str {
        "coroutine"
    }
}

impl Coroutine for BoxCoroutine {
    fn resume(&mut self, now: FrameIndex) -> TickreelResult<Resume> {
        (**self).resume(now)
    }

    fn is_unbounded(&self) -> bool {
        (**self).is_unbounded()
    }

    fn label(&self) -> &'static str {
        (**self).label()
    }
}

/// Coroutine backed by a closure, for hand-written state machines.
pub struct FnCoroutine<F> {
    f: F,
    finished: bool,
}

/// Wrap a closure as a coroutine. The closure is not called again after it returns
/// [`Resume::Done`].
pub fn from_fn<F>(f: F) -> FnCoroutine<F>
where
    F: FnMut(FrameIndex) -> TickreelResult<Resume>,
{
    FnCoroutine { f, finished: false }
}

impl<F> Coroutine for FnCoroutine<F>
where
    F: FnMut(FrameIndex) -> TickreelResult<Resume>,
{
    fn resume(&mut self, now: FrameIndex) -> TickreelResult<Resume> {
        if self.finished {
            return Ok(Resume::Done);
        }
        let r = (self.f)(now)?;
        self.finished = r.is_done();
        Ok(r)
    }

    fn label(&self) -> &'static str {
        "fn"
    }
}

/// Optional coroutine delegated into after a primitive's own body completes.
#[derive(Default)]
pub(crate) struct Continuation {
    next: Option<BoxCoroutine>,
    finished: bool,
}

impl Continuation {
    pub(crate) fn set(&mut self, next: BoxCoroutine) {
        self.next = Some(next);
    }

    /// Forward one resumption to the continuation, or report completion when there is none.
    pub(crate) fn resume(&mut self, now: FrameIndex) -> TickreelResult<Resume> {
        if self.finished {
            return Ok(Resume::Done);
        }
        let r = match self.next.as_mut() {
            Some(next) => next.resume(now)?,
            None => Resume::Done,
        };
        if r.is_done() {
            self.finished = true;
            self.next = None;
        }
        Ok(r)
    }

    pub(crate) fn is_unbounded(&self) -> bool {
        self.next.as_ref().is_some_and(|n| n.is_unbounded())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/coroutine/mod.rs"]
mod tests;
