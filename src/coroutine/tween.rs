use smallvec::SmallVec;

use crate::animation::ease::Ease;
use crate::coroutine::{Continuation, Coroutine, Resume};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::TickreelResult;
use crate::scene::object::{ObjectRef, Prop};

/// Interpolates numeric properties of one object toward target values over a fixed number of
/// ticks.
///
/// Start values are captured on the first resumption, not at construction, so a tween queued
/// behind other work starts from wherever its target is by then. Each of the `duration`
/// running resumptions writes `start + ease(k / duration) * (target - start)` for
/// `k = 0..duration` and suspends. The next resumption snaps every property to its exact
/// target and completes (or delegates into the continuation).
pub struct Tween {
    target: ObjectRef,
    duration: u64,
    to: SmallVec<[(Prop, f64); 4]>,
    ease: Ease,
    state: TweenState,
    next: Continuation,
}

enum TweenState {
    Pending,
    Running {
        frame: u64,
        start: SmallVec<[f64; 4]>,
    },
    Finishing,
}

/// Tween `target` toward `to` over `frames` ticks with linear easing.
pub fn tween(target: &ObjectRef, frames: u64, to: impl IntoIterator<Item = (Prop, f64)>) -> Tween {
    Tween {
        target: target.clone(),
        duration: frames,
        to: to.into_iter().collect(),
        ease: Ease::Linear,
        state: TweenState::Pending,
        next: Continuation::default(),
    }
}

impl Tween {
    /// Tween with no properties yet; add them with [`Tween::to`].
    pub fn new(target: &ObjectRef, frames: u64) -> Self {
        tween(target, frames, SmallVec::<[(Prop, f64); 4]>::new())
    }

    /// Add (or append) one property target.
    pub fn to(mut self, prop: Prop, value: f64) -> Self {
        self.to.push((prop, value));
        self
    }

    /// Shape progress with `ease`.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Delegate into `next` after the tween completes.
    pub fn then(mut self, next: impl Coroutine + 'static) -> Self {
        self.next.set(Box::new(next));
        self
    }

    /// Number of running ticks.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    fn capture_start(&self) -> TickreelResult<SmallVec<[f64; 4]>> {
        let obj = self.target.borrow();
        self.to.iter().map(|(prop, _)| obj.get(*prop)).collect()
    }

    fn snap(&self) -> TickreelResult<()> {
        let mut obj = self.target.borrow_mut();
        for (prop, to) in &self.to {
            obj.set(*prop, *to)?;
        }
        Ok(())
    }
}

fn write_props(target: &ObjectRef, to: &[(Prop, f64)], start: &[f64], t: f64) -> TickreelResult<()> {
    let mut obj = target.borrow_mut();
    for ((prop, to), from) in to.iter().zip(start) {
        obj.set(*prop, from + t * (to - from))?;
    }
    Ok(())
}

impl Coroutine for Tween {
    fn resume(&mut self, now: FrameIndex) -> TickreelResult<Resume> {
        loop {
            match &mut self.state {
                TweenState::Pending => {
                    let start = self.capture_start()?;
                    self.state = TweenState::Running { frame: 0, start };
                }
                TweenState::Running { frame, start } => {
                    if *frame < self.duration {
                        let t = self.ease.apply(*frame as f64 / self.duration as f64);
                        *frame += 1;
                        write_props(&self.target, &self.to, start, t)?;
                        return Ok(Resume::Suspend);
                    }
                    self.snap()?;
                    self.state = TweenState::Finishing;
                }
                TweenState::Finishing => return self.next.resume(now),
            }
        }
    }

    fn is_unbounded(&self) -> bool {
        self.next.is_unbounded()
    }

    fn label(&self) -> &'static str {
        "tween"
    }
}

#[cfg(test)]
#[path = "../../tests/unit/coroutine/tween.rs"]
mod tests;
