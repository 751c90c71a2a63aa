use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use smallvec::SmallVec;

use crate::coroutine::{Continuation, Coroutine, Resume};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::scene::object::{ObjectRef, Prop};

/// Value range for one jittered property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomRange {
    /// Value restored when the jitter ends.
    pub rest: f64,
    /// Inclusive lower bound.
    pub min: f64,
    /// Upper bound (exclusive unless equal to `min`).
    pub max: f64,
}

impl RandomRange {
    /// Range `[min, max)` that settles back to `rest`.
    pub fn new(rest: f64, min: f64, max: f64) -> Self {
        Self { rest, min, max }
    }

    /// Symmetric range `rest ± spread`.
    pub fn around(rest: f64, spread: f64) -> Self {
        Self::new(rest, rest - spread, rest + spread)
    }

    fn validate(&self, prop: Prop) -> TickreelResult<()> {
        if !(self.rest.is_finite() && self.min.is_finite() && self.max.is_finite()) {
            return Err(TickreelError::animation(format!(
                "random_move range for \"{prop}\" must be finite"
            )));
        }
        if self.min > self.max {
            return Err(TickreelError::animation(format!(
                "random_move range for \"{prop}\" has min {} > max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    fn sample(&self, rng: &mut Xoshiro256StarStar) -> f64 {
        if self.min == self.max {
            self.min
        } else {
            rng.random_range(self.min..self.max)
        }
    }
}

/// Jitters properties of one object with fresh random values every `refresh` ticks.
///
/// Runs for `duration` ticks. On running tick `k` (counted from 0) new values are drawn when
/// `k % refresh == 0`; other ticks only suspend. The resumption after the last running tick
/// restores every property to its rest value and completes (or delegates into the
/// continuation). Values come from a seeded generator, so identical seeds replay identically.
pub struct RandomMove {
    target: ObjectRef,
    duration: u64,
    refresh: u64,
    ranges: SmallVec<[(Prop, RandomRange); 4]>,
    rng: Xoshiro256StarStar,
    state: RandomState,
    next: Continuation,
}

enum RandomState {
    Pending,
    Running { frame: u64 },
    Finishing,
}

/// Jitter `target` for `frames` ticks, re-drawing every `refresh` ticks.
pub fn random_move(
    target: &ObjectRef,
    frames: u64,
    ranges: impl IntoIterator<Item = (Prop, RandomRange)>,
    refresh: u64,
) -> RandomMove {
    RandomMove {
        target: target.clone(),
        duration: frames,
        refresh,
        ranges: ranges.into_iter().collect(),
        rng: Xoshiro256StarStar::seed_from_u64(0),
        state: RandomState::Pending,
        next: Continuation::default(),
    }
}

impl RandomMove {
    /// Add one jittered property.
    pub fn range(mut self, prop: Prop, range: RandomRange) -> Self {
        self.ranges.push((prop, range));
        self
    }

    /// Reseed the generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = Xoshiro256StarStar::seed_from_u64(seed);
        self
    }

    /// Delegate into `next` after the jitter ends.
    pub fn then(mut self, next: impl Coroutine + 'static) -> Self {
        self.next.set(Box::new(next));
        self
    }

    fn check(&self) -> TickreelResult<()> {
        if self.refresh == 0 {
            return Err(TickreelError::animation(
                "random_move refresh interval must be > 0",
            ));
        }
        let obj = self.target.borrow();
        for (prop, range) in &self.ranges {
            range.validate(*prop)?;
            obj.get(*prop)?;
        }
        Ok(())
    }

    fn scatter(&mut self) -> TickreelResult<()> {
        let mut obj = self.target.borrow_mut();
        for (prop, range) in &self.ranges {
            obj.set(*prop, range.sample(&mut self.rng))?;
        }
        Ok(())
    }

    fn settle(&self) -> TickreelResult<()> {
        let mut obj = self.target.borrow_mut();
        for (prop, range) in &self.ranges {
            obj.set(*prop, range.rest)?;
        }
        Ok(())
    }
}

impl Coroutine for RandomMove {
    fn resume(&mut self, now: FrameIndex) -> TickreelResult<Resume> {
        loop {
            match self.state {
                RandomState::Pending => {
                    self.check()?;
                    self.state = RandomState::Running { frame: 0 };
                }
                RandomState::Running { frame } if frame < self.duration => {
                    if frame % self.refresh == 0 {
                        self.scatter()?;
                    }
                    self.state = RandomState::Running { frame: frame + 1 };
                    return Ok(Resume::Suspend);
                }
                RandomState::Running { .. } => {
                    self.settle()?;
                    self.state = RandomState::Finishing;
                }
                RandomState::Finishing => return self.next.resume(now),
            }
        }
    }

    fn is_unbounded(&self) -> bool {
        self.next.is_unbounded()
    }

    fn label(&self) -> &'static str {
        "random_move"
    }
}

#[cfg(test)]
#[path = "../../tests/unit/coroutine/random_move.rs"]
mod tests;
