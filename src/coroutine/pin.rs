use std::rc::Rc;

use crate::coroutine::{Continuation, Coroutine, Resume};
use crate::foundation::core::{Affine, FrameIndex, Point, Vec2};
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::scene::object::{ObjectRef, Prop};

/// Keeps one object rigidly attached to another.
///
/// On the first resumption the pinned object's offset, rotation difference, and size ratio
/// relative to the base are captured. Every running tick the pinned object is then placed so
/// that:
///
/// - its position is `base.pos + R(base.rot) * S(sx, sy) * R(-rot0) * offset0`, where `rot0`
///   is the base rotation at bind time and `(sx, sy)` is the base's current size divided by
///   its bind-time size;
/// - its rotation is `base.rot + (pinned.rot0 - base.rot0)`;
/// - when both objects are sized, its size keeps the bind-time ratio to the base size.
///
/// Without a duration the pin never completes; it must be spawned and is discarded when the
/// scene ends.
pub struct PinTo {
    pinned: ObjectRef,
    base: ObjectRef,
    duration: Option<u64>,
    state: PinState,
    next: Continuation,
}

enum PinState {
    Pending,
    Bound { binding: Binding, elapsed: u64 },
    Finishing,
}

struct Binding {
    offset: Vec2,
    base_rotation: f64,
    rotation_delta: f64,
    base_size: Option<(f64, f64)>,
    size_ratio: Option<(f64, f64)>,
}

/// Pin `pinned` to `base` for `frames` ticks, or forever when `frames` is `None`.
pub fn pin_to(pinned: &ObjectRef, base: &ObjectRef, frames: Option<u64>) -> PinTo {
    PinTo {
        pinned: pinned.clone(),
        base: base.clone(),
        duration: frames,
        state: PinState::Pending,
        next: Continuation::default(),
    }
}

impl PinTo {
    /// Delegate into `next` after a finite pin completes. Never reached for unbounded pins.
    pub fn then(mut self, next: impl Coroutine + 'static) -> Self {
        self.next.set(Box::new(next));
        self
    }

    fn bind(&self) -> TickreelResult<Binding> {
        if Rc::ptr_eq(&self.pinned, &self.base) {
            return Err(TickreelError::animation("cannot pin an object to itself"));
        }
        let base = self.base.borrow();
        let pinned = self.pinned.borrow();
        let base_size = base.size();
        if let Some((w, h)) = base_size
            && (w == 0.0 || h == 0.0)
        {
            return Err(TickreelError::animation(format!(
                "cannot pin to a {} object with zero width or height",
                base.object_type()
            )));
        }
        let size_ratio = match (pinned.size(), base_size) {
            (Some((pw, ph)), Some((bw, bh))) => Some((pw / bw, ph / bh)),
            _ => None,
        };
        Ok(Binding {
            offset: Vec2::new(pinned.x - base.x, pinned.y - base.y),
            base_rotation: base.rotation,
            rotation_delta: pinned.rotation - base.rotation,
            base_size,
            size_ratio,
        })
    }
}

fn apply_pin(base: &ObjectRef, pinned: &ObjectRef, binding: &Binding) -> TickreelResult<()> {
    let (origin, rotation, size) = {
        let base = base.borrow();
        (Point::new(base.x, base.y), base.rotation, base.size())
    };
    let (sx, sy) = match (binding.base_size, size) {
        (Some((w0, h0)), Some((w, h))) => (w / w0, h / h0),
        _ => (1.0, 1.0),
    };
    let local = Affine::rotate(rotation)
        * Affine::scale_non_uniform(sx, sy)
        * Affine::rotate(-binding.base_rotation);
    let world = origin + (local * binding.offset.to_point()).to_vec2();

    let mut pinned = pinned.borrow_mut();
    pinned.set(Prop::X, world.x)?;
    pinned.set(Prop::Y, world.y)?;
    pinned.set(Prop::Rotation, rotation + binding.rotation_delta)?;
    if let (Some((rw, rh)), Some((w, h))) = (binding.size_ratio, size) {
        pinned.set(Prop::W, w * rw)?;
        pinned.set(Prop::H, h * rh)?;
    }
    Ok(())
}

impl Coroutine for PinTo {
    fn resume(&mut self, now: FrameIndex) -> TickreelResult<Resume> {
        loop {
            match &mut self.state {
                PinState::Pending => {
                    let binding = self.bind()?;
                    self.state = PinState::Bound {
                        binding,
                        elapsed: 0,
                    };
                }
                PinState::Bound { binding, elapsed } => {
                    if self.duration.is_some_and(|d| *elapsed >= d) {
                        self.state = PinState::Finishing;
                        continue;
                    }
                    *elapsed += 1;
                    apply_pin(&self.base, &self.pinned, binding)?;
                    return Ok(Resume::Suspend);
                }
                PinState::Finishing => return self.next.resume(now),
            }
        }
    }

    fn is_unbounded(&self) -> bool {
        self.duration.is_none() || self.next.is_unbounded()
    }

    fn label(&self) -> &'static str {
        "pin_to"
    }
}

#[cfg(test)]
#[path = "../../tests/unit/coroutine/pin.rs"]
mod tests;
