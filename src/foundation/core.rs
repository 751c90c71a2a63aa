use crate::foundation::error::{TickreelError, TickreelResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Number of clock ticks per second. The frame clock is fixed at 60 Hz.
pub const TICKS_PER_SECOND: u32 = 60;

/// Absolute 0-based tick of the global frame clock.
///
/// The counter is monotonic across the whole video and is not reset between scenes.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Seconds elapsed on the fixed 60 Hz clock at this tick.
    pub fn as_secs(self) -> f64 {
        Fps::CLOCK.frames_to_secs(self.0)
    }

    /// Tick immediately after this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Inclusive `[start, end]` window of ticks that are rasterized.
///
/// Ticks outside the window still advance every coroutine; only drawing is skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RenderWindow {
    /// First rasterized tick.
    pub start: FrameIndex,
    /// Last rasterized tick (inclusive), or `None` for an open-ended window.
    pub end: Option<FrameIndex>,
}

impl Default for RenderWindow {
    fn default() -> Self {
        Self::full()
    }
}

impl RenderWindow {
    /// Window covering every tick.
    pub fn full() -> Self {
        Self {
            start: FrameIndex(0),
            end: None,
        }
    }

    /// Create a validated window with `start <= end`.
    pub fn new(start: FrameIndex, end: Option<FrameIndex>) -> TickreelResult<Self> {
        if let Some(end) = end
            && start.0 > end.0
        {
            return Err(TickreelError::validation(
                "render window start must be <= end",
            ));
        }
        Ok(Self { start, end })
    }

    /// Build a window from the command-line convention where `end == -1` means "to the end".
    pub fn from_signed(start: u64, end: i64) -> TickreelResult<Self> {
        let end = match end {
            -1 => None,
            e if e < 0 => {
                return Err(TickreelError::validation(format!(
                    "render window end must be >= 0 or -1, got {e}"
                )));
            }
            e => Some(FrameIndex(e as u64)),
        };
        Self::new(FrameIndex(start), end)
    }

    /// Return `true` when tick `f` is rasterized.
    pub fn contains(self, f: FrameIndex) -> bool {
        f.0 >= self.start.0 && self.end.is_none_or(|end| f.0 <= end.0)
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// The project clock.
    pub const CLOCK: Fps = Fps {
        num: TICKS_PER_SECOND,
        den: 1,
    };

    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> TickreelResult<Self> {
        if den == 0 {
            return Err(TickreelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(TickreelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * f64::from(self.den) / f64::from(self.num)
    }

    /// Convert seconds to a (fractional) frame position.
    pub fn secs_to_frames(self, secs: f64) -> f64 {
        secs * self.as_f64()
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Canvas {
    /// Validate that both dimensions are non-zero and fit the rasterizer's `u16` surfaces.
    pub fn validate(self) -> TickreelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TickreelError::validation("canvas width/height must be > 0"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(TickreelError::validation(
                "canvas width/height must fit in u16",
            ));
        }
        Ok(())
    }

    /// Full-canvas rectangle.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
