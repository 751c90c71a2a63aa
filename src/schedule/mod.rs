//! The frame scheduler.

/// Scene playback, spawned-coroutine stepping, and frame output.
pub mod renderer;
