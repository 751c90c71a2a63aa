//! Clock, canvas and error primitives shared by every other module.

/// Frame index, render window, fps and canvas.
pub mod core;
/// Error type.
pub mod error;
/// Pixel and hashing helpers.
pub(crate) mod math;
