//! Rasterization: draw-surface abstraction, CPU backend, and the object painter.

/// CPU raster surface powered by `vello_cpu`.
pub mod cpu;
/// Object-list painter.
pub mod paint;
/// Draw-call recorder.
pub mod recording;
/// Surface trait and frame type.
pub mod surface;
/// Font registration and text shaping.
pub mod text;
