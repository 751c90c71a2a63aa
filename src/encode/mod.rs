//! Frame persistence and final video assembly.
//!
//! Rendered frames are written as numbered image files by a [`sink::FrameSink`]; once the run
//! completes, [`ffmpeg::assemble`] turns the sequence (plus optional audio) into a video.

/// `ffmpeg` assembly of persisted frame sequences.
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
