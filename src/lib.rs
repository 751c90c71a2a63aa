#![forbid(unsafe_code)]
//! Frame-synchronous animation scheduler.
//!
//! Scenes are coroutines resumed once per tick of a fixed 60 Hz clock. Each scene yields the
//! objects it draws, then drives them with the primitives in [`coroutine`]. The [`Renderer`]
//! steps every coroutine and hands each painted frame to a [`FrameSink`].

pub mod animation;
pub mod assets;
pub mod config;
pub mod coroutine;
pub mod encode;
pub mod foundation;
pub mod projects;
pub mod render;
pub mod scene;
pub mod schedule;

pub use animation::ease::Ease;
pub use config::ProjectConfig;
pub use coroutine::{
    BoxCoroutine, Coroutine, PinTo, RandomMove, RandomRange, Resume, Tween, WaitFrames,
    WaitUntilTime, from_fn, pin_to, random_move, tween, wait_frames, wait_until_time,
};
pub use encode::ffmpeg::{AssemblyOpts, OutputKind, assemble, assembly_args};
pub use encode::sink::{FrameFormat, FrameSink, ImageSequenceSink, InMemorySink, SinkConfig};
pub use foundation::core::{Canvas, Fps, FrameIndex, RenderWindow, TICKS_PER_SECOND};
pub use foundation::error::{TickreelError, TickreelResult};
pub use render::cpu::CpuSurface;
pub use render::paint::Painter;
pub use render::recording::{DrawCall, RecordingSurface};
pub use render::surface::{DrawSurface, FrameRGBA};
pub use render::text::TextEngine;
pub use scene::color::Color;
pub use scene::object::{Frame, ObjectKind, ObjectRef, ObjectType, Prop, RenderObject, TextStyle};
pub use scene::script::{Scene, ScriptBuilder};
pub use scene::stage::{FontSpec, Stage};
pub use schedule::renderer::{RenderReport, RenderStats, Renderer, RendererOpts, progress_bar};
