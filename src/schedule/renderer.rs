use crate::coroutine::{BoxCoroutine, Coroutine, Resume};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex, RenderWindow};
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::render::paint::Painter;
use crate::render::surface::{DrawSurface, FrameRGBA};
use crate::scene::object::Frame;
use crate::scene::script::Scene;
use crate::scene::stage::Stage;

/// Options controlling a [`Renderer`] run.
#[derive(Clone, Debug)]
pub struct RendererOpts {
    /// Ticks that are rasterized and pushed to the sink. Every tick is simulated regardless.
    pub window: RenderWindow,
    /// Expected total ticks, used only to draw the progress bar.
    pub expected_ticks: Option<u64>,
    /// Keep the last rendered image of every scene in the report.
    pub keep_previews: bool,
}

impl Default for RendererOpts {
    fn default() -> Self {
        Self {
            window: RenderWindow::full(),
            expected_ticks: None,
            keep_previews: false,
        }
    }
}

/// Run statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Ticks simulated (the final clock value).
    pub ticks: u64,
    /// Ticks rasterized and pushed to the sink.
    pub frames_rendered: u64,
    /// Ticks simulated without drawing.
    pub frames_skipped: u64,
    /// Scenes played.
    pub scenes: usize,
}

/// Per-scene summary.
#[derive(Clone, Debug)]
pub struct ScenePreview {
    /// Scene name.
    pub scene: String,
    /// First tick spent in the scene.
    pub first_tick: FrameIndex,
    /// Last tick spent in the scene (inclusive).
    pub last_tick: FrameIndex,
    /// Last rendered image of the scene, when previews are kept and the scene was in the window.
    pub frame: Option<FrameRGBA>,
}

/// Result of a [`Renderer::run`].
#[derive(Clone, Debug, Default)]
pub struct RenderReport {
    /// Counters.
    pub stats: RenderStats,
    /// One entry per scene, in play order.
    pub previews: Vec<ScenePreview>,
}

type TickObserver = Box<dyn FnMut(FrameIndex, &Frame)>;

/// Frame-synchronous scheduler: advances scenes and spawned coroutines one tick at a time and
/// paints every tick inside the render window.
///
/// Per tick, the active scene runs first (re-resumed on every fork until it suspends), then
/// every running spawned coroutine is resumed once in spawn order, then the frame is painted.
/// The clock is global: it is never reset between scenes.
pub struct Renderer {
    stage: Stage,
    opts: RendererOpts,
    painter: Painter,
    observer: Option<TickObserver>,
}

impl Renderer {
    /// Create a renderer for `stage`.
    pub fn new(stage: Stage, opts: RendererOpts) -> TickreelResult<Self> {
        stage.validate()?;
        Ok(Self {
            stage,
            opts,
            painter: Painter::new(),
            observer: None,
        })
    }

    /// Stage the renderer paints onto.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Call `f` once per tick after all coroutines were stepped and before painting.
    pub fn with_observer(mut self, f: impl FnMut(FrameIndex, &Frame) + 'static) -> Self {
        self.observer = Some(Box::new(f));
        self
    }

    /// Play `scenes` in order, pushing rendered frames into `sink`.
    #[tracing::instrument(skip_all, fields(scenes = scenes.len()))]
    pub fn run(
        &mut self,
        scenes: Vec<Scene>,
        surface: &mut dyn DrawSurface,
        sink: &mut dyn FrameSink,
    ) -> TickreelResult<RenderReport> {
        if surface.canvas() != self.stage.canvas {
            return Err(TickreelError::validation(format!(
                "surface is {}x{} but stage is {}x{}",
                surface.canvas().width,
                surface.canvas().height,
                self.stage.canvas.width,
                self.stage.canvas.height
            )));
        }
        sink.begin(SinkConfig {
            canvas: self.stage.canvas,
            fps: Fps::CLOCK,
            background: self.stage.background,
        })?;

        let mut report = RenderReport::default();
        let mut tick = FrameIndex(0);
        for mut scene in scenes {
            let preview = self.play_scene(&mut scene, &mut tick, surface, sink, &mut report.stats)?;
            report.previews.push(preview);
            report.stats.scenes += 1;
        }
        report.stats.ticks = tick.0;
        sink.end()?;

        tracing::info!(
            ticks = report.stats.ticks,
            rendered = report.stats.frames_rendered,
            skipped = report.stats.frames_skipped,
            "render complete"
        );
        Ok(report)
    }

    fn play_scene(
        &mut self,
        scene: &mut Scene,
        tick: &mut FrameIndex,
        surface: &mut dyn DrawSurface,
        sink: &mut dyn FrameSink,
        stats: &mut RenderStats,
    ) -> TickreelResult<ScenePreview> {
        let _span = tracing::info_span!("scene", name = scene.name()).entered();
        scene.start(&self.stage)?;
        let mut frame = match scene.resume(*tick)? {
            Resume::Frame(frame) => frame,
            other => {
                return Err(TickreelError::animation(format!(
                    "scene '{}' must yield its object list first, got {other:?}",
                    scene.name()
                )));
            }
        };

        let first_tick = *tick;
        let mut running: Vec<BoxCoroutine> = Vec::new();
        let mut last_image = None;
        loop {
            let mut resumed = scene.resume(*tick)?;
            while let Resume::Spawn(co) = resumed {
                tracing::trace!(tick = tick.0, kind = co.label(), "spawned");
                running.push(co);
                resumed = scene.resume(*tick)?;
            }
            let done = match resumed {
                Resume::Done => true,
                Resume::Frame(next) => {
                    frame = next;
                    false
                }
                Resume::Suspend | Resume::Spawn(_) => false,
            };

            step_running(&mut running, *tick)?;
            if let Some(observer) = self.observer.as_mut() {
                observer(*tick, &frame);
            }

            if self.opts.window.contains(*tick) {
                self.painter.paint(surface, &self.stage, &frame)?;
                let image = surface.snapshot()?;
                sink.push_frame(*tick, &image)?;
                stats.frames_rendered += 1;
                tracing::info!(
                    "rendering frame {:05}{} - objects: {} - tweens running: {}",
                    tick.0,
                    self.bar(*tick),
                    frame.len(),
                    running.len()
                );
                if self.opts.keep_previews {
                    last_image = Some(image);
                }
            } else {
                stats.frames_skipped += 1;
                tracing::debug!(
                    "skipping frame  {:05}{} - objects: {} - tweens running: {}",
                    tick.0,
                    self.bar(*tick),
                    frame.len(),
                    running.len()
                );
            }

            let last_tick = *tick;
            *tick = tick.next();
            if done {
                if !running.is_empty() {
                    tracing::debug!(
                        dropped = running.len(),
                        "scene ended with spawned coroutines still running"
                    );
                }
                return Ok(ScenePreview {
                    scene: scene.name().to_owned(),
                    first_tick,
                    last_tick,
                    frame: last_image,
                });
            }
        }
    }

    fn bar(&self, tick: FrameIndex) -> String {
        match self.opts.expected_ticks {
            Some(max) => format!(" - {}", progress_bar(tick.0, max, 50)),
            None => String::new(),
        }
    }
}

/// Resume every running coroutine once, in insertion order.
///
/// Coroutines forked by a running coroutine are appended and stepped in the same pass.
/// Finished coroutines are removed without disturbing the order of the rest.
fn step_running(running: &mut Vec<BoxCoroutine>, tick: FrameIndex) -> TickreelResult<()> {
    let mut i = 0;
    while i < running.len() {
        let finished = loop {
            match running[i].resume(tick)? {
                Resume::Spawn(child) => running.push(child),
                Resume::Done => break true,
                Resume::Frame(_) => {
                    tracing::warn!(tick = tick.0, "spawned coroutine yielded a frame; ignored");
                    break false;
                }
                Resume::Suspend => break false,
            }
        };
        if finished {
            running.remove(i);
        } else {
            i += 1;
        }
    }
    Ok(())
}

/// Text progress bar of `width` cells, `value / max` filled.
pub fn progress_bar(value: u64, max: u64, width: usize) -> String {
    (0..width)
        .map(|i| {
            let filled = max > 0 && (i as f64) < (width as f64) * (value as f64) / (max as f64);
            if filled { '█' } else { '░' }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/renderer.rs"]
mod tests;
