//! Scenes: named coroutines whose first resumption yields the object list to draw.
//!
//! Most scenes are written as a [`Script`]: a closure that runs once, when the scheduler
//! first resumes the scene, and queues steps on a [`ScriptBuilder`]. The queued steps then
//! execute in order, one suspension at a time:
//!
//! ```ignore
//! Scene::new("intro", |s| {
//!     let title = s.add(RenderObject::text("Hello", s.stage().center_x(), 0.0));
//!     s.then(tween(&title, 180, [(Prop::Y, 360.0)]).ease(Ease::OutQuad));
//!     s.then(wait_frames(60));
//!     Ok(())
//! })
//! ```

use std::collections::VecDeque;

use crate::coroutine::{BoxCoroutine, Coroutine, Resume};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::foundation::math::fnv1a64;
use crate::render::text::TextEngine;
use crate::scene::object::{Frame, ObjectRef, RenderObject};
use crate::scene::stage::Stage;

type BuildFn = Box<dyn FnOnce(&mut ScriptBuilder<'_>) -> TickreelResult<()>>;
type CallFn = Box<dyn FnOnce(FrameIndex) -> TickreelResult<()>>;

/// One scene of the video.
pub struct Scene {
    name: String,
    body: SceneBody,
}

enum SceneBody {
    Unbuilt(BuildFn),
    Ready(BoxCoroutine),
    Poisoned,
}

impl Scene {
    /// Scene built from a script closure. The closure runs lazily, on [`Scene::start`].
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&mut ScriptBuilder<'_>) -> TickreelResult<()> + 'static,
    {
        Self {
            name: name.into(),
            body: SceneBody::Unbuilt(Box::new(build)),
        }
    }

    /// Scene driven by a hand-written coroutine. Its first resumption must yield
    /// [`Resume::Frame`].
    pub fn custom(name: impl Into<String>, co: impl Coroutine + 'static) -> Self {
        Self {
            name: name.into(),
            body: SceneBody::Ready(Box::new(co)),
        }
    }

    /// Scene name, used in logs and previews.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the script closure (if any) against `stage`. Idempotent.
    #[tracing::instrument(skip_all, fields(scene = %self.name))]
    pub fn start(&mut self, stage: &Stage) -> TickreelResult<()> {
        let body = std::mem::replace(&mut self.body, SceneBody::Poisoned);
        self.body = match body {
            SceneBody::Unbuilt(build) => {
                let mut builder = ScriptBuilder::new(stage, &self.name);
                build(&mut builder)?;
                tracing::debug!(
                    objects = builder.objects.len(),
                    steps = builder.steps.len(),
                    "scene script built"
                );
                SceneBody::Ready(Box::new(builder.finish()))
            }
            ready @ SceneBody::Ready(_) => ready,
            SceneBody::Poisoned => {
                return Err(TickreelError::animation(format!(
                    "scene '{}' failed to build earlier",
                    self.name
                )));
            }
        };
        Ok(())
    }
}

impl Coroutine for Scene {
    fn resume(&mut self, now: FrameIndex) -> TickreelResult<Resume> {
        match &mut self.body {
            SceneBody::Ready(co) => co.resume(now),
            _ => Err(TickreelError::animation(format!(
                "scene '{}' resumed before start",
                self.name
            ))),
        }
    }

    fn label(&self) -> &'static str {
        "scene"
    }
}

enum Step {
    Delegate(BoxCoroutine),
    Spawn(BoxCoroutine),
    Call(CallFn),
    Show(Frame),
}

/// Collects a scene's initial objects and its ordered steps.
pub struct ScriptBuilder<'a> {
    stage: &'a Stage,
    scene: u64,
    seeds: u64,
    objects: Frame,
    steps: VecDeque<Step>,
    text: Option<TextEngine>,
}

impl<'a> ScriptBuilder<'a> {
    fn new(stage: &'a Stage, scene: &str) -> Self {
        Self {
            stage,
            scene: fnv1a64(scene.as_bytes()),
            seeds: 0,
            objects: Vec::new(),
            steps: VecDeque::new(),
            text: None,
        }
    }

    /// Stage geometry and assets.
    pub fn stage(&self) -> &'a Stage {
        self.stage
    }

    /// Add an object to the scene's initial frame and return its shared handle.
    pub fn add(&mut self, obj: RenderObject) -> ObjectRef {
        let obj = obj.share();
        self.objects.push(obj.clone());
        obj
    }

    /// Add an existing handle to the initial frame.
    pub fn add_ref(&mut self, obj: &ObjectRef) -> &mut Self {
        self.objects.push(obj.clone());
        self
    }

    /// Delegate: run `co` to completion before the next step.
    ///
    /// The unbounded check happens when the step is reached, so queuing never fails.
    pub fn then(&mut self, co: impl Coroutine + 'static) -> &mut Self {
        self.steps.push_back(Step::Delegate(Box::new(co)));
        self
    }

    /// Fork: hand `co` to the scheduler and continue immediately.
    pub fn spawn(&mut self, co: impl Coroutine + 'static) -> &mut Self {
        self.steps.push_back(Step::Spawn(Box::new(co)));
        self
    }

    /// Run `f` when the step is reached, without suspending.
    pub fn call(&mut self, f: impl FnOnce(FrameIndex) -> TickreelResult<()> + 'static) -> &mut Self {
        self.steps.push_back(Step::Call(Box::new(f)));
        self
    }

    /// Replace the drawn object list. Costs one tick, like any other suspension.
    pub fn show(&mut self, frame: Frame) -> &mut Self {
        self.steps.push_back(Step::Show(frame));
        self
    }

    /// Fresh seed for a random coroutine, stable for a given stage seed, scene name, and call
    /// order.
    pub fn next_seed(&mut self) -> u64 {
        self.seeds += 1;
        self.stage.seed_for(self.scene ^ self.seeds)
    }

    /// Rendered width of `text` in pixels, for layouts that depend on text extent.
    pub fn text_width(&mut self, text: &str, family: &str, font_size: f64) -> TickreelResult<f64> {
        let engine = match &mut self.text {
            Some(engine) => engine,
            slot => slot.insert(TextEngine::from_stage(self.stage)?),
        };
        engine.text_width(text, family, font_size)
    }

    fn finish(self) -> Script {
        Script {
            initial: Some(self.objects),
            steps: self.steps,
            current: None,
        }
    }
}

/// Coroutine produced by a [`ScriptBuilder`].
pub struct Script {
    initial: Option<Frame>,
    steps: VecDeque<Step>,
    current: Option<BoxCoroutine>,
}

impl Coroutine for Script {
    fn resume(&mut self, now: FrameIndex) -> TickreelResult<Resume> {
        if let Some(frame) = self.initial.take() {
            return Ok(Resume::Frame(frame));
        }
        loop {
            if let Some(current) = self.current.as_mut() {
                match current.resume(now)? {
                    Resume::Done => self.current = None,
                    other => return Ok(other),
                }
                continue;
            }
            match self.steps.pop_front() {
                None => return Ok(Resume::Done),
                Some(Step::Delegate(co)) => {
                    if co.is_unbounded() {
                        return Err(TickreelError::animation(format!(
                            "cannot wait on unbounded {} coroutine; spawn it instead",
                            co.label()
                        )));
                    }
                    self.current = Some(co);
                }
                Some(Step::Spawn(co)) => return Ok(Resume::Spawn(co)),
                Some(Step::Call(f)) => f(now)?,
                Some(Step::Show(frame)) => return Ok(Resume::Frame(frame)),
            }
        }
    }

    fn label(&self) -> &'static str {
        "script"
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/script.rs"]
mod tests;
