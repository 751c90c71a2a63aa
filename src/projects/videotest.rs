//! One scene moving, spinning and fading a video-frame object while it plays.

use std::f64::consts::TAU;
use std::path::PathBuf;

use crate::animation::ease::Ease;
use crate::config::ProjectConfig;
use crate::coroutine::{tween, wait_frames};
use crate::foundation::error::TickreelResult;
use crate::scene::object::{Prop, RenderObject};
use crate::scene::script::Scene;
use crate::scene::stage::Stage;

pub(crate) fn configure(cfg: &mut ProjectConfig) {
    cfg.expected_ticks = Some(900);
    cfg.audio = Some(PathBuf::from("test/audio.ogg"));
    cfg.shorter = true;
}

pub(crate) fn scenes(_stage: &Stage) -> TickreelResult<Vec<Scene>> {
    Ok(vec![Scene::new("scene1", |s| {
        let stage = s.stage();
        let video = s.add(RenderObject::video(
            stage,
            "videotest/assets/video1",
            stage.quarter_x(),
            -stage.height() / 2.0,
            stage.width() / 2.0,
            stage.height() / 2.0,
        )?);
        s.then(tween(&video, 180, [(Prop::Y, stage.quarter_y())]).ease(Ease::OutQuad))
            .then(wait_frames(60))
            .spawn(tween(&video, 420, [(Prop::CurrentTime, 420.0)]))
            .then(tween(&video, 180, [(Prop::Rotation, TAU)]).ease(Ease::InOutQuad))
            .then(wait_frames(60))
            .then(tween(&video, 180, [(Prop::Opacity, 0.5)]).ease(Ease::InOutQuad))
            .then(wait_frames(60))
            .then(tween(&video, 180, [(Prop::Y, stage.height() * 5.0 / 4.0)]).ease(Ease::InQuad));
        Ok(())
    })])
}
