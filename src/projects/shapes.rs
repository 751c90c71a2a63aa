//! Box-only scenes: an orbiting satellite pinned to a spinning base, a jittering marker and a
//! staggered grid. Needs no image, video or font files.

use std::f64::consts::TAU;

use crate::animation::ease::Ease;
use crate::config::ProjectConfig;
use crate::coroutine::{RandomRange, pin_to, random_move, tween, wait_frames};
use crate::foundation::error::TickreelResult;
use crate::scene::color::Color;
use crate::scene::object::{Prop, RenderObject};
use crate::scene::script::Scene;
use crate::scene::stage::Stage;

const GRID: usize = 6;

pub(crate) fn configure(cfg: &mut ProjectConfig) {
    cfg.expected_ticks = Some(330);
    cfg.stage.background = Color::rgb(18, 20, 28);
}

pub(crate) fn scenes(_stage: &Stage) -> TickreelResult<Vec<Scene>> {
    Ok(vec![
        Scene::new("orbit", |s| {
            let stage = s.stage();
            let (cx, cy) = (stage.center_x(), stage.center_y());
            let base = s.add(RenderObject::rounded_rect(
                Color::rgb(66, 135, 245),
                cx - 60.0,
                cy - 60.0,
                120.0,
                120.0,
                16.0,
            ));
            let satellite = s.add(RenderObject::rect(
                Color::rgb(245, 197, 66),
                cx + 140.0,
                cy - 20.0,
                40.0,
                40.0,
            ));
            let marker = s.add(RenderObject::rounded_rect(
                Color::rgb(235, 87, 87),
                stage.quarter_x() - 15.0,
                stage.quarter_y() - 15.0,
                30.0,
                30.0,
                15.0,
            ));
            let seed = s.next_seed();

            s.spawn(pin_to(&satellite, &base, None))
                .spawn(
                    random_move(
                        &marker,
                        150,
                        [
                            (Prop::X, RandomRange::around(stage.quarter_x() - 15.0, 12.0)),
                            (Prop::Y, RandomRange::around(stage.quarter_y() - 15.0, 12.0)),
                        ],
                        6,
                    )
                    .seed(seed),
                )
                .then(tween(&base, 120, [(Prop::Rotation, TAU)]).ease(Ease::InOutCubic))
                .then(
                    tween(&base, 60, [(Prop::W, 180.0), (Prop::H, 80.0)]).ease(Ease::OutBack),
                )
                .then(wait_frames(20));
            Ok(())
        }),
        Scene::new("grid", |s| {
            let stage = s.stage();
            let cell = stage.height() / (GRID as f64 + 2.0);
            let left = stage.center_x() - cell * GRID as f64 / 2.0;
            for row in 0..GRID {
                for col in 0..GRID {
                    let tile = s.add(
                        RenderObject::rounded_rect(
                            Color::rgb(120 + 20 * row as u8, 200 - 20 * col as u8, 220),
                            left + col as f64 * cell + 4.0,
                            cell + row as f64 * cell + 4.0,
                            cell - 8.0,
                            cell - 8.0,
                            6.0,
                        )
                        .with_opacity(0.0),
                    );
                    let delay = 4 * (row + col) as u64;
                    s.spawn(
                        wait_frames(delay)
                            .then(tween(&tile, 30, [(Prop::Opacity, 1.0)]).ease(Ease::OutCubic)),
                    );
                }
            }
            s.then(wait_frames(90));
            Ok(())
        }),
    ])
}
