use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::coroutine::{from_fn, tween, wait_frames, wait_until_time};
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Canvas;
use crate::render::recording::{DrawCall, RecordingSurface};
use crate::scene::color::Color;
use crate::scene::object::{Prop, RenderObject};

fn stage() -> Stage {
    Stage::with_canvas(64, 36)
}

fn surface() -> RecordingSurface {
    RecordingSurface::new(Canvas {
        width: 64,
        height: 36,
    })
}

fn run(scenes: Vec<Scene>, opts: RendererOpts) -> (RenderReport, RecordingSurface, InMemorySink) {
    let mut renderer = Renderer::new(stage(), opts).unwrap();
    let mut surface = surface();
    let mut sink = InMemorySink::new();
    let report = renderer.run(scenes, &mut surface, &mut sink).unwrap();
    (report, surface, sink)
}

fn text_y(calls: &[DrawCall]) -> f64 {
    calls
        .iter()
        .find_map(|c| match c {
            DrawCall::Text { y, .. } => Some(*y),
            _ => None,
        })
        .unwrap()
}

#[test]
fn text_tween_end_to_end() {
    let scene = Scene::new("title", |s| {
        let t = s.add(RenderObject::text("hello", 32.0, 0.0));
        s.then(tween(&t, 180, [(Prop::Y, 360.0)]));
        Ok(())
    });
    let (report, surface, sink) = run(vec![scene], RendererOpts::default());
    assert_eq!(report.stats.ticks, 181);
    assert_eq!(report.stats.frames_rendered, 181);
    assert_eq!(sink.frames().len(), 181);
    assert!(sink.ended());
    assert_eq!(text_y(&surface.frames()[0]), 0.0);
    assert_eq!(text_y(&surface.frames()[90]), 180.0);
    assert_eq!(text_y(&surface.frames()[180]), 360.0);
}

#[test]
fn spawn_does_not_block_but_delegate_does() {
    let spawned = Scene::new("spawned", |s| {
        let t = s.add(RenderObject::text("a", 0.0, 0.0));
        s.spawn(tween(&t, 10, [(Prop::X, 10.0)]));
        s.then(wait_frames(2));
        Ok(())
    });
    let (report, _, _) = run(vec![spawned], RendererOpts::default());
    assert_eq!(report.stats.ticks, 3);

    let delegated = Scene::new("delegated", |s| {
        let t = s.add(RenderObject::text("a", 0.0, 0.0));
        s.then(tween(&t, 10, [(Prop::X, 10.0)]));
        s.then(wait_frames(2));
        Ok(())
    });
    let (report, _, _) = run(vec![delegated], RendererOpts::default());
    assert_eq!(report.stats.ticks, 13);
}

#[test]
fn unfinished_spawns_are_dropped_at_scene_end() {
    let obj = RenderObject::text("a", 0.0, 0.0).share();
    let handle = obj.clone();
    let first = Scene::new("first", move |s| {
        s.add_ref(&handle);
        s.spawn(tween(&handle, 100, [(Prop::X, 100.0)]));
        s.then(wait_frames(5));
        Ok(())
    });
    let second = Scene::new("second", |s| {
        s.then(wait_frames(5));
        Ok(())
    });
    run(vec![first, second], RendererOpts::default());
    // Stepped on ticks 0..=5 only: k = 0..=5 written.
    assert_eq!(obj.borrow().x, 5.0);
}

fn windowed_run(window: RenderWindow) -> (Vec<(u64, f64)>, RecordingSurface, RenderReport) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    let scene = Scene::new("window", |s| {
        let a = s.add(RenderObject::rect(Color::WHITE, 0.0, 0.0, 8.0, 8.0));
        let b = s.add(RenderObject::text("b", 0.0, 0.0));
        s.spawn(tween(&b, 25, [(Prop::Y, 50.0)]));
        s.then(tween(&a, 30, [(Prop::X, 30.0)]));
        Ok(())
    });
    let mut renderer = Renderer::new(
        stage(),
        RendererOpts {
            window,
            ..RendererOpts::default()
        },
    )
    .unwrap()
    .with_observer(move |tick, frame| {
        log.borrow_mut().push((tick.0, frame[0].borrow().x + frame[1].borrow().y));
    });
    let mut surface = surface();
    let mut sink = InMemorySink::new();
    let report = renderer.run(vec![scene], &mut surface, &mut sink).unwrap();
    let values = seen.borrow().clone();
    (values, surface, report)
}

#[test]
fn skipped_frames_advance_state_identically() {
    let (full_values, full_surface, full_report) = windowed_run(RenderWindow::full());
    let window = RenderWindow::new(FrameIndex(10), Some(FrameIndex(20))).unwrap();
    let (win_values, win_surface, win_report) = windowed_run(window);

    assert_eq!(full_values, win_values);
    assert_eq!(full_report.stats.ticks, win_report.stats.ticks);
    assert_eq!(win_report.stats.frames_rendered, 11);
    assert_eq!(win_report.stats.frames_skipped, win_report.stats.ticks - 11);
    assert_eq!(win_surface.frames(), &full_surface.frames()[10..=20]);
}

#[test]
fn scene_runs_before_spawned_coroutines_each_tick() {
    let obj = RenderObject::text("a", 0.0, 0.0).share();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let (handle, log) = (obj.clone(), seen.clone());
    let scene = Scene::new("order", move |s| {
        s.add_ref(&handle);
        let watched = handle.clone();
        s.spawn(from_fn(move |now| {
            log.borrow_mut().push((now.0, watched.borrow().x));
            Ok(Resume::Suspend)
        }));
        s.then(tween(&handle, 3, [(Prop::X, 3.0)]));
        Ok(())
    });
    run(vec![scene], RendererOpts::default());
    // Every observation already includes the scene's write for that tick.
    assert_eq!(*seen.borrow(), vec![(0, 0.0), (1, 1.0), (2, 2.0), (3, 3.0)]);
}

#[test]
fn nested_spawns_run_in_the_same_tick() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    let scene = Scene::new("nested", move |s| {
        let outer_log = log.clone();
        let mut spawned = false;
        s.spawn(from_fn(move |now| {
            outer_log.borrow_mut().push(("outer", now.0));
            if !spawned {
                spawned = true;
                let inner_log = outer_log.clone();
                return Ok(Resume::Spawn(Box::new(from_fn(move |now| {
                    inner_log.borrow_mut().push(("inner", now.0));
                    Ok(Resume::Done)
                }))));
            }
            Ok(Resume::Done)
        }));
        s.then(wait_frames(1));
        Ok(())
    });
    run(vec![scene], RendererOpts::default());
    assert_eq!(
        *seen.borrow(),
        vec![("outer", 0), ("outer", 0), ("inner", 0)]
    );
}

#[test]
fn clock_is_global_across_scenes() {
    let first = Scene::new("first", |s| {
        s.then(wait_frames(30));
        Ok(())
    });
    let second = Scene::new("second", |s| {
        s.then(wait_until_time(1.0));
        Ok(())
    });
    let (report, _, _) = run(vec![first, second], RendererOpts::default());
    assert_eq!(report.previews[0].first_tick, FrameIndex(0));
    assert_eq!(report.previews[0].last_tick, FrameIndex(30));
    assert_eq!(report.previews[1].first_tick, FrameIndex(31));
    assert_eq!(report.previews[1].last_tick, FrameIndex(60));
    assert_eq!(report.stats.ticks, 61);
    assert_eq!(report.stats.scenes, 2);
}

#[test]
fn shown_frame_replaces_object_list() {
    let scene = Scene::new("swap", |s| {
        s.add(RenderObject::text("old", 0.0, 0.0));
        let replacement = RenderObject::text("new", 0.0, 0.0).share();
        s.show(vec![replacement]);
        Ok(())
    });
    let (_, surface, _) = run(vec![scene], RendererOpts::default());
    let content = |calls: &[DrawCall]| match &calls[1] {
        DrawCall::Text { content, .. } => content.clone(),
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(content(&surface.frames()[0]), "new");
}

#[test]
fn previews_keep_last_rendered_image() {
    let scene = Scene::new("p", |s| {
        s.then(wait_frames(3));
        Ok(())
    });
    let (report, _, _) = run(
        vec![scene],
        RendererOpts {
            keep_previews: true,
            ..RendererOpts::default()
        },
    );
    let frame = report.previews[0].frame.as_ref().unwrap();
    assert_eq!((frame.width, frame.height), (64, 36));
}

#[test]
fn scene_must_yield_objects_first() {
    let scene = Scene::custom("bad", from_fn(|_| Ok(Resume::Suspend)));
    let mut renderer = Renderer::new(stage(), RendererOpts::default()).unwrap();
    let err = renderer
        .run(vec![scene], &mut surface(), &mut InMemorySink::new())
        .unwrap_err();
    assert!(matches!(err, TickreelError::Animation(_)));
}

#[test]
fn surface_size_must_match_stage() {
    let mut renderer = Renderer::new(stage(), RendererOpts::default()).unwrap();
    let mut wrong = RecordingSurface::new(Canvas {
        width: 10,
        height: 10,
    });
    assert!(
        renderer
            .run(Vec::new(), &mut wrong, &mut InMemorySink::new())
            .is_err()
    );
}

#[test]
fn animation_errors_abort_the_run() {
    let scene = Scene::new("broken", |s| {
        let t = s.add(RenderObject::text("t", 0.0, 0.0));
        s.then(wait_frames(2));
        s.then(tween(&t, 5, [(Prop::CornerRadius, 1.0)]));
        Ok(())
    });
    let mut renderer = Renderer::new(stage(), RendererOpts::default()).unwrap();
    let mut sink = InMemorySink::new();
    let err = renderer
        .run(vec![scene], &mut surface(), &mut sink)
        .unwrap_err();
    assert!(err.to_string().contains("no property"));
    assert_eq!(sink.frames().len(), 2);
}

#[test]
fn progress_bar_fills_proportionally() {
    assert_eq!(progress_bar(0, 10, 4), "░░░░");
    assert_eq!(progress_bar(5, 10, 4), "██░░");
    assert_eq!(progress_bar(10, 10, 4), "████");
    assert_eq!(progress_bar(3, 0, 2), "░░");
    assert_eq!(progress_bar(1, 100, 50).chars().filter(|c| *c == '█').count(), 1);
}
