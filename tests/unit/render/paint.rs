use super::*;
use crate::foundation::core::Canvas;
use crate::render::recording::{DrawCall, RecordingSurface};
use crate::scene::color::Color;

fn stage() -> Stage {
    Stage::with_canvas(100, 50)
}

fn paint(frame: &Frame) -> Vec<DrawCall> {
    let stage = stage();
    let mut surface = RecordingSurface::new(Canvas {
        width: 100,
        height: 50,
    });
    Painter::new().paint(&mut surface, &stage, frame).unwrap();
    surface.snapshot().unwrap();
    surface.frames()[0].clone()
}

#[test]
fn clears_then_draws_in_list_order() {
    let frame = vec![
        RenderObject::rect(Color::WHITE, 0.0, 0.0, 10.0, 10.0).share(),
        RenderObject::text("top", 50.0, 25.0).share(),
    ];
    let calls = paint(&frame);
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], DrawCall::Clear(Color::BLACK));
    assert!(matches!(calls[1], DrawCall::Rect { .. }));
    assert!(matches!(&calls[2], DrawCall::Text { content, .. } if content == "top"));
}

#[test]
fn nearly_transparent_objects_are_skipped() {
    let frame = vec![
        RenderObject::rect(Color::WHITE, 0.0, 0.0, 10.0, 10.0)
            .with_opacity(0.005)
            .share(),
        RenderObject::text("ghost", 0.0, 0.0).with_opacity(0.0).share(),
    ];
    assert_eq!(paint(&frame).len(), 1);
}

#[test]
fn off_stage_boxes_are_culled() {
    let frame = vec![
        RenderObject::rect(Color::WHITE, 101.0, 0.0, 10.0, 10.0).share(),
        RenderObject::rect(Color::WHITE, -20.0, 0.0, 10.0, 10.0).share(),
        RenderObject::rect(Color::WHITE, 0.0, 60.0, 10.0, 10.0).share(),
        // Mirrored box reaching back onto the stage.
        RenderObject::rect(Color::WHITE, 5.0, 0.0, -10.0, 10.0).share(),
    ];
    let calls = paint(&frame);
    assert_eq!(calls.len(), 2);
}

#[test]
fn opacity_and_rotation_are_forwarded() {
    let frame = vec![
        RenderObject::rounded_rect(Color::WHITE, 10.0, 10.0, 20.0, 8.0, 50.0)
            .with_opacity(0.25)
            .with_rotation(1.0)
            .share(),
    ];
    match &paint(&frame)[1] {
        DrawCall::Rect {
            placement,
            radius,
            alpha,
            ..
        } => {
            assert_eq!(*radius, 4.0);
            assert_eq!(*alpha, 0.25);
            assert_eq!(placement.rotation, 1.0);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn radius_clamps_to_half_extent() {
    assert_eq!(clamp_radius(10.0, 100.0, 100.0), 10.0);
    assert_eq!(clamp_radius(80.0, 100.0, 40.0), 20.0);
    assert_eq!(clamp_radius(80.0, -30.0, 100.0), 15.0);
    assert_eq!(clamp_radius(-3.0, 10.0, 10.0), 0.0);
}

#[test]
fn painting_leaves_objects_untouched() {
    let obj = RenderObject::rect(Color::WHITE, 1.0, 2.0, 3.0, 4.0)
        .with_rotation(0.5)
        .share();
    let before = format!("{:?}", obj.borrow());
    paint(&vec![obj.clone()]);
    assert_eq!(format!("{:?}", obj.borrow()), before);
}
