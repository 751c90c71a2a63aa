use super::*;
use crate::coroutine::wait_frames;
use crate::foundation::error::TickreelError;
use crate::scene::color::Color;
use crate::scene::object::RenderObject;

fn step(co: &mut Tween, tick: u64) -> Resume {
    co.resume(FrameIndex(tick)).unwrap()
}

#[test]
fn linear_tween_suspends_duration_times_then_snaps() {
    let obj = RenderObject::text("hi", 0.0, 0.0).share();
    let mut co = tween(&obj, 180, [(Prop::Y, 360.0)]);

    for k in 0..180u64 {
        assert!(matches!(step(&mut co, k), Resume::Suspend));
        assert!((obj.borrow().y - k as f64 * 2.0).abs() < 1e-9);
    }
    assert!(step(&mut co, 180).is_done());
    assert_eq!(obj.borrow().y, 360.0);
}

#[test]
fn midpoint_matches_half_way() {
    let obj = RenderObject::text("hi", 0.0, 0.0).share();
    let mut co = tween(&obj, 180, [(Prop::Y, 360.0)]);
    for k in 0..=90u64 {
        step(&mut co, k);
    }
    assert_eq!(obj.borrow().y, 180.0);
}

#[test]
fn zero_duration_snaps_on_first_resume() {
    let obj = RenderObject::rect(Color::WHITE, 1.0, 2.0, 3.0, 4.0).share();
    let mut co = tween(&obj, 0, [(Prop::X, 50.0), (Prop::W, 9.0)]);
    assert!(step(&mut co, 0).is_done());
    let o = obj.borrow();
    assert_eq!(o.x, 50.0);
    assert_eq!(o.size(), Some((9.0, 4.0)));
}

#[test]
fn start_values_are_captured_on_first_resume() {
    let obj = RenderObject::text("hi", 0.0, 100.0).share();
    let mut co = tween(&obj, 2, [(Prop::Y, 200.0)]);
    obj.borrow_mut().y = 0.0;
    step(&mut co, 0);
    step(&mut co, 1);
    // 0 + 0.5 * (200 - 0)
    assert_eq!(obj.borrow().y, 100.0);
}

#[test]
fn eased_progress_uses_curve() {
    let obj = RenderObject::text("hi", 0.0, 0.0).share();
    let mut co = Tween::new(&obj, 4).to(Prop::X, 100.0).ease(Ease::InQuad);
    step(&mut co, 0);
    step(&mut co, 1);
    step(&mut co, 2);
    // InQuad(0.5) = 0.25
    assert_eq!(obj.borrow().x, 25.0);
    step(&mut co, 3);
    assert!(step(&mut co, 4).is_done());
    assert_eq!(obj.borrow().x, 100.0);
}

#[test]
fn continuation_runs_after_snap() {
    let obj = RenderObject::text("hi", 0.0, 0.0).share();
    let mut co = tween(&obj, 2, [(Prop::Opacity, 0.0)]).then(wait_frames(2));
    assert!(matches!(step(&mut co, 0), Resume::Suspend));
    assert!(matches!(step(&mut co, 1), Resume::Suspend));
    assert!(matches!(step(&mut co, 2), Resume::Suspend));
    assert_eq!(obj.borrow().opacity, 0.0);
    assert!(matches!(step(&mut co, 3), Resume::Suspend));
    assert!(step(&mut co, 4).is_done());
}

#[test]
fn several_properties_move_together() {
    let obj = RenderObject::rect(Color::WHITE, 0.0, 0.0, 10.0, 10.0).share();
    let mut co = tween(&obj, 2, [(Prop::X, 10.0), (Prop::Rotation, 1.0)]);
    step(&mut co, 0);
    step(&mut co, 1);
    let o = obj.borrow();
    assert_eq!(o.x, 5.0);
    assert_eq!(o.rotation, 0.5);
}

#[test]
fn unknown_property_fails_on_first_resume() {
    let obj = RenderObject::text("hi", 0.0, 0.0).share();
    let mut co = tween(&obj, 10, [(Prop::W, 10.0)]);
    let err = co.resume(FrameIndex(0)).unwrap_err();
    assert!(matches!(err, TickreelError::Animation(_)));
    assert!(err.to_string().contains("text object has no property \"w\""));
}

#[test]
fn non_finite_target_is_rejected() {
    let obj = RenderObject::text("hi", 0.0, 0.0).share();
    let mut co = tween(&obj, 10, [(Prop::X, f64::INFINITY)]);
    assert!(matches!(
        co.resume(FrameIndex(0)),
        Err(TickreelError::Animation(_))
    ));
}
