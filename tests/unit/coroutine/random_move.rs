use super::*;
use crate::scene::color::Color;
use crate::scene::object::RenderObject;

fn target() -> ObjectRef {
    RenderObject::rect(Color::WHITE, 50.0, 50.0, 10.0, 10.0).share()
}

fn record(seed: u64) -> Vec<f64> {
    let obj = target();
    let mut co = random_move(&obj, 12, [(Prop::X, RandomRange::around(50.0, 5.0))], 3).seed(seed);
    (0..12)
        .map(|tick| {
            co.resume(FrameIndex(tick)).unwrap();
            obj.borrow().x
        })
        .collect()
}

#[test]
fn values_stay_in_range_and_change_on_refresh_ticks_only() {
    let xs = record(7);
    for x in &xs {
        assert!((45.0..55.0).contains(x), "{x} out of range");
    }
    for k in 1..xs.len() {
        if k % 3 != 0 {
            assert_eq!(xs[k], xs[k - 1], "value changed off-cycle at {k}");
        }
    }
}

#[test]
fn same_seed_replays_identically() {
    assert_eq!(record(42), record(42));
    assert_ne!(record(42), record(43));
}

#[test]
fn settles_to_rest_then_completes() {
    let obj = target();
    let mut co = random_move(&obj, 4, Vec::new(), 2)
        .range(Prop::X, RandomRange::new(10.0, 0.0, 100.0))
        .range(Prop::Rotation, RandomRange::new(0.0, -0.1, 0.1));
    for tick in 0..4 {
        assert!(matches!(co.resume(FrameIndex(tick)).unwrap(), Resume::Suspend));
    }
    assert!(co.resume(FrameIndex(4)).unwrap().is_done());
    let o = obj.borrow();
    assert_eq!(o.x, 10.0);
    assert_eq!(o.rotation, 0.0);
}

#[test]
fn degenerate_range_is_constant() {
    let obj = target();
    let mut co = random_move(&obj, 2, [(Prop::Y, RandomRange::new(0.0, 3.0, 3.0))], 1);
    co.resume(FrameIndex(0)).unwrap();
    assert_eq!(obj.borrow().y, 3.0);
}

#[test]
fn zero_refresh_is_an_error() {
    let obj = target();
    let mut co = random_move(&obj, 2, [(Prop::X, RandomRange::around(0.0, 1.0))], 0);
    assert!(matches!(
        co.resume(FrameIndex(0)),
        Err(TickreelError::Animation(_))
    ));
}

#[test]
fn inverted_range_is_an_error() {
    let obj = target();
    let mut co = random_move(&obj, 2, [(Prop::X, RandomRange::new(0.0, 5.0, 1.0))], 1);
    assert!(co.resume(FrameIndex(0)).is_err());
}

#[test]
fn missing_property_is_an_error() {
    let obj = RenderObject::text("t", 0.0, 0.0).share();
    let mut co = random_move(&obj, 2, [(Prop::CornerRadius, RandomRange::around(0.0, 1.0))], 1);
    assert!(co.resume(FrameIndex(0)).is_err());
}
