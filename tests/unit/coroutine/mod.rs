use super::*;
use crate::scene::object::RenderObject;

fn drive(co: &mut dyn Coroutine, from: u64) -> (u64, Vec<&'static str>) {
    let mut trace = Vec::new();
    let mut tick = from;
    loop {
        let r = co.resume(FrameIndex(tick)).unwrap();
        let tag = match r {
            Resume::Suspend => "suspend",
            Resume::Frame(_) => "frame",
            Resume::Spawn(_) => "spawn",
            Resume::Done => "done",
        };
        trace.push(tag);
        if tag == "done" {
            return (tick, trace);
        }
        tick += 1;
        assert!(tick < from + 10_000, "coroutine never finished");
    }
}

#[test]
fn from_fn_stops_calling_closure_after_done() {
    let mut calls = 0;
    let mut co = from_fn(move |now| {
        calls += 1;
        assert!(calls <= 3, "closure resumed after completion");
        Ok(if now.0 < 2 {
            Resume::Suspend
        } else {
            Resume::Done
        })
    });
    let (end, trace) = drive(&mut co, 0);
    assert_eq!(end, 2);
    assert_eq!(trace, vec!["suspend", "suspend", "done"]);
    assert!(co.resume(FrameIndex(3)).unwrap().is_done());
}

#[test]
fn continuation_without_next_is_done_immediately() {
    let mut c = Continuation::default();
    assert!(!c.is_unbounded());
    assert!(c.resume(FrameIndex(0)).unwrap().is_done());
    assert!(c.resume(FrameIndex(1)).unwrap().is_done());
}

#[test]
fn continuation_forwards_until_next_finishes() {
    let mut c = Continuation::default();
    c.set(Box::new(wait_frames(2)));
    assert!(matches!(c.resume(FrameIndex(0)).unwrap(), Resume::Suspend));
    assert!(matches!(c.resume(FrameIndex(1)).unwrap(), Resume::Suspend));
    assert!(c.resume(FrameIndex(2)).unwrap().is_done());
    assert!(c.resume(FrameIndex(3)).unwrap().is_done());
}

#[test]
fn unboundedness_propagates_through_continuations() {
    let a = RenderObject::rect(crate::scene::color::Color::WHITE, 0.0, 0.0, 10.0, 10.0).share();
    let b = RenderObject::rect(crate::scene::color::Color::WHITE, 5.0, 5.0, 10.0, 10.0).share();
    assert!(!wait_frames(3).is_unbounded());
    assert!(pin_to(&a, &b, None).is_unbounded());
    assert!(!pin_to(&a, &b, Some(4)).is_unbounded());
    assert!(wait_frames(3).then(pin_to(&a, &b, None)).is_unbounded());
    let boxed: BoxCoroutine = Box::new(wait_until_time(1.0).then(pin_to(&a, &b, None)));
    assert!(boxed.is_unbounded());
    assert_eq!(boxed.label(), "wait_until_time");
}

#[test]
fn resume_debug_is_readable() {
    assert_eq!(format!("{:?}", Resume::Suspend), "Suspend");
    assert_eq!(format!("{:?}", Resume::Frame(Vec::new())), "Frame(0 objects)");
    assert_eq!(
        format!("{:?}", Resume::Spawn(Box::new(wait_frames(1)))),
        "Spawn(wait_frames)"
    );
    assert_eq!(format!("{:?}", Resume::Done), "Done");
}
