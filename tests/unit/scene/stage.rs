use super::*;

#[test]
fn fractional_positions_follow_canvas() {
    let s = Stage::default();
    assert_eq!(s.center_x(), 640.0);
    assert_eq!(s.center_y(), 360.0);
    assert_eq!(s.quarter_x(), 320.0);
    assert_eq!(s.three_quarters_y(), 540.0);
    assert_eq!(s.third_y(), 240.0);
    assert_eq!(s.two_thirds_y(), 480.0);

    let small = Stage::with_canvas(200, 100);
    assert_eq!(small.center(), Point::new(100.0, 50.0));
    assert_eq!(small.frac_x(0.1), 20.0);
}

#[test]
fn resolve_joins_relative_paths_only() {
    let s = Stage {
        assets_root: PathBuf::from("proj"),
        ..Stage::default()
    };
    assert_eq!(s.resolve("img/a.png"), Path::new("proj").join("img/a.png"));
    let abs = std::env::temp_dir().join("x.png");
    assert_eq!(s.resolve(&abs), abs);
}

#[test]
fn seeds_are_stable_and_distinct_per_stream() {
    let s = Stage {
        seed: 42,
        ..Stage::default()
    };
    assert_eq!(s.seed_for(1), s.seed_for(1));
    assert_ne!(s.seed_for(1), s.seed_for(2));
}

#[test]
fn deserializes_with_defaults() {
    let s: Stage = serde_json::from_str(r#"{ "canvas": { "width": 64, "height": 32 } }"#).unwrap();
    assert_eq!(s.canvas, Canvas { width: 64, height: 32 });
    assert_eq!(s.background, Color::BLACK);
    assert!(s.validate().is_ok());

    let bad = Stage {
        fonts: vec![FontSpec {
            family: " ".into(),
            path: "f.ttf".into(),
        }],
        ..Stage::default()
    };
    assert!(bad.validate().is_err());
}
