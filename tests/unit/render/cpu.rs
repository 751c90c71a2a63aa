use super::*;

fn surface() -> CpuSurface {
    CpuSurface::new(Canvas {
        width: 32,
        height: 16,
    })
    .unwrap()
}

fn solid(w: u32, h: u32, px: [u8; 4]) -> PreparedImage {
    PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(px.repeat((w * h) as usize)),
    }
}

fn placement(x: f64, y: f64, w: f64, h: f64) -> Placement {
    Placement {
        x,
        y,
        w,
        h,
        rotation: 0.0,
    }
}

#[test]
fn clear_fills_background() {
    let mut s = surface();
    s.clear(Color::rgb(10, 20, 30)).unwrap();
    let frame = s.snapshot().unwrap();
    assert_eq!((frame.width, frame.height), (32, 16));
    assert_eq!(frame.data.len(), 32 * 16 * 4);
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(0, 0), Some([10, 20, 30, 255]));
    assert_eq!(frame.pixel(31, 15), Some([10, 20, 30, 255]));
}

#[test]
fn rect_covers_its_interior_only() {
    let mut s = surface();
    s.clear(Color::BLACK).unwrap();
    s.draw_rounded_rect(placement(4.0, 4.0, 8.0, 8.0), 0.0, Color::WHITE)
        .unwrap();
    let frame = s.snapshot().unwrap();
    assert_eq!(frame.pixel(8, 8), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(20, 8), Some([0, 0, 0, 255]));
}

#[test]
fn global_alpha_blends_over_background() {
    let mut s = surface();
    s.clear(Color::BLACK).unwrap();
    s.set_global_alpha(0.5);
    s.draw_rounded_rect(placement(0.0, 0.0, 32.0, 16.0), 0.0, Color::WHITE)
        .unwrap();
    let px = s.snapshot().unwrap().pixel(16, 8).unwrap();
    assert!((120..=136).contains(&px[0]), "{px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn clear_resets_previous_frame() {
    let mut s = surface();
    s.clear(Color::BLACK).unwrap();
    s.draw_rounded_rect(placement(0.0, 0.0, 32.0, 16.0), 0.0, Color::WHITE)
        .unwrap();
    s.snapshot().unwrap();
    s.clear(Color::BLACK).unwrap();
    assert_eq!(s.snapshot().unwrap().pixel(16, 8), Some([0, 0, 0, 255]));
}

#[test]
fn image_is_stretched_onto_placement() {
    let mut s = surface();
    s.clear(Color::BLACK).unwrap();
    let img = solid(2, 2, [255, 0, 0, 255]);
    s.draw_image(&img, placement(16.0, 0.0, 16.0, 16.0)).unwrap();
    let frame = s.snapshot().unwrap();
    assert_eq!(frame.pixel(24, 8), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(4, 8), Some([0, 0, 0, 255]));
}

#[test]
fn text_without_registered_font_is_an_error() {
    let mut s = surface();
    s.clear(Color::BLACK).unwrap();
    let err = s
        .draw_text(&TextDraw {
            content: "hi",
            font_family: "Arial",
            font_size: 12.0,
            color: Color::WHITE,
            x: 16.0,
            y: 8.0,
            rotation: 0.0,
        })
        .unwrap_err();
    assert!(matches!(err, TickreelError::Asset(_)));
}

#[test]
fn oversized_canvas_is_rejected() {
    assert!(
        CpuSurface::new(Canvas {
            width: 70_000,
            height: 10,
        })
        .is_err()
    );
}

#[test]
fn premul_bytes_length_is_checked() {
    assert!(pixmap_from_premul_bytes(&[0u8; 7], 1, 2).is_err());
    assert!(pixmap_from_premul_bytes(&[0u8; 8], 1, 2).is_ok());
}
