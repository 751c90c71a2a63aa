use std::io::Cursor;

use super::*;

fn write_png(path: &Path, px: [u8; 4]) {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, buf).unwrap();
}

#[test]
fn index_follows_floor_plus_one() {
    assert_eq!(sequence_index(0.0, 60.0).unwrap(), 1);
    assert_eq!(sequence_index(59.0, 60.0).unwrap(), 60);
    assert_eq!(sequence_index(60.0, 60.0).unwrap(), 61);
    assert_eq!(sequence_index(60.0, 30.0).unwrap(), 31);
    assert_eq!(sequence_index(1.5, 30.0).unwrap(), 1);
    assert!(sequence_index(-1.0, 60.0).is_err());
    assert!(sequence_index(f64::NAN, 60.0).is_err());
}

#[test]
fn frame_paths_are_zero_padded() {
    let p = sequence_frame_path(Path::new("clips/a"), 7, "jpeg");
    assert_eq!(p, Path::new("clips/a").join("frame00007.jpeg"));
}

#[test]
fn loads_frames_and_caches_them() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("frame00001.png"), [255, 0, 0, 255]);
    write_png(&dir.path().join("frame00002.png"), [0, 255, 0, 255]);

    let mut seq = FrameSequence::new(dir.path(), "png");
    let first = seq.frame(1).unwrap();
    assert_eq!(&first.rgba8_premul[0..4], &[255, 0, 0, 255]);
    let again = seq.frame(1).unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    seq.frame(2).unwrap();
    assert_eq!(seq.cached_len(), 2);

    assert!(seq.frame(0).is_err());
    let missing = seq.frame(3).unwrap_err();
    assert!(matches!(missing, TickreelError::Asset(_)));
}

#[test]
fn library_maps_time_to_frames() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("frame00001.png"), [1, 1, 1, 255]);
    write_png(&dir.path().join("frame00002.png"), [2, 2, 2, 255]);

    let mut lib = SequenceLibrary::new();
    let a = lib.frame_at(dir.path(), "png", 0.5, 60.0).unwrap();
    assert_eq!(a.rgba8_premul[0], 1);
    let b = lib.frame_at(dir.path(), "png", 1.0, 60.0).unwrap();
    assert_eq!(b.rgba8_premul[0], 2);
}
