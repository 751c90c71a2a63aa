use super::*;

use crate::encode::sink::InMemorySink;
use crate::foundation::core::FrameIndex;
use crate::render::recording::RecordingSurface;
use crate::schedule::renderer::{RenderReport, Renderer, RendererOpts};

fn run_project(project: &Project, stage: Stage) -> TickreelResult<RenderReport> {
    let scenes = project.scenes(&stage)?;
    let mut surface = RecordingSurface::new(stage.canvas);
    let mut sink = InMemorySink::new();
    let mut renderer = Renderer::new(stage, RendererOpts::default())?;
    renderer.run(scenes, &mut surface, &mut sink)
}

#[test]
fn registry_lookup() {
    let names: Vec<&str> = all().iter().map(|p| p.name).collect();
    assert_eq!(names, ["test", "videotest", "shapes"]);
    assert_eq!(find("shapes").unwrap().name, "shapes");

    let err = find("nope").unwrap_err();
    assert!(err.to_string().contains("unknown project 'nope'"));
    assert!(err.to_string().contains("videotest"));
}

#[test]
fn test_project_defaults() {
    let cfg = find("test").unwrap().default_config();
    assert_eq!(cfg.expected_ticks, Some(1440));
    assert!(cfg.shorter);
    assert_eq!(cfg.stage.assets_root, PathBuf::from("projects"));
    assert_eq!(cfg.audio, Some(PathBuf::from("test/audio.ogg")));
    assert_eq!(cfg.stage.fonts[0].family, "Arial");
    cfg.validate().unwrap();
}

#[test]
fn shapes_runs_without_assets() {
    let project = find("shapes").unwrap();
    let report = run_project(project, project.default_config().stage).unwrap();
    assert_eq!(report.stats.scenes, 2);
    assert_eq!(report.previews[0].scene, "orbit");
    assert_eq!(report.previews[1].scene, "grid");
    assert_eq!(
        report.previews[1].first_tick.0,
        report.previews[0].last_tick.0 + 1
    );
    assert_eq!(report.stats.frames_rendered, report.stats.ticks);
}

#[test]
fn test_project_timeline() {
    let dir = tempfile::tempdir().unwrap();
    let img_dir = dir.path().join("test/img");
    std::fs::create_dir_all(&img_dir).unwrap();
    image::RgbaImage::from_pixel(8, 6, image::Rgba([255, 200, 0, 255]))
        .save(img_dir.join("thumbsup.png"))
        .unwrap();

    let mut stage = Stage::default();
    stage.assets_root = dir.path().to_path_buf();
    let report = run_project(find("test").unwrap(), stage).unwrap();

    assert_eq!(report.stats.scenes, 4);
    assert_eq!(report.previews[2].last_tick, FrameIndex(900));
    assert_eq!(report.previews[3].last_tick, FrameIndex(1440));
    assert_eq!(report.stats.ticks, 1441);
}

#[test]
fn missing_image_fails_when_scene_starts() {
    let dir = tempfile::tempdir().unwrap();
    let mut stage = Stage::default();
    stage.assets_root = dir.path().to_path_buf();

    let scenes = find("test").unwrap().scenes(&stage).unwrap();
    assert_eq!(scenes.len(), 4);

    let err = run_project(find("test").unwrap(), stage).unwrap_err();
    assert!(matches!(err, TickreelError::Asset(_)));
}

#[test]
fn missing_video_folder_is_an_asset_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut stage = Stage::default();
    stage.assets_root = dir.path().to_path_buf();
    let err = run_project(find("videotest").unwrap(), stage).unwrap_err();
    assert!(matches!(err, TickreelError::Asset(_)));
}
