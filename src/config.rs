use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::encode::ffmpeg::{AssemblyOpts, OutputKind};
use crate::encode::sink::FrameFormat;
use crate::foundation::core::{Fps, RenderWindow};
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::scene::stage::Stage;

/// Project configuration loaded from JSON.
///
/// Stage fields (`canvas`, `assets_root`, `background`, `seed`, `fonts`) sit at the top level
/// next to the run and output settings. Every field is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Canvas, assets and fonts.
    #[serde(flatten)]
    pub stage: Stage,
    /// Expected total ticks; only used to draw the progress bar.
    pub expected_ticks: Option<u64>,
    /// `[start, end]` ticks to rasterize; `end == -1` renders to the end.
    pub window: (u64, i64),
    /// Directory receiving the frame sequence.
    pub out_dir: PathBuf,
    /// Frame file format.
    pub frame_format: FrameFormat,
    /// Artifact assembled from the frames.
    pub output: OutputKind,
    /// Artifact path; defaults to `out.mp4`/`out.gif` in the working directory.
    pub output_path: Option<PathBuf>,
    /// Soundtrack muxed into mp4 output, resolved against the assets root.
    pub audio: Option<PathBuf>,
    /// Cut the video at the end of the audio track.
    pub shorter: bool,
    /// Keep frame files after a successful assembly.
    pub keep_frames: bool,
    /// Directory receiving one `scene{n}.png` preview per scene.
    pub preview_dir: Option<PathBuf>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            stage: Stage::default(),
            expected_ticks: None,
            window: (0, -1),
            out_dir: PathBuf::from("out"),
            frame_format: FrameFormat::default(),
            output: OutputKind::default(),
            output_path: None,
            audio: None,
            shorter: false,
            keep_frames: false,
            preview_dir: None,
        }
    }
}

impl ProjectConfig {
    /// Read and validate a config file.
    pub fn from_path(path: &Path) -> TickreelResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| TickreelError::serde(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json_str(s: &str) -> TickreelResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| TickreelError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the stage, window and encoder settings.
    pub fn validate(&self) -> TickreelResult<()> {
        self.stage.validate()?;
        self.frame_format.validate()?;
        self.window()?;
        if self.output == OutputKind::Mp4
            && (self.stage.canvas.width % 2 != 0 || self.stage.canvas.height % 2 != 0)
        {
            return Err(TickreelError::validation(format!(
                "mp4 output requires even canvas dimensions, got {}x{}",
                self.stage.canvas.width, self.stage.canvas.height
            )));
        }
        if self.expected_ticks == Some(0) {
            return Err(TickreelError::validation("expected_ticks must be > 0"));
        }
        Ok(())
    }

    /// Rasterized tick window.
    pub fn window(&self) -> TickreelResult<RenderWindow> {
        RenderWindow::from_signed(self.window.0, self.window.1)
    }

    /// Artifact path, if the output kind produces one.
    pub fn output_file(&self) -> Option<PathBuf> {
        let default = self.output.default_file_name()?;
        Some(
            self.output_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(default)),
        )
    }

    /// Assembler options for a frame sequence starting at the window start.
    ///
    /// Returns `None` when the output kind is `none`.
    pub fn assembly_opts(&self) -> TickreelResult<Option<AssemblyOpts>> {
        let Some(out_path) = self.output_file() else {
            return Ok(None);
        };
        Ok(Some(AssemblyOpts {
            frames_dir: self.out_dir.clone(),
            frame_format: self.frame_format,
            start: self.window()?.start,
            fps: Fps::CLOCK,
            kind: self.output,
            out_path,
            audio: self.audio.as_ref().map(|a| self.stage.resolve(a)),
            shorter: self.shorter,
            overwrite: true,
        }))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
