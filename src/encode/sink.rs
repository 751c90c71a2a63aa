use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context as _;
use image::ImageEncoder as _;

use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::foundation::math::flatten_premul_over_bg;
use crate::render::surface::FrameRGBA;
use crate::scene::color::Color;

/// Configuration provided to a [`FrameSink`] at the start of a run.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output size in pixels.
    pub canvas: Canvas,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Background used to flatten alpha for formats without transparency.
    pub background: Color,
}

/// Sink contract for consuming rendered frames in clock order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order. Ticks
/// outside the render window are never pushed, so indices may start above zero.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> TickreelResult<()>;
    /// Push one frame in strictly increasing clock order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TickreelResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> TickreelResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Return `true` once `end` has been called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> TickreelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TickreelResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> TickreelResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Image file format for persisted frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameFormat {
    /// Lossy JPEG with quality in `1..=100`.
    Jpeg {
        /// Encoder quality.
        #[serde(default = "default_jpeg_quality")]
        quality: u8,
    },
    /// Lossless PNG.
    Png,
}

fn default_jpeg_quality() -> u8 {
    70
}

impl Default for FrameFormat {
    fn default() -> Self {
        Self::Jpeg {
            quality: default_jpeg_quality(),
        }
    }
}

impl FrameFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg { .. } => "jpeg",
            Self::Png => "png",
        }
    }

    /// Validate encoder parameters.
    pub fn validate(self) -> TickreelResult<()> {
        match self {
            Self::Jpeg { quality } if !(1..=100).contains(&quality) => Err(
                TickreelError::validation(format!("jpeg quality must be in 1..=100, got {quality}")),
            ),
            _ => Ok(()),
        }
    }
}

impl FromStr for FrameFormat {
    type Err = TickreelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::default()),
            "png" => Ok(Self::Png),
            other => Err(TickreelError::validation(format!(
                "unknown frame format '{other}' (expected jpeg or png)"
            ))),
        }
    }
}

/// Path of the persisted frame for tick `idx`: `dir/frameNNNNN.ext`.
pub fn frame_path(dir: &Path, idx: FrameIndex, format: FrameFormat) -> PathBuf {
    dir.join(format!("frame{:05}.{}", idx.0, format.extension()))
}

/// Write `frame` as an opaque PNG, flattening premultiplied pixels over `background`.
pub fn save_png(path: &Path, frame: &FrameRGBA, background: Color) -> TickreelResult<()> {
    let mut rgba = frame.data.clone();
    if frame.premultiplied {
        flatten_premul_over_bg(&mut rgba, &frame.data, [background.r, background.g, background.b]);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &rgba,
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| TickreelError::encode(format!("failed to write '{}': {e}", path.display())))
}

fn is_frame_file(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("frame") else {
        return false;
    };
    let Some((digits, ext)) = rest.split_once('.') else {
        return false;
    };
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && matches!(ext, "jpeg" | "jpg" | "png")
}

/// Sink that writes every pushed frame as a numbered image file.
///
/// Stale frame files from earlier runs are removed in `begin`, so the directory always holds
/// exactly one contiguous sequence for the assembler.
pub struct ImageSequenceSink {
    dir: PathBuf,
    format: FrameFormat,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    scratch: Vec<u8>,
    written: Vec<PathBuf>,
}

impl ImageSequenceSink {
    /// Create a sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>, format: FrameFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
            cfg: None,
            last_idx: None,
            scratch: Vec::new(),
            written: Vec::new(),
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Frame file format.
    pub fn format(&self) -> FrameFormat {
        self.format
    }

    /// Files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Tick of the first written frame (the assembler's start number).
    pub fn first_index(&self) -> Option<FrameIndex> {
        self.written.first().and_then(|p| {
            let stem = p.file_stem()?.to_str()?;
            stem.strip_prefix("frame")?.parse().ok().map(FrameIndex)
        })
    }

    /// Delete every written frame file.
    pub fn remove_written(&mut self) -> TickreelResult<()> {
        for path in self.written.drain(..) {
            std::fs::remove_file(&path).map_err(|e| {
                TickreelError::encode(format!("failed to remove '{}': {e}", path.display()))
            })?;
        }
        Ok(())
    }

    fn remove_stale(&self) -> TickreelResult<usize> {
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("failed to list '{}'", self.dir.display()))?;
        let mut removed = 0;
        for entry in entries {
            let entry = entry.context("failed to read directory entry")?;
            let name = entry.file_name();
            if name.to_str().is_some_and(is_frame_file) {
                std::fs::remove_file(entry.path()).with_context(|| {
                    format!("failed to remove stale frame '{}'", entry.path().display())
                })?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn write(&self, path: &Path, width: u32, height: u32) -> TickreelResult<()> {
        match self.format {
            FrameFormat::Jpeg { quality } => {
                let rgb: Vec<u8> = self
                    .scratch
                    .chunks_exact(4)
                    .flat_map(|px| [px[0], px[1], px[2]])
                    .collect();
                let file = File::create(path).map_err(|e| {
                    TickreelError::encode(format!("failed to create '{}': {e}", path.display()))
                })?;
                image::codecs::jpeg::JpegEncoder::new_with_quality(BufWriter::new(file), quality)
                    .write_image(&rgb, width, height, image::ExtendedColorType::Rgb8)
                    .map_err(|e| {
                        TickreelError::encode(format!("failed to encode '{}': {e}", path.display()))
                    })
            }
            FrameFormat::Png => image::save_buffer_with_format(
                path,
                &self.scratch,
                width,
                height,
                image::ExtendedColorType::Rgba8,
                image::ImageFormat::Png,
            )
            .map_err(|e| {
                TickreelError::encode(format!("failed to write '{}': {e}", path.display()))
            }),
        }
    }
}

impl FrameSink for ImageSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> TickreelResult<()> {
        cfg.canvas.validate()?;
        self.format.validate()?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create frame directory '{}'", self.dir.display()))?;
        let removed = self.remove_stale()?;
        if removed > 0 {
            tracing::debug!(removed, dir = %self.dir.display(), "removed stale frames");
        }
        self.scratch = vec![0u8; (cfg.canvas.width as usize) * (cfg.canvas.height as usize) * 4];
        self.written.clear();
        self.last_idx = None;
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TickreelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| TickreelError::encode("image sequence sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(TickreelError::encode(
                "image sequence sink received out-of-order frame index",
            ));
        }
        if frame.width != cfg.canvas.width || frame.height != cfg.canvas.height {
            return Err(TickreelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.canvas.width, cfg.canvas.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(TickreelError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        let bg = cfg.background;
        if frame.premultiplied {
            flatten_premul_over_bg(&mut self.scratch, &frame.data, [bg.r, bg.g, bg.b]);
        } else {
            self.scratch.copy_from_slice(&frame.data);
        }

        let path = frame_path(&self.dir, idx, self.format);
        self.write(&path, frame.width, frame.height)?;
        self.written.push(path);
        self.last_idx = Some(idx);
        Ok(())
    }

    fn end(&mut self) -> TickreelResult<()> {
        tracing::debug!(frames = self.written.len(), dir = %self.dir.display(), "frame sequence complete");
        self.cfg = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
