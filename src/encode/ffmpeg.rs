use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::encode::sink::FrameFormat;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{TickreelError, TickreelResult};

/// Final artifact assembled from the frame sequence.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// H.264 MP4, optionally muxed with audio.
    #[default]
    Mp4,
    /// 360 px wide GIF that plays once.
    Gif,
    /// 360 px wide GIF that loops forever.
    #[serde(rename = "gifloop", alias = "gif_loop")]
    #[value(name = "gifloop")]
    GifLoop,
    /// Keep the frame sequence only.
    None,
}

impl OutputKind {
    /// Default output file name, if the kind produces a file.
    pub fn default_file_name(self) -> Option<&'static str> {
        match self {
            Self::Mp4 => Some("out.mp4"),
            Self::Gif | Self::GifLoop => Some("out.gif"),
            Self::None => None,
        }
    }
}

/// Everything the assembler needs to turn a frame sequence into a video.
#[derive(Clone, Debug)]
pub struct AssemblyOpts {
    /// Directory holding `frameNNNNN.ext` files.
    pub frames_dir: PathBuf,
    /// Format of the frame files.
    pub frame_format: FrameFormat,
    /// Tick of the first frame file.
    pub start: FrameIndex,
    /// Frame rate of the sequence.
    pub fps: Fps,
    /// Artifact kind.
    pub kind: OutputKind,
    /// Output file.
    pub out_path: PathBuf,
    /// Optional soundtrack (MP4 only).
    pub audio: Option<PathBuf>,
    /// Truncate to the shorter of video and audio.
    pub shorter: bool,
    /// Overwrite an existing output file.
    pub overwrite: bool,
}

/// Build the `ffmpeg` argument list for `opts`.
///
/// GIF output keeps every second frame (`fps` halved) and scales to 360 px wide.
pub fn assembly_args(opts: &AssemblyOpts) -> TickreelResult<Vec<OsString>> {
    if opts.kind == OutputKind::None {
        return Err(TickreelError::validation(
            "output kind 'none' has no assembly step",
        ));
    }
    let mut args: Vec<OsString> = Vec::new();
    let mut push = |a: &str| args.push(a.into());
    push(if opts.overwrite { "-y" } else { "-n" });
    push("-loglevel");
    push("error");
    push("-framerate");
    push(&format!("{}/{}", opts.fps.num, opts.fps.den));
    push("-start_number");
    push(&opts.start.0.to_string());
    push("-i");
    args.push(
        opts.frames_dir
            .join(format!("frame%05d.{}", opts.frame_format.extension()))
            .into_os_string(),
    );

    match opts.kind {
        OutputKind::Mp4 => {
            if let Some(audio) = &opts.audio {
                args.push("-i".into());
                args.push(audio.clone().into_os_string());
                args.extend(["-map", "0:v", "-map", "1:a", "-c:a", "aac"].map(OsString::from));
                if opts.shorter {
                    args.push("-shortest".into());
                }
            } else {
                args.push("-an".into());
            }
            args.extend(
                [
                    "-c:v",
                    "libx264",
                    "-pix_fmt",
                    "yuv420p",
                    "-movflags",
                    "+faststart",
                ]
                .map(OsString::from),
            );
        }
        OutputKind::Gif | OutputKind::GifLoop => {
            let half = f64::from(opts.fps.num) / f64::from(opts.fps.den) / 2.0;
            args.push("-vf".into());
            args.push(format!("fps={half},scale=360:-1").into());
            args.push("-loop".into());
            args.push(if opts.kind == OutputKind::Gif { "-1" } else { "0" }.into());
        }
        OutputKind::None => {}
    }
    args.push(opts.out_path.clone().into_os_string());
    Ok(args)
}

/// Assemble the frame sequence by running the system `ffmpeg`.
#[tracing::instrument(skip_all, fields(kind = ?opts.kind, out = %opts.out_path.display()))]
pub fn assemble(opts: &AssemblyOpts) -> TickreelResult<()> {
    if opts.kind == OutputKind::None {
        return Ok(());
    }
    if let Some(audio) = &opts.audio
        && !audio.is_file()
    {
        return Err(TickreelError::asset(format!(
            "audio file '{}' does not exist",
            audio.display()
        )));
    }
    ensure_parent_dir(&opts.out_path)?;
    if !opts.overwrite && opts.out_path.exists() {
        return Err(TickreelError::validation(format!(
            "output file '{}' already exists",
            opts.out_path.display()
        )));
    }
    if !is_ffmpeg_on_path() {
        return Err(TickreelError::encode(
            "ffmpeg is required for video assembly, but was not found on PATH",
        ));
    }

    let args = assembly_args(opts)?;
    tracing::debug!(?args, "running ffmpeg");
    let output = Command::new("ffmpeg")
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            TickreelError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TickreelError::encode(format!(
            "ffmpeg exited with status {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    tracing::info!("assembled video");
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> TickreelResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
