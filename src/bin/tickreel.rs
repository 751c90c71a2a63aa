use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tickreel::{
    CpuSurface, Ease, FrameFormat, ImageSequenceSink, OutputKind, ProjectConfig, RenderReport,
    Renderer, RendererOpts,
};

#[derive(Parser, Debug)]
#[command(name = "tickreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a built-in project to a frame sequence and assemble it with `ffmpeg`.
    Render(RenderArgs),
    /// List the built-in projects.
    List,
    /// List the easing function names.
    Eases,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Project to render (see `tickreel list`).
    #[arg(long)]
    project: String,

    /// JSON config replacing the project's defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// First tick to rasterize.
    #[arg(long)]
    start: Option<u64>,

    /// Last tick to rasterize (inclusive); -1 renders to the end.
    #[arg(long, allow_hyphen_values = true)]
    end: Option<i64>,

    /// Directory receiving the frame sequence.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Artifact to assemble.
    #[arg(long, value_enum)]
    output: Option<OutputKind>,

    /// Frame file format (jpeg or png).
    #[arg(long, value_parser = parse_frame_format)]
    frame_format: Option<FrameFormat>,

    /// Keep the frame files after assembly.
    #[arg(long)]
    keep_frames: bool,

    /// Only write frames; skip ffmpeg.
    #[arg(long)]
    no_encode: bool,
}

fn parse_frame_format(s: &str) -> Result<FrameFormat, String> {
    s.parse().map_err(|e: tickreel::TickreelError| e.to_string())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::List => {
            for p in tickreel::projects::all() {
                println!("{:<10} {}", p.name, p.description);
            }
            Ok(())
        }
        Command::Eases => {
            for e in Ease::ALL {
                println!("{e}");
            }
            Ok(())
        }
    }
}

fn load_config(args: &RenderArgs, project: &tickreel::projects::Project) -> anyhow::Result<ProjectConfig> {
    let mut cfg = match &args.config {
        Some(path) => ProjectConfig::from_path(path)?,
        None => project.default_config(),
    };
    if let Some(start) = args.start {
        cfg.window.0 = start;
    }
    if let Some(end) = args.end {
        cfg.window.1 = end;
    }
    if let Some(dir) = &args.out_dir {
        cfg.out_dir = dir.clone();
    }
    if let Some(output) = args.output {
        cfg.output = output;
    }
    if let Some(format) = args.frame_format {
        cfg.frame_format = format;
    }
    cfg.keep_frames |= args.keep_frames;
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let project = tickreel::projects::find(&args.project)?;
    let cfg = load_config(&args, project)?;

    let scenes = project.scenes(&cfg.stage)?;
    let mut surface = CpuSurface::from_stage(&cfg.stage)?;
    let mut sink = ImageSequenceSink::new(&cfg.out_dir, cfg.frame_format);
    let opts = RendererOpts {
        window: cfg.window()?,
        expected_ticks: cfg.expected_ticks,
        keep_previews: cfg.preview_dir.is_some(),
    };
    let mut renderer = Renderer::new(cfg.stage.clone(), opts)?;
    let report = renderer
        .run(scenes, &mut surface, &mut sink)
        .with_context(|| format!("render project '{}'", project.name))?;

    if let Some(dir) = &cfg.preview_dir {
        write_previews(dir, &report, &cfg)?;
    }

    eprintln!(
        "{} ticks, {} frames written to {}",
        report.stats.ticks,
        report.stats.frames_rendered,
        cfg.out_dir.display()
    );

    if args.no_encode {
        return Ok(());
    }
    let Some(mut assembly) = cfg.assembly_opts()? else {
        return Ok(());
    };
    let Some(first) = sink.first_index() else {
        anyhow::bail!("no frames were rendered; nothing to assemble");
    };
    assembly.start = first;
    tickreel::encode::ffmpeg::assemble(&assembly)?;
    eprintln!("wrote {}", assembly.out_path.display());

    if !cfg.keep_frames {
        sink.remove_written()?;
    }
    Ok(())
}

fn write_previews(dir: &Path, report: &RenderReport, cfg: &ProjectConfig) -> anyhow::Result<()> {
    for (n, preview) in report.previews.iter().enumerate() {
        let Some(frame) = &preview.frame else {
            continue;
        };
        let path = dir.join(format!("scene{}.png", n + 1));
        tickreel::encode::sink::save_png(&path, frame, cfg.stage.background)?;
        tracing::info!(scene = %preview.scene, path = %path.display(), "wrote preview");
    }
    Ok(())
}
