use std::path::PathBuf;

use clap::{Parser, Subcommand};

use morphix::{
    BlendJob, BlendSession, BlurOpts, FfmpegSink, JobOutput, MixFactor, MorphixResult,
    StillSequenceSink, SweepRange, ViewerOpts, default_mp4_config, run_sweep, run_viewer,
};

#[derive(Parser, Debug)]
#[command(name = "morphix", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Blend one still at a fixed mix factor.
    Blend(BlendArgs),
    /// Open an interactive window with a mix slider.
    View(ViewArgs),
    /// Sweep mix 0..=100 and write one still per percent.
    Frames(FramesArgs),
    /// Sweep mix 0..=100 into an MP4 video (requires `ffmpeg` on PATH).
    Video(VideoArgs),
    /// Run a blend job described by a JSON file.
    Job(JobArgs),
}

#[derive(clap::Args, Debug)]
struct CommonArgs {
    /// Base image path.
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Target image path (resized to the base image's dimensions if needed).
    #[arg(short = 't', long)]
    target: PathBuf,

    /// Smooth each produced frame with a small Gaussian blur.
    #[arg(short = 'b', long)]
    blur: bool,
}

#[derive(Parser, Debug)]
struct BlendArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Mix factor as a percentage (0 = base image, 100 = target image).
    #[arg(long, default_value_t = 50)]
    mix: u32,

    /// Output image path; the format follows the extension.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ViewArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Initial slider position.
    #[arg(long, default_value_t = 50)]
    mix: u32,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output directory for the still sequence.
    #[arg(long)]
    out_dir: PathBuf,

    /// File stem; frames are named `<stem>_000.<format>` .. `<stem>_100.<format>`.
    #[arg(long, default_value = "image")]
    stem: String,

    /// Still format by extension (jpg, png, ...).
    #[arg(long, default_value = "jpg")]
    format: String,
}

#[derive(Parser, Debug)]
struct VideoArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Frames per second of the encoded sweep.
    #[arg(long, default_value_t = morphix::DEFAULT_FPS)]
    fps: u32,

    /// Overwrite the output file if it already exists.
    #[arg(long, default_value_t = true)]
    overwrite: bool,
}

#[derive(Parser, Debug)]
struct JobArgs {
    /// Input job JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Blend(args) => cmd_blend(args),
        Command::View(args) => cmd_view(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Video(args) => cmd_video(args),
        Command::Job(args) => cmd_job(args),
    }
}

fn blur_opts(enabled: bool) -> Option<BlurOpts> {
    enabled.then(BlurOpts::default)
}

fn open_session(common: &CommonArgs) -> MorphixResult<BlendSession> {
    BlendSession::from_paths(&common.input, &common.target, blur_opts(common.blur))
}

fn cmd_blend(args: BlendArgs) -> anyhow::Result<()> {
    let mut session = open_session(&args.common)?;
    let mix = MixFactor::percent(args.mix)?;
    let frame = session.render(mix)?;
    morphix::assets::save_frame(frame, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_view(args: ViewArgs) -> anyhow::Result<()> {
    let mut session = open_session(&args.common)?;
    let opts = ViewerOpts {
        title: "morphix".to_string(),
        initial: MixFactor::percent(args.mix)?,
    };
    run_viewer(&mut session, opts)?;
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let mut session = open_session(&args.common)?;
    let mut sink = StillSequenceSink::new(&args.out_dir, args.stem, args.format)?;
    let stats = run_sweep(&mut session, SweepRange::full(), &mut sink)?;

    eprintln!("wrote {} frames to {}", stats.frames_written, args.out_dir.display());
    Ok(())
}

fn cmd_video(args: VideoArgs) -> anyhow::Result<()> {
    let mut session = open_session(&args.common)?;
    let (width, height) = session.dimensions();

    let mut cfg = default_mp4_config(&args.out, width, height, args.fps);
    cfg.overwrite = args.overwrite;
    let mut sink = FfmpegSink::new(cfg)?;
    run_sweep(&mut session, SweepRange::full(), &mut sink)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_job(args: JobArgs) -> anyhow::Result<()> {
    let job = BlendJob::from_path(&args.in_path)?;
    job.validate()?;

    let mut session = BlendSession::from_paths(&job.input, &job.target, job.blur)?;

    match job.output {
        JobOutput::Still { mix, out } => {
            let frame = session.render(MixFactor::percent(mix)?)?;
            morphix::assets::save_frame(frame, &out)?;
            eprintln!("wrote {}", out.display());
        }
        JobOutput::Frames { dir, stem, format } => {
            let mut sink = StillSequenceSink::new(&dir, stem, format)?;
            let stats = run_sweep(&mut session, SweepRange::full(), &mut sink)?;
            eprintln!("wrote {} frames to {}", stats.frames_written, dir.display());
        }
        JobOutput::Video {
            out,
            fps,
            overwrite,
        } => {
            let (width, height) = session.dimensions();
            let mut cfg = default_mp4_config(&out, width, height, fps);
            cfg.overwrite = overwrite;
            let mut sink = FfmpegSink::new(cfg)?;
            run_sweep(&mut session, SweepRange::full(), &mut sink)?;
            eprintln!("wrote {}", out.display());
        }
    }

    Ok(())
}
