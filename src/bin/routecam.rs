use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use routecam::{
    AnimationSettings, CancellationToken, ExportDriver, Fps, FrameCapture, PreCalculatedAnimation,
    RecordingCapture, RecordingSurface, RenderSurface, Route, TransitionMode, export_plan,
    fit_bounds_duration, fly_to_duration, follow_path_duration, follow_path_duration_for_speed,
    precalculate, route_complexity,
};

#[derive(Parser, Debug)]
#[command(name = "routecam", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pre-calculate an animation and write its timing table, keyframes and fingerprint.
    Plan(PlanArgs),
    /// Run a deterministic export against an in-memory surface; one JSON line per frame.
    Frames(FramesArgs),
    /// Print route length, complexity and phase durations.
    Durations(DurationsArgs),
}

#[derive(Parser, Debug)]
struct AnimationArgs {
    /// Route JSON: `{"coordinates": [[lng, lat], ...]}`, a GeoJSON LineString, or a Feature.
    #[arg(long)]
    route: PathBuf,

    /// Settings JSON; flags below override individual fields.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Follow strength in [0, 1].
    #[arg(long)]
    strength: Option<f64>,

    /// Travel speed in km/s (default: derived from route length and shape).
    #[arg(long)]
    speed: Option<f64>,

    /// Export frame rate (integer frames per second).
    #[arg(long)]
    fps: Option<u32>,

    /// How preview plays fly-to and fit-bounds.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Native,
    Computed,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    animation: AnimationArgs,

    /// Output JSON path (default: stdout).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Include the full keyframe table.
    #[arg(long, default_value_t = false)]
    keyframes: bool,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    animation: AnimationArgs,

    /// Output JSONL path (default: stdout).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DurationsArgs {
    #[arg(long)]
    route: PathBuf,

    /// Travel speed in km/s.
    #[arg(long)]
    speed: Option<f64>,
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
        Command::Plan(args) => cmd_plan(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Durations(args) => cmd_durations(args),
    }
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let animation = load_animation(&args.animation)?;
    let progress = animation.progress();

    let mut report = serde_json::json!({
        "total_duration_ms": animation.total_duration_ms(),
        "frame_count": animation.frame_count(),
        "fingerprint": format!("{:016x}", animation.fingerprint()),
        "route": {
            "points": animation.route().coordinates().len(),
            "length_km": animation.route().length_km(),
        },
        "phases": animation.spans(),
        "keyframe_count": animation.keyframes().len(),
        "progress": {
            "keypoints": progress.len(),
            "interval_ms": animation.settings().fps.frame_interval_ms(),
            "final_distance_km": progress.last().map_or(0.0, |p| p.distance_km),
        },
        "initial_pose": animation.initial_pose(),
        "final_pose": animation.final_pose(),
    });
    if args.keyframes {
        report["keyframes"] = serde_json::to_value(animation.keyframes())?;
    }

    let text = serde_json::to_string_pretty(&report)?;
    let mut out = open_output(args.out.as_deref())?;
    writeln!(out, "{text}")?;
    out.flush()?;
    if let Some(path) = &args.out {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let animation = Arc::new(load_animation(&args.animation)?);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("start async runtime")?;
    let surface = RecordingSurface::new().shared();
    let capture = Arc::new(RecordingCapture::observing(Arc::clone(&surface)));
    let stats = runtime.block_on(async {
        let s: Arc<dyn RenderSurface> = surface.clone();
        let c: Arc<dyn FrameCapture> = capture.clone();
        ExportDriver::new(Arc::clone(&animation), s, c)
            .run(&CancellationToken::new())
            .await
    })?;

    let plan = export_plan(&animation);
    let captured = capture.frames();
    anyhow::ensure!(
        captured.len() == plan.len(),
        "captured {} frames, expected {}",
        captured.len(),
        plan.len()
    );

    let mut out = open_output(args.out.as_deref())?;
    for (index, (sample, frame)) in plan.iter().zip(&captured).enumerate() {
        anyhow::ensure!(
            frame.pose.is_none() || frame.pose == Some(sample.pose),
            "frame {index} was captured at a different pose than planned"
        );
        let line = serde_json::json!({
            "frame": index,
            "timestamp_ms": sample.timestamp_ms,
            "phase": sample.phase,
            "pose": sample.pose,
            "distance_km": sample.progress.distance_km,
            "position": [sample.progress.position.x, sample.progress.position.y],
        });
        writeln!(out, "{line}")?;
    }
    out.flush()?;

    eprintln!(
        "exported {}/{} frames ({} settle timeouts), fingerprint {:016x}",
        stats.frames_captured,
        stats.frames_total,
        stats.settle_timeouts,
        animation.fingerprint()
    );
    Ok(())
}

fn cmd_durations(args: DurationsArgs) -> anyhow::Result<()> {
    let route = load_route(&args.route)?;
    let follow_ms = match args.speed {
        Some(speed) => follow_path_duration_for_speed(&route, speed),
        None => follow_path_duration(&route),
    };
    let fly_ms = fly_to_duration();
    let fit_ms = fit_bounds_duration();

    println!("length_km      {:.3}", route.length_km());
    println!("complexity     {:.3}", route_complexity(&route));
    println!("fly_to_ms      {fly_ms:.0}");
    println!("follow_path_ms {follow_ms:.0}");
    println!("fit_bounds_ms  {fit_ms:.0}");
    println!("total_ms       {:.0}", fly_ms + follow_ms + fit_ms);
    Ok(())
}

fn load_animation(args: &AnimationArgs) -> anyhow::Result<PreCalculatedAnimation> {
    let route = load_route(&args.route)?;
    let settings = load_settings(args)?;
    precalculate(route, &settings).context("pre-calculate animation")
}

fn load_route(path: &Path) -> anyhow::Result<Route> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read route '{}'", path.display()))?;
    let mut value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parse route '{}'", path.display()))?;
    // unwrap a GeoJSON Feature down to its geometry
    if let Some(geometry) = value.get_mut("geometry").map(serde_json::Value::take) {
        value = geometry;
    }
    serde_json::from_value(value).with_context(|| format!("invalid route '{}'", path.display()))
}

fn load_settings(args: &AnimationArgs) -> anyhow::Result<AnimationSettings> {
    let mut settings = match &args.settings {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read settings '{}'", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parse settings '{}'", path.display()))?
        }
        None => AnimationSettings::default(),
    };
    if let Some(strength) = args.strength {
        settings.follow_strength = strength;
    }
    if let Some(speed) = args.speed {
        settings.speed_km_per_s = Some(speed);
    }
    if let Some(fps) = args.fps {
        settings.fps = Fps::new(fps, 1)?;
    }
    if let Some(mode) = args.mode {
        settings.transition_mode = match mode {
            ModeArg::Native => TransitionMode::Native,
            ModeArg::Computed => TransitionMode::Computed,
        };
    }
    Ok(settings)
}

fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn std::io::Write>> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let file = std::fs::File::create(path)
                .with_context(|| format!("create '{}'", path.display()))?;
            Ok(Box::new(std::io::BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}
