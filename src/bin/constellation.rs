use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use constellation::{
    ChapterSet, Constellation, EngineConfig, InitOutcome, LINES_LAYER, MotionPreference,
    STARS_LAYER, Scene, TransitionOutcome,
};

#[derive(Parser, Debug)]
#[command(name = "constellation", version)]
struct Cli {
    /// Increase log verbosity (`-v` debug, `-vv` trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a chapter dataset and report dangling references.
    Validate(ValidateArgs),
    /// Print the timeline planned for one chapter transition as JSON.
    Plan(PlanArgs),
    /// Play a chapter path and write the resulting scene as SVG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct DatasetArgs {
    /// Chapter dataset JSON. Defaults to the bundled git tutorial.
    #[arg(long)]
    chapters: Option<PathBuf>,

    /// Engine configuration JSON (partial documents allowed).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Exit with an error when any reference dangles.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Chapter to settle on before planning.
    #[arg(long)]
    from: Option<String>,

    /// Chapter to transition to.
    #[arg(long)]
    to: String,

    /// Plan with the reduced-motion strategy.
    #[arg(long, default_value_t = false)]
    reduced_motion: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Comma-separated chapter ids, played in order.
    #[arg(long, value_delimiter = ',', required = true)]
    path: Vec<String>,

    /// Seconds into the last transition. Without it the last transition is played to its end.
    #[arg(long)]
    at: Option<f64>,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    /// Play with the reduced-motion strategy.
    #[arg(long, default_value_t = false)]
    reduced_motion: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let chapters = load_chapters(args.dataset.chapters.as_deref())?;
    if let Some(path) = args.dataset.config.as_deref() {
        load_config(Some(path))?;
    }

    let mut dangling = 0usize;
    for (id, snapshot) in &chapters.chapters {
        for r in snapshot.dangling_references() {
            println!("{id}: {}.{} -> '{}' not found", r.owner, r.field, r.missing);
            dangling += 1;
        }
    }
    eprintln!("{} chapters, {dangling} dangling reference(s)", chapters.len());
    if args.strict && dangling > 0 {
        anyhow::bail!("{dangling} dangling reference(s)");
    }
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let mut engine = build_engine(&args.dataset, args.reduced_motion)?;
    if let Some(from) = args.from.as_deref() {
        start(&mut engine, from)?;
        engine.finish();
    }
    let report = start(&mut engine, &args.to)?;

    let out = serde_json::json!({
        "report": report,
        "timeline": engine.timeline(),
    });
    let text = serde_json::to_string_pretty(&out).context("serialize planned transition")?;
    println!("{text}");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut engine = build_engine(&args.dataset, args.reduced_motion)?;
    let Some((last, settled)) = args.path.split_last() else {
        anyhow::bail!("--path must name at least one chapter");
    };
    for chapter in settled {
        start(&mut engine, chapter)?;
        engine.finish();
    }
    start(&mut engine, last)?;
    match args.at {
        Some(at) => {
            engine.tick(at.max(0.0));
        }
        None => engine.finish(),
    }

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, engine.to_svg())
        .with_context(|| format!("write svg '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn build_engine(dataset: &DatasetArgs, reduced_motion: bool) -> anyhow::Result<Constellation> {
    let chapters = load_chapters(dataset.chapters.as_deref())?;
    let config = load_config(dataset.config.as_deref())?;
    let preference = if reduced_motion {
        MotionPreference::Reduced
    } else {
        MotionPreference::Full
    };

    let scene = Scene::with_layers(&[LINES_LAYER, STARS_LAYER]);
    let mut engine = Constellation::new(config, chapters, scene, preference)?;
    if let InitOutcome::MissingSurface(layer) = engine.init() {
        anyhow::bail!("missing container surface '{layer}'");
    }
    Ok(engine)
}

fn start(
    engine: &mut Constellation,
    chapter: &str,
) -> anyhow::Result<constellation::TransitionReport> {
    match engine.transition_to(chapter) {
        TransitionOutcome::Started(report) => Ok(report),
        TransitionOutcome::UnknownChapter => anyhow::bail!("unknown chapter '{chapter}'"),
        TransitionOutcome::NotInitialized => anyhow::bail!("engine not initialized"),
    }
}

fn load_chapters(path: Option<&Path>) -> anyhow::Result<ChapterSet> {
    let Some(path) = path else {
        return ChapterSet::bundled().context("load bundled chapters");
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read chapters '{}'", path.display()))?;
    ChapterSet::from_json(&json).with_context(|| format!("parse chapters '{}'", path.display()))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    EngineConfig::from_json(&json).with_context(|| format!("parse config '{}'", path.display()))
}
