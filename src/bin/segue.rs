use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "segue", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a shot sequence and write an edit plan.
    Plan(PlanArgs),
    /// Print the descriptor of a single image.
    Describe(DescribeArgs),
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Input sequence request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Engine configuration JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output plan JSON; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Worker threads (overrides the config file).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct DescribeArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Engine configuration JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("SEGUE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Describe(args) => cmd_describe(args),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<segue::EngineConfig> {
    match path {
        Some(p) => Ok(segue::EngineConfig::from_path(p)?),
        None => Ok(segue::EngineConfig::default()),
    }
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_ref())?;
    if args.threads.is_some() {
        cfg.threading.threads = args.threads;
    }
    cfg.validate()?;

    let request = segue::SequenceRequest::from_path(&args.in_path)?;
    let plan = segue::TransitionMatcher::new(cfg).analyze_sequence(&request)?;
    for failure in &plan.failures {
        eprintln!("skipped {}: {}", failure.path.display(), failure.error);
    }

    let json = plan.to_json_pretty()?;
    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = File::create(out).with_context(|| format!("create '{}'", out.display()))?;
            let mut w = BufWriter::new(f);
            w.write_all(json.as_bytes())
                .with_context(|| format!("write plan '{}'", out.display()))?;
            w.flush()?;
            eprintln!(
                "wrote {} ({} shots, {} transitions)",
                out.display(),
                plan.shots.len(),
                plan.transitions.len()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_describe(args: DescribeArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_ref())?;
    let descriptor = segue::describe_path(&args.in_path, &cfg.vision, &cfg.descriptor)?;
    println!("{}", serde_json::to_string_pretty(&descriptor)?);
    Ok(())
}
