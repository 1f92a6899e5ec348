use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "motion-router", version)]
struct Cli {
    /// Log engine internals to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a navigation script against headless screens and print the event log.
    Simulate(SimulateArgs),
    /// Validate a router configuration file.
    CheckConfig(CheckConfigArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Write the report here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

#[derive(Parser, Debug)]
struct CheckConfigArgs {
    /// Router configuration JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        Command::CheckConfig(args) => cmd_check_config(args),
    }
}

fn read_to_string(path: &Path, what: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("open {what} '{}'", path.display()))
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let raw = read_to_string(&args.in_path, "script")?;
    let script = motion_router::simulate::Script::from_json_str(&raw)
        .with_context(|| format!("parse script '{}'", args.in_path.display()))?;
    let report = script.run().with_context(|| "run script")?;

    let mut out: Box<dyn std::io::Write> = match &args.out {
        Some(path) => {
            let f = File::create(path)
                .with_context(|| format!("create report '{}'", path.display()))?;
            Box::new(BufWriter::new(f))
        }
        None => Box::new(std::io::stdout().lock()),
    };
    if args.pretty {
        serde_json::to_writer_pretty(&mut out, &report)?;
    } else {
        serde_json::to_writer(&mut out, &report)?;
    }
    writeln!(out)?;
    out.flush()?;

    eprintln!(
        "{} events, {} history entries",
        report.events.len(),
        report.history.entries.len()
    );
    Ok(())
}

fn cmd_check_config(args: CheckConfigArgs) -> anyhow::Result<()> {
    motion_router::RouterConfig::from_path(&args.in_path)
        .with_context(|| format!("validate config '{}'", args.in_path.display()))?;
    println!("ok");
    Ok(())
}
