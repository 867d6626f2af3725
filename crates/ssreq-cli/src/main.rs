use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use ssreq_core::{BusEvent, BusEventKind, ReplayConfig, Report};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod error;
mod input;
mod output;

use error::CliError;
use output::{OutputFormat, OutputTarget};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("SSREQ_BUILD_COMMIT"),
    ", built ",
    env!("SSREQ_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "ssreq", version, long_version = LONG_VERSION)]
#[command(
    about = "Replays USB3 control-request traces through the setup decoder and handler multiplexer.",
    after_help = "Examples:\n  ssreq trace replay capture.jsonl -o report.json\n  ssreq trace run 'captures/*.jsonl' --stdout --pretty\n  ssreq trace replay capture.jsonl --config handlers.json --strict -o report.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Work with recorded step traces (JSON Lines).
    Trace {
        #[command(subcommand)]
        command: TraceCommands,
    },
}

#[derive(Subcommand, Debug)]
enum TraceCommands {
    /// Replay a trace and write a versioned JSON report.
    #[command(visible_alias = "run")]
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// Trace file (.jsonl); a glob must match exactly one file
    input: PathBuf,

    /// Report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Print the report on stdout instead of writing a file
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Handler configuration (JSON); defaults to device_state + stall_only
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Indented JSON
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Single-line JSON (default)
    #[arg(long)]
    compact: bool,

    /// Skip the "OK: report written" line
    #[arg(long)]
    quiet: bool,

    /// Fail if any request was stalled
    #[arg(long)]
    strict: bool,

    /// Print bus events to stderr after the replay
    #[arg(long)]
    list_events: bool,
}

impl ReplayArgs {
    fn target(&self) -> OutputTarget {
        match (&self.report, self.stdout) {
            (Some(path), false) => OutputTarget::File(path.clone()),
            _ => OutputTarget::Stdout,
        }
    }

    fn format(&self) -> OutputFormat {
        if self.pretty {
            OutputFormat::Pretty
        } else {
            OutputFormat::Compact
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Trace {
            command: TraceCommands::Replay(args),
        } => cmd_trace_replay(&args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.report();
            ExitCode::from(2)
        }
    }
}

/// Logs go to stderr so `--stdout` output stays valid JSON.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_trace_replay(args: &ReplayArgs) -> Result<(), CliError> {
    let input = input::resolve_trace(&args.input)?;
    let target = args.target();
    target.ensure_not_input(&input)?;

    let config = load_config(args.config.as_deref())?;
    debug!(
        input = %input.display(),
        handlers = config.handlers.len(),
        "replaying trace"
    );
    let report = ssreq_core::replay_trace_file(&input, &config)
        .with_context(|| format!("trace replay failed for {}", input.display()))?;

    let json = args.format().render(&report)?;
    if let Some(written) = target.write(&json)? {
        if !args.quiet {
            eprintln!("OK: report written -> {}", written.display());
        }
    }
    if args.list_events {
        print_events(&report);
    }

    let stalls = report.summary.stalls;
    if args.strict && stalls > 0 {
        return Err(CliError::new(format!("{} request(s) stalled", stalls))
            .with_hint("rerun with --list-events to see where"));
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ReplayConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReplayConfig::default());
    };
    ReplayConfig::from_path(path).map_err(|err| {
        CliError::new(format!(
            "cannot load handler configuration {}: {}",
            path.display(),
            err
        ))
        .with_hint(r#"expected {"handlers": [{"kind": "device_state"}, ...]}"#)
    })
}

fn print_events(report: &Report) {
    eprintln!("Bus events:");
    for BusEvent { step, kind, value } in &report.events {
        let kind = match kind {
            BusEventKind::AddressChanged => "address_changed",
            BusEventKind::ConfigChanged => "config_changed",
            BusEventKind::Transmit => "transmit",
            BusEventKind::Ack => "ack",
            BusEventKind::Stall => "stall",
        };
        match value {
            Some(value) => eprintln!("  step {} {} {}", step, kind, value),
            None => eprintln!("  step {} {}", step, kind),
        }
    }
}
