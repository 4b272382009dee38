//! `stepwise` CLI: record algorithm traces and play them back.

mod cli_logger;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;
use std::process::ExitCode;

use cli_logger::CliLogger;
use stepwise::{
    Config, InputArgs, PlayOptions, ProblemId, Reporter, ScriptStatus, Speed,
    list_command, play_command, schema_doc, script_command, show_command, trace_command,
};

#[derive(Debug, Parser)]
#[command(name = "stepwise", version, about = "Step-by-step algorithm traces and playback")]
struct Cli {
    /// Config file; a missing file means defaults.
    #[arg(long, global = true, default_value = "stepwise.toml")]
    config: PathBuf,

    /// Machine-readable output (overrides `reporter` in the config).
    #[arg(long, global = true)]
    json: bool,

    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the problem catalog.
    List,
    /// Print the problem and script schema document.
    Schema,
    /// Generate a trace and print its summary.
    Trace {
        problem: ProblemId,
        #[command(flatten)]
        input: InputArgs,
        /// Write the trace file here.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print every step instead of a summary.
        #[arg(long)]
        all: bool,
    },
    /// Auto-play a trace to its last step.
    Play {
        problem: ProblemId,
        #[command(flatten)]
        input: InputArgs,
        /// 0.25 to 2.0 in steps of 0.25.
        #[arg(long, value_parser = parse_speed)]
        speed: Option<Speed>,
        /// Start from this step index.
        #[arg(long)]
        from: Option<usize>,
        /// Wait on the wall clock between steps.
        #[arg(long)]
        realtime: bool,
        /// Write the playback timeline (JSON) here.
        #[arg(long)]
        timeline: Option<PathBuf>,
    },
    /// Verify a trace file and print one of its steps.
    Show {
        file: PathBuf,
        /// Step index; defaults to the last step.
        #[arg(long)]
        at: Option<usize>,
    },
    /// Run a scripted playback session on a virtual clock.
    Script {
        file: PathBuf,
        /// Include the playback timeline in the report.
        #[arg(long)]
        timeline: bool,
    },
}

fn parse_speed(raw: &str) -> Result<Speed, String> {
    let value: f64 = raw
        .trim_end_matches('x')
        .parse()
        .map_err(|e| format!("{raw:?} is not a number: {e}"))?;
    Speed::new(value).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load_optional(&cli.config);
    let json = cli.json || config.reporter == Reporter::Json;
    let logger = CliLogger::new(json, cli.no_color);

    match run(&cli, &config, &logger) {
        Ok(code) => code,
        Err(err) => {
            logger.print_error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &Config, logger: &CliLogger) -> Result<ExitCode> {
    match &cli.command {
        Command::List => logger.print_serialized(&list_command())?,
        Command::Schema => logger.print_serialized(&schema_doc()?)?,
        Command::Trace {
            problem,
            input,
            out,
            all,
        } => {
            let value = trace_command(config, *problem, input, out.as_deref(), *all)
                .with_context(|| format!("generating {problem} trace"))?;
            logger.print_serialized(&value)?;
        }
        Command::Play {
            problem,
            input,
            speed,
            from,
            realtime,
            timeline,
        } => {
            let options = PlayOptions {
                speed: *speed,
                from: *from,
                realtime: *realtime,
                timeline: timeline.clone(),
            };
            let mut print_failed = None;
            let summary = play_command(config, *problem, input, &options, |cursor, total, step| {
                if print_failed.is_none()
                    && let Err(err) = logger.print_step(cursor, total, step)
                {
                    print_failed = Some(err);
                }
            })
            .with_context(|| format!("playing {problem}"))?;
            if let Some(err) = print_failed {
                return Err(err);
            }
            logger.print_serialized(&summary)?;
        }
        Command::Show { file, at } => {
            let value = show_command(file, *at, config.max_steps)
                .with_context(|| format!("reading trace file {}", file.display()))?;
            if value["replayMatches"] == false {
                logger.print_warning(
                    "regenerating the stored input gives a different trace; the file came from another build",
                );
            }
            logger.print_serialized(&value)?;
        }
        Command::Script { file, timeline } => {
            let report = script_command(config, file, *timeline)
                .with_context(|| format!("running script {}", file.display()))?;
            logger.print_script_report(&report)?;
            if report.status == ScriptStatus::Fail {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
