use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use openrate_core::{
    calculate_with, check_penetration, CalculationMode, CalculationRequest, EngineConfig,
};
use openrate_data::{
    lint_request, load_penetration_check, load_request, parse_request, render_json,
    render_response,
};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

mod logging;

/// Opening-hand probability calculator.
#[derive(Debug, Parser)]
#[command(name = "openrate", author, version, about = "Opening-hand probability calculator")]
struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, value_name = "FILTER", default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate opening rates for a request file (`-` reads stdin).
    Calc {
        #[arg(value_name = "REQUEST")]
        request: PathBuf,

        /// Override the requested calculation mode.
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Override the number of simulation trials.
        #[arg(long, value_name = "COUNT")]
        trials: Option<u64>,

        /// Override the simulation seed.
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,

        /// Count sub-pattern labels as successes in simulation mode.
        #[arg(long)]
        sub_patterns_in_simulation: bool,

        /// Upper bound applied to the trial count.
        #[arg(long, value_name = "COUNT")]
        max_trials: Option<u64>,

        /// Write the response here instead of stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },
    /// Check whether penetration effects can answer a set of requirements.
    Penetration {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[arg(long)]
        pretty: bool,
    },
    /// List likely mistakes in a request without calculating.
    Lint {
        #[arg(value_name = "REQUEST")]
        request: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Exact,
    Simulation,
}

impl From<ModeArg> for CalculationMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Exact => CalculationMode::Exact,
            ModeArg::Simulation => CalculationMode::Simulation,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_json)?;

    match cli.command {
        Command::Calc {
            request,
            mode,
            trials,
            seed,
            sub_patterns_in_simulation,
            max_trials,
            output,
            pretty,
        } => {
            let mut req = read_request(&request)?;
            for warning in lint_request(&req) {
                tracing::warn!(target: "openrate_cli", %warning, "request lint");
            }
            if let Some(mode) = mode {
                req.settings.mode = mode.into();
            }
            if let Some(trials) = trials {
                req.settings.simulation_trials = trials;
            }
            if seed.is_some() {
                req.settings.seed = seed;
            }
            if sub_patterns_in_simulation {
                req.settings.sub_patterns_in_simulation = true;
            }
            let mut config = EngineConfig::default();
            if let Some(max_trials) = max_trials {
                config.max_trials = max_trials;
            }

            let response = calculate_with(&req, &config);
            if let Some(error) = &response.error {
                tracing::warn!(target: "openrate_cli", ?error, "calculation returned an error");
            }
            let rendered = render_response(&response, pretty)?;
            write_output(output.as_deref(), &rendered)
        }
        Command::Penetration { input, pretty } => {
            let check = load_penetration_check(&input)?;
            let verdict = check_penetration(&check.requirements, &check.effects);
            tracing::info!(
                target: "openrate_cli",
                feasible = verdict.feasible,
                required = verdict.total_required,
                assignable = verdict.max_assignable,
                "penetration checked"
            );
            write_output(None, &render_json(&verdict, pretty)?)
        }
        Command::Lint { request } => {
            let req = read_request(&request)?;
            let warnings = lint_request(&req);
            let mut stdout = io::stdout().lock();
            for warning in &warnings {
                writeln!(stdout, "{warning}")?;
            }
            if warnings.is_empty() {
                writeln!(stdout, "ok")?;
            }
            Ok(())
        }
    }
}

fn read_request(path: &Path) -> anyhow::Result<CalculationRequest> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("read request from stdin")?;
        return parse_request(&raw);
    }
    load_request(path)
}

fn write_output(path: Option<&Path>, rendered: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{rendered}")?;
            Ok(())
        }
    }
}
