//! StatusFlow — scripted interaction runner
//!
//! Runs a "Know Your Status" interaction against the in-process simulated
//! status service.  Each step is one caller operation; after every step the
//! runner waits for the simulated backend to answer.  Emitted events are
//! printed to stdout as JSON lines and logged through `env_logger`.
//!
//! ```text
//! $ statusflow check update save-negative
//! "check"
//! "prompt"
//! "update"
//! "save"
//! "updated"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};

use statusflow::adapters::log_sink::LogEventSink;
use statusflow::adapters::simulated::SimulatedStatusService;
use statusflow::config::Settings;
use statusflow::{EventSink, FlowController, Status, Validity};

#[derive(Debug, Parser)]
#[command(name = "statusflow", version, about = "Run a scripted Know-Your-Status interaction")]
struct Cli {
    /// JSON settings document (`flow` and `simulator` sections)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the validity of the simulated profile
    #[arg(long, value_enum)]
    validity: Option<ValidityArg>,

    /// Make every simulated fetch fail
    #[arg(long)]
    fetch_fails: bool,

    /// Make the simulated backend decline submissions
    #[arg(long)]
    reject_submit: bool,

    /// Operations to run, in order
    #[arg(value_enum, default_values_t = [Step::Check, Step::Update, Step::SaveNegative])]
    steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ValidityArg {
    Current,
    Outdated,
}

impl From<ValidityArg> for Validity {
    fn from(v: ValidityArg) -> Self {
        match v {
            ValidityArg::Current => Validity::Current,
            ValidityArg::Outdated => Validity::Outdated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Step {
    Check,
    Update,
    Cancel,
    SavePositive,
    SaveNegative,
    Reset,
}

fn load_settings(path: &Path) -> Result<Settings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    Settings::from_json(&text).with_context(|| format!("loading settings from {}", path.display()))
}

fn run_step(flow: &mut FlowController<SimulatedStatusService>, step: Step) {
    match step {
        Step::Check => flow.check(),
        Step::Update => flow.update(),
        Step::Cancel => flow.cancel(),
        Step::SavePositive => flow.save(Status::Positive),
        Step::SaveNegative => flow.save(Status::Negative),
        Step::Reset => flow.reset(),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    // ── 1. Settings (file, then CLI overrides) ─────────────────
    let mut settings = match &cli.config {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    if let Some(v) = cli.validity {
        settings.simulator.validity = v.into();
    }
    settings.simulator.fetch_fails |= cli.fetch_fails;
    if cli.reject_submit {
        settings.simulator.accept_submissions = false;
    }
    settings.validate()?;

    // ── 2. Wire the controller ────────────────────────────────
    let service = SimulatedStatusService::new(&settings.simulator);
    let mut flow = FlowController::with_config(service, settings.flow.clone());
    let mut log_sink = LogEventSink::new();
    flow.on_event(move |event| {
        log_sink.emit(event);
        match serde_json::to_string(&event) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!("could not encode {:?}: {}", event, e),
        }
    });

    // ── 3. Run the script ─────────────────────────────────────
    for step in &cli.steps {
        info!("STEP | {:?} in {:?}", step, flow.state());
        run_step(&mut flow, *step);
        flow.settle();
    }

    info!(
        "finished in {:?} after {} fetch(es) and {} submission(s)",
        flow.state(),
        flow.service().fetches(),
        flow.service().submissions()
    );
    Ok(())
}
