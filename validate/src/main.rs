//! Replay a scripted AR session against an overlay directory.
//!
//! ```text
//! anchorview-validate --images ./Images --scenario flicker.toml
//! ```
//!
//! Every status message, error dialog, session run and geometry update is
//! printed with its offset from the scenario start.

mod console;
mod scenario;

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use anchorview_core::{ArExperience, ExperienceConfigExt};
use anchorview_types::ExperienceConfig;
use anchorview_types::formatting::{format_delay, format_physical};
use chrono::NaiveDateTime;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use console::{ConsoleScene, ConsoleSession, ConsoleStatus, ReplayClock};
use scenario::{Action, Scenario};

#[derive(Parser)]
#[command(name = "anchorview-validate")]
#[command(about = "Replay a scripted AR session through the anchorview core")]
struct Args {
    /// TOML scenario of timestamped session events
    #[arg(short, long)]
    scenario: PathBuf,

    /// Overlay image directory (overrides the configured one)
    #[arg(short, long)]
    images: Option<PathBuf>,

    /// Experience config TOML (defaults to the saved user config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep ticking this many seconds after the last step
    #[arg(long, default_value_t = 10.0)]
    settle: f64,

    /// Persist the effective config as the user config
    #[arg(long)]
    save_config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
    let _log_guard = init_logging();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ExperienceConfig::load(),
    };
    if let Some(images) = &args.images {
        config.overlay_directory = images.to_string_lossy().into_owned();
    }
    if args.save_config {
        config.save().map_err(|e| format!("Failed to save config: {}", e))?;
    }

    let scenario = Scenario::load(&args.scenario)?;
    let start = scenario.start_time();

    println!(
        "Scenario: {} ({} steps)",
        args.scenario.display(),
        scenario.steps.len()
    );
    println!(
        "Overlays: {}/*.{}",
        config.resolve_overlay_dir().display(),
        config.overlay_extension
    );
    println!(
        "Timing:   escalate after {}, restart cooldown {}, messages {}, look-around hint {}",
        format_delay(config.timing.escalation_delay_secs),
        format_delay(config.timing.restart_cooldown_secs),
        format_delay(config.timing.message_display_secs),
        format_delay(config.timing.look_around_hint_secs),
    );
    println!();

    let clock = ReplayClock::new(start);
    let (status, ui_counts) = ConsoleStatus::new(clock.clone());
    let (session, runs) = ConsoleSession::new(clock.clone());
    let (scene, applied) = ConsoleScene::new();

    let mut experience = ArExperience::launch(config, scene, Box::new(status), Box::new(session))
        .await
        .map_err(|e| format!("Failed to launch: {}", e))?;

    println!("Loaded {} overlay(s):", experience.catalog().len());
    for (i, overlay) in experience.catalog().iter().enumerate() {
        println!("  {:>3}  {}", i, overlay.name());
    }
    println!();

    for (now, action) in scenario.actions() {
        advance_to(&mut experience, &clock, now);
        clock.set(now);

        match action {
            Action::Start => experience.start(now),
            Action::Suspend => experience.suspend(),
            Action::Tick => experience.tick(now),
            Action::Signal(signal) => {
                tracing::debug!(?signal, "Dispatching");
                experience.handle_signal(&signal);
            }
        }
    }

    let end = scenario.time_at(scenario.duration_secs() + args.settle.max(0.0));
    advance_to(&mut experience, &clock, end);
    clock.set(end);
    experience.tick(end);

    let bindings: Vec<String> = {
        let mut bound: Vec<_> = experience.anchors().bindings().collect();
        bound.sort_by_key(|b| b.anchor);
        bound
            .iter()
            .map(|b| {
                format!(
                    "  anchor {} on node {} -> {} ({})",
                    b.anchor.0,
                    b.node.0,
                    experience.catalog().at(b.overlay_index).name(),
                    format_physical(&b.physical_size)
                )
            })
            .collect()
    };
    let cursor = experience.anchors().cursor();
    let tracking = experience.tracking().state();

    experience
        .shutdown()
        .map_err(|e| format!("Scene worker failed: {}", e))?;

    let counts = ui_counts.get();
    println!();
    println!("Summary");
    println!("  session runs:      {}", runs.get());
    println!("  messages shown:    {}", counts.shown);
    println!("  messages hidden:   {}", counts.hidden);
    println!("  error dialogs:     {}", counts.errors);
    println!("  geometry updates:  {}", applied.load(Ordering::Relaxed));
    println!("  tracking state:    {}", tracking.presentation().replace('\n', " / "));
    println!("  overlay cursor:    {}", cursor);
    println!("  bound anchors:     {}", bindings.len());
    for line in bindings {
        println!("{line}");
    }

    Ok(())
}

/// Fire every timer due before `until`, each at its own deadline.
fn advance_to(experience: &mut ArExperience, clock: &ReplayClock, until: NaiveDateTime) {
    while let Some(deadline) = experience.next_deadline()
        && deadline <= until
    {
        clock.set(deadline);
        experience.tick(deadline);
    }
}

fn load_config(path: &std::path::Path) -> Result<ExperienceConfig, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
}

/// Log to stderr, or to the file named by `ANCHORVIEW_LOG_PATH`.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    if let Ok(path) = std::env::var("ANCHORVIEW_LOG_PATH")
        && let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
    {
        let (writer, guard) = tracing_appender::non_blocking(file);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
            .init();
        return Some(guard);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_writer(std::io::stderr)
        .init();
    None
}
