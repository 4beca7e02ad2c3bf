//! Interactive terminal front-end for Forgequest.
//!
//! Reads one command per line from stdin and prints narrative to stdout.
//! Logs go to stderr. The forge keeps heating between commands, so a
//! player idling inside the blacksmith can die while the prompt waits; the
//! input loop races each line against the session's end signal for that
//! reason.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `forgequest-config.yaml`
//! 2. Build the OTLP exporters, if enabled
//! 3. Initialize structured logging (tracing)
//! 4. Create the starting world
//! 5. Start the session and its heat scheduler
//! 6. Start the gauge reporter and register the exported gauges
//! 7. Run the input loop until quit, EOF, or death
//! 8. Shut the session down, log the result, flush telemetry

mod error;
mod telemetry;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use forgequest_core::config::{GameConfig, LoggingConfig};
use forgequest_core::observer::{Gauges, TracingObserver};
use forgequest_core::session::{self, DEATH_BY_FIRE, EndReason, GameSession, Turn};
use opentelemetry::trace::TracerProvider as _;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{Instrument as _, debug, info, info_span, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

use crate::error::CliError;
use crate::telemetry::Telemetry;

/// Config file looked up in the working directory.
const CONFIG_FILE: &str = "forgequest-config.yaml";

/// Application entry point.
///
/// Exits with success when the player quits or closes stdin, and with
/// failure when the player dies.
#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Build the OTLP exporters.
    let mut telemetry = Telemetry::init(&config.telemetry)?;

    // 3. Initialize structured logging.
    init_logging(&config.logging, telemetry.as_ref());
    info!(
        tick_interval_ms = config.heat.tick_interval_ms,
        overheat_threshold = config.heat.overheat_threshold,
        gauge_interval_ms = config.telemetry.gauge_interval_ms,
        otlp_enabled = config.telemetry.otlp_enabled,
        "forgequest starting"
    );

    // 4. Create the starting world.
    let graph = forgequest_world::create_starting_world().map_err(CliError::from)?;

    // 5. Start the session.
    let (session, opening) = GameSession::start(&config.heat, graph, Arc::new(TracingObserver));
    println!("{opening}");

    // 6. Start the gauge reporter and the exported gauges.
    let reporter = spawn_gauge_reporter(session.gauges(), config.telemetry.gauge_interval_ms);
    if let Some(telemetry) = telemetry.as_mut() {
        telemetry.register_gauges(&session.gauges());
        info!(endpoint = %config.telemetry.otlp_endpoint, "OTLP export enabled");
    }

    // 7. Play.
    let reason = play(&session).await?;

    // 8. Shut down.
    session.shutdown().await;
    if let Some(handle) = reporter {
        handle.abort();
    }
    let state = session.snapshot().await;
    session::log_session_end(reason, &state, session.elapsed_seconds());
    if let Some(telemetry) = telemetry {
        if let Err(e) = tokio::task::spawn_blocking(move || telemetry.shutdown()).await {
            warn!(error = %e, "Telemetry shutdown task failed");
        }
    }

    if reason.is_fatal() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Run the input loop until the session ends or stdin closes.
async fn play(session: &GameSession) -> Result<EndReason, CliError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            reason = session.wait_for_end() => {
                announce(reason);
                return Ok(reason);
            }
        };

        let Some(line) = line else {
            info!("stdin closed");
            return Ok(EndReason::PlayerQuit);
        };
        if line.trim().is_empty() {
            continue;
        }

        let span = info_span!("command", command = line.trim());
        match session.process_command(&line).instrument(span).await {
            Ok(Turn::Continue(narrative)) => println!("{narrative}"),
            Ok(Turn::Ended { narrative, reason }) => {
                println!("{narrative}");
                return Ok(reason);
            }
            Err(session::SessionError::Ended(reason)) => {
                announce(reason);
                return Ok(reason);
            }
        }
    }
}

/// Closing line for a session that ended outside the player's command.
fn announce(reason: EndReason) {
    match reason {
        EndReason::BurnedToDeath => println!("{DEATH_BY_FIRE}"),
        EndReason::PlayerQuit | EndReason::Shutdown => println!("The adventure is over."),
    }
}

/// Periodically log the gauge values. Returns `None` when disabled.
fn spawn_gauge_reporter(gauges: Arc<Gauges>, interval_ms: u64) -> Option<JoinHandle<()>> {
    if interval_ms == 0 {
        return None;
    }
    let period = Duration::from_millis(interval_ms);
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            debug!(
                current_heat = gauges.current_heat(),
                has_sword = gauges.has_sword(),
                "gauges"
            );
        }
    }))
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// With `otel`, spans and the events inside them are also exported over
/// OTLP.
fn init_logging(logging: &LoggingConfig, otel: Option<&Telemetry>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(otel.map(|otel| {
            tracing_opentelemetry::layer()
                .with_tracer(otel.tracer_provider().tracer(telemetry::SCOPE))
        }));
    if logging.json {
        registry.with(fmt_layer.json()).init();
    } else {
        registry.with(fmt_layer).init();
    }
}

/// Load `forgequest-config.yaml`, falling back to defaults when absent.
///
/// Environment overrides apply in both cases.
fn load_config() -> Result<GameConfig, CliError> {
    let config_path = Path::new(CONFIG_FILE);
    if config_path.exists() {
        return Ok(GameConfig::from_file(config_path)?);
    }
    let mut config = GameConfig::default();
    config.apply_overrides(|name| std::env::var(name).ok())?;
    config.validate()?;
    Ok(config)
}
