//! Scenario runner entry point.
mod config;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::HarnessConfig;
use runtime::{Event, Runtime, Scenario, ScenarioRunner, Topic};
use sim_core::{ActorId, Audience, Feedback, FeedbackSink};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = HarnessConfig::from_env();
    let _guard = setup_logging(&config)?;

    let mut scenario = Scenario::load_from_file(&config.scenario)
        .with_context(|| format!("Failed to load scenario {}", config.scenario.display()))?;
    if let Some(tick_interval_ms) = config.tick_interval_ms {
        scenario.sim.tick_interval_ms = tick_interval_ms;
    }
    if let Some(seed) = config.seed {
        scenario.seed = seed;
    }

    let runtime = Runtime::builder()
        .config(scenario.runtime_config())
        .feedback(Arc::new(TracingFeedback))
        .build()
        .await?;
    let handle = runtime.handle();
    let loggers = spawn_event_loggers(handle.subscribe_multiple(&Topic::ALL));

    info!(
        target: "harness",
        scenario = %scenario.name,
        ticks = config.ticks,
        tick_interval_ms = scenario.sim.tick_interval_ms,
        seed = scenario.seed,
        "running scenario"
    );
    let mut runner = ScenarioRunner::setup(scenario, &handle).await?;
    let end = runner.run(&handle, config.ticks).await?;

    for actor in runner.actor_ids() {
        if let Some(snapshot) = handle.query_actor(actor).await? {
            info!(target: "harness", snapshot = %serde_json::to_string(&snapshot)?, "final state");
        }
    }
    info!(target: "harness", %end, finished = runner.is_finished(), "scenario complete");

    drop(handle);
    runtime.shutdown().await?;
    for logger in loggers {
        logger.await?;
    }

    Ok(())
}

/// Writes observer feedback to the log.
struct TracingFeedback;

impl FeedbackSink for TracingFeedback {
    fn send(&self, actor: ActorId, audience: Audience, feedback: Feedback) {
        info!(
            target: "harness::feedback",
            %actor,
            %audience,
            code = feedback.code(),
            ?feedback,
        );
    }
}

/// One task per topic; each ends when the runtime drops the bus.
fn spawn_event_loggers(
    receivers: HashMap<Topic, broadcast::Receiver<Event>>,
) -> Vec<JoinHandle<()>> {
    receivers
        .into_iter()
        .map(|(topic, mut rx)| {
            tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(event) => match serde_json::to_string(&event) {
                            Ok(json) => info!(target: "harness::events", ?topic, event = %json),
                            Err(err) => warn!(target: "harness::events", ?topic, %err, "unserializable event"),
                        },
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(target: "harness::events", ?topic, skipped, "event log lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            })
        })
        .collect()
}

/// Setup logging to both stderr and a session log file.
fn setup_logging(config: &HarnessConfig) -> Result<WorkerGuard> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let log_dir = config.log_dir.clone().unwrap_or_else(default_log_dir);
    let session_id = config.session_id.clone().unwrap_or_else(|| {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        format!("session_{}", timestamp)
    });

    let session_log_dir = log_dir.join(&session_id);
    std::fs::create_dir_all(&session_log_dir).with_context(|| {
        format!("Failed to create log directory {}", session_log_dir.display())
    })?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "harness.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    info!("Logging initialized: session={}", session_id);
    info!("Log file: {}/harness.log", session_log_dir.display());

    Ok(guard)
}

/// Platform cache directory, e.g. `~/.cache/casting-sim/logs` on Linux.
fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "casting-sim")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/casting-sim"))
        .join("logs")
}
