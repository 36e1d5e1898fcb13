use std::sync::Arc;

use anyhow::Context;
use rollcall_core::config::load_config;
use rollcall_schedule::rule::{RecurrenceRule, ScheduleLimits};
use rollcall_service::error::ServiceError;
use rollcall_service::scheduling::SchedulingService;
use rollcall_service::store::{CourseId, MemoryStore, OccurrenceStore};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

const PREVIEW_COURSE: CourseId = CourseId(0);

/// Schedules each rule file in turn into an empty course and prints the
/// resulting occurrences as JSON. Rules that conflict with earlier ones are
/// reported and skipped.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();

    let config = load_config()?;

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping info");
    }

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        anyhow::bail!("usage: schedule-preview <rule.json>...");
    }

    let store = Arc::new(MemoryStore::new());
    let service = SchedulingService::new(
        Arc::clone(&store),
        ScheduleLimits::from(&config.schedule),
    );

    for path in &paths {
        let raw = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
        let rule: RecurrenceRule =
            serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))?;

        if let Some(repetition) = rule.repetition() {
            tracing::info!(%path, title = %rule.title, repeats = %repetition, "Expanding rule");
        }

        match service.schedule(PREVIEW_COURSE, &rule).await {
            Ok(lesson) => {
                tracing::info!(%path, count = lesson.occurrences.len(), "Rule scheduled");
            }
            Err(ServiceError::Conflict(conflict)) => {
                tracing::warn!(%path, %conflict, "Rule skipped");
            }
            Err(e) => return Err(e).with_context(|| format!("scheduling {path}")),
        }
    }

    let occurrences = store.load(PREVIEW_COURSE).await?;
    println!("{}", serde_json::to_string_pretty(&occurrences)?);
    Ok(())
}
