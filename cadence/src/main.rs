//! Batch entry point: one invocation is one reconciliation run.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reqwest::Url;
use tracing::{error, info};

use cadence::infrastructure::config::Settings;
use cadence::infrastructure::telemetry::TelemetryBuilder;
use cadence::pipeline::RunCoordinator;
use cadence::store::{TaskStore, WorkspaceClient, WorkspaceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::new().context("failed to load configuration")?;

    TelemetryBuilder::new("cadence").init()?;
    info!("cadence starting");

    let base_url =
        Url::parse(&settings.api.base_url).context("invalid API base URL in configuration")?;
    let config = WorkspaceConfig::new(
        settings.api.token.clone(),
        settings.api.database_id.clone(),
        settings.tasks.status_kind,
    )
    .with_base_url(base_url)
    .with_api_version(settings.api.version.clone())
    .with_timeout(Duration::from_secs(settings.api.timeout_secs));

    let store: Arc<dyn TaskStore> =
        Arc::new(WorkspaceClient::new(config).context("failed to build workspace client")?);
    let coordinator = RunCoordinator::new(store, &settings);

    match coordinator.run().await {
        Ok(summary) => {
            info!(%summary, "nightly run complete");
            println!("{summary}");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "nightly run failed");
            std::process::exit(1);
        }
    }
}
