mod bootstrap;
mod report;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use exposure_core::categories::CategoryRegistry;
use exposure_core::settings::Settings;
use exposure_runtime::data_manager::DataManager;
use exposure_runtime::orchestrator::LoadOrchestrator;
use exposure_runtime::source::source_from_settings;
use exposure_ui::app::{self, App};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::resolve();

    let monitor_dir = bootstrap::ensure_directories()?;
    let log_file = match (&settings.log_file, settings.view.as_str()) {
        (Some(path), _) => Some(path.clone()),
        (None, "dashboard") => Some(bootstrap::default_log_file(&monitor_dir)),
        (None, _) => None,
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Keyword exposure monitor v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Category: {}, Theme: {}",
        settings.view,
        settings.category,
        settings.theme
    );

    let registry = Arc::new(CategoryRegistry::load_or_builtin(settings.config.as_deref())?);
    let selection = bootstrap::category_selection(&settings, &registry)?;
    let query = bootstrap::list_query(&settings)?;
    let source = source_from_settings(&settings)?;
    let manager = Arc::new(DataManager::new(Arc::clone(&registry), source));

    match settings.view.as_str() {
        "dashboard" => {
            let refresh = Duration::from_secs(u64::from(settings.refresh_rate));
            let orchestrator = LoadOrchestrator::new(manager, Some(refresh));
            let (rx, handle) = orchestrator.start();

            let dashboard = App::new(&settings.theme, registry, selection, query);

            // 'q' / Ctrl+C are handled inside the TUI while in raw mode; the
            // signal branch covers a SIGINT delivered from elsewhere.
            tokio::select! {
                result = dashboard.run(rx, handle) => result?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down");
                    app::restore_terminal()?;
                }
            }
        }

        "report" => {
            let dataset = manager.load().await?;
            let report = report::build(&registry, &dataset, &selection, &query)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        unknown => anyhow::bail!("Unknown view mode: {unknown}"),
    }

    Ok(())
}
