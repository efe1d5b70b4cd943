use clap::Parser;
use formgate::adapters::metrics_handler::MetricsCollector;
use formgate::adapters::options::CallbackRegistry;
use formgate::cli::Cli;
use formgate::config::{watcher::ConfigWatcher, Settings};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;

    if cli.check {
        info!("Configuration OK: {} form schema(s) loaded", settings.forms.len());
        return Ok(());
    }

    let host = settings.server.host.clone();
    let port = settings.server.port;
    info!("Starting Formgate form schema server on {}:{}", host, port);

    let settings = Arc::new(RwLock::new(settings));
    let metrics = Arc::new(MetricsCollector::new()?);

    // Reload the catalog when the config file or a schema file changes
    let settings_for_watcher = settings.clone();
    let metrics_for_watcher = metrics.clone();
    let cli_for_watcher = cli.clone();
    let paths = vec![
        cli.config.display().to_string(),
        cli.forms_dir
            .clone()
            .unwrap_or_else(|| "config/forms".to_string()),
    ];
    let _watcher = ConfigWatcher::new(paths, move || {
        match Settings::new_with_cli(&cli_for_watcher) {
            Ok(new_settings) => {
                let mut w = settings_for_watcher.blocking_write();
                *w = new_settings;
                metrics_for_watcher.config_reloads.inc();
                info!("Configuration reloaded successfully");
            }
            Err(e) => error!("Failed to reload configuration: {}", e),
        }
    })?;

    // Callback providers are registered here when formgate is embedded;
    // the standalone binary serves static and remote-descriptor sources.
    let callbacks = Arc::new(CallbackRegistry::new());

    let app = formgate::create_app(settings, callbacks, metrics);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
