use anyhow::Result;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;
use tracing::{error, info};

/// Watches the config file and the forms directory, invoking the reload
/// callback on any change.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    pub fn new<F>(paths: Vec<String>, on_change: F) -> Result<Self>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(tx, Config::default())?;

        for path in &paths {
            if Path::new(path).exists() {
                watcher.watch(Path::new(path), RecursiveMode::Recursive)?;
                info!("Watching schema path: {}", path);
            } else {
                tracing::warn!("Schema path does not exist, skipping: {}", path);
            }
        }

        std::thread::spawn(move || loop {
            match rx.recv() {
                Ok(Ok(_event)) => {
                    // Editors fire several events per save; settle briefly.
                    std::thread::sleep(Duration::from_millis(100));
                    info!("Form schema change detected, reloading...");
                    on_change();
                }
                Ok(Err(e)) => error!("Watch error: {:?}", e),
                Err(e) => {
                    error!("Watch channel error: {:?}", e);
                    break;
                }
            }
        });

        Ok(Self { _watcher: watcher })
    }
}
