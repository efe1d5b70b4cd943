use anyhow::Context;
use config::{Config, File};
use serde::{Deserialize, Serialize};

pub mod validator;
pub mod watcher;

use crate::cli::Cli;
use crate::domain::FormSchema;

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    /// The form schema catalog, keyed by activity. Populated from the
    /// config file's `forms` array and from the forms directory.
    #[serde(default)]
    pub forms: Vec<FormSchema>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_root(".")
    }

    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let config_path = &cli.config;
        // A bare file name like "formgate.toml" has parent "", not "."
        let root = config_path
            .parent()
            .and_then(|p| p.to_str())
            .filter(|p| !p.is_empty())
            .unwrap_or(".");

        let s = Config::builder()
            .add_source(File::from(config_path.clone()).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;

        // CLI > env vars > config file
        if let Some(host) = &cli.host {
            settings.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            settings.server.port = port;
        }

        let forms_dir = cli
            .forms_dir
            .clone()
            .unwrap_or_else(|| format!("{}/config/forms", root));
        settings.load_forms_from_dir(&forms_dir)?;

        settings.validated()
    }

    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        let config_path = std::path::Path::new(root).join("formgate");
        let s = Config::builder()
            .add_source(File::from(config_path).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;

        settings.load_forms_from_dir(&format!("{}/config/forms", root))?;

        settings.validated()
    }

    fn validated(self) -> Result<Self, anyhow::Error> {
        validator::ConfigValidator::validate(&self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })?;
        Ok(self)
    }

    /// Look up a form schema by activity identifier.
    pub fn form(&self, activity: &str) -> Option<&FormSchema> {
        self.forms.iter().find(|f| f.activity == activity)
    }

    fn load_forms_from_dir(&mut self, path: &str) -> Result<(), anyhow::Error> {
        let pattern = format!("{}/*", path);
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) => {
                    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                        if matches!(ext, "json" | "yaml" | "yml" | "toml") {
                            let content = std::fs::read_to_string(&path).with_context(|| {
                                format!("Failed to read form schema {}", path.display())
                            })?;
                            let form: FormSchema = match ext {
                                "json" => serde_json::from_str(&content).map_err(anyhow::Error::from),
                                "toml" => toml::from_str(&content).map_err(anyhow::Error::from),
                                _ => serde_yaml::from_str(&content).map_err(anyhow::Error::from),
                            }
                            .with_context(|| {
                                format!("Failed to parse form schema {}", path.display())
                            })?;
                            tracing::debug!(activity = %form.activity, path = %path.display(), "Loaded form schema");
                            self.forms.push(form);
                        }
                    }
                }
                Err(e) => tracing::warn!("Failed to read glob entry: {}", e),
            }
        }
        Ok(())
    }
}
