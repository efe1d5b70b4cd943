use clap::Parser;
use std::path::PathBuf;

/// Formgate - dynamic form schema server
#[derive(Parser, Debug, Clone)]
#[command(name = "formgate", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "FORMGATE_CONFIG", default_value = "formgate.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "FORMGATE_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "FORMGATE_PORT")]
    pub port: Option<u16>,

    /// Directory containing form schema files (json/yaml/toml)
    #[arg(long, env = "FORMGATE_FORMS_DIR")]
    pub forms_dir: Option<String>,

    /// Validate the configuration and schema catalog, then exit
    #[arg(long)]
    pub check: bool,
}
