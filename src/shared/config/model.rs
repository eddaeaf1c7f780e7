use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub aggregate: AggregateConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregateConfig {
    /// Write an explicit `is_empty` byte into state frames
    pub strict_serialization: bool,
    /// Upper bound on a single framed string accepted by the decoders
    #[serde(default = "default_max_field_len")]
    pub max_field_len: usize,
    /// Cap on distinct groups tracked by one sink
    pub group_limit: Option<usize>,
}

fn default_max_field_len() -> usize {
    usize::MAX
}

use std::env;

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path =
        env::var("GROUP_CONCAT_CONFIG").unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

pub fn load_settings_from(config_path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .set_default("logging.log_dir", "logs")?
        .set_default("logging.stdout_level", "info")?
        .set_default("logging.file_level", "debug")?
        .set_default("aggregate.strict_serialization", false)?
        .add_source(config::File::with_name(config_path).required(false))
        .add_source(config::Environment::with_prefix("GROUP_CONCAT").separator("__"))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
