pub mod global;
pub mod model;

pub use global::CONFIG;
pub use model::{AggregateConfig, LoggingConfig, Settings, load_settings, load_settings_from};

#[cfg(test)]
mod model_test;
