// Configuration loading

pub mod settings;

pub use settings::Settings;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("settings parse error: {0}")]
    Parse(String),

    #[error("invalid settings: {0}")]
    Invalid(String),
}
