use std::str::FromStr;
use tracing::Level;
use crate::core::domain::Configuration;

// LogFormat selects how log lines are written for a binary
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

pub fn parse_level(level: &str) -> Level {
    Level::from_str(level.trim()).unwrap_or(Level::INFO)
}

pub fn setup_tracing(config: &Configuration, format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(parse_level(config.log_level.as_str()))
        // disable printing the name of the module in every log line.
        .with_target(false);
    // try_init leaves an already installed subscriber in place.
    let _ = match format {
        LogFormat::Json => builder.with_ansi(false).json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
}
