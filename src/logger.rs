use crate::cli::LogLevel;
use env_logger::{Builder, Env};

const DEFAULT_LOGGING_LEVEL: &str = "info";

/// `--log-level` wins over the filter in `filter_var`, which wins over `info`
pub fn builder(level: Option<LogLevel>, filter_var: &str) -> Builder {
    let mut builder = Builder::from_env(Env::new().filter_or(filter_var, DEFAULT_LOGGING_LEVEL));
    if let Some(level) = level {
        builder.filter_level(level.into());
    }
    builder
}

pub fn init(level: Option<LogLevel>) {
    builder(level, env_logger::DEFAULT_FILTER_ENV).init();
}
