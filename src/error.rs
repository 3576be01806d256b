use thiserror::Error;

/// Misuse of the enable/disable lifecycle.
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("plugin already enabled")]
    AlreadyEnabled,

    #[error("plugin already disabled")]
    AlreadyDisabled,

    #[error("could not spawn poller thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// A configuration value that is not well-formed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("refresh interval must be greater than zero")]
    ZeroInterval,

    #[error("refresh interval of {0}s is too long")]
    IntervalTooLong(u64),

    #[error("invalid feed url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Failure to read or write the persisted watermark.
#[derive(Error, Debug)]
pub enum WatermarkError {
    #[error("could not load storage data: {0}")]
    Load(anyhow::Error),

    #[error("could not parse storage data: {0}")]
    Parse(serde_json::Error),

    #[error("could not encode storage data: {0}")]
    Encode(serde_json::Error),

    #[error("could not save storage data: {0}")]
    Save(anyhow::Error),
}
