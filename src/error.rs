use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A handle was used while no queue instance backs it: either it was never
    /// bound, or the owning `ToastQueue` has been dropped.
    #[error("toast queue used outside of an active queue instance")]
    Detached,
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("configuration error: {0}")]
    Other(String),
}

impl Error {
    /// Misuse of the queue API, as opposed to a bad deployment.
    #[must_use]
    pub const fn is_detached(&self) -> bool {
        matches!(self, Self::Detached)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, Error};

    #[test]
    fn config_errors_name_the_field() {
        let err = Error::from(ConfigError::InvalidField {
            field: "queue.max_entries",
            message: "must be greater than zero".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "invalid configuration for queue.max_entries: must be greater than zero"
        );
        assert!(!err.is_detached());
    }

    #[test]
    fn detached_is_reported_as_misuse() {
        assert!(Error::Detached.is_detached());
    }
}
