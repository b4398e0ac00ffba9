use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use crate::Result;
use crate::error::Error as ToastError;
use crate::types::Position;

mod defaults;
mod env;
mod raw;
mod serde;

pub(crate) use self::serde::HumantimeDuration;

/// Queue-level options. Resolved once when the queue is built; never copied
/// onto individual entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    pub position: Position,
    pub autohide_delay: Duration,
    /// `None` means unbounded.
    pub max_entries: Option<NonZeroUsize>,
}

/// Options of the console renderer shipped with the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// How long a hidden entry stays on screen before `remove` is issued.
    pub exit_delay: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    pub queue: QueueConfig,
    pub render: RenderSettings,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            position: Position::default(),
            autohide_delay: defaults::default_autohide_delay(),
            max_entries: None,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            exit_delay: defaults::default_exit_delay(),
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be parsed, when an environment
    /// override is malformed, or when a value fails validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path).map_err(ToastError::from)?;
        raw.apply_env_overrides().map_err(ToastError::from)?;
        raw.validate_and_build()
    }

    /// Same as [`Settings::from_env_and_file`] but from an in-memory TOML
    /// document, without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error when the document cannot be parsed or fails validation.
    pub fn from_toml_str(doc: &str) -> Result<Self> {
        raw::load_str(doc)
            .map_err(ToastError::from)?
            .validate_and_build()
    }
}

impl QueueConfig {
    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub const fn with_autohide_delay(mut self, delay: Duration) -> Self {
        self.autohide_delay = delay;
        self
    }

    #[must_use]
    pub const fn with_max_entries(mut self, max_entries: Option<NonZeroUsize>) -> Self {
        self.max_entries = max_entries;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{QueueConfig, Settings};
    use crate::error::{ConfigError, Error};
    use crate::types::Position;
    use std::num::NonZeroUsize;
    use std::time::Duration;

    #[test]
    fn defaults_match_recognised_options() {
        let config = QueueConfig::default();
        assert_eq!(config.position, Position::BottomEnd);
        assert_eq!(config.autohide_delay, Duration::from_millis(3000));
        assert_eq!(config.max_entries, None);
    }

    #[test]
    fn empty_document_yields_defaults() {
        let settings = match Settings::from_toml_str("") {
            Ok(settings) => settings,
            Err(err) => panic!("empty config should load: {err}"),
        };
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn toml_overrides_are_applied() {
        let doc = r#"
            [queue]
            position = "top-start"
            autohide_delay = "1500ms"
            max_entries = 10

            [render]
            exit_delay = "1s"
        "#;
        let settings = match Settings::from_toml_str(doc) {
            Ok(settings) => settings,
            Err(err) => panic!("config should load: {err}"),
        };
        assert_eq!(settings.queue.position, Position::TopStart);
        assert_eq!(settings.queue.autohide_delay, Duration::from_millis(1500));
        assert_eq!(settings.queue.max_entries, NonZeroUsize::new(10));
        assert_eq!(settings.render.exit_delay, Duration::from_secs(1));
    }

    #[test]
    fn zero_max_entries_is_rejected() {
        let err = Settings::from_toml_str("[queue]\nmax_entries = 0\n");
        assert!(matches!(
            err,
            Err(Error::Config(ConfigError::InvalidField {
                field: "queue.max_entries",
                ..
            }))
        ));
    }

    #[test]
    fn unknown_position_is_rejected() {
        let err = Settings::from_toml_str("[queue]\nposition = \"middle\"\n");
        assert!(matches!(
            err,
            Err(Error::Config(ConfigError::InvalidField {
                field: "queue.position",
                ..
            }))
        ));
    }

    #[test]
    fn builder_methods_override_fields() {
        let config = QueueConfig::default()
            .with_position(Position::TopCenter)
            .with_autohide_delay(Duration::from_secs(5))
            .with_max_entries(NonZeroUsize::new(3));
        assert_eq!(config.position, Position::TopCenter);
        assert_eq!(config.autohide_delay, Duration::from_secs(5));
        assert_eq!(config.max_entries, NonZeroUsize::new(3));
    }
}
