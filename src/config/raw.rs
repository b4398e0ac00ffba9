use std::num::NonZeroUsize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use crate::Result;
use crate::error::ConfigError;
use crate::types::Position;

use super::defaults::{default_autohide_delay, default_exit_delay, default_position};
use super::env::{env_duration, env_parse, env_string};
use super::{HumantimeDuration, QueueConfig, RenderSettings, Settings};

const ENV_PREFIX: &str = "TOASTQ";

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawSettings, ConfigError> {
    let path = path.as_ref();
    let builder = ::config::Config::builder()
        .add_source(::config::File::from(path).required(false))
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );
    deserialize(builder)
}

pub(super) fn load_str(doc: &str) -> std::result::Result<RawSettings, ConfigError> {
    let builder = ::config::Config::builder()
        .add_source(::config::File::from_str(doc, ::config::FileFormat::Toml));
    deserialize(builder)
}

fn deserialize(
    builder: ::config::ConfigBuilder<::config::builder::DefaultState>,
) -> std::result::Result<RawSettings, ConfigError> {
    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub(super) struct RawSettings {
    #[serde(default)]
    pub(super) queue: RawQueue,
    #[serde(default)]
    pub(super) render: RawRender,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawQueue {
    #[serde(default = "default_position")]
    pub(super) position: String,
    #[serde(default = "default_autohide_delay")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) autohide_delay: Duration,
    #[serde(default)]
    pub(super) max_entries: Option<usize>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawRender {
    #[serde(default = "default_exit_delay")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) exit_delay: Duration,
}

impl RawSettings {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(position) = env_string("TOASTQ_POSITION")? {
            self.queue.position = position;
        }
        if let Some(delay) = env_duration("TOASTQ_AUTOHIDE_DELAY")? {
            self.queue.autohide_delay = delay;
        }
        if let Some(max_entries) = env_parse::<usize>("TOASTQ_MAX_ENTRIES")? {
            self.queue.max_entries = Some(max_entries);
        }
        if let Some(exit_delay) = env_duration("TOASTQ_EXIT_DELAY")? {
            self.render.exit_delay = exit_delay;
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Settings> {
        let position =
            Position::from_str(&self.queue.position).map_err(|err| ConfigError::InvalidField {
                field: "queue.position",
                message: err,
            })?;

        let max_entries = match self.queue.max_entries {
            None => None,
            Some(raw) => Some(NonZeroUsize::new(raw).ok_or(ConfigError::InvalidField {
                field: "queue.max_entries",
                message: "max entries must be greater than zero".to_string(),
            })?),
        };

        Ok(Settings {
            queue: QueueConfig {
                position,
                autohide_delay: self.queue.autohide_delay,
                max_entries,
            },
            render: RenderSettings {
                exit_delay: self.render.exit_delay,
            },
        })
    }
}

impl Default for RawQueue {
    fn default() -> Self {
        Self {
            position: default_position(),
            autohide_delay: default_autohide_delay(),
            max_entries: None,
        }
    }
}

impl Default for RawRender {
    fn default() -> Self {
        Self {
            exit_delay: default_exit_delay(),
        }
    }
}
