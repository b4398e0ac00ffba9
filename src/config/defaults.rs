use std::time::Duration;

pub(super) fn default_position() -> String {
    "bottom-end".to_string()
}

pub(super) const fn default_autohide_delay() -> Duration {
    Duration::from_millis(3000)
}

pub(super) const fn default_exit_delay() -> Duration {
    Duration::from_millis(150)
}
