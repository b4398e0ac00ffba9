use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Placement of the toast container on screen. Interpreted by the renderer only.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopStart,
    TopCenter,
    TopEnd,
    BottomStart,
    BottomCenter,
    #[default]
    BottomEnd,
}

impl Position {
    pub const ALL: [Self; 6] = [
        Self::TopStart,
        Self::TopCenter,
        Self::TopEnd,
        Self::BottomStart,
        Self::BottomCenter,
        Self::BottomEnd,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopStart => "top-start",
            Self::TopCenter => "top-center",
            Self::TopEnd => "top-end",
            Self::BottomStart => "bottom-start",
            Self::BottomCenter => "bottom-center",
            Self::BottomEnd => "bottom-end",
        }
    }

    #[must_use]
    pub const fn is_top(self) -> bool {
        matches!(self, Self::TopStart | Self::TopCenter | Self::TopEnd)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| format!("unknown position: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::Position;
    use std::str::FromStr;

    #[test]
    fn position_from_str_accepts_variants() {
        assert_eq!(Position::from_str("top-start"), Ok(Position::TopStart));
        assert_eq!(Position::from_str("BOTTOM_center"), Ok(Position::BottomCenter));
        assert_eq!(Position::from_str(" top-end "), Ok(Position::TopEnd));
        assert!(Position::from_str("middle").is_err());
    }

    #[test]
    fn position_round_trips_through_display() {
        for position in Position::ALL {
            assert_eq!(Position::from_str(&position.to_string()), Ok(position));
        }
    }

    #[test]
    fn default_position_is_bottom_end() {
        assert_eq!(Position::default(), Position::BottomEnd);
        assert!(!Position::default().is_top());
    }
}
