// SPDX-License-Identifier: MIT OR Apache-2.0
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Ordered severity levels, most severe first.
///
/// The numeric value of a level is its severity rank: lower means more
/// severe. [`Level::ALL`] iterates the registry in that order, and the
/// derived `Ord` agrees with it, so `level <= threshold` reads as
/// "at least as severe as the threshold".
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// System is unusable
    Emergency = 0,
    /// Action must be taken immediately
    Alert = 1,
    /// Runtime error
    Error = 2,
    /// Suspicious condition
    Warning = 3,
    /// Normal operational message
    Info = 4,
    /// Coarse debugging
    Debug1 = 5,
    /// Detailed debugging
    Debug2 = 6,
    /// Firehose
    Debug3 = 7,
}

impl Level {
    /// Every level, in severity order (most severe first).
    pub const ALL: [Level; 8] = [
        Level::Emergency,
        Level::Alert,
        Level::Error,
        Level::Warning,
        Level::Info,
        Level::Debug1,
        Level::Debug2,
        Level::Debug3,
    ];

    /// The canonical lowercase name of this level.
    pub const fn name(self) -> &'static str {
        match self {
            Level::Emergency => "emergency",
            Level::Alert => "alert",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
            Level::Debug1 => "debug1",
            Level::Debug2 => "debug2",
            Level::Debug3 => "debug3",
        }
    }

    /// The numeric severity rank; `0` is most severe, `7` least.
    pub const fn severity(self) -> u8 {
        self as u8
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing a string that names no known level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level `{0}`")]
pub struct ParseLevelError(String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "emergency" => Ok(Level::Emergency),
            "alert" => Ok(Level::Alert),
            "error" => Ok(Level::Error),
            "warning" => Ok(Level::Warning),
            "info" => Ok(Level::Info),
            "debug1" => Ok(Level::Debug1),
            "debug2" => Ok(Level::Debug2),
            "debug3" => Ok(Level::Debug3),
            _ => Err(ParseLevelError(s.to_owned())),
        }
    }
}

/*
Boilerplate notes.

# Level

Copy is obvious for a fieldless enum.
PartialOrd/Ord are load-bearing: the whole filtering model is "lower discriminant = more severe",
so the derive must agree with the declaration order above. Don't reorder variants.
Hash for completeness (levels as map keys in downstream sinks).
Default is deliberately absent; there is no universally sensible default severity,
the threshold default lives in Settings instead.
Display prints the registry name, which is what transports should render.
*/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_order() {
        for pair in Level::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].severity() < pair[1].severity());
        }
        assert_eq!(Level::Emergency.severity(), 0);
        assert_eq!(Level::Error.severity(), 2);
        assert_eq!(Level::Debug3.severity(), 7);
    }

    #[test]
    fn names_round_trip() {
        for level in Level::ALL {
            assert_eq!(level.name().parse::<Level>().unwrap(), level);
            assert_eq!(level.to_string(), level.name());
        }
        assert_eq!("ERROR".parse::<Level>().unwrap(), Level::Error);
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn serde_uses_registry_names() {
        assert_eq!(
            serde_json::to_string(&Level::Warning).unwrap(),
            "\"warning\""
        );
        assert_eq!(
            serde_json::from_str::<Level>("\"debug2\"").unwrap(),
            Level::Debug2
        );
        assert!(serde_json::from_str::<Level>("\"loud\"").is_err());
    }
}
