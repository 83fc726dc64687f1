//! Search objectives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown optimize type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown optimize type: {name}")]
pub struct InvalidOptimizeType {
    name: String,
}

/// The objective a search optimizes for.
///
/// `Transfers` is a legacy objective kept only so that old clients can
/// still send it; validation rewrites it to `Quick` plus a transfer
/// penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptimizeType {
    /// Fastest trip
    Quick,
    /// Safest streets (cycling)
    Safe,
    /// Flattest streets (cycling)
    Flat,
    /// Prefer greenways (cycling)
    Greenways,
    /// Deprecated: fewest transfers
    Transfers,
    /// Weighted mix of safety, slope and time
    Triangle,
}

impl OptimizeType {
    /// The query-string name of this objective.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizeType::Quick => "QUICK",
            OptimizeType::Safe => "SAFE",
            OptimizeType::Flat => "FLAT",
            OptimizeType::Greenways => "GREENWAYS",
            OptimizeType::Transfers => "TRANSFERS",
            OptimizeType::Triangle => "TRIANGLE",
        }
    }
}

impl FromStr for OptimizeType {
    type Err = InvalidOptimizeType;

    /// Parse an objective name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QUICK" => Ok(OptimizeType::Quick),
            "SAFE" => Ok(OptimizeType::Safe),
            "FLAT" => Ok(OptimizeType::Flat),
            "GREENWAYS" => Ok(OptimizeType::Greenways),
            "TRANSFERS" => Ok(OptimizeType::Transfers),
            "TRIANGLE" => Ok(OptimizeType::Triangle),
            _ => Err(InvalidOptimizeType {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OptimizeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
