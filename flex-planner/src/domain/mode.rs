//! Traverse modes and mode sets.

use std::fmt;

use serde::{Serialize, Serializer};

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode: {name}")]
pub struct InvalidMode {
    name: String,
}

/// A single way of moving through the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraverseMode {
    Walk,
    Bicycle,
    Car,
    Tram,
    Subway,
    Rail,
    Bus,
    Ferry,
    CableCar,
    Gondola,
    Funicular,
    Flex,
}

impl TraverseMode {
    /// All modes, in bit order.
    pub const ALL: [TraverseMode; 12] = [
        TraverseMode::Walk,
        TraverseMode::Bicycle,
        TraverseMode::Car,
        TraverseMode::Tram,
        TraverseMode::Subway,
        TraverseMode::Rail,
        TraverseMode::Bus,
        TraverseMode::Ferry,
        TraverseMode::CableCar,
        TraverseMode::Gondola,
        TraverseMode::Funicular,
        TraverseMode::Flex,
    ];

    /// Fixed-route transit modes, the expansion of `TRANSIT`.
    pub const TRANSIT: [TraverseMode; 8] = [
        TraverseMode::Tram,
        TraverseMode::Subway,
        TraverseMode::Rail,
        TraverseMode::Bus,
        TraverseMode::Ferry,
        TraverseMode::CableCar,
        TraverseMode::Gondola,
        TraverseMode::Funicular,
    ];

    /// The query-string name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TraverseMode::Walk => "WALK",
            TraverseMode::Bicycle => "BICYCLE",
            TraverseMode::Car => "CAR",
            TraverseMode::Tram => "TRAM",
            TraverseMode::Subway => "SUBWAY",
            TraverseMode::Rail => "RAIL",
            TraverseMode::Bus => "BUS",
            TraverseMode::Ferry => "FERRY",
            TraverseMode::CableCar => "CABLE_CAR",
            TraverseMode::Gondola => "GONDOLA",
            TraverseMode::Funicular => "FUNICULAR",
            TraverseMode::Flex => "FLEX",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for TraverseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of traverse modes the rider is willing to use.
///
/// # Examples
///
/// ```
/// use flex_planner::domain::{ModeSet, TraverseMode};
///
/// let modes = ModeSet::parse("TRANSIT,WALK").unwrap();
/// assert!(modes.contains(TraverseMode::Bus));
/// assert!(modes.contains(TraverseMode::Walk));
/// assert!(!modes.contains(TraverseMode::Car));
/// assert!(!modes.contains(TraverseMode::Flex));
///
/// assert!(ModeSet::parse("WALK,HOVERCRAFT").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModeSet(u16);

impl ModeSet {
    /// An empty set.
    pub fn empty() -> Self {
        Self(0)
    }

    /// Parse a comma-separated list of mode names.
    ///
    /// Names are case-insensitive. `TRANSIT` adds every fixed-route transit
    /// mode. Blank entries are ignored.
    pub fn parse(s: &str) -> Result<Self, InvalidMode> {
        let mut set = Self::empty();
        for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let upper = name.to_ascii_uppercase();
            if upper == "TRANSIT" {
                for mode in TraverseMode::TRANSIT {
                    set.insert(mode);
                }
                continue;
            }
            let mode = TraverseMode::ALL
                .into_iter()
                .find(|m| m.as_str() == upper)
                .ok_or_else(|| InvalidMode {
                    name: name.to_string(),
                })?;
            set.insert(mode);
        }
        Ok(set)
    }

    /// Add a mode to the set.
    pub fn insert(&mut self, mode: TraverseMode) {
        self.0 |= mode.bit();
    }

    /// Check whether the set contains a mode.
    pub fn contains(&self, mode: TraverseMode) -> bool {
        self.0 & mode.bit() != 0
    }

    /// True if any fixed-route transit mode is present.
    pub fn has_transit(&self) -> bool {
        TraverseMode::TRANSIT.into_iter().any(|m| self.contains(m))
    }

    /// Returns true if no modes are set.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate over the modes in the set.
    pub fn iter(&self) -> impl Iterator<Item = TraverseMode> + use<> {
        let set = *self;
        TraverseMode::ALL.into_iter().filter(move |m| set.contains(*m))
    }
}

impl FromIterator<TraverseMode> for ModeSet {
    fn from_iter<I: IntoIterator<Item = TraverseMode>>(iter: I) -> Self {
        let mut set = Self::empty();
        for mode in iter {
            set.insert(mode);
        }
        set
    }
}

impl fmt::Debug for ModeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ModeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|m| m.as_str()).collect();
        f.write_str(&names.join(","))
    }
}

impl Serialize for ModeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|m| m.as_str()))
    }
}
