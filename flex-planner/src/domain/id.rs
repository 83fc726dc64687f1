//! Feed-scoped identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when parsing an invalid feed-scoped identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid feed-scoped id: {reason}")]
pub struct InvalidFeedScopedId {
    reason: &'static str,
}

/// An identifier qualified by the feed it was loaded from.
///
/// Two feeds may both contain a stop called `1`; `agency_a:1` and
/// `agency_b:1` keep them apart. The textual form is `feed:id`, split at
/// the first colon so that the local part may itself contain colons.
///
/// # Examples
///
/// ```
/// use flex_planner::domain::FeedScopedId;
///
/// let id = FeedScopedId::parse("metro:stop:42").unwrap();
/// assert_eq!(id.feed_id(), "metro");
/// assert_eq!(id.id(), "stop:42");
/// assert_eq!(id.to_string(), "metro:stop:42");
///
/// assert!(FeedScopedId::parse("no-feed").is_err());
/// assert!(FeedScopedId::parse(":42").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeedScopedId {
    feed_id: String,
    id: String,
}

impl FeedScopedId {
    /// Create an id from its two parts.
    pub fn new(feed_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            feed_id: feed_id.into(),
            id: id.into(),
        }
    }

    /// Parse an id from `feed:id` form.
    pub fn parse(s: &str) -> Result<Self, InvalidFeedScopedId> {
        let (feed_id, id) = s.split_once(':').ok_or(InvalidFeedScopedId {
            reason: "expected feed:id",
        })?;

        if feed_id.is_empty() {
            return Err(InvalidFeedScopedId {
                reason: "feed part must not be empty",
            });
        }
        if id.is_empty() {
            return Err(InvalidFeedScopedId {
                reason: "id part must not be empty",
            });
        }

        Ok(Self::new(feed_id, id))
    }

    /// Returns the feed part.
    pub fn feed_id(&self) -> &str {
        &self.feed_id
    }

    /// Returns the feed-local part.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for FeedScopedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.feed_id, self.id)
    }
}

impl FromStr for FeedScopedId {
    type Err = InvalidFeedScopedId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for FeedScopedId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FeedScopedId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
