//! Transit data error types.

use std::path::PathBuf;

use crate::domain::FeedScopedId;

/// Errors raised while loading or looking up transit data.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// No data partition has the requested router id
    #[error("unknown router: {0}")]
    RouterNotFound(String),

    /// A trip's stop times are inconsistent, or its id is taken
    #[error("corrupt trip {trip}: {reason}")]
    CorruptTrip { trip: FeedScopedId, reason: String },

    /// A stop record with no usable location
    #[error("corrupt stop {stop}: {reason}")]
    CorruptStop {
        stop: FeedScopedId,
        reason: &'static str,
    },

    /// A trip references a stop that was never added
    #[error("trip {trip} references unknown stop {stop}")]
    UnknownStop {
        trip: FeedScopedId,
        stop: FeedScopedId,
    },

    /// A trip references a calendar that was never added
    #[error("trip {trip} references unknown calendar {calendar}")]
    UnknownCalendar {
        trip: FeedScopedId,
        calendar: FeedScopedId,
    },

    /// Reading a feed from disk failed
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A feed file is not valid JSON or does not match the feed format
    #[error("invalid feed {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DataError::RouterNotFound("nyc".into());
        assert_eq!(err.to_string(), "unknown router: nyc");

        let err = DataError::CorruptTrip {
            trip: FeedScopedId::new("f", "t1"),
            reason: "stop times go backwards at stop 2".into(),
        };
        assert_eq!(
            err.to_string(),
            "corrupt trip f:t1: stop times go backwards at stop 2"
        );

        let err = DataError::UnknownStop {
            trip: FeedScopedId::new("f", "t1"),
            stop: FeedScopedId::new("f", "s9"),
        };
        assert_eq!(err.to_string(), "trip f:t1 references unknown stop f:s9");

        let err = DataError::Io {
            path: PathBuf::from("/data/feed.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "failed to read /data/feed.json: gone");
    }
}
