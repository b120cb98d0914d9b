//! Unique identifiers for feeds and feed entities.
//!
//! GTFS identifiers are opaque strings, so every ID is a string-backed
//! newtype. IDs participate in ordered storage keys with a NUL separator,
//! which is why [`is_valid_id`] rejects empty strings and embedded NUL
//! bytes; the editor validates IDs at entity creation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Check whether a raw string is usable as an entity or feed identifier.
///
/// Valid identifiers are non-empty and contain no NUL bytes (NUL is the
/// key-encoding separator).
#[must_use]
pub fn is_valid_id(raw: &str) -> bool {
    !raw.is_empty() && !raw.bytes().any(|b| b == 0)
}

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a raw string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }
    };
}

string_id! {
    /// Identifier of a feed, the unit of transaction scoping.
    FeedId
}

string_id! {
    /// Identifier of a route within a feed.
    RouteId
}

string_id! {
    /// Identifier of a trip pattern. Pattern IDs are unique feed-wide,
    /// not per route.
    PatternId
}

string_id! {
    /// Identifier of a trip within a feed.
    TripId
}

string_id! {
    /// Identifier of a stop referenced by pattern stops and stop times.
    StopId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_roundtrip() {
        let id = RouteId::new("route-1");
        assert_eq!(id.as_str(), "route-1");
        assert_eq!(id.to_string(), "route-1");
    }

    #[test]
    fn ids_are_ordered() {
        let a = TripId::new("a");
        let b = TripId::new("b");
        assert!(a < b);
    }

    #[test]
    fn valid_ids() {
        assert!(is_valid_id("r1"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("bad\0id"));
    }
}
