//! Key encoding for feed-scoped records and index entries.
//!
//! Keys are laid out so that range scans by prefix answer the two queries
//! the editor needs: "all records of a kind in a feed" and "all children of
//! a parent in a secondary index".
//!
//! # Key layouts
//!
//! - Record key: `<feed> 0x00 <id>`
//! - Index key: `<feed> 0x00 <parent> 0x00 <child>` (empty value;
//!   existence-only)
//!
//! The `0x00` separator keeps keys of one feed (or one parent) contiguous
//! and strictly ordered before any longer feed/parent ID sharing the same
//! prefix. Identifiers therefore must not contain NUL bytes; see
//! [`crate::types::is_valid_id`].

use crate::types::FeedId;

/// Separator byte between key components.
pub const KEY_SEPARATOR: u8 = 0x00;

/// Encode a record key for an entity in a feed.
#[must_use]
pub fn encode_record_key(feed: &FeedId, id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(feed.as_str().len() + 1 + id.len());
    key.extend_from_slice(feed.as_str().as_bytes());
    key.push(KEY_SEPARATOR);
    key.extend_from_slice(id.as_bytes());
    key
}

/// Decode the record ID out of a record key.
///
/// Returns `None` if the key is malformed (missing separator or non-UTF-8
/// ID).
#[must_use]
pub fn decode_record_id(key: &[u8]) -> Option<&str> {
    let sep = key.iter().position(|&b| b == KEY_SEPARATOR)?;
    std::str::from_utf8(&key[sep + 1..]).ok()
}

/// Encode an index key for a `(parent, child)` pair in a feed.
#[must_use]
pub fn encode_index_key(feed: &FeedId, parent: &str, child: &str) -> Vec<u8> {
    let mut key =
        Vec::with_capacity(feed.as_str().len() + 1 + parent.len() + 1 + child.len());
    key.extend_from_slice(feed.as_str().as_bytes());
    key.push(KEY_SEPARATOR);
    key.extend_from_slice(parent.as_bytes());
    key.push(KEY_SEPARATOR);
    key.extend_from_slice(child.as_bytes());
    key
}

/// Decode the child ID out of an index key.
#[must_use]
pub fn decode_index_child(key: &[u8]) -> Option<&str> {
    let first = key.iter().position(|&b| b == KEY_SEPARATOR)?;
    let rest = &key[first + 1..];
    let second = rest.iter().position(|&b| b == KEY_SEPARATOR)?;
    std::str::from_utf8(&rest[second + 1..]).ok()
}

/// Prefix covering every record of a feed.
#[must_use]
pub fn feed_prefix(feed: &FeedId) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(feed.as_str().len() + 1);
    prefix.extend_from_slice(feed.as_str().as_bytes());
    prefix.push(KEY_SEPARATOR);
    prefix
}

/// Prefix covering every index entry of one parent within a feed.
#[must_use]
pub fn index_parent_prefix(feed: &FeedId, parent: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(feed.as_str().len() + 1 + parent.len() + 1);
    prefix.extend_from_slice(feed.as_str().as_bytes());
    prefix.push(KEY_SEPARATOR);
    prefix.extend_from_slice(parent.as_bytes());
    prefix.push(KEY_SEPARATOR);
    prefix
}

/// The first key that would NOT match the given prefix.
///
/// Prefixes produced by this module always end in the separator byte, so
/// incrementing the final byte never overflows.
#[must_use]
pub fn prefix_end(prefix: &[u8]) -> Vec<u8> {
    let mut end = prefix.to_vec();
    if let Some(last) = end.last_mut() {
        *last += 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed() -> FeedId {
        FeedId::new("feed1")
    }

    #[test]
    fn record_key_roundtrip() {
        let key = encode_record_key(&feed(), "route-1");
        assert_eq!(decode_record_id(&key), Some("route-1"));
    }

    #[test]
    fn index_key_roundtrip() {
        let key = encode_index_key(&feed(), "r1", "t1");
        assert_eq!(decode_index_child(&key), Some("t1"));
    }

    #[test]
    fn keys_of_one_feed_are_contiguous() {
        let prefix = feed_prefix(&feed());
        let end = prefix_end(&prefix);

        let inside = encode_record_key(&feed(), "zzz");
        let other = encode_record_key(&FeedId::new("feed2"), "aaa");

        assert!(inside.as_slice() >= prefix.as_slice());
        assert!(inside.as_slice() < end.as_slice());
        assert!(other.as_slice() >= end.as_slice());
    }

    #[test]
    fn parent_prefix_excludes_longer_parent_ids() {
        // Parent "r1" must not pick up children of parent "r10".
        let prefix = index_parent_prefix(&feed(), "r1");
        let end = prefix_end(&prefix);

        let child_of_r1 = encode_index_key(&feed(), "r1", "t1");
        let child_of_r10 = encode_index_key(&feed(), "r10", "t1");

        assert!(child_of_r1.as_slice() >= prefix.as_slice());
        assert!(child_of_r1.as_slice() < end.as_slice());
        assert!(child_of_r10.as_slice() >= end.as_slice());
    }

    #[test]
    fn children_scan_in_order() {
        let a = encode_index_key(&feed(), "r1", "a");
        let b = encode_index_key(&feed(), "r1", "b");
        assert!(a < b);
    }
}
