//! Snapshot codec: the embeddable form of the registry.
//!
//! A snapshot is a mapping from path to an ordered sequence of byte values.
//! Encoded, it is a JSON object literal (`{"a.txt":[104,105]}`), which is
//! valid source text in any language with object literals, so it embeds directly
//! inside generated bootstrap code rather than shipping as a separate file.
//!
//! # Examples
//!
//! ```
//! use packbin_vfs::Snapshot;
//!
//! let mut snapshot = Snapshot::new();
//! snapshot.insert("a.txt", b"hi".to_vec());
//!
//! let encoded = snapshot.encode().unwrap();
//! assert_eq!(encoded, r#"{"a.txt":[104,105]}"#);
//! assert_eq!(Snapshot::decode(&encoded).unwrap(), snapshot);
//! ```

use crate::types::{Result, VfsError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A serialized-form view of the registry's contents at one point in time.
///
/// Entries are held in sorted key order so the encoded literal is
/// byte-reproducible across runs; lookups are by key, so the order carries
/// no semantic weight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot(BTreeMap<String, Vec<u8>>);

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Creates a snapshot from pre-built entries.
    #[must_use]
    pub const fn from_entries(entries: BTreeMap<String, Vec<u8>>) -> Self {
        Self(entries)
    }

    /// Adds (or replaces) an entry.
    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.0.insert(path.into(), bytes);
    }

    /// Returns the byte content stored for a path, if present.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.0.get(path).map(Vec::as_slice)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the snapshot holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over entries in sorted path order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<u8>)> {
        self.0.iter()
    }

    /// Consumes the snapshot, yielding its entries.
    #[must_use]
    pub fn into_entries(self) -> BTreeMap<String, Vec<u8>> {
        self.0
    }

    /// Renders the snapshot as an embeddable object literal.
    ///
    /// Each entry's content becomes an ordered sequence of unsigned 8-bit
    /// integers. The output is self-contained source text, not a file
    /// reference.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::SnapshotEncode` if serialization fails.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|source| VfsError::SnapshotEncode { source })
    }

    /// Parses an encoded literal back into a snapshot.
    ///
    /// Used at packaged-executable startup to reconstitute the registry's
    /// initial contents. Round-trips losslessly with [`Snapshot::encode`]
    /// for any byte content, including non-text data.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::SnapshotDecode` if the literal is malformed.
    pub fn decode(encoded: &str) -> Result<Self> {
        serde_json::from_str(encoded).map_err(|source| VfsError::SnapshotDecode { source })
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a String, &'a Vec<u8>);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_renders_byte_values() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("assets/b.bin", vec![0, 255, 128]);
        assert_eq!(snapshot.encode().unwrap(), r#"{"assets/b.bin":[0,255,128]}"#);
    }

    #[test]
    fn test_round_trip_all_byte_values() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("full.bin", (0..=u8::MAX).collect());
        let decoded = Snapshot::decode(&snapshot.encode().unwrap()).unwrap();
        assert_eq!(decoded, snapshot);
        assert_eq!(decoded.get("full.bin").unwrap().len(), 256);
    }

    #[test]
    fn test_round_trip_zero_length_entry() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("empty", Vec::new());
        let decoded = Snapshot::decode(&snapshot.encode().unwrap()).unwrap();
        assert_eq!(decoded.get("empty"), Some(&[][..]));
    }

    #[test]
    fn test_encode_sorted_order() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("b.txt", vec![1]);
        snapshot.insert("a.txt", vec![2]);
        assert_eq!(snapshot.encode().unwrap(), r#"{"a.txt":[2],"b.txt":[1]}"#);
    }

    #[test]
    fn test_decode_malformed_literal() {
        let error = Snapshot::decode("{not json").unwrap_err();
        assert!(error.is_snapshot_codec());
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::new();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.encode().unwrap(), "{}");
    }
}
