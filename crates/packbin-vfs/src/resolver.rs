//! Path resolution and fallback keys.
//!
//! A registry lookup key is the reference's string form used verbatim; the
//! resolver's job is rejecting unusable references early and enumerating the
//! fallback keys that tolerate callers who inconsistently prefix relative
//! paths with `./`.
//!
//! # Examples
//!
//! ```
//! use packbin_vfs::resolver;
//!
//! let keys = resolver::candidate_keys("assets/a.txt");
//! assert_eq!(keys, vec!["assets/a.txt".to_string(), "./assets/a.txt".to_string()]);
//! ```

use crate::types::{Result, VfsError};

/// Produces the canonical lookup key for a path reference.
///
/// URL-like references contribute their full string form verbatim; plain
/// strings are used as-is. Nothing is trimmed or normalized beyond the
/// emptiness check.
///
/// # Errors
///
/// Returns `VfsError::InvalidPath` for an empty reference, before any I/O.
///
/// # Examples
///
/// ```
/// use packbin_vfs::resolver;
///
/// assert_eq!(resolver::canonical_key("./main.ts").unwrap(), "./main.ts");
/// assert!(resolver::canonical_key("").unwrap_err().is_invalid_path());
/// ```
pub fn canonical_key(reference: impl AsRef<str>) -> Result<String> {
    let reference = reference.as_ref();
    if reference.is_empty() {
        return Err(VfsError::InvalidPath {
            path: reference.to_string(),
        });
    }
    Ok(reference.to_string())
}

/// Enumerates fallback lookup keys for a canonical key, in probe order.
///
/// Tried in order, first hit wins: the exact key, the key prefixed with
/// `./` (after stripping any existing prefix first), and the key with a
/// leading `./` removed. Duplicates are elided so each key is probed once.
#[must_use]
pub fn candidate_keys(key: &str) -> Vec<String> {
    let stripped = key.strip_prefix("./").unwrap_or(key);
    let mut keys = vec![key.to_string()];
    for probe in [format!("./{stripped}"), stripped.to_string()] {
        if !keys.contains(&probe) {
            keys.push(probe);
        }
    }
    keys
}

/// Extracts the parent directory of a path.
///
/// Splits at the last path separator, choosing the separator style by
/// checking which one the path lacks. This is a heuristic for the two
/// common styles, not a general cross-platform path parser. Returns an
/// empty string when the path has no directory component.
#[must_use]
pub fn parent_dir(path: &str) -> &str {
    let sep = if !path.contains('/') && path.contains('\\') {
        '\\'
    } else {
        '/'
    };
    path.rfind(sep).map_or("", |index| &path[..index])
}
