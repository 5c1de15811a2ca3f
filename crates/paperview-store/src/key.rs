//! Document key sanitization
//!
//! Every storage backend gates `open_document` on the same sanitizer: a key
//! must be its own basename (no path separators) and must not carry a
//! parent-directory segment. Object stores have no traversal concept, but
//! running both backends through one gate keeps the contract uniform and
//! guarantees the local backend can never resolve outside its root.

use crate::error::StoreError;

/// A key that passed sanitization.
///
/// Invariant: non-empty, equal to its own basename, free of `..`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeKey(String);

impl SafeKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for SafeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SafeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate a raw document key.
///
/// Rejects empty keys, keys containing a path separator, and keys containing
/// a `..` sequence. The `..` check is stricter than strict segment matching
/// on purpose: a key like `a..b.pdf` is rejected too, trading a sliver of
/// expressiveness for an unambiguous rule.
pub fn sanitize_key(raw: &str) -> Result<SafeKey, StoreError> {
    if raw.is_empty() {
        return Err(StoreError::InvalidKey("empty key".into()));
    }

    if raw.contains('/') || raw.contains('\\') {
        return Err(StoreError::InvalidKey(format!(
            "key contains a path separator: {raw}"
        )));
    }

    if raw.contains("..") || raw == "." {
        return Err(StoreError::InvalidKey(format!(
            "key contains a traversal segment: {raw}"
        )));
    }

    Ok(SafeKey(raw.to_string()))
}
