//! Listing entry produced by storage backends

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use time::OffsetDateTime;

/// One document as reported by a backend listing.
///
/// Immutable once constructed; `name` is always derived from the last path
/// segment of `key` so nested object-store keys still display cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentItem {
    pub key: String,
    pub name: String,
    pub size: u64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_modified: Option<OffsetDateTime>,
}

impl DocumentItem {
    pub fn new(
        key: impl Into<String>,
        size: u64,
        last_modified: Option<OffsetDateTime>,
    ) -> Self {
        let key = key.into();
        let name = display_name(&key).to_string();
        Self {
            key,
            name,
            size,
            last_modified,
        }
    }
}

/// Last path segment of a key.
pub(crate) fn display_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Case-insensitive `.pdf` suffix check used by every listing.
pub(crate) fn is_pdf_key(key: &str) -> bool {
    let len = key.len();
    len >= 4 && key[len - 4..].eq_ignore_ascii_case(".pdf")
}

/// Sort newest first; items without a modification time sort as if stamped
/// at the epoch, i.e. after everything that has one.
pub(crate) fn sort_newest_first(items: &mut [DocumentItem]) {
    items.sort_by_key(|item| Reverse(item.last_modified.unwrap_or(OffsetDateTime::UNIX_EPOCH)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn name_is_last_path_segment() {
        let item = DocumentItem::new("reports/2024/q3.pdf", 10, None);
        assert_eq!(item.name, "q3.pdf");

        let flat = DocumentItem::new("manual.pdf", 10, None);
        assert_eq!(flat.name, "manual.pdf");
    }

    #[test]
    fn pdf_suffix_is_case_insensitive() {
        assert!(is_pdf_key("a.pdf"));
        assert!(is_pdf_key("a.PDF"));
        assert!(is_pdf_key("a.Pdf"));
        assert!(!is_pdf_key("a.pdf.txt"));
        assert!(!is_pdf_key("pdf"));
        assert!(!is_pdf_key(""));
    }

    #[test]
    fn sorts_newest_first_with_missing_timestamps_last() {
        let mut items = vec![
            DocumentItem::new("old.pdf", 1, Some(datetime!(2023-01-01 00:00 UTC))),
            DocumentItem::new("undated.pdf", 1, None),
            DocumentItem::new("new.pdf", 1, Some(datetime!(2025-06-01 00:00 UTC))),
        ];
        sort_newest_first(&mut items);
        let keys: Vec<_> = items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["new.pdf", "old.pdf", "undated.pdf"]);
    }

    #[test]
    fn serializes_with_camel_case_and_rfc3339() {
        let item = DocumentItem::new(
            "manual.pdf",
            42,
            Some(datetime!(2024-05-01 12:30 UTC)),
        );
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["key"], "manual.pdf");
        assert_eq!(json["name"], "manual.pdf");
        assert_eq!(json["size"], 42);
        assert_eq!(json["lastModified"], "2024-05-01T12:30:00Z");

        let undated = DocumentItem::new("manual.pdf", 42, None);
        let json = serde_json::to_value(&undated).unwrap();
        assert!(json["lastModified"].is_null());
    }
}
