//! Change tracking for task updates.
//!
//! History is an explicit diff between the document as loaded and the
//! document about to be written. The caller performing the update computes it
//! and appends the entries; nothing is inferred from ambient state.
//!
//! Two concurrent updates of the same task each diff against their own
//! snapshot, so entries can be lost or duplicated under contention.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::task::{HistoryEntry, Task};
use crate::error::Result;

/// Document keys never recorded in history
pub const UNTRACKED_FIELDS: [&str; 6] = [
    "id",
    "history",
    "comments",
    "attachments",
    "createdAt",
    "updatedAt",
];

/// Entries for every tracked field whose value differs between `old` and `new`.
///
/// Entries are sorted by field name.
pub fn diff(
    old: &Task,
    new: &Task,
    changed_by: &str,
    changed_at: DateTime<Utc>,
) -> Result<Vec<HistoryEntry>> {
    let old_doc = serde_json::to_value(old)?;
    let new_doc = serde_json::to_value(new)?;

    let (Value::Object(old_fields), Value::Object(new_fields)) = (old_doc, new_doc) else {
        return Ok(Vec::new());
    };

    let mut entries: Vec<HistoryEntry> = new_fields
        .into_iter()
        .filter(|(field, _)| !UNTRACKED_FIELDS.contains(&field.as_str()))
        .filter_map(|(field, new_value)| {
            let old_value = old_fields.get(&field).cloned().unwrap_or(Value::Null);
            (old_value != new_value).then(|| HistoryEntry {
                field,
                old_value,
                new_value,
                changed_by: changed_by.to_string(),
                changed_at,
            })
        })
        .collect();
    entries.sort_by(|a, b| a.field.cmp(&b.field));

    Ok(entries)
}
