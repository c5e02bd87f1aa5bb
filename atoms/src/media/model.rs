use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::PersistenceError;

/// Prefix for ids minted in the editor before the record is persisted.
pub const PENDING_ID_PREFIX: &str = "tmp-";

/// Anything that lives in an [`OrderedList`](super::OrderedList).
pub trait Sequenced {
    fn id(&self) -> &str;
    fn sequence(&self) -> u32;
    fn set_sequence(&mut self, sequence: u32);
}

/// One uploaded image attached to a product.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    #[serde(default = "pending_id")]
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub sequence: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl ImageRecord {
    /// A freshly uploaded record that has not been saved yet.
    pub fn pending(url: impl Into<String>, alt_text: Option<String>) -> Self {
        Self {
            id: pending_id(),
            url: url.into(),
            alt_text,
            sequence: 0,
            is_active: true,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.id.starts_with(PENDING_ID_PREFIX)
    }
}

impl Sequenced for ImageRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn sequence(&self) -> u32 {
        self.sequence
    }

    fn set_sequence(&mut self, sequence: u32) {
        self.sequence = sequence;
    }
}

/// Drag-and-drop move as sent by the admin UI. Indices are signed because spurious drag
/// events can report `-1`; those are dropped before they reach the list.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ReorderRequest {
    pub from: i64,
    pub to: i64,
}

impl ReorderRequest {
    pub fn indices(&self) -> Option<(usize, usize)> {
        let from = usize::try_from(self.from).ok()?;
        let to = usize::try_from(self.to).ok()?;
        Some((from, to))
    }
}

pub fn pending_id() -> String {
    format!("{}{}", PENDING_ID_PREFIX, uuid::Uuid::new_v4())
}

/// Rejects image lists a client could send but the editor could never produce: records
/// without a url and ids used twice.
pub fn validate_images(records: &[ImageRecord]) -> Result<(), PersistenceError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if record.url.trim().is_empty() {
            return Err(PersistenceError::InvalidPayload(format!(
                "image {} has no url",
                record.id
            )));
        }
        if !seen.insert(record.id.as_str()) {
            return Err(PersistenceError::InvalidPayload(format!(
                "image id {} appears more than once",
                record.id
            )));
        }
    }
    Ok(())
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_records_without_id_get_a_pending_one() {
        let record: ImageRecord =
            serde_json::from_str(r#"{"url":"https://cdn/x.png","altText":"Cup","sequence":3}"#)
                .unwrap();

        assert!(record.is_pending());
        assert!(record.is_active);
        assert_eq!(record.alt_text.as_deref(), Some("Cup"));
        assert_eq!(record.sequence, 3);
    }

    fn record(id: &str, url: &str) -> ImageRecord {
        ImageRecord {
            id: id.to_string(),
            url: url.to_string(),
            alt_text: None,
            sequence: 0,
            is_active: true,
        }
    }

    #[test]
    fn blank_urls_and_repeated_ids_are_invalid() {
        assert!(validate_images(&[record("a", "https://cdn/a.png"), record("b", "https://cdn/b.png")]).is_ok());

        let blank = validate_images(&[record("a", "  ")]).unwrap_err();
        assert!(matches!(blank, PersistenceError::InvalidPayload(m) if m.contains("no url")));

        let repeated =
            validate_images(&[record("dup", "https://cdn/a.png"), record("dup", "https://cdn/b.png")])
                .unwrap_err();
        assert!(matches!(repeated, PersistenceError::InvalidPayload(m) if m.contains("more than once")));
    }

    #[test]
    fn negative_drag_indices_are_dropped() {
        assert_eq!(ReorderRequest { from: -1, to: 0 }.indices(), None);
        assert_eq!(ReorderRequest { from: 2, to: 0 }.indices(), Some((2, 0)));
    }
}
