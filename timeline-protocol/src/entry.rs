use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::label::EntryLabel;

/// Upper bound the schema places on entry titles.
pub const TITLE_MAX_LEN: usize = 512;
/// Upper bound the schema places on entry bodies.
pub const VALUE_MAX_LEN: usize = 2048;

/// Materialised view of a record stored in the timeline table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: u32,
    pub title: String,
    pub value: String,
    pub label: EntryLabel,
    pub deleted: bool,
    pub event_time: DateTime<Utc>,
    /// Absent in the label-filtered listing, which projects a narrower row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
}

/// Payload for inserting a new entry or overwriting an existing one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDraft {
    #[serde(default)]
    pub title: String,
    pub value: String,
    #[serde(default)]
    pub label: EntryLabel,
    /// When unset the store stamps the insertion instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_time: Option<DateTime<Utc>>,
}

impl EntryDraft {
    /// Creates a draft with the default category and a store-assigned event time.
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            label: EntryLabel::default(),
            event_time: None,
        }
    }

    pub fn with_label(mut self, label: EntryLabel) -> Self {
        self.label = label;
        self
    }

    pub fn with_event_time(mut self, event_time: DateTime<Utc>) -> Self {
        self.event_time = Some(event_time);
        self
    }

    /// Whether title and value fit the schema's column bounds.
    pub fn fits_schema(&self) -> bool {
        self.title.len() <= TITLE_MAX_LEN && self.value.len() <= VALUE_MAX_LEN
    }
}
