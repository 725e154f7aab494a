use serde::{Deserialize, Serialize};

use crate::label::EntryLabel;

/// Ordering applied to full timeline listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TimelineOrder {
    /// Most recently inserted first.
    #[default]
    CreateTime,
    /// Most recent real-world event first.
    EventTime,
}

/// Client-facing query filters for timeline retrieval.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelineQuery {
    #[serde(default)]
    pub order: TimelineOrder,
    /// When set the listing narrows to one category and `order` is ignored
    /// (label listings always come back in event-time order).
    pub label: Option<EntryLabel>,
}
