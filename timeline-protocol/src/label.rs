use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed category set for timeline entries.
///
/// The storage schema constrains the column to these four values; anything
/// else is rejected before a statement ever runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EntryLabel {
    #[default]
    MajorEvent,
    Policy,
    AntiGraft,
    Statement,
}

impl EntryLabel {
    pub const ALL: [EntryLabel; 4] = [
        EntryLabel::MajorEvent,
        EntryLabel::Policy,
        EntryLabel::AntiGraft,
        EntryLabel::Statement,
    ];

    /// Wire/storage name of the category.
    pub fn as_str(self) -> &'static str {
        match self {
            EntryLabel::MajorEvent => "major-event",
            EntryLabel::Policy => "policy",
            EntryLabel::AntiGraft => "anti-graft",
            EntryLabel::Statement => "statement",
        }
    }

    /// Parses a wire/storage name back into a category.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == value)
    }
}

impl fmt::Display for EntryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
