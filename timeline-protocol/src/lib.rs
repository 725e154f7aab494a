pub mod entry;
pub mod label;
pub mod query;

pub mod prelude {
    pub use crate::entry::{EntryDraft, TimelineEntry, TITLE_MAX_LEN, VALUE_MAX_LEN};
    pub use crate::label::EntryLabel;
    pub use crate::query::{TimelineOrder, TimelineQuery};
}

pub use entry::{EntryDraft, TimelineEntry, TITLE_MAX_LEN, VALUE_MAX_LEN};
pub use label::EntryLabel;
pub use query::{TimelineOrder, TimelineQuery};
