mod entry;
mod metadata;
mod query;

pub use entry::{Author, CatalogEntry, EntryKey, NewEntry, ReadState};
pub use metadata::BookMetadata;
pub use query::{QueryResult, Selection};
