//! Shared traversal state
//!
//! The visited registry and the page record store are the only mutable state shared
//! between concurrent fetch tasks. Every access goes through their own locking methods.
//!
//! # Components
//!
//! - `VisitedRegistry`: claims each canonical address for fetching at most once
//! - `PageRecordStore`: owns the record of every fetched page for the length of a traversal
//! - `PageRecord`: one fetched page, its children and its extracted data

mod page_record;
mod record_store;
mod visited;

// Re-export main types
pub use page_record::PageRecord;
pub use record_store::{PageRecordStore, RecordError};
pub use visited::VisitedRegistry;
