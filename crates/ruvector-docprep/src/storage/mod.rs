//! Persistence for document records

mod record_store;

pub use record_store::{write_atomic, RecordStore};
