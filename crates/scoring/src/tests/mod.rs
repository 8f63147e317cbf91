//! Test doubles for the store and notifier seams


pub use memory_store::{MemoryStore, RecordingNotifier};
