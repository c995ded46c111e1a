// src/state/mod.rs
mod store;

pub use store::{FileStateStore, MemoryStateStore, StateError, StateStore};
