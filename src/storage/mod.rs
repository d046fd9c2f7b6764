//! Storage layer for persistent settings and frequently-used data.
//!
//! This module provides a small typed key-value store with explicit schema
//! versioning. Values are addressed through [`StoreKey`] types rather than raw
//! strings, and older on-disk schemas are migrated when a file is opened.
//!
//! # Modules
//!
//! - `backend`: Storage trait and typed accessors
//! - `json`: JSON file-based storage implementation
//! - `memory`: In-memory storage implementation
//! - `migrate`: Schema migrations
//! - `models`: Store keys and the persisted state snapshot

pub mod backend;
pub mod json;
pub mod memory;
pub mod migrate;
pub mod models;

pub use backend::{Storage, StorageExt, StoreKey};
pub use json::JsonStorage;
pub use memory::MemoryStorage;
pub use migrate::SCHEMA_VERSION;
pub use models::{keys, PersistedState};
