//! # acctl-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the [`KeyValueStore`](acctl_app::ports::KeyValueStore) port
//! - Open the database with durable per-write settings (WAL, `synchronous = FULL`)
//! - Run the embedded schema migrations
//!
//! ## Dependency rule
//! Depends on `acctl-app` (for port traits) and `acctl-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod database;
pub mod error;
pub mod kv_store;

pub use kv_store::SqliteKeyValueStore;
pub use database::{Config, Database};
