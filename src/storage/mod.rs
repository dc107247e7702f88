//! # Storage Layer
//!
//! Persistence for bucketview: the bucket store itself and the user
//! configuration that locates it.
//!
//! ## Store Layout
//!
//! | Data | Table | Ordering |
//! |------|-------|----------|
//! | Buckets | `buckets(id, name)` | by name |
//! | Entries | `entries(bucket_id, key, value)` | by key, byte-wise |
//!
//! ## Concurrency
//!
//! - One writer at a time (`BEGIN IMMEDIATE`)
//! - Readers see a consistent snapshot (WAL journal mode)
//! - The tool never opens overlapping write transactions: each invocation
//!   runs exactly one command
//!
//! ## Key Types
//!
//! - [`Store`] - Bucket and key operations
//! - [`Config`] - User configuration

mod config;
mod store;

pub use config::{Config, ConfigError, DEFAULT_DB_PATH};
pub use store::{BucketStats, Store, StoreError};
