//! bucketview - inspect and edit an embedded bucketed key-value store
//!
//! The store holds named buckets of unique keys mapped to byte values.
//! Commands are resolved by name from a registry, parse their own
//! arguments, run against the store and report their result.

pub mod cli;
pub mod command;
pub mod domain;
pub mod storage;

pub use command::{Command, CommandError, CommandRegistry};
pub use domain::FieldAddress;
pub use storage::{Store, StoreError};
