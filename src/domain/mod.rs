//! Domain types for bucketview
//!
//! Contains the addressing model without any I/O concerns.

mod address;

pub use address::{AddressError, FieldAddress, SEPARATOR};
