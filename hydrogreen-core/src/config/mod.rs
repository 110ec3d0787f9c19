//! Configuration types
//!
//! Board-agnostic configuration structures, stored as postcard binary data
//! produced at build time.

pub mod types;

pub use types::*;
