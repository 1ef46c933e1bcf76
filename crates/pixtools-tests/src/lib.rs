//! Integration tests for pixtools crates.
//!
//! End-to-end checks that go through more than one crate: packed image to
//! planes and back, filters, and file persistence.
