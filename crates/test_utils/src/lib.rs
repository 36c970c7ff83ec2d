//! Test Utilities
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the fields they care about.

pub mod builders;

pub use builders::{AppealBuilder, ClaimBuilder, DenialBuilder, LineItemBuilder};
