//! In-Memory Store Adapters
//!
//! The production document store is an external collaborator reached through
//! the domain port traits. This crate provides the in-memory reference
//! adapters: a tenant-partitioned `InMemoryStore` implementing every store
//! and provider port, plus recording sinks for payments and audit events.
//!
//! Writes within one adapter call commit under a single lock guard, matching
//! the store contract that a single operation's writes are atomic. Across
//! calls the semantics are last-write-wins, as in production.

pub mod sinks;
pub mod store;

pub use sinks::{RecordingAuditSink, RecordingPaymentSink};
pub use store::InMemoryStore;
