//! Audit sink port
//!
//! Audit logging is an external, append-only collaborator. The sink is
//! fire-and-forget: implementations must not fail the business operation,
//! so `append` returns nothing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tenant::TenantContext;

/// Kind of resource an audit event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Claim,
    RemittanceBatch,
    Payment,
}

/// A single audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub action: String,
    pub resource_kind: ResourceKind,
    pub resource_id: Option<String>,
    pub actor: String,
    pub details: Option<Value>,
    /// Whether protected health information was read or written
    pub phi_accessed: bool,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    /// Creates an event attributed to the context's actor
    pub fn new(ctx: &TenantContext, action: impl Into<String>, resource_kind: ResourceKind) -> Self {
        Self {
            action: action.into(),
            resource_kind,
            resource_id: None,
            actor: ctx.actor.clone(),
            details: None,
            phi_accessed: false,
            occurred_at: Utc::now(),
        }
    }

    /// Attaches the resource id
    pub fn with_resource(mut self, resource_id: impl ToString) -> Self {
        self.resource_id = Some(resource_id.to_string());
        self
    }

    /// Attaches structured details
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Marks the event as having touched PHI
    pub fn phi(mut self) -> Self {
        self.phi_accessed = true;
        self
    }
}

/// Fire-and-forget audit sink
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, event: AuditEvent);
}

/// Sink that discards every event, for callers that do not audit
#[derive(Debug, Default)]
pub struct NoopAuditSink;

#[async_trait]
impl AuditSink for NoopAuditSink {
    async fn append(&self, _event: AuditEvent) {}
}
