//! Explicit tenant context
//!
//! Every operation in the system takes a `TenantContext` parameter rather
//! than resolving the tenant from ambient state. The boundary that
//! authenticates the caller constructs one; anything past that boundary can
//! rely on both fields being present.

use serde::{Deserialize, Serialize};

use crate::identifiers::TenantId;

/// The authenticated caller on whose behalf an operation runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    /// Tenant every read and write is scoped to
    pub tenant_id: TenantId,
    /// Identity recorded on submissions and audit events
    pub actor: String,
}

impl TenantContext {
    /// Creates a context for an authenticated caller
    pub fn new(tenant_id: TenantId, actor: impl Into<String>) -> Self {
        Self {
            tenant_id,
            actor: actor.into(),
        }
    }

    /// Context for system-initiated work (scheduled jobs, ingestion workers)
    pub fn system(tenant_id: TenantId) -> Self {
        Self::new(tenant_id, "system")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_context_actor() {
        let ctx = TenantContext::system(TenantId::new());
        assert_eq!(ctx.actor, "system");
    }
}
