//! Recording sinks for payments and audit events
//!
//! Both sinks append to an in-memory log so tests can assert on what the
//! services emitted.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use core_kernel::{AuditEvent, AuditSink, CoreError};
use domain_remittance::ports::PaymentSink;
use domain_remittance::PaymentRecord;

/// Payment sink that records every posted payment
#[derive(Default)]
pub struct RecordingPaymentSink {
    posted: Mutex<Vec<PaymentRecord>>,
}

impl RecordingPaymentSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything posted so far
    pub fn posted(&self) -> Vec<PaymentRecord> {
        self.posted.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl PaymentSink for RecordingPaymentSink {
    async fn post(&self, payment: PaymentRecord) -> Result<(), CoreError> {
        debug!(claim = %payment.claim_id, amount = %payment.amount, "payment posted");
        self.posted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(payment);
        Ok(())
    }
}

/// Audit sink that records every appended event
#[derive(Default)]
pub struct RecordingAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn append(&self, event: AuditEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}
