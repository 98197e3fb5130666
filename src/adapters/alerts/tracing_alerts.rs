//! Operator alerts emitted through the tracing pipeline.
//!
//! Conflicts surface as error-level events so that log-based alerting
//! picks them up. Swap this adapter for a pager or ticketing
//! integration without touching the reconciliation flow.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::ports::{OperatorAlerts, SchedulingConflictAlert};

pub struct TracingOperatorAlerts;

impl TracingOperatorAlerts {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingOperatorAlerts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OperatorAlerts for TracingOperatorAlerts {
    async fn scheduling_conflict(
        &self,
        alert: SchedulingConflictAlert,
    ) -> Result<(), DomainError> {
        tracing::error!(
            booking_id = %alert.booking_id,
            mentor_id = %alert.mentor_id,
            starts_at = %alert.starts_at,
            checkout_ref = %alert.checkout_ref,
            holder_booking_id = ?alert.holder_booking_id,
            "Scheduling conflict requires manual review"
        );
        Ok(())
    }
}
