//! Reference notification dispatcher.
//!
//! Outbound transports (the email sender) live outside this system; this
//! implementation serializes the same payload shape they receive and emits
//! it through tracing, which is enough for local runs and tests.

use async_trait::async_trait;

use schedule::model::ReservationId;

use crate::types::{Decision, DecisionNotifier, NotifyError};

pub struct TracingNotifier;

#[async_trait]
impl DecisionNotifier for TracingNotifier {
    async fn notify(
        &self,
        id: ReservationId,
        outcome: Decision,
        reason: Option<&str>,
    ) -> Result<(), NotifyError> {
        let payload = serde_json::json!({
            "reservation_id": id,
            "outcome": outcome.to_string(),
            "rejection_reason": reason,
        });

        tracing::info!(payload = %payload, "decision notification dispatched");
        Ok(())
    }
}
