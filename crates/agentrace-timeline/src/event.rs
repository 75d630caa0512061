//! Input event model and the normalizer pass.
//!
//! Events arrive from the session-retrieval API as loosely-typed JSON; every
//! field except `created_at` tolerates being absent so a partially-written or
//! future-format record still loads. Normalization guarantees each event has
//! a non-empty `id` and a recognized `event_type` before expansion.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event types the expander understands. Anything else is coerced to
/// [`UNKNOWN_EVENT_TYPE`] and rendered through the fallback path.
pub const RECOGNIZED_EVENT_TYPES: [&str; 4] = ["user", "assistant", "system", "summary"];

/// Fallback event type for unrecognized records.
pub const UNKNOWN_EVENT_TYPE: &str = "unknown";

/// One immutable record in a session's event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SessionEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub event_type: String,
    /// Arbitrary JSON payload; its shape depends on `event_type` and is
    /// classified structurally during expansion.
    #[serde(default)]
    #[schemars(schema_with = "crate::schema::any_value_schema")]
    pub payload: serde_json::Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SessionEvent {
    /// Timestamp used for ordering and display. Events without `created_at`
    /// sort as the epoch; the stable sort keeps their input order.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.created_at.unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// Normalize one raw event: assign a synthetic id when missing and coerce
/// unrecognized event types to the generic fallback. Never fails.
///
/// Synthetic ids are UUIDv5 over the session id and the event's ordinal in
/// the input array, so recompiling the same array reproduces the same ids.
pub fn normalize(mut event: SessionEvent, ordinal: usize) -> SessionEvent {
    if event.id.trim().is_empty() {
        let name = format!("{}:{}", event.session_id, ordinal);
        event.id = Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string();
    }
    if !RECOGNIZED_EVENT_TYPES.contains(&event.event_type.as_str()) {
        event.event_type = UNKNOWN_EVENT_TYPE.to_string();
    }
    event
}
