//! Change notification abstractions.
//!
//! Derived state (act membership, beat geometry) is recomputed on demand
//! when a document publishes a notification. Notifications are plain values;
//! there is no dispatcher keyed on types.

/// Trait that all change notifications implement.
pub trait Notification: Send + Sync + std::fmt::Debug {
    /// Returns the notification type name (used for logging and routing).
    fn notification_type(&self) -> &'static str;

    /// Serializes the notification payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Returns `true` if derived indexes built from the notified state must
    /// be recomputed.
    fn invalidates_index(&self) -> bool;
}
