//! Versioned envelope wrapping persisted state payloads.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// Version for [`AppStateEnvelope`] metadata serialization.
pub const APP_STATE_ENVELOPE_VERSION: u32 = 1;
/// Namespace used for the window manager's persisted window-state records.
pub const WINDOW_STATES_NAMESPACE: &str = "system.windows";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Versioned envelope for persisted state payloads.
pub struct AppStateEnvelope {
    /// Envelope schema version.
    pub envelope_version: u32,
    /// Namespace identifying the owning subsystem.
    pub namespace: String,
    /// Subsystem-defined schema version for the payload.
    pub schema_version: u32,
    /// Last update time in unix milliseconds.
    pub updated_at_unix_ms: u64,
    /// Serialized payload.
    pub payload: Value,
}

impl AppStateEnvelope {
    /// Creates a new envelope stamped with a unique timestamp.
    pub fn new(namespace: impl Into<String>, schema_version: u32, payload: Value) -> Self {
        Self {
            envelope_version: APP_STATE_ENVELOPE_VERSION,
            namespace: namespace.into(),
            schema_version,
            updated_at_unix_ms: crate::time::next_unique_timestamp_ms(),
            payload,
        }
    }
}

/// Builds a versioned [`AppStateEnvelope`] from a serializable payload.
///
/// # Errors
///
/// Returns an error when `payload` cannot be converted to JSON.
pub fn build_app_state_envelope<T: Serialize>(
    namespace: &str,
    schema_version: u32,
    payload: &T,
) -> Result<AppStateEnvelope, String> {
    let payload = serde_json::to_value(payload).map_err(|e| e.to_string())?;
    Ok(AppStateEnvelope::new(namespace, schema_version, payload))
}

/// Deserializes an envelope payload into a target type.
///
/// # Errors
///
/// Returns an error when deserialization fails.
pub fn decode_envelope_payload<T: DeserializeOwned>(
    envelope: &AppStateEnvelope,
) -> Result<T, String> {
    serde_json::from_value(envelope.payload.clone()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_serialization_shape_uses_snake_case_keys() {
        let envelope = AppStateEnvelope {
            envelope_version: APP_STATE_ENVELOPE_VERSION,
            namespace: WINDOW_STATES_NAMESPACE.to_string(),
            schema_version: 1,
            updated_at_unix_ms: 1234,
            payload: json!({"calculator": {"title": "Calculator"}}),
        };

        let value = serde_json::to_value(&envelope).expect("serialize envelope");
        let object = value.as_object().expect("object");
        assert_eq!(object.get("namespace"), Some(&json!("system.windows")));
        assert_eq!(object.get("updated_at_unix_ms"), Some(&json!(1234)));
        assert!(!object.contains_key("updatedAtUnixMs"));
    }

    #[test]
    fn successive_envelopes_get_increasing_stamps() {
        let first = AppStateEnvelope::new("system.windows", 1, json!({}));
        let second = AppStateEnvelope::new("system.windows", 1, json!({}));
        assert!(second.updated_at_unix_ms > first.updated_at_unix_ms);
    }

    #[derive(Debug)]
    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            Err(serde::ser::Error::custom("boom"))
        }
    }

    #[test]
    fn build_envelope_reports_serialization_failure() {
        let err = build_app_state_envelope("system.windows", 1, &Unserializable)
            .expect_err("expected serialization error");
        assert!(err.contains("boom"));
    }

    #[test]
    fn decode_payload_rejects_mismatched_shape() {
        let envelope = AppStateEnvelope::new("system.windows", 1, json!({"count": "bad"}));
        let err = decode_envelope_payload::<Vec<u32>>(&envelope).expect_err("mismatch");
        assert!(!err.is_empty());
    }
}
