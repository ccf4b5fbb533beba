use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Decode a nested field from an incident record.
///
/// The collaborator stores list-valued columns either as JSON text or as
/// already-structured arrays depending on which code path wrote them.
/// Both shapes decode here; anything unreadable falls back to the type's
/// default so one malformed column never takes down a whole readout.
pub fn decode_nested<T>(field: &str, value: Option<&Value>) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(value) = value else {
        return T::default();
    };
    let result = match value {
        Value::String(text) => {
            if text.trim().is_empty() {
                return T::default();
            }
            serde_json::from_str(text)
        }
        Value::Null => return T::default(),
        other => serde_json::from_value(other.clone()),
    };
    match result {
        Ok(decoded) => decoded,
        Err(err) => {
            warn!(field, %err, "nested field failed to decode, using default");
            T::default()
        }
    }
}
