use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::data::model::DataPoint;
use crate::errors::{malformed, EvaError, EvaResult};

/// Reserved source holding the URLs of external widget types.
pub const EXTERNAL_WIDGETTYPES_URLS_SOURCEID: &str = "external-widgettypes-urls";
pub const EXTERNAL_WIDGETTYPES_URLS_CHANNEL: &str = "urls";
pub const EXTERNAL_WIDGETTYPES_URLS_COMPONENT: &str = "array";

/// Channel/component under which a dashboard source stores its state.
pub const DASHBOARD_STATE_CHANNEL: &str = "dashboard";
pub const DASHBOARD_STATE_COMPONENT: &str = "state";

/// Wraps `value` as one synthetic packet: the JSON text of `value` becomes the
/// reading of `channels[channel][component]`.
pub fn encode_blob(
    channel: &str,
    component: &str,
    value: &Value,
    timestamp: DateTime<Utc>,
) -> EvaResult<DataPoint> {
    let text = serde_json::to_string(value)
        .map_err(|e| EvaError::InvalidArgument(format!("unserializable blob: {}", e)))?;
    Ok(DataPoint::new(timestamp).with_value(channel, component, Value::String(text)))
}

/// Reads a blob back out of a source description (`recentData[channel][component]`).
///
/// The service may wrap the stored reading as `{"val": ..., ...}`; both forms
/// are accepted. A path that was never written is [`EvaError::MissingValue`],
/// while a blob written as `null` decodes to `Value::Null`.
pub fn decode_blob(source: &Value, channel: &str, component: &str) -> EvaResult<Value> {
    let slot = source
        .get("recentData")
        .and_then(|recent| recent.get(channel))
        .and_then(|c| c.get(component))
        .ok_or_else(|| EvaError::MissingValue {
            channel: channel.to_string(),
            component: component.to_string(),
        })?;

    let stored = match slot {
        Value::Object(map) if map.contains_key("val") => &map["val"],
        other => other,
    };

    match stored {
        Value::String(text) => serde_json::from_str(text).map_err(malformed),
        other => Err(EvaError::MalformedResponse(format!(
            "expected JSON text at {}/{}, found {}",
            channel, component, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_source(point: &DataPoint) -> Value {
        json!({ "recentData": point.channels })
    }

    #[test]
    fn encoded_blob_is_json_text() {
        let ts = DateTime::from_timestamp_millis(10).unwrap();
        let point = encode_blob("ext", "arr", &json!(["http://a"]), ts).unwrap();
        assert_eq!(point.value("ext", "arr"), Some(&json!("[\"http://a\"]")));
        assert_eq!(point.timestamp, ts);
    }

    #[test]
    fn decode_inverts_encode() {
        let value = json!({"widgets": [{"type": "bar", "feed": "f"}], "cols": 3});
        let point = encode_blob("dashboard", "state", &value, Utc::now()).unwrap();
        assert_eq!(decode_blob(&as_source(&point), "dashboard", "state").unwrap(), value);
    }

    #[test]
    fn decode_unwraps_val_field() {
        let source = json!({"recentData": {"urls": {"array": {"val": "[1,2]", "timestamp": 5}}}});
        assert_eq!(decode_blob(&source, "urls", "array").unwrap(), json!([1, 2]));
    }

    #[test]
    fn written_null_differs_from_never_written() {
        let point = encode_blob("c", "x", &Value::Null, Utc::now()).unwrap();
        assert_eq!(decode_blob(&as_source(&point), "c", "x").unwrap(), Value::Null);

        let err = decode_blob(&json!({"recentData": {}}), "c", "x").unwrap_err();
        assert!(matches!(err, EvaError::MissingValue { .. }));

        let err = decode_blob(&json!({}), "c", "x").unwrap_err();
        assert!(matches!(err, EvaError::MissingValue { .. }));
    }

    #[test]
    fn numeric_reading_is_not_a_blob() {
        let source = json!({"recentData": {"c": {"x": {"val": 21.5}}}});
        let err = decode_blob(&source, "c", "x").unwrap_err();
        assert!(matches!(err, EvaError::MalformedResponse(_)));
    }
}
