//! HBase JMX JSON 응답 파서
//!
//! The JMX servlet answers `{"beans": [ {...}, ... ]}`. A fixed query
//! matches a single bean, so only the first element is decoded.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{CollectorError, ParseError};

/// Collector 작업 결과 타입
pub type CollectResult<T> = Result<T, CollectorError>;

/// Attribute map of one bean
pub type Bean = Map<String, Value>;

#[derive(Deserialize)]
struct BeanEnvelope {
    beans: Vec<Bean>,
}

/// Locate the `beans` array and select its first element
pub fn select_bean(body: &[u8]) -> Result<Bean, ParseError> {
    let envelope: BeanEnvelope =
        serde_json::from_slice(body).map_err(|e| ParseError::Malformed(e.to_string()))?;

    let count = envelope.beans.len();
    let mut beans = envelope.beans.into_iter();
    let bean = beans.next().ok_or(ParseError::EmptyBeanArray)?;

    if count > 1 {
        let name = string_attribute(&bean, "name");
        warn!(
            beans = count,
            name = name,
            "JMX query matched more than one bean, using the first"
        );
    }

    Ok(bean)
}

/// Select the first bean and decode it into a fixed-schema record
///
/// Missing fields fall back to their `Default`; the record types carry
/// `#[serde(default)]`.
pub fn decode_bean<T: DeserializeOwned>(body: &[u8]) -> Result<T, ParseError> {
    let bean = select_bean(body)?;
    serde_json::from_value(Value::Object(bean)).map_err(|e| ParseError::Malformed(e.to_string()))
}

/// Numeric view of an attribute value
///
/// Numbers are taken as-is, numeric strings are parsed and booleans map to
/// 0/1. Anything else has no numeric value.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// String attribute of a bean, empty when absent or not a string
pub fn string_attribute<'a>(bean: &'a Bean, name: &str) -> &'a str {
    bean.get(name).and_then(Value::as_str).unwrap_or_default()
}

/// Deserialize a number that JMX may also render as a numeric string or null
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(0.0),
        other => numeric_value(&other).ok_or_else(|| {
            serde::de::Error::custom(format!("expected a numeric attribute, found {}", other))
        }),
    }
}
