//! Raw feed records, numeric normalisation and record identity
//!
//! Upstream records are schema-flexible JSON objects. Nothing about their
//! shape is trusted: every accessor falls back to a default instead of
//! failing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Separator between the components of a record identity key
pub const IDENTITY_SEPARATOR: &str = "|";

/// One options-activity or options-flow event as returned by the feed
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(pub Map<String, Value>);

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build from any JSON value; non-objects yield `None`
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// First of `keys` holding a truthy value
    pub fn first_present(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| is_truthy(value))
    }

    /// Field coerced to `f64`, or `default`
    pub fn number(&self, key: &str, default: f64) -> f64 {
        safe_float(self.0.get(key), default)
    }

    /// First truthy field among `keys` rendered as text
    pub fn text(&self, keys: &[&str]) -> Option<String> {
        self.first_present(keys).map(value_to_text)
    }

    pub fn text_or(&self, keys: &[&str], default: &str) -> String {
        self.text(keys).unwrap_or_else(|| default.to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl fmt::Display for RawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}

/// Coerce a raw field into `f64`.
///
/// Numbers pass through. Strings are trimmed and stripped of thousands
/// separators before parsing. Null, booleans, arrays, objects, unparseable
/// text and non-finite results all yield `default`.
pub fn safe_float(value: Option<&Value>, default: f64) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

/// Falsy values (null, false, zero, empty text or collections) count as absent
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Render a value for display: strings verbatim, everything else as JSON
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Deduplication key for a record.
///
/// Built from symbol, strike, expiration, premium and timestamp only, so
/// two distinct trades agreeing on all five collapse into one key.
pub fn compute_record_identity(record: &RawRecord) -> String {
    let components = [
        record.text(&["baseSymbol", "symbol"]),
        record.text(&["strikePrice"]),
        record.text(&["expirationDate"]),
        record.text(&["premium"]),
        record.text(&["timestamp", "time"]),
    ];

    components
        .iter()
        .map(|c| c.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(IDENTITY_SEPARATOR)
}
