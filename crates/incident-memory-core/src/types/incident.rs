//! Incident identity and payload.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MemoryError, MemoryResult};

/// Arbitrary key/value metadata attached to an incident point.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Well-known payload keys written by producers and read by the composer.
pub mod payload_fields {
    /// Identifying file name of the evidence (used as `file_ref`).
    pub const FILENAME: &str = "filename";
    /// Status category, e.g. `CRITICAL`.
    pub const STATUS: &str = "status";
    /// Action for the operator, e.g. `STOP_TRAIN`.
    pub const RECOMMENDED_ACTION: &str = "recommended_action";
    /// Free-text analysis of the incident.
    pub const ANALYSIS: &str = "analysis";
    /// Detected issue labels (string or list of strings).
    pub const DETECTED_ISSUES: &str = "detected_issues";
    pub const SEVERITY: &str = "severity";
    pub const FOLDER: &str = "folder";
    /// Which producer wrote the point.
    pub const SOURCE: &str = "source";
}

const TAG_NUM: u8 = 0x01;
const TAG_TEXT: u8 = 0x02;

/// Caller-supplied incident id, unique within a collection.
///
/// Numeric and textual ids live in disjoint key spaces: `Num(7)` and `Text("7")` are
/// different points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IncidentId {
    Num(u64),
    Text(String),
}

impl IncidentId {
    /// Rejects empty textual ids.
    pub fn validate(&self) -> MemoryResult<()> {
        match self {
            IncidentId::Text(s) if s.is_empty() => Err(MemoryError::InvalidArgument(
                "incident id must not be empty".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Tagged key encoding. Numbers are big-endian so byte order matches numeric order.
    pub fn to_key_bytes(&self) -> Vec<u8> {
        match self {
            IncidentId::Num(n) => {
                let mut out = Vec::with_capacity(9);
                out.push(TAG_NUM);
                out.extend_from_slice(&n.to_be_bytes());
                out
            }
            IncidentId::Text(s) => {
                let mut out = Vec::with_capacity(1 + s.len());
                out.push(TAG_TEXT);
                out.extend_from_slice(s.as_bytes());
                out
            }
        }
    }

    /// Inverse of [`to_key_bytes`](Self::to_key_bytes). `None` on malformed input.
    pub fn from_key_bytes(bytes: &[u8]) -> Option<Self> {
        let (tag, rest) = bytes.split_first()?;
        match *tag {
            TAG_NUM => {
                let arr: [u8; 8] = rest.try_into().ok()?;
                Some(IncidentId::Num(u64::from_be_bytes(arr)))
            }
            TAG_TEXT => String::from_utf8(rest.to_vec()).ok().map(IncidentId::Text),
            _ => None,
        }
    }
}

impl Ord for IncidentId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (IncidentId::Num(a), IncidentId::Num(b)) => a.cmp(b),
            (IncidentId::Text(a), IncidentId::Text(b)) => a.cmp(b),
            (IncidentId::Num(_), IncidentId::Text(_)) => Ordering::Less,
            (IncidentId::Text(_), IncidentId::Num(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for IncidentId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for IncidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncidentId::Num(n) => write!(f, "{n}"),
            IncidentId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for IncidentId {
    type Err = MemoryError;

    /// All-digit strings parse as numeric ids, everything else as text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = match s.parse::<u64>() {
            Ok(n) => IncidentId::Num(n),
            Err(_) => IncidentId::Text(s.to_string()),
        };
        id.validate()?;
        Ok(id)
    }
}

impl From<u64> for IncidentId {
    fn from(n: u64) -> Self {
        IncidentId::Num(n)
    }
}

impl From<&str> for IncidentId {
    fn from(s: &str) -> Self {
        IncidentId::Text(s.to_string())
    }
}

impl From<String> for IncidentId {
    fn from(s: String) -> Self {
        IncidentId::Text(s)
    }
}

/// A stored incident: payload plus whichever lanes have been written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentPoint {
    pub id: IncidentId,
    /// Lane name to vector, ordered by lane name.
    pub vectors: std::collections::BTreeMap<String, Vec<f32>>,
    pub payload: Payload,
}

/// Reads a payload field as display text.
///
/// Strings are returned as-is, arrays of strings are joined with `", "`, numbers and
/// booleans are rendered. Null, empty strings and objects yield `None`.
pub fn payload_text(payload: &Payload, key: &str) -> Option<String> {
    use serde_json::Value;

    match payload.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|v| match v {
                    Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
