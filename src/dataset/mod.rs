//! Survey records and the helpers that read them.
//!
//! # Core Concepts
//!
//! - **Record** — one survey response: a loosely-typed map from field name to
//!   JSON value. No field is required; accessors return `Option`.
//! - **Technology fields** — free-text answers listing comma-separated
//!   technology names, e.g. `"React, Node.js"`.
//! - **In-memory dataset** — the numeric `(X, y)` pair the trainer consumes,
//!   see [`InMemoryDataset`].
//!
//! # Example
//!
//! ```rust
//! use tech_pulse_ml::dataset::Record;
//!
//! let record = Record::new()
//!     .with("timestamp", "2024-01-01")
//!     .with("languages", "Rust, Go");
//! assert_eq!(record.text("languages").as_deref(), Some("Rust, Go"));
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

pub mod memory;
pub mod timestamp;

pub use self::memory::InMemoryDataset;
pub use self::timestamp::read_timestamp;

/// One survey response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Look up a field.
    ///
    /// Tries the exact key first, then a trimmed case-insensitive match
    /// (sheet headers are often capitalised or padded). `null` and empty
    /// strings count as absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        let value = self.0.get(name).or_else(|| {
            let wanted = name.trim();
            self.0
                .iter()
                .find(|(key, _)| key.trim().eq_ignore_ascii_case(wanted))
                .map(|(_, v)| v)
        })?;

        match value {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            v => Some(v),
        }
    }

    /// A field rendered as text.
    ///
    /// Arrays (multi-select exports) are joined with `", "`.
    pub fn text(&self, name: &str) -> Option<String> {
        match self.field(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().filter_map(value_to_text).collect();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            other => value_to_text(other),
        }
    }

    /// Every technology mentioned in `fields`, trimmed, original casing,
    /// in field then list order. Duplicates are kept.
    pub fn technologies(&self, fields: &[String]) -> Vec<String> {
        fields
            .iter()
            .filter_map(|f| self.text(f))
            .flat_map(|text| split_technologies(&text))
            .collect()
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Split a comma-separated answer into trimmed, non-empty names.
pub fn split_technologies(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load records from a JSON file holding an array of objects.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path)?;
    parse_records(&text)
}

/// Parse records from a JSON array of objects.
pub fn parse_records(json: &str) -> Result<Vec<Record>> {
    Ok(serde_json::from_str(json)?)
}

/// Aggregate mention count for one technology.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechCount {
    pub tech: String,
    pub count: u64,
}

/// Count mentions of each technology across `records`.
///
/// Names keep their original casing. Sorted by count descending; ties stay
/// in first-seen order.
pub fn tech_usage(records: &[Record], fields: &[String]) -> Vec<TechCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<TechCount> = Vec::new();

    for tech in records.iter().flat_map(|r| r.technologies(fields)) {
        match index.get(&tech) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(tech.clone(), counts.len());
                counts.push(TechCount { tech, count: 1 });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
