//! JSON trace decoding
//!
//! A trace is a JSON array of objects, each with a `type` discriminant:
//!
//! ```text
//! [
//!   {"type": "alloc", "address": 4096, "size": 32, "tag": "parser"},
//!   {"type": "event", "tag": "phase 2", "color": "#FF0000"},
//!   {"type": "free", "address": 4096}
//! ]
//! ```
//!
//! Malformed records are skipped one at a time; only a trace that is not a
//! JSON array at all fails the whole load.

use super::{Color, HeapEvent, InvalidColor};
use crate::history::HeapHistory;
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use tracing::{info, trace, warn};

/// Why a single trace record was rejected
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("record has no 'type' field")]
    MissingType,

    #[error("unknown record type '{0}'")]
    UnknownType(String),

    #[error("missing mandatory field '{field}' for type '{kind}'")]
    MissingField { kind: String, field: &'static str },

    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Color(#[from] InvalidColor),
}

/// Why a whole trace could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("failed to parse trace: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("trace must be a JSON array of records, found {0}")]
    NotAnArray(&'static str),
}

/// Outcome of loading a trace into a history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records present in the trace
    pub records: usize,
    /// Records decoded and applied
    pub applied: usize,
    /// Records skipped because they failed validation
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "type")]
    kind: Option<String>,
    address: Option<u64>,
    size: Option<u64>,
    low: Option<u64>,
    high: Option<u64>,
    old_address: Option<u64>,
    new_address: Option<u64>,
    heap: Option<u8>,
    tag: Option<String>,
    color: Option<String>,
}

fn require<T>(value: Option<T>, kind: &str, field: &'static str) -> Result<T, DecodeError> {
    value.ok_or_else(|| DecodeError::MissingField {
        kind: kind.to_string(),
        field,
    })
}

fn parse_color(color: Option<&str>) -> Result<Color, DecodeError> {
    match color {
        Some(text) => Ok(text.parse()?),
        None => Ok(Color::default()),
    }
}

/// Decode one trace record into a [`HeapEvent`]
pub fn decode_record(value: Value) -> Result<HeapEvent, DecodeError> {
    let raw: RawRecord = serde_json::from_value(value)?;
    let kind = raw.kind.as_deref().ok_or(DecodeError::MissingType)?;
    let tag = raw.tag.unwrap_or_default();
    let heap_id = raw.heap.unwrap_or(0);

    let event = match kind {
        "alloc" => HeapEvent::Allocate {
            address: require(raw.address, kind, "address")?,
            size: require(raw.size, kind, "size")?,
            tag,
            heap_id,
        },
        "free" => HeapEvent::Free {
            address: require(raw.address, kind, "address")?,
            tag,
            heap_id,
        },
        "rangefree" => HeapEvent::FreeRange {
            low: require(raw.low, kind, "low")?,
            high: require(raw.high, kind, "high")?,
            tag,
            heap_id,
        },
        "realloc" => HeapEvent::Realloc {
            old_address: require(raw.old_address, kind, "old_address")?,
            new_address: require(raw.new_address, kind, "new_address")?,
            size: require(raw.size, kind, "size")?,
            heap_id,
        },
        "filterrange" => HeapEvent::FilterRange {
            low: require(raw.low, kind, "low")?,
            high: require(raw.high, kind, "high")?,
        },
        "event" => HeapEvent::Event {
            label: tag,
            color: parse_color(raw.color.as_deref())?,
        },
        "address" => HeapEvent::AddressAnnotation {
            address: require(raw.address, kind, "address")?,
            label: tag,
            color: parse_color(raw.color.as_deref())?,
        },
        other => return Err(DecodeError::UnknownType(other.to_string())),
    };
    Ok(event)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read a JSON trace and apply every valid record to `history`, in order
///
/// Records that fail validation are logged and skipped; ingestion continues
/// with the next record.
pub fn load_trace<R: Read>(reader: R, history: &mut HeapHistory) -> Result<LoadReport, TraceError> {
    let document: Value = serde_json::from_reader(reader)?;
    let records = match document {
        Value::Array(records) => records,
        other => return Err(TraceError::NotAnArray(json_kind(&other))),
    };

    let mut report = LoadReport {
        records: records.len(),
        ..LoadReport::default()
    };

    for (position, record) in records.into_iter().enumerate() {
        match decode_record(record) {
            Ok(event) => {
                trace!(position, kind = event.kind(), "applying trace record");
                history.apply(event);
                report.applied += 1;
            }
            Err(e) => {
                warn!(position, error = %e, "skipping trace record");
                report.skipped += 1;
            }
        }
    }

    info!(
        records = report.records,
        skipped = report.skipped,
        blocks = history.blocks().len(),
        "trace loaded"
    );
    Ok(report)
}
