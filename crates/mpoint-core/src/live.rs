//! Boundary to the externally owned live node.
//!
//! The protocol layer (e.g. an OPC UA address space) owns the node and its
//! lifecycle. A measurement point only pushes [`LiveValue`]s into it through
//! the narrow [`LiveNode`] capability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metadata::Quality;
use crate::sample::SampleValue;

/// Value carried to the live node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Variant {
    Double(f64),
    Boolean(bool),
    /// No value (a cleared node, or an unrecognized discrete token).
    Empty,
}

impl Variant {
    pub fn is_empty(&self) -> bool {
        matches!(self, Variant::Empty)
    }
}

impl From<SampleValue> for Variant {
    fn from(value: SampleValue) -> Self {
        match value {
            SampleValue::Double(v) => Variant::Double(v),
            SampleValue::Boolean(b) => Variant::Boolean(b),
        }
    }
}

impl From<Option<SampleValue>> for Variant {
    fn from(value: Option<SampleValue>) -> Self {
        value.map(Variant::from).unwrap_or(Variant::Empty)
    }
}

/// Status attached to a live value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    Good,
    Uncertain,
    Bad,
}

impl From<Quality> for StatusCode {
    fn from(quality: Quality) -> Self {
        match quality {
            Quality::Good => StatusCode::Good,
            Quality::Uncertain => StatusCode::Uncertain,
            Quality::Bad => StatusCode::Bad,
        }
    }
}

/// The {value, status, time} triple a live node accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveValue {
    pub value: Variant,
    pub status: StatusCode,
    pub source_time: DateTime<Utc>,
}

impl LiveValue {
    /// Good-status value stamped with the current wall-clock time.
    pub fn good_now(value: Variant) -> Self {
        Self {
            value,
            status: StatusCode::Good,
            source_time: Utc::now(),
        }
    }
}

/// Capability a measurement point needs from the protocol-layer node.
///
/// `set_value` takes `&self`: the collaborator owns the node and provides
/// whatever interior synchronization it requires.
pub trait LiveNode: Send + Sync {
    /// Identifier of the node in the collaborator's address space.
    fn node_id(&self) -> &str;

    /// Replace the node's value. Called synchronously on every accepted update.
    fn set_value(&self, value: LiveValue);
}
