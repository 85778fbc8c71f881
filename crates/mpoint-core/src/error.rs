//! Error types for measurement points.
//!
//! Every error here is local to one point and recoverable by the caller:
//! skip the update, log it, or raise an alarm upstream.

use std::num::ParseFloatError;

use thiserror::Error;

use crate::builder::BuildError;

/// Failure to convert a string into one of the closed metadata sets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot convert {input:?} to a {kind}")]
pub struct ParseEnumError {
    /// Name of the value set that rejected the input (e.g. "PhysicalQuantity").
    pub kind: &'static str,
    /// The rejected input.
    pub input: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, input: impl Into<String>) -> Self {
        Self {
            kind,
            input: input.into(),
        }
    }
}

/// Errors raised while updating or clearing a measurement point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PointError {
    /// A raw value for a real-valued point is not a finite decimal number.
    ///
    /// `source` is absent when the text parsed but named a non-finite value
    /// such as "inf" or "NaN".
    #[error("Cannot parse {input:?} as a real number")]
    Parse {
        input: String,
        #[source]
        source: Option<ParseFloatError>,
    },

    /// A raw value for a discrete point is neither "0" nor "1".
    #[error("Invalid discrete value {0:?}, expected \"0\" or \"1\"")]
    InvalidDiscreteValue(String),

    /// `clear_value` was called before any sample was set.
    #[error("Measurement point {} has no current sample", describe_id(.0))]
    NoCurrentSample(Option<i32>),
}

fn describe_id(id: &Option<i32>) -> String {
    match id {
        Some(id) => id.to_string(),
        None => "<no id>".to_string(),
    }
}

/// Errors raised by a [`crate::registry::PointRegistry`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("Point id {0} is already registered")]
    DuplicateId(i32),

    #[error("No point registered with id {0}")]
    UnknownPoint(i32),

    #[error("Refusing to register an invalid point")]
    InvalidPoint,

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Point {id}: {source}")]
    Point {
        id: i32,
        #[source]
        source: PointError,
    },
}
