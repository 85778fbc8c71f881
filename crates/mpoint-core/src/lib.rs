//! # mpoint-core
//!
//! Measurement point value model and live node synchronization.
//!
//! This crate provides:
//! - Closed metadata sets (quantity, unit, prefix, access right, quality)
//! - Immutable samples with a typed value
//! - Measurement points that coerce raw values and mirror them into a live node
//! - A fail-soft builder reporting field-level failures
//! - An in-memory point registry and JSON point configuration
//!
//! Transport, address-space registration and sessions belong to the protocol
//! layer; this crate only talks to it through the [`LiveNode`] trait. It is
//! runtime-agnostic and contains no async code.

pub mod builder;
pub mod config;
pub mod error;
pub mod live;
pub mod measurement;
pub mod metadata;
pub mod point;
pub mod registry;
pub mod sample;

pub use builder::{BuildError, FieldError, MeasurementPointBuilder, PointField};
pub use config::{ConfigError, ConfigStorage, FileConfigStorage, PointDefinition, PointsConfig};
pub use error::{ParseEnumError, PointError, RegistryError};
pub use live::{LiveNode, LiveValue, StatusCode, Variant};
pub use measurement::MeasurementPoint;
pub use metadata::*;
pub use point::Point;
pub use registry::{MemoryRegistry, PointRegistry};
pub use sample::{Sample, SampleValue};
