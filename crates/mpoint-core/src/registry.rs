//! Measurement point registry.
//!
//! The registry owns the measurement points of one data source and routes
//! raw updates to them by id. Ids are unique within a registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDateTime};
use tracing::{debug, warn};

use crate::config::PointsConfig;
use crate::error::RegistryError;
use crate::live::LiveNode;
use crate::measurement::MeasurementPoint;
use crate::metadata::Quality;

/// Trait for measurement point registries.
pub trait PointRegistry {
    /// Register a valid point under its id.
    fn insert(&mut self, point: MeasurementPoint) -> Result<(), RegistryError>;

    /// Remove and return a point.
    fn remove(&mut self, id: i32) -> Option<MeasurementPoint>;

    fn get(&self, id: i32) -> Option<&MeasurementPoint>;

    fn get_mut(&mut self, id: i32) -> Option<&mut MeasurementPoint>;

    /// Coerce and apply a raw value to the point with the given id.
    fn apply_sample(
        &mut self,
        id: i32,
        raw: &str,
        quality: Quality,
        timestamp: NaiveDateTime,
        zone_offset: FixedOffset,
    ) -> Result<(), RegistryError>;

    /// Attach a live node to the point with the given id.
    fn attach_live_node(&mut self, id: i32, node: &Arc<dyn LiveNode>) -> Result<(), RegistryError>;

    /// Number of registered points.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory registry ordered by id.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    points: BTreeMap<i32, MeasurementPoint>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every definition in `config`.
    ///
    /// Valid points are registered; rejected definitions are returned with
    /// their index in the config.
    pub fn from_config(config: &PointsConfig) -> (Self, Vec<(usize, RegistryError)>) {
        let mut registry = Self::new();
        let mut rejected = Vec::new();

        for (index, definition) in config.points.iter().enumerate() {
            let result = definition
                .builder()
                .try_build()
                .map_err(RegistryError::from)
                .and_then(|point| registry.insert(point));
            if let Err(e) = result {
                warn!(index, error = %e, "Skipping point definition");
                rejected.push((index, e));
            }
        }

        (registry, rejected)
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<i32> {
        self.points.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MeasurementPoint> {
        self.points.values()
    }

    /// Clear every attached live node. Points without a sample are skipped.
    pub fn clear_all(&mut self) {
        for point in self.points.values_mut() {
            if let Err(e) = point.clear_value() {
                debug!(error = %e, "Nothing to clear");
            }
        }
    }
}

impl PointRegistry for MemoryRegistry {
    fn insert(&mut self, point: MeasurementPoint) -> Result<(), RegistryError> {
        let id = match point.id() {
            Some(id) if point.is_valid() => id,
            _ => return Err(RegistryError::InvalidPoint),
        };
        if self.points.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        debug!(id, name = ?point.point().name(), "Registered measurement point");
        self.points.insert(id, point);
        Ok(())
    }

    fn remove(&mut self, id: i32) -> Option<MeasurementPoint> {
        self.points.remove(&id)
    }

    fn get(&self, id: i32) -> Option<&MeasurementPoint> {
        self.points.get(&id)
    }

    fn get_mut(&mut self, id: i32) -> Option<&mut MeasurementPoint> {
        self.points.get_mut(&id)
    }

    fn apply_sample(
        &mut self,
        id: i32,
        raw: &str,
        quality: Quality,
        timestamp: NaiveDateTime,
        zone_offset: FixedOffset,
    ) -> Result<(), RegistryError> {
        let point = self
            .points
            .get_mut(&id)
            .ok_or(RegistryError::UnknownPoint(id))?;
        point
            .set_sample(raw, quality, timestamp, zone_offset)
            .map_err(|source| RegistryError::Point { id, source })
    }

    fn attach_live_node(&mut self, id: i32, node: &Arc<dyn LiveNode>) -> Result<(), RegistryError> {
        let point = self
            .points
            .get_mut(&id)
            .ok_or(RegistryError::UnknownPoint(id))?;
        point.attach_live_node(node);
        Ok(())
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}
