//! Measurement points: a [`Point`] with a current [`Sample`] mirrored into a
//! live node.
//!
//! State machine:
//!
//! ```text
//! Uninitialized --(set_initial_value | set_sample)--> Populated --(set_sample)*--> Populated
//! ```
//!
//! `clear_value` requires `Populated`. The live node is held as a `Weak`
//! reference: the protocol layer creates and destroys it, a measurement point
//! only pushes into it while it is alive. All operations are synchronous and
//! the type has no internal locking; callers sharing a point across threads
//! must synchronize externally.

use std::sync::{Arc, Weak};

use chrono::{FixedOffset, Local, NaiveDateTime};
use tracing::{debug, trace};

use crate::error::PointError;
use crate::live::{LiveNode, LiveValue};
use crate::metadata::{
    AccessRight, BaseUnitOfMeasure, DiscreteCoercion, PhysicalQuantity, Quality, UnitPrefix,
};
use crate::point::Point;
use crate::sample::{Sample, SampleValue};

/// A point whose current value is tracked and pushed to a live node.
#[derive(Debug, Default)]
pub struct MeasurementPoint {
    point: Point,
    coercion: DiscreteCoercion,
    current: Option<Sample>,
    live_node: Option<Weak<dyn LiveNode>>,
}

impl MeasurementPoint {
    /// Create a fully assigned point seeded with its zero sample.
    pub fn new(
        id: i32,
        name: impl Into<String>,
        physical_quantity: PhysicalQuantity,
        base_unit_of_measure: BaseUnitOfMeasure,
        unit_prefix: UnitPrefix,
        access_right: AccessRight,
    ) -> Self {
        let mut point = Self::from_point(Point::new(
            id,
            name,
            physical_quantity,
            base_unit_of_measure,
            unit_prefix,
            access_right,
        ));
        point.set_initial_value();
        point
    }

    /// Wrap a point without seeding a sample (state `Uninitialized`).
    pub fn from_point(point: Point) -> Self {
        Self {
            point,
            ..Default::default()
        }
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn point_mut(&mut self) -> &mut Point {
        &mut self.point
    }

    pub fn id(&self) -> Option<i32> {
        self.point.id()
    }

    pub fn is_valid(&self) -> bool {
        self.point.is_valid()
    }

    pub fn discrete_coercion(&self) -> DiscreteCoercion {
        self.coercion
    }

    pub fn set_discrete_coercion(&mut self, coercion: DiscreteCoercion) {
        self.coercion = coercion;
    }

    /// The current sample, absent before the first write.
    pub fn current_sample(&self) -> Option<&Sample> {
        self.current.as_ref()
    }

    /// Seed the point with a Good zero sample stamped now in the local offset.
    ///
    /// The zero is `false` for discrete points and `0.0` otherwise. Calling it
    /// again resets to an equal sample with a newer timestamp.
    pub fn set_initial_value(&mut self) {
        let now = Local::now();
        let value = if self.point.is_discrete() {
            SampleValue::Boolean(false)
        } else {
            SampleValue::Double(0.0)
        };
        self.set_measurement_sample(Sample::new(
            value,
            Quality::Good,
            now.naive_local(),
            *now.offset(),
        ));
    }

    /// Coerce a raw value into the point's value domain.
    ///
    /// Real-valued points parse a finite decimal number (surrounding
    /// whitespace is ignored; "inf" and "NaN" are rejected). Discrete points accept exactly "1" and "0"; anything else is
    /// rejected, or yields `None` under [`DiscreteCoercion::Lenient`].
    pub fn coerce(&self, raw: &str) -> Result<Option<SampleValue>, PointError> {
        if !self.point.is_discrete() {
            let value = raw.trim().parse::<f64>().map_err(|source| PointError::Parse {
                input: raw.to_string(),
                source: Some(source),
            })?;
            if !value.is_finite() {
                return Err(PointError::Parse {
                    input: raw.to_string(),
                    source: None,
                });
            }
            return Ok(Some(SampleValue::Double(value)));
        }

        match raw {
            "1" => Ok(Some(SampleValue::Boolean(true))),
            "0" => Ok(Some(SampleValue::Boolean(false))),
            _ => match self.coercion {
                DiscreteCoercion::Strict => Err(PointError::InvalidDiscreteValue(raw.to_string())),
                DiscreteCoercion::Lenient => {
                    debug!(point_id = ?self.id(), raw, "Unrecognized discrete value, storing absent value");
                    Ok(None)
                }
            },
        }
    }

    /// Coerce `raw`, store it as the current sample and push it to the live node.
    ///
    /// On error the current sample and the live node are left untouched.
    pub fn set_sample(
        &mut self,
        raw: &str,
        quality: Quality,
        timestamp: NaiveDateTime,
        zone_offset: FixedOffset,
    ) -> Result<(), PointError> {
        let value = self.coerce(raw)?;
        self.set_measurement_sample(Sample::from_parts(value, quality, timestamp, zone_offset));
        Ok(())
    }

    /// Replace the current sample and push its live representation.
    pub fn set_measurement_sample(&mut self, sample: Sample) {
        let live = sample.live_value();
        self.current = Some(sample);
        self.push(live);
    }

    /// Attach the protocol-layer node, replacing any previous one.
    ///
    /// If a sample exists the node is immediately cleared; it shows the value
    /// again from the next update on.
    pub fn attach_live_node(&mut self, node: &Arc<dyn LiveNode>) {
        debug!(point_id = ?self.id(), node_id = node.node_id(), "Attaching live node");
        self.live_node = Some(Arc::downgrade(node));
        if let Some(sample) = &self.current {
            node.set_value(sample.cleared_value());
        }
    }

    /// Drop the reference to the live node without touching it.
    pub fn detach_live_node(&mut self) {
        self.live_node = None;
    }

    /// True while an attached node is still alive.
    pub fn has_live_node(&self) -> bool {
        self.live_node
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Push an empty value to the live node.
    ///
    /// Fails with [`PointError::NoCurrentSample`] if no sample was ever set.
    pub fn clear_value(&mut self) -> Result<(), PointError> {
        let sample = self
            .current
            .as_ref()
            .ok_or(PointError::NoCurrentSample(self.point.id()))?;
        self.push(sample.cleared_value());
        Ok(())
    }

    fn push(&self, value: LiveValue) {
        let Some(weak) = &self.live_node else {
            return;
        };
        match weak.upgrade() {
            Some(node) => {
                trace!(point_id = ?self.id(), node_id = node.node_id(), ?value, "Pushing live value");
                node.set_value(value);
            }
            None => debug!(point_id = ?self.id(), "Live node is gone, skipping push"),
        }
    }
}
