//! Fail-soft construction of measurement points from string inputs.
//!
//! Each setter converts its argument into the typed field. A conversion
//! failure is logged, recorded as a [`FieldError`] and leaves the field unset;
//! the builder keeps going. [`MeasurementPointBuilder::build`] gives the plain
//! present/absent result, [`MeasurementPointBuilder::try_build`] returns every
//! field-level failure.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::error::ParseEnumError;
use crate::measurement::MeasurementPoint;
use crate::metadata::{
    AccessRight, BaseUnitOfMeasure, DiscreteCoercion, PhysicalQuantity, UnitPrefix,
};
use crate::point::Point;

/// Fields a builder assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PointField {
    Id,
    Name,
    PhysicalQuantity,
    UnitOfMeasure,
    UnitPrefix,
    AccessRight,
    DiscreteCoercion,
}

impl fmt::Display for PointField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PointField::Id => "id",
            PointField::Name => "name",
            PointField::PhysicalQuantity => "physicalQuantity",
            PointField::UnitOfMeasure => "unitOfMeasure",
            PointField::UnitPrefix => "unitPrefix",
            PointField::AccessRight => "accessRight",
            PointField::DiscreteCoercion => "discreteCoercion",
        };
        f.write_str(name)
    }
}

/// A rejected builder input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: PointField,
    pub input: String,
    pub reason: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}: {}", self.field, self.input, self.reason)
    }
}

/// Why [`MeasurementPointBuilder::try_build`] produced no point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid measurement point: {} rejected, {} missing", .errors.len(), .missing.len())]
pub struct BuildError {
    /// Inputs that could not be converted.
    pub errors: Vec<FieldError>,
    /// Required fields that are still unset (including rejected ones).
    pub missing: Vec<PointField>,
}

/// Builds a [`MeasurementPoint`] from loosely typed inputs.
#[derive(Debug, Default)]
pub struct MeasurementPointBuilder {
    point: Point,
    coercion: DiscreteCoercion,
    errors: Vec<FieldError>,
}

impl MeasurementPointBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: &str) -> Self {
        match id.parse::<i32>() {
            Ok(id) => self.point.set_id(id),
            Err(e) => self.reject(PointField::Id, id, format!("not an integer: {e}")),
        }
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        if name.is_empty() {
            self.reject(PointField::Name, name, "name must not be empty".to_string());
        } else {
            self.point.set_name(name);
        }
        self
    }

    pub fn physical_quantity(mut self, quantity: &str) -> Self {
        if let Some(quantity) = self.convert::<PhysicalQuantity>(PointField::PhysicalQuantity, quantity) {
            self.point.set_physical_quantity(quantity);
        }
        self
    }

    pub fn unit_of_measure(mut self, unit: &str) -> Self {
        if let Some(unit) = self.convert::<BaseUnitOfMeasure>(PointField::UnitOfMeasure, unit) {
            self.point.set_base_unit_of_measure(unit);
        }
        self
    }

    pub fn unit_prefix(mut self, prefix: &str) -> Self {
        if let Some(prefix) = self.convert::<UnitPrefix>(PointField::UnitPrefix, prefix) {
            self.point.set_unit_prefix(prefix);
        }
        self
    }

    pub fn access_right(mut self, access_right: &str) -> Self {
        if let Some(access_right) = self.convert::<AccessRight>(PointField::AccessRight, access_right) {
            self.point.set_access_right(access_right);
        }
        self
    }

    /// Optional; defaults to [`DiscreteCoercion::Strict`].
    pub fn discrete_coercion(mut self, coercion: &str) -> Self {
        if let Some(coercion) = self.convert::<DiscreteCoercion>(PointField::DiscreteCoercion, coercion) {
            self.coercion = coercion;
        }
        self
    }

    /// Field errors recorded so far.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// The point under construction.
    pub fn point(&self) -> &Point {
        &self.point
    }

    /// Build the point with its initial value applied, or `None` if it is invalid.
    pub fn build(self) -> Option<MeasurementPoint> {
        self.try_build().ok()
    }

    /// Build the point, or report every rejected input and unset field.
    pub fn try_build(self) -> Result<MeasurementPoint, BuildError> {
        if !self.point.is_valid() {
            return Err(BuildError {
                missing: missing_fields(&self.point),
                errors: self.errors,
            });
        }

        let mut measurement_point = MeasurementPoint::from_point(self.point);
        measurement_point.set_discrete_coercion(self.coercion);
        measurement_point.set_initial_value();
        Ok(measurement_point)
    }

    fn convert<T>(&mut self, field: PointField, input: &str) -> Option<T>
    where
        T: FromStr<Err = ParseEnumError>,
    {
        match input.parse::<T>() {
            Ok(value) => Some(value),
            Err(e) => {
                self.reject(field, input, e.to_string());
                None
            }
        }
    }

    fn reject(&mut self, field: PointField, input: &str, reason: String) {
        error!(%field, input, %reason, "Rejected measurement point field");
        self.errors.push(FieldError {
            field,
            input: input.to_string(),
            reason,
        });
    }
}

fn missing_fields(point: &Point) -> Vec<PointField> {
    let mut missing = Vec::new();
    if point.id().is_none() {
        missing.push(PointField::Id);
    }
    if point.name().map_or(true, str::is_empty) {
        missing.push(PointField::Name);
    }
    if point.physical_quantity().is_none() {
        missing.push(PointField::PhysicalQuantity);
    }
    if point.base_unit_of_measure().is_none() {
        missing.push(PointField::UnitOfMeasure);
    }
    if point.unit_prefix().is_none() {
        missing.push(PointField::UnitPrefix);
    }
    if point.access_right().is_none() {
        missing.push(PointField::AccessRight);
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleValue;
    use pretty_assertions::assert_eq;

    fn breaker_builder() -> MeasurementPointBuilder {
        MeasurementPointBuilder::new()
            .id("7")
            .name("Temp")
            .physical_quantity("NoQuantity")
            .unit_of_measure("NoUnit")
            .unit_prefix("NoPrefix")
            .access_right("Read")
    }

    #[test]
    fn test_build_valid_point_applies_initial_value() {
        let point = breaker_builder().build().expect("valid point");

        assert_eq!(point.id(), Some(7));
        assert_eq!(point.point().name(), Some("Temp"));
        assert_eq!(
            point.current_sample().unwrap().value(),
            Some(SampleValue::Boolean(false))
        );
    }

    #[test]
    fn test_real_valued_point_starts_at_zero() {
        let point = MeasurementPointBuilder::new()
            .id("12")
            .name("Feeder current")
            .physical_quantity("Current")
            .unit_of_measure("Ampere")
            .unit_prefix("Kilo")
            .access_right("ReadWrite")
            .build()
            .unwrap();

        assert_eq!(
            point.current_sample().unwrap().value(),
            Some(SampleValue::Double(0.0))
        );
        assert_eq!(point.point().display_unit(), "kA");
    }

    #[test]
    fn test_unparseable_id_leaves_id_unset() {
        let builder = breaker_builder().id("abc");
        // The earlier valid id survives; start fresh to see the unset state.
        assert_eq!(builder.point().id(), Some(7));

        let builder = MeasurementPointBuilder::new()
            .id("abc")
            .name("Temp")
            .physical_quantity("NoQuantity")
            .unit_of_measure("NoUnit")
            .unit_prefix("NoPrefix")
            .access_right("Read");
        assert_eq!(builder.point().id(), None);
        assert_eq!(builder.errors().len(), 1);
        assert_eq!(builder.errors()[0].field, PointField::Id);
        assert!(builder.build().is_none());
    }

    #[test]
    fn test_try_build_reports_all_failures() {
        let err = MeasurementPointBuilder::new()
            .id("x1")
            .name("Bus voltage")
            .physical_quantity("Voltage")
            .unit_of_measure("Volts")
            .access_right("Execute")
            .try_build()
            .unwrap_err();

        let rejected: Vec<_> = err.errors.iter().map(|e| e.field).collect();
        assert_eq!(
            rejected,
            vec![PointField::Id, PointField::UnitOfMeasure, PointField::AccessRight]
        );
        assert_eq!(
            err.missing,
            vec![
                PointField::Id,
                PointField::UnitOfMeasure,
                PointField::UnitPrefix,
                PointField::AccessRight,
            ]
        );
        assert_eq!(err.errors[1].input, "Volts");
        assert_eq!(err.to_string(), "Invalid measurement point: 3 rejected, 4 missing");
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let builder = breaker_builder().name("");
        // The previous name is kept; the empty one is only recorded.
        assert_eq!(builder.point().name(), Some("Temp"));
        assert_eq!(builder.errors()[0].field, PointField::Name);

        let err = MeasurementPointBuilder::new().name("").try_build().unwrap_err();
        assert!(err.missing.contains(&PointField::Name));
    }

    #[test]
    fn test_discrete_coercion_setting() {
        let point = breaker_builder().discrete_coercion("Lenient").build().unwrap();
        assert_eq!(point.discrete_coercion(), DiscreteCoercion::Lenient);

        let builder = breaker_builder().discrete_coercion("Loose");
        assert_eq!(builder.errors()[0].field, PointField::DiscreteCoercion);
        // An unknown policy does not invalidate the point.
        assert_eq!(builder.build().unwrap().discrete_coercion(), DiscreteCoercion::Strict);
    }

    #[test]
    fn test_field_error_display() {
        let builder = MeasurementPointBuilder::new().unit_prefix("kilo");
        assert_eq!(
            builder.errors()[0].to_string(),
            "unitPrefix \"kilo\": Cannot convert \"kilo\" to a UnitPrefix"
        );
    }
}
