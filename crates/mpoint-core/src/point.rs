//! Point identity and descriptive metadata.

use serde::{Deserialize, Serialize};

use crate::metadata::{AccessRight, BaseUnitOfMeasure, PhysicalQuantity, UnitPrefix};

/// Identity and metadata of a data point.
///
/// Setters do not validate; a point may be partially assigned while it is
/// being built. [`Point::is_valid`] is the single validity gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    physical_quantity: Option<PhysicalQuantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_unit_of_measure: Option<BaseUnitOfMeasure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit_prefix: Option<UnitPrefix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_right: Option<AccessRight>,
}

impl Point {
    /// Create a fully assigned point.
    pub fn new(
        id: i32,
        name: impl Into<String>,
        physical_quantity: PhysicalQuantity,
        base_unit_of_measure: BaseUnitOfMeasure,
        unit_prefix: UnitPrefix,
        access_right: AccessRight,
    ) -> Self {
        Self {
            id: Some(id),
            name: Some(name.into()),
            physical_quantity: Some(physical_quantity),
            base_unit_of_measure: Some(base_unit_of_measure),
            unit_prefix: Some(unit_prefix),
            access_right: Some(access_right),
        }
    }

    /// True iff every field is assigned and the name is non-empty.
    pub fn is_valid(&self) -> bool {
        self.id.is_some()
            && self.name.as_deref().is_some_and(|n| !n.is_empty())
            && self.physical_quantity.is_some()
            && self.base_unit_of_measure.is_some()
            && self.unit_prefix.is_some()
            && self.access_right.is_some()
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn physical_quantity(&self) -> Option<PhysicalQuantity> {
        self.physical_quantity
    }

    pub fn set_physical_quantity(&mut self, quantity: PhysicalQuantity) {
        self.physical_quantity = Some(quantity);
    }

    pub fn base_unit_of_measure(&self) -> Option<BaseUnitOfMeasure> {
        self.base_unit_of_measure
    }

    pub fn set_base_unit_of_measure(&mut self, unit: BaseUnitOfMeasure) {
        self.base_unit_of_measure = Some(unit);
    }

    pub fn unit_prefix(&self) -> Option<UnitPrefix> {
        self.unit_prefix
    }

    pub fn set_unit_prefix(&mut self, prefix: UnitPrefix) {
        self.unit_prefix = Some(prefix);
    }

    pub fn access_right(&self) -> Option<AccessRight> {
        self.access_right
    }

    pub fn set_access_right(&mut self, access_right: AccessRight) {
        self.access_right = Some(access_right);
    }

    /// True when values of this point are booleans (quantity `NoQuantity`).
    ///
    /// A point without a quantity is treated as real-valued.
    pub fn is_discrete(&self) -> bool {
        self.physical_quantity
            .is_some_and(|q| q.is_discrete())
    }

    /// Unit label for display, e.g. "kA". Empty when no unit is assigned.
    pub fn display_unit(&self) -> String {
        let prefix = self.unit_prefix.map(|p| p.symbol()).unwrap_or("");
        let unit = self.base_unit_of_measure.map(|u| u.symbol()).unwrap_or("");
        if unit.is_empty() {
            String::new()
        } else {
            format!("{prefix}{unit}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn current_point() -> Point {
        Point::new(
            3,
            "Feeder current",
            PhysicalQuantity::Current,
            BaseUnitOfMeasure::Ampere,
            UnitPrefix::Kilo,
            AccessRight::Read,
        )
    }

    #[test]
    fn test_fully_assigned_point_is_valid() {
        let point = current_point();
        assert!(point.is_valid());
        assert_eq!(point.id(), Some(3));
        assert_eq!(point.name(), Some("Feeder current"));
    }

    #[test]
    fn test_default_point_is_invalid() {
        assert!(!Point::default().is_valid());
    }

    #[test]
    fn test_each_missing_field_invalidates() {
        let mut point = Point::default();
        point.set_id(1);
        point.set_name("Breaker closed");
        point.set_physical_quantity(PhysicalQuantity::NoQuantity);
        point.set_base_unit_of_measure(BaseUnitOfMeasure::NoUnit);
        point.set_unit_prefix(UnitPrefix::NoPrefix);
        assert!(!point.is_valid());

        point.set_access_right(AccessRight::ReadWrite);
        assert!(point.is_valid());
    }

    #[test]
    fn test_empty_name_is_invalid() {
        let mut point = current_point();
        point.set_name("");
        assert!(!point.is_valid());
    }

    #[test]
    fn test_is_discrete() {
        let mut point = Point::default();
        assert!(!point.is_discrete());

        point.set_physical_quantity(PhysicalQuantity::NoQuantity);
        assert!(point.is_discrete());

        point.set_physical_quantity(PhysicalQuantity::Voltage);
        assert!(!point.is_discrete());
    }

    #[test]
    fn test_display_unit() {
        assert_eq!(current_point().display_unit(), "kA");
        assert_eq!(Point::default().display_unit(), "");
    }

    #[test]
    fn test_serialize_skips_unset_fields() {
        let mut point = Point::default();
        point.set_id(9);
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"id":9}"#);

        let json = serde_json::to_value(current_point()).unwrap();
        assert_eq!(json["physicalQuantity"], "Current");
        assert_eq!(json["baseUnitOfMeasure"], "Ampere");
    }
}
