//! Samples: one timestamped, quality-tagged value of a measurement point.
//!
//! A [`Sample`] is immutable. Every update builds a new one and the previous
//! sample is dropped; no history is kept.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::live::{LiveValue, Variant};
use crate::metadata::Quality;

/// A typed sample value: a real number or a discrete boolean, never both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleValue {
    Double(f64),
    Boolean(bool),
}

impl SampleValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SampleValue::Double(v) => Some(*v),
            SampleValue::Boolean(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SampleValue::Boolean(b) => Some(*b),
            SampleValue::Double(_) => None,
        }
    }
}

impl From<f64> for SampleValue {
    fn from(v: f64) -> Self {
        SampleValue::Double(v)
    }
}

impl From<bool> for SampleValue {
    fn from(b: bool) -> Self {
        SampleValue::Boolean(b)
    }
}

/// One value of a measurement point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Absent only for discrete points fed an unrecognized token in lenient mode.
    value: Option<SampleValue>,
    quality: Quality,
    /// Local time at which the value was captured.
    timestamp: NaiveDateTime,
    /// UTC offset the timestamp was captured under.
    #[serde(with = "offset_seconds")]
    zone_offset: FixedOffset,
}

/// Serializes a `FixedOffset` as seconds east of UTC.
mod offset_seconds {
    use chrono::FixedOffset;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(offset: &FixedOffset, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(offset.local_minus_utc())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FixedOffset, D::Error> {
        let secs = i32::deserialize(deserializer)?;
        FixedOffset::east_opt(secs)
            .ok_or_else(|| D::Error::custom(format!("offset out of range: {secs}")))
    }
}

impl Sample {
    /// Create a sample from an already coerced value.
    pub fn new(
        value: impl Into<SampleValue>,
        quality: Quality,
        timestamp: NaiveDateTime,
        zone_offset: FixedOffset,
    ) -> Self {
        Self {
            value: Some(value.into()),
            quality,
            timestamp,
            zone_offset,
        }
    }

    /// Create a sample that carries no value.
    pub fn absent(quality: Quality, timestamp: NaiveDateTime, zone_offset: FixedOffset) -> Self {
        Self {
            value: None,
            quality,
            timestamp,
            zone_offset,
        }
    }

    pub(crate) fn from_parts(
        value: Option<SampleValue>,
        quality: Quality,
        timestamp: NaiveDateTime,
        zone_offset: FixedOffset,
    ) -> Self {
        Self {
            value,
            quality,
            timestamp,
            zone_offset,
        }
    }

    pub fn value(&self) -> Option<SampleValue> {
        self.value
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn zone_offset(&self) -> FixedOffset {
        self.zone_offset
    }

    /// The capture time as an offset-aware instant.
    ///
    /// `None` when the timestamp is so close to the limits of `NaiveDateTime`
    /// that shifting it to UTC overflows.
    pub fn zoned_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        let offset = Duration::seconds(i64::from(self.zone_offset.local_minus_utc()));
        let utc = self.timestamp.checked_sub_signed(offset)?;
        Some(DateTime::from_naive_utc_and_offset(utc, self.zone_offset))
    }

    /// Compare value and quality, ignoring when the samples were taken.
    pub fn same_value(&self, other: &Sample) -> bool {
        self.value == other.value && self.quality == other.quality
    }

    /// Representation pushed to a live node on every accepted update.
    pub fn live_value(&self) -> LiveValue {
        LiveValue::good_now(Variant::from(self.value))
    }

    /// Representation pushed to a live node when it is cleared.
    pub fn cleared_value(&self) -> LiveValue {
        LiveValue::good_now(Variant::Empty)
    }
}
