//! Sample playback.
//!
//! A recording is a JSON array of [`SampleRecord`]s. Each record is routed to
//! its point through the registry; failures are logged and skipped so one bad
//! line does not stop the replay.

use std::path::Path;
use std::time::Duration;

use chrono::{FixedOffset, Local, NaiveDateTime};
use serde::Deserialize;
use tracing::{info, warn};

use mpoint_core::{LiveNode, LiveValue, MemoryRegistry, PointRegistry, Quality};

/// One recorded sample.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRecord {
    pub point_id: i32,
    /// A number, a string, or a boolean for discrete points.
    pub value: serde_json::Value,
    #[serde(default)]
    pub quality: Option<Quality>,
    /// Local capture time; defaults to the time of playback.
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    /// Seconds east of UTC; defaults to the platform offset.
    #[serde(default)]
    pub zone_offset: Option<i32>,
}

impl SampleRecord {
    /// The raw string handed to the point for coercion.
    pub fn raw_value(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Bool(true) => "1".to_string(),
            serde_json::Value::Bool(false) => "0".to_string(),
            other => other.to_string(),
        }
    }
}

pub fn load_recording(path: &Path) -> anyhow::Result<Vec<SampleRecord>> {
    let json = std::fs::read_to_string(path)?;
    let records = serde_json::from_str(&json)?;
    Ok(records)
}

/// Live node that logs every value it receives.
pub struct TracingNode {
    node_id: String,
}

impl TracingNode {
    pub fn new(point_id: i32) -> Self {
        Self {
            node_id: format!("ns=2;i={point_id}"),
        }
    }
}

impl LiveNode for TracingNode {
    fn node_id(&self) -> &str {
        &self.node_id
    }

    fn set_value(&self, value: LiveValue) {
        info!(
            node = %self.node_id,
            value = ?value.value,
            status = ?value.status,
            time = %value.source_time,
            "Live value"
        );
    }
}

/// Apply one record. Returns false when it was rejected.
pub fn apply_record(registry: &mut MemoryRegistry, record: &SampleRecord) -> bool {
    let now = Local::now();
    let timestamp = record.timestamp.unwrap_or_else(|| now.naive_local());
    let zone_offset = match record.zone_offset {
        None => *now.offset(),
        Some(secs) => match FixedOffset::east_opt(secs) {
            Some(offset) => offset,
            None => {
                warn!(
                    point_id = record.point_id,
                    zone_offset = secs,
                    "Skipping sample with out-of-range zone offset"
                );
                return false;
            }
        },
    };
    let raw = record.raw_value();

    match registry.apply_sample(
        record.point_id,
        &raw,
        record.quality.unwrap_or_default(),
        timestamp,
        zone_offset,
    ) {
        Ok(()) => true,
        Err(e) => {
            warn!(point_id = record.point_id, raw = %raw, error = %e, "Skipping sample");
            false
        }
    }
}

/// Replay `records` at `interval`, optionally forever.
pub async fn play(
    registry: &mut MemoryRegistry,
    records: &[SampleRecord],
    interval: Duration,
    repeat: bool,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        let mut rejected = 0usize;
        for record in records {
            ticker.tick().await;
            if !apply_record(registry, record) {
                rejected += 1;
            }
        }
        info!(total = records.len(), rejected, "Playback pass finished");
        if !repeat || records.is_empty() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpoint_core::{PointsConfig, SampleValue};

    fn registry() -> MemoryRegistry {
        let config = PointsConfig::from_json_str(
            r#"{"points": [
                {"id": "1", "name": "Current", "physicalQuantity": "Current",
                 "unitOfMeasure": "Ampere", "unitPrefix": "NoPrefix", "accessRight": "Read"},
                {"id": "2", "name": "Breaker", "physicalQuantity": "NoQuantity",
                 "unitOfMeasure": "NoUnit", "unitPrefix": "NoPrefix", "accessRight": "Read"}
            ]}"#,
        )
        .unwrap();
        MemoryRegistry::from_config(&config).0
    }

    fn records(json: &str) -> Vec<SampleRecord> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_raw_value() {
        let recs = records(
            r#"[
                {"pointId": 1, "value": 12.5},
                {"pointId": 1, "value": "7"},
                {"pointId": 2, "value": true},
                {"pointId": 2, "value": false}
            ]"#,
        );
        let raws: Vec<_> = recs.iter().map(SampleRecord::raw_value).collect();
        assert_eq!(raws, vec!["12.5", "7", "1", "0"]);
    }

    #[test]
    fn test_apply_records() {
        let mut registry = registry();
        let recs = records(
            r#"[
                {"pointId": 1, "value": 3.5, "quality": "Uncertain",
                 "timestamp": "2024-01-17T10:30:00", "zoneOffset": 3600},
                {"pointId": 2, "value": "1"},
                {"pointId": 2, "value": "open"},
                {"pointId": 99, "value": 1},
                {"pointId": 1, "value": 9.0,
                 "timestamp": "2024-01-17T10:30:00", "zoneOffset": 999999}
            ]"#,
        );

        let applied: Vec<_> = recs.iter().map(|r| apply_record(&mut registry, r)).collect();
        assert_eq!(applied, vec![true, true, false, false, false]);

        let sample = registry.get(1).unwrap().current_sample().unwrap();
        assert_eq!(sample.value(), Some(SampleValue::Double(3.5)));
        assert_eq!(sample.quality(), Quality::Uncertain);
        assert_eq!(sample.zoned_timestamp().unwrap().to_rfc3339(), "2024-01-17T10:30:00+01:00");

        let breaker = registry.get(2).unwrap().current_sample().unwrap();
        assert_eq!(breaker.value(), Some(SampleValue::Boolean(true)));
        assert_eq!(breaker.quality(), Quality::Good);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_single_pass() {
        let mut registry = registry();
        let recs = records(r#"[{"pointId": 1, "value": 1}, {"pointId": 1, "value": 2}]"#);

        play(&mut registry, &recs, Duration::from_millis(100), false).await;

        let sample = registry.get(1).unwrap().current_sample().unwrap();
        assert_eq!(sample.value(), Some(SampleValue::Double(2.0)));
    }
}
