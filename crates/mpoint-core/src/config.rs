//! Point configuration and its storage.
//!
//! Point definitions are kept as plain strings, exactly as they arrive from a
//! config file, and are validated by feeding them through
//! [`MeasurementPointBuilder`]. Storage is abstracted behind
//! [`ConfigStorage`] so the same definitions can live in a directory of JSON
//! files or anywhere else a collaborator chooses.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::builder::MeasurementPointBuilder;

/// Key under which point definitions are stored.
pub const POINTS_KEY: &str = "points";

/// Errors that can occur during configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The requested configuration was not found.
    NotFound(String),
    /// Failed to read configuration.
    ReadError(String),
    /// Failed to write configuration.
    WriteError(String),
    /// Configuration data is invalid.
    InvalidData(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(key) => write!(f, "Configuration not found: {}", key),
            ConfigError::ReadError(msg) => write!(f, "Read error: {}", msg),
            ConfigError::WriteError(msg) => write!(f, "Write error: {}", msg),
            ConfigError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// One measurement point as written in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointDefinition {
    pub id: String,
    pub name: String,
    pub physical_quantity: String,
    pub unit_of_measure: String,
    pub unit_prefix: String,
    pub access_right: String,

    /// "Strict" (default) or "Lenient".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discrete_coercion: Option<String>,
}

impl PointDefinition {
    /// A builder pre-loaded with this definition.
    pub fn builder(&self) -> MeasurementPointBuilder {
        let builder = MeasurementPointBuilder::new()
            .id(&self.id)
            .name(&self.name)
            .physical_quantity(&self.physical_quantity)
            .unit_of_measure(&self.unit_of_measure)
            .unit_prefix(&self.unit_prefix)
            .access_right(&self.access_right);
        match &self.discrete_coercion {
            Some(coercion) => builder.discrete_coercion(coercion),
            None => builder,
        }
    }
}

/// The full set of point definitions for one data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsConfig {
    pub points: Vec<PointDefinition>,
}

impl PointsConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidData(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound(path.display().to_string()),
            _ => ConfigError::ReadError(format!("{}: {}", path.display(), e)),
        })?;
        Self::from_json_str(&json)
    }
}

/// Abstract configuration storage.
///
/// All methods are synchronous; the core has no async runtime.
pub trait ConfigStorage: Send + Sync {
    /// Load point definitions.
    fn load_points(&self) -> Result<PointsConfig, ConfigError> {
        self.load_value(POINTS_KEY)
    }

    /// Save point definitions.
    fn save_points(&self, config: &PointsConfig) -> Result<(), ConfigError> {
        self.save_value(POINTS_KEY, config)
    }

    /// Load a value by key.
    fn load_value<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError>;

    /// Save a value by key.
    fn save_value<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError>;

    /// Check if a key exists.
    fn has_key(&self, key: &str) -> bool;

    /// Delete a key.
    fn delete_key(&self, key: &str) -> Result<(), ConfigError>;
}

/// File-based storage: each key is `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileConfigStorage {
    dir: PathBuf,
}

impl FileConfigStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ConfigStorage for FileConfigStorage {
    fn load_value<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let json = fs::read_to_string(self.path_for(key)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound(key.to_string()),
            _ => ConfigError::ReadError(e.to_string()),
        })?;
        serde_json::from_str(&json).map_err(|e| ConfigError::InvalidData(e.to_string()))
    }

    fn save_value<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        fs::create_dir_all(&self.dir).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        fs::write(self.path_for(key), json).map_err(|e| ConfigError::WriteError(e.to_string()))
    }

    fn has_key(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }

    fn delete_key(&self, key: &str) -> Result<(), ConfigError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConfigError::WriteError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// In-memory storage for testing.
    struct MemoryConfigStorage {
        data: RwLock<HashMap<String, String>>,
    }

    impl MemoryConfigStorage {
        fn new() -> Self {
            Self {
                data: RwLock::new(HashMap::new()),
            }
        }
    }

    impl ConfigStorage for MemoryConfigStorage {
        fn load_value<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
            let data = self.data.read().unwrap();
            let json = data
                .get(key)
                .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidData(e.to_string()))
        }

        fn save_value<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
            let json =
                serde_json::to_string(value).map_err(|e| ConfigError::WriteError(e.to_string()))?;
            self.data.write().unwrap().insert(key.to_string(), json);
            Ok(())
        }

        fn has_key(&self, key: &str) -> bool {
            self.data.read().unwrap().contains_key(key)
        }

        fn delete_key(&self, key: &str) -> Result<(), ConfigError> {
            self.data.write().unwrap().remove(key);
            Ok(())
        }
    }

    const POINTS_JSON: &str = r#"{
        "points": [
            {
                "id": "1",
                "name": "Feeder current",
                "physicalQuantity": "Current",
                "unitOfMeasure": "Ampere",
                "unitPrefix": "NoPrefix",
                "accessRight": "Read"
            },
            {
                "id": "2",
                "name": "Breaker closed",
                "physicalQuantity": "NoQuantity",
                "unitOfMeasure": "NoUnit",
                "unitPrefix": "NoPrefix",
                "accessRight": "ReadWrite",
                "discreteCoercion": "Lenient"
            }
        ]
    }"#;

    #[test]
    fn test_parse_points_config() {
        let config = PointsConfig::from_json_str(POINTS_JSON).unwrap();

        assert_eq!(config.points.len(), 2);
        assert_eq!(config.points[0].physical_quantity, "Current");
        assert_eq!(config.points[0].discrete_coercion, None);
        assert_eq!(config.points[1].discrete_coercion.as_deref(), Some("Lenient"));
    }

    #[test]
    fn test_definition_builds_point() {
        let config = PointsConfig::from_json_str(POINTS_JSON).unwrap();
        let point = config.points[1].builder().build().unwrap();

        assert_eq!(point.id(), Some(2));
        assert_eq!(
            point.discrete_coercion(),
            crate::metadata::DiscreteCoercion::Lenient
        );
    }

    #[test]
    fn test_invalid_json() {
        let err = PointsConfig::from_json_str("{\"points\": 3}").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidData(_)));
    }

    #[test]
    fn test_points_round_trip_through_storage() {
        let storage = MemoryConfigStorage::new();
        assert!(matches!(storage.load_points(), Err(ConfigError::NotFound(_))));

        let config = PointsConfig::from_json_str(POINTS_JSON).unwrap();
        storage.save_points(&config).unwrap();

        assert!(storage.has_key(POINTS_KEY));
        assert_eq!(storage.load_points().unwrap(), config);

        storage.delete_key(POINTS_KEY).unwrap();
        assert!(!storage.has_key(POINTS_KEY));
    }

    #[test]
    fn test_file_storage() {
        let dir = std::env::temp_dir().join(format!("mpoint-config-test-{}", std::process::id()));
        let storage = FileConfigStorage::new(&dir);
        let config = PointsConfig::from_json_str(POINTS_JSON).unwrap();

        storage.save_points(&config).unwrap();
        assert!(storage.has_key(POINTS_KEY));
        assert_eq!(storage.load_points().unwrap(), config);
        assert_eq!(
            PointsConfig::from_file(dir.join("points.json")).unwrap(),
            config
        );

        storage.delete_key(POINTS_KEY).unwrap();
        storage.delete_key(POINTS_KEY).unwrap();
        assert!(matches!(storage.load_points(), Err(ConfigError::NotFound(_))));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file() {
        let err = PointsConfig::from_file("/nonexistent/mpoint/points.json").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
        assert!(err.to_string().starts_with("Configuration not found"));
    }
}
