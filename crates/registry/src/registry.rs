//! The persisted entity → model mapping.

use crate::error::{RegistryError, Result};
use crate::model::FittedModel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Version written into every registry file.
pub const REGISTRY_FORMAT_VERSION: u32 = 1;

/// Immutable mapping from entity identifier to its fitted model.
///
/// Built once by training (via [`FromIterator`]) or by loading a file; there
/// is no way to mutate it afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelRegistry {
    models: BTreeMap<String, FittedModel>,
}

#[derive(Serialize)]
struct RegistryFileRef<'a> {
    format_version: u32,
    models: &'a BTreeMap<String, FittedModel>,
}

#[derive(Deserialize)]
struct RegistryFile {
    format_version: u32,
    models: BTreeMap<String, FittedModel>,
}

impl ModelRegistry {
    /// Entity identifiers in ascending order
    pub fn entities(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    pub fn get(&self, entity: &str) -> Option<&FittedModel> {
        self.models.get(entity)
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.models.contains_key(entity)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FittedModel)> {
        self.models.iter()
    }

    /// Serialize the registry as a versioned JSON document.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let file = RegistryFileRef {
            format_version: REGISTRY_FORMAT_VERSION,
            models: &self.models,
        };
        serde_json::to_writer(writer, &file)?;
        Ok(())
    }

    /// Deserialize a registry, rejecting other format versions.
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let file: RegistryFile = serde_json::from_reader(reader)?;
        if file.format_version != REGISTRY_FORMAT_VERSION {
            return Err(RegistryError::UnsupportedFormat {
                found: file.format_version,
                expected: REGISTRY_FORMAT_VERSION,
            });
        }
        Ok(Self {
            models: file.models,
        })
    }

    /// Write the registry to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| RegistryError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush().map_err(|e| RegistryError::io(path, e))?;
        tracing::info!(path = %path.display(), models = self.len(), "registry saved");
        Ok(())
    }

    /// Load a registry written by [`ModelRegistry::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| RegistryError::io(path, e))?;
        let registry = Self::read_from(BufReader::new(file))?;
        tracing::info!(path = %path.display(), models = registry.len(), "registry loaded");
        Ok(registry)
    }
}

impl FromIterator<(String, FittedModel)> for ModelRegistry {
    fn from_iter<I: IntoIterator<Item = (String, FittedModel)>>(iter: I) -> Self {
        Self {
            models: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FittedState;
    use algorithm_core::DampedHolt;

    fn sample_registry() -> ModelRegistry {
        let model = |values: &[f64]| {
            let holt = DampedHolt::auto(values).unwrap();
            FittedModel::new(FittedState::DampedHolt(holt), 2020, values.len())
        };
        vec![
            ("Chile".to_string(), model(&[80.0, 82.0, 85.0, 84.0])),
            ("Benin".to_string(), model(&[6.0, 6.5, 7.1])),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_entities_sorted() {
        let registry = sample_registry();
        assert_eq!(registry.entities(), vec!["Benin", "Chile"]);
        assert!(registry.contains("Chile"));
        assert!(registry.get("Peru").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_write_then_read() {
        let registry = sample_registry();
        let mut buffer = Vec::new();
        registry.write_to(&mut buffer).unwrap();

        let restored = ModelRegistry::read_from(buffer.as_slice()).unwrap();
        assert_eq!(restored, registry);
        assert_eq!(
            restored.get("Chile").unwrap().forecast(3).unwrap(),
            registry.get("Chile").unwrap().forecast(3).unwrap()
        );
    }

    #[test]
    fn test_rejects_unknown_version() {
        let json = r#"{"format_version": 99, "models": {}}"#;
        let result = ModelRegistry::read_from(json.as_bytes());
        assert!(matches!(
            result,
            Err(RegistryError::UnsupportedFormat {
                found: 99,
                expected: 1
            })
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        let result = ModelRegistry::read_from("not json".as_bytes());
        assert!(matches!(result, Err(RegistryError::Serialization(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ModelRegistry::load(Path::new("/nonexistent/registry.json"));
        assert!(matches!(result, Err(RegistryError::Io { .. })));
    }
}
