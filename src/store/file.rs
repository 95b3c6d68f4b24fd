// Whole-map file database

use super::{Database, MeasurementMap, blob};
use crate::models::Measurement;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Keeps the entire map in one file, rewritten on every save.
#[derive(Debug, Clone)]
pub struct FileDatabase {
    path: PathBuf,
    name: String,
}

impl FileDatabase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "measurements".into());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Database for FileDatabase {
    fn save(&self, map: &MeasurementMap) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let records: Vec<Measurement> = map.values().cloned().collect();
        let payload =
            wincode::serialize(&records).map_err(|e| anyhow::anyhow!("wincode: {}", e))?;

        // Readers only ever see a complete file.
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, blob::encode(payload))?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn load(&self) -> anyhow::Result<MeasurementMap> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(MeasurementMap::new()),
            Err(e) => return Err(e.into()),
        };
        let records: Vec<Measurement> = wincode::deserialize(blob::decode(&bytes)?)
            .map_err(|e| anyhow::anyhow!("wincode deserialize measurements: {}", e))?;
        Ok(records.into_iter().map(|m| (m.timestamp, m)).collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
