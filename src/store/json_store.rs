use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};

use crate::engine::mastery::PracticeSet;
use crate::session::practice::MasteryHook;
use crate::store::StoreError;

/// Practice sets on disk, one JSON file per set under `<base>/sets/`.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fieldguide");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(base_dir.join("sets"))?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Set ids become file names, so they may not name another directory.
    fn set_path(&self, set_id: &str) -> Result<PathBuf, StoreError> {
        let invalid = set_id.is_empty()
            || set_id.starts_with('.')
            || set_id.contains(['/', '\\'])
            || Path::new(set_id).components().count() != 1;
        if invalid {
            return Err(StoreError::InvalidSetId(set_id.to_string()));
        }
        Ok(self.file_path("sets").join(format!("{set_id}.json")))
    }

    fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let data = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(data))
    }

    fn save<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// `Ok(None)` when the set was never saved. A corrupt file is an error.
    pub fn load_set(&self, set_id: &str) -> Result<Option<PracticeSet>> {
        self.load(&self.set_path(set_id)?)
    }

    pub fn save_set(&self, set: &PracticeSet) -> Result<()> {
        self.save(&self.set_path(&set.id)?, set)
    }

    /// Stored progress if there is any, otherwise `fallback` (typically a
    /// freshly loaded bundled set).
    pub fn load_or(&self, fallback: PracticeSet) -> Result<PracticeSet> {
        Ok(self.load_set(&fallback.id)?.unwrap_or(fallback))
    }

    pub fn stored_sets(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(self.file_path("sets"))? {
            let path = entry?.path();
            if path.extension().and_then(|x| x.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    pub fn delete_set(&self, set_id: &str) -> Result<bool> {
        let path = self.set_path(set_id)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    pub fn update_mastery(
        &self,
        set_id: &str,
        group_id: &str,
        entity_id: &str,
        mastery: f64,
    ) -> Result<()> {
        let missing = || StoreError::MissingEntity {
            set_id: set_id.to_string(),
            group_id: group_id.to_string(),
            entity_id: entity_id.to_string(),
        };
        let mut set = self.load_set(set_id)?.ok_or_else(missing)?;
        let entity = set.entity_mut(group_id, entity_id).ok_or_else(missing)?;
        entity.mastery = mastery;
        self.save_set(&set)
    }
}

impl MasteryHook for JsonStore {
    fn persist(&mut self, set_id: &str, group_id: &str, entity_id: &str, mastery: f64) -> Result<()> {
        self.update_mastery(set_id, group_id, entity_id, mastery)
    }
}
