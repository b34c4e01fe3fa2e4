use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::scheduler::{ProgressMap, SrsParams};
use crate::storage::migrate::migrate_progress;
use crate::storage::{ProgressStore, StorageResult};

/// Progress map as a pretty-printed JSON object on disk.
pub struct JsonProgressStore {
    path: PathBuf,
    params: SrsParams,
}

impl JsonProgressStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_params(path, SrsParams::default())
    }

    /// `params` bound the easiness clamp and history cap applied on load.
    pub fn with_params<P: AsRef<Path>>(path: P, params: SrsParams) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            params,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self) -> PathBuf {
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".backup.{stamp}"));
        PathBuf::from(name)
    }

    fn write_atomic(&self, contents: &str) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ProgressStore for JsonProgressStore {
    fn load(&self) -> StorageResult<ProgressMap> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "no progress file found, starting fresh");
            return Ok(ProgressMap::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            tracing::info!(path = %self.path.display(), "empty progress file, starting fresh");
            return Ok(ProgressMap::new());
        }

        let document: serde_json::Value = serde_json::from_str(&contents)?;
        let progress = migrate_progress(document, &self.params)?;
        tracing::info!(path = %self.path.display(), records = progress.len(), "loaded progress");
        Ok(progress)
    }

    fn save(&self, progress: &ProgressMap) -> StorageResult<()> {
        let contents = serde_json::to_string_pretty(progress)?;
        self.write_atomic(&contents)?;
        tracing::debug!(path = %self.path.display(), records = progress.len(), "saved progress");
        Ok(())
    }

    fn backup(&self) -> StorageResult<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let target = self.backup_path();
        fs::copy(&self.path, &target)?;
        tracing::info!(backup = %target.display(), "progress backed up");
        Ok(Some(target))
    }

    fn reset(&self, backup: bool) -> StorageResult<Option<PathBuf>> {
        let backup_path = if backup { self.backup()? } else { None };

        self.write_atomic("{}")?;
        tracing::info!(path = %self.path.display(), "progress reset");
        Ok(backup_path)
    }
}
