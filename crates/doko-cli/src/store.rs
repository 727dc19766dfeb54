//! JSON file holding the club snapshot.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use doko_core::ClubSnapshot;

/// File name of the snapshot inside the data directory.
const SNAPSHOT_FILE: &str = "storage.json";

/// Reads and replaces the snapshot file as a whole.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Use an explicit path, or the platform data directory.
    pub fn locate(path: Option<PathBuf>) -> Result<Self, String> {
        let path = match path {
            Some(p) => p,
            None => ProjectDirs::from("de", "doko", "doko")
                .ok_or("cannot determine a data directory; pass --data")?
                .data_dir()
                .join(SNAPSHOT_FILE),
        };
        Ok(Self { path })
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot. A missing file is an empty club.
    pub fn load(&self) -> Result<ClubSnapshot, String> {
        match fs::read_to_string(&self.path) {
            Ok(json) => ClubSnapshot::from_json(&json)
                .map_err(|e| format!("cannot read {}: {e}", self.path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no snapshot yet, starting empty");
                Ok(ClubSnapshot::default())
            }
            Err(e) => Err(format!("cannot read {}: {e}", self.path.display())),
        }
    }

    /// Write the snapshot. The new content goes to a sibling file first and
    /// is renamed over the old one.
    pub fn save(&self, club: &mut ClubSnapshot) -> Result<(), String> {
        club.mark_saved();
        let json = club.to_json_pretty().map_err(|e| e.to_string())?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| format!("cannot create {}: {e}", dir.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| format!("cannot write {}: {e}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| format!("cannot replace {}: {e}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }
}
