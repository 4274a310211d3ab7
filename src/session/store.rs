// ABOUTME: Meeting file store — one pretty-printed JSON file per sanitized meeting name.
// ABOUTME: Saves overwrite wholesale via tmp + rename; loads default-fill any missing keys.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{MeetingError, Result};
use crate::model::SessionRecord;

const UNTITLED: &str = "untitled";

/// Map a meeting name to a safe file stem: Unicode alphanumerics, `-` and `_`
/// are kept, everything else becomes `_`, and leading/trailing `_` are trimmed.
pub fn sanitize_name(name: &str) -> String {
    let mapped: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let trimmed = mapped.trim_matches('_');
    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Directory-backed store of saved meetings.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file a meeting name maps to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_name(name)))
    }

    /// Write `record` under `name`, replacing any previous file. No lock is
    /// taken: concurrent writers race and the last rename wins.
    pub fn save(&self, name: &str, record: &SessionRecord) -> Result<PathBuf> {
        let path = self.path_for(name);
        save_record_to(&path, record)?;
        info!(meeting = name, path = %path.display(), entries = record.chat_history.len(), "meeting saved");
        Ok(path)
    }

    /// Read the meeting saved under `name`.
    pub fn load(&self, name: &str) -> Result<SessionRecord> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(MeetingError::SessionNotFound(name.to_string()));
        }
        let record = load_record_from(&path)?;
        info!(meeting = name, entries = record.chat_history.len(), "meeting loaded");
        Ok(record)
    }

    /// Names of all saved meetings, sorted. Each file's own `meeting_name` is
    /// preferred; unreadable or unnamed files are listed by file stem.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            let name = match load_record_from(&path) {
                Ok(record) if !record.meeting_name.trim().is_empty() => record.meeting_name,
                Ok(_) => stem,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "listing unreadable meeting file by name");
                    stem
                }
            };
            names.push(name);
        }
        names.sort();
        Ok(names)
    }
}

/// Load a record from an explicit file path.
pub fn load_record_from(path: &Path) -> Result<SessionRecord> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| MeetingError::parse(format!("meeting file {}", path.display()), e))
}

/// Save a record to an explicit file path (atomic write via tmp + rename).
pub fn save_record_to(path: &Path, record: &SessionRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    let content = serde_json::to_string_pretty(record)
        .map_err(|e| MeetingError::parse("meeting record", e))?;
    std::fs::write(&tmp_path, &content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
