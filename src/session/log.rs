// ABOUTME: JSONL transcript logger — appends every history entry a meeting produces.
// ABOUTME: One file per app run in <data dir>/meeting-assistant/transcripts/<timestamp>.jsonl.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::model::HistoryEntry;

/// A single JSONL line: when, which meeting, and the entry itself.
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub timestamp: String,
    pub meeting: String,
    pub entry: HistoryEntry,
}

/// Appends history entries as JSONL lines to a transcript file.
pub struct TranscriptLogger {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl TranscriptLogger {
    /// Open a new transcript file in the default transcripts directory.
    pub fn new() -> anyhow::Result<Self> {
        Self::new_in_dir(&Config::transcripts_dir())
    }

    /// Open a new transcript file in a specific directory (for testing).
    pub fn new_in_dir(dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(dir)?;
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f").to_string();
        let path = dir.join(format!("{}.jsonl", timestamp));
        let file = File::create(&path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry for `meeting`.
    pub fn log_entry(&mut self, meeting: &str, entry: &HistoryEntry) -> anyhow::Result<()> {
        let line = TranscriptLine {
            timestamp: Utc::now().to_rfc3339(),
            meeting: meeting.to_string(),
            entry: entry.clone(),
        };
        writeln!(self.writer, "{}", serde_json::to_string(&line)?)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn log_entries(&mut self, meeting: &str, entries: &[HistoryEntry]) -> anyhow::Result<()> {
        for entry in entries {
            self.log_entry(meeting, entry)?;
        }
        Ok(())
    }
}
