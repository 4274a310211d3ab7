// ABOUTME: Document ingestion — turns uploaded PDF, DOCX, and spreadsheet files into prompt context.
// ABOUTME: Bad files degrade to an inline placeholder; they never stop the rest of the batch.

pub mod docx;
pub mod pdf;
pub mod sheet;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{MeetingError, Result};

/// File kinds the assistant can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Spreadsheet,
}

impl DocumentKind {
    /// Detect the kind from a file name's extension (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(Self::Spreadsheet),
            _ => None,
        }
    }
}

/// An uploaded file: its display name and raw bytes.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, naming it by its file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// Text extracted from one upload, or the placeholder that replaced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub name: String,
    pub text: String,
    pub ok: bool,
}

impl Extracted {
    /// The section this file contributes to the prompt context.
    pub fn section(&self) -> String {
        format!("=== {} ===\n{}", self.name, self.text)
    }
}

/// Marker embedded for files of an unsupported kind.
pub fn unsupported_marker(name: &str) -> String {
    format!("[unsupported format: {}]", name)
}

/// Extract text from a single upload, degrading failures to a placeholder.
pub fn extract(upload: &Upload) -> Extracted {
    let Some(kind) = DocumentKind::from_name(&upload.name) else {
        warn!(file = %upload.name, "unsupported document format");
        return Extracted {
            name: upload.name.clone(),
            text: unsupported_marker(&upload.name),
            ok: false,
        };
    };

    let result = match kind {
        DocumentKind::Pdf => pdf::extract_text(&upload.bytes),
        DocumentKind::Docx => docx::extract_text(&upload.bytes),
        DocumentKind::Spreadsheet => sheet::extract_text(&upload.bytes),
    };

    match result {
        Ok(text) => {
            debug!(file = %upload.name, chars = text.chars().count(), "document extracted");
            Extracted {
                name: upload.name.clone(),
                text,
                ok: true,
            }
        }
        Err(e) => {
            warn!(file = %upload.name, error = %e, "document extraction failed");
            Extracted {
                name: upload.name.clone(),
                text: format!("[failed to read {}: {}]", upload.name, e),
                ok: false,
            }
        }
    }
}

/// Concatenate extracted documents into one context block, one section per file.
pub fn context(documents: &[Extracted]) -> String {
    documents
        .iter()
        .map(Extracted::section)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn placeholder(name: &str, text: String) -> Extracted {
    Extracted {
        name: name.to_string(),
        text,
        ok: false,
    }
}

/// Resolve one attachment argument to file paths. An existing path is taken
/// literally even when its name contains glob metacharacters; otherwise
/// arguments with `*`, `?` or `[` are expanded as globs.
pub fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let literal = PathBuf::from(pattern);
    if literal.exists() || !pattern.contains(['*', '?', '[']) {
        return Ok(vec![literal]);
    }
    let matches = glob::glob(pattern).map_err(|e| MeetingError::parse("attachment pattern", e))?;
    Ok(matches.filter_map(|m| m.ok()).filter(|p| p.is_file()).collect())
}

/// Read and extract files from disk. A file that cannot be read becomes a
/// placeholder section like any other failure.
pub fn ingest_paths(paths: &[PathBuf]) -> Vec<Extracted> {
    paths
        .iter()
        .map(|path| match Upload::from_path(path) {
            Ok(upload) => extract(&upload),
            Err(e) => {
                let name = path.display().to_string();
                warn!(file = %name, error = %e, "could not read attachment");
                let text = format!("[failed to read {}: {}]", name, e);
                placeholder(&name, text)
            }
        })
        .collect()
}

/// Resolve and extract every attachment argument. Each argument stands on
/// its own: a bad pattern or one that matches nothing becomes a placeholder
/// and the remaining arguments are still read.
pub fn ingest_patterns(patterns: &[String]) -> Vec<Extracted> {
    let mut extracted = Vec::new();
    for pattern in patterns {
        match expand_pattern(pattern) {
            Ok(paths) if paths.is_empty() => {
                warn!(pattern = %pattern, "attachment pattern matched no files");
                extracted.push(placeholder(pattern, format!("[no files matched {}]", pattern)));
            }
            Ok(paths) => extracted.extend(ingest_paths(&paths)),
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "invalid attachment pattern");
                extracted.push(placeholder(pattern, format!("[invalid pattern {}: {}]", pattern, e)));
            }
        }
    }
    extracted
}
