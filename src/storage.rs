use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::models::TaskRecord;

/// A full export of a task manager.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub tasks: Vec<TaskRecord>,
    /// When the export was taken (RFC 3339).
    pub export_date: String,
}

/// Returns the directory saved exports go to.
///
/// The path is determined in the following order:
/// 1. `TASKNEST_EXPORT_DIR` environment variable.
/// 2. `~/.local/share/tasknest` (on Linux).
/// 3. `./tasknest` (fallback).
pub fn export_dir() -> PathBuf {
    std::env::var("TASKNEST_EXPORT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push("tasknest");
            p
        })
}

/// Writes an export into `dir` as `tasks-<timestamp>.json`.
///
/// `taken_at` names the file. An existing export is never overwritten: a
/// name already in use gets a `-1`, `-2`, ... suffix. Creates `dir` if needed
/// and returns the path written.
pub fn write_export(dir: &Path, json: &str, taken_at: DateTime<Local>) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let stem = format!("tasks-{}", taken_at.format("%Y%m%d-%H%M%S"));

    let mut attempt = 0u32;
    let (path, mut f) = loop {
        let name = if attempt == 0 {
            format!("{stem}.json")
        } else {
            format!("{stem}-{attempt}.json")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(f) => break (path, f),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    };
    f.write_all(json.as_bytes())?;
    info!(path = %path.display(), bytes = json.len(), "export saved");
    Ok(path)
}

/// Reads a saved export back.
pub fn read_export(path: &Path) -> Result<ExportDocument> {
    let mut f = OpenOptions::new().read(true).open(path)?;
    let mut s = String::new();
    f.read_to_string(&mut s)?;
    Ok(serde_json::from_str(&s)?)
}
