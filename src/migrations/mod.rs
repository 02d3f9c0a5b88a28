use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use regex::Regex;

/// `<version>_<name>.sql` with a 14-digit timestamp version.
const FILE_NAME_PATTERN: &str = r"^(\d{14})_(.+)\.sql$";

fn file_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(FILE_NAME_PATTERN).expect("valid migration filename pattern"))
}

/// A migration script on disk, identified by its filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    pub path: PathBuf,
    pub version: String,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Not a migration filename: {0}")]
    BadFileName(String),
}

impl MigrationFile {
    /// Parse version and name out of `path`'s filename.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let file_name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let caps = file_name_re()
            .captures(file_name)
            .ok_or_else(|| ParseError::BadFileName(file_name.to_string()))?;
        Ok(Self {
            path: path.to_path_buf(),
            version: caps[1].to_string(),
            name: caps[2].to_string(),
        })
    }

    pub fn file_name(&self) -> String {
        format!("{}_{}.sql", self.version, self.name)
    }
}

/// List migration files in `dir`, sorted by filename (lexicographic order is
/// chronological given the fixed-width version prefix). Entries that do not
/// look like migrations are silently ignored.
pub fn list_migration_files(dir: &Path) -> anyhow::Result<Vec<MigrationFile>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("read migrations dir {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.context("read dir entry")?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        if let Ok(migration) = MigrationFile::from_path(&entry.path()) {
            files.push(migration);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Enumerated files minus already-applied versions, order preserved.
pub fn pending(files: Vec<MigrationFile>, applied: &HashSet<String>) -> Vec<MigrationFile> {
    files
        .into_iter()
        .filter(|m| !applied.contains(&m.version))
        .collect()
}
