//! Dataset directory adapter.
//!
//! A dataset directory holds:
//! - `publications.json` — the record collection (JSON array)
//! - `id-manifest.txt` — one known identifier per line, the candidate universe
//!   for append passes (`#` comments and blank lines ignored)
//! - `update-log.json` — `{"last_modified": "YYYY-MM-DD"}`, rewritten on commit
//! - `publications_bkp-*.json` — pre-commit backups
//!
//! Commits are atomic: records are serialized to a temp file in the same
//! directory, then renamed over `publications.json`. A failure anywhere before
//! the rename leaves the previous contents untouched.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::{DatasetError, DatasetResult};
use crate::models::PublicationRecord;

/// Records file name.
pub const RECORDS_FILE: &str = "publications.json";

/// Identifier manifest file name.
pub const MANIFEST_FILE: &str = "id-manifest.txt";

/// Update log file name.
pub const LOG_FILE: &str = "update-log.json";

/// An open dataset directory with its records loaded.
#[derive(Debug)]
pub struct Dataset {
    dir: PathBuf,
    records: Vec<PublicationRecord>,
}

impl Dataset {
    /// Open a dataset directory and load its records.
    ///
    /// # Errors
    ///
    /// Fails when the directory or records file is missing, the records file
    /// does not parse, or two records share an identifier.
    pub fn open(dir: &Path) -> DatasetResult<Self> {
        if !dir.is_dir() {
            return Err(DatasetError::DirNotFound(dir.to_path_buf()));
        }

        let path = dir.join(RECORDS_FILE);
        if !path.is_file() {
            return Err(DatasetError::RecordsNotFound(path));
        }

        let raw = fs::read_to_string(&path)?;
        let records: Vec<PublicationRecord> = serde_json::from_str(&raw)
            .map_err(|source| DatasetError::Corrupt { path: path.clone(), source })?;

        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(DatasetError::DuplicateId { id: record.id.clone() });
            }
        }

        tracing::debug!(dir = %dir.display(), records = records.len(), "opened dataset");
        Ok(Self { dir: dir.to_path_buf(), records })
    }

    /// All records, in stored order.
    #[must_use]
    pub fn records(&self) -> &[PublicationRecord] {
        &self.records
    }

    /// Mutable access for update passes.
    pub fn records_mut(&mut self) -> &mut [PublicationRecord] {
        &mut self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check whether an identifier is already present (exact match).
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    /// Append a record, enforcing identifier uniqueness.
    pub fn push(&mut self, record: PublicationRecord) -> DatasetResult<()> {
        if self.contains(&record.id) {
            return Err(DatasetError::DuplicateId { id: record.id });
        }
        self.records.push(record);
        Ok(())
    }

    /// Read the identifier manifest: trimmed, deduplicated, in file order.
    ///
    /// # Errors
    ///
    /// Fails when the manifest file is missing or unreadable.
    pub fn manifest_ids(&self) -> DatasetResult<Vec<String>> {
        let path = self.dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(DatasetError::ManifestNotFound(path));
        }

        let raw = fs::read_to_string(&path)?;
        let mut seen = HashSet::new();
        let ids = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter(|line| seen.insert(line.to_string()))
            .map(str::to_string)
            .collect();
        Ok(ids)
    }

    /// Persist the records back to the directory.
    ///
    /// Sorts by publication date descending (undated records last), backs up
    /// the previous file, writes atomically, and stamps the update log.
    ///
    /// # Errors
    ///
    /// Fails on serialization or filesystem errors; the previously committed
    /// records stay in place in that case.
    pub fn commit(&mut self) -> DatasetResult<()> {
        self.records.sort_by(|a, b| b.sort_date().cmp(&a.sort_date()));

        let json = serde_json::to_string_pretty(&self.records)?;
        let path = self.dir.join(RECORDS_FILE);

        let stamp = Local::now().format("%Y%m%d-%Hh%Mm");
        let backup = self.dir.join(format!("publications_bkp-{stamp}.json"));
        fs::copy(&path, &backup)?;

        let tmp = self.dir.join(format!("{RECORDS_FILE}.tmp"));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;

        self.touch_log();
        tracing::info!(dir = %self.dir.display(), records = self.records.len(), "dataset committed");
        Ok(())
    }

    /// Stamp `update-log.json` with today's date, recreating it when missing
    /// or unreadable. Log problems never fail a commit.
    fn touch_log(&self) {
        let path = self.dir.join(LOG_FILE);
        let mut log = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str::<serde_json::Value>(&raw).ok())
            .filter(serde_json::Value::is_object)
            .unwrap_or_else(|| serde_json::json!({}));

        log["last_modified"] =
            serde_json::Value::String(Local::now().format("%Y-%m-%d").to_string());

        if let Err(err) = fs::write(&path, log.to_string()) {
            tracing::warn!(path = %path.display(), %err, "failed to write update log");
        }
    }
}
