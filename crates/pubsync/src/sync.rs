//! The metadata synchronizer: citation refresh and record discovery.
//!
//! Two independent passes over a dataset directory:
//! - `update` refreshes `cited_by_count` on every existing record;
//! - `append` fetches manifest identifiers not yet in the dataset and appends
//!   records for them.
//!
//! A lookup failing for one identifier never aborts a pass; failures are
//! collected into the report. Only dataset problems and a fully unreachable
//! source are fatal.

use std::path::Path;

use chrono::Utc;

use crate::client::OpenAlexClient;
use crate::config::fields;
use crate::dataset::Dataset;
use crate::error::{SyncError, SyncResult};
use crate::models::PublicationRecord;

/// One identifier that could not be processed, with the reason.
#[derive(Debug, Clone)]
pub struct RecordFailure {
    /// Identifier of the affected record or candidate.
    pub id: String,

    /// Human-readable failure reason.
    pub reason: String,
}

/// Outcome of a citation update pass.
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// Records examined.
    pub examined: usize,

    /// Records whose citation count changed.
    pub updated: usize,

    /// Per-record failures.
    pub failures: Vec<RecordFailure>,
}

/// Outcome of an append pass.
#[derive(Debug, Default)]
pub struct AppendReport {
    /// Manifest identifiers not already in the dataset.
    pub candidates: usize,

    /// Records appended.
    pub appended: usize,

    /// Manifest identifiers skipped because they were already present.
    pub skipped_existing: usize,

    /// Candidates skipped because they are errata and inclusion was off.
    pub skipped_errata: usize,

    /// Per-record failures.
    pub failures: Vec<RecordFailure>,
}

/// Outcome of the combined update-then-append run.
///
/// The phases have independent failure domains; a fatal update error does not
/// stop the append phase, and both outcomes are carried here.
#[derive(Debug)]
pub struct CombinedReport {
    /// Update phase outcome.
    pub update: SyncResult<UpdateReport>,

    /// Append phase outcome.
    pub append: SyncResult<AppendReport>,
}

impl CombinedReport {
    /// Whether either phase failed fatally.
    #[must_use]
    pub fn has_fatal_error(&self) -> bool {
        self.update.is_err() || self.append.is_err()
    }
}

/// Reconciles a dataset directory against OpenAlex.
///
/// Owns the client for the duration of one invocation; operations are
/// sequential, one identifier at a time.
#[derive(Debug)]
pub struct Synchronizer {
    client: OpenAlexClient,
    quiet: bool,
}

impl Synchronizer {
    /// Create a synchronizer around a client.
    #[must_use]
    pub fn new(client: OpenAlexClient, quiet: bool) -> Self {
        Self { client, quiet }
    }

    /// Refresh citation counts for every record in the dataset.
    ///
    /// Touches only `cited_by_count` and `last_modified`, and only on records
    /// whose count actually changed. Commits once at the end, and only when
    /// something changed. An empty dataset is a no-op.
    ///
    /// # Errors
    ///
    /// Fails when the dataset cannot be read or written, or when every lookup
    /// in the batch fails at the transport level.
    pub async fn update(&self, dir: &Path) -> SyncResult<UpdateReport> {
        let mut dataset = Dataset::open(dir)?;
        let mut report = UpdateReport { examined: dataset.len(), ..UpdateReport::default() };

        if dataset.is_empty() {
            self.progress("dataset is empty, nothing to update");
            return Ok(report);
        }

        let mut transport_failures = 0usize;
        for record in dataset.records_mut() {
            match self.client.get_work(&record.id, fields::CITATION).await {
                Ok(work) => {
                    let count = work.citations();
                    if count == record.cited_by_count {
                        self.progress(&format!(
                            "{}: citation count {} is up to date",
                            record.id, count
                        ));
                    } else {
                        self.progress(&format!(
                            "{}: citation count {} -> {}",
                            record.id, record.cited_by_count, count
                        ));
                        record.cited_by_count = count;
                        record.last_modified = Utc::now();
                        report.updated += 1;
                    }
                }
                Err(err) => {
                    tracing::warn!(id = %record.id, %err, "citation lookup failed");
                    if err.is_transport() {
                        transport_failures += 1;
                    }
                    report.failures.push(RecordFailure {
                        id: record.id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        if transport_failures == report.examined {
            return Err(SyncError::SourceUnreachable { attempted: report.examined });
        }

        if report.updated > 0 {
            dataset.commit()?;
        } else {
            self.progress("citation counts are up to date, nothing to save");
        }

        Ok(report)
    }

    /// Append records for manifest identifiers not yet in the dataset.
    ///
    /// Existing records are never modified. Errata are filtered out unless
    /// `include_errata` is set. Commits once at the end, and only when at
    /// least one record was appended, so a rerun against an unchanged
    /// manifest appends nothing.
    ///
    /// # Errors
    ///
    /// Fails when the dataset or manifest cannot be read, the dataset cannot
    /// be written, or every lookup in the batch fails at the transport level.
    pub async fn append(&self, dir: &Path, include_errata: bool) -> SyncResult<AppendReport> {
        let mut dataset = Dataset::open(dir)?;
        let manifest = dataset.manifest_ids()?;
        let mut report = AppendReport::default();

        let candidates: Vec<String> = manifest
            .into_iter()
            .filter(|id| {
                if dataset.contains(id) {
                    report.skipped_existing += 1;
                    false
                } else {
                    true
                }
            })
            .collect();
        report.candidates = candidates.len();

        if candidates.is_empty() {
            self.progress("no new identifiers in the manifest");
            return Ok(report);
        }
        self.progress(&format!("found {} new identifier(s)", candidates.len()));

        let mut transport_failures = 0usize;
        for id in &candidates {
            match self.client.get_work(id, fields::DISCOVERY).await {
                Ok(work) => {
                    if work.is_erratum() && !include_errata {
                        self.progress(&format!("{id}: erratum, skipping"));
                        report.skipped_errata += 1;
                        continue;
                    }
                    match PublicationRecord::from_work(id, &work) {
                        Ok(record) => {
                            self.progress(&format!("{id}: appending \"{}\"", record.title));
                            dataset.push(record)?;
                            report.appended += 1;
                        }
                        Err(err) => {
                            tracing::warn!(id = %id, %err, "malformed work");
                            report.failures.push(RecordFailure {
                                id: id.clone(),
                                reason: err.to_string(),
                            });
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(id = %id, %err, "metadata lookup failed");
                    if err.is_transport() {
                        transport_failures += 1;
                    }
                    report
                        .failures
                        .push(RecordFailure { id: id.clone(), reason: err.to_string() });
                }
            }
        }

        if transport_failures == report.candidates {
            return Err(SyncError::SourceUnreachable { attempted: report.candidates });
        }

        if report.appended > 0 {
            dataset.commit()?;
        }

        Ok(report)
    }

    /// Run `update` to completion, then `append`.
    ///
    /// Records appended here keep the citation count from their discovery
    /// fetch; the next update pass will refresh them. A fatal update error
    /// does not prevent the append phase from running.
    pub async fn update_and_append(&self, dir: &Path, include_errata: bool) -> CombinedReport {
        let update = self.update(dir).await;
        if let Err(ref err) = update {
            tracing::error!(%err, "update phase failed");
        }
        let append = self.append(dir, include_errata).await;
        CombinedReport { update, append }
    }

    /// Progress line, suppressed in quiet mode. Never used for failures.
    fn progress(&self, msg: &str) {
        if !self.quiet {
            println!("{msg}");
        }
    }
}
