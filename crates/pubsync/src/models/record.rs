//! The persisted publication record schema.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Work;
use crate::error::RecordError;

/// One publication in the dataset.
///
/// `id` is the merge key and must be unique across the dataset. Descriptive
/// fields are written once at append time; only `cited_by_count` and
/// `last_modified` change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationRecord {
    /// Stable identifier (PMID, PMCID, DOI, or OpenAlex ID).
    pub id: String,

    /// Article title.
    pub title: String,

    /// Ordered author names; the first entry is the first author.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Journal or venue name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,

    /// Publication year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,

    /// Publication date (YYYY-MM-DD), used for ordering the dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,

    /// DOI URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi_url: Option<String>,

    /// Open access PDF URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,

    /// Human-facing "cited by" listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cited_by_ui_url: Option<String>,

    /// Citation count, refreshed by update passes.
    #[serde(default)]
    pub cited_by_count: u64,

    /// Whether this record is an erratum.
    #[serde(default)]
    pub is_erratum: bool,

    /// Identifier of the record this erratum corrects, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrects_id: Option<String>,

    /// Last time any field of this record changed.
    pub last_modified: DateTime<Utc>,
}

impl PublicationRecord {
    /// Build a record from a fetched work.
    ///
    /// `id` is the identifier the work was requested under and becomes the
    /// record's merge key, so a later update pass queries the same way the
    /// append pass did.
    ///
    /// # Errors
    ///
    /// Fails when the response lacks the fields the schema requires; the
    /// caller records this as a per-record failure.
    pub fn from_work(id: &str, work: &Work) -> Result<Self, RecordError> {
        if work.id.is_none() {
            return Err(RecordError::missing_field(id, "id"));
        }
        let title = work
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RecordError::missing_field(id, "title"))?;

        Ok(Self {
            id: id.to_string(),
            title,
            authors: work.author_names(),
            journal: work.journal().map(str::to_string),
            publication_year: work.publication_year,
            publication_date: work.publication_date.clone(),
            doi_url: work.doi.clone(),
            pdf_url: work.pdf_url().map(str::to_string),
            cited_by_ui_url: work.cited_by_ui_url(),
            cited_by_count: work.citations(),
            is_erratum: work.is_erratum(),
            corrects_id: None,
            last_modified: Utc::now(),
        })
    }

    /// First author name, when any authors are recorded.
    #[must_use]
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// Publication date parsed for ordering; unparseable dates yield `None`
    /// and sort after everything else.
    #[must_use]
    pub fn sort_date(&self) -> Option<NaiveDate> {
        self.publication_date.as_deref().and_then(|d| d.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_work() -> Work {
        serde_json::from_str(
            r#"{
                "id": "https://openalex.org/W123",
                "doi": "https://doi.org/10.1234/abc",
                "title": "A Study of Things",
                "authorships": [{"author": {"display_name": "Jan Novak"}}],
                "publication_year": 2023,
                "publication_date": "2023-06-01",
                "primary_location": {"source": {"display_name": "Journal of Things"}},
                "cited_by_count": 42,
                "type": "article"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_from_work_maps_fields() {
        let record = PublicationRecord::from_work("38857748", &sample_work()).unwrap();
        assert_eq!(record.id, "38857748");
        assert_eq!(record.title, "A Study of Things");
        assert_eq!(record.first_author(), Some("Jan Novak"));
        assert_eq!(record.journal.as_deref(), Some("Journal of Things"));
        assert_eq!(record.cited_by_count, 42);
        assert!(!record.is_erratum);
        assert_eq!(record.sort_date(), NaiveDate::from_ymd_opt(2023, 6, 1));
    }

    #[test]
    fn test_from_work_requires_title() {
        let mut work = sample_work();
        work.title = None;
        let err = PublicationRecord::from_work("38857748", &work).unwrap_err();
        assert!(err.to_string().contains("title"));

        work.title = Some(String::new());
        assert!(PublicationRecord::from_work("38857748", &work).is_err());
    }

    #[test]
    fn test_from_work_requires_id() {
        let mut work = sample_work();
        work.id = None;
        assert!(PublicationRecord::from_work("38857748", &work).is_err());
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let mut record = PublicationRecord::from_work("38857748", &sample_work()).unwrap();
        record.is_erratum = true;
        record.corrects_id = Some("31234567".to_string());

        let json = serde_json::to_string(&record).unwrap();
        let back: PublicationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_unparseable_date_sorts_none() {
        let mut record = PublicationRecord::from_work("38857748", &sample_work()).unwrap();
        record.publication_date = Some("summer 2023".to_string());
        assert!(record.sort_date().is_none());
    }
}
