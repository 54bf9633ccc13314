//! Work data model matching the OpenAlex works API schema.

use serde::{Deserialize, Serialize};

/// A scholarly work from OpenAlex.
///
/// Every field is optional on the wire; the `select` parameter controls which
/// come back, and OpenAlex nulls out the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Work {
    /// OpenAlex ID as a URL (e.g. `https://openalex.org/W1997963236`).
    #[serde(default)]
    pub id: Option<String>,

    /// DOI as a URL (e.g. `https://doi.org/10.1234/abc`).
    #[serde(default)]
    pub doi: Option<String>,

    /// Work title.
    #[serde(default)]
    pub title: Option<String>,

    /// Ordered author list.
    #[serde(default)]
    pub authorships: Vec<Authorship>,

    /// Publication year.
    #[serde(default)]
    pub publication_year: Option<i32>,

    /// Publication date in ISO format (YYYY-MM-DD).
    #[serde(default)]
    pub publication_date: Option<String>,

    /// External identifiers (PMID, PMCID, etc.), as URLs.
    #[serde(default)]
    pub ids: WorkIds,

    /// Primary publication venue.
    #[serde(default)]
    pub primary_location: Option<Location>,

    /// Best open access location, carries the PDF URL when one exists.
    #[serde(default)]
    pub best_oa_location: Option<Location>,

    /// Number of citations this work has received.
    #[serde(default)]
    pub cited_by_count: Option<u64>,

    /// API URL listing citing works.
    #[serde(default)]
    pub cited_by_api_url: Option<String>,

    /// OpenAlex work type (e.g. "article", "erratum").
    #[serde(default, rename = "type")]
    pub work_type: Option<String>,

    /// Crossref work type.
    #[serde(default)]
    pub type_crossref: Option<String>,

    /// When OpenAlex last updated this work.
    #[serde(default)]
    pub updated_date: Option<String>,
}

impl Work {
    /// Get citation count or 0 if not available.
    #[must_use]
    pub fn citations(&self) -> u64 {
        self.cited_by_count.unwrap_or(0)
    }

    /// Check whether this work is an erratum record.
    #[must_use]
    pub fn is_erratum(&self) -> bool {
        self.work_type.as_deref() == Some("erratum")
    }

    /// Ordered author display names, skipping authorships without one.
    #[must_use]
    pub fn author_names(&self) -> Vec<String> {
        self.authorships
            .iter()
            .filter_map(|a| a.author.as_ref())
            .filter_map(|a| a.display_name.clone())
            .collect()
    }

    /// Journal (or other venue) display name if available.
    #[must_use]
    pub fn journal(&self) -> Option<&str> {
        self.primary_location.as_ref()?.source.as_ref()?.display_name.as_deref()
    }

    /// Open access PDF URL if available.
    #[must_use]
    pub fn pdf_url(&self) -> Option<&str> {
        self.best_oa_location.as_ref()?.pdf_url.as_deref()
    }

    /// Bare PMID stripped of its URL prefix.
    #[must_use]
    pub fn pmid(&self) -> Option<String> {
        self.ids.pmid.as_deref().map(strip_id_prefix)
    }

    /// Bare PMCID stripped of its URL prefix.
    #[must_use]
    pub fn pmcid(&self) -> Option<String> {
        self.ids.pmcid.as_deref().map(strip_id_prefix)
    }

    /// Human-facing "cited by" page, derived from the API URL.
    #[must_use]
    pub fn cited_by_ui_url(&self) -> Option<String> {
        self.cited_by_api_url.as_ref().map(|u| u.replace("api.openalex.org", "openalex.org"))
    }
}

/// Drop everything up to the last slash, turning id URLs into bare ids.
fn strip_id_prefix(id: &str) -> String {
    id.rsplit('/').next().unwrap_or(id).to_string()
}

/// One entry in a work's author list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Authorship {
    /// The author being credited.
    #[serde(default)]
    pub author: Option<AuthorRef>,
}

/// Minimal author reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorRef {
    /// Display name (e.g. "Ada Lovelace").
    #[serde(default)]
    pub display_name: Option<String>,
}

/// External identifiers for a work. OpenAlex returns these as URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkIds {
    /// OpenAlex ID URL.
    #[serde(default)]
    pub openalex: Option<String>,

    /// DOI URL.
    #[serde(default)]
    pub doi: Option<String>,

    /// PubMed ID URL.
    #[serde(default)]
    pub pmid: Option<String>,

    /// PubMed Central ID URL.
    #[serde(default)]
    pub pmcid: Option<String>,
}

/// A location where a work is hosted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    /// The hosting source (journal, repository).
    #[serde(default)]
    pub source: Option<Source>,

    /// Direct PDF URL when open access.
    #[serde(default)]
    pub pdf_url: Option<String>,
}

/// A venue such as a journal or repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Source {
    /// Venue display name.
    #[serde(default)]
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_deserialize_minimal() {
        let json = r#"{"id": "https://openalex.org/W123"}"#;
        let work: Work = serde_json::from_str(json).unwrap();
        assert_eq!(work.id.as_deref(), Some("https://openalex.org/W123"));
        assert!(work.title.is_none());
        assert_eq!(work.citations(), 0);
        assert!(!work.is_erratum());
    }

    #[test]
    fn test_work_deserialize_full() {
        let json = r#"{
            "id": "https://openalex.org/W123",
            "doi": "https://doi.org/10.1234/abc",
            "title": "A Study of Things",
            "authorships": [
                {"author": {"display_name": "Jan Novak"}},
                {"author": {"display_name": "Maria Silva"}}
            ],
            "publication_year": 2023,
            "publication_date": "2023-06-01",
            "ids": {"pmid": "https://pubmed.ncbi.nlm.nih.gov/38857748", "pmcid": "https://www.ncbi.nlm.nih.gov/pmc/articles/PMC9046468"},
            "primary_location": {"source": {"display_name": "Journal of Things"}},
            "best_oa_location": {"pdf_url": "https://example.org/paper.pdf"},
            "cited_by_count": 42,
            "cited_by_api_url": "https://api.openalex.org/works?filter=cites:W123",
            "type": "article"
        }"#;

        let work: Work = serde_json::from_str(json).unwrap();
        assert_eq!(work.citations(), 42);
        assert_eq!(work.author_names(), vec!["Jan Novak", "Maria Silva"]);
        assert_eq!(work.journal(), Some("Journal of Things"));
        assert_eq!(work.pdf_url(), Some("https://example.org/paper.pdf"));
        assert_eq!(work.pmid().as_deref(), Some("38857748"));
        assert_eq!(work.pmcid().as_deref(), Some("PMC9046468"));
        assert_eq!(
            work.cited_by_ui_url().as_deref(),
            Some("https://openalex.org/works?filter=cites:W123")
        );
    }

    #[test]
    fn test_erratum_type() {
        let json = r#"{"id": "https://openalex.org/W9", "type": "erratum"}"#;
        let work: Work = serde_json::from_str(json).unwrap();
        assert!(work.is_erratum());
    }

    #[test]
    fn test_authorship_without_author_is_skipped() {
        let json = r#"{"authorships": [{}, {"author": {"display_name": "Solo Author"}}]}"#;
        let work: Work = serde_json::from_str(json).unwrap();
        assert_eq!(work.author_names(), vec!["Solo Author"]);
    }
}
