//! Versioned on-disk catalog of drafts.
//!
//! Records that fail to decode are quarantined verbatim rather than dropped,
//! and carried across saves so a later build can still recover them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::{Draft, Status};

/// Current catalog document version
pub const CATALOG_VERSION: u32 = 1;

fn default_catalog_version() -> u32 {
    CATALOG_VERSION
}

/// A persisted record that could not be decoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarantinedRecord {
    /// The record exactly as it was found
    pub record: Value,

    /// Why it was set aside
    pub reason: String,

    pub quarantined_at: DateTime<Utc>,
}

/// Catalog document as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default = "default_catalog_version")]
    pub version: u32,

    #[serde(default)]
    pub drafts: Vec<Value>,

    #[serde(default)]
    pub quarantined: Vec<QuarantinedRecord>,
}

/// Either the versioned document or a bare array of drafts
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredCatalog {
    Document(CatalogDocument),
    Legacy(Vec<Value>),
}

/// Status filter and search query for listings
#[derive(Debug, Clone, Default)]
pub struct DraftFilter {
    /// Only drafts with this status; `None` means all
    pub status: Option<Status>,

    /// Case-insensitive substring of name or display title
    pub query: Option<String>,

    pub limit: Option<usize>,
}

impl DraftFilter {
    fn matches(&self, draft: &Draft) -> bool {
        if let Some(status) = self.status {
            if draft.status() != status {
                return false;
            }
        }

        match &self.query {
            Some(query) => {
                let query = query.to_lowercase();
                draft.name().to_lowercase().contains(&query)
                    || draft.display_title().to_lowercase().contains(&query)
            }
            None => true,
        }
    }
}

/// Decoded catalog
#[derive(Debug, Clone, Default)]
pub struct DraftCatalog {
    drafts: Vec<Draft>,
    quarantined: Vec<QuarantinedRecord>,
}

impl DraftCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse catalog JSON, quarantining records that do not decode
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let document = match serde_json::from_str::<StoredCatalog>(json)? {
            StoredCatalog::Document(document) => document,
            StoredCatalog::Legacy(drafts) => CatalogDocument {
                version: CATALOG_VERSION,
                drafts,
                quarantined: Vec::new(),
            },
        };
        Ok(Self::from_document(document))
    }

    pub fn from_document(document: CatalogDocument) -> Self {
        let mut catalog = Self {
            drafts: Vec::with_capacity(document.drafts.len()),
            quarantined: document.quarantined,
        };

        for record in document.drafts {
            match Draft::decode(record.clone()) {
                Ok(draft) => catalog.drafts.push(draft),
                Err(e) => {
                    let id = record.get("id").and_then(Value::as_str).unwrap_or("<unknown>");
                    warn!(record_id = id, error = %e, "Quarantining malformed draft record");
                    catalog.quarantined.push(QuarantinedRecord {
                        record,
                        reason: e.to_string(),
                        quarantined_at: Utc::now(),
                    });
                }
            }
        }

        catalog
    }

    pub fn to_document(&self) -> Result<CatalogDocument, serde_json::Error> {
        let drafts = self
            .drafts
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CatalogDocument {
            version: CATALOG_VERSION,
            drafts,
            quarantined: self.quarantined.clone(),
        })
    }

    /// Insert or replace a draft by id
    pub fn upsert(&mut self, draft: Draft) -> bool {
        super::upsert(&mut self.drafts, draft)
    }

    /// Replace every draft, keeping the quarantine
    pub fn replace_drafts(&mut self, drafts: Vec<Draft>) {
        self.drafts = drafts;
    }

    pub fn get(&self, id: uuid::Uuid) -> Option<&Draft> {
        self.drafts.iter().find(|d| d.id() == id)
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Draft> {
        self.drafts.iter().find(|d| d.url_slug() == slug)
    }

    /// Matching drafts, most recently updated first
    pub fn list(&self, filter: &DraftFilter) -> Vec<&Draft> {
        let mut drafts: Vec<_> = self.drafts.iter().filter(|d| filter.matches(d)).collect();
        drafts.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));

        if let Some(limit) = filter.limit {
            drafts.truncate(limit);
        }

        drafts
    }

    pub fn drafts(&self) -> &[Draft] {
        &self.drafts
    }

    pub fn into_drafts(self) -> Vec<Draft> {
        self.drafts
    }

    pub fn quarantined(&self) -> &[QuarantinedRecord] {
        &self.quarantined
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}
