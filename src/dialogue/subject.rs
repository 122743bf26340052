//! Subject records — the approval item a dialogue is about.
//!
//! Incoming records are loosely shaped JSON. They are validated once, here,
//! into a `SubjectRecord` with every field present: required fields are
//! rejected when missing, optional ones are defaulted.

use std::path::Path;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

const DEFAULT_TITLE: &str = "Untitled request";
const DEFAULT_REQUESTER: &str = "unknown";
const DEFAULT_CATEGORY: &str = "general";

/// A validated approval subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub requested_by: String,
    pub category: String,
    /// Requested amount, if the item has a cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Wire shape before validation. Every field is optional here.
#[derive(Debug, Default, Deserialize)]
struct RawSubjectRecord {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    requested_by: Option<String>,
    category: Option<String>,
    amount: Option<Decimal>,
    submitted_at: Option<DateTime<Utc>>,
}

impl SubjectRecord {
    /// Create a record with defaults for everything but id and description.
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_TITLE.to_string(),
            description: description.into(),
            requested_by: DEFAULT_REQUESTER.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            amount: None,
            submitted_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_requester(mut self, requested_by: impl Into<String>) -> Self {
        self.requested_by = requested_by.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_submitted_at(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = Some(submitted_at);
        self
    }

    /// Validate a loosely shaped JSON object into a record.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, RecordError> {
        let raw: RawSubjectRecord = serde_json::from_value(value.clone())?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSubjectRecord) -> Result<Self, RecordError> {
        let id = non_empty(raw.id).ok_or_else(|| RecordError::MissingField {
            field: "id".to_string(),
        })?;
        let description = non_empty(raw.description).ok_or_else(|| RecordError::MissingField {
            field: "description".to_string(),
        })?;

        if let Some(amount) = raw.amount
            && amount.is_sign_negative()
        {
            return Err(RecordError::Invalid {
                id,
                reason: format!("amount must not be negative, got {amount}"),
            });
        }

        Ok(Self {
            id,
            title: non_empty(raw.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description,
            requested_by: non_empty(raw.requested_by)
                .unwrap_or_else(|| DEFAULT_REQUESTER.to_string()),
            category: non_empty(raw.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            amount: raw.amount,
            submitted_at: raw.submitted_at,
        })
    }

    /// One-line summary, spoken when the user agrees to hear about the item.
    pub fn summary(&self) -> String {
        match self.amount {
            Some(amount) => format!(
                "{} from {}, {} request for {}",
                self.title, self.requested_by, self.category, format_amount(amount)
            ),
            None => format!(
                "{} from {}, {} request",
                self.title, self.requested_by, self.category
            ),
        }
    }

    /// Full detail, spoken when the user asks for more.
    pub fn detail(&self) -> String {
        let mut parts = vec![
            format!("Request: {}", self.title),
            format!("Reference: {}", self.id),
            format!("Requested by: {}", self.requested_by),
            format!("Category: {}", self.category),
        ];

        if let Some(amount) = self.amount {
            parts.push(format!("Amount: {}", format_amount(amount)));
        }
        if let Some(submitted_at) = self.submitted_at {
            parts.push(format!("Submitted: {}", submitted_at.format("%Y-%m-%d %H:%M UTC")));
        }

        parts.push(format!("Details: {}", self.description));
        parts.join("\n")
    }
}

/// Parse a JSON array of subject records.
///
/// Entries that fail validation are logged and skipped; a payload that is
/// not a JSON array is an error.
pub fn parse_subjects(json: &str) -> Result<Vec<SubjectRecord>, RecordError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut records = Vec::with_capacity(values.len());

    for (index, value) in values.iter().enumerate() {
        match SubjectRecord::from_json(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping invalid approval item");
            }
        }
    }

    Ok(records)
}

/// Load subject records from a JSON file.
pub async fn load_subjects(path: &Path) -> Result<Vec<SubjectRecord>, RecordError> {
    let json = tokio::fs::read_to_string(path).await?;
    let records = parse_subjects(&json)?;
    tracing::info!(path = %path.display(), count = records.len(), "Loaded approval items");
    Ok(records)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn format_amount(amount: Decimal) -> String {
    format!("${}", amount.round_dp(2))
}
