use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

// ============ Core Data Model ============

/// A single parsed CSV data line, keyed by header.
///
/// Column order from the file is preserved (serde_json is built with
/// `preserve_order`). Duplicate headers collide: the later column overwrites
/// the value while the first column keeps its position. Known limitation,
/// kept as-is.
pub type RawRow = Map<String, Value>;

/// Canonical lead record.
///
/// The six canonical fields are always present (empty string when the source
/// had no mapped column). Non-canonical source columns ride along in `extra`
/// unchanged; canonical values win over same-named raw columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// Contact name.
    #[serde(default)]
    pub name: String,
    /// Job title; the only field the scoring engine looks at.
    #[serde(default)]
    pub title: String,
    /// Company or organization.
    #[serde(default)]
    pub company: String,
    /// Company website.
    #[serde(default)]
    pub website: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Passthrough columns from the original source.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Lead {
    /// Builds a lead from arbitrary JSON without ever failing.
    ///
    /// Canonical fields are taken when present; `null` and missing become
    /// empty strings, non-string scalars are coerced to their text form.
    /// Every other key lands in `extra`. A non-object value yields an empty
    /// lead, so one malformed element never aborts a batch.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            tracing::debug!("Non-object lead payload, treating as empty lead");
            return Lead::default();
        };

        let mut lead = Lead {
            name: text_field(obj, "name"),
            title: text_field(obj, "title"),
            company: text_field(obj, "company"),
            website: text_field(obj, "website"),
            email: text_field(obj, "email"),
            phone: text_field(obj, "phone"),
            extra: Map::new(),
        };

        for (key, val) in obj {
            if !is_canonical_key(key) {
                lead.extra.insert(key.clone(), val.clone());
            }
        }

        lead
    }

    /// Manual-entry completeness rule: name, title and company all non-blank.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.title.trim().is_empty()
            && !self.company.trim().is_empty()
    }

    /// Resolves the website field to a clickable URL, prepending `https://`
    /// when the scheme is missing. `None` if the field is empty or does not
    /// parse as a URL.
    pub fn website_href(&self) -> Option<Url> {
        let raw = self.website.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Url::parse(raw).ok()
        } else {
            Url::parse(&format!("https://{}", raw)).ok()
        }
    }
}

/// A lead with its computed priority score. Terminal artifact.
///
/// Field declaration order fixes the serialized order: the six canonical
/// fields, then `score`, then passthrough columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLead {
    pub name: String,
    pub title: String,
    pub company: String,
    pub website: String,
    pub email: String,
    pub phone: String,
    /// Priority score from the title rules.
    pub score: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScoredLead {
    /// Attaches a score to a lead, consuming it.
    pub fn new(lead: Lead, score: i64) -> Self {
        ScoredLead {
            name: lead.name,
            title: lead.title,
            company: lead.company,
            website: lead.website,
            email: lead.email,
            phone: lead.phone,
            score,
            extra: lead.extra,
        }
    }
}

/// The six canonical field names, in mapper priority order.
pub const CANONICAL_KEYS: [&str; 6] = ["name", "title", "company", "website", "email", "phone"];

fn is_canonical_key(key: &str) -> bool {
    CANONICAL_KEYS.contains(&key)
}

fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// ============ Request / Response Payloads ============

/// Response body of the scoring endpoint: scored leads in input order.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub leads: Vec<ScoredLead>,
}

/// Request body of the CSV inspect endpoint.
#[derive(Debug, Deserialize)]
pub struct CsvInspectRequest {
    /// Raw CSV text as read from the uploaded file.
    pub csv: String,
    /// Original file name; when present it must end in `.csv`.
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Response body of the CSV inspect endpoint: what the operator reviews
/// before confirming the mapping.
#[derive(Debug, Serialize)]
pub struct CsvInspectResponse {
    /// Header names in file order.
    pub headers: Vec<String>,
    /// Proposed field mapping surface (6 canonical keys + `confirmed`).
    pub mapping: crate::mapping::MappingSurface,
    /// Number of data rows parsed.
    pub row_count: usize,
    /// First few rows, so the operator can sanity-check the proposal.
    pub preview: Vec<RawRow>,
}

/// Request body of the CSV process endpoint: the raw text again plus the
/// operator-confirmed header assignment.
#[derive(Debug, Deserialize)]
pub struct CsvProcessRequest {
    pub csv: String,
    /// Original file name; when present it must end in `.csv`.
    #[serde(default)]
    pub file_name: Option<String>,
    /// Operator overrides; unset keys fall back to the proposed mapping.
    #[serde(default)]
    pub mapping: MappingOverrides,
}

/// Operator-supplied header assignments, one optional entry per canonical
/// field. An empty string clears the proposed assignment.
#[derive(Debug, Default, Deserialize)]
pub struct MappingOverrides {
    pub name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
