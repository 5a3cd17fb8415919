/// Header-to-field mapping for uploaded CSVs.
///
/// Column names in the wild rarely match the canonical schema, so the mapper
/// guesses which header feeds which canonical field from substring patterns.
/// The guess is only ever a proposal: an operator reviews it, may override
/// any assignment, and confirms it before rows are normalized. The
/// `Proposed -> AwaitingConfirmation -> Confirmed` transition is the only
/// state machine in the core.
use crate::errors::AppError;
use serde::{Deserialize, Serialize};

/// The six canonical lead attributes, in mapper priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Name,
    Title,
    Company,
    Website,
    Email,
    Phone,
}

impl CanonicalField {
    /// All fields in the fixed priority order used when resolving a header.
    pub const ALL: [CanonicalField; 6] = [
        CanonicalField::Name,
        CanonicalField::Title,
        CanonicalField::Company,
        CanonicalField::Website,
        CanonicalField::Email,
        CanonicalField::Phone,
    ];

    /// The JSON/field name of this canonical field.
    pub fn key(self) -> &'static str {
        match self {
            CanonicalField::Name => "name",
            CanonicalField::Title => "title",
            CanonicalField::Company => "company",
            CanonicalField::Website => "website",
            CanonicalField::Email => "email",
            CanonicalField::Phone => "phone",
        }
    }

    /// Lowercase substring patterns that mark a header as this field.
    pub fn patterns(self) -> &'static [&'static str] {
        match self {
            CanonicalField::Name => &["name", "contact", "lead"],
            CanonicalField::Title => &[
                "title",
                "job title",
                "position",
                "role",
                "designation",
                "occupation",
            ],
            CanonicalField::Company => {
                &["company", "organization", "org", "business", "employer"]
            }
            CanonicalField::Website => &["website", "url", "site", "domain"],
            CanonicalField::Email => &["email", "e-mail", "mail"],
            CanonicalField::Phone => &["phone", "telephone", "mobile", "cell"],
        }
    }

    fn index(self) -> usize {
        match self {
            CanonicalField::Name => 0,
            CanonicalField::Title => 1,
            CanonicalField::Company => 2,
            CanonicalField::Website => 3,
            CanonicalField::Email => 4,
            CanonicalField::Phone => 5,
        }
    }
}

/// Broader job-related substrings tried for `title` only when the first pass
/// left it open.
const TITLE_FALLBACK_PATTERNS: &[&str] = &["job", "position", "role", "work"];

/// Canonical field -> originating header, or unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMapping {
    slots: [Option<String>; 6],
}

impl FieldMapping {
    /// The header assigned to `field`, if any.
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.slots[field.index()].as_deref()
    }

    /// Assigns `header` to `field`, replacing any previous assignment.
    pub fn set(&mut self, field: CanonicalField, header: impl Into<String>) {
        self.slots[field.index()] = Some(header.into());
    }

    /// Removes the assignment for `field`.
    pub fn clear(&mut self, field: CanonicalField) {
        self.slots[field.index()] = None;
    }

    /// True once `title` has a header; normalization is blocked until then.
    pub fn has_title(&self) -> bool {
        self.get(CanonicalField::Title).is_some()
    }
}

/// Proposes a mapping from the header list of a parsed CSV.
///
/// Headers are visited in file order. For each header the canonical fields
/// are tried in priority order, skipping fields that already have a header;
/// the first still-open field whose pattern matches the lowercased header
/// claims it. A claimed header is out of consideration for other fields. A
/// second pass over the unused headers rescues `title` with broader
/// job-related patterns. Deterministic and idempotent; never auto-committed.
pub fn propose_mapping(headers: &[String]) -> FieldMapping {
    let mut mapping = FieldMapping::default();
    let mut used = vec![false; headers.len()];

    for (idx, header) in headers.iter().enumerate() {
        let needle = header.trim().to_lowercase();
        for field in CanonicalField::ALL {
            if mapping.get(field).is_some() {
                continue;
            }
            if field.patterns().iter().any(|p| needle.contains(p)) {
                tracing::debug!("Header '{}' mapped to {}", header, field.key());
                mapping.set(field, header.clone());
                used[idx] = true;
                break;
            }
        }
    }

    if !mapping.has_title() {
        for (idx, header) in headers.iter().enumerate() {
            if used[idx] {
                continue;
            }
            let needle = header.trim().to_lowercase();
            if TITLE_FALLBACK_PATTERNS.iter().any(|p| needle.contains(p)) {
                tracing::debug!("Header '{}' mapped to title on second pass", header);
                mapping.set(CanonicalField::Title, header.clone());
                break;
            }
        }
    }

    mapping
}

/// Lifecycle of a mapping between proposal and use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingState {
    /// Fresh mapper output, not yet shown to anyone.
    Proposed,
    /// Surfaced to the operator for review and possible overrides.
    AwaitingConfirmation,
    /// Frozen; the only state the normalizer accepts.
    Confirmed,
}

/// A mapping that has not been confirmed yet. Editable.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingProposal {
    mapping: FieldMapping,
    state: MappingState,
}

impl MappingProposal {
    /// Runs the mapper over `headers` and wraps the result as a proposal.
    pub fn propose(headers: &[String]) -> Self {
        MappingProposal {
            mapping: propose_mapping(headers),
            state: MappingState::Proposed,
        }
    }

    pub fn state(&self) -> MappingState {
        self.state
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Marks the proposal as surfaced to the operator.
    pub fn await_confirmation(&mut self) {
        self.state = MappingState::AwaitingConfirmation;
    }

    /// Operator override: assigns `header` to `field`.
    pub fn set(&mut self, field: CanonicalField, header: impl Into<String>) {
        self.mapping.set(field, header);
    }

    /// Operator override: drops the assignment for `field`.
    pub fn clear(&mut self, field: CanonicalField) {
        self.mapping.clear(field);
    }

    /// Freezes the mapping for use by the normalizer.
    ///
    /// # Errors
    ///
    /// * `MissingRequiredField` - `title` has no header. Recoverable: the
    ///   operator assigns one and confirms again.
    pub fn confirm(self) -> Result<ConfirmedMapping, AppError> {
        if !self.mapping.has_title() {
            return Err(AppError::MissingRequiredField(
                "No column could be mapped to 'title'; assign one and confirm again"
                    .to_string(),
            ));
        }
        Ok(ConfirmedMapping {
            mapping: self.mapping,
        })
    }

    /// The confirmation surface shown to the operator.
    pub fn surface(&self) -> MappingSurface {
        MappingSurface::new(&self.mapping, false)
    }
}

/// A frozen mapping. Constructing one is only possible through
/// `MappingProposal::confirm`, so the title invariant holds by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedMapping {
    mapping: FieldMapping,
}

impl ConfirmedMapping {
    /// The header assigned to `field`, if any.
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.mapping.get(field)
    }

    pub fn surface(&self) -> MappingSurface {
        MappingSurface::new(&self.mapping, true)
    }
}

/// Wire form of a mapping: the six canonical keys, each a header name or
/// null, plus the `confirmed` gate the normalizer observes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingSurface {
    pub name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub confirmed: bool,
}

impl MappingSurface {
    fn new(mapping: &FieldMapping, confirmed: bool) -> Self {
        let header = |f: CanonicalField| mapping.get(f).map(str::to_string);
        MappingSurface {
            name: header(CanonicalField::Name),
            title: header(CanonicalField::Title),
            company: header(CanonicalField::Company),
            website: header(CanonicalField::Website),
            email: header(CanonicalField::Email),
            phone: header(CanonicalField::Phone),
            confirmed,
        }
    }
}
