use crate::mapping::{CanonicalField, ConfirmedMapping};
use crate::models::{Lead, RawRow, CANONICAL_KEYS};
use serde_json::Value;

/// Applies a confirmed mapping to every parsed row.
///
/// Output has the same cardinality and order as `rows`. Each canonical field
/// takes the value of its mapped header, or an empty string when the field
/// has no header or the row lacks the column. All remaining source columns
/// pass through into `extra`; a raw column named like a canonical field is
/// dropped there, because the canonical value wins. Pure, no I/O.
pub fn normalize_rows(rows: &[RawRow], mapping: &ConfirmedMapping) -> Vec<Lead> {
    let leads: Vec<Lead> = rows.iter().map(|row| normalize_row(row, mapping)).collect();
    tracing::debug!("Normalized {} row(s) into leads", leads.len());
    leads
}

fn normalize_row(row: &RawRow, mapping: &ConfirmedMapping) -> Lead {
    let field_text = |field: CanonicalField| -> String {
        mapping
            .get(field)
            .and_then(|header| row.get(header))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()
    };

    let mut lead = Lead {
        name: field_text(CanonicalField::Name),
        title: field_text(CanonicalField::Title),
        company: field_text(CanonicalField::Company),
        website: field_text(CanonicalField::Website),
        email: field_text(CanonicalField::Email),
        phone: field_text(CanonicalField::Phone),
        extra: serde_json::Map::new(),
    };

    for (key, value) in row {
        if !CANONICAL_KEYS.contains(&key.as_str()) {
            lead.extra.insert(key.clone(), value.clone());
        }
    }

    lead
}
