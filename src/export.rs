use crate::errors::{AppError, ResultExt};
use crate::models::ScoredLead;

/// Sorts scored leads highest-score-first. Stable, so equal scores keep
/// their batch order.
pub fn sort_by_score_desc(leads: &mut [ScoredLead]) {
    leads.sort_by(|a, b| b.score.cmp(&a.score));
}

/// Serializes scored leads as a pretty-printed JSON array.
///
/// Field order per lead: name, title, company, website, email, phone, score,
/// then any passthrough columns in their source order.
pub fn to_pretty_json(leads: &[ScoredLead]) -> Result<String, AppError> {
    serde_json::to_string_pretty(leads).context("Serializing scored leads for export")
}
