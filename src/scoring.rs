use crate::models::{Lead, ScoredLead};

/// One scoring rule: if any keyword occurs in the lowercased title, the rule
/// fires and contributes its score.
#[derive(Debug, Clone, Copy)]
pub struct ScoreRule {
    pub keywords: &'static [&'static str],
    pub score: i64,
}

/// The rule table, in evaluation order. First match wins; later rules are
/// not consulted, so "Assistant to the CEO" scores as a CEO, not an
/// assistant.
pub const SCORE_RULES: &[ScoreRule] = &[
    ScoreRule {
        keywords: &["ceo", "founder", "president"],
        score: 10,
    },
    ScoreRule {
        keywords: &["head", "director", "vp", "vice president"],
        score: 8,
    },
    ScoreRule {
        keywords: &["sales", "business development", "account"],
        score: 5,
    },
    ScoreRule {
        keywords: &["intern", "assistant", "junior"],
        score: -5,
    },
];

/// Score when no rule matches.
pub const DEFAULT_SCORE: i64 = 2;

/// Scores a job title. Total and deterministic: any string input, including
/// the empty string, yields a score. Matching is case-insensitive substring
/// containment over the rule table.
pub fn score_title(title: &str) -> i64 {
    let title = title.to_lowercase();
    for rule in SCORE_RULES {
        if rule.keywords.iter().any(|k| title.contains(k)) {
            return rule.score;
        }
    }
    DEFAULT_SCORE
}

/// Attaches the title-derived score to a lead. Only the title is consulted;
/// every other field is carried through unchanged (known scope limitation).
pub fn score_lead(lead: Lead) -> ScoredLead {
    let score = score_title(&lead.title);
    ScoredLead::new(lead, score)
}

/// Scores a batch. Same length and order as the input; each lead is scored
/// independently, with no cross-lead state.
pub fn score_leads(leads: Vec<Lead>) -> Vec<ScoredLead> {
    leads.into_iter().map(score_lead).collect()
}

/// Display banding for a score, matching the result-table legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// 8 and up: decision makers.
    Hot,
    /// 5 to 7: sales-adjacent roles.
    Warm,
    /// 0 to 4: everyone else.
    Cool,
    /// Below 0: deprioritized roles.
    Negative,
}

impl ScoreBand {
    pub fn for_score(score: i64) -> Self {
        if score >= 8 {
            ScoreBand::Hot
        } else if score >= 5 {
            ScoreBand::Warm
        } else if score >= 0 {
            ScoreBand::Cool
        } else {
            ScoreBand::Negative
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ScoreBand::Hot => "Hot",
            ScoreBand::Warm => "Warm",
            ScoreBand::Cool => "Cool",
            ScoreBand::Negative => "Negative",
        }
    }
}
