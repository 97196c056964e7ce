use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// Heuristic metrics and risk assessment for a single prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub token_count: usize,
    pub strong_constraint_count: usize,
    pub uncertainty_count: usize,
    pub role_specified: bool,
    pub risk_score: u32,
    pub risk_reasons: Vec<String>,
}

/// Coarse bucket for a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low",
            RiskBand::Moderate => "Moderate",
            RiskBand::High => "High",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a renderer needs after comparing prompt A against prompt B.
///
/// `risk`, `risk_band` and `risk_reasons` describe prompt B, the revision
/// under review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub insights: Vec<String>,
    pub delta: i64,
    pub risk: u32,
    pub risk_band: RiskBand,
    pub risk_reasons: Vec<String>,
    pub analysis_a: AnalysisResult,
    pub analysis_b: AnalysisResult,
}

// ---------------------------------------------------------------------------
// Hyperparameters
// ---------------------------------------------------------------------------

struct Hyperparameters {
    missing_role_weight: u32,
    short_prompt_below: usize,
    short_prompt_weight: u32,
    long_prompt_above: usize,
    long_prompt_weight: u32,
    missing_constraints_weight: u32,
    over_constrained_min: usize,
    over_constrained_weight: u32,
    missing_uncertainty_weight: u32,
    excessive_uncertainty_min: usize,
    excessive_uncertainty_weight: u32,
    score_max: u32,
    band_low_max: u32,
    band_moderate_max: u32,
}

static HP: Hyperparameters = Hyperparameters {
    missing_role_weight: 3,
    short_prompt_below: 10,
    short_prompt_weight: 2,
    long_prompt_above: 250,
    long_prompt_weight: 1,
    missing_constraints_weight: 2,
    over_constrained_min: 4,
    over_constrained_weight: 1,
    missing_uncertainty_weight: 1,
    excessive_uncertainty_min: 3,
    excessive_uncertainty_weight: 1,
    score_max: 10,
    band_low_max: 3,
    band_moderate_max: 6,
};

// ---------------------------------------------------------------------------
// Reasons and insights
// ---------------------------------------------------------------------------

pub const REASON_NO_ROLE: &str = "No role specified";
pub const REASON_TOO_SHORT: &str = "Prompt very short → under-specified";
pub const REASON_TOO_LONG: &str = "Very long prompt → higher drift risk";
pub const REASON_NO_CONSTRAINTS: &str = "No hard constraints";
pub const REASON_OVER_CONSTRAINED: &str = "Over-constrained prompt";
pub const REASON_NO_UNCERTAINTY: &str = "No uncertainty language";
pub const REASON_EXCESSIVE_UNCERTAINTY: &str = "Excessive uncertainty";

pub const INSIGHT_MORE_TOKENS: &str = "More tokens → higher cost, more context";
pub const INSIGHT_FEWER_TOKENS: &str = "Fewer tokens → faster, less constrained";
pub const INSIGHT_STRONGER_CONSTRAINTS: &str = "Stronger constraints → lower creativity";
pub const INSIGHT_ROLE_ADDED: &str = "Role clarity added → reduced hallucination risk";
pub const INSIGHT_MORE_UNCERTAINTY: &str =
    "More uncertainty language → safer but less confident output";

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

// Patterns run against lower-cased text, so no case-insensitive flag.

fn lexicon_regex(words: &[&str]) -> Regex {
    let alt = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alt})\b")).unwrap()
}

static STRONG_CONSTRAINT_RE: Lazy<Regex> = Lazy::new(|| {
    lexicon_regex(&["must", "always", "never", "strict", "exactly", "only"])
});

static UNCERTAINTY_RE: Lazy<Regex> =
    Lazy::new(|| lexicon_regex(&["might", "maybe", "could", "possibly", "generally"]));

static ROLE_MARKER_RE: Lazy<Regex> = Lazy::new(|| lexicon_regex(&["you are", "act as"]));

// ---------------------------------------------------------------------------
// Rule implementations
// ---------------------------------------------------------------------------

struct Metrics {
    token_count: usize,
    strong_constraint_count: usize,
    uncertainty_count: usize,
    role_specified: bool,
}

impl Metrics {
    fn measure(prompt: &str) -> Self {
        let text = prompt.to_lowercase();
        Metrics {
            token_count: text.split_whitespace().count(),
            strong_constraint_count: STRONG_CONSTRAINT_RE.find_iter(&text).count(),
            uncertainty_count: UNCERTAINTY_RE.find_iter(&text).count(),
            role_specified: ROLE_MARKER_RE.is_match(&text),
        }
    }
}

struct Finding {
    weight: u32,
    reason: &'static str,
}

fn found(weight: u32, reason: &'static str) -> Option<Finding> {
    Some(Finding { weight, reason })
}

fn rule_role(m: &Metrics) -> Option<Finding> {
    if m.role_specified {
        return None;
    }
    found(HP.missing_role_weight, REASON_NO_ROLE)
}

fn rule_length(m: &Metrics) -> Option<Finding> {
    if m.token_count < HP.short_prompt_below {
        found(HP.short_prompt_weight, REASON_TOO_SHORT)
    } else if m.token_count > HP.long_prompt_above {
        found(HP.long_prompt_weight, REASON_TOO_LONG)
    } else {
        None
    }
}

fn rule_constraints(m: &Metrics) -> Option<Finding> {
    match m.strong_constraint_count {
        0 => found(HP.missing_constraints_weight, REASON_NO_CONSTRAINTS),
        n if n >= HP.over_constrained_min => {
            found(HP.over_constrained_weight, REASON_OVER_CONSTRAINED)
        }
        _ => None,
    }
}

fn rule_uncertainty(m: &Metrics) -> Option<Finding> {
    match m.uncertainty_count {
        0 => found(HP.missing_uncertainty_weight, REASON_NO_UNCERTAINTY),
        n if n >= HP.excessive_uncertainty_min => found(
            HP.excessive_uncertainty_weight,
            REASON_EXCESSIVE_UNCERTAINTY,
        ),
        _ => None,
    }
}

// Evaluation order is also the order reasons are reported in.
const RULES: [fn(&Metrics) -> Option<Finding>; 4] =
    [rule_role, rule_length, rule_constraints, rule_uncertainty];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Score a prompt for qualitative risk signals.
///
/// Every rule sees the same metrics; weights add up and the total is capped
/// at 10. The cap never drops reasons.
pub fn analyze(prompt: &str) -> AnalysisResult {
    let metrics = Metrics::measure(prompt);

    let mut raw_score = 0u32;
    let mut risk_reasons = Vec::new();
    for finding in RULES.iter().filter_map(|rule| rule(&metrics)) {
        raw_score += finding.weight;
        risk_reasons.push(finding.reason.to_string());
    }

    AnalysisResult {
        token_count: metrics.token_count,
        strong_constraint_count: metrics.strong_constraint_count,
        uncertainty_count: metrics.uncertainty_count,
        role_specified: metrics.role_specified,
        risk_score: raw_score.min(HP.score_max),
        risk_reasons,
    }
}

/// Describe how revision `b` differs from `a`, one insight per applicable rule.
pub fn diff(a: &AnalysisResult, b: &AnalysisResult) -> Vec<String> {
    let mut insights = Vec::new();

    if b.token_count > a.token_count {
        insights.push(INSIGHT_MORE_TOKENS.to_string());
    } else if b.token_count < a.token_count {
        insights.push(INSIGHT_FEWER_TOKENS.to_string());
    }

    if b.strong_constraint_count > a.strong_constraint_count {
        insights.push(INSIGHT_STRONGER_CONSTRAINTS.to_string());
    }

    if b.role_specified && !a.role_specified {
        insights.push(INSIGHT_ROLE_ADDED.to_string());
    }

    if b.uncertainty_count > a.uncertainty_count {
        insights.push(INSIGHT_MORE_UNCERTAINTY.to_string());
    }

    insights
}

pub fn risk_band(score: u32) -> RiskBand {
    if score <= HP.band_low_max {
        RiskBand::Low
    } else if score <= HP.band_moderate_max {
        RiskBand::Moderate
    } else {
        RiskBand::High
    }
}

/// Analyze both prompts and assemble the comparison bundle for prompt B.
pub fn compare(prompt_a: &str, prompt_b: &str) -> Comparison {
    let analysis_a = analyze(prompt_a);
    let analysis_b = analyze(prompt_b);
    let delta = analysis_b.token_count as i64 - analysis_a.token_count as i64;

    debug!(
        risk_a = analysis_a.risk_score,
        risk_b = analysis_b.risk_score,
        delta,
        "compared prompts"
    );

    Comparison {
        insights: diff(&analysis_a, &analysis_b),
        delta,
        risk: analysis_b.risk_score,
        risk_band: risk_band(analysis_b.risk_score),
        risk_reasons: analysis_b.risk_reasons.clone(),
        analysis_a,
        analysis_b,
    }
}
