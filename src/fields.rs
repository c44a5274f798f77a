use serde_json::Value;

use crate::models::{Metric, RawSubmission};

pub const SESSION_ALIASES: &[&str] = &["numero_session", "Numero_session", "session"];
pub const DATE_ALIASES: &[&str] = &["_submission_time", "submission_time", "date"];

/// Field names tried for each metric, in lookup order. Older form exports
/// come first; the order is kept for compatibility with existing dashboards.
pub fn aliases(metric: Metric) -> &'static [&'static str] {
    match metric {
        Metric::Attentes => &["attentes_session", "Satisfaction_attentes"],
        Metric::Pertinence => &["pertinence_session", "Pertinence_contenus"],
        Metric::QualitePresentations => &["qualite_presentations", "Qualite_presentations"],
        Metric::SatisfactionIntervenants => {
            &["satisfaction_intervenants", "Satisfaction_intervenants"]
        }
        Metric::UtiliteConnaissances => &["utilite_connaissances", "Utilite_connaissances"],
        Metric::QualiteModeration => &["qualite_moderation", "Qualite_moderation"],
        Metric::QualiteEchanges => &["qualite_echanges", "Qualite_echanges"],
        Metric::QualiteLogistique => &["qualite_logistique", "Qualite_logistique"],
        Metric::Recommandation => &["recommandation_session", "Recommandation"],
        Metric::DefiPays => &[
            "defi_pays",
            "Defi_pays",
            "Difi_pays",
            "Défi_pays",
            "defis_pays",
        ],
    }
}

/// First alias holding something other than null or an empty string.
pub fn resolve<'a>(raw: &'a RawSubmission, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| raw.get(*name))
        .find(|value| match value {
            Value::Null => false,
            Value::String(text) => !text.is_empty(),
            _ => true,
        })
}

pub fn resolve_text(raw: &RawSubmission, names: &[&str]) -> String {
    match resolve(raw, names) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

fn to_number(value: Option<&Value>) -> f64 {
    let number = match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(text)) => text.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    };
    // "inf", "infinity" and overflowing literals are text, not ratings.
    if number.is_finite() {
        number
    } else {
        0.0
    }
}

/// Score in [0, 5]; absent or non-numeric input becomes 0, anything outside
/// the range is clipped.
pub fn parse_score(value: Option<&Value>) -> f64 {
    clamp_score(to_number(value))
}

pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 5.0)
}

/// Same coercion as scores but unbounded. Fractions are truncated.
pub fn parse_session_id(value: Option<&Value>) -> i64 {
    to_number(value).trunc() as i64
}

/// `2026-03-10T09:00:00` and `10/03/2026 09:00` both become `2026-03-10`.
/// Any other shape is handed back untouched.
pub fn parse_date(text: &str) -> String {
    if text.contains('T') {
        return text.split('T').next().unwrap_or_default().to_string();
    }

    let day_part = text.split(' ').next().unwrap_or_default();
    let pieces: Vec<&str> = day_part.split('/').collect();
    match pieces.as_slice() {
        [day, month, year, ..] if !day.is_empty() && !month.is_empty() && !year.is_empty() => {
            format!("{year}-{month:0>2}-{day:0>2}")
        }
        _ => text.to_string(),
    }
}
