use crate::fields::{self, DATE_ALIASES, SESSION_ALIASES};
use crate::models::{CanonicalRecord, Metric, RawSubmission};

/// Normalize one submission. Never fails: unusable fields end up as 0 or "".
pub fn transform(raw: &RawSubmission) -> CanonicalRecord {
    let raw_date = fields::resolve_text(raw, DATE_ALIASES);
    let date = fields::parse_date(&raw_date);
    if !date.is_empty() && chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
        tracing::debug!(date = %raw_date, "submission date kept in its original shape");
    }

    let mut record = CanonicalRecord {
        session_id: fields::parse_session_id(fields::resolve(raw, SESSION_ALIASES)),
        date,
        ..CanonicalRecord::default()
    };
    for metric in Metric::ALL {
        let score = fields::parse_score(fields::resolve(raw, fields::aliases(metric)));
        record.set_score(metric, score);
    }
    record
}

pub fn transform_all(raws: &[RawSubmission]) -> Vec<CanonicalRecord> {
    raws.iter().map(transform).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn raw(value: Value) -> RawSubmission {
        match value {
            Value::Object(map) => map,
            _ => panic!("test submission must be an object"),
        }
    }

    #[test]
    fn maps_every_field() {
        let submission = raw(json!({
            "numero_session": "3",
            "_submission_time": "2026-01-05T08:30:00",
            "attentes_session": 4,
            "Pertinence_contenus": "5",
            "qualite_presentations": 3,
            "Satisfaction_intervenants": 4.5,
            "utilite_connaissances": "2",
            "qualite_moderation": 1,
            "Qualite_echanges": 3,
            "qualite_logistique": 9,
            "Recommandation": "4",
            "Difi_pays": 2
        }));

        let record = transform(&submission);
        assert_eq!(record.session_id, 3);
        assert_eq!(record.date, "2026-01-05");
        assert_eq!(record.attentes, 4.0);
        assert_eq!(record.pertinence, 5.0);
        assert_eq!(record.qualite_presentations, 3.0);
        assert_eq!(record.satisfaction_intervenants, 4.5);
        assert_eq!(record.utilite_connaissances, 2.0);
        assert_eq!(record.qualite_moderation, 1.0);
        assert_eq!(record.qualite_echanges, 3.0);
        assert_eq!(record.qualite_logistique, 5.0);
        assert_eq!(record.recommandation, 4.0);
        assert_eq!(record.defi_pays, 2.0);
    }

    #[test]
    fn empty_submission_is_all_sentinels() {
        let record = transform(&RawSubmission::new());
        assert_eq!(record, CanonicalRecord::default());
        assert_eq!(record.session_id, 0);
        assert!(record.date.is_empty());
    }

    #[test]
    fn malformed_score_becomes_zero() {
        let record = transform(&raw(json!({"attentes_session": "abc"})));
        assert_eq!(record.attentes, 0.0);
    }

    #[test]
    fn french_date_format_is_reassembled() {
        let record = transform(&raw(json!({"_submission_time": "7/2/2026 14:05"})));
        assert_eq!(record.date, "2026-02-07");
    }
}
