use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};

use crate::filter::FilterSpec;
use crate::models::{
    CanonicalRecord, Consensus, DailyScore, DateRange, KpiResult, Metric, MetricMeans,
    SessionCount, SessionScore,
};
use crate::stats::{mean, stddev, valid};

pub const EXCELLENT_THRESHOLD: f64 = 4.0;
pub const STRONG_RECOMMENDATION: f64 = 4.0;

const NO_SESSION: SessionScore = SessionScore {
    session: 0,
    score: 0.0,
};

pub fn compute(all: &[CanonicalRecord], filter: &FilterSpec) -> KpiResult {
    compute_at(all, filter, Utc::now().date_naive())
}

/// `today` stands in for both ends of the date range when no record carries a
/// readable date.
pub fn compute_at(all: &[CanonicalRecord], filter: &FilterSpec, today: NaiveDate) -> KpiResult {
    let filtered = filter.apply(all);
    tracing::debug!(total = all.len(), filtered = filtered.len(), "computing indicators");

    let by_session = group_by_session(all);
    let composites = composite_scores(&by_session);
    let worst_session = worst_session(&composites);
    let session_scores = rank_sessions(composites);
    let best_session = session_scores.first().copied().unwrap_or(NO_SESSION);
    let attentes_stddev = stddev(&valid(all.iter().map(|r| r.attentes)));

    let means = metric_means(&filtered);
    let global_filtered_score = means.attentes;

    KpiResult {
        total_responses: all.len(),
        sessions: by_session.keys().copied().collect(),
        excellent_sessions: session_scores
            .iter()
            .filter(|s| s.score >= EXCELLENT_THRESHOLD)
            .count(),
        session_scores,
        session_counts: session_counts(&by_session),
        best_session,
        worst_session,
        attentes_stddev,
        attentes_consensus: consensus(attentes_stddev),
        daily_attentes: daily_attentes(all),
        date_range: date_range(all, today),

        filtered_responses: filtered.len(),
        strong_recommendation_pct: strong_recommendation_pct(&filtered),
        defi_pays_pct: means.defi_pays / 5.0 * 100.0,
        means,
        global_filtered_score,
        applied_filter: filter.clone(),
    }
}

/// Records of each positive session, keyed in ascending session order.
fn group_by_session(all: &[CanonicalRecord]) -> BTreeMap<i64, Vec<&CanonicalRecord>> {
    let mut map: BTreeMap<i64, Vec<&CanonicalRecord>> = BTreeMap::new();
    for record in all.iter().filter(|r| r.session_id > 0) {
        map.entry(record.session_id).or_default().push(record);
    }
    map
}

/// Mean of every answered core metric across the session, pooled.
pub fn composite_score(records: &[&CanonicalRecord]) -> f64 {
    let pooled = valid(
        records
            .iter()
            .flat_map(|record| Metric::COMPOSITE.iter().map(|m| record.score(*m))),
    );
    mean(&pooled)
}

fn composite_scores(by_session: &BTreeMap<i64, Vec<&CanonicalRecord>>) -> Vec<SessionScore> {
    by_session
        .iter()
        .map(|(session, records)| SessionScore {
            session: *session,
            score: composite_score(records),
        })
        .collect()
}

/// Best first. The sort is stable, so equal scores keep ascending session order.
fn rank_sessions(mut scores: Vec<SessionScore>) -> Vec<SessionScore> {
    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scores
}

/// Walks sessions in ascending order and only replaces on a strictly lower score.
fn worst_session(composites: &[SessionScore]) -> SessionScore {
    composites
        .iter()
        .copied()
        .reduce(|worst, candidate| {
            if candidate.score < worst.score {
                candidate
            } else {
                worst
            }
        })
        .unwrap_or(NO_SESSION)
}

fn session_counts(by_session: &BTreeMap<i64, Vec<&CanonicalRecord>>) -> Vec<SessionCount> {
    let mut counts: Vec<SessionCount> = by_session
        .iter()
        .map(|(session, records)| SessionCount {
            session: *session,
            count: records.len(),
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

fn daily_attentes(all: &[CanonicalRecord]) -> Vec<DailyScore> {
    let mut days: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for record in all {
        if record.date.is_empty() || record.attentes == 0.0 {
            continue;
        }
        days.entry(record.date.as_str()).or_default().push(record.attentes);
    }

    days.into_iter()
        .map(|(date, values)| DailyScore {
            date: date.to_string(),
            score: mean(&values),
            responses: values.len(),
        })
        .collect()
}

fn date_range(all: &[CanonicalRecord], today: NaiveDate) -> DateRange {
    let dates: Vec<NaiveDate> = all
        .iter()
        .filter(|r| !r.date.is_empty())
        .filter_map(|r| NaiveDate::parse_from_str(&r.date, "%Y-%m-%d").ok())
        .collect();

    let first = dates.iter().min().copied().unwrap_or(today);
    let last = dates.iter().max().copied().unwrap_or(today);
    DateRange {
        first: first.format("%Y-%m-%d").to_string(),
        last: last.format("%Y-%m-%d").to_string(),
    }
}

fn metric_means(records: &[&CanonicalRecord]) -> MetricMeans {
    let metric_mean = |metric: Metric| mean(&valid(records.iter().map(|r| r.score(metric))));
    MetricMeans {
        attentes: metric_mean(Metric::Attentes),
        pertinence: metric_mean(Metric::Pertinence),
        qualite_presentations: metric_mean(Metric::QualitePresentations),
        satisfaction_intervenants: metric_mean(Metric::SatisfactionIntervenants),
        utilite_connaissances: metric_mean(Metric::UtiliteConnaissances),
        qualite_moderation: metric_mean(Metric::QualiteModeration),
        qualite_echanges: metric_mean(Metric::QualiteEchanges),
        qualite_logistique: metric_mean(Metric::QualiteLogistique),
        recommandation: metric_mean(Metric::Recommandation),
        defi_pays: metric_mean(Metric::DefiPays),
    }
}

/// Share of answered recommendations rated 4 or more, in percent.
fn strong_recommendation_pct(records: &[&CanonicalRecord]) -> f64 {
    let answered = valid(records.iter().map(|r| r.recommandation));
    if answered.is_empty() {
        return 0.0;
    }
    let strong = answered.iter().filter(|v| **v >= STRONG_RECOMMENDATION).count();
    strong as f64 / answered.len() as f64 * 100.0
}

pub fn consensus(deviation: f64) -> Consensus {
    match deviation {
        d if d < 0.8 => Consensus::Forte,
        d if d < 1.2 => Consensus::Moyenne,
        _ => Consensus::Faible,
    }
}
