use std::fmt::Write;

use crate::filter::FilterSpec;
use crate::models::{Consensus, KpiResult, Metric};

/// Band shown next to a 0–5 score.
pub fn rating_band(score: f64) -> &'static str {
    if score >= 4.0 {
        "excellent"
    } else if score >= 3.0 {
        "satisfaisant"
    } else {
        "insuffisant"
    }
}

fn consensus_label(consensus: Consensus) -> &'static str {
    match consensus {
        Consensus::Forte => "forte",
        Consensus::Moyenne => "moyenne",
        Consensus::Faible => "faible",
    }
}

pub fn describe_filter(filter: &FilterSpec) -> String {
    if filter.is_empty() {
        return "all sessions, all dates".to_string();
    }

    let sessions = if filter.session_ids.is_empty() {
        "all sessions".to_string()
    } else {
        let ids: Vec<String> = filter.session_ids.iter().map(|id| id.to_string()).collect();
        format!("sessions {}", ids.join(", "))
    };
    let from = filter.start_date.as_deref().unwrap_or("beginning");
    let to = filter.end_date.as_deref().unwrap_or("today");
    format!("{sessions}, from {from} to {to}")
}

pub fn build_report(kpi: &KpiResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Session Feedback Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} responses between {} and {})",
        describe_filter(&kpi.applied_filter),
        kpi.total_responses,
        kpi.date_range.first,
        kpi.date_range.last
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- Sessions: {}", kpi.sessions.len());
    let _ = writeln!(
        output,
        "- Excellent sessions (composite >= 4): {}",
        kpi.excellent_sessions
    );
    let _ = writeln!(
        output,
        "- Expectations spread: {:.2} (consensus {})",
        kpi.attentes_stddev,
        consensus_label(kpi.attentes_consensus)
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Session Ranking");

    if kpi.session_scores.is_empty() {
        let _ = writeln!(output, "No numbered session in the submissions.");
    } else {
        let _ = writeln!(
            output,
            "Best: session {} ({:.2}), worst: session {} ({:.2})",
            kpi.best_session.session,
            kpi.best_session.score,
            kpi.worst_session.session,
            kpi.worst_session.score
        );
        for score in kpi.session_scores.iter() {
            let responses = kpi
                .session_counts
                .iter()
                .find(|c| c.session == score.session)
                .map_or(0, |c| c.count);
            let _ = writeln!(
                output,
                "- Session {}: {:.2} ({}) across {} responses",
                score.session,
                score.score,
                rating_band(score.score),
                responses
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Expectations by Day");

    if kpi.daily_attentes.is_empty() {
        let _ = writeln!(output, "No dated responses.");
    } else {
        for day in kpi.daily_attentes.iter() {
            let _ = writeln!(
                output,
                "- {}: {:.2} ({} responses)",
                day.date, day.score, day.responses
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Filtered Indicators");
    let _ = writeln!(output, "{} responses match the filter.", kpi.filtered_responses);

    for metric in Metric::ALL {
        let value = kpi.means.get(metric);
        let _ = writeln!(
            output,
            "- {}: {:.2} ({})",
            metric.label(),
            value,
            rating_band(value)
        );
    }
    let _ = writeln!(
        output,
        "- Strong recommendation (>= 4): {:.0}%",
        kpi.strong_recommendation_pct
    );
    let _ = writeln!(output, "- Défi pays: {:.0}%", kpi.defi_pays_pct);

    output
}
