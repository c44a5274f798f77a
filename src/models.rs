use serde::Serialize;

use crate::filter::FilterSpec;

/// One survey response as delivered by the form-collection API: field name to
/// string, number or null. Field names vary between schema generations.
pub type RawSubmission = serde_json::Map<String, serde_json::Value>;

/// The ten rated questions of the feedback form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Attentes,
    Pertinence,
    QualitePresentations,
    SatisfactionIntervenants,
    UtiliteConnaissances,
    QualiteModeration,
    QualiteEchanges,
    QualiteLogistique,
    Recommandation,
    DefiPays,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::Attentes,
        Metric::Pertinence,
        Metric::QualitePresentations,
        Metric::SatisfactionIntervenants,
        Metric::UtiliteConnaissances,
        Metric::QualiteModeration,
        Metric::QualiteEchanges,
        Metric::QualiteLogistique,
        Metric::Recommandation,
        Metric::DefiPays,
    ];

    /// Metrics pooled into a session's composite score.
    pub const COMPOSITE: [Metric; 8] = [
        Metric::Attentes,
        Metric::Pertinence,
        Metric::QualitePresentations,
        Metric::SatisfactionIntervenants,
        Metric::UtiliteConnaissances,
        Metric::QualiteModeration,
        Metric::QualiteEchanges,
        Metric::QualiteLogistique,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Attentes => "Satisfaction des attentes",
            Metric::Pertinence => "Pertinence des contenus",
            Metric::QualitePresentations => "Qualité des présentations",
            Metric::SatisfactionIntervenants => "Satisfaction intervenants",
            Metric::UtiliteConnaissances => "Utilité des connaissances",
            Metric::QualiteModeration => "Qualité de la modération",
            Metric::QualiteEchanges => "Qualité des échanges",
            Metric::QualiteLogistique => "Qualité de la logistique",
            Metric::Recommandation => "Recommandation",
            Metric::DefiPays => "Défi pays",
        }
    }
}

/// Normalized submission. Every score lies in [0, 5] and 0 doubles as the
/// "no usable answer" sentinel: it never enters a mean or a deviation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalRecord {
    /// 0 when the submission carries no session number.
    pub session_id: i64,
    /// `YYYY-MM-DD`, empty when absent, or the raw text when it had an unknown shape.
    pub date: String,
    pub attentes: f64,
    pub pertinence: f64,
    pub qualite_presentations: f64,
    pub satisfaction_intervenants: f64,
    pub utilite_connaissances: f64,
    pub qualite_moderation: f64,
    pub qualite_echanges: f64,
    pub qualite_logistique: f64,
    pub recommandation: f64,
    pub defi_pays: f64,
}

impl CanonicalRecord {
    pub fn score(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Attentes => self.attentes,
            Metric::Pertinence => self.pertinence,
            Metric::QualitePresentations => self.qualite_presentations,
            Metric::SatisfactionIntervenants => self.satisfaction_intervenants,
            Metric::UtiliteConnaissances => self.utilite_connaissances,
            Metric::QualiteModeration => self.qualite_moderation,
            Metric::QualiteEchanges => self.qualite_echanges,
            Metric::QualiteLogistique => self.qualite_logistique,
            Metric::Recommandation => self.recommandation,
            Metric::DefiPays => self.defi_pays,
        }
    }

    pub(crate) fn set_score(&mut self, metric: Metric, value: f64) {
        let slot = match metric {
            Metric::Attentes => &mut self.attentes,
            Metric::Pertinence => &mut self.pertinence,
            Metric::QualitePresentations => &mut self.qualite_presentations,
            Metric::SatisfactionIntervenants => &mut self.satisfaction_intervenants,
            Metric::UtiliteConnaissances => &mut self.utilite_connaissances,
            Metric::QualiteModeration => &mut self.qualite_moderation,
            Metric::QualiteEchanges => &mut self.qualite_echanges,
            Metric::QualiteLogistique => &mut self.qualite_logistique,
            Metric::Recommandation => &mut self.recommandation,
            Metric::DefiPays => &mut self.defi_pays,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionScore {
    pub session: i64,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionCount {
    pub session: i64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyScore {
    pub date: String,
    pub score: f64,
    pub responses: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub first: String,
    pub last: String,
}

/// Qualitative reading of how much respondents agree, from a standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Consensus {
    Forte,
    Moyenne,
    Faible,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricMeans {
    pub attentes: f64,
    pub pertinence: f64,
    pub qualite_presentations: f64,
    pub satisfaction_intervenants: f64,
    pub utilite_connaissances: f64,
    pub qualite_moderation: f64,
    pub qualite_echanges: f64,
    pub qualite_logistique: f64,
    pub recommandation: f64,
    pub defi_pays: f64,
}

impl MetricMeans {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Attentes => self.attentes,
            Metric::Pertinence => self.pertinence,
            Metric::QualitePresentations => self.qualite_presentations,
            Metric::SatisfactionIntervenants => self.satisfaction_intervenants,
            Metric::UtiliteConnaissances => self.utilite_connaissances,
            Metric::QualiteModeration => self.qualite_moderation,
            Metric::QualiteEchanges => self.qualite_echanges,
            Metric::QualiteLogistique => self.qualite_logistique,
            Metric::Recommandation => self.recommandation,
            Metric::DefiPays => self.defi_pays,
        }
    }
}

/// Snapshot returned for one request. Fields above `filtered_responses` ignore
/// the filter entirely; the rest only see records that passed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiResult {
    pub total_responses: usize,
    pub sessions: Vec<i64>,
    /// Composite score per session, best first.
    pub session_scores: Vec<SessionScore>,
    pub session_counts: Vec<SessionCount>,
    pub best_session: SessionScore,
    pub worst_session: SessionScore,
    pub attentes_stddev: f64,
    pub attentes_consensus: Consensus,
    pub daily_attentes: Vec<DailyScore>,
    pub excellent_sessions: usize,
    pub date_range: DateRange,

    pub filtered_responses: usize,
    pub means: MetricMeans,
    pub global_filtered_score: f64,
    pub strong_recommendation_pct: f64,
    pub defi_pays_pct: f64,
    pub applied_filter: FilterSpec,
}
