use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::CanonicalRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Empty means every session.
    pub session_ids: BTreeSet<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl FilterSpec {
    /// Build from caller parameters. Session entries that are not integers are
    /// dropped; blank dates mean "no bound".
    pub fn from_params(
        sessions: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Self {
        Self {
            session_ids: sessions.map(parse_sessions).unwrap_or_default(),
            start_date: non_blank(start_date),
            end_date: non_blank(end_date),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.session_ids.is_empty() && self.start_date.is_none() && self.end_date.is_none()
    }

    /// Unassigned records (session 0) and undated records are never excluded.
    pub fn matches(&self, record: &CanonicalRecord) -> bool {
        let session_ok = self.session_ids.is_empty()
            || record.session_id == 0
            || self.session_ids.contains(&record.session_id);

        let start_ok = match &self.start_date {
            Some(start) => record.date.is_empty() || record.date.as_str() >= start.as_str(),
            None => true,
        };
        let end_ok = match &self.end_date {
            Some(end) => record.date.is_empty() || record.date.as_str() <= end.as_str(),
            None => true,
        };

        session_ok && start_ok && end_ok
    }

    pub fn apply<'a>(&self, records: &'a [CanonicalRecord]) -> Vec<&'a CanonicalRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}

pub fn parse_sessions(list: &str) -> BTreeSet<i64> {
    list.split(',')
        .filter_map(|entry| entry.trim().parse::<i64>().ok())
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
