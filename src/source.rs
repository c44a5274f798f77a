use std::path::{Path, PathBuf};

use reqwest::header::{ACCEPT, CACHE_CONTROL, PRAGMA};
use serde_json::Value;

use crate::config::Config;
use crate::error::{FetchError, Result};
use crate::models::RawSubmission;

/// Provider of the full, current submission set.
pub enum SubmissionSource {
    Http(HttpSource),
    File(FileSource),
}

impl SubmissionSource {
    pub async fn fetch(&self) -> Result<Vec<RawSubmission>> {
        match self {
            SubmissionSource::Http(source) => source.fetch().await,
            SubmissionSource::File(source) => source.fetch(),
        }
    }
}

pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            url: config.submissions_url.clone(),
        })
    }

    /// Single GET, bypassing intermediate caches.
    pub async fn fetch(&self) -> Result<Vec<RawSubmission>> {
        tracing::info!(url = %self.url, "fetching submissions");
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, %status, "submission API returned an error");
            return Err(FetchError::Status {
                status,
                url: self.url.clone(),
            });
        }

        let body = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&body)
            .map_err(|e| FetchError::Payload(format!("body is not JSON: {e}")))?;
        let submissions = parse_payload(payload)?;
        tracing::info!(count = submissions.len(), "submissions received");
        Ok(submissions)
    }
}

/// Local export: a JSON array like the API returns, or a CSV with one column per field.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn fetch(&self) -> Result<Vec<RawSubmission>> {
        let is_csv = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        let submissions = if is_csv {
            read_csv(&self.path)?
        } else {
            let content = std::fs::read(&self.path)?;
            let payload: Value = serde_json::from_slice(&content)
                .map_err(|e| FetchError::Payload(format!("{}: {e}", self.path.display())))?;
            parse_payload(payload)?
        };
        tracing::info!(
            path = %self.path.display(),
            count = submissions.len(),
            "submissions loaded from export"
        );
        Ok(submissions)
    }
}

/// The payload must be an array. Elements that are not objects carry no
/// fields and are skipped.
pub fn parse_payload(payload: Value) -> Result<Vec<RawSubmission>> {
    let Value::Array(items) = payload else {
        return Err(FetchError::Payload("expected a JSON array".to_string()));
    };

    let total = items.len();
    let submissions: Vec<RawSubmission> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect();

    let skipped = total - submissions.len();
    if skipped > 0 {
        tracing::warn!(skipped, "ignored submission entries that are not objects");
    }
    Ok(submissions)
}

fn read_csv(path: &Path) -> Result<Vec<RawSubmission>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let mut submissions = Vec::new();

    for result in reader.records() {
        let row = result?;
        let submission: RawSubmission = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(name, cell)| (name.to_string(), Value::String(cell.to_string())))
            .collect();
        submissions.push(submission);
    }

    Ok(submissions)
}
