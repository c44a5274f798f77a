use serde::Serialize;
use thiserror::Error;

/// Failure to obtain the submission set. Aborts the whole computation.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("submission API {url} answered {status}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("submission API unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid submission payload: {0}")]
    Payload(String),

    #[error("cannot read submission export: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid CSV export: {0}")]
    Csv(#[from] csv::Error),
}

/// Body returned to the caller in place of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorObject {
    pub kind: &'static str,
    pub message: String,
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        "FetchFailure"
    }

    pub fn to_error_object(&self) -> ErrorObject {
        ErrorObject {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_is_a_fetch_failure() {
        let payload = FetchError::Payload("expected a JSON array".to_string());
        let object = payload.to_error_object();
        assert_eq!(object.kind, "FetchFailure");
        assert_eq!(object.message, "invalid submission payload: expected a JSON array");

        let status = FetchError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            url: "https://forms.example.org/data".to_string(),
        };
        assert_eq!(status.kind(), "FetchFailure");
        assert!(status.to_string().contains("502"));
    }
}
