//! Ingestion error types

use litgraph_common::errors::AppError;
use litgraph_common::StoreError;
use thiserror::Error;

/// Failure of one provider query
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("{provider} is rate limiting requests")]
    RateLimited { provider: &'static str },

    #[error("{provider} response could not be decoded: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },

    #[error("No provider registered for {backend}")]
    Unavailable { backend: &'static str },
}

impl ProviderError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::RateLimited { .. })
    }

    /// Metric label for the query outcome
    pub fn outcome(&self) -> &'static str {
        match self {
            ProviderError::Transport { .. } => "transport_error",
            ProviderError::Status { .. } => "status_error",
            ProviderError::RateLimited { .. } => "rate_limited",
            ProviderError::Decode { .. } => "decode_error",
            ProviderError::Unavailable { .. } => "unavailable",
        }
    }
}

/// Failure to turn one raw item into an article
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Title list is present but empty")]
    EmptyTitle,

    #[error("Item does not match the {provider} schema: {message}")]
    Malformed {
        provider: &'static str,
        message: String,
    },
}

/// Failure of a whole update cycle
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("Start date and end date are required")]
    MissingDates,

    #[error("Invalid {field} '{value}', expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("Start date {start} is after end date {end}")]
    InvertedRange { start: String, end: String },

    #[error("Article store error: {0}")]
    Store(#[from] StoreError),
}

impl From<UpdateError> for AppError {
    fn from(e: UpdateError) -> Self {
        match e {
            UpdateError::MissingDates => AppError::MissingField {
                field: "start_date/end_date".to_string(),
            },
            e @ UpdateError::InvalidDate { .. } => AppError::InvalidFormat {
                message: e.to_string(),
            },
            e @ UpdateError::InvertedRange { .. } => AppError::Validation {
                message: e.to_string(),
                field: Some("start_date".to_string()),
            },
            UpdateError::Store(e) => AppError::Store(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dates_message() {
        assert_eq!(
            UpdateError::MissingDates.to_string(),
            "Start date and end date are required"
        );
    }

    #[test]
    fn test_outcome_labels() {
        let err = ProviderError::RateLimited {
            provider: "semantic_scholar",
        };
        assert!(err.is_rate_limited());
        assert_eq!(err.outcome(), "rate_limited");

        let err = ProviderError::Status {
            provider: "crossref",
            status: 503,
        };
        assert!(!err.is_rate_limited());
        assert_eq!(err.outcome(), "status_error");
    }
}
