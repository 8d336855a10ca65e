use thiserror::Error;

use crate::retry::RetryError;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Why a chat query did not produce an answer.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("Chat endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response body: {0}")]
    MalformedBody(String),

    #[error("Gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: usize, last: String },
}

impl QueryError {
    /// Transport failures and unreadable bodies are worth another attempt;
    /// an explicit error status from the server is not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::MalformedBody(_))
    }
}

impl From<RetryError<Self>> for QueryError {
    fn from(err: RetryError<Self>) -> Self {
        match err {
            RetryError::Aborted(e) => e,
            RetryError::Exhausted { attempts, last } => Self::Exhausted {
                attempts,
                last: last.map_or_else(|| "no attempts were made".to_string(), |e| e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_are_final() {
        let err = QueryError::Status {
            status: 500,
            body: "oops".to_string(),
        };
        assert!(!err.is_retryable());
        assert!(QueryError::MalformedBody("eof".to_string()).is_retryable());
        assert!(QueryError::Transport(TransportError::Other("reset".to_string())).is_retryable());
    }

    #[test]
    fn exhausted_retry_keeps_last_failure() {
        let err = QueryError::from(RetryError::Exhausted {
            attempts: 3,
            last: Some(QueryError::MalformedBody("eof".to_string())),
        });
        assert_eq!(
            err.to_string(),
            "Gave up after 3 attempts: Malformed response body: eof"
        );

        let err = QueryError::from(RetryError::<QueryError>::Exhausted {
            attempts: 0,
            last: None,
        });
        assert!(matches!(err, QueryError::Exhausted { attempts: 0, .. }));
    }
}
