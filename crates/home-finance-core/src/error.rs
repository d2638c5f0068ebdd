use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomeFinanceError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Numeric overflow in {context}")]
    Overflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Remote calculation failed: {0}")]
    Remote(String),
}

impl HomeFinanceError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        HomeFinanceError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for HomeFinanceError {
    fn from(e: serde_json::Error) -> Self {
        HomeFinanceError::SerializationError(e.to_string())
    }
}

#[cfg(feature = "remote")]
impl From<reqwest::Error> for HomeFinanceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HomeFinanceError::Remote("request timed out".into())
        } else {
            HomeFinanceError::Remote(e.to_string())
        }
    }
}
