//! Client error types

use thiserror::Error;

/// Client error type
///
/// Every failure the backend can produce lands in one of these variants.
/// Stores flatten them into a single message with [`ClientError::user_message`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status without a parseable envelope
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not a valid envelope
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Envelope with `success=false`
    #[error("API error: {}", message.as_deref().unwrap_or("no message"))]
    Api { message: Option<String> },

    /// Envelope with `success=true` but without the expected payload
    #[error("Missing data: {0}")]
    MissingData(String),

    /// Caller input rejected before any request was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request superseded by a newer one or its owner was torn down
    #[error("Request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Message to surface to the user.
    ///
    /// The backend's own message wins when it sent one; validation errors
    /// keep their text; everything else falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api { message: Some(m) } => m.clone(),
            Self::Validation(m) => m.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Whether the backend answered with a `success=false` envelope
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(m) => m.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect::<Vec<_>>()
            .join("; ");
        Self::Validation(message)
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::StationCreate;
    use validator::Validate;

    #[test]
    fn test_user_message_prefers_backend_text() {
        let err = ClientError::Api {
            message: Some("Station already exists".into()),
        };
        assert_eq!(err.user_message("fallback"), "Station already exists");
        assert!(err.is_rejection());
    }

    #[test]
    fn test_user_message_falls_back() {
        assert_eq!(
            ClientError::Api { message: None }.user_message("Unable to fetch orders"),
            "Unable to fetch orders"
        );
        assert_eq!(
            ClientError::MissingData("order id".into()).user_message("Unable to fetch orders"),
            "Unable to fetch orders"
        );
        assert_eq!(
            ClientError::InvalidResponse("eof".into()).user_message("x"),
            "x"
        );
    }

    #[test]
    fn test_validation_errors_keep_field_messages() {
        let err: ClientError = StationCreate::new("").validate().unwrap_err().into();
        assert_eq!(err.user_message("x"), "Station name is required");
    }
}
