use thiserror::Error;
use ticket_schema::ValidationError;

/// Broad classification of a failure, used for logging.
///
/// The views never branch on it: every error is reduced to one string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Authentication,
    Authorization,
    Validation,
    NotFound,
    Server,
    Local,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("api returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Api { status: u16, message: Option<String> },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::Api { status, .. } => match status {
                401 => ErrorKind::Authentication,
                403 => ErrorKind::Authorization,
                404 => ErrorKind::NotFound,
                400..=499 => ErrorKind::Validation,
                _ => ErrorKind::Server,
            },
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::Decode(_) | ClientError::Storage(_) | ClientError::Config(_) => {
                ErrorKind::Local
            }
        }
    }

    /// The single string shown to the user: the server's `error` field,
    /// the local validation message, or `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            ClientError::Validation(err) => err.to_string(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for ClientError {
    fn from(err: rusqlite::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins_over_fallback() {
        let err = ClientError::Api {
            status: 401,
            message: Some("Invalid credentials".into()),
        };
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn missing_server_message_uses_fallback() {
        let err = ClientError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Failed to fetch tickets"), "Failed to fetch tickets");
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.to_string(), "api returned 500: no error message");
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = ClientError::from(ValidationError::MissingField("title"));
        assert_eq!(err.user_message("Failed to create ticket"), "title is required");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn classifies_status_codes() {
        let kind = |status| ClientError::Api { status, message: None }.kind();
        assert_eq!(kind(403), ErrorKind::Authorization);
        assert_eq!(kind(404), ErrorKind::NotFound);
        assert_eq!(kind(400), ErrorKind::Validation);
    }
}
