//! Failure taxonomy shared by the weather board components.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoardError {
    /// The geocoding provider returned no match for the query.
    #[error("City not found: {0}")]
    NotFound(String),

    /// Transport failure, non-success status or an undecodable response.
    #[error("Network error: {0}")]
    Network(String),

    /// The location source refused to share a position.
    #[error("Location permission denied")]
    PermissionDenied,

    /// Persisted data could not be parsed. Never surfaced to the user.
    #[error("Stored data is corrupt: {0}")]
    StorageCorrupt(String),
}

impl BoardError {
    /// Message suitable for an alert or an inline error card.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) => "City not found".to_string(),
            Self::Network(_) => "Failed to load weather".to_string(),
            Self::PermissionDenied => "Location permission denied".to_string(),
            Self::StorageCorrupt(_) => "Local storage error".to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for BoardError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_match_error_cards() {
        assert_eq!(BoardError::NotFound("atlantis".into()).user_message(), "City not found");
        assert_eq!(
            BoardError::PermissionDenied.user_message(),
            "Location permission denied"
        );
        assert_eq!(
            BoardError::Network("timeout".into()).user_message(),
            "Failed to load weather"
        );
    }

    #[test]
    fn display_keeps_detail() {
        let err = BoardError::NotFound("atlantis".into());
        assert!(err.to_string().contains("atlantis"));
        assert!(err.is_not_found());
        assert!(!BoardError::PermissionDenied.is_not_found());
    }
}
