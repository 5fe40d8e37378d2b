//! Backend exception taxonomy and the user-facing message dictionary.

use thiserror::Error;
use tracing::error;

/// Backend exception identifiers, mapped 1:1 to user-facing messages.
///
/// The dictionary is closed: an identifier the backend sends that is not
/// listed here becomes [`ErrorKind::Unmapped`], which keeps the original name
/// visible instead of pretending the call succeeded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("Username or Email not found.")]
    UserNotFound,
    #[error("You are not authorized to perform this action.")]
    NotAuthorized,
    #[error("Provided code doesn't match what the server was expecting.")]
    CodeMismatch,
    #[error("Username not specified.")]
    EmptyUsername,
    #[error("Unexpected error: {0}")]
    Unmapped(String),
}

impl ErrorKind {
    /// Classify a backend exception identifier.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "UserNotFoundException" => Self::UserNotFound,
            "NotAuthorizedException" => Self::NotAuthorized,
            "CodeMismatchException" => Self::CodeMismatch,
            "EmptyUsernameException" => Self::EmptyUsername,
            other => {
                error!("unmapped backend exception: {other}");
                Self::Unmapped(other.to_string())
            }
        }
    }

    /// User-facing message for this kind.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_code_maps_known_identifiers() {
        assert_eq!(
            ErrorKind::from_code("UserNotFoundException"),
            ErrorKind::UserNotFound
        );
        assert_eq!(
            ErrorKind::from_code("NotAuthorizedException"),
            ErrorKind::NotAuthorized
        );
        assert_eq!(
            ErrorKind::from_code("CodeMismatchException"),
            ErrorKind::CodeMismatch
        );
        assert_eq!(
            ErrorKind::from_code("EmptyUsernameException"),
            ErrorKind::EmptyUsername
        );
    }

    #[test]
    fn from_code_keeps_unmapped_identifier_visible() {
        let kind = ErrorKind::from_code("LimitExceededException");
        assert_eq!(
            kind,
            ErrorKind::Unmapped("LimitExceededException".to_string())
        );
        assert_eq!(kind.message(), "Unexpected error: LimitExceededException");
    }

    #[test]
    fn message_dictionary_is_fixed() {
        assert_eq!(
            ErrorKind::UserNotFound.message(),
            "Username or Email not found."
        );
        assert_eq!(
            ErrorKind::NotAuthorized.message(),
            "You are not authorized to perform this action."
        );
        assert_eq!(
            ErrorKind::CodeMismatch.message(),
            "Provided code doesn't match what the server was expecting."
        );
        assert_eq!(ErrorKind::EmptyUsername.message(), "Username not specified.");
    }
}
