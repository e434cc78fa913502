use contract_client::{ContractError, WalletError};
use shared::error::{ErrorKind, SessionShapeError, ValidationError};
use thiserror::Error;

/// A classified failure from any client operation.
///
/// `message` carries the technical detail for logs; user-facing text is
/// chosen from the kind by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind:?}: {message}")]
pub struct ClientError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ClientError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_connected() -> Self {
        Self::new(ErrorKind::WalletUnavailable, "wallet not connected")
    }

    /// Failure while obtaining an authorized account.
    pub fn connect(err: WalletError) -> Self {
        let kind = match &err {
            WalletError::Rejected { .. } | WalletError::NoAccounts => ErrorKind::AuthorizationDenied,
            _ => ErrorKind::WalletUnavailable,
        };
        Self::new(kind, err.to_string())
    }

    pub fn read(err: ContractError) -> Self {
        Self::new(ErrorKind::Read, err.to_string())
    }

    pub fn write(err: ContractError) -> Self {
        Self::new(ErrorKind::Write, err.to_string())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        Self::new(ErrorKind::Validation, err.to_string())
    }
}

impl From<SessionShapeError> for ClientError {
    fn from(err: SessionShapeError) -> Self {
        Self::new(ErrorKind::Read, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_wallet_failures() {
        assert_eq!(
            ClientError::connect(WalletError::Unavailable("refused".into())).kind,
            ErrorKind::WalletUnavailable
        );
        assert_eq!(
            ClientError::connect(WalletError::Rejected {
                code: 4001,
                message: "no".into()
            })
            .kind,
            ErrorKind::AuthorizationDenied
        );
        assert_eq!(
            ClientError::connect(WalletError::NoAccounts).kind,
            ErrorKind::AuthorizationDenied
        );
    }

    #[test]
    fn validation_errors_keep_user_text() {
        let err = ClientError::from(ValidationError::EmptyTitle);
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Please enter a valid title.");
        assert!(!err.is_fatal());
    }
}
