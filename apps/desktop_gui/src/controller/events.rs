//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{ClientError, ClientEvent};
use shared::error::ErrorKind;

pub enum UiEvent {
    Info(String),
    Client(ClientEvent),
    /// Client events were dropped on the way to the UI.
    Resync,
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Wallet,
    Transport,
    Contract,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Connect,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err.kind {
            ErrorKind::WalletUnavailable | ErrorKind::AuthorizationDenied => UiErrorCategory::Wallet,
            ErrorKind::Read | ErrorKind::Write => UiErrorCategory::Contract,
            ErrorKind::Validation | ErrorKind::Config => UiErrorCategory::Validation,
        };
        Self {
            category,
            context,
            message: err.message.clone(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("wallet")
            || message_lower.contains("account")
            || message_lower.contains("rejected")
        {
            UiErrorCategory::Wallet
        } else if message_lower.contains("revert") || message_lower.contains("execution") {
            UiErrorCategory::Contract
        } else if message_lower.contains("invalid") || message_lower.contains("missing") {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("unavailable")
            || message_lower.contains("runtime")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Wallet problems during connect cannot be retried from the UI.
    pub fn requires_restart(&self) -> bool {
        self.context == UiErrorContext::BackendStartup
            || (self.context == UiErrorContext::Connect && self.category == UiErrorCategory::Wallet)
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_failures_during_connect_require_restart() {
        let err = UiError::from_client_error(
            UiErrorContext::Connect,
            &ClientError::new(ErrorKind::AuthorizationDenied, "user rejected request"),
        );
        assert_eq!(err.category(), UiErrorCategory::Wallet);
        assert!(err.requires_restart());
    }

    #[test]
    fn classifies_runtime_startup_failure_as_transport() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "backend worker startup failure: failed to build runtime: os error",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert!(err.requires_restart());
    }

    #[test]
    fn contract_failures_are_retryable() {
        let err = UiError::from_client_error(
            UiErrorContext::General,
            &ClientError::new(ErrorKind::Write, "transaction reverted"),
        );
        assert_eq!(err.category(), UiErrorCategory::Contract);
        assert!(!err.requires_restart());
    }
}
