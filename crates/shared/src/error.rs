use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure classes surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No wallet provider reachable. Fatal until restart.
    WalletUnavailable,
    /// The provider refused to expose an account. Fatal until restart.
    AuthorizationDenied,
    Read,
    Write,
    Validation,
    Config,
}

impl ErrorKind {
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::WalletUnavailable | Self::AuthorizationDenied)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid title.")]
    EmptyTitle,
    #[error("Please add at least one proposal.")]
    NoProposals,
    #[error("Please enter a valid proposal.")]
    EmptyProposal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionShapeError {
    #[error("session {session_id}: {actual} vote counts for {expected} proposals")]
    VoteCountMismatch {
        session_id: u64,
        expected: usize,
        actual: usize,
    },
    #[error("session {session_id}: voted index {index} out of range for {len} proposals")]
    VotedIndexOutOfRange {
        session_id: u64,
        index: usize,
        len: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexParseError {
    #[error("expected {expected} hex digits, got {actual}")]
    Length { expected: usize, actual: usize },
    #[error("invalid hex: {0}")]
    Digits(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter value '{0}'")]
pub struct FilterParseError(pub String);
