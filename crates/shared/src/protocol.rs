use serde::{Deserialize, Serialize};

use crate::domain::{NewSession, SessionId};

hex_bytes_newtype!(TxHash, 32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub transaction_hash: TxHash,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    pub succeeded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Create,
    Vote,
    Close,
}

/// A state-changing contract call requested by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SessionAction {
    Create(NewSession),
    Vote {
        session_id: SessionId,
        proposal_index: usize,
    },
    Close {
        session_id: SessionId,
    },
}

impl SessionAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Create(_) => ActionKind::Create,
            Self::Vote { .. } => ActionKind::Vote,
            Self::Close { .. } => ActionKind::Close,
        }
    }

    pub fn session_id(&self) -> Option<SessionId> {
        match self {
            Self::Create(_) => None,
            Self::Vote { session_id, .. } | Self::Close { session_id } => Some(*session_id),
        }
    }

    pub fn pending_message(&self) -> &'static str {
        match self.kind() {
            ActionKind::Create => "Creating session...",
            ActionKind::Vote => "Vote in progress...",
            ActionKind::Close => "Closing session...",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self.kind() {
            ActionKind::Create => "Session created!",
            ActionKind::Vote => "Vote recorded!",
            ActionKind::Close => "Session closed!",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self.kind() {
            ActionKind::Create => "Failed to create the session.",
            ActionKind::Vote => "Failed to vote.",
            ActionKind::Close => "Failed to close the session.",
        }
    }
}
