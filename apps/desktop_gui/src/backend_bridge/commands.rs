//! Backend commands queued from UI to backend worker.

use client_core::Effect;
use shared::protocol::SessionAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Connect,
    FetchSessions { generation: u64 },
    Submit(SessionAction),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::FetchSessions { .. } => "fetch_sessions",
            Self::Submit(_) => "submit",
        }
    }
}

impl From<Effect> for BackendCommand {
    fn from(effect: Effect) -> Self {
        match effect {
            Effect::FetchSessions { generation } => Self::FetchSessions { generation },
            Effect::Submit(action) => Self::Submit(action),
        }
    }
}
