//! Application state and its reducer.
//!
//! `AppState::apply` is the only place state changes. It never performs I/O;
//! work that must happen as a consequence of an event is returned as
//! [`Effect`]s for the caller to run, and their outcomes come back as events.

use std::collections::{HashMap, HashSet};

use shared::{
    domain::{
        Address, DraftSession, FilterState, NewSession, OpenFilter, Session, SessionId,
        VotedFilter,
    },
    error::ErrorKind,
    protocol::{ActionKind, SessionAction, TxHash},
};
use tracing::{debug, warn};

use crate::error::ClientError;

pub const CONNECTED_MESSAGE: &str = "Connected!";
pub const NO_WALLET_MESSAGE: &str = "No wallet provider detected.";
pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect to the wallet.";
pub const FETCH_FAILED_MESSAGE: &str = "Unable to fetch the session list.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected { account: Address },
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
}

/// Identifies an action for duplicate-submission tracking: one slot per
/// kind, scoped to a session where the action targets one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionSlot {
    pub kind: ActionKind,
    pub session_id: Option<SessionId>,
}

impl ActionSlot {
    pub fn of(action: &SessionAction) -> Self {
        Self {
            kind: action.kind(),
            session_id: action.session_id(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Connected { account: Address },
    ConnectFailed { error: ClientError },
    RefreshRequested,
    SessionsFetched { generation: u64, sessions: Vec<Session> },
    FetchFailed { generation: u64, error: ClientError },
    OpenFilterChanged(OpenFilter),
    VotedFilterChanged(VotedFilter),
    SearchChanged(String),
    ToggleExpanded(SessionId),
    CreateFormOpened,
    CreateFormCancelled,
    DraftTitleChanged(String),
    DraftProposalInputChanged(String),
    DraftProposalAdded,
    DraftProposalRemoved(usize),
    DraftSubmitted,
    VoteRequested { session_id: SessionId, proposal_index: usize },
    CloseRequested { session_id: SessionId },
    ActionSubmitted { action: SessionAction, hash: TxHash },
    ActionConfirmed { action: SessionAction },
    ActionFailed { action: SessionAction, error: ClientError },
    NotificationDismissed(u64),
    /// Some action outcomes may have been lost; forget pending actions and
    /// reload the list from the contract.
    ResyncRequested,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchSessions { generation: u64 },
    Submit(SessionAction),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub connection: ConnectionStatus,
    pub sessions: Vec<Session>,
    pub loading: bool,
    pub filter: FilterState,
    pub expanded: HashSet<SessionId>,
    pub draft: Option<DraftSession>,
    pub notifications: Vec<Notification>,
    latest_generation: u64,
    in_flight: HashMap<ActionSlot, Option<u64>>,
    next_notification_id: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            connection: ConnectionStatus::Connecting,
            sessions: Vec::new(),
            loading: false,
            filter: FilterState::default(),
            expanded: HashSet::new(),
            draft: None,
            notifications: Vec::new(),
            latest_generation: 0,
            in_flight: HashMap::new(),
            next_notification_id: 1,
        }
    }
}

impl AppState {
    pub fn account(&self) -> Option<Address> {
        match &self.connection {
            ConnectionStatus::Connected { account } => Some(*account),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.account().is_some()
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest_generation
    }

    pub fn is_in_flight(&self, slot: ActionSlot) -> bool {
        self.in_flight.contains_key(&slot)
    }

    pub fn session(&self, session_id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|session| session.id == session_id)
    }

    pub fn apply(&mut self, event: AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::Connected { account } => {
                self.connection = ConnectionStatus::Connected { account };
                self.notify(NotificationLevel::Success, CONNECTED_MESSAGE);
                self.request_fetch()
            }
            AppEvent::ConnectFailed { error } => {
                let message = match error.kind {
                    ErrorKind::WalletUnavailable => NO_WALLET_MESSAGE,
                    _ => CONNECT_FAILED_MESSAGE,
                };
                self.connection = ConnectionStatus::Failed {
                    message: message.to_string(),
                };
                self.notify(NotificationLevel::Error, message);
                Vec::new()
            }
            AppEvent::RefreshRequested => self.request_fetch(),
            AppEvent::SessionsFetched {
                generation,
                sessions,
            } => {
                if generation != self.latest_generation {
                    debug!(generation, latest = self.latest_generation, "discarding stale fetch");
                    return Vec::new();
                }
                self.sessions = sessions;
                self.loading = false;
                Vec::new()
            }
            AppEvent::FetchFailed { generation, error } => {
                warn!(generation, error = %error, "session fetch failed");
                if generation == self.latest_generation {
                    self.loading = false;
                }
                self.notify(NotificationLevel::Error, FETCH_FAILED_MESSAGE);
                Vec::new()
            }
            AppEvent::OpenFilterChanged(open) => {
                self.filter.open = open;
                Vec::new()
            }
            AppEvent::VotedFilterChanged(voted) => {
                self.filter.voted = voted;
                Vec::new()
            }
            AppEvent::SearchChanged(search) => {
                self.filter.search = search;
                Vec::new()
            }
            AppEvent::ToggleExpanded(session_id) => {
                if !self.expanded.remove(&session_id) {
                    self.expanded.insert(session_id);
                }
                Vec::new()
            }
            AppEvent::CreateFormOpened => {
                self.draft.get_or_insert_with(DraftSession::default);
                Vec::new()
            }
            AppEvent::CreateFormCancelled => {
                self.draft = None;
                Vec::new()
            }
            AppEvent::DraftTitleChanged(title) => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.title = title;
                }
                Vec::new()
            }
            AppEvent::DraftProposalInputChanged(input) => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.proposal_input = input;
                }
                Vec::new()
            }
            AppEvent::DraftProposalAdded => {
                let added = self.draft.as_mut().map(DraftSession::add_proposal);
                if let Some(Err(err)) = added {
                    self.notify(NotificationLevel::Error, err.to_string());
                }
                Vec::new()
            }
            AppEvent::DraftProposalRemoved(index) => {
                if let Some(draft) = self.draft.as_mut() {
                    draft.remove_proposal(index);
                }
                Vec::new()
            }
            AppEvent::DraftSubmitted => self.submit_draft(),
            AppEvent::VoteRequested {
                session_id,
                proposal_index,
            } => {
                let exists = self
                    .session(session_id)
                    .is_some_and(|session| proposal_index < session.proposals.len());
                if !exists {
                    return Vec::new();
                }
                self.begin(SessionAction::Vote {
                    session_id,
                    proposal_index,
                })
            }
            AppEvent::CloseRequested { session_id } => {
                if self.session(session_id).is_none() {
                    return Vec::new();
                }
                self.begin(SessionAction::Close { session_id })
            }
            AppEvent::ActionSubmitted { action, hash } => {
                debug!(kind = ?action.kind(), %hash, "action submitted");
                let slot = ActionSlot::of(&action);
                if self.in_flight.contains_key(&slot) {
                    let id = self.notify(NotificationLevel::Pending, action.pending_message());
                    self.in_flight.insert(slot, Some(id));
                }
                Vec::new()
            }
            AppEvent::ActionConfirmed { action } => {
                self.finish(&action);
                self.notify(NotificationLevel::Success, action.success_message());
                if let SessionAction::Create(created) = &action {
                    self.discard_draft_matching(created);
                }
                self.request_fetch()
            }
            AppEvent::ActionFailed { action, error } => {
                warn!(kind = ?action.kind(), error = %error, "action failed");
                self.finish(&action);
                let message = match error.kind {
                    ErrorKind::Validation => error.message,
                    _ => action.failure_message().to_string(),
                };
                self.notify(NotificationLevel::Error, message);
                Vec::new()
            }
            AppEvent::NotificationDismissed(id) => {
                self.notifications.retain(|notification| notification.id != id);
                Vec::new()
            }
            AppEvent::ResyncRequested => {
                if !self.in_flight.is_empty() {
                    warn!(count = self.in_flight.len(), "releasing actions with unknown outcome");
                }
                let pending: Vec<u64> = self.in_flight.drain().filter_map(|(_, id)| id).collect();
                self.notifications
                    .retain(|notification| !pending.contains(&notification.id));
                self.request_fetch()
            }
        }
    }

    fn request_fetch(&mut self) -> Vec<Effect> {
        if !self.is_connected() {
            return Vec::new();
        }
        self.latest_generation += 1;
        self.loading = true;
        vec![Effect::FetchSessions {
            generation: self.latest_generation,
        }]
    }

    fn submit_draft(&mut self) -> Vec<Effect> {
        let Some(draft) = self.draft.as_ref() else {
            return Vec::new();
        };
        match draft.validate() {
            Ok(session) => self.begin(SessionAction::Create(session)),
            Err(err) => {
                self.notify(NotificationLevel::Error, err.to_string());
                Vec::new()
            }
        }
    }

    /// Marks `action` in flight and emits it, unless the client is not
    /// connected or the same action is already pending.
    fn begin(&mut self, action: SessionAction) -> Vec<Effect> {
        if !self.is_connected() {
            return Vec::new();
        }
        let slot = ActionSlot::of(&action);
        if self.in_flight.contains_key(&slot) {
            debug!(?slot, "action already in flight");
            return Vec::new();
        }
        self.in_flight.insert(slot, None);
        vec![Effect::Submit(action)]
    }

    /// Drops the open draft only when it is the one that was just created;
    /// a draft started after that submission is kept.
    fn discard_draft_matching(&mut self, created: &NewSession) {
        let submitted = self
            .draft
            .as_ref()
            .is_some_and(|draft| draft.validate().as_ref() == Ok(created));
        if submitted {
            self.draft = None;
        }
    }

    fn finish(&mut self, action: &SessionAction) {
        if let Some(Some(pending_id)) = self.in_flight.remove(&ActionSlot::of(action)) {
            self.notifications
                .retain(|notification| notification.id != pending_id);
        }
    }

    fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) -> u64 {
        let id = self.next_notification_id;
        self.next_notification_id += 1;
        self.notifications.push(Notification {
            id,
            level,
            message: message.into(),
        });
        id
    }
}
