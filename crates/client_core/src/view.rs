//! Presentation view-model derived from [`AppState`]. Front ends render
//! these rows and never re-derive the visibility rules themselves.

use shared::{
    domain::{Address, Session, SessionId},
    protocol::ActionKind,
};

use crate::{
    filter::filter_sessions,
    state::{ActionSlot, AppState},
};

/// Whether the viewer may cast a vote in `session`.
pub fn can_vote(session: &Session) -> bool {
    session.is_open && !session.has_voted
}

/// Counts are public once a session is closed. While it is open only the
/// owner sees them, and only after voting.
pub fn shows_vote_counts(session: &Session, viewer: Option<&Address>) -> bool {
    !session.is_open || (is_owner(session, viewer) && session.has_voted)
}

pub fn can_close(session: &Session, viewer: Option<&Address>) -> bool {
    session.is_open && is_owner(session, viewer)
}

fn is_owner(session: &Session, viewer: Option<&Address>) -> bool {
    viewer.is_some_and(|account| session.is_owned_by(account))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalRow {
    pub index: usize,
    pub text: String,
    /// `None` when counts are hidden from this viewer.
    pub votes: Option<u64>,
    pub is_viewer_choice: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCard {
    pub id: SessionId,
    pub title: String,
    pub owner: Address,
    pub is_open: bool,
    pub has_voted: bool,
    pub expanded: bool,
    pub voted_proposal: Option<String>,
    pub proposals: Vec<ProposalRow>,
    pub vote_offered: bool,
    pub vote_pending: bool,
    pub close_offered: bool,
    pub close_pending: bool,
}

impl SessionCard {
    pub fn build(state: &AppState, session: &Session) -> Self {
        let viewer = state.account();
        let viewer = viewer.as_ref();
        let show_votes = shows_vote_counts(session, viewer);
        let proposals = session
            .proposals
            .iter()
            .enumerate()
            .map(|(index, text)| ProposalRow {
                index,
                text: text.clone(),
                votes: show_votes.then(|| session.vote_count(index)).flatten(),
                is_viewer_choice: session.voted_index == Some(index),
            })
            .collect();

        Self {
            id: session.id,
            title: session.title.clone(),
            owner: session.owner,
            is_open: session.is_open,
            has_voted: session.has_voted,
            expanded: state.expanded.contains(&session.id),
            voted_proposal: session.voted_proposal().map(str::to_string),
            proposals,
            vote_offered: can_vote(session),
            vote_pending: state.is_in_flight(ActionSlot {
                kind: ActionKind::Vote,
                session_id: Some(session.id),
            }),
            close_offered: can_close(session, viewer),
            close_pending: state.is_in_flight(ActionSlot {
                kind: ActionKind::Close,
                session_id: Some(session.id),
            }),
        }
    }

    /// Vote controls are shown when offered and clickable when not pending.
    pub fn vote_enabled(&self) -> bool {
        self.vote_offered && !self.vote_pending
    }

    pub fn close_enabled(&self) -> bool {
        self.close_offered && !self.close_pending
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionListView {
    pub cards: Vec<SessionCard>,
    pub loading: bool,
    pub create_pending: bool,
}

impl SessionListView {
    pub fn count(&self) -> usize {
        self.cards.len()
    }

    /// True when nothing matches and no fetch is outstanding.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && !self.loading
    }
}

impl AppState {
    pub fn view(&self) -> SessionListView {
        SessionListView {
            cards: filter_sessions(&self.sessions, &self.filter)
                .into_iter()
                .map(|session| SessionCard::build(self, session))
                .collect(),
            loading: self.loading,
            create_pending: self.is_in_flight(ActionSlot {
                kind: ActionKind::Create,
                session_id: None,
            }),
        }
    }
}
