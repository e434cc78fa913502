//! Session list filtering. All predicates are pure and compose by
//! conjunction, so the order they are applied in does not matter.

use shared::domain::{FilterState, OpenFilter, Session, VotedFilter};

pub fn matches_open(filter: OpenFilter, session: &Session) -> bool {
    match filter {
        OpenFilter::All => true,
        OpenFilter::Open => session.is_open,
        OpenFilter::Closed => !session.is_open,
    }
}

pub fn matches_voted(filter: VotedFilter, session: &Session) -> bool {
    match filter {
        VotedFilter::All => true,
        VotedFilter::Voted => session.has_voted,
        VotedFilter::NotVoted => !session.has_voted,
    }
}

/// Case-insensitive substring match against the title or any proposal.
/// A blank search matches everything; otherwise the term is used as typed.
pub fn matches_search(search: &str, session: &Session) -> bool {
    if search.trim().is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    session.title.to_lowercase().contains(&needle)
        || session
            .proposals
            .iter()
            .any(|proposal| proposal.to_lowercase().contains(&needle))
}

pub fn matches(filter: &FilterState, session: &Session) -> bool {
    matches_open(filter.open, session)
        && matches_voted(filter.voted, session)
        && matches_search(&filter.search, session)
}

pub fn filter_sessions<'a>(sessions: &'a [Session], filter: &FilterState) -> Vec<&'a Session> {
    sessions
        .iter()
        .filter(|session| matches(filter, session))
        .collect()
}
