use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{FilterParseError, SessionShapeError, ValidationError};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(SessionId);

hex_bytes_newtype!(Address, 20);

/// A session as returned by the contract, before vote counts are attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub owner: Address,
    pub title: String,
    pub is_open: bool,
    pub proposals: Vec<String>,
    pub has_voted: bool,
    pub voted_index: Option<usize>,
}

impl SessionSummary {
    /// Attaches per-proposal vote counts, enforcing one count per proposal.
    pub fn with_vote_counts(self, vote_counts: Vec<u64>) -> Result<Session, SessionShapeError> {
        if vote_counts.len() != self.proposals.len() {
            return Err(SessionShapeError::VoteCountMismatch {
                session_id: self.id.0,
                expected: self.proposals.len(),
                actual: vote_counts.len(),
            });
        }
        if let Some(index) = self.voted_index {
            if index >= self.proposals.len() {
                return Err(SessionShapeError::VotedIndexOutOfRange {
                    session_id: self.id.0,
                    index,
                    len: self.proposals.len(),
                });
            }
        }

        Ok(Session {
            id: self.id,
            owner: self.owner,
            title: self.title,
            is_open: self.is_open,
            proposals: self.proposals,
            has_voted: self.has_voted,
            voted_index: self.voted_index,
            vote_counts,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub owner: Address,
    pub title: String,
    pub is_open: bool,
    pub proposals: Vec<String>,
    pub has_voted: bool,
    pub voted_index: Option<usize>,
    pub vote_counts: Vec<u64>,
}

impl Session {
    /// Address comparison is on raw bytes, so hex casing never matters.
    pub fn is_owned_by(&self, account: &Address) -> bool {
        self.owner == *account
    }

    pub fn voted_proposal(&self) -> Option<&str> {
        if !self.has_voted {
            return None;
        }
        self.voted_index
            .and_then(|index| self.proposals.get(index))
            .map(String::as_str)
    }

    pub fn vote_count(&self, index: usize) -> Option<u64> {
        self.vote_counts.get(index).copied()
    }
}

/// Validated payload for `createSession`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSession {
    pub title: String,
    pub proposals: Vec<String>,
}

impl NewSession {
    pub fn new(title: &str, proposals: &[String]) -> Result<Self, ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if proposals.is_empty() {
            return Err(ValidationError::NoProposals);
        }
        if proposals.iter().any(|proposal| proposal.trim().is_empty()) {
            return Err(ValidationError::EmptyProposal);
        }

        Ok(Self {
            title: title.to_string(),
            proposals: proposals.to_vec(),
        })
    }
}

/// Session being composed in the creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftSession {
    pub title: String,
    pub proposal_input: String,
    pub proposals: Vec<String>,
}

impl DraftSession {
    pub fn add_proposal(&mut self) -> Result<(), ValidationError> {
        let trimmed = self.proposal_input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyProposal);
        }
        self.proposals.push(trimmed.to_string());
        self.proposal_input.clear();
        Ok(())
    }

    pub fn remove_proposal(&mut self, index: usize) -> Option<String> {
        (index < self.proposals.len()).then(|| self.proposals.remove(index))
    }

    pub fn validate(&self) -> Result<NewSession, ValidationError> {
        NewSession::new(&self.title, &self.proposals)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl OpenFilter {
    pub const VARIANTS: [Self; 3] = [Self::All, Self::Open, Self::Closed];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Open => "Open",
            Self::Closed => "Closed",
        }
    }
}

impl FromStr for OpenFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(FilterParseError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VotedFilter {
    #[default]
    All,
    Voted,
    NotVoted,
}

impl VotedFilter {
    pub const VARIANTS: [Self; 3] = [Self::All, Self::Voted, Self::NotVoted];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Voted => "Voted",
            Self::NotVoted => "Not voted",
        }
    }
}

impl FromStr for VotedFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "voted" => Ok(Self::Voted),
            "not_voted" | "not-voted" | "notvoted" => Ok(Self::NotVoted),
            other => Err(FilterParseError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub open: OpenFilter,
    pub voted: VotedFilter,
    pub search: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(proposals: &[&str], voted_index: Option<usize>) -> SessionSummary {
        SessionSummary {
            id: SessionId(4),
            owner: Address::default(),
            title: "Budget".into(),
            is_open: true,
            proposals: proposals.iter().map(|p| p.to_string()).collect(),
            has_voted: voted_index.is_some(),
            voted_index,
        }
    }

    #[test]
    fn address_parsing_ignores_hex_case() {
        let lower: Address = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
            .parse()
            .expect("lower");
        let mixed: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
            .parse()
            .expect("mixed");
        assert_eq!(lower, mixed);
        assert_eq!(
            mixed.to_string(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn address_parsing_rejects_short_input() {
        let err = "0x1234".parse::<Address>().expect_err("too short");
        assert!(matches!(
            err,
            crate::error::HexParseError::Length {
                expected: 40,
                actual: 4
            }
        ));
    }

    #[test]
    fn address_round_trips_through_json() {
        let address: Address = "0x5fbdb2315678afecb367f032d93f642f64180aa3"
            .parse()
            .expect("address");
        let json = serde_json::to_string(&address).expect("serialize");
        assert_eq!(json, "\"0x5fbdb2315678afecb367f032d93f642f64180aa3\"");
        let back: Address = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, address);
    }

    #[test]
    fn vote_counts_must_match_proposals() {
        let err = summary(&["A", "B"], None)
            .with_vote_counts(vec![1])
            .expect_err("mismatch");
        assert_eq!(
            err,
            SessionShapeError::VoteCountMismatch {
                session_id: 4,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn voted_index_must_address_a_proposal() {
        let err = summary(&["A"], Some(3))
            .with_vote_counts(vec![0])
            .expect_err("out of range");
        assert!(matches!(
            err,
            SessionShapeError::VotedIndexOutOfRange { index: 3, .. }
        ));
    }

    #[test]
    fn voted_proposal_names_the_chosen_option() {
        let session = summary(&["A", "B"], Some(1))
            .with_vote_counts(vec![2, 5])
            .expect("session");
        assert_eq!(session.voted_proposal(), Some("B"));
        assert_eq!(session.vote_count(1), Some(5));
        assert_eq!(session.vote_count(2), None);
    }

    #[test]
    fn draft_trims_and_rejects_blank_proposals() {
        let mut draft = DraftSession::default();
        draft.proposal_input = "   ".into();
        assert_eq!(draft.add_proposal(), Err(ValidationError::EmptyProposal));

        draft.proposal_input = "  Option A ".into();
        draft.add_proposal().expect("add");
        assert_eq!(draft.proposals, vec!["Option A".to_string()]);
        assert!(draft.proposal_input.is_empty());
    }

    #[test]
    fn draft_remove_ignores_unknown_index() {
        let mut draft = DraftSession {
            proposals: vec!["A".into(), "B".into()],
            ..DraftSession::default()
        };
        assert_eq!(draft.remove_proposal(5), None);
        assert_eq!(draft.remove_proposal(0), Some("A".into()));
        assert_eq!(draft.proposals, vec!["B".to_string()]);
    }

    #[test]
    fn new_session_requires_title_and_proposals() {
        assert_eq!(
            NewSession::new("", &["A".to_string()]),
            Err(ValidationError::EmptyTitle)
        );
        assert_eq!(
            NewSession::new("Budget", &[]),
            Err(ValidationError::NoProposals)
        );
        let created = NewSession::new("  Budget ", &["A".to_string()]).expect("valid");
        assert_eq!(created.title, "  Budget ");
    }

    #[test]
    fn filters_parse_from_cli_spellings() {
        assert_eq!("CLOSED".parse::<OpenFilter>(), Ok(OpenFilter::Closed));
        assert_eq!("not-voted".parse::<VotedFilter>(), Ok(VotedFilter::NotVoted));
        assert!("maybe".parse::<OpenFilter>().is_err());
    }
}
