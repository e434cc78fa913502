use std::sync::Arc;

use contract_client::VotingContract;
use futures::future::try_join_all;
use shared::domain::{Session, SessionSummary};
use tracing::debug;

use crate::error::ClientError;

/// Read side: sessions enriched with per-proposal vote counts.
#[derive(Clone)]
pub struct SessionRepository {
    contract: Arc<dyn VotingContract>,
}

impl SessionRepository {
    pub fn new(contract: Arc<dyn VotingContract>) -> Self {
        Self { contract }
    }

    /// Returns every session, newest first, with its vote counts.
    ///
    /// Sessions are enriched concurrently; proposals within a session are
    /// read one at a time. Any failed read fails the whole fetch.
    pub async fn fetch_sessions(&self) -> Result<Vec<Session>, ClientError> {
        let mut summaries = self
            .contract
            .get_all_sessions()
            .await
            .map_err(ClientError::read)?;
        sort_newest_first(&mut summaries);
        debug!(count = summaries.len(), "sessions listed");

        try_join_all(summaries.into_iter().map(|summary| self.enrich(summary))).await
    }

    async fn enrich(&self, summary: SessionSummary) -> Result<Session, ClientError> {
        let mut vote_counts = Vec::with_capacity(summary.proposals.len());
        for index in 0..summary.proposals.len() {
            let votes = self
                .contract
                .get_proposal_votes(summary.id, index)
                .await
                .map_err(ClientError::read)?;
            vote_counts.push(votes);
        }
        Ok(summary.with_vote_counts(vote_counts)?)
    }
}

pub fn sort_newest_first(sessions: &mut [SessionSummary]) {
    sessions.sort_by(|a, b| b.id.cmp(&a.id));
}
