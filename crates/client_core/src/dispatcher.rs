use std::sync::Arc;

use contract_client::VotingContract;
use shared::{
    domain::NewSession,
    protocol::{SessionAction, TxHash, TxReceipt},
};
use tracing::{info, warn};

use crate::error::ClientError;

/// Write side: submits state-changing calls and waits for them to be mined.
#[derive(Clone)]
pub struct ActionDispatcher {
    contract: Arc<dyn VotingContract>,
}

impl ActionDispatcher {
    pub fn new(contract: Arc<dyn VotingContract>) -> Self {
        Self { contract }
    }

    /// Validates locally where possible, then submits. Returns once the
    /// wallet has accepted the transaction.
    pub async fn submit(&self, action: &SessionAction) -> Result<TxHash, ClientError> {
        let submitted = match action {
            SessionAction::Create(session) => {
                let session = NewSession::new(&session.title, &session.proposals)?;
                self.contract.create_session(&session).await
            }
            SessionAction::Vote {
                session_id,
                proposal_index,
            } => self.contract.vote(*session_id, *proposal_index).await,
            SessionAction::Close { session_id } => self.contract.close_session(*session_id).await,
        };
        let hash = submitted.map_err(|err| {
            warn!(kind = ?action.kind(), error = %err, "submission failed");
            ClientError::write(err)
        })?;
        info!(kind = ?action.kind(), %hash, "transaction submitted");
        Ok(hash)
    }

    pub async fn confirm(&self, hash: TxHash) -> Result<TxReceipt, ClientError> {
        let receipt = self
            .contract
            .wait_for_confirmation(hash)
            .await
            .map_err(|err| {
                warn!(%hash, error = %err, "transaction failed");
                ClientError::write(err)
            })?;
        info!(%hash, block = ?receipt.block_number, "transaction confirmed");
        Ok(receipt)
    }
}
