use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::{
    domain::{Address, NewSession, SessionId, SessionSummary},
    protocol::{TxHash, TxReceipt},
};
use tracing::{debug, warn};

use crate::{
    abi::{self, ParamType, Token},
    error::{AbiError, ContractError},
    wallet::{CallRequest, WalletProvider},
};

pub const GET_ALL_SESSIONS: &str = "getAllSessions()";
pub const GET_PROPOSAL_VOTES: &str = "getProposalVotes(uint256,uint256)";
pub const CREATE_SESSION: &str = "createSession(string,string[])";
pub const VOTE: &str = "vote(uint256,uint256)";
pub const CLOSE_SESSION: &str = "closeSession(uint256)";

pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// The voting contract's remote interface, bound to one account.
#[async_trait]
pub trait VotingContract: Send + Sync {
    async fn get_all_sessions(&self) -> Result<Vec<SessionSummary>, ContractError>;
    async fn get_proposal_votes(
        &self,
        session_id: SessionId,
        proposal_index: usize,
    ) -> Result<u64, ContractError>;
    async fn create_session(&self, session: &NewSession) -> Result<TxHash, ContractError>;
    async fn vote(
        &self,
        session_id: SessionId,
        proposal_index: usize,
    ) -> Result<TxHash, ContractError>;
    async fn close_session(&self, session_id: SessionId) -> Result<TxHash, ContractError>;
    /// Resolves once the transaction is mined. There is no timeout.
    async fn wait_for_confirmation(&self, hash: TxHash) -> Result<TxReceipt, ContractError>;
}

pub struct BoundVotingContract {
    wallet: Arc<dyn WalletProvider>,
    address: Address,
    account: Address,
    poll_interval: Duration,
}

impl BoundVotingContract {
    pub fn new(wallet: Arc<dyn WalletProvider>, address: Address, account: Address) -> Self {
        Self {
            wallet,
            address,
            account,
            poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn account(&self) -> Address {
        self.account
    }

    fn request(&self, data: Vec<u8>) -> CallRequest {
        CallRequest {
            from: self.account,
            to: self.address,
            data,
        }
    }

    async fn transact(&self, signature: &str, args: &[Token]) -> Result<TxHash, ContractError> {
        let request = self.request(abi::encode_call(signature, args));
        let hash = self.wallet.send_transaction(&request).await?;
        debug!(%hash, signature, "transaction submitted");
        Ok(hash)
    }
}

#[async_trait]
impl VotingContract for BoundVotingContract {
    async fn get_all_sessions(&self) -> Result<Vec<SessionSummary>, ContractError> {
        let data = self
            .wallet
            .call(&self.request(abi::encode_call(GET_ALL_SESSIONS, &[])))
            .await?;
        Ok(decode_session_summaries(&data)?)
    }

    async fn get_proposal_votes(
        &self,
        session_id: SessionId,
        proposal_index: usize,
    ) -> Result<u64, ContractError> {
        let data = self
            .wallet
            .call(&self.request(abi::encode_call(
                GET_PROPOSAL_VOTES,
                &[Token::uint(session_id.0), Token::uint(proposal_index as u64)],
            )))
            .await?;
        let mut tokens = abi::decode(&[ParamType::Uint], &data)?;
        Ok(tokens
            .pop()
            .ok_or(AbiError::UnexpectedToken { expected: "uint" })?
            .into_u64()?)
    }

    async fn create_session(&self, session: &NewSession) -> Result<TxHash, ContractError> {
        let proposals = session.proposals.iter().map(Token::string).collect();
        self.transact(
            CREATE_SESSION,
            &[Token::string(&session.title), Token::Array(proposals)],
        )
        .await
    }

    async fn vote(
        &self,
        session_id: SessionId,
        proposal_index: usize,
    ) -> Result<TxHash, ContractError> {
        self.transact(
            VOTE,
            &[Token::uint(session_id.0), Token::uint(proposal_index as u64)],
        )
        .await
    }

    async fn close_session(&self, session_id: SessionId) -> Result<TxHash, ContractError> {
        self.transact(CLOSE_SESSION, &[Token::uint(session_id.0)])
            .await
    }

    async fn wait_for_confirmation(&self, hash: TxHash) -> Result<TxReceipt, ContractError> {
        loop {
            if let Some(receipt) = self.wallet.transaction_receipt(hash).await? {
                if !receipt.succeeded {
                    warn!(%hash, "transaction reverted");
                    return Err(ContractError::Reverted { hash });
                }
                return Ok(receipt);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

fn session_row_type() -> ParamType {
    ParamType::Tuple(vec![
        ParamType::Uint,
        ParamType::Address,
        ParamType::String,
        ParamType::Bool,
        ParamType::Array(Box::new(ParamType::String)),
        ParamType::Bool,
        ParamType::Int,
    ])
}

/// Decodes the `getAllSessions` return data into typed records.
pub fn decode_session_summaries(data: &[u8]) -> Result<Vec<SessionSummary>, AbiError> {
    let mut tokens = abi::decode(&[ParamType::Array(Box::new(session_row_type()))], data)?;
    let rows = tokens
        .pop()
        .ok_or(AbiError::UnexpectedToken { expected: "array" })?
        .into_array()?;
    rows.into_iter().map(decode_session_row).collect()
}

fn decode_session_row(row: Token) -> Result<SessionSummary, AbiError> {
    let mut fields = row.into_tuple()?.into_iter();
    let mut next = || fields.next().ok_or(AbiError::UnexpectedToken { expected: "session field" });

    let id = next()?.into_u64()?;
    let owner = next()?.into_address()?;
    let title = next()?.into_string()?;
    let is_open = next()?.into_bool()?;
    let proposals = next()?
        .into_array()?
        .into_iter()
        .map(Token::into_string)
        .collect::<Result<Vec<_>, _>>()?;
    let has_voted = next()?.into_bool()?;
    let raw_index = next()?.into_i64()?;

    let voted_index = match raw_index {
        -1 => None,
        value if value >= 0 && (value as u64) < proposals.len() as u64 => Some(value as usize),
        value => {
            return Err(AbiError::InvalidVotedIndex {
                session_id: id,
                value,
            })
        }
    };

    Ok(SessionSummary {
        id: SessionId(id),
        owner,
        title,
        is_open,
        proposals,
        has_voted,
        voted_index,
    })
}

/// Encodes session records the way the contract returns them.
pub fn encode_session_summaries(sessions: &[SessionSummary]) -> Vec<u8> {
    let rows = sessions
        .iter()
        .map(|session| {
            Token::Tuple(vec![
                Token::uint(session.id.0),
                Token::Address(session.owner),
                Token::string(&session.title),
                Token::Bool(session.is_open),
                Token::Array(session.proposals.iter().map(Token::string).collect()),
                Token::Bool(session.has_voted),
                Token::int(session.voted_index.map_or(-1, |index| index as i64)),
            ])
        })
        .collect();
    abi::encode(&[Token::Array(rows)])
}
