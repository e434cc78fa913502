//! In-memory stand-ins for the contract and wallet.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use contract_client::{
    CallRequest, ContractError, VotingContract, WalletError, WalletProvider,
};
use shared::{
    domain::{Address, NewSession, Session, SessionId, SessionSummary},
    protocol::{SessionAction, TxHash, TxReceipt},
};

use crate::{config::Settings, connector::Connection};

pub fn account() -> Address {
    Address([0x11; 20])
}

pub fn other_account() -> Address {
    Address([0x22; 20])
}

pub fn settings() -> Settings {
    Settings {
        rpc_url: "http://127.0.0.1:8545".parse().expect("url"),
        contract_address: Address([0xcc; 20]),
        receipt_poll_interval_ms: 5,
        log_filter: "info".into(),
    }
}

pub fn session(id: u64, owner: Address, proposals: &[&str], counts: &[u64]) -> Session {
    Session {
        id: SessionId(id),
        owner,
        title: format!("Session {id}"),
        is_open: true,
        proposals: proposals.iter().map(|p| p.to_string()).collect(),
        has_voted: false,
        voted_index: None,
        vote_counts: counts.to_vec(),
    }
}

fn summary(session: &Session) -> SessionSummary {
    SessionSummary {
        id: session.id,
        owner: session.owner,
        title: session.title.clone(),
        is_open: session.is_open,
        proposals: session.proposals.clone(),
        has_voted: session.has_voted,
        voted_index: session.voted_index,
    }
}

fn unavailable() -> ContractError {
    ContractError::Wallet(WalletError::Unavailable("node down".into()))
}

/// Contract double whose writes take effect immediately and count calls.
#[derive(Default)]
pub struct FakeContract {
    pub sessions: Mutex<Vec<Session>>,
    pub submitted: Mutex<Vec<SessionAction>>,
    pub list_calls: AtomicUsize,
    pub vote_reads: AtomicUsize,
    pub fail_listing: AtomicBool,
    pub fail_votes_for: Mutex<Option<SessionId>>,
    pub revert: AtomicBool,
}

impl FakeContract {
    pub fn with_sessions(sessions: Vec<Session>) -> Arc<Self> {
        let contract = Self::default();
        *contract.sessions.lock().expect("sessions") = sessions;
        Arc::new(contract)
    }

    pub fn connection(self: &Arc<Self>) -> Connection {
        Connection {
            account: account(),
            contract: self.clone(),
        }
    }

    fn record(&self, action: SessionAction) -> TxHash {
        let mut submitted = self.submitted.lock().expect("submitted");
        submitted.push(action);
        TxHash([submitted.len() as u8; 32])
    }
}

#[async_trait]
impl VotingContract for FakeContract {
    async fn get_all_sessions(&self) -> Result<Vec<SessionSummary>, ContractError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self
            .sessions
            .lock()
            .expect("sessions")
            .iter()
            .map(summary)
            .collect())
    }

    async fn get_proposal_votes(
        &self,
        session_id: SessionId,
        proposal_index: usize,
    ) -> Result<u64, ContractError> {
        self.vote_reads.fetch_add(1, Ordering::SeqCst);
        if *self.fail_votes_for.lock().expect("fail") == Some(session_id) {
            return Err(unavailable());
        }
        let sessions = self.sessions.lock().expect("sessions");
        Ok(sessions
            .iter()
            .find(|session| session.id == session_id)
            .and_then(|session| session.vote_count(proposal_index))
            .unwrap_or_default())
    }

    async fn create_session(&self, new_session: &NewSession) -> Result<TxHash, ContractError> {
        {
            let mut sessions = self.sessions.lock().expect("sessions");
            let next_id = sessions.iter().map(|s| s.id.0).max().unwrap_or(0) + 1;
            sessions.push(Session {
                id: SessionId(next_id),
                owner: account(),
                title: new_session.title.clone(),
                is_open: true,
                proposals: new_session.proposals.clone(),
                has_voted: false,
                voted_index: None,
                vote_counts: vec![0; new_session.proposals.len()],
            });
        }
        Ok(self.record(SessionAction::Create(new_session.clone())))
    }

    async fn vote(
        &self,
        session_id: SessionId,
        proposal_index: usize,
    ) -> Result<TxHash, ContractError> {
        {
            let mut sessions = self.sessions.lock().expect("sessions");
            if let Some(session) = sessions.iter_mut().find(|s| s.id == session_id) {
                session.has_voted = true;
                session.voted_index = Some(proposal_index);
                session.vote_counts[proposal_index] += 1;
            }
        }
        Ok(self.record(SessionAction::Vote {
            session_id,
            proposal_index,
        }))
    }

    async fn close_session(&self, session_id: SessionId) -> Result<TxHash, ContractError> {
        {
            let mut sessions = self.sessions.lock().expect("sessions");
            if let Some(session) = sessions.iter_mut().find(|s| s.id == session_id) {
                session.is_open = false;
            }
        }
        Ok(self.record(SessionAction::Close { session_id }))
    }

    async fn wait_for_confirmation(&self, hash: TxHash) -> Result<TxReceipt, ContractError> {
        if self.revert.load(Ordering::SeqCst) {
            return Err(ContractError::Reverted { hash });
        }
        Ok(TxReceipt {
            transaction_hash: hash,
            block_number: Some(1),
            succeeded: true,
        })
    }
}

/// Wallet double that only answers account requests.
pub struct FakeWallet {
    pub accounts: Result<Vec<Address>, WalletError>,
    pub account_requests: AtomicUsize,
}

impl FakeWallet {
    pub fn authorizing(accounts: Vec<Address>) -> Arc<Self> {
        Arc::new(Self {
            accounts: Ok(accounts),
            account_requests: AtomicUsize::new(0),
        })
    }

    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            accounts: Err(WalletError::Rejected {
                code: 4001,
                message: "user rejected request".into(),
            }),
            account_requests: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.account_requests.fetch_add(1, Ordering::SeqCst);
        match &self.accounts {
            Ok(accounts) => Ok(accounts.clone()),
            Err(WalletError::Rejected { code, message }) => Err(WalletError::Rejected {
                code: *code,
                message: message.clone(),
            }),
            Err(_) => Err(WalletError::NoAccounts),
        }
    }

    async fn call(&self, _request: &CallRequest) -> Result<Vec<u8>, WalletError> {
        Err(WalletError::Unavailable("calls not supported".into()))
    }

    async fn send_transaction(&self, _request: &CallRequest) -> Result<TxHash, WalletError> {
        Err(WalletError::Unavailable("transactions not supported".into()))
    }

    async fn transaction_receipt(&self, _hash: TxHash) -> Result<Option<TxReceipt>, WalletError> {
        Ok(None)
    }
}
