use std::sync::Arc;

use async_trait::async_trait;
use contract_client::{MissingWalletProvider, WalletProvider};
use shared::{
    domain::{Address, NewSession, Session, SessionId},
    protocol::{SessionAction, TxHash, TxReceipt},
};
use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};

use crate::{
    config::Settings,
    connector::{self, Connection},
    dispatcher::ActionDispatcher,
    error::ClientError,
    repository::SessionRepository,
};

#[derive(Debug, Clone)]
pub enum ClientEvent {
    Connected {
        account: Address,
    },
    ConnectFailed {
        error: ClientError,
    },
    SessionsFetched {
        generation: u64,
        sessions: Vec<Session>,
    },
    FetchFailed {
        generation: u64,
        error: ClientError,
    },
    ActionSubmitted {
        action: SessionAction,
        hash: TxHash,
    },
    ActionConfirmed {
        action: SessionAction,
        receipt: TxReceipt,
    },
    ActionFailed {
        action: SessionAction,
        error: ClientError,
    },
}

#[async_trait]
pub trait ClientHandle: Send + Sync {
    async fn connect(&self) -> Result<Address, ClientError>;
    async fn account(&self) -> Option<Address>;
    /// Every result is also published as an event tagged with `generation`.
    async fn fetch_sessions(&self, generation: u64) -> Result<Vec<Session>, ClientError>;
    /// Submits `action` and waits for it to be mined.
    async fn perform(&self, action: SessionAction) -> Result<TxReceipt, ClientError>;
    fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent>;

    async fn create_session(
        &self,
        title: &str,
        proposals: &[String],
    ) -> Result<TxReceipt, ClientError> {
        let session = NewSession::new(title, proposals)?;
        self.perform(SessionAction::Create(session)).await
    }

    async fn vote_on_proposal(
        &self,
        session_id: SessionId,
        proposal_index: usize,
    ) -> Result<TxReceipt, ClientError> {
        self.perform(SessionAction::Vote {
            session_id,
            proposal_index,
        })
        .await
    }

    async fn close_session(&self, session_id: SessionId) -> Result<TxReceipt, ClientError> {
        self.perform(SessionAction::Close { session_id }).await
    }
}

struct ConnectedState {
    account: Address,
    repository: SessionRepository,
    dispatcher: ActionDispatcher,
}

impl From<Connection> for ConnectedState {
    fn from(connection: Connection) -> Self {
        Self {
            account: connection.account,
            repository: SessionRepository::new(connection.contract.clone()),
            dispatcher: ActionDispatcher::new(connection.contract),
        }
    }
}

pub struct VotingClient {
    settings: Settings,
    wallet: Arc<dyn WalletProvider>,
    inner: RwLock<Option<ConnectedState>>,
    events: broadcast::Sender<ClientEvent>,
}

impl VotingClient {
    pub fn new(settings: Settings) -> Arc<Self> {
        let wallet = connector::wallet_from_settings(&settings);
        Self::new_with_wallet(settings, wallet)
    }

    pub fn new_with_wallet(settings: Settings, wallet: Arc<dyn WalletProvider>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            settings,
            wallet,
            inner: RwLock::new(None),
            events,
        })
    }

    /// A client that is already bound to `connection`.
    pub fn from_connection(settings: Settings, connection: Connection) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            settings,
            wallet: Arc::new(MissingWalletProvider),
            inner: RwLock::new(Some(connection.into())),
            events,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    async fn repository(&self) -> Result<SessionRepository, ClientError> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|state| state.repository.clone())
            .ok_or_else(ClientError::not_connected)
    }

    async fn dispatcher(&self) -> Result<ActionDispatcher, ClientError> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|state| state.dispatcher.clone())
            .ok_or_else(ClientError::not_connected)
    }
}

#[async_trait]
impl ClientHandle for VotingClient {
    async fn connect(&self) -> Result<Address, ClientError> {
        let mut inner = self.inner.write().await;
        if let Some(state) = inner.as_ref() {
            return Ok(state.account);
        }

        match connector::connect(self.wallet.clone(), &self.settings).await {
            Ok(connection) => {
                let account = connection.account;
                *inner = Some(connection.into());
                let _ = self.events.send(ClientEvent::Connected { account });
                Ok(account)
            }
            Err(error) => {
                let _ = self.events.send(ClientEvent::ConnectFailed {
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    async fn account(&self) -> Option<Address> {
        self.inner.read().await.as_ref().map(|state| state.account)
    }

    async fn fetch_sessions(&self, generation: u64) -> Result<Vec<Session>, ClientError> {
        let result = match self.repository().await {
            Ok(repository) => repository.fetch_sessions().await,
            Err(err) => Err(err),
        };
        match &result {
            Ok(sessions) => {
                info!(generation, count = sessions.len(), "sessions fetched");
                let _ = self.events.send(ClientEvent::SessionsFetched {
                    generation,
                    sessions: sessions.clone(),
                });
            }
            Err(error) => {
                warn!(generation, error = %error, "session fetch failed");
                let _ = self.events.send(ClientEvent::FetchFailed {
                    generation,
                    error: error.clone(),
                });
            }
        }
        result
    }

    async fn perform(&self, action: SessionAction) -> Result<TxReceipt, ClientError> {
        let outcome = async {
            let dispatcher = self.dispatcher().await?;
            let hash = dispatcher.submit(&action).await?;
            let _ = self.events.send(ClientEvent::ActionSubmitted {
                action: action.clone(),
                hash,
            });
            dispatcher.confirm(hash).await
        }
        .await;

        match &outcome {
            Ok(receipt) => {
                let _ = self.events.send(ClientEvent::ActionConfirmed {
                    action,
                    receipt: receipt.clone(),
                });
            }
            Err(error) => {
                let _ = self.events.send(ClientEvent::ActionFailed {
                    action,
                    error: error.clone(),
                });
            }
        }
        outcome
    }

    fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }
}
