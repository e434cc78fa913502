use std::sync::Arc;

use contract_client::{BoundVotingContract, JsonRpcWallet, VotingContract, WalletError, WalletProvider};
use shared::domain::Address;
use tracing::{info, warn};

use crate::{config::Settings, error::ClientError};

/// An authorized account and the contract bound to it.
#[derive(Clone)]
pub struct Connection {
    pub account: Address,
    pub contract: Arc<dyn VotingContract>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

pub fn wallet_from_settings(settings: &Settings) -> Arc<dyn WalletProvider> {
    Arc::new(JsonRpcWallet::new(settings.rpc_url.clone()))
}

/// Requests account access and binds the contract to the first authorized
/// account.
pub async fn connect(
    wallet: Arc<dyn WalletProvider>,
    settings: &Settings,
) -> Result<Connection, ClientError> {
    let accounts = wallet.request_accounts().await.map_err(|err| {
        warn!(error = %err, "wallet connection failed");
        ClientError::connect(err)
    })?;
    let account = accounts
        .first()
        .copied()
        .ok_or_else(|| ClientError::connect(WalletError::NoAccounts))?;

    info!(%account, contract = %settings.contract_address, "wallet connected");
    let contract = BoundVotingContract::new(wallet, settings.contract_address, account)
        .with_poll_interval(settings.receipt_poll_interval());
    Ok(Connection {
        account,
        contract: Arc::new(contract),
    })
}
