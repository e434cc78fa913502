use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::{
    domain::Address,
    protocol::{TxHash, TxReceipt},
};
use url::Url;

use crate::{
    error::{RpcError, WalletError, METHOD_NOT_FOUND_CODE},
    rpc::{decode_hex_data, encode_hex_data, parse_quantity, RpcClient},
};

/// A contract call or transaction originating from `from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Address,
    pub to: Address,
    pub data: Vec<u8>,
}

/// Account authorization and signing, as exposed by an injected wallet.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;
    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, WalletError>;
    async fn send_transaction(&self, request: &CallRequest) -> Result<TxHash, WalletError>;
    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>, WalletError>;
}

pub struct MissingWalletProvider;

#[async_trait]
impl WalletProvider for MissingWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        Err(WalletError::Unavailable("no wallet provider detected".into()))
    }

    async fn call(&self, _request: &CallRequest) -> Result<Vec<u8>, WalletError> {
        Err(WalletError::Unavailable("no wallet provider detected".into()))
    }

    async fn send_transaction(&self, _request: &CallRequest) -> Result<TxHash, WalletError> {
        Err(WalletError::Unavailable("no wallet provider detected".into()))
    }

    async fn transaction_receipt(&self, _hash: TxHash) -> Result<Option<TxReceipt>, WalletError> {
        Err(WalletError::Unavailable("no wallet provider detected".into()))
    }
}

const NO_PARAMS: [(); 0] = [];

#[derive(Debug, Serialize)]
struct TransactionObject {
    from: String,
    to: String,
    data: String,
}

impl From<&CallRequest> for TransactionObject {
    fn from(request: &CallRequest) -> Self {
        Self {
            from: request.from.to_string(),
            to: request.to.to_string(),
            data: encode_hex_data(&request.data),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptObject {
    transaction_hash: TxHash,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Wallet backed by a JSON-RPC node that holds the signing keys, such as a
/// local development node with unlocked accounts.
pub struct JsonRpcWallet {
    rpc: RpcClient,
}

impl JsonRpcWallet {
    pub fn new(url: Url) -> Self {
        Self {
            rpc: RpcClient::new(url),
        }
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        let accounts: Vec<Address> = match self.rpc.request("eth_requestAccounts", NO_PARAMS).await {
            Ok(accounts) => accounts,
            Err(RpcError::Remote { code, .. }) if code == METHOD_NOT_FOUND_CODE => {
                tracing::debug!("eth_requestAccounts unsupported; falling back to eth_accounts");
                self.rpc.request("eth_accounts", NO_PARAMS).await?
            }
            Err(err) => return Err(err.into()),
        };
        if accounts.is_empty() {
            return Err(WalletError::NoAccounts);
        }
        Ok(accounts)
    }

    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, WalletError> {
        let raw: String = self
            .rpc
            .request("eth_call", (TransactionObject::from(request), "latest"))
            .await?;
        decode_hex_data(&raw).map_err(|message| WalletError::InvalidResponse {
            field: "call result",
            message,
        })
    }

    async fn send_transaction(&self, request: &CallRequest) -> Result<TxHash, WalletError> {
        let hash: TxHash = self
            .rpc
            .request("eth_sendTransaction", [TransactionObject::from(request)])
            .await?;
        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>, WalletError> {
        let receipt: Option<ReceiptObject> = self
            .rpc
            .request("eth_getTransactionReceipt", [hash])
            .await?;
        let Some(receipt) = receipt else {
            return Ok(None);
        };

        let block_number = receipt
            .block_number
            .as_deref()
            .map(parse_quantity)
            .transpose()
            .map_err(|message| WalletError::InvalidResponse {
                field: "receipt block number",
                message,
            })?;
        // Pre-Byzantium receipts carry no status; treat them as successful.
        let succeeded = match receipt.status.as_deref() {
            None => true,
            Some(raw) => parse_quantity(raw).map_err(|message| WalletError::InvalidResponse {
                field: "receipt status",
                message,
            })? == 1,
        };

        Ok(Some(TxReceipt {
            transaction_hash: receipt.transaction_hash,
            block_number,
            succeeded,
        }))
    }
}
