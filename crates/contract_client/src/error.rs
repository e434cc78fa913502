use shared::protocol::TxHash;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    #[error("abi data truncated: need {needed} bytes at offset {offset}, have {len}")]
    Truncated {
        offset: usize,
        needed: usize,
        len: usize,
    },
    #[error("abi offset or length does not fit in memory")]
    OffsetOverflow,
    #[error("abi integer does not fit in {bits} bits")]
    IntegerOverflow { bits: u32 },
    #[error("abi bool at offset {offset} is neither 0 nor 1")]
    InvalidBool { offset: usize },
    #[error("abi address at offset {offset} has non-zero padding")]
    DirtyAddress { offset: usize },
    #[error("abi string at offset {offset} is not valid utf-8")]
    InvalidUtf8 { offset: usize },
    #[error("unexpected abi token, expected {expected}")]
    UnexpectedToken { expected: &'static str },
    #[error("session {session_id} reports invalid voted proposal index {value}")]
    InvalidVotedIndex { session_id: u64, value: i64 },
}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("rpc transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rpc error {code}: {message}")]
    Remote { code: i64, message: String },
    #[error("malformed rpc response: {0}")]
    Decode(String),
}

/// EIP-1193 code for a request the user declined.
pub const USER_REJECTED_CODE: i64 = 4001;
/// JSON-RPC code for an unsupported method.
pub const METHOD_NOT_FOUND_CODE: i64 = -32601;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet provider unavailable: {0}")]
    Unavailable(String),
    #[error("wallet request rejected ({code}): {message}")]
    Rejected { code: i64, message: String },
    #[error("wallet returned no authorized account")]
    NoAccounts,
    #[error(transparent)]
    Rpc(RpcError),
    #[error("wallet returned an invalid {field}: {message}")]
    InvalidResponse { field: &'static str, message: String },
}

impl From<RpcError> for WalletError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Transport(inner) if inner.is_connect() || inner.is_timeout() => {
                Self::Unavailable(inner.to_string())
            }
            RpcError::Remote { code, message } if code == USER_REJECTED_CODE => {
                Self::Rejected { code, message }
            }
            other => Self::Rpc(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum ContractError {
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error("failed to decode contract data: {0}")]
    Abi(#[from] AbiError),
    #[error("transaction {hash} reverted")]
    Reverted { hash: TxHash },
}
