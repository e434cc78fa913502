//! Typed access to the voting contract through a JSON-RPC wallet provider.

pub mod abi;
pub mod contract;
pub mod error;
pub mod rpc;
pub mod wallet;

pub use contract::{BoundVotingContract, VotingContract};
pub use error::{AbiError, ContractError, RpcError, WalletError};
pub use wallet::{CallRequest, JsonRpcWallet, MissingWalletProvider, WalletProvider};

#[cfg(test)]
#[path = "tests/node_tests.rs"]
mod node_tests;
