//! Voting client core: configuration, wallet connection, session reads,
//! action dispatch, filtering and the application state reducer.

pub mod client;
pub mod config;
pub mod connector;
pub mod dispatcher;
pub mod error;
pub mod filter;
pub mod repository;
pub mod state;
pub mod view;

pub use client::{ClientEvent, ClientHandle, VotingClient};
pub use config::{load_settings, Settings};
pub use connector::Connection;
pub use error::ClientError;
pub use state::{AppEvent, AppState, Effect};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/repository_tests.rs"]
mod repository_tests;

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod client_tests;

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod filter_tests;

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod state_tests;

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod view_tests;
