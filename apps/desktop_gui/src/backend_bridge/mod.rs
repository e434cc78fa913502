//! Bridge between the UI thread and the async client running on its own runtime.

pub mod commands;
pub mod runtime;
