//! Run modes for the CLI.

pub mod chat;
pub mod exec;
