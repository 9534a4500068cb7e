//! CLI command implementations.

pub mod cache;
pub mod credential;
pub mod init;
pub mod status;
