//! CLI command implementations.

pub mod init;
pub mod output;
pub mod plan;
pub mod slices;
pub mod watch;
