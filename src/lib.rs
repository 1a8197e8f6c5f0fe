//! rankcheck library
//!
//! Google Custom Search ranking checks with a daily quota ledger, exposed as
//! tools over an MCP server on stdio.

pub mod cli;
pub mod config;
pub mod history;
pub mod logging;
pub mod quota;
pub mod ranking;
pub mod search;
pub mod server;
pub mod tool;
