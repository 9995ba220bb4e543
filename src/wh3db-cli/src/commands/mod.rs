//! Command handlers for the wh3db CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod convert;
pub mod export;
pub mod extract;
