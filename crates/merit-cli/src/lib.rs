//! Library half of the `merit` binary: argument definitions, configuration,
//! logging setup and the HTTP router, exposed so they can be tested in
//! process.

pub mod cli;
pub mod config;
pub mod logging;
pub mod server;
