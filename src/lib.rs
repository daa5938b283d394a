//! cchistory application library
//!
//! Wires the core walker to the HTTP, git and terminal adapters. Exposed as a
//! library so integration tests can drive a run without a process boundary.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
