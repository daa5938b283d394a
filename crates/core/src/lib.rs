//! cchistory core - history walking with no transport or terminal dependencies
//!
//! This crate holds the domain records fetched from the repository-hosting
//! service, the ports (traits) the binary crate implements with real HTTP and
//! terminal adapters, and the two pieces of application logic: the
//! repository/branch enumerator and the commit-history walker.

pub mod app;
pub mod domain;
pub mod error;
pub mod ports;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-exports for ergonomics
pub use domain::*;
pub use error::*;
