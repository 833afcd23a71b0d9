//! rf-core library.
//!
//! Exposes the pieces of the `rf-core` binary that are useful to embed:
//! exit code contract and logging setup.

pub mod exit_codes;
pub mod logging;
