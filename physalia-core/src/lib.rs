//! Shared primitives for the physalia sequence-analysis workspace.
//!
//! `physalia-core` provides the foundation the other physalia crates build on:
//!
//! - **Error types** — [`PhysaliaError`] and [`Result`] for structured error handling
//! - **Probability algebra** — [`Prob`], a negated-log-space score scalar for
//!   numerically stable chains of small probabilities

pub mod error;
pub mod prob;

pub use error::{PhysaliaError, Result};
pub use prob::Prob;
