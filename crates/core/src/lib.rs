//! Shared domain types and errors for the postrelay workspace.

pub mod error;
pub mod types;
