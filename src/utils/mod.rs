//! Shared utilities.

pub mod parsing;
