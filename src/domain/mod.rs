//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `decision` - Factor parsing, scoring, extraction and the decision record

pub mod decision;
pub mod foundation;
