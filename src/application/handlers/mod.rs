//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

mod resolve_decision;

pub use resolve_decision::{AnalysisError, ResolveDecisionCommand, ResolveDecisionHandler};
