//! Decision Splitter - two-option decision scoring.
//!
//! Blends a deterministic weighted pros/cons score with an emotional
//! sentiment score obtained from an LLM, picks a winner and attaches a
//! three-part narrative. Inference is best-effort: network and model
//! failures degrade to neutral scores and offline text, never to errors.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
