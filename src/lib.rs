//! CFO Copilot
//!
//! Answers plain-language questions about a small set of financial
//! statements (actuals, budget, cash, FX rates):
//! - Normalizes every ledger line to USD once, up front
//! - Classifies the question into one of five fixed intents
//! - Computes the matching metric and returns Markdown text plus an
//!   optional chart payload
//!
//! QUERY → PLAN → DISPATCH → METRIC → RESULT

pub mod agent;
pub mod calendar;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod dispatcher;
pub mod error;
pub mod fmt;
pub mod ingest;
pub mod models;
pub mod normalizer;
pub mod planner;
pub mod tools;

pub use error::Result;

// Re-export common types
pub use agent::Copilot;
pub use models::*;
