//! Planner trait and implementations
//!
//! A planner turns a free-text query into a `Plan`: one intent plus the
//! month the metric should be computed for.

use crate::models::Plan;

pub mod keyword;
pub use keyword::KeywordPlanner;

/// Trait for intent planning
pub trait Planner: Send + Sync {
    /// Plan a single query. Planning never fails; unrecognised queries
    /// produce `Intent::Unknown`.
    fn plan(&self, query: &str) -> Plan;
}
