//! Keyword planner
//!
//! Month and intent are resolved by two independent passes over the
//! lowercased query. Intent rules are checked top to bottom and the first
//! match wins, so overlapping queries ("gross margin and ebitda") resolve
//! by rule order alone.

use crate::calendar::MONTH_NAMES;
use crate::models::{Intent, Plan};
use crate::planner::Planner;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    /// A full month name, optionally followed by a 4-digit ASCII year
    static ref MONTH_PATTERN: Regex = Regex::new(
        r"\b(january|february|march|april|may|june|july|august|september|october|november|december)(?:\s+([0-9]{4}))?\b"
    )
    .expect("month pattern is a valid regex");
}

struct IntentRule {
    intent: Intent,
    matches: fn(&str) -> bool,
}

/// Evaluated in order; first match wins
const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::RevenueVsBudget,
        matches: mentions_revenue_and_budget,
    },
    IntentRule {
        intent: Intent::GrossMarginTrend,
        matches: mentions_gross_margin,
    },
    IntentRule {
        intent: Intent::OpexBreakdown,
        matches: mentions_opex,
    },
    IntentRule {
        intent: Intent::CashRunway,
        matches: mentions_cash_runway,
    },
    IntentRule {
        intent: Intent::EbitdaProxy,
        matches: mentions_ebitda,
    },
];

fn mentions_revenue_and_budget(q: &str) -> bool {
    q.contains("revenue") && q.contains("budget")
}

fn mentions_gross_margin(q: &str) -> bool {
    q.contains("gross margin")
}

fn mentions_opex(q: &str) -> bool {
    q.contains("opex") || q.contains("operating expenses")
}

fn mentions_cash_runway(q: &str) -> bool {
    q.contains("cash runway")
}

fn mentions_ebitda(q: &str) -> bool {
    q.contains("ebitda")
}

/// Plans queries by keyword containment. No stemming, synonyms or negation.
#[derive(Debug, Clone)]
pub struct KeywordPlanner {
    reference_year: i32,
}

impl KeywordPlanner {
    pub fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Returns the "MonthName YYYY" argument and whether any part of it was defaulted.
    fn resolve_month(&self, query: &str) -> (String, bool) {
        let Some(caps) = MONTH_PATTERN.captures(query) else {
            return (format!("December {}", self.reference_year), true);
        };

        let name = MONTH_NAMES
            .iter()
            .find(|m| m.eq_ignore_ascii_case(&caps[1]))
            .copied()
            .unwrap_or("December");

        match caps.get(2) {
            Some(year) => (format!("{} {}", name, year.as_str()), false),
            None => (format!("{} {}", name, self.reference_year), true),
        }
    }
}

/// Classify a lowercased query
fn classify(query: &str) -> Intent {
    INTENT_RULES
        .iter()
        .find(|rule| (rule.matches)(query))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Unknown)
}

impl Planner for KeywordPlanner {
    fn plan(&self, query: &str) -> Plan {
        let query = query.to_lowercase();

        let (month, defaulted) = self.resolve_month(&query);
        let intent = classify(&query);

        debug!(
            intent = ?intent,
            month = %month,
            defaulted,
            "Query planned"
        );

        Plan {
            intent,
            month,
            defaulted,
        }
    }
}
