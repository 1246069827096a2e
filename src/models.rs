//! Core data models for the copilot

use crate::calendar::CalendarMonth;
use crate::chart::ChartImage;
use serde::Serialize;
use std::fmt;

//
// ================= Source Tables =================
//

/// One actuals or budget line. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerRow {
    pub month: CalendarMonth,
    pub account_category: String,
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FxRate {
    pub month: CalendarMonth,
    pub currency: String,
    pub rate_to_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashBalance {
    pub month: CalendarMonth,
    pub cash_balance_usd: f64,
}

//
// ================= Normalized =================
//

/// A ledger row with its USD value resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub month: CalendarMonth,
    pub account_category: String,
    pub amount: f64,
    pub currency: String,
    pub rate_to_usd: f64,
    pub value_usd: f64,
}

impl NormalizedRow {
    pub fn is_revenue(&self) -> bool {
        self.account_category == REVENUE
    }

    pub fn is_cogs(&self) -> bool {
        self.account_category == COGS
    }

    pub fn is_opex(&self) -> bool {
        self.account_category.starts_with(OPEX_PREFIX)
    }
}

pub const REVENUE: &str = "Revenue";
pub const COGS: &str = "COGS";
pub const OPEX_PREFIX: &str = "Opex:";

//
// ================= Plan =================
//

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    RevenueVsBudget,
    GrossMarginTrend,
    OpexBreakdown,
    CashRunway,
    EbitdaProxy,
    Unknown,
}

impl Intent {
    /// Whether the metric is scoped to a single month
    pub fn takes_month(&self) -> bool {
        matches!(
            self,
            Intent::RevenueVsBudget | Intent::OpexBreakdown | Intent::EbitdaProxy
        )
    }
}

/// A planned query. Created per query and consumed once.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Plan {
    pub intent: Intent,
    /// "MonthName YYYY"
    pub month: String,
    /// True when any part of the month was inferred rather than read from the query
    pub defaulted: bool,
}

//
// ================= Result =================
//

/// What the caller renders: a Markdown summary and an optional chart.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricResult {
    pub text: String,
    pub chart: Option<ChartImage>,
}

impl MetricResult {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            chart: None,
        }
    }

    pub fn with_chart(text: impl Into<String>, chart: Option<ChartImage>) -> Self {
        Self {
            text: text.into(),
            chart,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Intent::RevenueVsBudget => "Revenue vs Budget",
            Intent::GrossMarginTrend => "Gross Margin Trend",
            Intent::OpexBreakdown => "Opex Breakdown",
            Intent::CashRunway => "Cash Runway",
            Intent::EbitdaProxy => "EBITDA Proxy",
            Intent::Unknown => "Unknown",
        };
        write!(f, "{}", s)
    }
}
