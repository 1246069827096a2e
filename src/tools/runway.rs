//! Cash runway from month-over-month burn

use crate::dataset::Dataset;
use crate::error::CopilotError;
use crate::fmt::{months, usd};
use crate::models::{CashBalance, Intent, MetricResult};
use crate::tools::{unexpected_error_text, Tool, ToolInput};
use crate::Result;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct CashRunway {
    pub current_balance: f64,
    /// Burns averaged, oldest first
    pub recent_burns: Vec<f64>,
    pub avg_burn: f64,
    pub runway_months: f64,
}

/// burn[i] = balance[i-1] - balance[i] over chronologically sorted balances.
/// Positive burn means cash went down.
pub fn burns(cash: &[CashBalance]) -> Vec<f64> {
    cash.windows(2)
        .map(|pair| pair[0].cash_balance_usd - pair[1].cash_balance_usd)
        .collect()
}

/// Averages the last `window` burns, or all of them when fewer exist.
pub fn compute(dataset: &Dataset, window: u32) -> Result<CashRunway> {
    let cash = dataset.cash();
    let current = cash
        .last()
        .ok_or_else(|| CopilotError::EmptyResult("cash balances".to_string()))?;

    let all_burns = burns(cash);
    let recent = &all_burns[all_burns.len().saturating_sub(window.max(1) as usize)..];

    if recent.is_empty() {
        return Err(CopilotError::DegenerateMetric(
            "need at least two months of cash balances".to_string(),
        ));
    }

    let avg_burn = recent.iter().sum::<f64>() / recent.len() as f64;

    debug!(
        current_balance = current.cash_balance_usd,
        burns = recent.len(),
        avg_burn,
        "Cash runway computed"
    );

    if avg_burn <= 0.0 {
        return Err(CopilotError::DegenerateMetric(
            "no average net burn".to_string(),
        ));
    }

    Ok(CashRunway {
        current_balance: current.cash_balance_usd,
        recent_burns: recent.to_vec(),
        avg_burn,
        runway_months: current.cash_balance_usd / avg_burn,
    })
}

/// The burn label counts the burns actually averaged, which can be fewer than the window.
pub fn summarize(report: &CashRunway) -> String {
    format!(
        "**Cash Runway Analysis:**\n\
         - **Current Cash Balance:** `{}`\n\
         - **Avg. {}-Month Net Burn:** `{}` / month\n\
         - **Estimated Cash Runway:** `{}` months",
        usd(report.current_balance),
        report.recent_burns.len(),
        usd(report.avg_burn),
        months(report.runway_months),
    )
}

pub struct CashRunwayTool {
    dataset: Arc<Dataset>,
    window: u32,
}

impl CashRunwayTool {
    pub fn new(dataset: Arc<Dataset>, window: u32) -> Self {
        Self { dataset, window }
    }
}

impl Tool for CashRunwayTool {
    fn intent(&self) -> Intent {
        Intent::CashRunway
    }

    fn description(&self) -> &'static str {
        "Months of cash left at the recent average net burn"
    }

    fn execute(&self, _input: &ToolInput) -> MetricResult {
        match compute(&self.dataset, self.window) {
            Ok(report) => MetricResult::text_only(summarize(&report)),
            Err(CopilotError::EmptyResult(_)) => {
                MetricResult::text_only("No cash balance data found.")
            }
            Err(CopilotError::DegenerateMetric(_)) => MetricResult::text_only(
                "**Cash Runway:** Not applicable (no average net burn).",
            ),
            Err(e) => MetricResult::text_only(unexpected_error_text(&e)),
        }
    }
}
