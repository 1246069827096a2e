//! EBITDA proxy: Revenue - COGS - Opex for one month

use crate::calendar::CalendarMonth;
use crate::dataset::Dataset;
use crate::error::CopilotError;
use crate::fmt::usd;
use crate::models::{Intent, MetricResult};
use crate::tools::{invalid_month_text, sum_usd, unexpected_error_text, Tool, ToolInput};
use crate::Result;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct EbitdaProxy {
    pub month: CalendarMonth,
    pub revenue: f64,
    pub cogs: f64,
    pub opex: f64,
}

impl EbitdaProxy {
    pub fn ebitda(&self) -> f64 {
        self.revenue - self.cogs - self.opex
    }
}

pub fn compute(dataset: &Dataset, month: CalendarMonth) -> Result<EbitdaProxy> {
    let actuals = dataset.actuals();
    let (revenue, _) = sum_usd(actuals, month, |row| row.is_revenue());
    let (cogs, _) = sum_usd(actuals, month, |row| row.is_cogs());
    let (opex, _) = sum_usd(actuals, month, |row| row.is_opex());

    debug!(month = %month, revenue, cogs, opex, "EBITDA buckets summed");

    if revenue == 0.0 {
        return Err(CopilotError::DegenerateMetric(format!(
            "no revenue for {}",
            month
        )));
    }

    Ok(EbitdaProxy {
        month,
        revenue,
        cogs,
        opex,
    })
}

pub fn summarize(report: &EbitdaProxy) -> String {
    format!(
        "**EBITDA (Proxy) for {}:**\n\
         - **Revenue:** `{}`\n\
         - **COGS:** `{}`\n\
         - **Opex:** `{}`\n\
         --------------------\n\
         - **EBITDA:** `{}`",
        report.month,
        usd(report.revenue),
        usd(report.cogs),
        usd(report.opex),
        usd(report.ebitda()),
    )
}

pub struct EbitdaProxyTool {
    dataset: Arc<Dataset>,
}

impl EbitdaProxyTool {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }
}

impl Tool for EbitdaProxyTool {
    fn intent(&self) -> Intent {
        Intent::EbitdaProxy
    }

    fn description(&self) -> &'static str {
        "Revenue minus COGS minus Opex in USD for one month"
    }

    fn execute(&self, input: &ToolInput) -> MetricResult {
        let month = match input.target_month() {
            Ok(month) => month,
            Err(CopilotError::InvalidMonthFormat(raw)) => {
                return MetricResult::text_only(invalid_month_text(&raw))
            }
            Err(e) => return MetricResult::text_only(unexpected_error_text(&e)),
        };

        match compute(&self.dataset, month) {
            Ok(report) => MetricResult::text_only(summarize(&report)),
            Err(CopilotError::DegenerateMetric(_)) => MetricResult::text_only(format!(
                "No revenue data found for {} to calculate EBITDA.",
                month
            )),
            Err(e) => MetricResult::text_only(unexpected_error_text(&e)),
        }
    }
}
