//! Revenue vs budget for one month

use crate::calendar::CalendarMonth;
use crate::chart::{render_or_skip, ChartKind, ChartRenderer, ChartSpec, Series};
use crate::dataset::Dataset;
use crate::error::CopilotError;
use crate::fmt::usd;
use crate::models::{Intent, MetricResult};
use crate::tools::{invalid_month_text, sum_usd, unexpected_error_text, Tool, ToolInput};
use crate::Result;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct RevenueVsBudget {
    pub month: CalendarMonth,
    pub actual: f64,
    pub budget: f64,
}

impl RevenueVsBudget {
    /// Actual minus budget; negative when revenue fell short
    pub fn variance(&self) -> f64 {
        self.actual - self.budget
    }
}

pub fn compute(dataset: &Dataset, month: CalendarMonth) -> Result<RevenueVsBudget> {
    let (actual, actual_rows) = sum_usd(dataset.actuals(), month, |row| row.is_revenue());
    let (budget, budget_rows) = sum_usd(dataset.budget(), month, |row| row.is_revenue());

    debug!(month = %month, actual_rows, budget_rows, "Revenue vs budget computed");

    if actual_rows == 0 && budget_rows == 0 {
        return Err(CopilotError::EmptyResult(month.label()));
    }

    Ok(RevenueVsBudget {
        month,
        actual,
        budget,
    })
}

pub fn summarize(report: &RevenueVsBudget) -> String {
    format!(
        "**Revenue for {}:**\n\
         - **Actual:** `{}` USD\n\
         - **Budget:** `{}` USD\n\
         - **Variance:** `{}` USD",
        report.month,
        usd(report.actual),
        usd(report.budget),
        usd(report.variance()),
    )
}

pub fn chart_spec(report: &RevenueVsBudget) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        title: format!("Revenue vs. Budget - {}", report.month),
        y_label: Some("Amount (USD)".to_string()),
        series: Series::Categories(vec![
            ("Actual".to_string(), report.actual),
            ("Budget".to_string(), report.budget),
        ]),
    }
}

pub struct RevenueVsBudgetTool {
    dataset: Arc<Dataset>,
    renderer: Arc<dyn ChartRenderer>,
}

impl RevenueVsBudgetTool {
    pub fn new(dataset: Arc<Dataset>, renderer: Arc<dyn ChartRenderer>) -> Self {
        Self { dataset, renderer }
    }
}

impl Tool for RevenueVsBudgetTool {
    fn intent(&self) -> Intent {
        Intent::RevenueVsBudget
    }

    fn description(&self) -> &'static str {
        "Actual vs budgeted revenue in USD for one month, with variance"
    }

    fn execute(&self, input: &ToolInput) -> MetricResult {
        let report = match input
            .target_month()
            .and_then(|month| compute(&self.dataset, month))
        {
            Ok(report) => report,
            Err(CopilotError::InvalidMonthFormat(raw)) => {
                return MetricResult::text_only(invalid_month_text(&raw))
            }
            Err(CopilotError::EmptyResult(period)) => {
                return MetricResult::text_only(format!(
                    "No revenue or budget data found for {}.",
                    period
                ))
            }
            Err(e) => return MetricResult::text_only(unexpected_error_text(&e)),
        };

        let chart = render_or_skip(self.renderer.as_ref(), &chart_spec(&report));
        MetricResult::with_chart(summarize(&report), chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::JsonChartRenderer;
    use crate::dataset::fixtures::*;

    fn tool() -> RevenueVsBudgetTool {
        RevenueVsBudgetTool::new(Arc::new(sample_dataset()), Arc::new(JsonChartRenderer))
    }

    fn input(month: &str) -> ToolInput {
        ToolInput {
            intent: Intent::RevenueVsBudget,
            month: Some(month.to_string()),
        }
    }

    #[test]
    fn test_variance_is_actual_minus_budget() {
        let report = compute(&sample_dataset(), month(2025, 6)).unwrap();
        assert_eq!(report.actual, 1100.0);
        assert_eq!(report.budget, 1200.0);
        assert_eq!(report.variance(), -100.0);
    }

    #[test]
    fn test_only_actuals_present_still_reports() {
        let report = compute(&sample_dataset(), month(2025, 5)).unwrap();
        assert_eq!(report.actual, 1000.0);
        assert_eq!(report.budget, 0.0);
        assert_eq!(report.variance(), 1000.0);
    }

    #[test]
    fn test_execute_renders_text_and_chart() {
        let result = tool().execute(&input("June 2025"));

        assert_eq!(
            result.text,
            "**Revenue for June 2025:**\n\
             - **Actual:** `$1,100` USD\n\
             - **Budget:** `$1,200` USD\n\
             - **Variance:** `-$100` USD"
        );
        assert!(result.chart.is_some());
    }

    #[test]
    fn test_execute_empty_month() {
        let result = tool().execute(&input("January 2020"));
        assert_eq!(result.text, "No revenue or budget data found for January 2020.");
        assert!(result.chart.is_none());
    }

    #[test]
    fn test_execute_bad_month_format() {
        let result = tool().execute(&input("2025-06"));
        assert_eq!(
            result.text,
            "Error: Invalid date format received: '2025-06'. Please use 'Month YYYY'."
        );
        assert!(result.chart.is_none());
    }
}
