//! Operating expense breakdown for one month

use crate::calendar::CalendarMonth;
use crate::chart::{render_or_skip, ChartKind, ChartRenderer, ChartSpec, Series};
use crate::dataset::Dataset;
use crate::error::CopilotError;
use crate::fmt::usd;
use crate::models::{Intent, MetricResult};
use crate::tools::{invalid_month_text, unexpected_error_text, Tool, ToolInput};
use crate::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct OpexBreakdown {
    pub month: CalendarMonth,
    /// Largest first; ties ordered by name
    pub categories: Vec<(String, f64)>,
}

impl OpexBreakdown {
    pub fn total(&self) -> f64 {
        self.categories.iter().map(|(_, value)| value).sum()
    }
}

/// "Opex:Marketing" -> "Marketing"
fn category_suffix(account_category: &str) -> &str {
    account_category
        .split_once(':')
        .map(|(_, suffix)| suffix.trim())
        .unwrap_or(account_category)
}

pub fn compute(dataset: &Dataset, month: CalendarMonth) -> Result<OpexBreakdown> {
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();

    for row in dataset
        .actuals()
        .iter()
        .filter(|row| row.month == month && row.is_opex())
    {
        *by_category
            .entry(category_suffix(&row.account_category))
            .or_insert(0.0) += row.value_usd;
    }

    if by_category.is_empty() {
        return Err(CopilotError::EmptyResult(month.label()));
    }

    let mut categories: Vec<(String, f64)> = by_category
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
    categories.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    debug!(month = %month, categories = categories.len(), "Opex breakdown computed");

    Ok(OpexBreakdown { month, categories })
}

pub fn summarize(report: &OpexBreakdown) -> String {
    let mut out = format!(
        "**Opex Breakdown for {} (Total: `{}` USD):**\n",
        report.month,
        usd(report.total())
    );
    for (category, value) in &report.categories {
        out.push_str(&format!("- **{}:** `{}`\n", category, usd(*value)));
    }
    out
}

pub fn chart_spec(report: &OpexBreakdown) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Pie,
        title: format!("Opex Breakdown - {}", report.month),
        y_label: None,
        series: Series::Categories(report.categories.clone()),
    }
}

pub struct OpexBreakdownTool {
    dataset: Arc<Dataset>,
    renderer: Arc<dyn ChartRenderer>,
}

impl OpexBreakdownTool {
    pub fn new(dataset: Arc<Dataset>, renderer: Arc<dyn ChartRenderer>) -> Self {
        Self { dataset, renderer }
    }
}

impl Tool for OpexBreakdownTool {
    fn intent(&self) -> Intent {
        Intent::OpexBreakdown
    }

    fn description(&self) -> &'static str {
        "Operating expenses in USD for one month, grouped by Opex category"
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
                return MetricResult::text_only(format!("No Opex data found for {}.", period))
            }
            Err(e) => return MetricResult::text_only(unexpected_error_text(&e)),
        };

        let chart = render_or_skip(self.renderer.as_ref(), &chart_spec(&report));
        MetricResult::with_chart(summarize(&report), chart)
    }
}
