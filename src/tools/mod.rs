//! Tool trait and registry
//!
//! Each tool computes one metric over the shared read-only dataset. Tools
//! never fail outward: every error is turned into user-facing text by the
//! tool that raised it.

use crate::calendar::CalendarMonth;
use crate::chart::ChartRenderer;
use crate::config::CopilotConfig;
use crate::dataset::Dataset;
use crate::error::CopilotError;
use crate::models::{Intent, MetricResult, NormalizedRow};
use crate::Result;
use std::collections::HashMap;
use std::sync::Arc;

pub mod ebitda;
pub mod margin;
pub mod opex;
pub mod revenue;
pub mod runway;

pub use ebitda::EbitdaProxyTool;
pub use margin::GrossMarginTrendTool;
pub use opex::OpexBreakdownTool;
pub use revenue::RevenueVsBudgetTool;
pub use runway::CashRunwayTool;

/// Arguments handed to a tool by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInput {
    pub intent: Intent,
    /// "MonthName YYYY", for month-scoped metrics
    pub month: Option<String>,
}

impl ToolInput {
    pub fn target_month(&self) -> Result<CalendarMonth> {
        let raw = self.month.as_deref().unwrap_or_default();
        CalendarMonth::parse_label(raw)
    }
}

/// Trait for a single metric tool (deterministic, side-effect free)
pub trait Tool: Send + Sync {
    fn intent(&self) -> Intent;
    fn description(&self) -> &'static str;
    fn execute(&self, input: &ToolInput) -> MetricResult;
}

/// Tool registry keyed by the intent each tool answers
pub struct ToolRegistry {
    tools: HashMap<Intent, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.intent(), tool);
    }

    pub fn get(&self, intent: Intent) -> Option<Arc<dyn Tool>> {
        self.tools.get(&intent).cloned()
    }

    pub fn list(&self) -> Vec<Intent> {
        self.tools.keys().copied().collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Text returned when a month argument does not read as "MonthName YYYY"
pub(crate) fn invalid_month_text(raw: &str) -> String {
    format!(
        "Error: Invalid date format received: '{}'. Please use 'Month YYYY'.",
        raw
    )
}

/// Last-resort text for errors a tool has no specific wording for
pub(crate) fn unexpected_error_text(err: &CopilotError) -> String {
    format!("Error: {}", err)
}

/// Sum `value_usd` over rows in `month` that satisfy `filter`.
/// Returns the sum and how many rows matched.
pub(crate) fn sum_usd<F>(rows: &[NormalizedRow], month: CalendarMonth, filter: F) -> (f64, usize)
where
    F: Fn(&NormalizedRow) -> bool,
{
    rows.iter()
        .filter(|row| row.month == month && filter(row))
        .fold((0.0, 0), |(sum, n), row| (sum + row.value_usd, n + 1))
}

/// Create a registry with all five metric tools over one dataset.
pub fn create_default_registry(
    dataset: Arc<Dataset>,
    renderer: Arc<dyn ChartRenderer>,
    config: &CopilotConfig,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(RevenueVsBudgetTool::new(
        dataset.clone(),
        renderer.clone(),
    )));
    registry.register(Arc::new(GrossMarginTrendTool::new(
        dataset.clone(),
        renderer.clone(),
        config.trend_months,
    )));
    registry.register(Arc::new(OpexBreakdownTool::new(dataset.clone(), renderer)));
    registry.register(Arc::new(CashRunwayTool::new(
        dataset.clone(),
        config.burn_months,
    )));
    registry.register(Arc::new(EbitdaProxyTool::new(dataset)));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::JsonChartRenderer;
    use crate::dataset::fixtures::*;

    #[test]
    fn test_default_registry_covers_every_metric() {
        let registry = create_default_registry(
            Arc::new(sample_dataset()),
            Arc::new(JsonChartRenderer),
            &CopilotConfig::default(),
        );

        for intent in [
            Intent::RevenueVsBudget,
            Intent::GrossMarginTrend,
            Intent::OpexBreakdown,
            Intent::CashRunway,
            Intent::EbitdaProxy,
        ] {
            let tool = registry.get(intent).expect("tool registered");
            assert_eq!(tool.intent(), intent);
            assert!(!tool.description().is_empty());
        }
        assert!(registry.get(Intent::Unknown).is_none());
        assert_eq!(registry.list().len(), 5);
    }

    #[test]
    fn test_target_month() {
        let input = ToolInput {
            intent: Intent::EbitdaProxy,
            month: Some("June 2025".to_string()),
        };
        assert_eq!(input.target_month().unwrap(), month(2025, 6));

        let missing = ToolInput {
            intent: Intent::EbitdaProxy,
            month: None,
        };
        assert!(matches!(
            missing.target_month(),
            Err(CopilotError::InvalidMonthFormat(_))
        ));
    }

    #[test]
    fn test_sum_usd_filters_by_month_and_predicate() {
        let dataset = sample_dataset();
        let (revenue, n) = sum_usd(dataset.actuals(), month(2025, 6), |r| r.is_revenue());
        assert_eq!(revenue, 1100.0);
        assert_eq!(n, 2);

        let (none, n) = sum_usd(dataset.actuals(), month(2024, 6), |r| r.is_revenue());
        assert_eq!(none, 0.0);
        assert_eq!(n, 0);
    }
}
