//! Gross margin trend over a trailing window of months

use crate::calendar::CalendarMonth;
use crate::chart::{render_or_skip, ChartKind, ChartRenderer, ChartSpec, MonthPoint, Series};
use crate::dataset::Dataset;
use crate::error::CopilotError;
use crate::fmt::percent;
use crate::models::{Intent, MetricResult};
use crate::tools::{unexpected_error_text, Tool, ToolInput};
use crate::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginPoint {
    pub month: CalendarMonth,
    pub revenue: f64,
    pub cogs: f64,
}

impl MarginPoint {
    pub fn gross_margin(&self) -> f64 {
        self.revenue - self.cogs
    }

    /// Gross margin as a percentage of revenue; `None` without revenue
    pub fn gross_margin_pct(&self) -> Option<f64> {
        (self.revenue != 0.0).then(|| self.gross_margin() / self.revenue * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GrossMarginTrend {
    pub window: u32,
    /// Chronological; only months with actuals rows
    pub points: Vec<MarginPoint>,
}

/// Window ends at the latest month present in actuals and spans `window` months.
pub fn compute(dataset: &Dataset, window: u32) -> Result<GrossMarginTrend> {
    let window = window.max(1);

    let latest = dataset
        .actuals()
        .iter()
        .map(|row| row.month)
        .max()
        .ok_or_else(|| CopilotError::EmptyResult("actuals".to_string()))?;
    let start = latest.months_back(window - 1);

    let mut by_month: BTreeMap<CalendarMonth, MarginPoint> = BTreeMap::new();
    for row in dataset
        .actuals()
        .iter()
        .filter(|row| row.month >= start && row.month <= latest)
    {
        let point = by_month.entry(row.month).or_insert(MarginPoint {
            month: row.month,
            revenue: 0.0,
            cogs: 0.0,
        });
        if row.is_revenue() {
            point.revenue += row.value_usd;
        } else if row.is_cogs() {
            point.cogs += row.value_usd;
        }
    }

    debug!(start = %start, latest = %latest, months = by_month.len(), "Gross margin trend computed");

    Ok(GrossMarginTrend {
        window,
        points: by_month.into_values().collect(),
    })
}

pub fn summarize(report: &GrossMarginTrend) -> String {
    let mut out = format!("**Gross Margin % Trend (Last {} Months):**\n", report.window);
    for point in &report.points {
        match point.gross_margin_pct() {
            Some(pct) => out.push_str(&format!("- **{}:** `{}`\n", point.month, percent(pct))),
            None => out.push_str(&format!("- **{}:** `n/a` (no revenue)\n", point.month)),
        }
    }
    out
}

pub fn chart_spec(report: &GrossMarginTrend) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        title: format!("Gross Margin % Trend (Last {} Months)", report.window),
        y_label: Some("Gross Margin %".to_string()),
        series: Series::Months(
            report
                .points
                .iter()
                .filter_map(|p| p.gross_margin_pct().map(|pct| MonthPoint::new(p.month, pct)))
                .collect(),
        ),
    }
}

pub struct GrossMarginTrendTool {
    dataset: Arc<Dataset>,
    renderer: Arc<dyn ChartRenderer>,
    window: u32,
}

impl GrossMarginTrendTool {
    pub fn new(dataset: Arc<Dataset>, renderer: Arc<dyn ChartRenderer>, window: u32) -> Self {
        Self {
            dataset,
            renderer,
            window,
        }
    }
}

impl Tool for GrossMarginTrendTool {
    fn intent(&self) -> Intent {
        Intent::GrossMarginTrend
    }

    fn description(&self) -> &'static str {
        "Monthly gross margin % over the most recent months of actuals"
    }

    /// Ignores the month argument; the window always ends at the latest actuals month.
    fn execute(&self, _input: &ToolInput) -> MetricResult {
        let report = match compute(&self.dataset, self.window) {
            Ok(report) => report,
            Err(CopilotError::EmptyResult(_)) => {
                return MetricResult::text_only(
                    "No actuals data found to compute a gross margin trend.",
                )
            }
            Err(e) => return MetricResult::text_only(unexpected_error_text(&e)),
        };

        let chart = render_or_skip(self.renderer.as_ref(), &chart_spec(&report));
        MetricResult::with_chart(summarize(&report), chart)
    }
}
