//! Chart specifications and the rendering seam
//!
//! Metrics describe what to draw; a `ChartRenderer` turns that into an
//! opaque payload for the caller. Rasterization lives outside this crate.

use crate::calendar::CalendarMonth;
use crate::error::CopilotError;
use crate::Result;
use serde::Serialize;
use tracing::warn;

pub const CHART_JSON_MEDIA_TYPE: &str = "application/vnd.cfo-copilot.chart+json";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    /// Rendered as a donut
    Pie,
    Line,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", content = "points", rename_all = "snake_case")]
pub enum Series {
    Categories(Vec<(String, f64)>),
    Months(Vec<MonthPoint>),
}

/// A month-indexed value with its abbreviated axis label ("Jun 2025")
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthPoint {
    pub month: CalendarMonth,
    pub label: String,
    pub value: f64,
}

impl MonthPoint {
    pub fn new(month: CalendarMonth, value: f64) -> Self {
        Self {
            month,
            label: month.short_label(),
            value,
        }
    }
}

impl Series {
    pub fn is_empty(&self) -> bool {
        match self {
            Series::Categories(points) => points.is_empty(),
            Series::Months(points) => points.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    pub series: Series,
}

/// Opaque rendered chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Trait for the rendering collaborator
pub trait ChartRenderer: Send + Sync {
    fn render(&self, spec: &ChartSpec) -> Result<ChartImage>;
}

/// Emits the chart spec as JSON for a front end to draw
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonChartRenderer;

impl ChartRenderer for JsonChartRenderer {
    fn render(&self, spec: &ChartSpec) -> Result<ChartImage> {
        if spec.series.is_empty() {
            return Err(CopilotError::Chart(format!(
                "'{}' has no data points",
                spec.title
            )));
        }

        Ok(ChartImage {
            media_type: CHART_JSON_MEDIA_TYPE.to_string(),
            bytes: serde_json::to_vec(spec)?,
        })
    }
}

/// Render a chart, or log and drop it on failure so the text still goes out.
pub fn render_or_skip(renderer: &dyn ChartRenderer, spec: &ChartSpec) -> Option<ChartImage> {
    match renderer.render(spec) {
        Ok(image) => Some(image),
        Err(e) => {
            warn!(title = %spec.title, error = %e, "Chart rendering failed; returning text only");
            None
        }
    }
}
