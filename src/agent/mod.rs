//! Copilot - the caller-facing entry point
//!
//! QUERY → PLAN → DISPATCH → RESULT
//!
//! One query in, one result out. Nothing is retained between calls; the
//! only shared state is the read-only dataset.

use crate::chart::ChartRenderer;
use crate::config::CopilotConfig;
use crate::dataset::{Dataset, RawTables};
use crate::dispatcher::Dispatcher;
use crate::models::{MetricResult, Plan};
use crate::planner::{KeywordPlanner, Planner};
use crate::tools::create_default_registry;
use crate::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub struct Copilot {
    planner: Box<dyn Planner>,
    dispatcher: Dispatcher,
    dataset: Arc<Dataset>,
}

impl Copilot {
    pub fn new(planner: Box<dyn Planner>, dispatcher: Dispatcher, dataset: Arc<Dataset>) -> Self {
        Self {
            planner,
            dispatcher,
            dataset,
        }
    }

    /// Normalize the tables once and wire the keyword planner to the five metric tools.
    pub fn from_tables(
        raw: RawTables,
        config: &CopilotConfig,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Result<Self> {
        let dataset = Arc::new(Dataset::build(raw, config.fx_fallback)?);
        let registry = create_default_registry(dataset.clone(), renderer, config);

        Ok(Self::new(
            Box::new(KeywordPlanner::new(config.reference_year)),
            Dispatcher::new(registry),
            dataset,
        ))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn plan(&self, query: &str) -> Plan {
        self.planner.plan(query)
    }

    /// Answer one query. Never fails: every path yields readable text.
    pub fn answer(&self, query: &str) -> MetricResult {
        let start = Instant::now();

        let plan = self.plan(query);
        if plan.defaulted && plan.intent.takes_month() {
            debug!(month = %plan.month, "Month not fully stated in query; using default");
        }

        let result = self.dispatcher.dispatch(&plan);

        info!(
            intent = ?plan.intent,
            month = %plan.month,
            defaulted = plan.defaulted,
            has_chart = result.chart.is_some(),
            dataset = %self.dataset.fingerprint(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Query answered"
        );

        result
    }
}
