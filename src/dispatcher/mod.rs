//! Dispatcher: routes a planned intent to its metric tool
//!
//! Tool results are forwarded untouched; each tool owns the wording of its
//! own failures.

use crate::models::{Intent, MetricResult, Plan};
use crate::tools::{ToolInput, ToolRegistry};
use std::time::Instant;
use tracing::{debug, warn};

pub const FALLBACK_TEXT: &str = "I can answer questions about `Revenue vs Budget`, `Gross Margin`, `Opex`, `EBITDA`, and `Cash Runway`. Please try one of those.";

pub struct Dispatcher {
    tool_registry: ToolRegistry,
}

impl Dispatcher {
    pub fn new(tool_registry: ToolRegistry) -> Self {
        Self { tool_registry }
    }

    pub fn dispatch(&self, plan: &Plan) -> MetricResult {
        if plan.intent == Intent::Unknown {
            debug!("No intent recognised; returning fallback");
            return MetricResult::text_only(FALLBACK_TEXT);
        }

        let Some(tool) = self.tool_registry.get(plan.intent) else {
            warn!(intent = ?plan.intent, "Tool not registered");
            return MetricResult::text_only(FALLBACK_TEXT);
        };

        let input = ToolInput {
            intent: plan.intent,
            month: plan.intent.takes_month().then(|| plan.month.clone()),
        };

        let start = Instant::now();
        let result = tool.execute(&input);

        debug!(
            intent = ?plan.intent,
            month = ?input.month,
            has_chart = result.chart.is_some(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Tool executed"
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::JsonChartRenderer;
    use crate::config::CopilotConfig;
    use crate::dataset::fixtures::*;
    use crate::tools::{create_default_registry, EbitdaProxyTool, Tool};
    use std::sync::{Arc, Mutex};

    fn plan(intent: Intent, month: &str) -> Plan {
        Plan {
            intent,
            month: month.to_string(),
            defaulted: false,
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(create_default_registry(
            Arc::new(sample_dataset()),
            Arc::new(JsonChartRenderer),
            &CopilotConfig::default(),
        ))
    }

    /// Records the input it was called with
    struct SpyTool {
        intent: Intent,
        seen: Mutex<Vec<ToolInput>>,
    }

    impl Tool for SpyTool {
        fn intent(&self) -> Intent {
            self.intent
        }

        fn description(&self) -> &'static str {
            "spy"
        }

        fn execute(&self, input: &ToolInput) -> MetricResult {
            self.seen.lock().unwrap().push(input.clone());
            MetricResult::text_only("spied")
        }
    }

    #[test]
    fn test_unknown_intent_returns_fallback() {
        let result = dispatcher().dispatch(&plan(Intent::Unknown, "December 2025"));
        assert!(result.text.starts_with("I can answer questions about"));
        assert!(result.chart.is_none());
    }

    #[test]
    fn test_unregistered_intent_returns_fallback() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EbitdaProxyTool::new(Arc::new(sample_dataset()))));
        let dispatcher = Dispatcher::new(registry);

        let result = dispatcher.dispatch(&plan(Intent::CashRunway, "December 2025"));
        assert_eq!(result.text, FALLBACK_TEXT);
        assert!(result.chart.is_none());
    }

    #[test]
    fn test_month_passed_only_to_month_scoped_tools() {
        let spies: Vec<Arc<SpyTool>> = [Intent::OpexBreakdown, Intent::CashRunway]
            .into_iter()
            .map(|intent| {
                Arc::new(SpyTool {
                    intent,
                    seen: Mutex::new(Vec::new()),
                })
            })
            .collect();

        let mut registry = ToolRegistry::new();
        for spy in &spies {
            registry.register(spy.clone());
        }
        let dispatcher = Dispatcher::new(registry);

        dispatcher.dispatch(&plan(Intent::OpexBreakdown, "June 2025"));
        dispatcher.dispatch(&plan(Intent::CashRunway, "June 2025"));

        assert_eq!(
            spies[0].seen.lock().unwrap()[0].month.as_deref(),
            Some("June 2025")
        );
        assert_eq!(spies[1].seen.lock().unwrap()[0].month, None);
    }

    #[test]
    fn test_tool_text_is_forwarded_unchanged() {
        let result = dispatcher().dispatch(&plan(Intent::EbitdaProxy, "June 20x5"));
        assert_eq!(
            result.text,
            "Error: Invalid date format received: 'June 20x5'. Please use 'Month YYYY'."
        );
    }

    #[test]
    fn test_routes_each_intent() {
        let dispatcher = dispatcher();
        let cases = [
            (Intent::RevenueVsBudget, "**Revenue for June 2025:**"),
            (Intent::GrossMarginTrend, "**Gross Margin % Trend"),
            (Intent::OpexBreakdown, "**Opex Breakdown for June 2025"),
            (Intent::CashRunway, "**Cash Runway Analysis:**"),
            (Intent::EbitdaProxy, "**EBITDA (Proxy) for June 2025:**"),
        ];

        for (intent, prefix) in cases {
            let result = dispatcher.dispatch(&plan(intent, "June 2025"));
            assert!(result.text.starts_with(prefix), "{intent}: {}", result.text);
        }
    }
}
