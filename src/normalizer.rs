//! Currency normalizer
//!
//! Left-joins ledger rows to FX rates on exact (month, currency) and
//! resolves every row to a USD value. No metric may aggregate raw amounts.

use crate::calendar::CalendarMonth;
use crate::config::FxFallback;
use crate::error::CopilotError;
use crate::models::{FxRate, LedgerRow, NormalizedRow};
use crate::Result;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

pub const BASE_CURRENCY: &str = "USD";

/// FX rates keyed by (month, trimmed currency code)
#[derive(Debug, Clone, Default)]
pub struct FxTable {
    rates: HashMap<(CalendarMonth, String), f64>,
}

impl FxTable {
    /// Build the lookup, enforcing at most one rate per (month, currency).
    pub fn build(rates: &[FxRate]) -> Result<Self> {
        let mut table = HashMap::with_capacity(rates.len());

        for fx in rates {
            let key = (fx.month, fx.currency.trim().to_string());
            if table.insert(key, fx.rate_to_usd).is_some() {
                return Err(CopilotError::DuplicateFxRate {
                    month: fx.month.label(),
                    currency: fx.currency.trim().to_string(),
                });
            }
        }

        Ok(Self { rates: table })
    }

    pub fn rate(&self, month: CalendarMonth, currency: &str) -> Option<f64> {
        self.rates.get(&(month, currency.to_string())).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Summary of one normalization pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizationReport {
    pub rows: usize,
    pub matched: usize,
    /// Non-USD (month, currency) pairs that had no rate and fell back to 1.0
    pub fallbacks: BTreeSet<(CalendarMonth, String)>,
}

/// Resolve `value_usd` for every row. The mapping is total: one output row
/// per input row, in input order.
pub fn normalize(
    table: &str,
    rows: &[LedgerRow],
    fx: &FxTable,
    policy: FxFallback,
) -> Result<(Vec<NormalizedRow>, NormalizationReport)> {
    let mut normalized = Vec::with_capacity(rows.len());
    let mut report = NormalizationReport {
        rows: rows.len(),
        ..Default::default()
    };

    for row in rows {
        let currency = row.currency.trim();

        let rate_to_usd = match fx.rate(row.month, currency) {
            Some(rate) => {
                report.matched += 1;
                rate
            }
            None if currency.eq_ignore_ascii_case(BASE_CURRENCY) => 1.0,
            None => match policy {
                FxFallback::AssumeUsd => {
                    report.fallbacks.insert((row.month, currency.to_string()));
                    1.0
                }
                FxFallback::Reject => {
                    return Err(CopilotError::MissingFxRate {
                        month: row.month.label(),
                        currency: currency.to_string(),
                    });
                }
            },
        };

        normalized.push(NormalizedRow {
            month: row.month,
            account_category: row.account_category.clone(),
            amount: row.amount,
            currency: currency.to_string(),
            rate_to_usd,
            value_usd: row.amount * rate_to_usd,
        });
    }

    for (month, currency) in &report.fallbacks {
        warn!(
            table,
            month = %month,
            currency = %currency,
            "No FX rate published; treating amounts as USD"
        );
    }

    debug!(
        table,
        rows = report.rows,
        matched = report.matched,
        fallbacks = report.fallbacks.len(),
        "Normalized ledger to USD"
    );

    Ok((normalized, report))
}
