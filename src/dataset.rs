//! Source tables and the normalized, read-only dataset built from them
//!
//! The dataset is built once and never mutated, so a single instance can be
//! shared by every query.

use crate::config::FxFallback;
use crate::models::{CashBalance, FxRate, LedgerRow, NormalizedRow};
use crate::normalizer::{normalize, FxTable};
use crate::Result;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Write;
use tracing::info;

/// The four tables handed over by ingestion
#[derive(Debug, Clone, Default, Serialize)]
pub struct RawTables {
    pub actuals: Vec<LedgerRow>,
    pub budget: Vec<LedgerRow>,
    pub cash: Vec<CashBalance>,
    pub fx: Vec<FxRate>,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    actuals: Vec<NormalizedRow>,
    budget: Vec<NormalizedRow>,
    /// Sorted by month
    cash: Vec<CashBalance>,
    fingerprint: String,
}

impl Dataset {
    pub fn build(raw: RawTables, policy: FxFallback) -> Result<Self> {
        let fingerprint = compute_fingerprint(&raw)?;
        let fx = FxTable::build(&raw.fx)?;

        let (actuals, actuals_report) = normalize("actuals", &raw.actuals, &fx, policy)?;
        let (budget, budget_report) = normalize("budget", &raw.budget, &fx, policy)?;

        let mut cash = raw.cash;
        cash.sort_by_key(|row| row.month);

        info!(
            fingerprint = %fingerprint,
            actuals = actuals.len(),
            budget = budget.len(),
            cash = cash.len(),
            fx_rates = fx.len(),
            fx_fallbacks = actuals_report.fallbacks.len() + budget_report.fallbacks.len(),
            "Dataset ready"
        );

        Ok(Self {
            actuals,
            budget,
            cash,
            fingerprint,
        })
    }

    pub fn actuals(&self) -> &[NormalizedRow] {
        &self.actuals
    }

    pub fn budget(&self) -> &[NormalizedRow] {
        &self.budget
    }

    pub fn cash(&self) -> &[CashBalance] {
        &self.cash
    }

    /// SHA-256 of the raw tables this dataset was built from
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// SHA-256 over the JSON form of the raw tables, streamed into the digest.
/// Tables are serialized in field order, so equal tables give equal digests.
pub fn compute_fingerprint(raw: &RawTables) -> Result<String> {
    let mut sink = DigestSink(Sha256::new());
    serde_json::to_writer(&mut sink, raw)?;
    Ok(hex::encode(sink.0.finalize()))
}

/// `io::Write` front for a SHA-256 digest
struct DigestSink(Sha256);

impl Write for DigestSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
