//! Runtime configuration
//!
//! Values come from the process environment (optionally seeded from a
//! `.env` file by the binary).

use crate::error::CopilotError;
use crate::Result;
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Year assumed when a query names a month without one
pub const DEFAULT_REFERENCE_YEAR: i32 = 2025;
pub const DEFAULT_TREND_MONTHS: u32 = 3;
pub const DEFAULT_BURN_MONTHS: u32 = 3;
pub const DEFAULT_DATA_DIR: &str = "fixtures";

/// What to do with a non-USD ledger row that has no FX rate for its month.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FxFallback {
    /// Treat the amount as USD (rate 1.0) and log a warning
    #[default]
    AssumeUsd,
    /// Refuse to build the dataset
    Reject,
}

impl FromStr for FxFallback {
    type Err = CopilotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assume-usd" | "assume_usd" => Ok(FxFallback::AssumeUsd),
            "reject" => Ok(FxFallback::Reject),
            other => Err(CopilotError::Config(format!(
                "COPILOT_FX_FALLBACK must be 'assume-usd' or 'reject', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CopilotConfig {
    pub reference_year: i32,
    pub fx_fallback: FxFallback,
    /// Trailing window for the gross margin trend
    pub trend_months: u32,
    /// Trailing burns averaged for the cash runway
    pub burn_months: u32,
    pub data_dir: PathBuf,
    pub chart_dir: Option<PathBuf>,
}

impl Default for CopilotConfig {
    fn default() -> Self {
        Self {
            reference_year: DEFAULT_REFERENCE_YEAR,
            fx_fallback: FxFallback::default(),
            trend_months: DEFAULT_TREND_MONTHS,
            burn_months: DEFAULT_BURN_MONTHS,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            chart_dir: None,
        }
    }
}

impl CopilotConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(year) = lookup("COPILOT_REFERENCE_YEAR") {
            config.reference_year = parse_number("COPILOT_REFERENCE_YEAR", &year)?;
        }
        if let Some(policy) = lookup("COPILOT_FX_FALLBACK") {
            config.fx_fallback = policy.parse()?;
        }
        if let Some(n) = lookup("COPILOT_TREND_MONTHS") {
            config.trend_months = parse_window("COPILOT_TREND_MONTHS", &n)?;
        }
        if let Some(n) = lookup("COPILOT_BURN_MONTHS") {
            config.burn_months = parse_window("COPILOT_BURN_MONTHS", &n)?;
        }
        if let Some(dir) = lookup("COPILOT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.chart_dir = lookup("COPILOT_CHART_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| CopilotError::Config(format!("{} is not a valid number: '{}'", key, raw)))
}

fn parse_window(key: &str, raw: &str) -> Result<u32> {
    let n: u32 = parse_number(key, raw)?;
    if n == 0 {
        return Err(CopilotError::Config(format!("{} must be at least 1", key)));
    }
    Ok(n)
}
