//! CSV ingestion for the four statement tables
//!
//! Month cells are parsed into calendar months here, once, so nothing
//! downstream ever compares raw date strings.

use crate::calendar::CalendarMonth;
use crate::dataset::RawTables;
use crate::error::CopilotError;
use crate::models::{CashBalance, FxRate, LedgerRow};
use crate::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

pub const ACTUALS_FILE: &str = "actuals.csv";
pub const BUDGET_FILE: &str = "budget.csv";
pub const CASH_FILE: &str = "cash.csv";
pub const FX_FILE: &str = "fx.csv";

// Extra columns such as `entity` are ignored.

#[derive(Debug, Deserialize)]
struct LedgerRecord {
    month: String,
    account_category: String,
    amount: f64,
    currency: String,
}

#[derive(Debug, Deserialize)]
struct CashRecord {
    month: String,
    cash_usd: f64,
}

#[derive(Debug, Deserialize)]
struct FxRecord {
    month: String,
    currency: String,
    rate_to_usd: f64,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Read an actuals or budget table
pub fn read_ledger<R: Read>(reader: R) -> Result<Vec<LedgerRow>> {
    let mut rdr = csv_reader(reader);
    let mut rows = Vec::new();

    for record in rdr.deserialize::<LedgerRecord>() {
        let record = record?;
        rows.push(LedgerRow {
            month: CalendarMonth::parse_source(&record.month)?,
            account_category: record.account_category,
            amount: record.amount,
            currency: record.currency,
        });
    }

    Ok(rows)
}

/// Read cash balances, summing entities that share a month so the result
/// has exactly one row per month, in month order.
pub fn read_cash<R: Read>(reader: R) -> Result<Vec<CashBalance>> {
    let mut rdr = csv_reader(reader);
    let mut by_month: BTreeMap<CalendarMonth, f64> = BTreeMap::new();

    for record in rdr.deserialize::<CashRecord>() {
        let record = record?;
        let month = CalendarMonth::parse_source(&record.month)?;
        *by_month.entry(month).or_insert(0.0) += record.cash_usd;
    }

    Ok(by_month
        .into_iter()
        .map(|(month, cash_balance_usd)| CashBalance {
            month,
            cash_balance_usd,
        })
        .collect())
}

pub fn read_fx<R: Read>(reader: R) -> Result<Vec<FxRate>> {
    let mut rdr = csv_reader(reader);
    let mut rows = Vec::new();

    for record in rdr.deserialize::<FxRecord>() {
        let record = record?;
        rows.push(FxRate {
            month: CalendarMonth::parse_source(&record.month)?,
            currency: record.currency,
            rate_to_usd: record.rate_to_usd,
        });
    }

    Ok(rows)
}

fn open(dir: &Path, name: &str) -> Result<BufReader<File>> {
    let path = dir.join(name);
    File::open(&path)
        .map(BufReader::new)
        .map_err(|source| CopilotError::SourceFile {
            path: path.display().to_string(),
            source,
        })
}

/// Load `actuals.csv`, `budget.csv`, `cash.csv` and `fx.csv` from `dir`.
pub fn load_dir(dir: &Path) -> Result<RawTables> {
    let tables = RawTables {
        actuals: read_ledger(open(dir, ACTUALS_FILE)?)?,
        budget: read_ledger(open(dir, BUDGET_FILE)?)?,
        cash: read_cash(open(dir, CASH_FILE)?)?,
        fx: read_fx(open(dir, FX_FILE)?)?,
    };

    info!(
        dir = %dir.display(),
        actuals = tables.actuals.len(),
        budget = tables.budget.len(),
        cash = tables.cash.len(),
        fx = tables.fx.len(),
        "Statements loaded"
    );

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FxFallback;
    use crate::dataset::Dataset;

    fn month(year: i32, m: u32) -> CalendarMonth {
        CalendarMonth::new(year, m).unwrap()
    }

    #[test]
    fn test_read_ledger_ignores_extra_columns() {
        let csv = "month,entity,account_category,amount,currency\n\
                   2025-06-01,ParentCo,Revenue,1000.5,USD\n\
                   2025-06-01,EMEA,Opex:Marketing, 250 ,EUR \n";

        let rows = read_ledger(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].month, month(2025, 6));
        assert_eq!(rows[0].account_category, "Revenue");
        assert_eq!(rows[0].amount, 1000.5);
        assert_eq!(rows[1].amount, 250.0);
        assert_eq!(rows[1].currency, "EUR");
    }

    #[test]
    fn test_read_cash_consolidates_entities() {
        let csv = "month,entity,cash_usd\n\
                   2025-02-01,ParentCo,500\n\
                   2025-01-01,ParentCo,700\n\
                   2025-01-01,EMEA,300\n";

        let rows = read_cash(csv.as_bytes()).unwrap();

        assert_eq!(
            rows,
            vec![
                CashBalance {
                    month: month(2025, 1),
                    cash_balance_usd: 1000.0,
                },
                CashBalance {
                    month: month(2025, 2),
                    cash_balance_usd: 500.0,
                },
            ]
        );
    }

    #[test]
    fn test_read_fx() {
        let csv = "month,currency,rate_to_usd\n2025-03,EUR,1.08\n";
        let rows = read_fx(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].month, month(2025, 3));
        assert_eq!(rows[0].rate_to_usd, 1.08);
    }

    #[test]
    fn test_bad_month_cell_fails() {
        let csv = "month,currency,rate_to_usd\nMarch,EUR,1.08\n";
        assert!(matches!(
            read_fx(csv.as_bytes()),
            Err(CopilotError::InvalidSourceMonth(_))
        ));
    }

    #[test]
    fn test_non_numeric_amount_fails() {
        let csv = "month,account_category,amount,currency\n2025-01-01,Revenue,lots,USD\n";
        assert!(matches!(read_ledger(csv.as_bytes()), Err(CopilotError::Csv(_))));
    }

    #[test]
    fn test_fx_join_ignores_day_of_month() {
        let ledger = "month,account_category,amount,currency\n\
                      2025-06-15,Revenue,200,EUR\n\
                      2025-06-30,COGS,100,EUR\n";
        let fx = "month,currency,rate_to_usd\n2025-06-01,EUR,1.5\n";

        let raw = RawTables {
            actuals: read_ledger(ledger.as_bytes()).unwrap(),
            fx: read_fx(fx.as_bytes()).unwrap(),
            ..Default::default()
        };
        let dataset = Dataset::build(raw, FxFallback::Reject).unwrap();

        let values: Vec<f64> = dataset.actuals().iter().map(|r| r.value_usd).collect();
        assert_eq!(values, vec![300.0, 150.0]);
        assert!(dataset.actuals().iter().all(|r| r.rate_to_usd == 1.5));
    }

    #[test]
    fn test_load_dir_reports_missing_file() {
        let err = load_dir(Path::new("/nonexistent/statements")).unwrap_err();
        match err {
            CopilotError::SourceFile { path, .. } => assert!(path.ends_with(ACTUALS_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_bundled_fixtures() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
        let tables = load_dir(&dir).unwrap();
        assert!(!tables.actuals.is_empty());
        assert!(!tables.budget.is_empty());
        assert!(!tables.cash.is_empty());
        assert!(!tables.fx.is_empty());
    }
}
