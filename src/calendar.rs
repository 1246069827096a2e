//! Calendar-month value type
//!
//! Every month field in the source tables is truncated to (year, month)
//! once at ingestion so that joins and filters compare like with like.

use crate::error::CopilotError;
use crate::Result;
use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Accepted layouts for month cells in source tables
const SOURCE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// A (year, month) pair; day-of-month is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Parse a month cell from a source table (`2025-06-01`, `2025-06`, `2025/06/01`).
    pub fn parse_source(raw: &str) -> Result<Self> {
        let s = raw.trim();

        for format in SOURCE_DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                return Ok(Self::from_date(date));
            }
        }

        // Year-month only
        NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
            .map(Self::from_date)
            .map_err(|_| CopilotError::InvalidSourceMonth(raw.to_string()))
    }

    /// Parse a "MonthName YYYY" label, e.g. "June 2025". Month names are
    /// case-insensitive and must be spelled in full.
    pub fn parse_label(label: &str) -> Result<Self> {
        let invalid = || CopilotError::InvalidMonthFormat(label.to_string());

        let mut parts = label.split_whitespace();
        let (Some(name), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };

        let month = MONTH_NAMES
            .iter()
            .position(|m| m.eq_ignore_ascii_case(name))
            .ok_or_else(invalid)?;

        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;

        Ok(Self {
            year,
            month: month as u32 + 1,
        })
    }

    /// Full month name
    pub fn name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// "June 2025"
    pub fn label(&self) -> String {
        format!("{} {}", self.name(), self.year)
    }

    /// "Jun 2025"
    pub fn short_label(&self) -> String {
        format!("{} {}", &self.name()[..3], self.year)
    }

    /// The month `n` months before this one.
    pub fn months_back(&self, n: u32) -> Self {
        let index = self.year * 12 + self.month as i32 - 1 - n as i32;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}

impl Serialize for CalendarMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:04}-{:02}", self.year, self.month))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, month: u32) -> CalendarMonth {
        CalendarMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_parse_source_discards_day() {
        assert_eq!(CalendarMonth::parse_source("2025-06-17").unwrap(), month(2025, 6));
        assert_eq!(CalendarMonth::parse_source(" 2025-06-01 ").unwrap(), month(2025, 6));
        assert_eq!(CalendarMonth::parse_source("2025-06").unwrap(), month(2025, 6));
        assert_eq!(CalendarMonth::parse_source("2025/06/30").unwrap(), month(2025, 6));
    }

    #[test]
    fn test_parse_source_rejects_garbage() {
        assert!(matches!(
            CalendarMonth::parse_source("June"),
            Err(CopilotError::InvalidSourceMonth(_))
        ));
        assert!(CalendarMonth::parse_source("2025-13-01").is_err());
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(CalendarMonth::parse_label("June 2025").unwrap(), month(2025, 6));
        assert_eq!(CalendarMonth::parse_label("december 2024").unwrap(), month(2024, 12));
        assert_eq!(CalendarMonth::parse_label("  March   2026 ").unwrap(), month(2026, 3));
    }

    #[test]
    fn test_parse_label_rejects_bad_formats() {
        for bad in ["Jun 2025", "June", "2025 June", "June 25", "June 2025 extra", "", "Juno 2025"] {
            assert!(
                matches!(
                    CalendarMonth::parse_label(bad),
                    Err(CopilotError::InvalidMonthFormat(_))
                ),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_labels() {
        let m = month(2025, 9);
        assert_eq!(m.label(), "September 2025");
        assert_eq!(m.short_label(), "Sep 2025");
        assert_eq!(m.to_string(), "September 2025");
    }

    #[test]
    fn test_months_back_crosses_year() {
        assert_eq!(month(2025, 2).months_back(2), month(2024, 12));
        assert_eq!(month(2025, 6).months_back(0), month(2025, 6));
        assert_eq!(month(2025, 1).months_back(13), month(2023, 12));
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(month(2024, 12) < month(2025, 1));
        assert!(month(2025, 2) > month(2025, 1));
    }

    #[test]
    fn test_serializes_as_iso_month() {
        assert_eq!(serde_json::to_string(&month(2025, 3)).unwrap(), "\"2025-03\"");
    }
}
