//! Presentation formatting. Arithmetic keeps full precision; rounding
//! happens only here.

/// Format a USD figure with thousands separators and no decimals: $1,234
pub fn usd(val: f64) -> String {
    let whole = format!("{:.0}", val.abs());
    let with_commas = group_thousands(&whole);

    if val < 0.0 && whole != "0" {
        format!("-${with_commas}")
    } else {
        format!("${with_commas}")
    }
}

/// One decimal place with a percent sign: 60.0%
pub fn percent(val: f64) -> String {
    format!("{:.1}%", val)
}

/// One decimal place, for runway months
pub fn months(val: f64) -> String {
    format!("{:.1}", val)
}

fn group_thousands(digits: &str) -> String {
    let mut with_commas = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    with_commas.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usd_formatting() {
        assert_eq!(usd(1234.56), "$1,235");
        assert_eq!(usd(-500.0), "-$500");
        assert_eq!(usd(0.0), "$0");
        assert_eq!(usd(1000000.4), "$1,000,000");
        assert_eq!(usd(999.0), "$999");
        assert_eq!(usd(-0.2), "$0");
    }

    #[test]
    fn test_percent_and_months() {
        assert_eq!(percent(60.0), "60.0%");
        assert_eq!(percent(33.333), "33.3%");
        assert_eq!(percent(-12.08), "-12.1%");
        assert_eq!(months(6.6667), "6.7");
        assert_eq!(months(12.0), "12.0");
    }
}
