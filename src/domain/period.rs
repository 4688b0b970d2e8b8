use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};

use crate::error::ChartError;

/// How far back to fetch, in the vocabulary equity data vendors use
/// (`5d`, `1wk`, `6mo`, `2y`, `ytd`, `max`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
    YearToDate,
    Max,
}

impl Period {
    /// Earliest open time (epoch ms) to include, relative to `now`.
    /// `None` means unbounded.
    pub fn start_ms(&self, now: DateTime<Utc>) -> Option<i64> {
        let start = match *self {
            Period::Days(n) => now.checked_sub_signed(Duration::days(n as i64)),
            Period::Weeks(n) => now.checked_sub_signed(Duration::weeks(n as i64)),
            Period::Months(n) => now.checked_sub_months(Months::new(n)),
            Period::Years(n) => now.checked_sub_months(Months::new(n.saturating_mul(12))),
            Period::YearToDate => NaiveDate::from_ymd_opt(now.year(), 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|d| d.and_utc()),
            Period::Max => None,
        };
        start.map(|dt| dt.timestamp_millis())
    }
}

impl FromStr for Period {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_lowercase();
        match text.as_str() {
            "ytd" => return Ok(Period::YearToDate),
            "max" => return Ok(Period::Max),
            _ => {}
        }

        let split_at = text
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len());
        let (count, unit) = text.split_at(split_at);
        let count: u32 = count
            .parse()
            .map_err(|_| ChartError::InvalidConfig(format!("unsupported period '{}'", s)))?;
        if count == 0 {
            return Err(ChartError::InvalidConfig(format!(
                "period '{}' must be longer than zero",
                s
            )));
        }

        match unit {
            "d" => Ok(Period::Days(count)),
            "wk" | "w" => Ok(Period::Weeks(count)),
            "mo" => Ok(Period::Months(count)),
            "y" => Ok(Period::Years(count)),
            _ => Err(ChartError::InvalidConfig(format!(
                "unsupported period '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Days(n) => write!(f, "{}d", n),
            Period::Weeks(n) => write!(f, "{}wk", n),
            Period::Months(n) => write!(f, "{}mo", n),
            Period::Years(n) => write!(f, "{}y", n),
            Period::YearToDate => write!(f, "ytd"),
            Period::Max => write!(f, "max"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_vendor_period_strings() {
        assert_eq!("6mo".parse::<Period>().unwrap(), Period::Months(6));
        assert_eq!("2y".parse::<Period>().unwrap(), Period::Years(2));
        assert_eq!("5d".parse::<Period>().unwrap(), Period::Days(5));
        assert_eq!("1wk".parse::<Period>().unwrap(), Period::Weeks(1));
        assert_eq!("YTD".parse::<Period>().unwrap(), Period::YearToDate);
        assert_eq!("max".parse::<Period>().unwrap(), Period::Max);
        assert_eq!(Period::Months(6).to_string(), "6mo");
    }

    #[test]
    fn rejects_malformed_periods() {
        for bad in ["", "mo", "0d", "6months", "-1y", "3h"] {
            assert!(bad.parse::<Period>().is_err(), "accepted '{}'", bad);
        }
    }

    #[test]
    fn start_is_resolved_against_now() {
        let now = Utc.with_ymd_and_hms(2024, 8, 31, 12, 0, 0).unwrap();
        let six_months = Period::Months(6).start_ms(now).unwrap();
        assert_eq!(
            six_months,
            Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap().timestamp_millis()
        );
        let ytd = Period::YearToDate.start_ms(now).unwrap();
        assert_eq!(
            ytd,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().timestamp_millis()
        );
        assert_eq!(Period::Max.start_ms(now), None);
    }
}
