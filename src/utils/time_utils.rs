use chrono::{DateTime, Utc};

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const MS_IN_MIN: i64 = Self::MS_IN_S * 60;
    pub const MS_IN_3_MIN: i64 = Self::MS_IN_S * 60 * 3;
    pub const MS_IN_5_MIN: i64 = Self::MS_IN_S * 60 * 5;
    pub const MS_IN_15_MIN: i64 = Self::MS_IN_S * 60 * 15;
    pub const MS_IN_30_MIN: i64 = Self::MS_IN_S * 60 * 30;
    pub const MS_IN_H: i64 = Self::MS_IN_MIN * 60;
    pub const MS_IN_2_H: i64 = Self::MS_IN_MIN * 60 * 2;
    pub const MS_IN_4_H: i64 = Self::MS_IN_MIN * 60 * 4;
    pub const MS_IN_6_H: i64 = Self::MS_IN_MIN * 60 * 6;
    pub const MS_IN_8_H: i64 = Self::MS_IN_MIN * 60 * 8;
    pub const MS_IN_12_H: i64 = Self::MS_IN_MIN * 60 * 12;
    pub const MS_IN_D: i64 = Self::MS_IN_H * 24;
    pub const MS_IN_3_D: i64 = Self::MS_IN_H * 24 * 3;
    pub const MS_IN_W: i64 = Self::MS_IN_D * 7;
    pub const MS_IN_1_M: i64 = Self::MS_IN_D * 30;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";
    pub const INTRADAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

    /// Convert interval in milliseconds to a Binance-style shorthand (e.g. `30m`, `1h`).
    pub fn interval_ms_to_string(interval_ms: i64) -> &'static str {
        match interval_ms {
            Self::MS_IN_S => "1s",
            Self::MS_IN_MIN => "1m",
            Self::MS_IN_3_MIN => "3m",
            Self::MS_IN_5_MIN => "5m",
            Self::MS_IN_15_MIN => "15m",
            Self::MS_IN_30_MIN => "30m",
            Self::MS_IN_H => "1h",
            Self::MS_IN_2_H => "2h",
            Self::MS_IN_4_H => "4h",
            Self::MS_IN_6_H => "6h",
            Self::MS_IN_8_H => "8h",
            Self::MS_IN_12_H => "12h",
            Self::MS_IN_D => "1d",
            Self::MS_IN_3_D => "3d",
            Self::MS_IN_W => "1w",
            Self::MS_IN_1_M => "1M",
            _ => "unknown",
        }
    }

    /// Inverse of `interval_ms_to_string`. Also accepts the `1wk` / `1mo` spellings
    /// used by most equity data vendors.
    pub fn interval_string_to_ms(text: &str) -> Option<i64> {
        let ms = match text.trim() {
            "1s" => Self::MS_IN_S,
            "1m" => Self::MS_IN_MIN,
            "3m" => Self::MS_IN_3_MIN,
            "5m" => Self::MS_IN_5_MIN,
            "15m" => Self::MS_IN_15_MIN,
            "30m" => Self::MS_IN_30_MIN,
            "1h" => Self::MS_IN_H,
            "2h" => Self::MS_IN_2_H,
            "4h" => Self::MS_IN_4_H,
            "6h" => Self::MS_IN_6_H,
            "8h" => Self::MS_IN_8_H,
            "12h" => Self::MS_IN_12_H,
            "1d" => Self::MS_IN_D,
            "3d" => Self::MS_IN_3_D,
            "1w" | "1wk" => Self::MS_IN_W,
            "1M" | "1mo" => Self::MS_IN_1_M,
            _ => return None,
        };
        Some(ms)
    }
}

pub fn epoch_ms_to_utc(epoch_ms: i64) -> String {
    // Used for display purposes
    match DateTime::<Utc>::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.format(TimeUtils::STANDARD_TIME_FORMAT).to_string(),
        None => String::new(),
    }
}

/// Like `epoch_ms_to_utc`, but keeps hours and minutes for intraday charts.
pub fn epoch_ms_to_utc_intraday(epoch_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.format(TimeUtils::INTRADAY_TIME_FORMAT).to_string(),
        None => String::new(),
    }
}

pub fn utc_now_as_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_strings_round_trip_through_ms() {
        for text in ["1m", "15m", "1h", "4h", "1d", "1w", "1M"] {
            let ms = TimeUtils::interval_string_to_ms(text).unwrap();
            assert_eq!(TimeUtils::interval_ms_to_string(ms), text);
        }
    }

    #[test]
    fn vendor_aliases_are_accepted() {
        assert_eq!(TimeUtils::interval_string_to_ms("1wk"), Some(TimeUtils::MS_IN_W));
        assert_eq!(TimeUtils::interval_string_to_ms("1mo"), Some(TimeUtils::MS_IN_1_M));
        assert_eq!(TimeUtils::interval_string_to_ms("7x"), None);
    }

    #[test]
    fn formats_dates_in_utc() {
        let midnight = 1_700_006_400_000; // 2023-11-15 00:00:00 UTC
        let late = midnight + TimeUtils::MS_IN_D - 1;
        assert_eq!(epoch_ms_to_utc(midnight), "2023-11-15");
        assert_eq!(epoch_ms_to_utc(late), "2023-11-15");
        assert_eq!(epoch_ms_to_utc_intraday(late), "2023-11-15 23:59");
    }
}
