//! What to fetch when neither the settings file nor the CLI says otherwise.

pub struct FetchDefaults {
    pub ticker: &'static str,
    pub period: &'static str,
    pub interval: &'static str,
}

pub const FETCH_DEFAULTS: FetchDefaults = FetchDefaults {
    ticker: "BTCUSDT",
    period: "2y",
    interval: "1d",
};
