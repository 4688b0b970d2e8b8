//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet.

pub struct DebugFlags {
    /// Emit one line per kline page fetched from Binance.
    pub print_fetch_pages: bool,
    /// Emit every BOS event and order block as the detector produces it.
    pub print_detector_events: bool,
    /// Emit per-category shape counts after overlays are drawn.
    pub print_render_summary: bool,
    /// Emit the resolved settings once at startup.
    pub print_settings: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_fetch_pages: false,
    print_detector_events: false,
    print_render_summary: true,
    print_settings: true,
};
