use anyhow::Context;
use clap::Parser;
use tokio::runtime::Runtime;

use block_sniper::config::DEBUG_FLAGS;
use block_sniper::{
    ChartSettings, ChartSurface, Cli, EguiChart, fetch_series, logger_builder, run_pipeline,
};

fn main() -> anyhow::Result<()> {
    // A. Init Logging (info unless RUST_LOG says otherwise)
    logger_builder(std::env::var("RUST_LOG").ok().as_deref()).init();

    // B. Parse Args and resolve settings (defaults < settings file < flags)
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);
    let settings = ChartSettings::resolve(&args)?;
    if DEBUG_FLAGS.print_settings {
        log::info!("Settings: {:?}", settings);
    }

    // C. Data Loading (Blocking)
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let series = rt.block_on(fetch_series(&settings))?;

    // D. Analyse, draw and show
    let mut chart = EguiChart::new(settings.plot);
    run_pipeline(&series, &settings, &mut chart);
    chart.show()?;
    Ok(())
}
