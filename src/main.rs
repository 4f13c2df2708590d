//! Suburb Insights - NSW Suburb Income & Crime Explorer
//!
//! Merges 2021 census household income, ASGS suburb names and suburb crime
//! counts, then shows charts from a text menu.

mod charts;
mod config;
mod data;
mod gui;
mod menu;
mod stats;

use anyhow::Context;
use config::AppConfig;
use data::DataLoader;
use gui::WindowRenderer;
use log::{debug, info};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Loading the data...");
    let table = DataLoader::new(config.sources.clone())
        .load_and_merge()
        .context("Failed to load suburb data")?;
    println!("Successfully generated data.\n");
    info!("Merged table holds {} suburbs", table.height());
    debug!("Merged table preview:\n{}", table.dataframe().head(Some(5)));

    let mut renderer = WindowRenderer::new(config.top_suburbs);
    let stdin = std::io::stdin();
    menu::run_menu(
        &table,
        &mut renderer,
        config.top_suburbs,
        stdin.lock(),
        std::io::stdout(),
    )?;

    Ok(())
}
