#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::{anyhow, Result};
use egui::Vec2;

fn main() -> Result<()> {
    tuner::log::init();

    // Analyses are spawned from the UI thread, which stays inside this runtime.
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let size: Vec2 = [1100.0, 700.0].into();

    let native_options = eframe::NativeOptions {
        initial_window_size: Some(size),
        min_window_size: Some([800.0, 500.0].into()),
        centered: true,
        ..Default::default()
    };
    eframe::run_native(
        "AWS Lambda Right-Sizing Tool",
        native_options,
        Box::new(|cc| Box::new(frontend::RightSizing::new(cc))),
    )
    .map_err(|err| anyhow!("failed to start eframe: {}", err))
}
