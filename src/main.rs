use eframe::egui;
use fuel_economy_dashboard::app::FuelEconomyApp;
use fuel_economy_dashboard::config::{DataSource, MIN_WINDOW_SIZE, WINDOW_SIZE};

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_min_inner_size(MIN_WINDOW_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        "Fuel Economy Analyzer (2021-2025)",
        options,
        Box::new(|_cc| Ok(Box::new(FuelEconomyApp::new(&DataSource::default())))),
    )
}
