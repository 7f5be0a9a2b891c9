use eframe::egui;

use crate::config::DataSource;
use crate::state::DashboardState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FuelEconomyApp {
    pub state: DashboardState,
}

impl FuelEconomyApp {
    /// Start with the year files of `source` already loaded (or the load error shown).
    pub fn new(source: &DataSource) -> Self {
        Self {
            state: DashboardState::default().apply(panels::load_folder(source)),
        }
    }
}

impl eframe::App for FuelEconomyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut events = Vec::new();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            events.extend(panels::top_bar(ui, &self.state));
        });

        // ---- Left side panel: filters and summary ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                events.extend(panels::side_panel(ui, &self.state));
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            events.extend(plot::chart_area(ui, &self.state));
        });

        for event in events {
            self.state = self.state.apply(event);
        }
    }
}
