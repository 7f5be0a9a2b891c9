use std::fmt::Display;
use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::DataSource;
use crate::data::filter::{Selection, TransmissionFilter};
use crate::data::loader;
use crate::data::model::MpgType;
use crate::state::{DashboardState, Event};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets and summary
// ---------------------------------------------------------------------------

/// Render the left filter panel. Returns the events the user triggered.
pub fn side_panel(ui: &mut Ui, state: &DashboardState) -> Vec<Event> {
    let mut events = Vec::new();

    ui.heading("Filters");
    ui.separator();

    if !state.has_data() {
        ui.label("No dataset loaded.");
        return events;
    }

    let filters = &state.filters;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Year");
            if let Some(sel) = selection_combo(ui, "year", &filters.year, &state.year_options()) {
                events.push(Event::SetYear(sel));
            }

            ui.strong("Manufacturer");
            if let Some(sel) = selection_combo(
                ui,
                "manufacturer",
                &filters.manufacturer,
                &state.manufacturer_options(),
            ) {
                events.push(Event::SetManufacturer(sel));
            }

            ui.strong("Model");
            let manufacturer_chosen = matches!(filters.manufacturer, Selection::Only(_));
            ui.add_enabled_ui(manufacturer_chosen, |ui: &mut Ui| {
                if let Some(sel) = selection_combo(
                    ui,
                    "car_model",
                    &filters.car_model,
                    &state.car_model_options(),
                ) {
                    events.push(Event::SetCarModel(sel));
                }
            });

            ui.strong("Vehicle class");
            if let Some(sel) =
                selection_combo(ui, "car_type", &filters.car_type, &state.car_type_options())
            {
                events.push(Event::SetCarType(sel));
            }

            ui.strong("Transmission");
            egui::ComboBox::from_id_salt("transmission")
                .selected_text(filters.transmission_type.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for t in TransmissionFilter::ALL {
                        if ui
                            .selectable_label(filters.transmission_type == t, t.label())
                            .clicked()
                        {
                            events.push(Event::SetTransmission(t));
                        }
                    }
                });

            ui.strong("MPG type");
            egui::ComboBox::from_id_salt("mpg_type")
                .selected_text(filters.mpg_type.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for m in MpgType::ALL {
                        if ui.selectable_label(filters.mpg_type == m, m.label()).clicked() {
                            events.push(Event::SetMpgType(m));
                        }
                    }
                });

            ui.add_space(6.0);
            let restricted = !filters.is_unrestricted() || filters.mpg_type != MpgType::default();
            if ui
                .add_enabled(restricted, egui::Button::new("Reset filters"))
                .clicked()
            {
                events.push(Event::ResetFilters);
            }

            ui.separator();
            summary_block(ui, state);
        });

    events
}

/// Combo box offering `All` followed by every option.
fn selection_combo<T>(ui: &mut Ui, id: &str, current: &Selection<T>, options: &[T]) -> Option<Selection<T>>
where
    T: Clone + PartialEq + Display,
{
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(*current == Selection::All, "All")
                .clicked()
            {
                picked = Some(Selection::All);
            }
            for opt in options {
                let candidate = Selection::Only(opt.clone());
                if ui
                    .selectable_label(*current == candidate, opt.to_string())
                    .clicked()
                {
                    picked = Some(candidate);
                }
            }
        });
    picked
}

fn summary_block(ui: &mut Ui, state: &DashboardState) {
    let summary = &state.summary;

    ui.heading("Summary");
    ui.label(format!("Vehicles: {}", summary.total_count));
    ui.label(format!(
        "Average {} MPG: {:.1}",
        summary.mpg_type, summary.average_mpg
    ));
    ui.label(format!("Manufacturers: {}", summary.unique_manufacturers));
    ui.label(format!("Models: {}", summary.unique_models));

    if let Some(best) = &summary.most_efficient {
        ui.add_space(4.0);
        ui.strong("Most efficient");
        ui.label(best.display_name());
        let combined = best
            .combined_mpg
            .map(|v| format!("{v:.0}"))
            .unwrap_or_else(|| "n/a".to_string());
        ui.label(format!("Combined MPG: {combined}"));
        if let Some(class) = &best.carline_class {
            ui.label(class.as_str());
        }
        let details: Vec<String> = [
            best.cylinders.map(|c| format!("{c} cyl")),
            best.drive_system.clone(),
            best.transmission_description.clone(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !details.is_empty() {
            ui.label(RichText::new(details.join(" · ")).weak());
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &DashboardState) -> Vec<Event> {
    let mut events = Vec::new();

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                events.extend(open_folder_dialog());
                ui.close_menu();
            }
            if ui.button("Open file…").clicked() {
                events.extend(open_file_dialog());
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(store) = &state.store {
            ui.label(format!(
                "{} vehicles loaded, {} visible",
                store.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    events
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load all year files of `source` into a load event.
pub fn load_folder(source: &DataSource) -> Event {
    match loader::load_data_source(source) {
        Ok(store) => Event::Loaded(Arc::new(store)),
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", source.dir().display());
            Event::LoadFailed(format!("Error: {e}"))
        }
    }
}

pub fn open_folder_dialog() -> Option<Event> {
    let dir = rfd::FileDialog::new()
        .set_title("Open fuel economy data folder")
        .pick_folder()?;
    Some(load_folder(&DataSource::in_dir(dir)))
}

pub fn open_file_dialog() -> Option<Event> {
    let path = rfd::FileDialog::new()
        .set_title("Open fuel economy data")
        .add_filter("Supported files", &["xlsx", "xlsm", "xlsb", "xls", "ods", "json", "csv"])
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file()?;

    match loader::load_store_from_file(&path) {
        Ok(store) => {
            log::info!("Loaded {} vehicles from {}", store.len(), path.display());
            Some(Event::Loaded(Arc::new(store)))
        }
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            Some(Event::LoadFailed(format!("Error: {e:#}")))
        }
    }
}
