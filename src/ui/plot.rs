use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui, Vec2};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::data::aggregate::division_comparison;
use crate::data::chart::{
    comparison_series, division_labels, division_series, scatter_labels, scatter_points,
    trend_bounds, trend_labels, trend_series, zero_based_bounds, ChartLabels, Series,
};
use crate::state::{ChartTab, DashboardState, Event};

const TREND_COLOR: Color32 = Color32::from_rgb(75, 192, 192);
const CITY_COLOR: Color32 = Color32::from_rgb(54, 162, 235);
const HIGHWAY_COLOR: Color32 = Color32::from_rgb(255, 206, 86);

// ---------------------------------------------------------------------------
// Chart area (central panel)
// ---------------------------------------------------------------------------

/// Render the chart navigation and the active chart.
pub fn chart_area(ui: &mut Ui, state: &DashboardState) -> Vec<Event> {
    let mut events = Vec::new();

    if !state.has_data() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a data folder to view fuel economy  (File → Open data folder…)");
        });
        return events;
    }
    if state.is_empty_view() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No data available for the selected filters.");
        });
        return events;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("< Previous").clicked() {
            events.push(Event::PreviousChart);
        }
        for tab in ChartTab::ALL {
            if ui.selectable_label(state.tab == tab, tab.label()).clicked() {
                events.push(Event::SelectTab(tab));
            }
        }
        if ui.button("Next >").clicked() {
            events.push(Event::NextChart);
        }

        if state.tab == ChartTab::Divisions {
            ui.separator();
            let mut comparison = state.comparison;
            if ui.checkbox(&mut comparison, "City vs Highway").changed() {
                events.push(Event::ToggleComparison);
            }
        }
    });
    ui.separator();

    match state.tab {
        ChartTab::Trend => trend_chart(ui, state),
        ChartTab::Scatter => scatter_chart(ui, state),
        ChartTab::Divisions => division_chart(ui, state),
    }

    events
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn trend_chart(ui: &mut Ui, state: &DashboardState) {
    let mpg_type = state.filters.mpg_type;
    let series = trend_series(&state.summary.by_year, mpg_type);
    let labels = trend_labels(mpg_type);

    let points: PlotPoints = series
        .values()
        .enumerate()
        .map(|(i, v)| [i as f64, v])
        .collect();

    let mut plot = titled_plot(ui, "trend_plot", &labels)
        .x_axis_formatter(category_formatter(series.labels()));
    if let Some(bounds) = trend_bounds(series.values()) {
        // No vertical margin: the axis spans exactly the buffered bounds.
        plot = plot
            .include_y(bounds.min)
            .include_y(bounds.max)
            .set_margin_fraction(Vec2::new(0.05, 0.0));
    }

    plot.show(ui, |plot_ui| {
        plot_ui.line(
            Line::new(points)
                .name(&series.name)
                .color(TREND_COLOR)
                .width(2.0),
        );
    });
}

fn scatter_chart(ui: &mut Ui, state: &DashboardState) {
    let mpg_type = state.filters.mpg_type;
    let visible = state.visible_records();
    let points = scatter_points(&visible, mpg_type);
    let labels = scatter_labels(mpg_type);

    // One series per model year so the legend doubles as a colour key.
    let mut by_year: BTreeMap<Option<i32>, Vec<[f64; 2]>> = BTreeMap::new();
    for p in &points {
        by_year.entry(p.model_year).or_default().push([p.x, p.y]);
    }

    let mut plot = titled_plot(ui, "scatter_plot", &labels);
    if let Some(bounds) = zero_based_bounds(points.iter().map(|p| p.y)) {
        plot = plot.include_y(bounds.min).include_y(bounds.max);
    }

    plot.show(ui, |plot_ui| {
        for (year, coords) in by_year {
            let name = year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "Unknown year".to_string());
            plot_ui.points(
                Points::new(PlotPoints::new(coords))
                    .name(name)
                    .color(state.year_colors.color_for(year))
                    .radius(2.5),
            );
        }
    });
}

fn division_chart(ui: &mut Ui, state: &DashboardState) {
    let mpg_type = state.filters.mpg_type;
    let labels = division_labels(state.comparison, mpg_type);

    let colored: Vec<(Series, Color32)> = if state.comparison {
        let [city, highway] = comparison_series(&division_comparison(&state.visible_records()));
        vec![(city, CITY_COLOR), (highway, HIGHWAY_COLOR)]
    } else {
        vec![(division_series(&state.summary.by_division, mpg_type), TREND_COLOR)]
    };

    let categories = colored
        .first()
        .map(|(s, _)| s.labels())
        .unwrap_or_default();
    let bar_width = 0.8 / colored.len() as f64;

    let mut plot = titled_plot(ui, "division_plot", &labels)
        .x_axis_formatter(category_formatter(categories));
    if let Some(bounds) = zero_based_bounds(colored.iter().flat_map(|(s, _)| s.values())) {
        plot = plot.include_y(bounds.min).include_y(bounds.max);
    }

    plot.show(ui, |plot_ui| {
        for (k, (series, color)) in colored.iter().enumerate() {
            let offset = (k as f64 - (colored.len() as f64 - 1.0) / 2.0) * bar_width;
            let bars: Vec<Bar> = series
                .points
                .iter()
                .enumerate()
                .map(|(i, (label, value))| {
                    Bar::new(i as f64 + offset, *value)
                        .width(bar_width)
                        .name(label)
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).name(&series.name).color(*color));
        }
    });
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn titled_plot(ui: &mut Ui, id: &str, labels: &ChartLabels) -> Plot<'static> {
    ui.heading(labels.title.as_str());
    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(labels.x_axis.clone())
        .y_axis_label(labels.y_axis.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
}

/// Label whole-number x positions with the category at that index.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let x = mark.value;
        if x < 0.0 || x.fract() != 0.0 {
            return String::new();
        }
        labels.get(x as usize).cloned().unwrap_or_default()
    }
}
