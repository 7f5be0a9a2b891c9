use std::sync::Arc;

use crate::color::YearColors;
use crate::data::aggregate::{summarize, Summary};
use crate::data::filter::{filtered_indices, FilterSet, Selection, TransmissionFilter};
use crate::data::model::{MpgType, RecordStore, VehicleRecord};

// ---------------------------------------------------------------------------
// Chart tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartTab {
    #[default]
    Trend,
    Scatter,
    Divisions,
}

impl ChartTab {
    pub const ALL: [ChartTab; 3] = [ChartTab::Trend, ChartTab::Scatter, ChartTab::Divisions];

    pub fn label(self) -> &'static str {
        match self {
            ChartTab::Trend => "Trend",
            ChartTab::Scatter => "Displacement",
            ChartTab::Divisions => "Divisions",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Everything the user (or the loader) can do to the dashboard.
#[derive(Debug, Clone)]
pub enum Event {
    Loaded(Arc<RecordStore>),
    LoadFailed(String),
    SetYear(Selection<i32>),
    SetManufacturer(Selection<String>),
    SetCarModel(Selection<String>),
    SetCarType(Selection<String>),
    SetTransmission(TransmissionFilter),
    SetMpgType(MpgType),
    ResetFilters,
    SelectTab(ChartTab),
    NextChart,
    PreviousChart,
    ToggleComparison,
}

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// One immutable snapshot of the UI state. Interactions never mutate a
/// snapshot; [`DashboardState::apply`] derives the next one.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Loaded records (None until a load succeeds). Shared, never mutated.
    pub store: Option<Arc<RecordStore>>,

    pub filters: FilterSet,

    pub tab: ChartTab,

    /// Divisions chart shows city and highway side by side.
    pub comparison: bool,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Aggregates of the visible records (cached).
    pub summary: Summary,

    pub year_colors: YearColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl DashboardState {
    /// Produce the snapshot that follows `self` after `event`.
    pub fn apply(&self, event: Event) -> Self {
        let mut next = self.clone();
        let mut refilter = true;

        match event {
            Event::Loaded(store) => {
                next.year_colors = YearColors::new(&store.years);
                next.store = Some(store);
                next.filters = FilterSet::default();
                next.status_message = None;
            }
            Event::LoadFailed(message) => {
                next.store = None;
                next.filters = FilterSet::default();
                next.year_colors = YearColors::default();
                next.status_message = Some(message);
            }
            Event::SetYear(year) => next.filters.year = year,
            Event::SetManufacturer(manufacturer) => {
                // Carlines are manufacturer-scoped.
                next.filters.manufacturer = manufacturer;
                next.filters.car_model = Selection::All;
            }
            Event::SetCarModel(model) => next.filters.car_model = model,
            Event::SetCarType(car_type) => next.filters.car_type = car_type,
            Event::SetTransmission(t) => next.filters.transmission_type = t,
            Event::SetMpgType(mpg_type) => next.filters.mpg_type = mpg_type,
            Event::ResetFilters => next.filters = FilterSet::default(),
            Event::SelectTab(tab) => {
                next.tab = tab;
                refilter = false;
            }
            Event::NextChart => {
                next.tab = self.tab.next();
                refilter = false;
            }
            Event::PreviousChart => {
                next.tab = self.tab.previous();
                refilter = false;
            }
            Event::ToggleComparison => {
                next.comparison = !self.comparison;
                refilter = false;
            }
        }

        if refilter {
            next.refilter();
        }
        next
    }

    /// Recompute the visible indices and the summary from the filters.
    fn refilter(&mut self) {
        self.visible_indices = match &self.store {
            Some(store) => filtered_indices(store, &self.filters),
            None => Vec::new(),
        };
        let summary = summarize(&self.visible_records(), self.filters.mpg_type);
        self.summary = summary;

        if let Ok(json) = serde_json::to_string(&self.filters) {
            log::debug!("filters {json} -> {} records", self.visible_indices.len());
        }
    }

    /// The filtered subset, in store order.
    pub fn visible_records(&self) -> Vec<&VehicleRecord> {
        let Some(store) = &self.store else {
            return Vec::new();
        };
        let records = store.records();
        self.visible_indices
            .iter()
            .filter_map(|&i| records.get(i))
            .collect()
    }

    pub fn has_data(&self) -> bool {
        self.store.is_some()
    }

    /// Data is loaded but the filters leave nothing to show.
    pub fn is_empty_view(&self) -> bool {
        self.has_data() && self.visible_indices.is_empty()
    }

    pub fn year_options(&self) -> Vec<i32> {
        self.store
            .as_ref()
            .map(|s| s.years.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn manufacturer_options(&self) -> Vec<String> {
        self.store
            .as_ref()
            .map(|s| s.manufacturers.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Carlines of the selected manufacturer; none while it is `All`.
    pub fn car_model_options(&self) -> Vec<String> {
        match (&self.store, &self.filters.manufacturer) {
            (Some(store), Selection::Only(mfr)) => store.models_for(mfr).cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub fn car_type_options(&self) -> Vec<String> {
        self.store
            .as_ref()
            .map(|s| s.car_types.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(year: i32, mfr: &str, model: &str, combined: f64) -> VehicleRecord {
        VehicleRecord {
            model_year: Some(year),
            manufacturer_name: Some(mfr.to_string()),
            carline_name: Some(model.to_string()),
            carline_class: Some("Midsize Cars".to_string()),
            transmission_description: Some("Auto(S8)".to_string()),
            city_mpg: Some(combined - 3.0),
            combined_mpg: Some(combined),
            ..Default::default()
        }
    }

    fn loaded() -> DashboardState {
        let store = RecordStore::from_records(vec![
            vehicle(2021, "Honda", "Civic", 35.0),
            vehicle(2022, "Toyota", "Prius", 56.0),
            vehicle(2022, "Honda", "Accord", 32.0),
        ]);
        DashboardState::default().apply(Event::Loaded(Arc::new(store)))
    }

    #[test]
    fn load_shows_everything() {
        let state = loaded();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.summary.total_count, 3);
        assert_eq!(
            state.summary.most_efficient.as_ref().and_then(|r| r.carline_name.as_deref()),
            Some("Prius")
        );
        assert!(!state.is_empty_view());
    }

    #[test]
    fn apply_leaves_previous_snapshot_untouched() {
        let before = loaded();
        let after = before.apply(Event::SetYear(Selection::Only(2021)));
        assert_eq!(before.visible_indices.len(), 3);
        assert_eq!(after.visible_indices, vec![0]);
    }

    #[test]
    fn manufacturer_change_resets_car_model() {
        let state = loaded()
            .apply(Event::SetManufacturer(Selection::Only("Honda".into())))
            .apply(Event::SetCarModel(Selection::Only("Civic".into())));
        assert_eq!(state.visible_indices, vec![0]);
        assert_eq!(state.car_model_options(), vec!["Accord", "Civic"]);

        let state = state.apply(Event::SetManufacturer(Selection::All));
        assert_eq!(state.filters.car_model, Selection::All);
        assert_eq!(state.visible_indices.len(), 3);
        assert!(state.car_model_options().is_empty());

        let state = state
            .apply(Event::SetManufacturer(Selection::Only("Honda".into())))
            .apply(Event::SetCarModel(Selection::Only("Civic".into())))
            .apply(Event::SetManufacturer(Selection::Only("Toyota".into())));
        assert_eq!(state.filters.car_model, Selection::All);
        assert_eq!(state.visible_indices, vec![1]);
    }

    #[test]
    fn empty_view_is_not_an_error() {
        let state = loaded().apply(Event::SetTransmission(TransmissionFilter::Manual));
        assert!(state.is_empty_view());
        assert!(state.status_message.is_none());
        assert_eq!(state.summary.total_count, 0);
    }

    #[test]
    fn reset_restores_defaults() {
        let state = loaded()
            .apply(Event::SetYear(Selection::Only(2022)))
            .apply(Event::SetMpgType(MpgType::City))
            .apply(Event::ResetFilters);
        assert_eq!(state.filters, FilterSet::default());
        assert_eq!(state.visible_indices.len(), 3);
    }

    #[test]
    fn mpg_type_switches_summary_figure() {
        let state = loaded().apply(Event::SetMpgType(MpgType::City));
        assert_eq!(state.summary.mpg_type, MpgType::City);
        let expected = (32.0 + 53.0 + 29.0) / 3.0;
        assert!((state.summary.average_mpg - expected).abs() < 1e-9);
    }

    #[test]
    fn tab_navigation_wraps() {
        let state = loaded();
        assert_eq!(state.tab, ChartTab::Trend);
        let state = state.apply(Event::PreviousChart);
        assert_eq!(state.tab, ChartTab::Divisions);
        let state = state.apply(Event::NextChart);
        assert_eq!(state.tab, ChartTab::Trend);
        let state = state.apply(Event::SelectTab(ChartTab::Scatter));
        assert_eq!(state.tab, ChartTab::Scatter);
    }

    #[test]
    fn comparison_toggles() {
        let state = loaded().apply(Event::ToggleComparison);
        assert!(state.comparison);
        assert!(!state.apply(Event::ToggleComparison).comparison);
    }

    #[test]
    fn failed_load_clears_store() {
        let state = loaded().apply(Event::LoadFailed("Error: boom".into()));
        assert!(!state.has_data());
        assert!(state.visible_indices.is_empty());
        assert_eq!(state.status_message.as_deref(), Some("Error: boom"));
        assert!(state.year_options().is_empty());
    }
}
