use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::{MpgType, RecordStore, VehicleRecord};

// ---------------------------------------------------------------------------
// Filter predicates
// ---------------------------------------------------------------------------

/// A single filter field: either no restriction or one exact value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    /// `All` passes everything; `Only(v)` passes only a present, equal value.
    pub fn admits(&self, value: Option<&T>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => value == Some(wanted),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("All"),
            Selection::Only(v) => write!(f, "{v}"),
        }
    }
}

/// Transmission filter matched against the free-text description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransmissionFilter {
    #[default]
    All,
    Automatic,
    Manual,
}

impl TransmissionFilter {
    pub const ALL: [TransmissionFilter; 3] = [
        TransmissionFilter::All,
        TransmissionFilter::Automatic,
        TransmissionFilter::Manual,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TransmissionFilter::All => "All",
            TransmissionFilter::Automatic => "Automatic",
            TransmissionFilter::Manual => "Manual",
        }
    }

    /// Substring search over the description. While a filter is active, a
    /// missing description or one matching neither keyword is rejected.
    pub fn admits(self, description: Option<&str>) -> bool {
        let needle = match self {
            TransmissionFilter::All => return true,
            TransmissionFilter::Automatic => "Auto",
            TransmissionFilter::Manual => "Manual",
        };
        description.is_some_and(|d| d.contains(needle))
    }
}

// ---------------------------------------------------------------------------
// FilterSet
// ---------------------------------------------------------------------------

/// The complete set of user filters. `mpg_type` does not restrict rows; it
/// only picks the MPG figure read by aggregation and charts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterSet {
    pub year: Selection<i32>,
    pub manufacturer: Selection<String>,
    /// Only meaningful together with `manufacturer`; not enforced here.
    pub car_model: Selection<String>,
    pub car_type: Selection<String>,
    pub transmission_type: TransmissionFilter,
    pub mpg_type: MpgType,
}

impl FilterSet {
    /// Whether `record` passes every active predicate.
    pub fn admits(&self, record: &VehicleRecord) -> bool {
        self.year.admits(record.model_year.as_ref())
            && self.manufacturer.admits(record.manufacturer_name.as_ref())
            && self.car_model.admits(record.carline_name.as_ref())
            && self.car_type.admits(record.carline_class.as_ref())
            && self
                .transmission_type
                .admits(record.transmission_description.as_deref())
    }

    /// True when no predicate restricts rows.
    pub fn is_unrestricted(&self) -> bool {
        self.year == Selection::All
            && self.manufacturer == Selection::All
            && self.car_model == Selection::All
            && self.car_type == Selection::All
            && self.transmission_type == TransmissionFilter::All
    }
}

/// Return the records passing all active filters, in input order.
pub fn apply_filters<'a>(records: &'a [VehicleRecord], filters: &FilterSet) -> Vec<&'a VehicleRecord> {
    records.iter().filter(|rec| filters.admits(rec)).collect()
}

/// Return indices of the store records passing all active filters.
pub fn filtered_indices(store: &RecordStore, filters: &FilterSet) -> Vec<usize> {
    store
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| filters.admits(rec))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(year: i32, mfr: &str, model: &str, class: &str, trans: Option<&str>) -> VehicleRecord {
        VehicleRecord {
            model_year: Some(year),
            manufacturer_name: Some(mfr.to_string()),
            carline_name: Some(model.to_string()),
            carline_class: Some(class.to_string()),
            transmission_description: trans.map(str::to_string),
            ..Default::default()
        }
    }

    fn fleet() -> Vec<VehicleRecord> {
        vec![
            vehicle(2021, "Honda", "Civic", "Compact Cars", Some("Manual(M6)")),
            vehicle(2022, "Toyota", "Prius", "Midsize Cars", Some("Auto(AV-S6)")),
            vehicle(2021, "Toyota", "Tacoma", "Small Pick-up Trucks", Some("Automatic (S6)")),
            vehicle(2023, "Honda", "Accord", "Midsize Cars", Some("Auto(S10)")),
        ]
    }

    #[test]
    fn unrestricted_filters_are_identity() {
        let records = fleet();
        let filters = FilterSet::default();
        assert!(filters.is_unrestricted());

        let out = apply_filters(&records, &filters);
        assert_eq!(out.len(), records.len());
        for (a, b) in out.iter().zip(records.iter()) {
            assert!(std::ptr::eq(*a, b));
        }
    }

    #[test]
    fn mpg_type_does_not_filter() {
        let records = fleet();
        let filters = FilterSet {
            mpg_type: MpgType::Highway,
            ..Default::default()
        };
        assert!(filters.is_unrestricted());
        assert_eq!(apply_filters(&records, &filters).len(), 4);
    }

    #[test]
    fn predicates_are_anded_and_order_preserved() {
        let records = fleet();
        let filters = FilterSet {
            manufacturer: Selection::Only("Toyota".into()),
            transmission_type: TransmissionFilter::Automatic,
            ..Default::default()
        };
        let out = apply_filters(&records, &filters);
        let names: Vec<_> = out.iter().filter_map(|r| r.carline_name.as_deref()).collect();
        assert_eq!(names, vec!["Prius", "Tacoma"]);

        let filters = FilterSet {
            year: Selection::Only(2021),
            manufacturer: Selection::Only("Toyota".into()),
            ..Default::default()
        };
        let out = apply_filters(&records, &filters);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].carline_name.as_deref(), Some("Tacoma"));
    }

    #[test]
    fn exact_match_on_model_and_type() {
        let records = fleet();
        let filters = FilterSet {
            car_type: Selection::Only("Midsize Cars".into()),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &filters).len(), 2);

        let filters = FilterSet {
            car_model: Selection::Only("civic".into()),
            ..Default::default()
        };
        assert!(apply_filters(&records, &filters).is_empty());
    }

    #[test]
    fn transmission_filter_drops_unknown_and_missing() {
        let records = vec![
            vehicle(2021, "A", "a", "x", Some("Automatic 6-Spd")),
            vehicle(2021, "A", "b", "x", Some("Manual 5-Spd")),
            vehicle(2021, "A", "c", "x", Some("")),
            vehicle(2021, "A", "d", "x", None),
        ];
        let filters = FilterSet {
            transmission_type: TransmissionFilter::Automatic,
            ..Default::default()
        };
        let out = apply_filters(&records, &filters);
        assert_eq!(out.len(), 1);
        assert!(std::ptr::eq(out[0], &records[0]));

        let filters = FilterSet {
            transmission_type: TransmissionFilter::Manual,
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &filters).len(), 1);
    }

    #[test]
    fn cvt_without_auto_keyword_is_excluded() {
        assert!(!TransmissionFilter::Automatic.admits(Some("CVT")));
        assert!(!TransmissionFilter::Manual.admits(Some("CVT")));
        assert!(TransmissionFilter::All.admits(Some("CVT")));
        assert!(TransmissionFilter::All.admits(None));
    }

    #[test]
    fn missing_field_fails_active_selection() {
        let rec = VehicleRecord::default();
        let filters = FilterSet {
            year: Selection::Only(2021),
            ..Default::default()
        };
        assert!(!filters.admits(&rec));
        assert!(FilterSet::default().admits(&rec));
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let filters = FilterSet {
            year: Selection::Only(2024),
            ..Default::default()
        };
        assert!(apply_filters(&[], &filters).is_empty());
        assert!(filtered_indices(&RecordStore::default(), &filters).is_empty());
    }

    #[test]
    fn indices_match_subset() {
        let store = RecordStore::from_records(fleet());
        let filters = FilterSet {
            manufacturer: Selection::Only("Honda".into()),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&store, &filters), vec![0, 3]);
    }
}
