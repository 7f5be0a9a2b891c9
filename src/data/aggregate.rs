//! Reductions from a filtered subset to the numbers the dashboard shows.
//!
//! Two averaging rules coexist on purpose and must not be unified:
//! * the headline [`Summary::average_mpg`] divides the sum of valid values by
//!   the *total* record count (invalid values contribute zero);
//! * every grouped average divides by the count of *valid* values only.

use std::collections::{BTreeMap, BTreeSet};

use super::model::{MpgType, VehicleRecord};

// ---------------------------------------------------------------------------
// Group averages
// ---------------------------------------------------------------------------

/// Mean of the valid values within one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAverage<K> {
    pub key: K,
    pub average: f64,
    /// Number of valid values behind `average`; always > 0.
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    total: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
    }
}

/// Partition `subset` by `key_fn` and average the values `value_fn` yields.
///
/// Records without a key or without a valid value are skipped, so groups
/// with no valid values never appear. Keys come out ascending.
pub fn group_averages<K, FK, FV>(subset: &[&VehicleRecord], key_fn: FK, value_fn: FV) -> Vec<GroupAverage<K>>
where
    K: Ord + Clone,
    FK: Fn(&VehicleRecord) -> Option<K>,
    FV: Fn(&VehicleRecord) -> Option<f64>,
{
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();

    for &rec in subset {
        let (Some(key), Some(value)) = (key_fn(rec), value_fn(rec)) else {
            continue;
        };
        groups.entry(key).or_default().add(value);
    }

    groups
        .into_iter()
        .map(|(key, acc)| GroupAverage {
            key,
            average: acc.total / acc.count as f64,
            count: acc.count,
        })
        .collect()
}

/// Average selected MPG per model year.
pub fn averages_by_year(subset: &[&VehicleRecord], mpg_type: MpgType) -> Vec<GroupAverage<i32>> {
    group_averages(subset, |r| r.model_year, |r| r.mpg(mpg_type))
}

/// Average selected MPG per division.
pub fn averages_by_division(subset: &[&VehicleRecord], mpg_type: MpgType) -> Vec<GroupAverage<String>> {
    group_averages(subset, |r| r.division.clone(), |r| r.mpg(mpg_type))
}

/// City and highway averages of one division.
#[derive(Debug, Clone, PartialEq)]
pub struct DivisionComparison {
    pub division: String,
    pub average_city: f64,
    pub average_highway: f64,
    pub count: usize,
}

/// Per-division city and highway averages. A record counts only when both
/// its city and highway figures are valid.
pub fn division_comparison(subset: &[&VehicleRecord]) -> Vec<DivisionComparison> {
    let mut groups: BTreeMap<&str, (Accumulator, Accumulator)> = BTreeMap::new();

    for &rec in subset {
        let (Some(division), Some(city), Some(highway)) =
            (rec.division.as_deref(), rec.city_mpg, rec.highway_mpg)
        else {
            continue;
        };
        let (c, h) = groups.entry(division).or_default();
        c.add(city);
        h.add(highway);
    }

    groups
        .into_iter()
        .map(|(division, (c, h))| DivisionComparison {
            division: division.to_string(),
            average_city: c.total / c.count as f64,
            average_highway: h.total / h.count as f64,
            count: c.count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Headline figures for the current subset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub mpg_type: MpgType,
    pub total_count: usize,
    /// Sum of valid selected-MPG values over `total_count` (invalid count as
    /// zero). `0.0` for an empty subset.
    pub average_mpg: f64,
    pub most_efficient: Option<VehicleRecord>,
    pub unique_manufacturers: usize,
    pub unique_models: usize,
    pub by_year: Vec<GroupAverage<i32>>,
    pub by_division: Vec<GroupAverage<String>>,
}

/// Reduce `subset` to a [`Summary`] for the given MPG figure.
pub fn summarize(subset: &[&VehicleRecord], mpg_type: MpgType) -> Summary {
    let total_count = subset.len();
    let total: f64 = subset.iter().filter_map(|r| r.mpg(mpg_type)).sum();
    let average_mpg = if total_count == 0 {
        0.0
    } else {
        total / total_count as f64
    };

    Summary {
        mpg_type,
        total_count,
        average_mpg,
        most_efficient: most_efficient(subset).cloned(),
        unique_manufacturers: distinct_count(subset, |r| r.manufacturer_name.as_deref()),
        unique_models: distinct_count(subset, |r| r.carline_name.as_deref()),
        by_year: averages_by_year(subset, mpg_type),
        by_division: averages_by_division(subset, mpg_type),
    }
}

/// The record with the highest combined MPG. Missing values compare as 0
/// and ties keep the earliest record.
pub fn most_efficient<'a>(subset: &[&'a VehicleRecord]) -> Option<&'a VehicleRecord> {
    let combined = |r: &VehicleRecord| r.combined_mpg.unwrap_or(0.0);

    let mut iter = subset.iter().copied();
    let first = iter.next()?;
    Some(iter.fold(first, |best, rec| {
        if combined(rec) > combined(best) {
            rec
        } else {
            best
        }
    }))
}

/// Number of distinct present values of a text field.
pub fn distinct_count<'a, F>(subset: &[&'a VehicleRecord], field: F) -> usize
where
    F: Fn(&'a VehicleRecord) -> Option<&'a str>,
{
    subset
        .iter()
        .filter_map(|&r| field(r))
        .collect::<BTreeSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_combined(values: &[Option<f64>]) -> Vec<VehicleRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| VehicleRecord {
                carline_name: Some(format!("car-{i}")),
                combined_mpg: *v,
                ..Default::default()
            })
            .collect()
    }

    fn refs(records: &[VehicleRecord]) -> Vec<&VehicleRecord> {
        records.iter().collect()
    }

    fn vehicle(year: i32, division: &str, city: Option<f64>, hwy: Option<f64>) -> VehicleRecord {
        VehicleRecord {
            model_year: Some(year),
            division: Some(division.to_string()),
            city_mpg: city,
            highway_mpg: hwy,
            ..Default::default()
        }
    }

    #[test]
    fn most_efficient_prefers_first_of_ties() {
        let records = with_combined(&[Some(10.0), Some(25.0), Some(25.0), Some(5.0)]);
        let subset = refs(&records);
        let best = most_efficient(&subset).unwrap();
        assert!(std::ptr::eq(best, &records[1]));
    }

    #[test]
    fn most_efficient_treats_missing_as_zero() {
        let records = with_combined(&[None, None]);
        let subset = refs(&records);
        assert!(std::ptr::eq(most_efficient(&subset).unwrap(), &records[0]));
        assert!(most_efficient(&[]).is_none());
    }

    #[test]
    fn overall_average_counts_invalid_in_denominator() {
        let records = with_combined(&[Some(30.0), None, Some(20.0), None]);
        let summary = summarize(&refs(&records), MpgType::Combined);
        assert_eq!(summary.total_count, 4);
        assert!((summary.average_mpg - 12.5).abs() < 1e-9);
    }

    #[test]
    fn empty_subset_summary() {
        let summary = summarize(&[], MpgType::City);
        assert_eq!(summary.total_count, 0);
        assert_eq!(summary.average_mpg, 0.0);
        assert!(summary.most_efficient.is_none());
        assert!(summary.by_year.is_empty());
        assert!(summary.by_division.is_empty());
    }

    #[test]
    fn year_groups_exclude_invalid_values() {
        let records = vec![
            vehicle(2022, "Honda", Some(30.0), None),
            vehicle(2021, "Honda", Some(20.0), None),
            vehicle(2021, "Honda", None, None),
            vehicle(2021, "Honda", Some(40.0), None),
            vehicle(2023, "Honda", None, None),
        ];
        let subset = refs(&records);
        let groups = averages_by_year(&subset, MpgType::City);

        let keys: Vec<i32> = groups.iter().map(|g| g.key).collect();
        assert_eq!(keys, vec![2021, 2022]);
        assert!((groups[0].average - 30.0).abs() < 1e-9);
        assert_eq!(groups[0].count, 2);

        let counted: usize = groups.iter().map(|g| g.count).sum();
        assert!(counted <= subset.len());
    }

    #[test]
    fn division_groups_sorted_lexicographically() {
        let records = vec![
            vehicle(2021, "Toyota", None, Some(40.0)),
            vehicle(2021, "Acura", None, Some(30.0)),
            vehicle(2021, "Lexus", None, Some(20.0)),
            VehicleRecord {
                highway_mpg: Some(99.0),
                ..Default::default()
            },
        ];
        let groups = averages_by_division(&refs(&records), MpgType::Highway);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Acura", "Lexus", "Toyota"]);
    }

    #[test]
    fn division_comparison_needs_both_figures() {
        let records = vec![
            vehicle(2021, "Ford", Some(20.0), Some(30.0)),
            vehicle(2021, "Ford", Some(10.0), None),
            vehicle(2021, "Ford", Some(30.0), Some(40.0)),
            vehicle(2021, "Kia", None, Some(50.0)),
        ];
        let rows = division_comparison(&refs(&records));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].division, "Ford");
        assert_eq!(rows[0].count, 2);
        assert!((rows[0].average_city - 25.0).abs() < 1e-9);
        assert!((rows[0].average_highway - 35.0).abs() < 1e-9);
    }

    #[test]
    fn distinct_counts_ignore_missing() {
        let mut records = with_combined(&[Some(1.0), Some(2.0), Some(3.0)]);
        records[0].manufacturer_name = Some("Ford".into());
        records[1].manufacturer_name = Some("Ford".into());
        records[1].carline_name = Some("car-0".into());

        let summary = summarize(&refs(&records), MpgType::Combined);
        assert_eq!(summary.unique_manufacturers, 1);
        assert_eq!(summary.unique_models, 2);
    }
}
