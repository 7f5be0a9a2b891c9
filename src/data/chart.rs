use super::aggregate::{DivisionComparison, GroupAverage};
use super::model::{MpgType, VehicleRecord};

/// Gap kept between the trend line's extremes and the chart edges.
pub const TREND_AXIS_BUFFER: f64 = 2.0;

// ---------------------------------------------------------------------------
// Chart-ready shapes
// ---------------------------------------------------------------------------

/// One scatter point: engine displacement (x) against an MPG figure (y).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Used for colouring only.
    pub model_year: Option<i32>,
}

/// A labelled category series for line or bar charts.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(String, f64)>,
}

impl Series {
    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|(label, _)| label.clone()).collect()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, v)| *v)
    }
}

/// Inclusive value-axis range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

/// Titles and axis names for one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLabels {
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
}

// ---------------------------------------------------------------------------
// Adapters
// ---------------------------------------------------------------------------

/// Displacement vs. selected MPG; records missing either coordinate are dropped.
pub fn scatter_points(subset: &[&VehicleRecord], mpg_type: MpgType) -> Vec<ScatterPoint> {
    subset
        .iter()
        .filter_map(|rec| {
            Some(ScatterPoint {
                x: rec.engine_displacement_liters?,
                y: rec.mpg(mpg_type)?,
                model_year: rec.model_year,
            })
        })
        .collect()
}

/// One point per model year, ascending.
pub fn trend_series(by_year: &[GroupAverage<i32>], mpg_type: MpgType) -> Series {
    Series {
        name: format!("Average {mpg_type} MPG"),
        points: by_year
            .iter()
            .map(|g| (g.key.to_string(), g.average))
            .collect(),
    }
}

/// One bar per division for the selected MPG figure.
pub fn division_series(by_division: &[GroupAverage<String>], mpg_type: MpgType) -> Series {
    Series {
        name: format!("Average {mpg_type} MPG"),
        points: by_division
            .iter()
            .map(|g| (g.key.clone(), g.average))
            .collect(),
    }
}

/// City and highway bars side by side, sharing the same division labels.
pub fn comparison_series(rows: &[DivisionComparison]) -> [Series; 2] {
    let city = Series {
        name: "Average City MPG".to_string(),
        points: rows
            .iter()
            .map(|r| (r.division.clone(), r.average_city))
            .collect(),
    };
    let highway = Series {
        name: "Average Highway MPG".to_string(),
        points: rows
            .iter()
            .map(|r| (r.division.clone(), r.average_highway))
            .collect(),
    };
    [city, highway]
}

/// `[min - buffer, max + buffer]` over the trend values, lower bound floored
/// at zero. `None` when there are no values.
pub fn trend_bounds(values: impl IntoIterator<Item = f64>) -> Option<AxisBounds> {
    let (min, max) = min_max(values)?;
    Some(AxisBounds {
        min: (min - TREND_AXIS_BUFFER).max(0.0),
        max: max + TREND_AXIS_BUFFER,
    })
}

/// `[0, max]` for charts whose value axis begins at zero.
pub fn zero_based_bounds(values: impl IntoIterator<Item = f64>) -> Option<AxisBounds> {
    let (_, max) = min_max(values)?;
    Some(AxisBounds {
        min: 0.0,
        max: max.max(0.0),
    })
}

fn min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

pub fn trend_labels(mpg_type: MpgType) -> ChartLabels {
    ChartLabels {
        title: format!("Average {mpg_type} MPG Over the Years"),
        x_axis: "Year".to_string(),
        y_axis: "MPG".to_string(),
    }
}

pub fn scatter_labels(mpg_type: MpgType) -> ChartLabels {
    ChartLabels {
        title: format!("{mpg_type} MPG vs Engine Displacement"),
        x_axis: "Engine Displacement (L)".to_string(),
        y_axis: format!("{mpg_type} MPG"),
    }
}

pub fn division_labels(comparison: bool, mpg_type: MpgType) -> ChartLabels {
    let title = if comparison {
        "Average City and Highway MPG Across Divisions".to_string()
    } else {
        format!("Average {mpg_type} MPG Across Divisions")
    };
    ChartLabels {
        title,
        x_axis: "Division".to_string(),
        y_axis: "Average MPG".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_skips_unparseable_coordinates() {
        let records = vec![
            VehicleRecord {
                engine_displacement_liters: Some(2.0),
                combined_mpg: Some(30.0),
                ..Default::default()
            },
            // "N/A" displacement parses to nothing
            VehicleRecord {
                engine_displacement_liters: None,
                combined_mpg: Some(28.0),
                ..Default::default()
            },
            VehicleRecord {
                engine_displacement_liters: Some(3.5),
                combined_mpg: None,
                city_mpg: Some(18.0),
                ..Default::default()
            },
        ];
        let subset: Vec<&VehicleRecord> = records.iter().collect();

        let points = scatter_points(&subset, MpgType::Combined);
        assert_eq!(points.len(), 1);
        assert_eq!((points[0].x, points[0].y), (2.0, 30.0));

        let city = scatter_points(&subset, MpgType::City);
        assert_eq!(city.len(), 1);
        assert_eq!((city[0].x, city[0].y), (3.5, 18.0));
    }

    #[test]
    fn trend_series_follows_group_order() {
        let groups = vec![
            GroupAverage { key: 2021, average: 24.0, count: 3 },
            GroupAverage { key: 2022, average: 26.5, count: 1 },
        ];
        let series = trend_series(&groups, MpgType::City);
        assert_eq!(series.name, "Average City MPG");
        assert_eq!(series.labels(), vec!["2021", "2022"]);
        assert_eq!(series.values().collect::<Vec<_>>(), vec![24.0, 26.5]);
    }

    #[test]
    fn trend_bounds_buffer_and_floor() {
        let b = trend_bounds([24.0, 30.0]).unwrap();
        assert_eq!(b, AxisBounds { min: 22.0, max: 32.0 });

        let b = trend_bounds([1.5, 3.0]).unwrap();
        assert_eq!(b.min, 0.0);
        assert_eq!(b.max, 5.0);

        assert!(trend_bounds(std::iter::empty()).is_none());
    }

    #[test]
    fn zero_based_bounds_start_at_zero() {
        let b = zero_based_bounds([12.0, 40.0, 33.0]).unwrap();
        assert_eq!(b, AxisBounds { min: 0.0, max: 40.0 });
    }

    #[test]
    fn comparison_series_share_labels() {
        let rows = vec![
            DivisionComparison {
                division: "Acura".into(),
                average_city: 21.0,
                average_highway: 29.0,
                count: 2,
            },
            DivisionComparison {
                division: "Kia".into(),
                average_city: 27.0,
                average_highway: 34.0,
                count: 5,
            },
        ];
        let [city, highway] = comparison_series(&rows);
        assert_eq!(city.labels(), highway.labels());
        assert_eq!(highway.values().collect::<Vec<_>>(), vec![29.0, 34.0]);
    }

    #[test]
    fn labels_mention_mpg_type() {
        assert_eq!(
            trend_labels(MpgType::Highway).title,
            "Average Highway MPG Over the Years"
        );
        assert_eq!(scatter_labels(MpgType::City).y_axis, "City MPG");
        assert_eq!(
            division_labels(true, MpgType::City).title,
            "Average City and Highway MPG Across Divisions"
        );
    }
}
