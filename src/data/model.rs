use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Source column headers
// ---------------------------------------------------------------------------

pub const COL_MODEL_YEAR: &str = "Model Year";
pub const COL_MANUFACTURER: &str = "Mfr Name";
pub const COL_CARLINE: &str = "Carline";
pub const COL_CARLINE_CLASS: &str = "Carline Class Desc";
pub const COL_DIVISION: &str = "Division";
pub const COL_TRANSMISSION: &str = "Transmission";
pub const COL_ENGINE_DISPLACEMENT: &str = "Eng Displ";
pub const COL_CITY_MPG: &str = "City FE (Guide) - Conventional Fuel";
pub const COL_HIGHWAY_MPG: &str = "Hwy FE (Guide) - Conventional Fuel";
pub const COL_COMBINED_MPG: &str = "Comb FE (Guide) - Conventional Fuel";
pub const COL_CYLINDERS: &str = "# Cyl";
pub const COL_DRIVE_SYSTEM: &str = "Drive Sys";

// ---------------------------------------------------------------------------
// CellValue – a single spreadsheet cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as handed over by the spreadsheet reader.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric reading of the cell. Strings are parsed leniently: the longest
    /// leading decimal literal wins, so `"25 mpg"` reads as 25 and `"N/A"` as
    /// nothing. Non-finite results are treated as unparseable.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::String(s) => parse_leading_f64(s)?,
            CellValue::Bool(_) | CellValue::Null => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Text reading of the cell; empty strings and nulls are absent.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::String(s) if s.is_empty() => None,
            CellValue::String(s) => Some(s.clone()),
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Parse the longest prefix of `s` (after leading whitespace) that forms a
/// decimal literal: optional sign, digits, optional fraction, optional
/// exponent.
pub fn parse_leading_f64(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// One source row: header → cell.
pub type RowRecord = BTreeMap<String, CellValue>;

// ---------------------------------------------------------------------------
// MpgType
// ---------------------------------------------------------------------------

/// Which of the three fuel-economy figures downstream views read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MpgType {
    #[default]
    Combined,
    City,
    Highway,
}

impl MpgType {
    pub const ALL: [MpgType; 3] = [MpgType::Combined, MpgType::City, MpgType::Highway];

    pub fn label(self) -> &'static str {
        match self {
            MpgType::Combined => "Combined",
            MpgType::City => "City",
            MpgType::Highway => "Highway",
        }
    }
}

impl fmt::Display for MpgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// VehicleRecord – one row of a year file
// ---------------------------------------------------------------------------

/// A single vehicle configuration. Numeric fields hold the parsed value, or
/// `None` when the cell was missing or unparseable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VehicleRecord {
    pub model_year: Option<i32>,
    pub manufacturer_name: Option<String>,
    pub carline_name: Option<String>,
    pub carline_class: Option<String>,
    pub division: Option<String>,
    pub transmission_description: Option<String>,
    pub engine_displacement_liters: Option<f64>,
    pub city_mpg: Option<f64>,
    pub highway_mpg: Option<f64>,
    pub combined_mpg: Option<f64>,
    pub cylinders: Option<u32>,
    pub drive_system: Option<String>,
}

impl VehicleRecord {
    /// Build a record from a header-keyed row. Unknown columns are ignored.
    pub fn from_row(row: &RowRecord) -> Self {
        let text = |col: &str| row.get(col).and_then(CellValue::as_text);
        let number = |col: &str| row.get(col).and_then(CellValue::as_f64);

        VehicleRecord {
            model_year: number(COL_MODEL_YEAR).and_then(whole_number).map(|y| y as i32),
            manufacturer_name: text(COL_MANUFACTURER),
            carline_name: text(COL_CARLINE),
            carline_class: text(COL_CARLINE_CLASS),
            division: text(COL_DIVISION),
            transmission_description: text(COL_TRANSMISSION),
            engine_displacement_liters: number(COL_ENGINE_DISPLACEMENT),
            city_mpg: number(COL_CITY_MPG),
            highway_mpg: number(COL_HIGHWAY_MPG),
            combined_mpg: number(COL_COMBINED_MPG),
            cylinders: number(COL_CYLINDERS)
                .and_then(whole_number)
                .and_then(|c| u32::try_from(c).ok()),
            drive_system: text(COL_DRIVE_SYSTEM),
        }
    }

    /// The MPG figure selected by `mpg_type`.
    pub fn mpg(&self, mpg_type: MpgType) -> Option<f64> {
        match mpg_type {
            MpgType::Combined => self.combined_mpg,
            MpgType::City => self.city_mpg,
            MpgType::Highway => self.highway_mpg,
        }
    }

    /// Short human label, e.g. `"2023 Toyota Prius"`.
    pub fn display_name(&self) -> String {
        let year = self.model_year.map(|y| y.to_string());
        [
            year.as_deref(),
            self.manufacturer_name.as_deref(),
            self.carline_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

fn whole_number(v: f64) -> Option<i64> {
    (v.fract() == 0.0 && v.abs() <= i32::MAX as f64).then_some(v as i64)
}

// ---------------------------------------------------------------------------
// RecordStore – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All loaded records plus the option lists the filter widgets offer.
/// Frozen once built.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<VehicleRecord>,
    /// Distinct model years, ascending.
    pub years: BTreeSet<i32>,
    /// Distinct manufacturers, sorted.
    pub manufacturers: BTreeSet<String>,
    /// Distinct vehicle classes, sorted.
    pub car_types: BTreeSet<String>,
    /// Carlines offered per manufacturer.
    pub models_by_manufacturer: BTreeMap<String, BTreeSet<String>>,
}

impl RecordStore {
    /// Build option indices from the loaded records.
    pub fn from_records(records: Vec<VehicleRecord>) -> Self {
        let mut years = BTreeSet::new();
        let mut manufacturers = BTreeSet::new();
        let mut car_types = BTreeSet::new();
        let mut models_by_manufacturer: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for rec in &records {
            if let Some(year) = rec.model_year {
                years.insert(year);
            }
            if let Some(class) = &rec.carline_class {
                car_types.insert(class.clone());
            }
            if let Some(mfr) = &rec.manufacturer_name {
                manufacturers.insert(mfr.clone());
                if let Some(model) = &rec.carline_name {
                    models_by_manufacturer
                        .entry(mfr.clone())
                        .or_default()
                        .insert(model.clone());
                }
            }
        }

        RecordStore {
            records,
            years,
            manufacturers,
            car_types,
            models_by_manufacturer,
        }
    }

    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    /// Carlines of one manufacturer; empty for unknown manufacturers.
    pub fn models_for(&self, manufacturer: &str) -> impl Iterator<Item = &String> {
        self.models_by_manufacturer
            .get(manufacturer)
            .into_iter()
            .flatten()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
