use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Model year → Color32
// ---------------------------------------------------------------------------

/// Maps each model year to a distinct colour for the scatter plot.
#[derive(Debug, Clone, Default)]
pub struct YearColors {
    mapping: BTreeMap<i32, Color32>,
}

impl YearColors {
    pub fn new(years: &BTreeSet<i32>) -> Self {
        let palette = generate_palette(years.len());
        YearColors {
            mapping: years.iter().copied().zip(palette).collect(),
        }
    }

    /// Colour of a year; records without a year are grey.
    pub fn color_for(&self, year: Option<i32>) -> Color32 {
        year.and_then(|y| self.mapping.get(&y).copied())
            .unwrap_or(Color32::GRAY)
    }
}
