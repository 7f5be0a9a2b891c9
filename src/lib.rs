//! Fuel economy dashboard: loads per-year vehicle spreadsheets, filters them
//! interactively and charts the filtered subset.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
