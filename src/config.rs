use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Built-in defaults
// ---------------------------------------------------------------------------

/// Year files loaded from a data folder, in this order.
pub const DEFAULT_YEAR_FILES: [&str; 5] = [
    "2021.xlsx",
    "2022.xlsx",
    "2023.xlsx",
    "2024.xlsx",
    "2025.xlsx",
];

pub const WINDOW_SIZE: [f32; 2] = [1200.0, 800.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [600.0, 400.0];

/// Where the per-year files live.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSource {
    pub dir: PathBuf,
    pub file_names: Vec<String>,
}

impl Default for DataSource {
    /// The year files in the current working directory.
    fn default() -> Self {
        Self::in_dir(".")
    }
}

impl DataSource {
    /// The default year files inside `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_names: DEFAULT_YEAR_FILES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Full paths of all files, in load order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.file_names.iter().map(|f| self.dir.join(f)).collect()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_source_lists_five_years_in_order() {
        let src = DataSource::in_dir("/data");
        let paths = src.paths();
        assert_eq!(paths.len(), 5);
        assert_eq!(paths[0], Path::new("/data/2021.xlsx"));
        assert_eq!(paths[4], Path::new("/data/2025.xlsx"));
        assert_eq!(DataSource::default().dir(), Path::new("."));
    }
}
