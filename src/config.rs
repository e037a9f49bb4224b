//! Grid configuration, loadable from JSON

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::grid::GridIndexer;
use crate::surface::Color;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "CUBEGRID_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cells per axis
    pub cells: usize,
    /// Cell edge length in pixels
    pub cell_size: f64,
    /// Gutter width between neighbouring cells
    pub gap: f64,
    pub stroke_width: f64,
    pub surface_width: u32,
    pub surface_height: u32,
    pub background_color: Color,
    pub grid_color: Color,
    /// Outline of the in-progress drag
    pub selection_color: Color,
    pub highlight_color: Color,
    pub highlight_opacity: f64,
    pub covering_color: Color,
    pub covering_opacity: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cells: 200,
            cell_size: 10.0,
            gap: 5.0,
            stroke_width: 1.0,
            // clips a 200-cell grid; use fitted_surface_size() to show all of it
            surface_width: 801,
            surface_height: 801,
            background_color: Color::WHITE,
            grid_color: Color::BLACK,
            selection_color: Color::RED,
            highlight_color: Color::RED,
            highlight_opacity: 0.5,
            covering_color: Color::YELLOW,
            covering_opacity: 1.0,
        }
    }
}

impl GridConfig {
    /// Load from `$CUBEGRID_CONFIG`, else `<config dir>/cubegrid/config.json`,
    /// falling back to defaults when the file is missing or unusable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::debug!("no config directory, using defaults");
            return Self::default();
        };
        Self::load_path(&path, std::env::var_os(CONFIG_ENV).is_some())
    }

    /// Like [`Self::load`] for a known path. A missing file is only worth a
    /// warning when the user named it.
    pub fn load_path(path: &Path, explicit: bool) -> Self {
        if !path.exists() {
            if explicit {
                log::warn!("{CONFIG_ENV} points at {}, which does not exist; using defaults", path.display());
            } else {
                log::debug!("{} not found, using defaults", path.display());
            }
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {err:#}");
                Self::default()
            }
        }
    }

    pub fn path() -> Option<PathBuf> {
        match std::env::var_os(CONFIG_ENV) {
            Some(p) => Some(PathBuf::from(p)),
            None => dirs::config_dir().map(|d| d.join("cubegrid").join("config.json")),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: GridConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.cells > 0, "grid needs at least one cell per axis");
        ensure!(self.cell_size > 0.0, "cell_size must be positive, got {}", self.cell_size);
        ensure!(self.gap > 0.0, "gap must be positive, got {}", self.gap);
        ensure!(
            self.stroke_width > 0.0,
            "stroke_width must be positive, got {}",
            self.stroke_width
        );
        ensure!(
            self.surface_width > 0 && self.surface_height > 0,
            "surface must not be empty ({}x{})",
            self.surface_width,
            self.surface_height
        );
        for (name, value) in [
            ("highlight_opacity", self.highlight_opacity),
            ("covering_opacity", self.covering_opacity),
        ] {
            ensure!((0.0..=1.0).contains(&value), "{name} must be within 0..=1, got {value}");
        }
        Ok(())
    }

    pub fn indexer(&self) -> GridIndexer {
        GridIndexer::new(self.cell_size, self.gap, self.cells)
    }

    /// Smallest surface edge that shows every cell plus the trailing stroke
    pub fn fitted_surface_size(&self) -> u32 {
        let pitch = self.cell_size + self.gap;
        (self.cells as f64 * pitch - self.gap + self.stroke_width).ceil() as u32
    }
}
