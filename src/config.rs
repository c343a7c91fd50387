//! Configuration for feature index construction.
//!
//! ```rust
//! use feature_index::IndexConfig;
//!
//! let config = IndexConfig::from_json(r#"{ "extent": 4096 }"#)?;
//! assert_eq!(config.extent, 4096);
//! assert_eq!(config.grid_cells, 16);
//! # Ok::<(), feature_index::FeatureIndexError>(())
//! ```

use crate::error::{FeatureIndexError, Result};
use serde::{Deserialize, Serialize};

/// Default tile coordinate extent.
pub const EXTENT: u16 = 8192;

/// Default number of grid cells per axis.
pub const GRID_CELLS: u32 = 16;

/// Grid and coordinate settings of a feature index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    /// Tile coordinate extent; the grid covers `0..extent` on both axes.
    #[serde(default = "IndexConfig::default_extent")]
    pub extent: u16,

    /// Number of grid cells per axis.
    #[serde(default = "IndexConfig::default_grid_cells")]
    pub grid_cells: u32,
}

impl IndexConfig {
    const fn default_extent() -> u16 {
        EXTENT
    }

    const fn default_grid_cells() -> u32 {
        GRID_CELLS
    }

    pub fn with_extent(mut self, extent: u16) -> Self {
        assert!(extent > 0, "Extent must be greater than zero");
        self.extent = extent;
        self
    }

    pub fn with_grid_cells(mut self, cells: u32) -> Self {
        assert!(cells > 0, "Grid cell count must be greater than zero");

        if cells > 256 {
            log::warn!(
                "Grid of {}x{} cells is very fine and will duplicate most entries across cells",
                cells,
                cells
            );
        }

        self.grid_cells = cells;
        self
    }

    /// Edge length of one grid cell in tile units.
    pub fn cell_size(&self) -> f32 {
        f32::from(self.extent) / self.grid_cells as f32
    }

    pub fn validate(&self) -> Result<()> {
        if self.extent == 0 || self.extent > i16::MAX as u16 {
            return Err(FeatureIndexError::InvalidConfig(format!(
                "Extent must be within [1, {}], got: {}",
                i16::MAX,
                self.extent
            )));
        }

        if self.grid_cells == 0 || self.grid_cells > u32::from(self.extent) {
            return Err(FeatureIndexError::InvalidConfig(format!(
                "Grid cell count must be within [1, {}], got: {}",
                self.extent, self.grid_cells
            )));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: IndexConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: IndexConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            extent: Self::default_extent(),
            grid_cells: Self::default_grid_cells(),
        }
    }
}
