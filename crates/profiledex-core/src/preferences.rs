use std::sync::Arc;

use crate::error::{CatalogError, Result};
use crate::kv::KeyValueStore;

pub const GRID_SIZE_KEY: &str = "gridSize";

/// Number of columns in the profile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize(u8);

impl GridSize {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(columns: u8) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&columns) {
            return Err(CatalogError::Validation(format!(
                "grid size must be between {} and {}, got {columns}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(columns))
    }

    #[must_use]
    pub const fn columns(self) -> u8 {
        self.0
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self(3)
    }
}

/// Cosmetic settings that survive restarts. Nothing here affects the data.
#[derive(Clone)]
pub struct Preferences {
    kv: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}

impl Preferences {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Stored grid size, or the default when unset or unreadable.
    #[must_use]
    pub fn grid_size(&self) -> GridSize {
        match self.kv.get(GRID_SIZE_KEY) {
            Ok(Some(raw)) => raw
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(|columns| GridSize::new(columns).ok())
                .unwrap_or_default(),
            Ok(None) => GridSize::default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read grid size preference");
                GridSize::default()
            }
        }
    }

    pub fn set_grid_size(&self, size: GridSize) -> Result<()> {
        self.kv.set(GRID_SIZE_KEY, &size.columns().to_string())
    }
}
