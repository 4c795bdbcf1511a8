use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use crate::config::BackendKind;
use crate::error::{CatalogError, Result};
use crate::models::{Profile, ProfileData, ProfileId};
use crate::wire::decode_profiles_tolerant;

use super::{Outcome, ProfileBackend};

/// Serves a JSON array shipped alongside the app. Read-only.
#[derive(Debug, Clone)]
pub struct StaticFileBackend {
    path: PathBuf,
}

impl StaticFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_only(&self) -> CatalogError {
        CatalogError::ReadOnly(format!("{} is a static catalog", self.path.display()))
    }
}

impl ProfileBackend for StaticFileBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Static
    }

    fn list(&self) -> Result<Vec<Profile>> {
        let raw = fs::read_to_string(&self.path)?;
        let value = serde_json::from_str::<Value>(&raw)?;
        if !value.is_array() {
            return Err(CatalogError::Validation(format!(
                "{} must contain a JSON array",
                self.path.display()
            )));
        }
        let (profiles, skipped) = decode_profiles_tolerant(&value);
        if skipped > 0 {
            tracing::warn!(
                path = %self.path.display(),
                skipped,
                "static catalog contained unreadable records"
            );
        }
        Ok(profiles)
    }

    fn create(&self, _data: &ProfileData) -> Result<Outcome<Profile>> {
        Err(self.read_only())
    }

    fn update(&self, _id: &ProfileId, _data: &ProfileData) -> Result<Outcome<Profile>> {
        Err(self.read_only())
    }

    fn delete(&self, _id: &ProfileId) -> Result<Outcome<()>> {
        Err(self.read_only())
    }
}
