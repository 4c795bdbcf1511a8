use std::sync::{Mutex, MutexGuard};

use crate::config::BackendKind;
use crate::error::{CatalogError, Result};
use crate::models::{Profile, ProfileData, ProfileId};

use super::{Outcome, ProfileBackend, next_numeric_id};

/// In-process backend. Nothing survives the process; used for tests and
/// throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    profiles: Mutex<Vec<Profile>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: Mutex::new(profiles),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Profile>>> {
        self.profiles
            .lock()
            .map_err(|_| CatalogError::Internal("memory backend lock poisoned".to_string()))
    }
}

impl ProfileBackend for MemoryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn list(&self) -> Result<Vec<Profile>> {
        Ok(self.lock()?.clone())
    }

    fn create(&self, data: &ProfileData) -> Result<Outcome<Profile>> {
        let mut profiles = self.lock()?;
        let profile = Profile::new(next_numeric_id(&profiles), data.clone());
        profiles.push(profile.clone());
        Ok(Outcome::backend(profile))
    }

    fn update(&self, id: &ProfileId, data: &ProfileData) -> Result<Outcome<Profile>> {
        let mut profiles = self.lock()?;
        let existing = profiles
            .iter_mut()
            .find(|profile| &profile.id == id)
            .ok_or_else(|| CatalogError::NotFound(format!("profile {id}")))?;
        existing.data = data.clone();
        Ok(Outcome::backend(existing.clone()))
    }

    fn delete(&self, id: &ProfileId) -> Result<Outcome<()>> {
        let mut profiles = self.lock()?;
        let before = profiles.len();
        profiles.retain(|profile| &profile.id != id);
        if profiles.len() == before {
            return Err(CatalogError::NotFound(format!("profile {id}")));
        }
        Ok(Outcome::backend(()))
    }
}
