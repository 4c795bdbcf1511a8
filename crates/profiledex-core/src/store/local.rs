use std::sync::Arc;

use crate::config::BackendKind;
use crate::error::{CatalogError, Result};
use crate::kv::KeyValueStore;
use crate::models::{Profile, ProfileData, ProfileId};

use super::{Outcome, ProfileBackend, Snapshot};

/// Keeps the whole catalog in the key-value snapshot, like the browser-only
/// build of the app. Ids are small integers.
#[derive(Debug)]
pub struct LocalBackend {
    snapshot: Snapshot,
}

impl LocalBackend {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            snapshot: Snapshot::new(kv),
        }
    }
}

impl ProfileBackend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn init(&self) -> Result<()> {
        self.snapshot.ensure_initialized()
    }

    fn list(&self) -> Result<Vec<Profile>> {
        self.snapshot.load()
    }

    fn get(&self, id: &ProfileId) -> Result<Profile> {
        self.snapshot.find(id)
    }

    fn create(&self, data: &ProfileData) -> Result<Outcome<Profile>> {
        self.snapshot.insert_new(data).map(Outcome::backend)
    }

    fn update(&self, id: &ProfileId, data: &ProfileData) -> Result<Outcome<Profile>> {
        self.snapshot.replace(id, data).map(Outcome::backend)
    }

    fn delete(&self, id: &ProfileId) -> Result<Outcome<()>> {
        if self.snapshot.remove(id)? {
            Ok(Outcome::backend(()))
        } else {
            Err(CatalogError::NotFound(format!("profile {id}")))
        }
    }
}
