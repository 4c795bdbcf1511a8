//! Record store adapter: one [`ProfileStore`] in front of a swappable
//! [`ProfileBackend`], with an optional client-side snapshot used for
//! write-through caching and degraded operation.

use std::sync::Arc;

use serde::Serialize;

use crate::config::{BackendKind, CatalogConfig};
use crate::error::{CatalogError, Result};
use crate::kv::{FileKeyValueStore, KeyValueStore};
use crate::models::{Profile, ProfileData, ProfileId};
use crate::notion::NotionBackend;

mod local;
mod memory;
mod rest;
mod snapshot;
mod static_file;

pub use local::LocalBackend;
pub use memory::MemoryBackend;
pub use rest::RestBackend;
pub use snapshot::{SNAPSHOT_KEY, Snapshot, next_numeric_id};
pub use static_file::StaticFileBackend;

/// Response header naming where a write landed: `backend` or `cache`.
pub const PERSISTENCE_HEADER: &str = "x-profiledex-persistence";
/// Response header naming where a listing came from: `backend`, `cache` or `empty`.
pub const SOURCE_HEADER: &str = "x-profiledex-source";

/// A persistence strategy. Backends are swapped wholesale, never composed.
pub trait ProfileBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn init(&self) -> Result<()> {
        Ok(())
    }

    fn list(&self) -> Result<Vec<Profile>>;

    fn get(&self, id: &ProfileId) -> Result<Profile> {
        self.list()?
            .into_iter()
            .find(|profile| &profile.id == id)
            .ok_or_else(|| CatalogError::NotFound(format!("profile {id}")))
    }

    /// Writes report where they landed; a proxying backend may itself have
    /// fallen back to a cache.
    fn create(&self, data: &ProfileData) -> Result<Outcome<Profile>>;

    fn update(&self, id: &ProfileId, data: &ProfileData) -> Result<Outcome<Profile>>;

    /// Hard delete or archive, depending on the backend.
    fn delete(&self, id: &ProfileId) -> Result<Outcome<()>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListSource {
    Backend,
    Cache,
    Empty,
}

impl ListSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Cache => "cache",
            Self::Empty => "empty",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Listing {
    pub profiles: Vec<Profile>,
    pub source: ListSource,
    /// Why the backend could not be used, when it could not.
    pub warning: Option<String>,
}

impl Listing {
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        !matches!(self.source, ListSource::Backend)
    }
}

/// Where a write actually landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "persisted", rename_all = "snake_case")]
pub enum Persistence {
    Backend,
    CacheOnly { reason: String },
}

impl Persistence {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::CacheOnly { .. } => "cache",
        }
    }

    #[must_use]
    pub const fn is_cache_only(&self) -> bool {
        matches!(self, Self::CacheOnly { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub persistence: Persistence,
}

impl<T> Outcome<T> {
    pub const fn backend(value: T) -> Self {
        Self {
            value,
            persistence: Persistence::Backend,
        }
    }

    pub fn cache_only(value: T, reason: impl Into<String>) -> Self {
        Self {
            value,
            persistence: Persistence::CacheOnly {
                reason: reason.into(),
            },
        }
    }
}

pub struct ProfileStore {
    backend: Box<dyn ProfileBackend>,
    cache: Option<Snapshot>,
    cache_fallback: bool,
}

impl std::fmt::Debug for ProfileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileStore")
            .field("backend", &self.backend.kind().as_str())
            .field("cached", &self.cache.is_some())
            .field("cache_fallback", &self.cache_fallback)
            .finish()
    }
}

impl ProfileStore {
    /// A store that talks to `backend` only.
    pub fn new(backend: Box<dyn ProfileBackend>) -> Self {
        Self {
            backend,
            cache: None,
            cache_fallback: false,
        }
    }

    /// Adds a write-through snapshot. With `fallback` set, transport failures
    /// on writes are served from the snapshot and reported as cache-only.
    #[must_use]
    pub fn with_cache(mut self, kv: Arc<dyn KeyValueStore>, fallback: bool) -> Self {
        self.cache = Some(Snapshot::new(kv));
        self.cache_fallback = fallback;
        self
    }

    #[must_use]
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn init(&self) -> Result<()> {
        if let Some(cache) = &self.cache {
            cache.ensure_initialized()?;
        }
        self.backend.init()
    }

    /// Never fails: a broken backend yields the cached snapshot, or nothing.
    pub fn list(&self) -> Listing {
        let err = match self.backend.list() {
            Ok(profiles) => {
                self.write_through(|cache| cache.replace_all(&profiles));
                return Listing {
                    profiles,
                    source: ListSource::Backend,
                    warning: None,
                };
            }
            Err(err) => err,
        };

        tracing::warn!(
            backend = self.backend.kind().as_str(),
            error = %err,
            "profile list failed; falling back"
        );
        let warning = Some(err.to_string());
        let Some(cache) = &self.cache else {
            return Listing {
                profiles: Vec::new(),
                source: ListSource::Empty,
                warning,
            };
        };
        match cache.load() {
            Ok(profiles) => Listing {
                profiles,
                source: ListSource::Cache,
                warning,
            },
            Err(cache_err) => {
                tracing::warn!(error = %cache_err, "cached snapshot unreadable");
                Listing {
                    profiles: Vec::new(),
                    source: ListSource::Empty,
                    warning,
                }
            }
        }
    }

    pub fn get(&self, id: &ProfileId) -> Result<Profile> {
        match self.backend.get(id) {
            Ok(profile) => Ok(profile),
            Err(err) => match self.cache.as_ref().filter(|_| err.is_transport()) {
                Some(cache) => {
                    tracing::warn!(%id, error = %err, "profile read served from cache");
                    cache.find(id)
                }
                None => Err(err),
            },
        }
    }

    pub fn create(&self, data: &ProfileData) -> Result<Outcome<Profile>> {
        data.validate()?;
        match self.backend.create(data) {
            Ok(outcome) => {
                self.write_through(|cache| cache.upsert(&outcome.value));
                log_write("created", &outcome.value.id, &outcome.persistence);
                Ok(outcome)
            }
            Err(err) => match self.fallback_cache(&err) {
                Some(cache) => {
                    let profile = cache.insert_new(data)?;
                    tracing::warn!(id = %profile.id, error = %err, "profile created in cache only");
                    Ok(Outcome::cache_only(profile, err.to_string()))
                }
                None => Err(err),
            },
        }
    }

    pub fn update(&self, id: &ProfileId, data: &ProfileData) -> Result<Outcome<Profile>> {
        data.validate()?;
        match self.backend.update(id, data) {
            Ok(outcome) => {
                self.write_through(|cache| cache.upsert(&outcome.value));
                log_write("updated", id, &outcome.persistence);
                Ok(outcome)
            }
            Err(err) => match self.fallback_cache(&err) {
                Some(cache) => {
                    let profile = cache.replace(id, data)?;
                    tracing::warn!(%id, error = %err, "profile updated in cache only");
                    Ok(Outcome::cache_only(profile, err.to_string()))
                }
                None => Err(err),
            },
        }
    }

    pub fn delete(&self, id: &ProfileId) -> Result<Outcome<()>> {
        match self.backend.delete(id) {
            Ok(outcome) => {
                self.write_through(|cache| cache.remove(id).map(|_| ()));
                log_write("deleted", id, &outcome.persistence);
                Ok(outcome)
            }
            Err(err) => match self.fallback_cache(&err) {
                Some(cache) => {
                    cache.remove(id)?;
                    tracing::warn!(%id, error = %err, "profile deleted in cache only");
                    Ok(Outcome::cache_only((), err.to_string()))
                }
                None => Err(err),
            },
        }
    }

    fn fallback_cache(&self, err: &CatalogError) -> Option<&Snapshot> {
        if self.cache_fallback && err.is_transport() {
            self.cache.as_ref()
        } else {
            None
        }
    }

    fn write_through(&self, apply: impl FnOnce(&Snapshot) -> Result<()>) {
        let Some(cache) = &self.cache else {
            return;
        };
        if let Err(err) = apply(cache) {
            tracing::warn!(error = %err, "failed to refresh cached snapshot");
        }
    }
}

fn log_write(action: &str, id: &ProfileId, persistence: &Persistence) {
    match persistence {
        Persistence::Backend => tracing::info!(%id, action, "profile written"),
        Persistence::CacheOnly { reason } => {
            tracing::warn!(%id, action, %reason, "backend kept the change in its cache only");
        }
    }
}

/// Builds the store described by `config`: the selected backend, plus a
/// file snapshot under the data directory for remote backends.
pub fn build_store(config: &CatalogConfig) -> Result<ProfileStore> {
    let kv: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(&config.data_dir));
    let backend_kind = config.resolved_backend();
    let store = match backend_kind {
        BackendKind::Local => ProfileStore::new(Box::new(LocalBackend::new(kv))),
        BackendKind::Memory => ProfileStore::new(Box::new(MemoryBackend::new())),
        BackendKind::Static => {
            let path = config.static_file.clone().ok_or_else(|| {
                CatalogError::Config("static backend requires PROFILEDEX_STATIC_FILE".to_string())
            })?;
            ProfileStore::new(Box::new(StaticFileBackend::new(path)))
        }
        BackendKind::Rest => ProfileStore::new(Box::new(RestBackend::new(&config.rest)?))
            .with_cache(kv, config.cache_fallback),
        BackendKind::Notion => ProfileStore::new(Box::new(NotionBackend::new(&config.notion)?))
            .with_cache(kv, config.cache_fallback),
    };
    tracing::debug!(backend = backend_kind.as_str(), "profile store configured");
    Ok(store)
}
