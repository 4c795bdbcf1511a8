use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::error::{CatalogError, Result};
use crate::kv::KeyValueStore;
use crate::models::{Profile, ProfileData, ProfileId};
use crate::wire::{decode_profile, encode_profile};

/// Fixed key of the persisted profile snapshot.
pub const SNAPSHOT_KEY: &str = "profileAppData";

/// The client-side copy of the catalog: a JSON array of wire records under
/// [`SNAPSHOT_KEY`]. Mutations are serialized through an internal lock so
/// read-modify-write cycles from one process do not interleave.
pub struct Snapshot {
    kv: Arc<dyn KeyValueStore>,
    write_gate: Mutex<()>,
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("key", &SNAPSHOT_KEY)
            .finish_non_exhaustive()
    }
}

impl Snapshot {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_gate: Mutex::new(()),
        }
    }

    /// Seeds an empty array when nothing has been stored yet.
    pub fn ensure_initialized(&self) -> Result<()> {
        let _guard = self.lock()?;
        if self.kv.get(SNAPSHOT_KEY)?.is_none() {
            self.kv.set(SNAPSHOT_KEY, "[]")?;
        }
        Ok(())
    }

    pub fn load(&self) -> Result<Vec<Profile>> {
        let entries = self.load_entries()?;
        let unreadable = entries
            .iter()
            .filter(|entry| matches!(entry, Entry::Unreadable(_)))
            .count();
        if unreadable > 0 {
            tracing::warn!(skipped = unreadable, "snapshot contained unreadable records");
        }
        Ok(entries
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Profile(profile) => Some(profile),
                Entry::Unreadable(_) => None,
            })
            .collect())
    }

    /// Replaces every readable record; unreadable entries are kept as-is.
    pub fn replace_all(&self, profiles: &[Profile]) -> Result<()> {
        let _guard = self.lock()?;
        let mut entries = self.load_entries()?;
        entries.retain(|entry| matches!(entry, Entry::Unreadable(_)));
        entries.extend(profiles.iter().cloned().map(Entry::Profile));
        self.save(&entries)
    }

    pub fn find(&self, id: &ProfileId) -> Result<Profile> {
        self.load()?
            .into_iter()
            .find(|profile| &profile.id == id)
            .ok_or_else(|| CatalogError::NotFound(format!("profile {id}")))
    }

    /// Appends a record under a freshly assigned numeric id.
    pub fn insert_new(&self, data: &ProfileData) -> Result<Profile> {
        let _guard = self.lock()?;
        let mut entries = self.load_entries()?;
        let profile = Profile::new(next_entry_id(&entries), data.clone());
        entries.push(Entry::Profile(profile.clone()));
        self.save(&entries)?;
        Ok(profile)
    }

    /// Inserts or replaces the record with `profile.id`.
    pub fn upsert(&self, profile: &Profile) -> Result<()> {
        let _guard = self.lock()?;
        let mut entries = self.load_entries()?;
        match find_entry(&mut entries, &profile.id) {
            Some(existing) => *existing = profile.clone(),
            None => entries.push(Entry::Profile(profile.clone())),
        }
        self.save(&entries)
    }

    /// Replaces the data of an existing record.
    pub fn replace(&self, id: &ProfileId, data: &ProfileData) -> Result<Profile> {
        let _guard = self.lock()?;
        let mut entries = self.load_entries()?;
        let existing = find_entry(&mut entries, id)
            .ok_or_else(|| CatalogError::NotFound(format!("profile {id}")))?;
        existing.data = data.clone();
        let updated = existing.clone();
        self.save(&entries)?;
        Ok(updated)
    }

    /// Removes a record; returns whether it was present.
    pub fn remove(&self, id: &ProfileId) -> Result<bool> {
        let _guard = self.lock()?;
        let mut entries = self.load_entries()?;
        let before = entries.len();
        entries.retain(|entry| !matches!(entry, Entry::Profile(profile) if &profile.id == id));
        let removed = entries.len() != before;
        if removed {
            self.save(&entries)?;
        }
        Ok(removed)
    }

    fn load_entries(&self) -> Result<Vec<Entry>> {
        let Some(raw) = self.kv.get(SNAPSHOT_KEY)? else {
            return Ok(Vec::new());
        };
        let Value::Array(items) = serde_json::from_str::<Value>(&raw)? else {
            return Err(CatalogError::Validation(format!(
                "{SNAPSHOT_KEY} must hold a JSON array"
            )));
        };
        Ok(items
            .into_iter()
            .map(|item| match decode_profile(&item) {
                Ok(profile) => Entry::Profile(profile),
                Err(_) => Entry::Unreadable(item),
            })
            .collect())
    }

    fn save(&self, entries: &[Entry]) -> Result<()> {
        let items = entries
            .iter()
            .map(|entry| match entry {
                Entry::Profile(profile) => encode_profile(profile),
                Entry::Unreadable(raw) => raw.clone(),
            })
            .collect();
        let raw = serde_json::to_string(&Value::Array(items))?;
        self.kv.set(SNAPSHOT_KEY, &raw)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_gate
            .lock()
            .map_err(|_| CatalogError::Internal("snapshot lock poisoned".to_string()))
    }
}

/// A stored array item. Items that do not decode are carried through writes
/// untouched so older or partial records are never dropped.
#[derive(Debug)]
enum Entry {
    Profile(Profile),
    Unreadable(Value),
}

fn find_entry<'a>(entries: &'a mut [Entry], id: &ProfileId) -> Option<&'a mut Profile> {
    entries.iter_mut().find_map(|entry| match entry {
        Entry::Profile(profile) if &profile.id == id => Some(profile),
        _ => None,
    })
}

fn next_entry_id(entries: &[Entry]) -> ProfileId {
    next_id_of(entries.iter().filter_map(|entry| match entry {
        Entry::Profile(profile) => Some(&profile.id),
        Entry::Unreadable(_) => None,
    }))
}

/// One more than the largest numeric id, or 1 for an empty collection.
/// String ids that hold digits count as numbers; other ids are ignored.
#[must_use]
pub fn next_numeric_id(profiles: &[Profile]) -> ProfileId {
    next_id_of(profiles.iter().map(|profile| &profile.id))
}

fn next_id_of<'a>(ids: impl Iterator<Item = &'a ProfileId>) -> ProfileId {
    let max = ids
        .filter_map(|id| match id {
            ProfileId::Number(value) => Some(*value),
            ProfileId::Text(value) => value.parse::<i64>().ok(),
        })
        .max()
        .unwrap_or(0);
    ProfileId::Number(max.saturating_add(1))
}
