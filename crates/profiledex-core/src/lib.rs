// Public fallible APIs in this crate share one concrete error contract (`CatalogError`).
// Repeating per-function `# Errors` boilerplate obscures behavior more than it clarifies.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod config;
pub mod error;
pub mod kv;
pub mod models;
pub mod notion;
pub mod preferences;
pub mod search;
pub mod store;
pub mod view;
pub mod wire;

#[cfg(test)]
mod test_http;

pub use config::{BackendKind, CatalogConfig};
pub use error::{CatalogError, ErrorPayload, Result};
pub use models::{Measurements, Profile, ProfileData, ProfileId, SocialLinks, SocialPlatform};
pub use preferences::{GridSize, Preferences};
pub use store::{ListSource, Listing, Outcome, Persistence, ProfileBackend, ProfileStore, build_store};
pub use view::{FilterOptions, SortDirection, SortField, ViewQuery, apply_view};
