use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::Request,
    response::Response,
};

use profiledex_core::config::BackendKind;
use profiledex_core::kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
use profiledex_core::store::{LocalBackend, MemoryBackend, Outcome, ProfileBackend};
use profiledex_core::{
    CatalogError, Measurements, Profile, ProfileData, ProfileId, ProfileStore, Result,
};

use crate::{WebState, app_router};

pub(super) struct TestHarness {
    _temp: Option<tempfile::TempDir>,
    pub(super) router: Router,
}

impl TestHarness {
    /// In-memory catalog seeded with three profiles.
    pub(super) fn setup() -> Self {
        let store = ProfileStore::new(Box::new(MemoryBackend::with_profiles(seed_profiles())));
        Self::from_store(store, None)
    }

    /// File-backed local catalog in a temp directory.
    pub(super) fn setup_local() -> Self {
        let temp = tempfile::tempdir().expect("tempdir");
        let kv: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(temp.path()));
        let store = ProfileStore::new(Box::new(LocalBackend::new(kv)));
        store.init().expect("init local store");
        Self::from_store(store, Some(temp))
    }

    /// Remote backend that is unreachable, with a cache fallback.
    pub(super) fn setup_offline() -> Self {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let store = ProfileStore::new(Box::new(UnreachableBackend)).with_cache(kv, true);
        store.init().expect("init offline store");
        Self::from_store(store, None)
    }

    fn from_store(store: ProfileStore, temp: Option<tempfile::TempDir>) -> Self {
        let state = WebState::new(store);
        Self {
            _temp: temp,
            router: app_router(state),
        }
    }
}

fn seed_profiles() -> Vec<Profile> {
    let mut ai = ProfileData::named("Ai Hoshino");
    ai.bra_size = Some("32C".to_string());
    ai.height = Some(5.1);
    ai.hair_color = Some("Purple".to_string());
    ai.traits = vec!["idol".to_string(), "actress".to_string()];
    ai.is_fictional = Some(true);
    ai.measurements = Measurements::new(Some(34.0), Some(24.0), Some(35.0));
    ai.social.instagram = Some("@ai_hoshino".to_string());

    let mut kana = ProfileData::named("Kana Arima");
    kana.bra_size = Some("30A".to_string());
    kana.height = Some(4.9);
    kana.hair_color = Some("Red".to_string());
    kana.traits = vec!["actress".to_string()];
    kana.is_fictional = Some(true);

    let mut mem = ProfileData::named("Mem");
    mem.hair_color = Some("Blonde".to_string());
    mem.traits = vec!["streamer".to_string()];
    mem.is_fictional = Some(false);

    vec![
        Profile::new(1, ai),
        Profile::new(2, kana),
        Profile::new(3, mem),
    ]
}

struct UnreachableBackend;

impl ProfileBackend for UnreachableBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Rest
    }

    fn list(&self) -> Result<Vec<Profile>> {
        Err(unavailable())
    }

    fn create(&self, _data: &ProfileData) -> Result<Outcome<Profile>> {
        Err(unavailable())
    }

    fn update(&self, _id: &ProfileId, _data: &ProfileData) -> Result<Outcome<Profile>> {
        Err(unavailable())
    }

    fn delete(&self, _id: &ProfileId) -> Result<Outcome<()>> {
        Err(unavailable())
    }
}

fn unavailable() -> CatalogError {
    CatalogError::Upstream {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

pub(super) async fn decode_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body bytes");
    serde_json::from_slice(&bytes).expect("decode json")
}

pub(super) fn header_value<'a>(headers: &'a axum::http::HeaderMap, key: &str) -> Option<&'a str> {
    headers.get(key).and_then(|value| value.to_str().ok())
}

pub(super) fn get_request(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("get request")
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "tests usually pass temporary `json!` values directly"
)]
pub(super) fn json_request(method: &str, path: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_vec(&body).expect("json request body"),
        ))
        .expect("json request")
}
