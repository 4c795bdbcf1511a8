use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde_json::Value;

use crate::config::{BackendKind, RestConfig};
use crate::error::{CatalogError, Result};
use crate::models::{Profile, ProfileData, ProfileId};
use crate::wire::{decode_profile, decode_profiles_tolerant, encode_data};

use super::{Outcome, PERSISTENCE_HEADER, ProfileBackend, SOURCE_HEADER};

/// Client for the profiledex HTTP service (`/api/profiles`). Every request
/// is bounded by the configured timeout.
#[derive(Clone)]
pub struct RestBackend {
    endpoint: String,
    http: Client,
}

impl std::fmt::Debug for RestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestBackend")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl RestBackend {
    pub fn new(config: &RestConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(CatalogError::Config("REST endpoint is empty".to_string()));
        }
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            http,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn collection_url(&self) -> String {
        format!("{}/api/profiles", self.endpoint)
    }

    fn item_url(&self, id: &ProfileId) -> String {
        format!("{}/api/profiles/{id}", self.endpoint)
    }
}

impl ProfileBackend for RestBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Rest
    }

    fn list(&self) -> Result<Vec<Profile>> {
        let resp = check(self.http.get(self.collection_url()).send()?, None)?;
        let source = header_text(&resp, SOURCE_HEADER).unwrap_or("backend");
        if source != "backend" {
            tracing::warn!(source, "REST service answered from its fallback");
        }
        let value = resp.json::<Value>()?;
        if !value.is_array() {
            return Err(CatalogError::Upstream {
                status: StatusCode::BAD_GATEWAY.as_u16(),
                message: "profile list response is not a JSON array".to_string(),
            });
        }
        let (profiles, skipped) = decode_profiles_tolerant(&value);
        if skipped > 0 {
            tracing::warn!(skipped, "REST list contained unreadable records");
        }
        Ok(profiles)
    }

    fn get(&self, id: &ProfileId) -> Result<Profile> {
        let resp = check(self.http.get(self.item_url(id)).send()?, Some(id))?;
        decode_profile(&resp.json::<Value>()?)
    }

    fn create(&self, data: &ProfileData) -> Result<Outcome<Profile>> {
        let resp = self
            .http
            .post(self.collection_url())
            .json(&encode_data(data))
            .send()?;
        written(check(resp, None)?)
    }

    fn update(&self, id: &ProfileId, data: &ProfileData) -> Result<Outcome<Profile>> {
        let resp = self
            .http
            .put(self.item_url(id))
            .json(&encode_data(data))
            .send()?;
        written(check(resp, Some(id))?)
    }

    fn delete(&self, id: &ProfileId) -> Result<Outcome<()>> {
        let resp = check(self.http.delete(self.item_url(id)).send()?, Some(id))?;
        Ok(landed((), &resp))
    }
}

fn written(resp: Response) -> Result<Outcome<Profile>> {
    let persistence = landed((), &resp).persistence;
    Ok(Outcome {
        value: decode_profile(&resp.json::<Value>()?)?,
        persistence,
    })
}

/// The service reports a write it could only keep in its own cache through
/// the persistence header; that stays visible to the caller.
fn landed<T>(value: T, resp: &Response) -> Outcome<T> {
    match header_text(resp, PERSISTENCE_HEADER) {
        Some("cache") => {
            Outcome::cache_only(value, "REST service kept the change in its cache only")
        }
        _ => Outcome::backend(value),
    }
}

fn header_text<'a>(resp: &'a Response, name: &str) -> Option<&'a str> {
    resp.headers().get(name).and_then(|value| value.to_str().ok())
}

fn check(resp: Response, id: Option<&ProfileId>) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .json::<Value>()
        .ok()
        .and_then(|body| {
            body.get("message")
                .or_else(|| body.get("error"))
                .and_then(Value::as_str)
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| status.to_string());
    Err(match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => CatalogError::NotFound(format!("profile {id}")),
        (StatusCode::BAD_REQUEST, _) => CatalogError::Validation(message),
        _ => CatalogError::Upstream {
            status: status.as_u16(),
            message,
        },
    })
}
