//! Notion database backend. Each page in the configured database is one
//! profile; deletes archive the page instead of removing it.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::{Value, json};

use crate::config::{BackendKind, NOTION_VERSION, NotionConfig, normalize_base_url};
use crate::error::{CatalogError, Result};
use crate::models::{Profile, ProfileData, ProfileId};
use crate::store::{Outcome, ProfileBackend};

pub mod properties;

pub use properties::{is_archived, page_to_profile, profile_properties};

const PAGE_SIZE: u32 = 100;

#[derive(Clone)]
pub struct NotionBackend {
    base_url: String,
    api_key: String,
    database_id: String,
    http: Client,
}

impl std::fmt::Debug for NotionBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionBackend")
            .field("base_url", &self.base_url)
            .field("database_id", &self.database_id)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl NotionBackend {
    pub fn new(config: &NotionConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CatalogError::Config("NOTION_API_KEY is not set".to_string()))?;
        let database_id = config
            .database_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| CatalogError::Config("NOTION_DATABASE_ID is not set".to_string()))?;
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            base_url: normalize_base_url(&config.base_url),
            api_key,
            database_id,
            http,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
    }

    fn page_url(&self, id: &ProfileId) -> String {
        format!("{}/pages/{id}", self.base_url)
    }

    fn query_page(&self, cursor: Option<&str>) -> Result<Value> {
        let mut body = json!({
            "page_size": PAGE_SIZE,
            "sorts": [{ "property": properties::PROP_NAME, "direction": "ascending" }],
        });
        if let Some(cursor) = cursor {
            body["start_cursor"] = Value::String(cursor.to_string());
        }
        let url = format!("{}/databases/{}/query", self.base_url, self.database_id);
        let resp = self.authorized(self.http.post(url)).json(&body).send()?;
        Ok(check(resp, None)?.json::<Value>()?)
    }

    fn page_from_response(resp: Response, id: Option<&ProfileId>) -> Result<Profile> {
        let page = check(resp, id)?.json::<Value>()?;
        page_to_profile(&page)
    }
}

impl ProfileBackend for NotionBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Notion
    }

    fn list(&self) -> Result<Vec<Profile>> {
        let mut profiles = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0_usize;
        loop {
            let batch = self.query_page(cursor.as_deref())?;
            pages += 1;
            let results = batch
                .get("results")
                .and_then(Value::as_array)
                .ok_or_else(|| CatalogError::Upstream {
                    status: StatusCode::BAD_GATEWAY.as_u16(),
                    message: "notion: query response has no results array".to_string(),
                })?;
            for page in results {
                if is_archived(page) {
                    continue;
                }
                match page_to_profile(page) {
                    Ok(profile) => profiles.push(profile),
                    Err(err) => tracing::warn!(error = %err, "skipping unreadable notion page"),
                }
            }
            let has_more = batch.get("has_more").and_then(Value::as_bool).unwrap_or(false);
            cursor = batch
                .get("next_cursor")
                .and_then(Value::as_str)
                .map(ToString::to_string);
            if !has_more || cursor.is_none() {
                break;
            }
        }
        tracing::debug!(pages, count = profiles.len(), "notion database queried");
        Ok(profiles)
    }

    fn get(&self, id: &ProfileId) -> Result<Profile> {
        let resp = self.authorized(self.http.get(self.page_url(id))).send()?;
        let page = check(resp, Some(id))?.json::<Value>()?;
        if is_archived(&page) {
            return Err(CatalogError::NotFound(format!("profile {id}")));
        }
        page_to_profile(&page)
    }

    fn create(&self, data: &ProfileData) -> Result<Outcome<Profile>> {
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": profile_properties(data)?,
        });
        let url = format!("{}/pages", self.base_url);
        let resp = self.authorized(self.http.post(url)).json(&body).send()?;
        Self::page_from_response(resp, None).map(Outcome::backend)
    }

    fn update(&self, id: &ProfileId, data: &ProfileData) -> Result<Outcome<Profile>> {
        let body = json!({ "properties": profile_properties(data)? });
        let resp = self
            .authorized(self.http.patch(self.page_url(id)))
            .json(&body)
            .send()?;
        Self::page_from_response(resp, Some(id)).map(Outcome::backend)
    }

    fn delete(&self, id: &ProfileId) -> Result<Outcome<()>> {
        let resp = self
            .authorized(self.http.patch(self.page_url(id)))
            .json(&json!({ "archived": true }))
            .send()?;
        check(resp, Some(id))?;
        Ok(Outcome::backend(()))
    }
}

fn check(resp: Response, id: Option<&ProfileId>) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .json::<Value>()
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(ToString::to_string))
        .unwrap_or_else(|| status.to_string());
    Err(match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => CatalogError::NotFound(format!("profile {id}")),
        (StatusCode::BAD_REQUEST, _) => CatalogError::Validation(message),
        _ => CatalogError::Upstream {
            status: status.as_u16(),
            message: format!("notion: {message}"),
        },
    })
}
