use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde_json::Value;

use profiledex_core::store::{Listing, Outcome, Persistence};
use profiledex_core::view::{apply_view, available_hair_colors, available_traits};
use profiledex_core::wire::{decode_data, encode_card, encode_id, encode_profile};
use profiledex_core::{CatalogError, Profile, ProfileId, ProfileStore, Result};

use crate::dto::{DeleteResponse, FacetsResponse, ViewParams, ViewResponse};
use crate::error::catalog_error_response;
use crate::html::{INDEX_CSS, INDEX_HTML, INDEX_JS};
use crate::{PERSISTENCE_HEADER, SOURCE_HEADER, WebState};

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn index_css() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        INDEX_CSS,
    )
        .into_response()
}

pub async fn index_js() -> Response {
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        INDEX_JS,
    )
        .into_response()
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn list_profiles(State(state): State<WebState>) -> Response {
    match with_store(&state, |store| Ok(store.list())).await {
        Ok(listing) => {
            let body = Value::Array(listing.profiles.iter().map(encode_profile).collect());
            with_header(Json(body).into_response(), SOURCE_HEADER, listing.source.as_str())
        }
        Err(err) => catalog_error_response(err, "profiles.list", None),
    }
}

pub async fn get_profile(State(state): State<WebState>, Path(raw_id): Path<String>) -> Response {
    let id = match ProfileId::parse(&raw_id) {
        Ok(id) => id,
        Err(err) => return catalog_error_response(err, "profiles.get", Some(raw_id)),
    };
    match with_store(&state, move |store| store.get(&id)).await {
        Ok(profile) => Json(encode_profile(&profile)).into_response(),
        Err(err) => catalog_error_response(err, "profiles.get", Some(raw_id)),
    }
}

pub async fn create_profile(State(state): State<WebState>, Json(body): Json<Value>) -> Response {
    let data = match decode_data(&body) {
        Ok(data) => data,
        Err(err) => return catalog_error_response(err, "profiles.create", None),
    };
    match with_store(&state, move |store| store.create(&data)).await {
        Ok(outcome) => written_response(StatusCode::CREATED, outcome),
        Err(err) => catalog_error_response(err, "profiles.create", None),
    }
}

pub async fn update_profile(
    State(state): State<WebState>,
    Path(raw_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let parsed = ProfileId::parse(&raw_id).and_then(|id| Ok((id, decode_data(&body)?)));
    let (id, data) = match parsed {
        Ok(parsed) => parsed,
        Err(err) => return catalog_error_response(err, "profiles.update", Some(raw_id)),
    };
    match with_store(&state, move |store| store.update(&id, &data)).await {
        Ok(outcome) => written_response(StatusCode::OK, outcome),
        Err(err) => catalog_error_response(err, "profiles.update", Some(raw_id)),
    }
}

pub async fn delete_profile(State(state): State<WebState>, Path(raw_id): Path<String>) -> Response {
    let id = match ProfileId::parse(&raw_id) {
        Ok(id) => id,
        Err(err) => return catalog_error_response(err, "profiles.delete", Some(raw_id)),
    };
    let encoded_id = encode_id(&id);
    match with_store(&state, move |store| store.delete(&id)).await {
        Ok(outcome) => {
            let persisted = outcome.persistence.as_str();
            let body = DeleteResponse {
                id: encoded_id,
                deleted: true,
                persisted,
            };
            with_header(Json(body).into_response(), PERSISTENCE_HEADER, persisted)
        }
        Err(err) => catalog_error_response(err, "profiles.delete", Some(raw_id)),
    }
}

pub async fn view_profiles(
    State(state): State<WebState>,
    Query(params): Query<ViewParams>,
) -> Response {
    let query = match params.into_query() {
        Ok(query) => query,
        Err(err) => return catalog_error_response(err, "profiles.view", None),
    };
    match with_store(&state, |store| Ok(store.list())).await {
        Ok(Listing {
            profiles,
            source,
            warning,
        }) => {
            let view = apply_view(&profiles, &query);
            let body = ViewResponse {
                source,
                warning,
                total: profiles.len(),
                count: view.len(),
                sort: query.sort_field.as_str(),
                direction: query.direction.as_str(),
                profiles: view.into_iter().map(encode_card).collect(),
            };
            with_header(Json(body).into_response(), SOURCE_HEADER, source.as_str())
        }
        Err(err) => catalog_error_response(err, "profiles.view", None),
    }
}

pub async fn facets(State(state): State<WebState>) -> Response {
    match with_store(&state, |store| Ok(store.list())).await {
        Ok(listing) => Json(FacetsResponse {
            source: listing.source,
            traits: available_traits(&listing.profiles),
            hair_colors: available_hair_colors(&listing.profiles),
        })
        .into_response(),
        Err(err) => catalog_error_response(err, "profiles.facets", None),
    }
}

/// Runs a store call on the blocking pool; backends use a blocking HTTP client.
async fn with_store<T, F>(state: &WebState, op: F) -> Result<T>
where
    F: FnOnce(&ProfileStore) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|err| CatalogError::Internal(format!("store task failed: {err}")))?
}

fn written_response(status: StatusCode, outcome: Outcome<Profile>) -> Response {
    let Outcome { value, persistence } = outcome;
    if let Persistence::CacheOnly { reason } = &persistence {
        tracing::warn!(id = %value.id, reason = %reason, "write kept in local cache only");
    }
    with_header(
        (status, Json(encode_profile(&value))).into_response(),
        PERSISTENCE_HEADER,
        persistence.as_str(),
    )
}

fn with_header(mut response: Response, name: &'static str, value: &'static str) -> Response {
    response
        .headers_mut()
        .insert(name, HeaderValue::from_static(value));
    response
}
