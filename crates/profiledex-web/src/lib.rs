use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Router, middleware, routing::get};

use profiledex_core::ProfileStore;

mod dto;
mod error;
mod handlers;
mod html;
mod security;

#[cfg(test)]
mod tests;

pub use profiledex_core::store::{PERSISTENCE_HEADER, SOURCE_HEADER};

#[derive(Clone)]
pub(crate) struct WebState {
    pub(crate) store: Arc<ProfileStore>,
}

impl WebState {
    fn new(store: ProfileStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Start the catalog service and block until ctrl-c.
///
/// # Errors
/// Returns an error when the store cannot be initialized, the runtime cannot
/// be created, the socket cannot be bound, or the server exits with a failure.
pub fn serve_web(store: ProfileStore, host: &str, port: u16) -> Result<()> {
    store
        .init()
        .context("failed to initialize profile store; refusing to serve")?;
    let backend = store.backend_kind();
    let state = WebState::new(store);
    let bind_addr = format!("{host}:{port}");
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build web runtime")?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind web server at {bind_addr}"))?;
        tracing::info!(
            backend = backend.as_str(),
            addr = %listener.local_addr()?,
            "profiledex service listening"
        );

        axum::serve(listener, app_router(state))
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
            .context("web server failed")
    })
}

pub(crate) fn app_router(state: WebState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/assets/index.css", get(handlers::index_css))
        .route("/assets/index.js", get(handlers::index_js))
        .route("/health", get(handlers::health))
        .route(
            "/api/profiles",
            get(handlers::list_profiles).post(handlers::create_profile),
        )
        .route(
            "/api/profiles/{id}",
            get(handlers::get_profile)
                .put(handlers::update_profile)
                .delete(handlers::delete_profile),
        )
        .route("/api/view", get(handlers::view_profiles))
        .route("/api/facets", get(handlers::facets))
        .layer(middleware::from_fn(security::security_headers_middleware))
        .with_state(state)
}
