use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue, header},
    middleware::Next,
    response::Response,
};

// Profile photos are hotlinked from arbitrary hosts, hence the wide img-src.
const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; connect-src 'self'; \
    img-src 'self' data: http: https:; style-src 'self'; script-src 'self'; \
    object-src 'none'; base-uri 'none'; frame-ancestors 'none'";

const BASELINE_HEADERS: [(HeaderName, &str); 4] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::REFERRER_POLICY, "no-referrer"),
    (header::CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY),
];

/// Catalog data changes under the page, so JSON and health checks are never cached.
fn cache_policy(path: &str) -> Option<&'static str> {
    (path.starts_with("/api/") || path == "/health").then_some("no-store")
}

pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let cache = cache_policy(request.uri().path());
    let mut response = next.run(request).await;
    apply_headers(response.headers_mut(), cache);
    response
}

fn apply_headers(headers: &mut HeaderMap, cache: Option<&'static str>) {
    for (name, value) in BASELINE_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    if let Some(cache) = cache {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(cache));
    }
}

#[cfg(test)]
mod tests {
    use super::cache_policy;

    #[test]
    fn only_data_routes_are_uncached() {
        assert_eq!(cache_policy("/api/profiles/7"), Some("no-store"));
        assert_eq!(cache_policy("/health"), Some("no-store"));
        assert_eq!(cache_policy("/"), None);
        assert_eq!(cache_policy("/assets/index.js"), None);
    }
}
