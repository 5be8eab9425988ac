//! Helpers for the `redirect_url` carried through the log-in page.
//!
//! Only same-site page paths are accepted so that the log-in form cannot be
//! used to send users to another site or back into an endpoint.

use axum::{extract::Request, http::Uri};
use tracing::{error, warn};

use crate::endpoints;

fn is_safe_redirect_url(redirect_url: &str) -> bool {
    if !redirect_url.starts_with('/') || redirect_url.starts_with("//") {
        return false;
    }

    let path = redirect_url
        .split_once('?')
        .map(|(path, _)| path)
        .unwrap_or(redirect_url);

    path != endpoints::LOG_IN_VIEW && path != "/api" && !path.starts_with("/api/")
}

/// Reduce `raw_url` to a safe local path and query, or `None` if it points
/// elsewhere.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// The `HX-Current-URL` header holds the full URL of the page, so only the
/// host is dropped.
fn normalize_hx_current_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// The log-in page URL that returns the user to where `request` was headed.
///
/// Requests to `/api` come from htmx, so the page the user is on is taken
/// from the `HX-Current-URL` header instead.
pub fn build_log_in_redirect_url(request: &Request) -> Option<String> {
    let redirect_target = if request.uri().path().starts_with("/api") {
        redirect_target_from_hx_request(request)?
    } else {
        redirect_target_from_request_uri(request)?
    };

    build_log_in_redirect_url_from_target(&redirect_target)
}

pub(super) fn build_log_in_redirect_url_from_target(redirect_target: &str) -> Option<String> {
    match serde_urlencoded::to_string([("redirect_url", redirect_target)]) {
        Ok(param) => Some(format!("{}?{}", endpoints::LOG_IN_VIEW, param)),
        Err(error) => {
            error!("Could not encode redirect URL {redirect_target}: {error}");
            None
        }
    }
}

fn redirect_target_from_request_uri(request: &Request) -> Option<String> {
    let path_and_query = request.uri().path_and_query()?.as_str();
    normalize_redirect_url(path_and_query)
}

fn redirect_target_from_hx_request(request: &Request) -> Option<String> {
    let headers = request.headers();
    let hx_request = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .map(|header| header.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if !hx_request {
        warn!("Missing HX-Request header for /api request.");
        return None;
    }

    let current_url = match headers
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok())
    {
        Some(value) => value,
        None => {
            warn!("Missing HX-Current-URL header for /api request.");
            return None;
        }
    };

    let redirect_url = normalize_hx_current_url(current_url);
    if redirect_url.is_none() {
        warn!("Invalid HX-Current-URL header value: {current_url}");
    }

    redirect_url
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, extract::Request};

    use crate::endpoints;

    use super::{build_log_in_redirect_url, normalize_redirect_url};

    #[test]
    fn accepts_local_pages() {
        assert_eq!(
            normalize_redirect_url("/admin/transactions?page=2").as_deref(),
            Some("/admin/transactions?page=2")
        );
    }

    #[test]
    fn rejects_other_sites_and_endpoints() {
        for url in [
            "https://evil.example.com/admin",
            "//evil.example.com/admin",
            "admin",
            endpoints::LOG_IN_VIEW,
            endpoints::LOG_OUT,
            endpoints::TRANSACTION_TABLE,
        ] {
            assert_eq!(normalize_redirect_url(url), None, "want {url} rejected");
        }
    }

    #[test]
    fn page_request_redirects_back_to_page() {
        let request = Request::builder()
            .uri("/admin/create-transaction")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            build_log_in_redirect_url(&request).as_deref(),
            Some("/login?redirect_url=%2Fadmin%2Fcreate-transaction")
        );
    }

    #[test]
    fn htmx_request_redirects_back_to_current_page() {
        let request = Request::builder()
            .uri(endpoints::TRANSACTION_TABLE)
            .header("HX-Request", "true")
            .header("HX-Current-URL", "http://localhost:3000/admin")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            build_log_in_redirect_url(&request).as_deref(),
            Some("/login?redirect_url=%2Fadmin")
        );
    }

    #[test]
    fn api_request_without_htmx_headers_has_no_target() {
        let request = Request::builder()
            .uri(endpoints::TRANSACTION_TABLE)
            .body(Body::empty())
            .unwrap();

        assert_eq!(build_log_in_redirect_url(&request), None);
    }
}
