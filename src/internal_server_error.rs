//! The error page shown when a page cannot be built, e.g. the API is down.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub struct InternalServerError<'a> {
    pub status: StatusCode,
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

impl InternalServerError<'_> {
    /// The page for when the batch-payment API could not be reached or gave
    /// an answer that could not be read.
    pub fn upstream_unavailable() -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            description: "The payment service is unavailable.",
            fix: "Try again in a few minutes. If the problem persists, contact your administrator.",
        }
    }

    pub fn into_html(self) -> Html<String> {
        let header = self.status.as_u16().to_string();

        Html(error_view("Internal Server Error", &header, self.description, self.fix).into_string())
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        (self.status, self.into_html()).into_response()
    }
}

pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::test_utils::{assert_valid_html, parse_html_document};

    use super::{InternalServerError, get_internal_server_error_page};

    #[tokio::test]
    async fn error_page_has_500_status() {
        let response = get_internal_server_error_page().await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Sorry, something went wrong."));
    }

    #[tokio::test]
    async fn upstream_page_is_bad_gateway() {
        let response = InternalServerError::upstream_unavailable().into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let html = parse_html_document(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("502"));
        assert!(text.contains("The payment service is unavailable."));
    }
}
