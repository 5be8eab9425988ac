//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, patch, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_register_page, post_log_in,
        post_register, post_send_otp,
    },
    batch::{create_batch, get_create_transaction_page, validate_batch},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{
        approve_transaction, get_home_page, get_transaction_detail, get_transaction_summary,
        get_transaction_table, get_transactions_page, reject_transaction,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::REGISTER_API, post(post_register))
        .route(endpoints::SEND_OTP, post(post_send_otp))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::HOME_VIEW, get(get_home_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::CREATE_TRANSACTION_VIEW,
            get(get_create_transaction_page),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // htmx requests need the HX-Redirect header for auth redirects to work.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::TRANSACTION_TABLE, get(get_transaction_table))
            .route(endpoints::TRANSACTION_SUMMARY, get(get_transaction_summary))
            .route(endpoints::TRANSACTION_DETAIL, get(get_transaction_detail))
            .route(endpoints::APPROVE_TRANSACTION, patch(approve_transaction))
            .route(endpoints::REJECT_TRANSACTION, patch(reject_transaction))
            .route(endpoints::VALIDATE_BATCH, post(validate_batch))
            .route(endpoints::BATCHES, post(create_batch))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the home page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::HOME_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_home() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::HOME_VIEW);
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;

    use crate::{
        api::{
            CorporateInfo, FakeBatchApi, LogInResponse, Pagination, TransactionListResponse,
            TransactionSummary, UserInfo,
        },
        auth::COOKIE_SESSION,
        endpoints,
        test_utils::test_state,
    };

    use super::build_router;

    fn log_in_response(role: &str) -> LogInResponse {
        LogInResponse {
            token: "jwt-token".to_owned(),
            user: UserInfo {
                user_id: "user1".to_owned(),
                user_name: "User One".to_owned(),
                role: role.to_owned(),
                last_login_at: None,
            },
            corporate: CorporateInfo {
                account_number: "8880001".to_owned(),
                account_name: "PT Contoh".to_owned(),
            },
        }
    }

    fn get_test_server(role: &str) -> TestServer {
        let api = Arc::new(FakeBatchApi {
            log_in: Some(Ok(log_in_response(role))),
            list_transactions: Some(Ok(TransactionListResponse {
                data: Vec::new(),
                pagination: Pagination {
                    total_pages: 1,
                    ..Default::default()
                },
            })),
            summary: Some(Ok(TransactionSummary::default())),
            ..Default::default()
        });
        let app = build_router(test_state(api));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    async fn log_in(server: &TestServer) -> Cookie<'static> {
        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[
                ("account_number", "8880001"),
                ("user_id", "user1"),
                ("password", "hunter2"),
            ])
            .await;

        response.cookie(COOKIE_SESSION)
    }

    #[tokio::test]
    async fn pages_require_log_in() {
        let server = get_test_server("Maker");

        for page in [
            endpoints::HOME_VIEW,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::CREATE_TRANSACTION_VIEW,
        ] {
            let response = server.get(page).await;

            response.assert_status(StatusCode::SEE_OTHER);
            let location = response.header("location");
            assert!(
                location
                    .to_str()
                    .unwrap()
                    .starts_with(endpoints::LOG_IN_VIEW),
                "{page} redirected to {location:?}"
            );
        }
    }

    #[tokio::test]
    async fn logged_in_user_can_load_pages_and_fragments() {
        let server = get_test_server("Approver");
        let session_cookie = log_in(&server).await;

        for page in [
            endpoints::HOME_VIEW,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::CREATE_TRANSACTION_VIEW,
            endpoints::TRANSACTION_SUMMARY,
            "/api/transactions/table?page=1&per_page=5&view=1",
        ] {
            server
                .get(page)
                .add_cookie(session_cookie.clone())
                .await
                .assert_status_ok();
        }
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server("Maker");

        server
            .get("/does-not-exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn serves_csv_template() {
        let server = get_test_server("Maker");

        let response = server.get(endpoints::CSV_TEMPLATE).await;

        response.assert_status_ok();
        assert!(
            response
                .text()
                .starts_with("To Account Bank,To Account No,To Account Name,Amount")
        );
    }
}
