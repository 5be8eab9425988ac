//! Approving and rejecting pending transactions.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    alert::Alert,
    api::TransactionStatus,
    auth::Session,
    transaction::{TRANSACTIONS_CHANGED_EVENT, TransactionState},
};

/// Approve the transaction `transaction_id`.
///
/// Only approvers may do this. On success the response fires the
/// transactions-changed event so that the table and summary reload.
pub async fn approve_transaction(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<String>,
) -> Response {
    update_status(
        &state,
        &session,
        &transaction_id,
        TransactionStatus::Approved,
    )
    .await
}

/// Reject the transaction `transaction_id`.
///
/// Only approvers may do this. On success the response fires the
/// transactions-changed event so that the table and summary reload.
pub async fn reject_transaction(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<String>,
) -> Response {
    update_status(
        &state,
        &session,
        &transaction_id,
        TransactionStatus::Rejected,
    )
    .await
}

async fn update_status(
    state: &TransactionState,
    session: &Session,
    transaction_id: &str,
    status: TransactionStatus,
) -> Response {
    let (action, default_message) = match status {
        TransactionStatus::Approved => ("Could not approve transaction", "Transaction approved."),
        _ => ("Could not reject transaction", "Transaction rejected."),
    };

    if !session.role.is_approver() {
        tracing::warn!(
            "User {} with role {:?} tried to set transaction {transaction_id} to {status}.",
            session.user_id,
            session.role
        );
        return Error::Forbidden.into_alert_response(action);
    }

    match state
        .api
        .update_transaction_status(&session.token, transaction_id, status)
        .await
    {
        Ok(response) => {
            tracing::info!(
                "User {} set transaction {transaction_id} to {status}.",
                session.user_id
            );

            let message = if response.message.is_empty() {
                default_message.to_owned()
            } else {
                response.message
            };

            (
                [("HX-Trigger", TRANSACTIONS_CHANGED_EVENT)],
                Alert::SuccessSimple { message },
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("{action} {transaction_id}: {error}");
            Error::from(error).into_alert_response(action)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };

    use crate::{
        api::{ApiError, FakeBatchApi, MessageResponse, RecordedCall, TransactionStatus},
        auth::{Role, test_session},
        endpoints,
        sequence::FetchSequencer,
        test_utils::{assert_hx_redirect, get_header, parse_html_fragment},
        transaction::test_transaction_state,
    };

    use super::{approve_transaction, reject_transaction};

    fn fake_with_update(result: Result<MessageResponse, ApiError>) -> FakeBatchApi {
        FakeBatchApi {
            update_status: Some(result),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn approve_fires_transactions_changed() {
        let (state, api) = test_transaction_state(
            fake_with_update(Ok(MessageResponse {
                message: "Transaction status updated successfully".to_owned(),
            })),
            FetchSequencer::new(),
        );

        let response = approve_transaction(
            State(state),
            Extension(test_session(Role::Approver)),
            Path("trx-1".to_owned()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "hx-trigger"), "transactions-changed");
        assert_eq!(
            api.calls(),
            vec![RecordedCall::UpdateStatus(
                "test-token".to_owned(),
                "trx-1".to_owned(),
                TransactionStatus::Approved
            )]
        );

        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Transaction status updated successfully"));
    }

    #[tokio::test]
    async fn reject_sends_rejected_status_and_defaults_message() {
        let (state, api) = test_transaction_state(
            fake_with_update(Ok(MessageResponse::default())),
            FetchSequencer::new(),
        );

        let response = reject_transaction(
            State(state),
            Extension(test_session(Role::Approver)),
            Path("trx-2".to_owned()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            api.calls(),
            vec![RecordedCall::UpdateStatus(
                "test-token".to_owned(),
                "trx-2".to_owned(),
                TransactionStatus::Rejected
            )]
        );

        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Transaction rejected."));
    }

    #[tokio::test]
    async fn maker_cannot_approve() {
        let (state, api) = test_transaction_state(
            fake_with_update(Ok(MessageResponse::default())),
            FetchSequencer::new(),
        );

        let response = approve_transaction(
            State(state),
            Extension(test_session(Role::Maker)),
            Path("trx-1".to_owned()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(api.calls().is_empty());
        assert!(response.headers().get("hx-trigger").is_none());
    }

    #[tokio::test]
    async fn failure_is_shown_and_does_not_refresh() {
        let (state, _) = test_transaction_state(
            fake_with_update(Err(ApiError::Rejected {
                status: 400,
                message: "Transaction is not waiting for approval".to_owned(),
            })),
            FetchSequencer::new(),
        );

        let response = reject_transaction(
            State(state),
            Extension(test_session(Role::Approver)),
            Path("trx-1".to_owned()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get("hx-trigger").is_none());

        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Could not reject transaction"));
        assert!(text.contains("Transaction is not waiting for approval"));
    }

    #[tokio::test]
    async fn expired_token_logs_out() {
        let (state, _) = test_transaction_state(
            fake_with_update(Err(ApiError::Unauthorized)),
            FetchSequencer::new(),
        );

        let response = approve_transaction(
            State(state),
            Extension(test_session(Role::Approver)),
            Path("trx-1".to_owned()),
        )
        .await;

        assert_hx_redirect(&response, endpoints::LOG_OUT);
    }
}
