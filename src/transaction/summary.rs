//! The cards counting transactions per status on the home page.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    api::TransactionSummary,
    auth::Session,
    endpoints,
    html::format_count,
    transaction::{TRANSACTIONS_CHANGED_EVENT, TransactionState},
};

const SUMMARY_ID: &str = "transaction-summary";

const CARD_STYLE: &str = "flex flex-col gap-1 p-4 bg-white border border-gray-200 \
    rounded-lg shadow dark:bg-gray-800 dark:border-gray-700";

/// An empty summary that loads the counts as soon as it is on the page.
pub(super) fn summary_placeholder() -> Markup {
    html! {
        div
            id=(SUMMARY_ID)
            hx-get=(endpoints::TRANSACTION_SUMMARY)
            hx-trigger=(format!("load, {TRANSACTIONS_CHANGED_EVENT} from:body"))
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="grid grid-cols-1 gap-4 md:grid-cols-3"
        {
            p class="text-gray-500 dark:text-gray-400" { "Loading summary..." }
        }
    }
}

fn summary_card(label: &str, count: u64, id: &str) -> Markup {
    html! {
        div id=(id) class=(CARD_STYLE)
        {
            span class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            span class="text-2xl font-bold text-gray-900 dark:text-white" { (format_count(count)) }
        }
    }
}

fn summary_cards(summary: TransactionSummary) -> Markup {
    html! {
        div
            id=(SUMMARY_ID)
            hx-get=(endpoints::TRANSACTION_SUMMARY)
            hx-trigger=(format!("{TRANSACTIONS_CHANGED_EVENT} from:body"))
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="grid grid-cols-1 gap-4 md:grid-cols-3"
        {
            (summary_card("Awaiting Approval", summary.total_waiting_approval, "summary-waiting"))
            (summary_card("Approved", summary.total_approved, "summary-approved"))
            (summary_card("Rejected", summary.total_rejected, "summary-rejected"))
        }
    }
}

/// Fetch the per-status counts and render them as cards.
pub async fn get_transaction_summary(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
) -> Response {
    match state.api.transaction_summary(&session.token).await {
        Ok(summary) => summary_cards(summary).into_response(),
        Err(error) => Error::from(error).into_alert_response("Could not load transaction summary"),
    }
}
