//! The paged transaction table.
//!
//! Every rendered table carries a view ID in its URLs. Each fetch for a view
//! is given a sequence number and a fetch that was overtaken by a newer one
//! for the same view answers `204 No Content`, which htmx does not swap.

use axum::{
    Extension,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    api::{Transaction, TransactionListQuery, TransactionStatus},
    auth::{Role, Session},
    endpoints::{self, format_endpoint},
    html::{
        BADGE_APPROVED_STYLE, BADGE_REJECTED_STYLE, BADGE_WAITING_STYLE, BUTTON_APPROVE_STYLE,
        BUTTON_REJECT_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_amount, format_count,
    },
    pagination::{PAGE_SIZE_OPTIONS, create_pagination_indicators, pagination_nav},
    timezone::format_local_date,
    transaction::{TRANSACTIONS_CHANGED_EVENT, TransactionState, detail::detail_url},
};

const TABLE_ID: &str = "transactions-table";
const TABLE_TARGET: &str = "#transactions-table";

/// The query string of a table fetch.
#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Which rendered table the fetch is for. A new ID is issued when missing.
    pub view: Option<u64>,
}

fn table_url(page: u64, per_page: u64, view: u64) -> String {
    format!(
        "{}?page={page}&per_page={per_page}&view={view}",
        endpoints::TRANSACTION_TABLE
    )
}

/// An empty table that loads the first page as soon as it is on the page.
pub(super) fn table_placeholder(per_page: u64, view: u64) -> Markup {
    html! {
        div
            id=(TABLE_ID)
            hx-get=(table_url(1, per_page, view))
            hx-trigger=(format!("load, {TRANSACTIONS_CHANGED_EVENT} from:body"))
            hx-swap="outerHTML"
            hx-sync="this:replace"
            hx-target-error="#alert-container"
            class="w-full"
        {
            p class="py-4 text-gray-500 dark:text-gray-400" { "Loading transactions..." }
        }
    }
}

fn status_badge(status: TransactionStatus) -> Markup {
    let style = match status {
        TransactionStatus::WaitingApproval => BADGE_WAITING_STYLE,
        TransactionStatus::Approved => BADGE_APPROVED_STYLE,
        TransactionStatus::Rejected | TransactionStatus::Unknown => BADGE_REJECTED_STYLE,
    };

    html! {
        span class=(style) { (status.label()) }
    }
}

fn operation_buttons(transaction: &Transaction, role: Role) -> Markup {
    let can_decide = role.is_approver() && transaction.status == TransactionStatus::WaitingApproval;

    html! {
        div class="flex items-center gap-2"
        {
            @if can_decide {
                button
                    type="button"
                    hx-patch=(format_endpoint(endpoints::APPROVE_TRANSACTION, &transaction.id))
                    hx-confirm="Are you sure you want to approve this transaction?"
                    hx-target="#alert-container"
                    hx-target-error="#alert-container"
                    hx-swap="innerHTML"
                    class=(BUTTON_APPROVE_STYLE)
                {
                    "Approve"
                }

                button
                    type="button"
                    hx-patch=(format_endpoint(endpoints::REJECT_TRANSACTION, &transaction.id))
                    hx-confirm="Are you sure you want to reject this transaction?"
                    hx-target="#alert-container"
                    hx-target-error="#alert-container"
                    hx-swap="innerHTML"
                    class=(BUTTON_REJECT_STYLE)
                {
                    "Reject"
                }
            }

            button
                type="button"
                hx-get=(detail_url(transaction))
                hx-target="#modal-container"
                hx-target-error="#alert-container"
                hx-swap="innerHTML"
                class=(LINK_STYLE)
            {
                "Detail"
            }
        }
    }
}

struct TableView<'a> {
    transactions: &'a [Transaction],
    role: Role,
    local_timezone: &'a str,
    page: u64,
    per_page: u64,
    page_count: u64,
    max_pages: u64,
    view: u64,
}

fn transactions_table(view: TableView<'_>) -> Markup {
    let indicators = create_pagination_indicators(view.page, view.page_count, view.max_pages);

    html! {
        div
            id=(TABLE_ID)
            hx-get=(table_url(view.page, view.per_page, view.view))
            hx-trigger=(format!("{TRANSACTIONS_CHANGED_EVENT} from:body"))
            hx-swap="outerHTML"
            hx-sync="this:replace"
            hx-target-error="#alert-container"
            class="w-full"
        {
            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Reference No" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Total Transfer Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Total Transfer Record" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "From Account No." }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Maker" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Transfer Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Operation" }
                        }
                    }

                    tbody
                    {
                        @for transaction in view.transactions {
                            tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
                            {
                                td class=(TABLE_CELL_STYLE) { (transaction.id) }
                                td class=(TABLE_CELL_STYLE) { (format_amount(transaction.total_amount)) }
                                td class=(TABLE_CELL_STYLE) { (format_count(transaction.total_record)) }
                                td class=(TABLE_CELL_STYLE) { (transaction.from_account) }
                                td class=(TABLE_CELL_STYLE) { (transaction.maker) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (format_local_date(&transaction.transfer_date, view.local_timezone))
                                }
                                td class=(TABLE_CELL_STYLE) { (status_badge(transaction.status)) }
                                td class=(TABLE_CELL_STYLE) { (operation_buttons(transaction, view.role)) }
                            }
                        }
                    }
                }
            }

            @if view.transactions.is_empty() {
                p class="py-4 text-center text-gray-500 dark:text-gray-400" { "No transactions found." }
            }

            div class="flex flex-wrap items-center justify-between gap-4 mt-4"
            {
                (pagination_nav(&indicators, TABLE_TARGET, |page| {
                    table_url(page, view.per_page, view.view)
                }))

                div class="flex items-center gap-2 text-sm"
                {
                    label for="per-page" { "Items per page:" }

                    // Changing the page size starts again from the first page.
                    select
                        id="per-page"
                        name="per_page"
                        hx-get=(format!("{}?page=1&view={}", endpoints::TRANSACTION_TABLE, view.view))
                        hx-target=(TABLE_TARGET)
                        hx-swap="outerHTML"
                        hx-sync=(format!("{TABLE_TARGET}:replace"))
                        class="border rounded px-2 dark:bg-gray-800"
                    {
                        @for size in PAGE_SIZE_OPTIONS {
                            option value=(size) selected[size == view.per_page] { (size) }
                        }
                    }
                }
            }
        }
    }
}

/// Fetch one page of transactions and render it as the table fragment.
///
/// Approvers only see transactions waiting for approval.
pub async fn get_transaction_table(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
    Query(query): Query<TableQuery>,
) -> Response {
    let page = state.pagination_config.page_or_default(query.page);
    let per_page = state.pagination_config.page_size_or_default(query.per_page);
    let view = query
        .view
        .unwrap_or_else(|| state.fetch_sequencer.new_view_id());

    let sequence_key = format!("{}/{view}", session.user_id);
    let sequence = state.fetch_sequencer.issue(&sequence_key);

    let list_query = TransactionListQuery {
        page,
        per_page,
        status: session
            .role
            .is_approver()
            .then_some(TransactionStatus::WaitingApproval),
    };
    let result = state.api.list_transactions(&session.token, &list_query).await;

    if !state.fetch_sequencer.is_latest(&sequence_key, sequence) {
        tracing::debug!("Dropping superseded fetch {sequence} for view {sequence_key}.");
        return StatusCode::NO_CONTENT.into_response();
    }

    match result {
        Ok(response) => transactions_table(TableView {
            transactions: &response.data,
            role: session.role,
            local_timezone: &state.local_timezone,
            page,
            per_page,
            page_count: response.pagination.total_pages,
            max_pages: state.pagination_config.max_pages,
            view,
        })
        .into_response(),
        Err(error) => Error::from(error).into_alert_response("Could not load transactions"),
    }
}
