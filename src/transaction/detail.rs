//! The modal listing the destination transfers of one transaction.
//!
//! The API's detail endpoint only returns the lines, so the table row's
//! summary fields travel along in the query string of the request. Those
//! header fields are display-only and are not checked against the API.

use axum::{
    Extension,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    Error,
    api::{Transaction, TransactionDetail, TransactionStatus},
    auth::Session,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_SECONDARY_STYLE, CLOSE_MODAL_SCRIPT, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, format_amount, format_count, modal,
    },
    timezone::{format_local_date, format_local_date_time},
    transaction::TransactionState,
};

/// The max number of graphemes to display in the description column before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// The fields of the table row that the modal header shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailQuery {
    pub from_account: String,
    pub maker: String,
    pub created_at: String,
    pub transfer_date: String,
    pub total_record: u64,
    pub total_amount: f64,
    pub status: TransactionStatus,
}

impl From<&Transaction> for DetailQuery {
    fn from(transaction: &Transaction) -> Self {
        Self {
            from_account: transaction.from_account.clone(),
            maker: transaction.maker.clone(),
            created_at: transaction.created_at.clone(),
            transfer_date: transaction.transfer_date.clone(),
            total_record: transaction.total_record,
            total_amount: transaction.total_amount,
            status: transaction.status,
        }
    }
}

/// The URL that opens the detail modal for `transaction`.
pub(super) fn detail_url(transaction: &Transaction) -> String {
    let path = format_endpoint(endpoints::TRANSACTION_DETAIL, &transaction.id);

    match serde_urlencoded::to_string(DetailQuery::from(transaction)) {
        Ok(query) => format!("{path}?{query}"),
        Err(error) => {
            tracing::error!(
                "Could not encode detail query for transaction {}: {error}",
                transaction.id
            );
            path
        }
    }
}

fn format_description(description: Option<&str>) -> String {
    let Some(description) = description.filter(|description| !description.trim().is_empty())
    else {
        return "N/A".to_owned();
    };

    if description.graphemes(true).count() <= MAX_DESCRIPTION_GRAPHEMES {
        description.to_owned()
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        truncated + "..."
    }
}

fn detail_field(label: &str, value: &str) -> Markup {
    html! {
        p
        {
            span class="font-medium" { (label) ": " }
            (value)
        }
    }
}

fn detail_modal(
    transaction_id: &str,
    summary: &DetailQuery,
    lines: &[TransactionDetail],
    local_timezone: &str,
) -> Markup {
    let body = html! {
        div class="grid grid-cols-1 gap-4 p-4 rounded-md bg-gray-50 dark:bg-gray-700 md:grid-cols-2"
        {
            div class="space-y-1"
            {
                (detail_field("From Account", &summary.from_account))
                (detail_field(
                    "Submit Date and Time",
                    &format_local_date_time(&summary.created_at, local_timezone),
                ))
                (detail_field(
                    "Transfer Date",
                    &format_local_date(&summary.transfer_date, local_timezone),
                ))
                (detail_field("Instruction Type", "Immediate"))
            }

            div class="space-y-1"
            {
                (detail_field("Maker", &summary.maker))
                (detail_field("Reference No", transaction_id))
                (detail_field("Transfer Type", "Online"))
            }
        }

        div class="space-y-1 px-4"
        {
            (detail_field("Total Transfer Record", &format_count(summary.total_record)))
            (detail_field("Total Amount", &format_amount(summary.total_amount)))
            (detail_field("Estimated Service Fee", &format_amount(0.0)))
        }

        div class="overflow-x-auto"
        {
            table id="transaction-detail-lines" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "No" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "To Account No" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "To Account Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "To Account Bank" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Transfer Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                    }
                }

                tbody
                {
                    @for (index, line) in lines.iter().enumerate() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (index + 1) }
                            td class=(TABLE_CELL_STYLE) { (line.account_id_dest) }
                            td class=(TABLE_CELL_STYLE) { (line.account_name_dest) }
                            td class=(TABLE_CELL_STYLE) { (line.bank_dest) }
                            td class=(TABLE_CELL_STYLE) { (format_amount(line.amount)) }
                            td
                                class=(TABLE_CELL_STYLE)
                                title=[line.description.as_deref()]
                            {
                                (format_description(line.description.as_deref()))
                            }
                            td class=(TABLE_CELL_STYLE) { (summary.status.label()) }
                        }
                    }
                }
            }

            @if lines.is_empty() {
                p class="py-4 text-center text-gray-500 dark:text-gray-400" { "No transfer records." }
            }
        }
    };

    let footer = html! {
        button
            type="button"
            hx-on:click=(CLOSE_MODAL_SCRIPT)
            class=(BUTTON_SECONDARY_STYLE)
        {
            "Close"
        }
    };

    modal("Transaction Detail", &body, &footer)
}

/// Fetch the destination lines of a transaction and render the detail modal.
pub async fn get_transaction_detail(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<String>,
    Query(summary): Query<DetailQuery>,
) -> Response {
    match state
        .api
        .transaction_details(&session.token, &transaction_id)
        .await
    {
        Ok(lines) => {
            detail_modal(&transaction_id, &summary, &lines, &state.local_timezone).into_response()
        }
        Err(error) => Error::from(error).into_alert_response("Could not load transaction details"),
    }
}
