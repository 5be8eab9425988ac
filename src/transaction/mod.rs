//! Batch transactions: the home and list pages, the paged transaction table,
//! the status summary, the detail modal and the approve/reject actions.
//!
//! The pages only render placeholders. The table and summary load
//! themselves with htmx and reload whenever a response fires the
//! `transactions-changed` event.

mod detail;
mod pages;
mod status;
mod summary;
mod table;

use std::sync::Arc;

use axum::extract::FromRef;

pub use detail::get_transaction_detail;
pub use pages::{get_home_page, get_transactions_page};
pub use status::{approve_transaction, reject_transaction};
pub use summary::get_transaction_summary;
pub use table::get_transaction_table;

use crate::{AppState, api::BatchApi, pagination::PaginationConfig, sequence::FetchSequencer};

/// The htmx event that makes the table and summary reload.
pub const TRANSACTIONS_CHANGED_EVENT: &str = "transactions-changed";

/// The state needed by the transaction pages and fragments.
#[derive(Debug, Clone)]
pub struct TransactionState {
    pub api: Arc<dyn BatchApi>,
    pub local_timezone: String,
    pub pagination_config: PaginationConfig,
    pub fetch_sequencer: FetchSequencer,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            local_timezone: state.local_timezone.clone(),
            pagination_config: state.pagination_config.clone(),
            fetch_sequencer: state.fetch_sequencer.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_transaction_state(
    api: crate::api::FakeBatchApi,
    fetch_sequencer: FetchSequencer,
) -> (TransactionState, Arc<crate::api::FakeBatchApi>) {
    let api = Arc::new(api);
    let state = TransactionState {
        api: api.clone(),
        local_timezone: "Asia/Jakarta".to_owned(),
        pagination_config: PaginationConfig::default(),
        fetch_sequencer,
    };

    (state, api)
}

#[cfg(test)]
pub(crate) fn test_transaction(id: &str, status: crate::api::TransactionStatus) -> crate::api::Transaction {
    crate::api::Transaction {
        id: id.to_owned(),
        total_amount: 6000.0,
        total_record: 3,
        from_account: "8880001".to_owned(),
        maker: "Maker One".to_owned(),
        transfer_date: "2024-05-01T00:00:00Z".to_owned(),
        status,
        created_at: "2024-05-01T03:04:05Z".to_owned(),
    }
}
