//! Creating batch transactions from an uploaded CSV of transfers.
//!
//! The create page posts its form to the validation endpoint, which either
//! marks the failing fields or opens a confirmation modal. Confirming posts
//! the same form to the creation endpoint, which checks it again and
//! forwards the file to the API.

mod csv;
mod form;
mod page;
mod submit;

use std::sync::Arc;

use axum::extract::FromRef;

pub use page::get_create_transaction_page;
pub use submit::{create_batch, validate_batch};

use crate::{AppState, api::BatchApi};

/// The state needed for creating batches.
#[derive(Debug, Clone)]
pub struct BatchState {
    pub api: Arc<dyn BatchApi>,
}

impl FromRef<AppState> for BatchState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}
