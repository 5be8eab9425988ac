#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

use std::sync::Arc;

pub(crate) use form::{
    assert_form_error_message, assert_form_input, assert_form_submit_button, assert_hx_endpoint,
    field_error, must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_hx_redirect, get_header};

use crate::{AppState, api::FakeBatchApi, pagination::PaginationConfig};

/// App state backed by `api`, in the Jakarta timezone with OTP codes hidden.
pub(crate) fn test_state(api: Arc<FakeBatchApi>) -> AppState {
    AppState::new(
        "foobar",
        "Asia/Jakarta",
        api,
        PaginationConfig::default(),
        false,
    )
    .expect("Could not create app state")
}
