//! The validation and creation endpoints behind the upload form.

use axum::{
    Extension,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    Error,
    alert::Alert,
    api::BatchUpload,
    auth::Session,
    batch::{
        BatchState,
        form::{BatchErrors, ValidBatch, parse_batch_form},
        page::{FORM_ID, batch_form, field_errors_oob},
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CLOSE_MODAL_SCRIPT, close_modal_oob,
        format_amount, format_count, modal,
    },
};

const CREATED_MSG: &str = "Transaction created successfully.";
const CREATE_FAILED_ACTION: &str = "Could not create transaction";

fn confirm_modal(batch: &ValidBatch, from_account: &str) -> Markup {
    let body = html! {
        div class="p-4 space-y-1 rounded-md bg-gray-50 dark:bg-gray-700"
        {
            p { span class="font-medium" { "Total Transfer Record: " } (format_count(batch.total_record)) }
            p { span class="font-medium" { "Total Transfer Amount: " } (format_amount(batch.total_amount as f64)) }
        }

        div class="p-4 space-y-1 rounded-md bg-gray-50 dark:bg-gray-700"
        {
            p { span class="font-medium" { "From Account No: " } (from_account) }
            p { span class="font-medium" { "Instruction Type: " } (batch.instruction_type) }
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

        button type="submit" form=(FORM_ID) class=(BUTTON_PRIMARY_STYLE)
        {
            "Confirm"
        }
    };

    modal("Create Transaction", &body, &footer)
}

/// Check the upload form and open the confirmation modal if it is valid.
///
/// The field messages are always swapped out of band so that fixed fields
/// lose their old message.
pub async fn validate_batch(
    Extension(session): Extension<Session>,
    multipart: Multipart,
) -> Response {
    let form = match parse_batch_form(multipart).await {
        Ok(form) => form,
        Err(error) => return error.into_alert_response("Could not read the upload form"),
    };

    match form.validate() {
        Ok(batch) => html! {
            (confirm_modal(&batch, &session.account_no))
            (field_errors_oob(&BatchErrors::default()))
        }
        .into_response(),
        Err(errors) => field_errors_oob(&errors).into_response(),
    }
}

/// The alert for an upload plus a fresh form and a closed modal. The form is
/// reset whether or not the upload succeeded.
fn upload_result(alert: Alert) -> Markup {
    html! {
        (alert.into_markup())
        (batch_form(true))
        (close_modal_oob())
    }
}

/// Check the upload form again and forward the batch to the API.
pub async fn create_batch(
    State(state): State<BatchState>,
    Extension(session): Extension<Session>,
    multipart: Multipart,
) -> Response {
    let form = match parse_batch_form(multipart).await {
        Ok(form) => form,
        Err(error) => return error.into_alert_response(CREATE_FAILED_ACTION),
    };

    let batch = match form.validate() {
        Ok(batch) => batch,
        Err(errors) => {
            tracing::debug!("Rejected batch upload from {}: {errors:?}", session.user_id);
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                html! {
                    (Alert::ErrorSimple {
                        message: "Please fix the errors in the form.".to_owned(),
                    }
                    .into_markup())
                    (field_errors_oob(&errors))
                    (close_modal_oob())
                },
            )
                .into_response();
        }
    };

    let upload = BatchUpload {
        file_name: batch.file.file_name,
        contents: batch.file.contents,
        total_amount: batch.total_amount,
        total_record: batch.total_record,
        from_account: session.account_no.clone(),
        user_id: session.user_id.clone(),
        maker: session.user_name.clone(),
    };

    match state.api.create_batch(&session.token, upload).await {
        Ok(response) => {
            tracing::info!(
                "User {} created a batch of {} transfers.",
                session.user_id,
                batch.total_record
            );

            let message = if response.message.is_empty() {
                CREATED_MSG.to_owned()
            } else {
                response.message
            };

            upload_result(Alert::Success {
                message,
                details: format!(
                    "{} transfers totalling {} were submitted for approval.",
                    format_count(batch.total_record),
                    format_amount(batch.total_amount as f64)
                ),
            })
            .into_response()
        }
        Err(error) => match Error::from(error).into_alert(CREATE_FAILED_ACTION) {
            Some((status_code, alert)) => (status_code, upload_result(alert)).into_response(),
            None => (HxRedirect(endpoints::LOG_OUT.to_owned()), StatusCode::OK).into_response(),
        },
    }
}
