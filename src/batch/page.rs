//! The page with the batch upload form.

use axum::{
    Extension,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    auth::Session,
    batch::form::{BatchErrors, INSTRUCTION_TYPES},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
};

pub(super) const FORM_ID: &str = "batch-form";

/// The ID of the message paragraph under each field.
pub(super) const FILE_ERROR_ID: &str = "file-error";
pub(super) const INSTRUCTION_TYPE_ERROR_ID: &str = "instruction-type-error";
pub(super) const RECORD_ERROR_ID: &str = "record-error";
pub(super) const AMOUNT_ERROR_ID: &str = "amount-error";

fn error_paragraph(id: &str, message: Option<&str>, oob: bool) -> Markup {
    html! {
        p
            id=(id)
            class=(FORM_ERROR_STYLE)
            hx-swap-oob=[oob.then_some("true")]
        {
            @if let Some(message) = message {
                (message)
            }
        }
    }
}

/// Replace the message under every field, clearing the ones that passed.
pub(super) fn field_errors_oob(errors: &BatchErrors) -> Markup {
    html! {
        (error_paragraph(FILE_ERROR_ID, errors.file, true))
        (error_paragraph(INSTRUCTION_TYPE_ERROR_ID, errors.instruction_type, true))
        (error_paragraph(RECORD_ERROR_ID, errors.record, true))
        (error_paragraph(AMOUNT_ERROR_ID, errors.amount, true))
    }
}

fn number_input(name: &str, label: &str, placeholder: &str, error_id: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                type="number"
                name=(name)
                id=(name)
                min="0"
                step="1"
                placeholder=(placeholder)
                class=(FORM_TEXT_INPUT_STYLE);

            (error_paragraph(error_id, None, false))
        }
    }
}

/// The empty upload form. With `oob` set it replaces the form on the page,
/// which also clears the chosen file.
pub(super) fn batch_form(oob: bool) -> Markup {
    html! {
        form
            id=(FORM_ID)
            hx-post=(endpoints::BATCHES)
            hx-encoding="multipart/form-data"
            hx-target="#alert-container"
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
            hx-swap-oob=[oob.then_some("true")]
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="file" class=(FORM_LABEL_STYLE) { "Transfer File" }

                input
                    type="file"
                    name="file"
                    id="file"
                    accept=".csv,text/csv"
                    class=(FORM_TEXT_INPUT_STYLE);

                p class="mt-1 text-sm text-gray-500 dark:text-gray-400" { "Only CSV format is supported." }

                (error_paragraph(FILE_ERROR_ID, None, false))

                a href=(endpoints::CSV_TEMPLATE) download class=(LINK_STYLE) { "Download Template" }
            }

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Instruction Type" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    @for instruction_type in INSTRUCTION_TYPES {
                        label class="flex items-center gap-3"
                        {
                            input
                                type="radio"
                                name="instruction_type"
                                value=(instruction_type)
                                class=(FORM_RADIO_INPUT_STYLE);

                            span class=(FORM_RADIO_LABEL_STYLE) { (instruction_type) }
                        }
                    }
                }

                (error_paragraph(INSTRUCTION_TYPE_ERROR_ID, None, false))
            }

            (number_input("total_record", "Total Transfer Record", "Please input", RECORD_ERROR_ID))
            (number_input("total_amount", "Transfer Amount", "Please input amount, e.g. 6000", AMOUNT_ERROR_ID))

            button
                type="button"
                hx-post=(endpoints::VALIDATE_BATCH)
                hx-encoding="multipart/form-data"
                hx-target="#modal-container"
                hx-target-error="#alert-container"
                hx-swap="innerHTML"
                class=(BUTTON_PRIMARY_STYLE)
            {
                "Next"
            }
        }
    }
}

fn create_transaction_view(session: &Session) -> Markup {
    let nav_bar = NavBar::new(
        endpoints::CREATE_TRANSACTION_VIEW,
        session.role,
        &session.user_name,
    )
    .into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-lg p-6 bg-white rounded-lg shadow dark:border dark:bg-gray-800 dark:border-gray-700"
            {
                h1 class="mb-2 text-xl font-bold text-gray-900 dark:text-white" { "Create Transaction" }

                p class="mb-6 text-sm text-gray-500 dark:text-gray-400"
                {
                    "Please enter transfer information. Transfers are sent from account "
                    span class="font-medium" { (session.account_no) }
                    "."
                }

                (batch_form(false))
            }
        }
    };

    base("Create Transaction", &content)
}

/// Display the batch upload form.
pub async fn get_create_transaction_page(Extension(session): Extension<Session>) -> Response {
    create_transaction_view(&session).into_response()
}

#[cfg(test)]
mod tests {
    use axum::{Extension, http::StatusCode};
    use scraper::Selector;

    use crate::{
        auth::{Role, test_session},
        endpoints,
        test_utils::{
            assert_form_input, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    use super::get_create_transaction_page;

    #[tokio::test]
    async fn renders_upload_form() {
        let response = get_create_transaction_page(Extension(test_session(Role::Maker))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::BATCHES, "hx-post");
        assert_eq!(
            form.value().attr("hx-encoding"),
            Some("multipart/form-data")
        );
        assert_form_input(&form, "file", "file");
        assert_form_input(&form, "total_record", "number");
        assert_form_input(&form, "total_amount", "number");

        let radios: Vec<_> = form
            .select(&Selector::parse("input[type=radio][name=instruction_type]").unwrap())
            .filter_map(|radio| radio.value().attr("value"))
            .collect();
        assert_eq!(radios, ["Immediate", "Standing Instruction"]);

        for id in [
            "#file-error",
            "#instruction-type-error",
            "#record-error",
            "#amount-error",
        ] {
            assert!(
                form.select(&Selector::parse(id).unwrap()).next().is_some(),
                "missing {id}"
            );
        }

        let next_button = form
            .select(&Selector::parse("button[type=button]").unwrap())
            .next()
            .expect("Could not find Next button");
        assert_eq!(
            next_button.value().attr("hx-post"),
            Some(endpoints::VALIDATE_BATCH)
        );
        assert_eq!(
            next_button.value().attr("hx-target"),
            Some("#modal-container")
        );
    }

    #[tokio::test]
    async fn links_csv_template() {
        let response = get_create_transaction_page(Extension(test_session(Role::Maker))).await;

        let html = parse_html_document(response).await;
        let link = html
            .select(&Selector::parse("a[download]").unwrap())
            .next()
            .expect("Could not find template link");
        assert_eq!(link.value().attr("href"), Some(endpoints::CSV_TEMPLATE));
    }
}
