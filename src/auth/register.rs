//! The registration page, which creates a new console user through the API.
//!
//! Registration needs an OTP code that the API sends to the user's email.
//! The code is requested with a separate button on the same form.

use std::sync::Arc;

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState,
    api::{ApiError, BatchApi, RegisterRequest},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, base, delayed_redirect, form_input, loading_spinner,
        log_in_register, password_input,
    },
    validation::FieldErrors,
};

/// The country codes offered for phone numbers.
pub const COUNTRY_CODES: &[&str] = &["+62"];
/// The roles a user can register with.
pub const ROLES: &[&str] = &["Maker", "Approver"];

pub const INVALID_ROLE_ERROR_MSG: &str = "Please select a valid role";
pub const INVALID_COUNTRY_CODE_ERROR_MSG: &str = "Please select a valid country code";
pub const INVALID_PHONE_ERROR_MSG: &str = "Phone number must only contain digits";
pub const REGISTER_SUCCESS_MSG: &str = "User registered successfully!";
const UNAVAILABLE_ERROR_MSG: &str = "Could not reach the server. Please try again later.";

/// How long the success message is shown before going to the log-in page.
const REDIRECT_DELAY_MS: u32 = 2000;

/// The state needed for registering a user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    pub api: Arc<dyn BatchApi>,
    /// Whether to show the OTP code from the API in the page.
    pub show_otp: bool,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            show_otp: state.show_otp,
        }
    }
}

/// The raw data entered by the user in the registration form.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegisterData {
    pub account_number: String,
    pub account_name: String,
    pub user_id: String,
    pub user_name: String,
    pub password: String,
    pub country_code: String,
    pub phone_number: String,
    pub role: String,
    pub email: String,
    pub otp_code: String,
}

impl Default for RegisterData {
    fn default() -> Self {
        Self {
            account_number: String::new(),
            account_name: String::new(),
            user_id: String::new(),
            user_name: String::new(),
            password: String::new(),
            country_code: COUNTRY_CODES[0].to_owned(),
            phone_number: String::new(),
            role: String::new(),
            email: String::new(),
            otp_code: String::new(),
        }
    }
}

impl RegisterData {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("account_number", &self.account_number);
        errors.require("account_name", &self.account_name);
        errors.require("user_id", &self.user_id);
        errors.require("user_name", &self.user_name);
        errors.require("password", &self.password);

        if errors.require("country_code", &self.country_code)
            && !COUNTRY_CODES.contains(&self.country_code.as_str())
        {
            errors.add("country_code", INVALID_COUNTRY_CODE_ERROR_MSG);
        }

        if errors.require("phone_number", &self.phone_number)
            && !self.phone_number.trim().chars().all(|c| c.is_ascii_digit())
        {
            errors.add("phone_number", INVALID_PHONE_ERROR_MSG);
        }

        if errors.require("role", &self.role) && !ROLES.contains(&self.role.as_str()) {
            errors.add("role", INVALID_ROLE_ERROR_MSG);
        }

        errors.require_email("email", &self.email);
        errors.require("otp_code", &self.otp_code);
        errors
    }

    fn into_request(self) -> RegisterRequest {
        RegisterRequest {
            account_number: self.account_number.trim().to_owned(),
            account_name: self.account_name.trim().to_owned(),
            user_id: self.user_id.trim().to_owned(),
            user_name: self.user_name.trim().to_owned(),
            password: self.password,
            phone_number: format!("{}{}", self.country_code, self.phone_number.trim()),
            role: self.role,
            email: self.email.trim().to_owned(),
            otp_code: self.otp_code.trim().to_owned(),
        }
    }
}

fn select_input(
    name: &str,
    label: &str,
    placeholder: Option<&str>,
    options: &[&str],
    selected: &str,
    error_message: Option<&str>,
) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select id=(name) name=(name) class=(FORM_TEXT_INPUT_STYLE)
            {
                @if let Some(placeholder) = placeholder {
                    option value="" selected[selected.is_empty()] { (placeholder) }
                }

                @for option in options {
                    option value=(option) selected[*option == selected] { (option) }
                }
            }

            @if let Some(error_message) = error_message
            {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }
        }
    }
}

fn otp_status(message: Option<&str>, is_error: bool) -> Markup {
    let class = if is_error {
        FORM_ERROR_STYLE
    } else {
        "text-green-600 dark:text-green-400 text-base"
    };

    html! {
        p id="otp-status" class=(class) { @if let Some(message) = message { (message) } }
    }
}

fn registration_form(data: &RegisterData, errors: &FieldErrors, error_message: Option<&str>) -> Markup {
    html! {
        form
            id="register-form"
            hx-post=(endpoints::REGISTER_API)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (form_input(
                "account_number",
                "Account Number",
                "text",
                &data.account_number,
                errors.get("account_number"),
            ))
            (form_input(
                "account_name",
                "Account Name",
                "text",
                &data.account_name,
                errors.get("account_name"),
            ))
            (form_input("user_id", "User ID", "text", &data.user_id, errors.get("user_id")))
            (form_input("user_name", "User Name", "text", &data.user_name, errors.get("user_name")))
            (password_input(errors.get("password")))

            div class="grid grid-cols-3 gap-2"
            {
                (select_input(
                    "country_code",
                    "Country Code",
                    None,
                    COUNTRY_CODES,
                    &data.country_code,
                    errors.get("country_code"),
                ))

                div class="col-span-2"
                {
                    (form_input(
                        "phone_number",
                        "Phone Number",
                        "tel",
                        &data.phone_number,
                        errors.get("phone_number"),
                    ))
                }
            }

            (select_input(
                "role",
                "Role",
                Some("Select a role"),
                ROLES,
                &data.role,
                errors.get("role"),
            ))
            (form_input("email", "Email", "email", &data.email, errors.get("email")))

            div class="space-y-2"
            {
                (form_input("otp_code", "OTP Code", "text", &data.otp_code, errors.get("otp_code")))

                button
                    type="button"
                    id="send-otp-button"
                    hx-post=(endpoints::SEND_OTP)
                    hx-include="#email"
                    hx-target="#otp-status"
                    hx-swap="outerHTML"
                    class=(BUTTON_SECONDARY_STYLE)
                {
                    "Send OTP Code"
                }

                (otp_status(None, false))
            }

            @if let Some(error_message) = error_message {
                p id="register-error" class=(FORM_ERROR_STYLE) { (error_message) }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Register"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "

                a
                    href=(endpoints::LOG_IN_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Log in here"
                }
            }
        }
    }
}

fn registration_success() -> Markup {
    html! {
        div id="register-form" class="space-y-4"
        {
            p class="text-green-600 dark:text-green-400 text-base font-semibold"
            {
                (REGISTER_SUCCESS_MSG)
            }
            p class="text-sm text-gray-500 dark:text-gray-400"
            {
                "Taking you to the log-in page..."
            }

            (delayed_redirect(endpoints::LOG_IN_VIEW, REDIRECT_DELAY_MS))
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form(&RegisterData::default(), &FieldErrors::new(), None);
    let content = log_in_register("Create an account", &registration_form);
    base("Register", &content).into_response()
}

/// Register a new user with the API.
///
/// The form is checked before anything is sent. On success a notice is shown
/// and the browser moves to the log-in page after a short delay, otherwise
/// the form is returned with the reason it failed.
pub async fn post_register(
    State(state): State<RegistrationState>,
    Form(mut form): Form<RegisterData>,
) -> Response {
    let errors = form.validate();
    if !errors.is_empty() {
        return registration_form(&form, &errors, None).into_response();
    }

    let request = form.clone().into_request();
    form.password.clear();

    match state.api.register(&request).await {
        Ok(_) => {
            tracing::info!("Registered user {}.", request.user_id);
            registration_success().into_response()
        }
        Err(ApiError::Rejected { message, .. }) => {
            registration_form(&form, &errors, Some(&message)).into_response()
        }
        Err(error) => {
            tracing::error!("Could not register user {}: {error}", request.user_id);
            registration_form(&form, &errors, Some(UNAVAILABLE_ERROR_MSG)).into_response()
        }
    }
}

/// The email field sent by the "Send OTP Code" button.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OtpData {
    pub email: String,
}

/// Ask the API to email an OTP code to the address in the form.
///
/// Answers with the status line under the button.
pub async fn post_send_otp(
    State(state): State<RegistrationState>,
    Form(form): Form<OtpData>,
) -> Response {
    let mut errors = FieldErrors::new();
    errors.require_email("email", &form.email);
    if let Some(error) = errors.get("email") {
        return otp_status(Some(error), true).into_response();
    }

    let email = form.email.trim();

    match state.api.send_otp(email).await {
        Ok(response) => {
            let message = if state.show_otp {
                format!("OTP code: {}", response.otp)
            } else {
                format!("An OTP code has been sent to {email}.")
            };

            otp_status(Some(&message), false).into_response()
        }
        Err(ApiError::Rejected { message, .. }) => {
            otp_status(Some(&message), true).into_response()
        }
        Err(error) => {
            tracing::error!("Could not send OTP code: {error}");
            otp_status(Some(UNAVAILABLE_ERROR_MSG), true).into_response()
        }
    }
}
