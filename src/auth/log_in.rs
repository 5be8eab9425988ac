//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The credentials are checked by the batch-payment API, this module only turns
//! a successful answer into a session cookie.

use std::sync::Arc;

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState,
    api::{ApiError, BatchApi, LogInRequest},
    auth::{
        Session,
        cookie::{current_session, invalidate_session_cookie, set_session_cookie},
        redirect::normalize_redirect_url,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, base, form_input, loading_spinner,
        log_in_register, password_input,
    },
    validation::FieldErrors,
};

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect account number, user ID or password.";
pub const UNAVAILABLE_ERROR_MSG: &str = "Could not reach the server. Please try again later.";

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How long a session lasts without activity.
    pub cookie_duration: Duration,
    pub api: Arc<dyn BatchApi>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            api: state.api.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// The raw data entered by the user in the log-in form.
///
/// Missing fields deserialize as empty strings so that they are reported
/// as required instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogInData {
    pub account_number: String,
    pub user_id: String,
    pub password: String,

    /// Optional URL to redirect to after logging in.
    /// Only accepted from the log-in form submission.
    pub redirect_url: Option<String>,
}

impl LogInData {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("account_number", &self.account_number);
        errors.require("user_id", &self.user_id);
        errors.require("password", &self.password);
        errors
    }
}

fn log_in_form(
    data: &LogInData,
    errors: &FieldErrors,
    error_message: Option<&str>,
    redirect_url: Option<&str>,
) -> Markup {
    html! {
        form
            id="log-in-form"
            hx-post=(endpoints::LOG_IN_API)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (form_input(
                "account_number",
                "Account Number",
                "text",
                &data.account_number,
                errors.get("account_number"),
            ))
            (form_input("user_id", "User ID", "text", &data.user_id, errors.get("user_id")))
            (password_input(errors.get("password")))

            @if let Some(error_message) = error_message {
                p id="log-in-error" class=(FORM_ERROR_STYLE) { (error_message) }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Don't have an account? "
                a
                    href=(endpoints::REGISTER_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Register here"
                }
            }
        }
    }
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    match raw_url.and_then(normalize_redirect_url) {
        Some(redirect_url) => Some(redirect_url),
        None => {
            if let Some(redirect_url) = raw_url {
                tracing::warn!("Invalid redirect URL from {source}: {redirect_url}");
            }
            None
        }
    }
}

/// Display the log-in page.
///
/// Users that already have a session are sent to the home page instead.
pub async fn get_log_in_page(
    jar: PrivateCookieJar,
    Query(query): Query<RedirectQuery>,
) -> Response {
    if current_session(&jar).is_some() {
        return Redirect::to(endpoints::HOME_VIEW).into_response();
    }

    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let log_in_form = log_in_form(
        &LogInData::default(),
        &FieldErrors::new(),
        None,
        redirect_url.as_deref(),
    );
    let content = log_in_register("Log in to your account", &log_in_form);
    base("Log In", &content).into_response()
}

/// Store `session` in the session cookie and send the client to
/// `redirect_url`, or the home page if there is none.
pub(crate) fn log_in(
    jar: PrivateCookieJar,
    session: &Session,
    cookie_duration: Duration,
    redirect_url: Option<&str>,
) -> Response {
    let redirect_url = redirect_url.unwrap_or(endpoints::HOME_VIEW);

    set_session_cookie(jar.clone(), session, cookie_duration)
        .map(|updated_jar| {
            tracing::info!("User {} logged in.", session.user_id);
            (
                StatusCode::SEE_OTHER,
                HxRedirect(redirect_url.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error setting session cookie: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_session_cookie(jar),
            )
        })
        .into_response()
}

/// Handler for log-in requests via the POST method.
///
/// The credentials are checked for missing fields and then sent to the API.
/// On success the session cookie is set and the client is redirected to the
/// home page, or the page it was on before being asked to log in.
/// Otherwise, the form is returned with an error message explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(mut form): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(form.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();

    let errors = form.validate();
    if !errors.is_empty() {
        return log_in_form(&form, &errors, None, redirect_url).into_response();
    }

    let request = LogInRequest {
        account_number: form.account_number.trim().to_owned(),
        user_id: form.user_id.trim().to_owned(),
        password: std::mem::take(&mut form.password),
    };

    let response = match state.api.log_in(&request).await {
        Ok(response) => response,
        Err(error) => {
            let message = match error {
                ApiError::Rejected { message, .. } => message,
                ApiError::Unauthorized => INVALID_CREDENTIALS_ERROR_MSG.to_owned(),
                error => {
                    tracing::error!("Could not log in user {}: {error}", request.user_id);
                    UNAVAILABLE_ERROR_MSG.to_owned()
                }
            };

            return log_in_form(&form, &errors, Some(&message), redirect_url).into_response();
        }
    };

    log_in(
        jar,
        &Session::from(response),
        state.cookie_duration,
        redirect_url,
    )
}
