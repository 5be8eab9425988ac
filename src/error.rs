//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;

use crate::{alert::Alert, api::ApiError, endpoints, internal_server_error::InternalServerError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A call to the batch-payment API failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The multipart form could not be parsed.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The CSV had issues that prevented it from being parsed.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// The user's role does not allow the action.
    #[error("the user is not allowed to do this")]
    Forbidden,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            // The API no longer accepts the token, so the session is useless.
            Error::Api(ApiError::Unauthorized) => Redirect::to(endpoints::LOG_OUT).into_response(),
            Error::Api(error) => {
                tracing::error!("Could not build page from the API: {error}");
                InternalServerError::upstream_unavailable().into_response()
            }
            Error::Forbidden => InternalServerError {
                status: StatusCode::FORBIDDEN,
                description: "You do not have access to this page.",
                fix: "Log in with a user that has the right role.",
            }
            .into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into the status code and alert to show for a failed
    /// htmx action.
    ///
    /// `action` names what failed, e.g. "Could not approve transaction", and
    /// becomes the alert's title. Returns `None` for an expired token, which
    /// should log the user out instead.
    pub fn into_alert(self, action: &str) -> Option<(StatusCode, Alert)> {
        let error = |status_code, details: String| {
            Some((
                status_code,
                Alert::Error {
                    message: action.to_owned(),
                    details,
                },
            ))
        };

        match self {
            Error::Api(ApiError::Unauthorized) => None,
            Error::Api(ApiError::Rejected { status, message }) => error(
                StatusCode::from_u16(status)
                    .ok()
                    .filter(StatusCode::is_client_error)
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            ),
            Error::Api(api_error) => {
                tracing::error!("{action}: {api_error}");
                error(
                    StatusCode::BAD_GATEWAY,
                    "Could not reach the payment service. Please try again later.".to_owned(),
                )
            }
            Error::Forbidden => error(
                StatusCode::FORBIDDEN,
                "Your role is not allowed to do this.".to_owned(),
            ),
            Error::InvalidCSV(reason) => error(
                StatusCode::BAD_REQUEST,
                format!("The CSV file could not be read: {reason}"),
            ),
            Error::MultipartError(reason) => error(
                StatusCode::BAD_REQUEST,
                format!("The form could not be read: {reason}"),
            ),
            Error::InvalidTimezoneError(timezone) => Some((
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            )),
        }
    }

    /// Convert the error into an HTTP response with an HTML alert.
    ///
    /// An expired token answers with an htmx redirect to the log-out endpoint.
    pub fn into_alert_response(self, action: &str) -> Response {
        match self.into_alert(action) {
            Some((status_code, alert)) => (status_code, alert.into_html()).into_response(),
            None => (HxRedirect(endpoints::LOG_OUT.to_owned()), StatusCode::OK).into_response(),
        }
    }
}
