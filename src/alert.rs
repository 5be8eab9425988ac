//! Alert messages shown in the alert container at the bottom of the page.
//!
//! Alerts are swapped into `#alert-container` by htmx, either as the target
//! of a request or out of band.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// A dismissable success or error message.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Success { message: String, details: String },
    SuccessSimple { message: String },
    Error { message: String, details: String },
    ErrorSimple { message: String },
}

impl Alert {
    fn is_error(&self) -> bool {
        matches!(self, Alert::Error { .. } | Alert::ErrorSimple { .. })
    }

    fn message(&self) -> &str {
        match self {
            Alert::Success { message, .. }
            | Alert::SuccessSimple { message }
            | Alert::Error { message, .. }
            | Alert::ErrorSimple { message } => message,
        }
    }

    fn details(&self) -> Option<&str> {
        match self {
            Alert::Success { details, .. } | Alert::Error { details, .. }
                if !details.is_empty() =>
            {
                Some(details.as_str())
            }
            _ => None,
        }
    }

    /// Render the alert contents for the alert container.
    pub fn into_markup(self) -> Markup {
        let (container_style, role) = if self.is_error() {
            (
                "flex items-start gap-3 p-4 mb-4 text-sm text-red-800 rounded-lg \
                bg-red-50 border border-red-300 dark:bg-gray-800 dark:text-red-400 \
                dark:border-red-800 shadow-lg",
                "alert",
            )
        } else {
            (
                "flex items-start gap-3 p-4 mb-4 text-sm text-green-800 rounded-lg \
                bg-green-50 border border-green-300 dark:bg-gray-800 dark:text-green-400 \
                dark:border-green-800 shadow-lg",
                "status",
            )
        };

        html! {
            div class=(container_style) role=(role) data-alert-kind=(if self.is_error() { "error" } else { "success" })
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (self.message()) }

                    @if let Some(details) = self.details() {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="ms-auto font-bold"
                    hx-on:click="this.closest('#alert-container').innerHTML = ''"
                {
                    "×"
                }
            }
        }
    }

    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Html<String> {
        Html(self.into_markup().into_string())
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_shows_message_and_details() {
        let html = Html::parse_fragment(
            &Alert::Error {
                message: "Could not approve transaction".to_owned(),
                details: "the API said no".to_owned(),
            }
            .into_markup()
            .into_string(),
        );

        let alert = html
            .select(&Selector::parse("div[role=alert]").unwrap())
            .next()
            .expect("No error alert found");
        let text = alert.text().collect::<String>();
        assert!(text.contains("Could not approve transaction"));
        assert!(text.contains("the API said no"));
        assert_eq!(alert.value().attr("data-alert-kind"), Some("error"));
    }

    #[test]
    fn simple_alert_has_no_details() {
        let html = Html::parse_fragment(
            &Alert::SuccessSimple {
                message: "Transaction approved".to_owned(),
            }
            .into_markup()
            .into_string(),
        );

        let paragraphs = html.select(&Selector::parse("p").unwrap()).count();
        assert_eq!(paragraphs, 1);
        assert!(
            html.select(&Selector::parse("div[role=status]").unwrap())
                .next()
                .is_some()
        );
    }
}
