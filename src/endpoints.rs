//! The URIs served by the console.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}/detail',
//! use [format_endpoint].

/// The root route which redirects to the admin home page.
pub const ROOT: &str = "/";
/// The landing page for logged in users with the transaction summary.
pub const HOME_VIEW: &str = "/admin";
/// The page listing the batch transactions.
pub const TRANSACTIONS_VIEW: &str = "/admin/transactions";
/// The page for uploading a new batch transaction.
pub const CREATE_TRANSACTION_VIEW: &str = "/admin/create-transaction";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/login";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";
/// The CSV template users fill in before uploading a batch.
pub const CSV_TEMPLATE: &str = "/static/csv_template/template.csv";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to register a new user.
pub const REGISTER_API: &str = "/api/register";
/// The route to request an OTP code for registration.
pub const SEND_OTP: &str = "/api/otp";
/// The route for a page of the transaction table.
pub const TRANSACTION_TABLE: &str = "/api/transactions/table";
/// The route for the transaction summary cards.
pub const TRANSACTION_SUMMARY: &str = "/api/transactions/summary";
/// The route for the detail modal of a single transaction.
pub const TRANSACTION_DETAIL: &str = "/api/transactions/{transaction_id}/detail";
/// The route to approve a transaction.
pub const APPROVE_TRANSACTION: &str = "/api/transactions/{transaction_id}/approve";
/// The route to reject a transaction.
pub const REJECT_TRANSACTION: &str = "/api/transactions/{transaction_id}/reject";
/// The route that checks a batch upload against the entered totals.
pub const VALIDATE_BATCH: &str = "/api/batches/validate";
/// The route to submit a batch upload.
pub const BATCHES: &str = "/api/batches";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/transactions/{transaction_id}', '{transaction_id}'
/// is the parameter.
///
/// Only the first parameter is replaced. If no parameter is found in
/// `endpoint_path`, the function returns the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
