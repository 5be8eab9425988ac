//! Request and response bodies exchanged with the batch-payment API.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};

/// The credentials sent to the log-in endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogInRequest {
    pub account_number: String,
    pub user_id: String,
    pub password: String,
}

/// A successful log-in: the bearer token plus who the user is.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogInResponse {
    pub token: String,
    pub user: UserInfo,
    pub corporate: CorporateInfo,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserInfo {
    pub user_id: String,
    pub user_name: String,
    pub role: String,
    #[serde(default)]
    pub last_login_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CorporateInfo {
    pub account_number: String,
    #[serde(default)]
    pub account_name: String,
}

/// The fields sent to the registration endpoint.
///
/// `phone_number` must already include the country code, e.g. "+628123456789".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub account_number: String,
    pub account_name: String,
    pub user_id: String,
    pub user_name: String,
    pub password: String,
    pub phone_number: String,
    pub role: String,
    pub email: String,
    pub otp_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SendOtpRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SendOtpResponse {
    #[serde(default)]
    pub otp: String,
    #[serde(default)]
    pub message: String,
}

/// The generic `{message}` body most endpoints answer with.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// The lifecycle state of a batch transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    WaitingApproval,
    Approved,
    Rejected,
    /// A status this console does not know about.
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    /// The human readable name of the status.
    pub fn label(self) -> &'static str {
        match self {
            TransactionStatus::WaitingApproval => "Waiting Approval",
            TransactionStatus::Approved => "Approved",
            TransactionStatus::Rejected => "Rejected",
            TransactionStatus::Unknown => "Unknown",
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A batch transaction as listed by the API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub total_amount: f64,
    pub total_record: u64,
    pub from_account: String,
    pub maker: String,
    pub transfer_date: String,
    #[serde(rename = "transaction_status")]
    pub status: TransactionStatus,
    pub created_at: String,
}

/// The pagination block of a transaction list.
///
/// Only `total_pages` is guaranteed, the rest default to zero/false when missing.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub current_page: u64,
    pub total_pages: u64,
    #[serde(default)]
    pub per_page: u64,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_prev_page: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionListResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<Transaction>,
    pub pagination: Pagination,
}

/// The query string of a transaction list request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionListQuery {
    pub page: u64,
    pub per_page: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
}

/// The number of transactions in each status.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct TransactionSummary {
    #[serde(default)]
    pub total_waiting_approval: u64,
    #[serde(default)]
    pub total_approved: u64,
    #[serde(default)]
    pub total_rejected: u64,
}

/// One destination transfer within a batch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionDetail {
    pub id: String,
    pub transaction_id: String,
    pub bank_dest: String,
    pub account_id_dest: String,
    pub account_name_dest: String,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub transfer_date: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct TransactionDetailResponse {
    #[serde(default, deserialize_with = "array_or_empty")]
    pub data: Vec<TransactionDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct UpdateStatusRequest {
    pub status: TransactionStatus,
}

/// A CSV batch to forward to the creation endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchUpload {
    pub file_name: String,
    pub contents: Vec<u8>,
    pub total_amount: u64,
    pub total_record: u64,
    pub from_account: String,
    pub user_id: String,
    pub maker: String,
}

/// The body of a non-2xx response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<FieldErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldErrorBody {
    #[serde(default)]
    pub message: String,
}

impl ErrorBody {
    /// Join the top level message with any per-field messages.
    pub fn into_message(self) -> Option<String> {
        let field_messages: Vec<String> = self
            .errors
            .into_iter()
            .map(|error| error.message)
            .filter(|message| !message.is_empty())
            .collect();

        match (self.message, field_messages.is_empty()) {
            (Some(message), true) => Some(message),
            (Some(message), false) => Some(format!("{message}: {}", field_messages.join(", "))),
            (None, false) => Some(field_messages.join(", ")),
            (None, true) => None,
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The detail endpoint has been seen returning objects and nulls in place of
/// the list, those are read as an empty list.
fn array_or_empty<'de, D>(deserializer: D) -> Result<Vec<TransactionDetail>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        value @ serde_json::Value::Array(_) => {
            serde_json::from_value(value).map_err(serde::de::Error::custom)
        }
        _ => Ok(Vec::new()),
    }
}
