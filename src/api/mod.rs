//! The client side of the batch-payment REST API.
//!
//! Handlers talk to the API through the [BatchApi] trait so that tests can
//! swap the HTTP client for a fake.

mod client;
#[cfg(test)]
mod fake;
mod models;

use async_trait::async_trait;

pub use client::{DEFAULT_REQUEST_TIMEOUT, HttpBatchApi};
#[cfg(test)]
pub(crate) use fake::{FakeBatchApi, RecordedCall};
pub use models::{
    BatchUpload, CorporateInfo, LogInRequest, LogInResponse, MessageResponse, Pagination,
    RegisterRequest, SendOtpResponse, Transaction, TransactionDetail, TransactionListQuery,
    TransactionListResponse, TransactionStatus, TransactionSummary, UserInfo,
};

/// The ways a call to the batch-payment API can fail.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ApiError {
    /// The API answered with a non-2xx status.
    ///
    /// `message` is taken from the response body, or the status text if the
    /// body had no message.
    #[error("the API rejected the request ({status}): {message}")]
    Rejected {
        /// The HTTP status code of the response.
        status: u16,
        /// The reason given by the API.
        message: String,
    },

    /// The API did not accept the bearer token.
    #[error("the API rejected the session token")]
    Unauthorized,

    /// The request never got a response, e.g. connection refused or timed out.
    #[error("could not reach the API: {0}")]
    Transport(String),

    /// The API answered with a body that could not be read.
    #[error("could not read the API response: {0}")]
    Decode(String),
}

/// The operations the console needs from the batch-payment API.
///
/// Every method that takes a `token` sends it as a bearer token.
#[async_trait]
pub trait BatchApi: std::fmt::Debug + Send + Sync {
    /// Exchange credentials for a session token.
    async fn log_in(&self, request: &LogInRequest) -> Result<LogInResponse, ApiError>;

    /// Create a new user account.
    async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ApiError>;

    /// Ask the API to issue an OTP code for `email`.
    async fn send_otp(&self, email: &str) -> Result<SendOtpResponse, ApiError>;

    /// Get one page of transactions.
    async fn list_transactions(
        &self,
        token: &str,
        query: &TransactionListQuery,
    ) -> Result<TransactionListResponse, ApiError>;

    /// Count the transactions in each status.
    async fn transaction_summary(&self, token: &str) -> Result<TransactionSummary, ApiError>;

    /// Get the destination lines of a transaction.
    async fn transaction_details(
        &self,
        token: &str,
        transaction_id: &str,
    ) -> Result<Vec<TransactionDetail>, ApiError>;

    /// Move a transaction to `status`.
    async fn update_transaction_status(
        &self,
        token: &str,
        transaction_id: &str,
        status: TransactionStatus,
    ) -> Result<MessageResponse, ApiError>;

    /// Upload a CSV batch.
    async fn create_batch(
        &self,
        token: &str,
        upload: BatchUpload,
    ) -> Result<MessageResponse, ApiError>;
}
