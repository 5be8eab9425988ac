//! [BatchApi] over HTTP with reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response, StatusCode, Url,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;

use crate::api::{
    ApiError, BatchApi, BatchUpload, LogInRequest, LogInResponse, MessageResponse,
    RegisterRequest, SendOtpResponse, TransactionDetail, TransactionListQuery,
    TransactionListResponse, TransactionStatus, TransactionSummary,
    models::{ErrorBody, SendOtpRequest, TransactionDetailResponse, UpdateStatusRequest},
};

/// How long to wait for the API before giving up on a request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const LOG_IN_PATH: &str = "/api/auth/login";
const REGISTER_PATH: &str = "/api/auth/register";
const SEND_OTP_PATH: &str = "/api/otp/send";
const TRANSACTIONS_PATH: &str = "/api/transactions";
const TRANSACTION_SUMMARY_PATH: &str = "/api/transactions/summary";
const CREATE_TRANSACTION_PATH: &str = "/api/transactions/create";

/// Talks to the batch-payment API at a single base URL.
#[derive(Debug, Clone)]
pub struct HttpBatchApi {
    http_client: Client,
    base_url: String,
}

impl HttpBatchApi {
    /// Create a client for the API served at `base_url`, e.g. "http://localhost:1323".
    ///
    /// # Errors
    /// Returns [ApiError::Transport] if `base_url` is not a valid base URL or
    /// the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|error| {
            ApiError::Transport(format!("invalid API URL '{base_url}': {error}"))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::Transport(format!(
                "invalid API URL '{base_url}': not a base URL"
            )));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ApiError::Transport(error.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The URL of a single transaction. The ID is always one encoded path
    /// segment, so it cannot reach another endpoint.
    fn transaction_url(&self, transaction_id: &str) -> Result<Url, ApiError> {
        if matches!(transaction_id, "" | "." | "..") {
            return Err(ApiError::Rejected {
                status: StatusCode::BAD_REQUEST.as_u16(),
                message: "Invalid transaction ID.".to_owned(),
            });
        }

        let mut url = Url::parse(&self.url(TRANSACTIONS_PATH))
            .map_err(|error| ApiError::Transport(error.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Transport("the API URL cannot take a path".to_owned()))?
            .push(transaction_id);

        Ok(url)
    }

    /// Send a request that carries the session's bearer token. A 401 means
    /// the token is no longer accepted.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        self.execute(request, true).await
    }

    /// Send a request made before there is a session, e.g. logging in. A 401
    /// is an ordinary rejection with the server's message.
    async fn send_public<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        self.execute(request, false).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        has_token: bool,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|error| {
            tracing::error!("Request to the batch API failed: {error}");
            ApiError::Transport(error.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response, has_token).await);
        }

        response.json::<T>().await.map_err(|error| {
            tracing::error!("Could not decode response from the batch API: {error}");
            ApiError::Decode(error.to_string())
        })
    }
}

async fn error_from_response(
    status: StatusCode,
    response: Response,
    has_token: bool,
) -> ApiError {
    if has_token && status == StatusCode::UNAUTHORIZED {
        return ApiError::Unauthorized;
    }

    let body_text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body_text)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_owned()
        });

    tracing::warn!("Batch API returned {status}: {message}");

    ApiError::Rejected {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl BatchApi for HttpBatchApi {
    async fn log_in(&self, request: &LogInRequest) -> Result<LogInResponse, ApiError> {
        self.send_public(self.http_client.post(self.url(LOG_IN_PATH)).json(request))
            .await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ApiError> {
        self.send_public(self.http_client.post(self.url(REGISTER_PATH)).json(request))
            .await
    }

    async fn send_otp(&self, email: &str) -> Result<SendOtpResponse, ApiError> {
        self.send_public(
            self.http_client
                .post(self.url(SEND_OTP_PATH))
                .json(&SendOtpRequest { email }),
        )
        .await
    }

    async fn list_transactions(
        &self,
        token: &str,
        query: &TransactionListQuery,
    ) -> Result<TransactionListResponse, ApiError> {
        self.send(
            self.http_client
                .get(self.url(TRANSACTIONS_PATH))
                .bearer_auth(token)
                .query(query),
        )
        .await
    }

    async fn transaction_summary(&self, token: &str) -> Result<TransactionSummary, ApiError> {
        self.send(
            self.http_client
                .get(self.url(TRANSACTION_SUMMARY_PATH))
                .bearer_auth(token),
        )
        .await
    }

    async fn transaction_details(
        &self,
        token: &str,
        transaction_id: &str,
    ) -> Result<Vec<TransactionDetail>, ApiError> {
        let url = self.transaction_url(transaction_id)?;
        let response: TransactionDetailResponse = self
            .send(self.http_client.get(url).bearer_auth(token))
            .await?;

        Ok(response.data)
    }

    async fn update_transaction_status(
        &self,
        token: &str,
        transaction_id: &str,
        status: TransactionStatus,
    ) -> Result<MessageResponse, ApiError> {
        let url = self.transaction_url(transaction_id)?;

        self.send(
            self.http_client
                .patch(url)
                .bearer_auth(token)
                .json(&UpdateStatusRequest { status }),
        )
        .await
    }

    async fn create_batch(
        &self,
        token: &str,
        upload: BatchUpload,
    ) -> Result<MessageResponse, ApiError> {
        let file = Part::bytes(upload.contents)
            .file_name(upload.file_name)
            .mime_str("text/csv")
            .map_err(|error| ApiError::Transport(error.to_string()))?;

        let form = Form::new()
            .part("file", file)
            .text("total_amount", upload.total_amount.to_string())
            .text("total_record", upload.total_record.to_string())
            .text("from_account", upload.from_account)
            .text("user_id", upload.user_id)
            .text("maker", upload.maker);

        self.send(
            self.http_client
                .post(self.url(CREATE_TRANSACTION_PATH))
                .bearer_auth(token)
                .multipart(form),
        )
        .await
    }
}
