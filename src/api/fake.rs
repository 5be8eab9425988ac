//! An in-memory [BatchApi] for handler tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    api::{
        ApiError, BatchApi, BatchUpload, LogInRequest, LogInResponse, MessageResponse,
        RegisterRequest, SendOtpResponse, TransactionDetail, TransactionListQuery,
        TransactionListResponse, TransactionStatus, TransactionSummary,
    },
    sequence::FetchSequencer,
};

/// A call made against [FakeBatchApi], with the token where there is one.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RecordedCall {
    LogIn(LogInRequest),
    Register(RegisterRequest),
    SendOtp(String),
    ListTransactions(String, TransactionListQuery),
    Summary(String),
    Details(String, String),
    UpdateStatus(String, String, TransactionStatus),
    CreateBatch(String, BatchUpload),
}

/// Answers every call with the configured result, or a transport error if
/// none was configured.
#[derive(Debug, Default)]
pub(crate) struct FakeBatchApi {
    pub calls: Mutex<Vec<RecordedCall>>,
    pub log_in: Option<Result<LogInResponse, ApiError>>,
    pub register: Option<Result<MessageResponse, ApiError>>,
    pub send_otp: Option<Result<SendOtpResponse, ApiError>>,
    pub list_transactions: Option<Result<TransactionListResponse, ApiError>>,
    pub summary: Option<Result<TransactionSummary, ApiError>>,
    pub details: Option<Result<Vec<TransactionDetail>, ApiError>>,
    pub update_status: Option<Result<MessageResponse, ApiError>>,
    pub create_batch: Option<Result<MessageResponse, ApiError>>,
    /// Issues a newer sequence number for the key while a list request is in
    /// flight, as if the user had already asked for another page.
    pub supersede_list_fetch: Option<(FetchSequencer, String)>,
}

impl FakeBatchApi {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn respond<T: Clone>(result: &Option<Result<T, ApiError>>) -> Result<T, ApiError> {
    result
        .clone()
        .unwrap_or_else(|| Err(ApiError::Transport("no response configured".to_owned())))
}

#[async_trait]
impl BatchApi for FakeBatchApi {
    async fn log_in(&self, request: &LogInRequest) -> Result<LogInResponse, ApiError> {
        self.record(RecordedCall::LogIn(request.clone()));
        respond(&self.log_in)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ApiError> {
        self.record(RecordedCall::Register(request.clone()));
        respond(&self.register)
    }

    async fn send_otp(&self, email: &str) -> Result<SendOtpResponse, ApiError> {
        self.record(RecordedCall::SendOtp(email.to_owned()));
        respond(&self.send_otp)
    }

    async fn list_transactions(
        &self,
        token: &str,
        query: &TransactionListQuery,
    ) -> Result<TransactionListResponse, ApiError> {
        self.record(RecordedCall::ListTransactions(
            token.to_owned(),
            query.clone(),
        ));

        if let Some((sequencer, key)) = &self.supersede_list_fetch {
            sequencer.issue(key);
        }

        respond(&self.list_transactions)
    }

    async fn transaction_summary(&self, token: &str) -> Result<TransactionSummary, ApiError> {
        self.record(RecordedCall::Summary(token.to_owned()));
        respond(&self.summary)
    }

    async fn transaction_details(
        &self,
        token: &str,
        transaction_id: &str,
    ) -> Result<Vec<TransactionDetail>, ApiError> {
        self.record(RecordedCall::Details(
            token.to_owned(),
            transaction_id.to_owned(),
        ));
        respond(&self.details)
    }

    async fn update_transaction_status(
        &self,
        token: &str,
        transaction_id: &str,
        status: TransactionStatus,
    ) -> Result<MessageResponse, ApiError> {
        self.record(RecordedCall::UpdateStatus(
            token.to_owned(),
            transaction_id.to_owned(),
            status,
        ));
        respond(&self.update_status)
    }

    async fn create_batch(
        &self,
        token: &str,
        upload: BatchUpload,
    ) -> Result<MessageResponse, ApiError> {
        self.record(RecordedCall::CreateBatch(token.to_owned(), upload));
        respond(&self.create_batch)
    }
}
