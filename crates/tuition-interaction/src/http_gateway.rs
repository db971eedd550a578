//! HttpBankingGateway - REST implementation of the banking backend contract.
//!
//! Every bearer call sends `Authorization: Bearer <token>`. Status handling is
//! uniform: 401 becomes an auth error, other non-success statuses become
//! rejections carrying the backend's `detail`, and endpoint-specific meaning
//! (404 on lookup, rejected OTP) is decided by the caller of [`Self::send`].

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tuition_core::config::ClientConfig;
use tuition_core::gateway::BankingGateway;
use tuition_core::otp::OtpCode;
use tuition_core::session::{AccessToken, UserRecord};
use tuition_core::student::StudentLookup;
use tuition_core::transaction::{NewTransaction, TransactionId, TransactionRecord};
use tuition_core::{Result, TuitionError};

use crate::wire::{
    CreateTransactionResponse, ErrorBody, PendingCheckResponse, ReceiverResponse, TokenResponse,
    TransactionList,
};

/// Gateway that talks to the backend over HTTP.
#[derive(Clone)]
pub struct HttpBankingGateway {
    client: Client,
    base_url: Url,
    timeout: Option<Duration>,
}

impl HttpBankingGateway {
    /// Creates a gateway for the given backend root, e.g. `http://localhost:8000`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            TuitionError::config(format!("Invalid api_base_url '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(TuitionError::config(format!(
                "api_base_url '{}' cannot carry paths",
                base_url
            )));
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            timeout: None,
        })
    }

    /// Creates a gateway from the client configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut gateway = Self::new(&config.api_base_url)?;
        gateway.timeout = config.request_timeout();
        Ok(gateway)
    }

    /// Sets a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&AccessToken>,
    ) -> RequestBuilder {
        let mut request = self.client.request(method, self.endpoint(segments));
        if let Some(token) = token {
            request = request.header(reqwest::header::AUTHORIZATION, token.bearer());
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        request
    }

    /// Sends a request and returns the response if its status is a success.
    async fn send(&self, request: RequestBuilder, context: &str) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("[HttpGateway] {} failed: {}", context, e);
            TuitionError::transport(format!("{}: {}", context, e))
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("[HttpGateway] {} -> {}", context, status);
            return Ok(response);
        }

        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_detail);
        tracing::info!(
            "[HttpGateway] {} -> {} ({})",
            context,
            status,
            detail.as_deref().unwrap_or("no detail")
        );
        Err(TuitionError::rejected(status.as_u16(), detail))
    }

    /// Like [`Self::send`] for bearer calls: a 401 means the token is no longer valid.
    async fn send_authorized(&self, request: RequestBuilder, context: &str) -> Result<Response> {
        match self.send(request, context).await {
            Err(TuitionError::Rejected { status, detail })
                if status == StatusCode::UNAUTHORIZED.as_u16() =>
            {
                Err(TuitionError::auth(detail.unwrap_or_else(|| {
                    "Session expired. Please log in again.".to_string()
                })))
            }
            other => other,
        }
    }

    async fn parse<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| {
                TuitionError::transport(format!("Failed to parse {} response: {}", context, e))
            })
    }
}

#[async_trait]
impl BankingGateway for HttpBankingGateway {
    async fn authenticate(&self, username: &str, password: &str) -> Result<AccessToken> {
        let request = self
            .request(Method::POST, &["token"], None)
            .form(&[("username", username), ("password", password)]);

        let response = match self.send(request, "authenticate").await {
            Ok(response) => response,
            Err(TuitionError::Rejected { detail, .. }) => {
                return Err(TuitionError::auth(
                    detail.unwrap_or_else(|| "Invalid username or password".to_string()),
                ));
            }
            Err(other) => return Err(other),
        };

        let token: TokenResponse = Self::parse(response, "token").await?;
        token
            .access_token
            .filter(|t| !t.is_empty())
            .map(AccessToken::new)
            .ok_or_else(|| TuitionError::auth("Invalid username or password"))
    }

    async fn current_user(&self, token: &AccessToken) -> Result<UserRecord> {
        let request = self.request(Method::GET, &["customers", "me"], Some(token));
        let response = self.send_authorized(request, "current user").await?;
        Self::parse(response, "current user").await
    }

    async fn lookup_student(&self, token: &AccessToken, student_id: &str) -> Result<StudentLookup> {
        let request = self.request(
            Method::GET,
            &["customers", "receiver", student_id],
            Some(token),
        );
        let response = match self.send_authorized(request, "student lookup").await {
            Ok(response) => response,
            Err(TuitionError::Rejected { status: 404, .. }) => {
                return Err(TuitionError::not_found("student", student_id));
            }
            Err(other) => return Err(other),
        };

        let body: ReceiverResponse = Self::parse(response, "student lookup").await?;
        Ok(body.into_lookup(student_id))
    }

    async fn has_pending_transaction(&self, token: &AccessToken, student_id: &str) -> Result<bool> {
        let request = self.request(
            Method::GET,
            &["customers", "receiver", "check", student_id],
            Some(token),
        );
        let response = self.send_authorized(request, "pending check").await?;
        let body: PendingCheckResponse = Self::parse(response, "pending check").await?;
        Ok(body.result)
    }

    async fn create_transaction(
        &self,
        token: &AccessToken,
        request: &NewTransaction,
    ) -> Result<TransactionId> {
        let http_request = self
            .request(Method::POST, &["transactions", "create"], Some(token))
            .json(request);
        let response = self.send_authorized(http_request, "create transaction").await?;
        let body: CreateTransactionResponse = Self::parse(response, "create transaction").await?;
        Ok(body.transaction_id)
    }

    async fn verify_otp(
        &self,
        token: &AccessToken,
        transaction_id: &TransactionId,
        code: &OtpCode,
    ) -> Result<()> {
        #[derive(serde::Serialize)]
        struct VerifyRequest<'a> {
            transaction_id: &'a TransactionId,
            otp: &'a OtpCode,
        }

        let request = self
            .request(Method::POST, &["otp", "verify"], Some(token))
            .json(&VerifyRequest {
                transaction_id,
                otp: code,
            });
        self.send_authorized(request, "verify otp").await?;
        Ok(())
    }

    async fn resend_otp(&self, token: &AccessToken, transaction_id: &TransactionId) -> Result<()> {
        let request = self.request(
            Method::GET,
            &["otp", "resend", transaction_id.as_str()],
            Some(token),
        );
        self.send_authorized(request, "resend otp").await?;
        Ok(())
    }

    async fn list_transactions(&self, token: &AccessToken) -> Result<Vec<TransactionRecord>> {
        let request = self.request(Method::GET, &["transactions", "me"], Some(token));
        let response = self.send_authorized(request, "list transactions").await?;
        let body: TransactionList = Self::parse(response, "list transactions").await?;
        Ok(body.into_records())
    }
}
