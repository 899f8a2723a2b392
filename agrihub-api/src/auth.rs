//! Registration, OTP verification and sign-in.
//!
//! Successful verification and login store the returned token in the
//! client's [`TokenStore`](crate::TokenStore); later requests pick it up.

use crate::client::ApiClient;
use crate::envelope;
use crate::error::{ApiError, ApiResult};
use agrihub_model::User;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// New account details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Server acknowledgement of a registration; an OTP is now pending.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "id")]
    pub user_id: Option<String>,
}

/// A signed-in session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    #[serde(alias = "accessToken")]
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Client for the `/auth` endpoints.
pub struct AuthClient {
    api: Arc<ApiClient>,
}

impl AuthClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Registers an account. The server then sends an OTP to `email`.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<RegisterResponse> {
        require("name", &request.name)?;
        require("email", &request.email)?;
        require("password", &request.password)?;

        let body = serde_json::to_value(request)?;
        let response = self.api.post("/auth/register", body).await?;
        info!("Registered account for {}", request.email);
        decode_ack(response)
    }

    /// Confirms the OTP sent at registration and signs in.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> ApiResult<AuthSession> {
        require("email", email)?;
        require("otp", otp)?;

        let response = self
            .api
            .post("/auth/verify-otp", json!({ "email": email, "otp": otp.trim() }))
            .await?;
        self.start_session(response)
    }

    /// Asks the server to send a fresh OTP.
    pub async fn resend_otp(&self, email: &str) -> ApiResult<()> {
        require("email", email)?;
        self.api
            .post("/auth/resend-otp", json!({ "email": email }))
            .await?;
        debug!("OTP re-sent to {}", email);
        Ok(())
    }

    /// Signs in with a password.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthSession> {
        require("email", email)?;
        require("password", password)?;

        let response = self
            .api
            .post("/auth/login", json!({ "email": email, "password": password }))
            .await?;
        self.start_session(response)
    }

    /// Forgets the stored token. No request is sent.
    pub fn logout(&self) -> ApiResult<()> {
        self.api.tokens().clear()?;
        info!("Signed out");
        Ok(())
    }

    pub fn is_signed_in(&self) -> bool {
        self.api.tokens().token().is_some()
    }

    fn start_session(&self, response: serde_json::Value) -> ApiResult<AuthSession> {
        let session: AuthSession = if response.get("token").is_some()
            || response.get("accessToken").is_some()
        {
            serde_json::from_value(response).map_err(|e| ApiError::Decode(e.to_string()))?
        } else {
            envelope::decode(response)?
        };
        self.api.tokens().set_token(&session.token)?;
        info!(
            "Signed in{}",
            session
                .user
                .as_ref()
                .map(|u| format!(" as {}", u.email))
                .unwrap_or_default()
        );
        Ok(session)
    }
}

fn decode_ack(response: serde_json::Value) -> ApiResult<RegisterResponse> {
    let message = envelope::message(&response);
    let mut ack: RegisterResponse = match envelope::unwrap_payload(response) {
        serde_json::Value::Object(map) => serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| ApiError::Decode(e.to_string()))?,
        _ => RegisterResponse {
            message: None,
            user_id: None,
        },
    };
    if ack.message.is_none() {
        ack.message = message;
    }
    Ok(ack)
}

fn require(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    Ok(())
}
