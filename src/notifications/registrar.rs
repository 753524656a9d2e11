//! Push token registration.
//!
//! Obtains a push token from the platform and associates it with a user on
//! the remote registration service.
//!
//! # Flow
//!
//! ```text
//! upsert channel (channel-capable platforms only)
//!     ↓
//! ensure permission (physical device + user grant)
//!     ↓
//! require project id
//!     ↓
//! fetch push token for project
//!     ↓
//! validate userId + token
//!     ↓
//! POST {"userId", "expoPushToken"} → registration endpoint
//!     ↓
//! {"success": true} → RegistrationResult
//! ```
//!
//! Each step runs only after the previous one succeeded. A failure at any
//! step is reported once through the [`ErrorReporter`] and returned; there is
//! no retry here, callers decide whether to try again.

// Rust guideline compliant 2026-02

use anyhow::Context;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::channel::ChannelConfig;
use super::permission::{PermissionError, PermissionNegotiator};
use super::platform::{PlatformError, PushPlatform};
use super::reporter::ErrorReporter;
use crate::config::Config;

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResult {
    /// User the token was registered for.
    pub user_id: String,
    /// Push token issued by the platform.
    pub push_token: String,
}

/// Why a registration attempt failed. Every variant is terminal for the attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// Running on a simulated host.
    #[error("Must use a physical device for push notifications")]
    NoPhysicalDevice,
    /// Notification permission was refused.
    #[error("Permission not granted to get push token for push notification")]
    PermissionDenied,
    /// No push-service project id is configured.
    #[error("Project ID not found")]
    MissingProjectId,
    /// The user id or the issued token is empty.
    #[error("Invalid registration data: {0}")]
    InvalidRegistrationData(&'static str),
    /// The service answered `success: false`.
    #[error("Server rejected registration: {}", .0.as_deref().unwrap_or("no reason given"))]
    ServerRejectedRegistration(Option<String>),
    /// Network failure, non-2xx status, or an unreadable response.
    #[error("Registration request failed: {0}")]
    TransportError(String),
    /// The platform failed during channel setup, permission check or token fetch.
    #[error("Push platform error: {0}")]
    Platform(#[from] PlatformError),
}

impl From<PermissionError> for RegistrationError {
    fn from(error: PermissionError) -> Self {
        match error {
            PermissionError::NoPhysicalDevice => Self::NoPhysicalDevice,
            PermissionError::PermissionDenied => Self::PermissionDenied,
            PermissionError::Platform(e) => Self::Platform(e),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    user_id: &'a str,
    expo_push_token: &'a str,
}

#[derive(Deserialize)]
struct RegisterResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Registers this installation's push token with the remote service.
pub struct TokenRegistrar {
    client: reqwest::Client,
    endpoint: String,
    project_id: Option<String>,
    platform: Arc<dyn PushPlatform>,
    permissions: PermissionNegotiator,
    reporter: Arc<dyn ErrorReporter>,
}

impl std::fmt::Debug for TokenRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRegistrar")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl TokenRegistrar {
    /// Create a registrar posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        platform: Arc<dyn PushPlatform>,
        reporter: Arc<dyn ErrorReporter>,
        endpoint: impl Into<String>,
        project_id: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build registration HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            project_id,
            permissions: PermissionNegotiator::new(Arc::clone(&platform)),
            platform,
            reporter,
        })
    }

    /// Create a registrar from the loaded configuration.
    pub fn from_config(
        config: &Config,
        platform: Arc<dyn PushPlatform>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> anyhow::Result<Self> {
        Self::new(
            platform,
            reporter,
            config.registration_endpoint.clone(),
            config.project_id.clone(),
            config.request_timeout(),
        )
    }

    /// Registration endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run the full registration flow for `user_id`.
    ///
    /// On failure the reporter is invoked once and the error is returned
    /// unchanged.
    pub async fn register(
        &self,
        user_id: &str,
        channel: &ChannelConfig,
    ) -> Result<RegistrationResult, RegistrationError> {
        match self.try_register(user_id, channel).await {
            Ok(result) => {
                log::info!(
                    "[Registrar] Registered push token for user {}",
                    result.user_id
                );
                Ok(result)
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    async fn try_register(
        &self,
        user_id: &str,
        channel: &ChannelConfig,
    ) -> Result<RegistrationResult, RegistrationError> {
        // Channel-scoped platforms refuse tokens until the channel exists.
        if self.platform.supports_channels() {
            self.platform.upsert_channel(channel).await?;
            log::debug!("[Registrar] Channel '{}' upserted", channel.name);
        }

        self.permissions.ensure_permission().await?;

        let project_id = self
            .project_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(RegistrationError::MissingProjectId)?;

        let token = self.platform.fetch_token(project_id).await?;

        if user_id.trim().is_empty() {
            return Err(RegistrationError::InvalidRegistrationData("userId is empty"));
        }
        if token.trim().is_empty() {
            return Err(RegistrationError::InvalidRegistrationData("push token is empty"));
        }

        self.submit(user_id, &token).await?;

        Ok(RegistrationResult {
            user_id: user_id.to_string(),
            push_token: token,
        })
    }

    async fn submit(&self, user_id: &str, token: &str) -> Result<(), RegistrationError> {
        let request = RegisterRequest {
            user_id,
            expo_push_token: token,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| RegistrationError::TransportError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistrationError::TransportError(format!(
                "HTTP {status}: {body}"
            )));
        }

        let data: RegisterResponse = response.json().await.map_err(|e| {
            RegistrationError::TransportError(format!("unreadable response body: {e}"))
        })?;

        if data.success {
            Ok(())
        } else {
            Err(RegistrationError::ServerRejectedRegistration(
                data.message.or(data.error),
            ))
        }
    }

    fn fail(&self, error: RegistrationError) -> RegistrationError {
        log::warn!("[Registrar] Registration attempt aborted: {error}");
        self.reporter.report(&error);
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_field_names() {
        let body = serde_json::to_value(RegisterRequest {
            user_id: "user-1",
            expo_push_token: "ExponentPushToken[abc]",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"userId": "user-1", "expoPushToken": "ExponentPushToken[abc]"})
        );
    }

    #[test]
    fn test_permission_errors_convert_unchanged() {
        assert_eq!(
            RegistrationError::from(PermissionError::NoPhysicalDevice),
            RegistrationError::NoPhysicalDevice
        );
        assert_eq!(
            RegistrationError::from(PermissionError::PermissionDenied),
            RegistrationError::PermissionDenied
        );
        assert_eq!(
            RegistrationError::from(PermissionError::Platform(PlatformError::new("boom"))),
            RegistrationError::Platform(PlatformError::new("boom"))
        );
    }

    #[test]
    fn test_server_rejection_message() {
        let err = RegistrationError::ServerRejectedRegistration(Some("unknown user".into()));
        assert_eq!(err.to_string(), "Server rejected registration: unknown user");

        let err = RegistrationError::ServerRejectedRegistration(None);
        assert_eq!(err.to_string(), "Server rejected registration: no reason given");
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let json = serde_json::to_value(RegistrationResult {
            user_id: "u".into(),
            push_token: "t".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"userId": "u", "pushToken": "t"}));
    }
}
