//! Outbound notifications and best-effort side tasks.
//!
//! Notifications are never critical: [`best_effort`] runs a task once,
//! logs a failure at `warn`, and never hands the error back.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::error::ApiError;

/// Sends a short text message to the operators.
#[async_trait]
pub trait Notifier: Send + Sync + fmt::Debug {
    /// Delivers `text`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Notification`] if delivery fails.
    async fn notify(&self, text: &str) -> Result<(), ApiError>;
}

/// Posts `{"text": ...}` to a chat webhook URL.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    url: String,
}

impl HttpNotifier {
    /// Creates a notifier posting to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the HTTP client cannot be built.
    pub fn new(url: String, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Internal(format!("http client: {e}")))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, text: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "text": text }))
            .send()
            .await
            .map_err(|e| ApiError::Notification(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ApiError::Notification(format!(
                "endpoint answered {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Notifier used when no endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, text: &str) -> Result<(), ApiError> {
        tracing::debug!(text, "notification skipped: no endpoint configured");
        Ok(())
    }
}

/// Runs a non-critical task once. Failures are logged and swallowed.
///
/// Returns whether the task succeeded, for callers that want to report it.
pub async fn best_effort<F>(label: &'static str, task: F) -> bool
where
    F: Future<Output = Result<(), ApiError>>,
{
    match task.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(task = label, error = %e, "best-effort task failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn best_effort_swallows_errors() {
        let ok = best_effort("ping", async {
            Err(ApiError::Notification("unreachable".to_string()))
        })
        .await;
        assert!(!ok);
    }

    #[tokio::test]
    async fn best_effort_reports_success() {
        assert!(best_effort("ping", NoopNotifier.notify("hello")).await);
    }

    #[tokio::test]
    async fn http_notifier_failure_is_notification_error() {
        let Ok(notifier) = HttpNotifier::new(
            "http://127.0.0.1:9/hook".to_string(),
            Duration::from_millis(200),
        ) else {
            return;
        };
        let result = notifier.notify("hi").await;
        assert!(matches!(result, Err(ApiError::Notification(_))));
    }
}
