use std::time::Duration;

use async_trait::async_trait;

use super::{TaskDispatcher, TaskEnvelope, TaskError, WelcomeEmailParams, SEND_WELCOME_EMAIL};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts tasks to an HTTP task runner
///
/// The runner is expected to answer with a 2xx status once the task is
/// queued. Any other status is reported as [`TaskError::Rejected`].
#[derive(Debug, Clone)]
pub struct HttpTaskDispatcher {
    client: reqwest::Client,
    url: String,
}

impl HttpTaskDispatcher {
    pub fn new(url: impl Into<String>) -> Result<Self, TaskError> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| TaskError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        HttpTaskDispatcher {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl TaskDispatcher for HttpTaskDispatcher {
    async fn send_welcome_email(&self, params: WelcomeEmailParams) -> Result<(), TaskError> {
        let envelope = TaskEnvelope {
            task: SEND_WELCOME_EMAIL,
            params: &params,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| TaskError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TaskError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::debug!(task = SEND_WELCOME_EMAIL, to = %params.to, "Task accepted by runner");
        Ok(())
    }
}
