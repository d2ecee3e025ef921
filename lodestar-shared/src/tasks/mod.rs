/// Background task dispatch
///
/// Account creation hands the welcome email to an external task runner. The
/// store only knows the [`TaskDispatcher`] trait; which transport is used is
/// decided when the store is built.
///
/// # Dispatchers
///
/// - [`HttpTaskDispatcher`]: POSTs the task as JSON to a runner URL
/// - [`ChannelDispatcher`]: forwards the task over an in-process channel
/// - [`LogDispatcher`]: only logs the task, for setups without a runner
///
/// # Wire format
///
/// ```json
/// {"task": "send_welcome_email", "params": {"to": "user@example.com", "name": "user@example.com"}}
/// ```

mod channel;
mod http;

pub use channel::ChannelDispatcher;
pub use http::HttpTaskDispatcher;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Task name understood by the runner
pub const SEND_WELCOME_EMAIL: &str = "send_welcome_email";

/// Task dispatch error
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Runner could not be reached
    #[error("Transport error: {0}")]
    Transport(String),

    /// Runner answered with a non-success status
    #[error("Task runner rejected task with status {status}")]
    Rejected { status: u16 },

    /// Receiving side of an in-process channel is gone
    #[error("Task channel closed")]
    ChannelClosed,
}

/// Parameters of the welcome-email task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeEmailParams {
    /// Recipient address
    pub to: String,

    /// Name used in the greeting
    pub name: String,
}

/// Envelope sent to the runner
#[derive(Debug, Serialize)]
pub struct TaskEnvelope<'a, P: Serialize> {
    pub task: &'a str,
    pub params: &'a P,
}

/// Hands tasks to whatever executes them
///
/// Implementations return once the task is accepted, not once it has run.
#[async_trait]
pub trait TaskDispatcher: Send + Sync {
    async fn send_welcome_email(&self, params: WelcomeEmailParams) -> Result<(), TaskError>;
}

/// Dispatcher that records tasks in the log and drops them
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDispatcher;

#[async_trait]
impl TaskDispatcher for LogDispatcher {
    async fn send_welcome_email(&self, params: WelcomeEmailParams) -> Result<(), TaskError> {
        tracing::info!(
            task = SEND_WELCOME_EMAIL,
            to = %params.to,
            "No task runner configured, welcome email not sent"
        );
        Ok(())
    }
}
