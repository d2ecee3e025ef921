use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{TaskDispatcher, TaskError, WelcomeEmailParams};

/// Forwards welcome emails to an in-process receiver
///
/// Useful when the runner lives in the same process, and in tests that need to
/// observe what was dispatched.
///
/// ```
/// use lodestar_shared::tasks::{ChannelDispatcher, TaskDispatcher, WelcomeEmailParams};
///
/// # #[tokio::main]
/// # async fn main() {
/// let (dispatcher, mut rx) = ChannelDispatcher::new();
/// let params = WelcomeEmailParams { to: "a@example.com".into(), name: "a@example.com".into() };
///
/// dispatcher.send_welcome_email(params.clone()).await.unwrap();
/// assert_eq!(rx.recv().await, Some(params));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    tx: mpsc::UnboundedSender<WelcomeEmailParams>,
}

impl ChannelDispatcher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<WelcomeEmailParams>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelDispatcher { tx }, rx)
    }
}

#[async_trait]
impl TaskDispatcher for ChannelDispatcher {
    async fn send_welcome_email(&self, params: WelcomeEmailParams) -> Result<(), TaskError> {
        self.tx.send(params).map_err(|_| TaskError::ChannelClosed)
    }
}
