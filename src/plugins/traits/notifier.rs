use async_trait::async_trait;
use lettre::Message;
use serde::{Deserialize, Serialize};

use crate::models::PriceQuote;
use crate::utils::error::Result;

/// Lifecycle of one mail submission session.
///
/// `Unconnected -> Greeted -> TlsNegotiating -> Secure -> Authenticated ->
/// MessageSent | SendFailed -> Closed`. Any state may move straight to
/// `Closed`, which is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionState {
    Unconnected,
    Greeted,
    TlsNegotiating,
    Secure,
    Authenticated,
    MessageSent,
    SendFailed,
    Closed,
}

impl SessionState {
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;

        match (self, next) {
            (Closed, _) => false,
            (_, Closed) => true,
            (Unconnected, Greeted) => true,
            (Greeted, TlsNegotiating) => true,
            (TlsNegotiating, Secure) => true,
            (Secure, Authenticated) => true,
            (Authenticated, MessageSent) | (Authenticated, SendFailed) => true,
            _ => false,
        }
    }
}

/// An open, authenticated mail session. Callers must `close` it once done,
/// whatever the outcome of `send`.
#[async_trait]
pub trait MailSession: Send {
    fn state(&self) -> SessionState;
    async fn send(&mut self, message: &Message) -> Result<()>;
    async fn close(&mut self);
}

/// Opens mail sessions. Each call is a fresh connection.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn open(&self) -> Result<Box<dyn MailSession>>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    pub success: bool,
    pub error: Option<String>,
}

impl NotificationResult {
    pub fn sent() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
        }
    }
}

/// Trait for implementing notification methods
#[async_trait]
pub trait NotifierPlugin: Send + Sync {
    /// Plugin metadata
    fn name(&self) -> &str;
    fn plugin_type(&self) -> &str;
    fn description(&self) -> &str;

    /// Delivers one quote. A rejected submission is reported in the result;
    /// failing to compose the message or to open a session is an error.
    async fn notify(&self, quote: &PriceQuote) -> Result<NotificationResult>;
}
