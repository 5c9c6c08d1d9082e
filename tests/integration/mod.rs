// Shared fixtures for the integration tests

pub mod watchlist_tests;

use async_trait::async_trait;
use config::Map;
use lettre::Message;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

use price_sentinel::config::read_env_file;
use price_sentinel::plugins::traits::{MailSession, MailTransport, SessionState};
use price_sentinel::{AppConfig, AppError};

/// What the fake mail server saw during a test.
#[derive(Debug, Default)]
pub struct MailLog {
    pub opened: usize,
    pub closed: usize,
    /// Every submitted message, rendered, including the rejected ones.
    pub attempts: Vec<String>,
    pub delivered: usize,
}

/// In-memory transport. Send attempts whose zero-based index is listed in
/// `rejected` fail with a notification error; with `refuse_login` no session
/// ever opens.
#[derive(Clone, Default)]
pub struct FakeTransport {
    pub log: Arc<Mutex<MailLog>>,
    rejected: HashSet<usize>,
    refuse_login: bool,
}

impl FakeTransport {
    pub fn rejecting(attempts: &[usize]) -> Self {
        Self {
            rejected: attempts.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn refusing_login() -> Self {
        Self {
            refuse_login: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl MailTransport for FakeTransport {
    async fn open(&self) -> price_sentinel::Result<Box<dyn MailSession>> {
        self.log.lock().unwrap().opened += 1;
        if self.refuse_login {
            return Err(AppError::Notification(
                "535 5.7.8 Authentication credentials invalid".to_string(),
            ));
        }
        Ok(Box::new(FakeSession {
            log: self.log.clone(),
            rejected: self.rejected.clone(),
            state: SessionState::Authenticated,
        }))
    }
}

struct FakeSession {
    log: Arc<Mutex<MailLog>>,
    rejected: HashSet<usize>,
    state: SessionState,
}

#[async_trait]
impl MailSession for FakeSession {
    fn state(&self) -> SessionState {
        self.state
    }

    async fn send(&mut self, message: &Message) -> price_sentinel::Result<()> {
        let mut log = self.log.lock().unwrap();
        let attempt = log.attempts.len();
        log.attempts.push(String::from_utf8_lossy(&message.formatted()).into_owned());

        if self.rejected.contains(&attempt) {
            self.state = SessionState::SendFailed;
            return Err(AppError::Notification("451 temporary local problem".to_string()));
        }

        log.delivered += 1;
        self.state = SessionState::MessageSent;
        Ok(())
    }

    async fn close(&mut self) {
        self.state = SessionState::Closed;
        self.log.lock().unwrap().closed += 1;
    }
}

pub fn product_page(title: &str, price: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head><title>{title} : Amazon.es</title></head>
  <body>
    <div id="centerCol">
      <h1 id="title"><span id="productTitle">
        {title}
      </span></h1>
      <table><tr><td><span id="priceblock_ourprice">{price}</span></td></tr></table>
    </div>
  </body>
</html>"#,
        title = title,
        price = price
    )
}

/// Writes `config/.env` under `root` and loads it without consulting the
/// process environment.
pub fn write_config(root: &Path, extra: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
    let mut lines = vec![
        "DIR_LINKS=links".to_string(),
        "SMTP=smtp.example.com".to_string(),
        "PORT_SMTP=587".to_string(),
        "FROM=watcher@example.com".to_string(),
        "PASSWORD=hunter2".to_string(),
        "TO=ops@example.com".to_string(),
    ];
    lines.extend(extra.iter().map(|(k, v)| format!("{}={}", k, v)));

    std::fs::create_dir_all(root.join("config"))?;
    std::fs::write(root.join("config").join(".env"), lines.join("\n"))?;

    let file_vars = read_env_file(&root.join("config").join(".env"))?;
    Ok(AppConfig::from_sources(root, file_vars, Some(Map::new()))?)
}
