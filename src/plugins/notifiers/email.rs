use crate::config::SmtpConfig;
use crate::models::PriceQuote;
use crate::plugins::traits::{MailSession, MailTransport, NotificationResult, NotifierPlugin, SessionState};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use lettre::message::{header, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{AsyncSmtpConnection, TlsParameters};
use lettre::transport::smtp::extension::ClientId;
use lettre::Message;
use tracing::{debug, error, info, warn};

pub const SUBJECT: &str = "Control pricing Amazon";

const AUTH_MECHANISMS: &[Mechanism] = &[Mechanism::Plain, Mechanism::Login];

/// Submission over SMTP: EHLO, STARTTLS, EHLO again, then AUTH.
pub struct SmtpMailTransport {
    config: SmtpConfig,
}

impl SmtpMailTransport {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn open(&self) -> Result<Box<dyn MailSession>> {
        let session = SmtpSession::connect(&self.config).await?;
        Ok(Box::new(session))
    }
}

pub struct SmtpSession {
    connection: Option<AsyncSmtpConnection>,
    state: SessionState,
}

impl SmtpSession {
    async fn connect(config: &SmtpConfig) -> Result<Self> {
        let hello = ClientId::Domain("localhost".to_string());
        let mut session = SmtpSession {
            connection: None,
            state: SessionState::Unconnected,
        };

        let connection = AsyncSmtpConnection::connect_tokio1(
            (config.host.as_str(), config.port),
            None,
            &hello,
            None,
            None,
        )
        .await?;
        session.connection = Some(connection);
        session.advance(SessionState::Greeted);

        if let Err(e) = session.secure_and_authenticate(config, &hello).await {
            session.close().await;
            return Err(e);
        }

        Ok(session)
    }

    async fn secure_and_authenticate(&mut self, config: &SmtpConfig, hello: &ClientId) -> Result<()> {
        self.advance(SessionState::TlsNegotiating);
        if !self.connection_mut()?.can_starttls() {
            return Err(AppError::Notification(format!(
                "{} does not offer STARTTLS",
                config.host
            )));
        }
        let tls = TlsParameters::new(config.host.clone())?;
        self.connection_mut()?.starttls(tls, hello).await?;
        self.advance(SessionState::Secure);

        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        self.connection_mut()?.auth(AUTH_MECHANISMS, &credentials).await?;
        self.advance(SessionState::Authenticated);

        Ok(())
    }

    fn connection_mut(&mut self) -> Result<&mut AsyncSmtpConnection> {
        self.connection
            .as_mut()
            .ok_or_else(|| AppError::Notification("SMTP session is not connected".to_string()))
    }

    fn advance(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal SMTP session transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!("SMTP session {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

#[async_trait]
impl MailSession for SmtpSession {
    fn state(&self) -> SessionState {
        self.state
    }

    async fn send(&mut self, message: &Message) -> Result<()> {
        let connection = self.connection_mut()?;
        match connection.send(message.envelope(), &message.formatted()).await {
            Ok(_) => {
                self.advance(SessionState::MessageSent);
                Ok(())
            }
            Err(e) => {
                self.advance(SessionState::SendFailed);
                Err(e.into())
            }
        }
    }

    async fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }

        if let Some(mut connection) = self.connection.take() {
            if connection.has_broken() {
                connection.abort().await;
            } else if let Err(e) = connection.quit().await {
                warn!("SMTP QUIT failed: {}", e);
                connection.abort().await;
            }
        }
        self.advance(SessionState::Closed);
    }
}

/// Renders messages to the log instead of submitting them.
pub struct DryRunTransport;

#[async_trait]
impl MailTransport for DryRunTransport {
    async fn open(&self) -> Result<Box<dyn MailSession>> {
        Ok(Box::new(DryRunSession {
            state: SessionState::Authenticated,
        }))
    }
}

struct DryRunSession {
    state: SessionState,
}

#[async_trait]
impl MailSession for DryRunSession {
    fn state(&self) -> SessionState {
        self.state
    }

    async fn send(&mut self, message: &Message) -> Result<()> {
        let rendered = message.formatted();
        info!("Dry run, message not submitted ({} bytes)", rendered.len());
        debug!("{}", String::from_utf8_lossy(&rendered));
        self.state = SessionState::MessageSent;
        Ok(())
    }

    async fn close(&mut self) {
        self.state = SessionState::Closed;
    }
}

pub struct EmailNotifier {
    transport: Box<dyn MailTransport>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailNotifier {
    pub fn new(config: &SmtpConfig, transport: Box<dyn MailTransport>) -> Result<Self> {
        Ok(EmailNotifier {
            transport,
            from: config.from_address.parse()?,
            to: config.to_address.parse()?,
        })
    }

    pub fn build_message(&self, quote: &PriceQuote) -> Result<Message> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(SUBJECT)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(format_text_body(quote)),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(format_html_body(quote)),
                    ),
            )?;

        Ok(message)
    }
}

fn format_text_body(quote: &PriceQuote) -> String {
    let mut text = String::new();

    text.push_str("Control Pricing\n---------------\n");
    text.push_str(&format!("Product: {}\n", quote.title));
    text.push_str(&format!("Price: {}\n", quote.price));
    text.push_str(&format!("Url: {}\n", quote.url));

    text
}

fn format_html_body(quote: &PriceQuote) -> String {
    format!(
        r#"<html>
  <body>
    <table>
      <thead>
        <tr>
          <th>Price</th>
          <th>Url</th>
        </tr>
      </thead>
      <tbody>
        <tr>
          <td>{price}</td>
          <td><a href="{url}">{title}</a></td>
        </tr>
      </tbody>
    </table>
  </body>
</html>
"#,
        price = escape_html(&quote.price),
        url = escape_html(&quote.url),
        title = escape_html(&quote.title),
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[async_trait]
impl NotifierPlugin for EmailNotifier {
    fn name(&self) -> &str {
        "Email Notifier"
    }

    fn plugin_type(&self) -> &str {
        "email"
    }

    fn description(&self) -> &str {
        "Sends one SMTP email per checked product"
    }

    async fn notify(&self, quote: &PriceQuote) -> Result<NotificationResult> {
        let message = self.build_message(quote)?;
        let mut session = self.transport.open().await?;

        let outcome = session.send(&message).await;
        session.close().await;

        match outcome {
            Ok(()) => {
                info!("Message sent for {} (price {})", quote.url, quote.price);
                Ok(NotificationResult::sent())
            }
            Err(e) => {
                error!("Could not send email for {}: {}", quote.url, e);
                Ok(NotificationResult::failed(e))
            }
        }
    }
}
