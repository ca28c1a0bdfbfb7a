//! Lead notification service
//!
//! Accepts a submission type and a flat field map, renders the lead as an HTML
//! table, and relays it over SMTP to the one configured operator address.
//! Leads are never persisted; a failed send is reported to the caller and
//! dropped (no retry, no queue).

mod render;

pub use render::{escape_html, render_lead};

use crate::config::MailConfig;
use crate::error::ApiError;
use crate::logger;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::Value;
use std::time::Duration;

// Default secure-submission profile when no relay host is configured.
const DEFAULT_RELAY: &str = "smtp.gmail.com";

// Bounds connection/handshake/idle time so an unreachable relay cannot hang a
// request indefinitely.
const SMTP_TIMEOUT: Duration = Duration::from_secs(20);

pub struct Notifier {
    mail: MailConfig,
}

impl Notifier {
    pub const fn new(mail: MailConfig) -> Self {
        Self { mail }
    }

    /// Render and relay one lead.
    ///
    /// `kind` must be non-empty after trimming and `payload` must be a JSON
    /// object. SMTP credentials and a recipient are hard preconditions,
    /// checked before any network activity.
    pub async fn notify(&self, kind: &str, payload: &Value) -> Result<(), ApiError> {
        let kind = kind.trim();
        if kind.is_empty() {
            return Err(ApiError::invalid("Missing type"));
        }
        let Some(fields) = payload.as_object() else {
            return Err(ApiError::invalid("Payload must be an object"));
        };

        let (user, password) = self.credentials()?;
        let Some(recipient) = self.mail.to.as_deref().filter(|t| !t.trim().is_empty()) else {
            return Err(ApiError::Configuration("email not configured".into()));
        };
        let from = self.mail.from.as_deref().unwrap_or(&user);

        let message = Message::builder()
            .from(from
                .parse()
                .map_err(|e| ApiError::Configuration(format!("invalid from address: {e}")))?)
            .to(recipient
                .parse()
                .map_err(|e| ApiError::Configuration(format!("invalid recipient address: {e}")))?)
            .subject(format!("New lead: {kind}"))
            .header(ContentType::TEXT_HTML)
            .body(render_lead(kind, fields))
            .map_err(|e| ApiError::Delivery(e.to_string()))?;

        let transport = self.transport(user, password)?;
        transport
            .send(message)
            .await
            .map_err(|e| ApiError::Delivery(e.to_string()))?;

        logger::log_notify_sent(kind, recipient);
        Ok(())
    }

    fn credentials(&self) -> Result<(String, String), ApiError> {
        match (&self.mail.user, &self.mail.password) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => {
                Ok((user.clone(), password.clone()))
            }
            _ => Err(ApiError::Configuration("email not configured".into())),
        }
    }

    // Configured host/port/secure flag, or the default relay profile.
    // `secure` selects implicit TLS; otherwise STARTTLS on the submission port.
    fn transport(
        &self,
        user: String,
        password: String,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, ApiError> {
        let relay_error = |e: lettre::transport::smtp::Error| {
            ApiError::Configuration(format!("invalid SMTP relay: {e}"))
        };

        let mut builder = match self.mail.host.as_deref() {
            Some(host) => {
                let secure = self
                    .mail
                    .secure
                    .unwrap_or_else(|| self.mail.port.map_or(true, |p| p == 465));
                if secure {
                    AsyncSmtpTransport::<Tokio1Executor>::relay(host).map_err(relay_error)?
                } else {
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                        .map_err(relay_error)?
                }
            }
            None => AsyncSmtpTransport::<Tokio1Executor>::relay(DEFAULT_RELAY).map_err(relay_error)?,
        };

        if let Some(port) = self.mail.port {
            builder = builder.port(port);
        }

        Ok(builder
            .credentials(Credentials::new(user, password))
            .timeout(Some(SMTP_TIMEOUT))
            .build())
    }
}
