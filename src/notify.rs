use crate::config::Config;
use anyhow::Context;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};

/// Process-wide mail sender. Built once at startup and injected as shared
/// state; the transport keeps its own connection pool, so sends never
/// reconstruct it.
#[derive(Clone)]
pub struct Notifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    pub admin_email: String,
}

impl Notifier {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .credentials(Credentials::new(
                config.smtp_user.clone(),
                config.smtp_pass.clone(),
            ))
            .build();

        let from = config
            .smtp_user
            .parse()
            .context("EMAIL_USER is not a valid mailbox address")?;

        Ok(Self {
            mailer,
            from,
            admin_email: config.admin_email.clone(),
        })
    }

    /// Plain-text message. Callers treat failures as non-fatal; this returns
    /// the error so they can decide what to log.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse().context("invalid recipient address")?)
            .subject(subject)
            .body(body.to_string())?;

        self.mailer.send(message).await?;
        tracing::info!(to, subject, "email sent");
        Ok(())
    }

    /// Plain-text message with one attached document.
    pub async fn send_with_attachment(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        filename: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<()> {
        let attachment = Attachment::new(filename.to_string()).body(
            content,
            ContentType::parse(content_type).context("invalid attachment content type")?,
        );

        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse().context("invalid recipient address")?)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(attachment),
            )?;

        self.mailer.send(message).await?;
        tracing::info!(to, subject, filename, "email with attachment sent");
        Ok(())
    }
}

/// Fire-and-forget discipline: failure is logged and swallowed, never
/// surfaced to the caller of the primary operation.
pub fn log_if_failed(result: anyhow::Result<()>, what: &str) {
    if let Err(e) = result {
        tracing::warn!(error = %e, what, "notification failed; continuing");
    }
}
