//! Email service for delivering QR attendance codes over SMTP.
//!
//! Uses the `lettre` crate with a lazily initialized transport. Delivery
//! failures are reported to the caller but never abort token issuance.

use chrono::{DateTime, Utc};
use lettre::{
    AsyncTransport, Tokio1Executor,
    message::{Message, MultiPart, SinglePart, header},
    transport::smtp::{AsyncSmtpTransport, authentication::Credentials},
};
use once_cell::sync::Lazy;
use util::config;

/// Global SMTP client, configured from `SMTP_USERNAME`/`SMTP_PASSWORD`.
static SMTP_CLIENT: Lazy<AsyncSmtpTransport<Tokio1Executor>> = Lazy::new(|| {
    let username = config::smtp_username();
    let password = config::smtp_password();

    AsyncSmtpTransport::<Tokio1Executor>::relay("smtp.gmail.com")
        .expect("Failed to create SMTP transport")
        .port(587)
        .credentials(Credentials::new(username, password))
        .build()
});

/// Service for handling email-related operations.
pub struct EmailService;

impl EmailService {
    /// Sends the QR payload to an aprendiz so the code can be rendered and
    /// scanned at the entrance. Mentions the expiry explicitly; the token is
    /// only good for a few minutes.
    pub async fn send_qr_email(
        to_email: &str,
        aprendiz_name: &str,
        payload: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let from_email = config::smtp_username();
        let from_name = config::email_from_name();

        let email = Message::builder()
            .from(format!("{} <{}>", from_name, from_email).parse()?)
            .to(to_email.parse()?)
            .subject("Tu código QR de asistencia")
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(format!(
                                "Hola {aprendiz_name},\n\n\
                                Tu código de asistencia es:\n\n\
                                {payload}\n\n\
                                Es válido hasta {expires_at} y solo puede usarse una vez.\n\n\
                                {from_name}"
                            )),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(format!(
                                "<html>\
                                <body>\
                                <p>Hola {aprendiz_name},</p>\
                                <p>Tu código de asistencia es:</p>\
                                <p><code>{payload}</code></p>\
                                <p>Es válido hasta {expires_at} y solo puede usarse una vez.</p>\
                                <p>{from_name}</p>\
                                </body>\
                                </html>"
                            )),
                    ),
            )?;

        SMTP_CLIENT.send(email).await?;
        Ok(())
    }
}
