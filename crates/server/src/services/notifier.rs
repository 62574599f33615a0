//! New-product notification fan-out.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. Sends are
//! fire-and-forget: the product-create path spawns the fan-out and never
//! waits for it, per-subscriber sends run concurrently, and a failed send
//! only affects that subscriber.

use askama::Template;
use entre_nous_core::format_usd;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::store::Product;

/// HTML template for the new-product email.
#[derive(Template)]
#[template(path = "email/new_product.html")]
struct NewProductEmailHtml<'a> {
    name: &'a str,
    category: &'a str,
    price: &'a str,
    /// `None` renders the styled placeholder block instead of an image tag.
    image_url: Option<&'a str>,
    store_url: &'a str,
}

/// Plain text template for the new-product email.
#[derive(Template)]
#[template(path = "email/new_product.txt")]
struct NewProductEmailText<'a> {
    name: &'a str,
    category: &'a str,
    price: &'a str,
    store_url: &'a str,
}

/// Errors that can occur when sending a notification email.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Outcome of one fan-out: how many sends succeeded and failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationReport {
    pub sent: usize,
    pub failed: usize,
}

/// Notification sink for product-created events.
///
/// `Disabled` is used when no SMTP transport is configured; it reports zero
/// sends and keeps the rest of the create path identical.
#[derive(Clone)]
pub enum Notifier {
    Smtp(SmtpNotifier),
    Disabled,
}

impl Notifier {
    /// Build a notifier from the optional SMTP block of the server config.
    ///
    /// # Errors
    ///
    /// Returns `SmtpError` if the relay transport cannot be constructed.
    pub fn from_config(
        email: Option<&EmailConfig>,
        frontend_url: &str,
        backend_url: &str,
    ) -> Result<Self, SmtpError> {
        match email {
            Some(config) => Ok(Self::Smtp(SmtpNotifier::new(
                config,
                frontend_url,
                backend_url,
            )?)),
            None => Ok(Self::Disabled),
        }
    }

    /// Send the new-product email to every subscriber, concurrently.
    ///
    /// Individual failures are logged and counted; none aborts the fan-out.
    pub async fn notify(&self, product: &Product, subscribers: &[String]) -> NotificationReport {
        match self {
            Self::Smtp(notifier) => notifier.broadcast(product, subscribers).await,
            Self::Disabled => {
                tracing::debug!(
                    product = %product.name,
                    subscribers = subscribers.len(),
                    "Notifications disabled, skipping fan-out"
                );
                NotificationReport::default()
            }
        }
    }

    /// Spawn the fan-out as a detached task whose report is only logged.
    ///
    /// The caller (the product-create handler) does not wait for it: the
    /// HTTP response and the email fan-out are deliberately concurrent.
    pub fn notify_detached(&self, product: Product, subscribers: Vec<String>) {
        let notifier = self.clone();
        tokio::spawn(async move {
            let report = notifier.notify(&product, &subscribers).await;
            tracing::info!(
                product = %product.name,
                sent = report.sent,
                failed = report.failed,
                "New-product notification fan-out finished"
            );
        });
    }
}

/// SMTP-backed notifier.
#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    frontend_url: String,
    backend_url: String,
}

impl SmtpNotifier {
    /// Create a notifier from SMTP configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the relay transport cannot be constructed.
    pub fn new(
        config: &EmailConfig,
        frontend_url: &str,
        backend_url: &str,
    ) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
            backend_url: backend_url.trim_end_matches('/').to_string(),
        })
    }

    async fn broadcast(&self, product: &Product, subscribers: &[String]) -> NotificationReport {
        let (html, text) = match self.render(product) {
            Ok(bodies) => bodies,
            Err(e) => {
                tracing::error!(error = %e, "Failed to render notification email");
                return NotificationReport {
                    sent: 0,
                    failed: subscribers.len(),
                };
            }
        };

        let subject = format!("New Arrival: {} - Entre Nous Otakus", product.name);

        let sends = subscribers
            .iter()
            .map(|email| self.send_to(email, &subject, &text, &html));
        let results = futures::future::join_all(sends).await;

        let mut report = NotificationReport::default();
        for (email, result) in subscribers.iter().zip(results) {
            match result {
                Ok(()) => {
                    report.sent += 1;
                    tracing::debug!(to = %email, "Notification email sent");
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(to = %email, error = %e, "Failed to send notification email");
                }
            }
        }
        report
    }

    fn render(&self, product: &Product) -> Result<(String, String), NotifyError> {
        let resolved = resolve_image_url(&product.image, &self.frontend_url, &self.backend_url);
        // Email clients cannot fetch local-only hosts; fall back to the
        // styled placeholder block in that case.
        let image_url = (!is_local_url(&resolved)).then_some(resolved.as_str());
        let price = format_usd(product.price);

        let html = NewProductEmailHtml {
            name: &product.name,
            category: &product.category,
            price: &price,
            image_url,
            store_url: &self.frontend_url,
        }
        .render()?;

        let text = NewProductEmailText {
            name: &product.name,
            category: &product.category,
            price: &price,
            store_url: &self.frontend_url,
        }
        .render()?;

        Ok((html, text))
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_to(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), NotifyError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| NotifyError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| NotifyError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;
        Ok(())
    }
}

/// Resolve a stored image reference to an absolute URL.
///
/// Absolute URLs pass through. `/uploads/...` paths are served by this
/// backend; other absolute paths belong to the frontend; bare file names are
/// assumed to live in the backend uploads directory.
fn resolve_image_url(image: &str, frontend_url: &str, backend_url: &str) -> String {
    if image.starts_with("http://") || image.starts_with("https://") {
        image.to_string()
    } else if image.starts_with("/uploads") {
        format!("{backend_url}{image}")
    } else if image.starts_with('/') {
        format!("{frontend_url}{image}")
    } else {
        format!("{backend_url}/uploads/{image}")
    }
}

/// Whether a URL points at a host external mail clients cannot reach.
fn is_local_url(url: &str) -> bool {
    url.contains("localhost") || url.contains("127.0.0.1")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRONTEND: &str = "https://otakushop.example";
    const BACKEND: &str = "https://api.otakushop.example";

    #[test]
    fn test_resolve_absolute_url_passes_through() {
        assert_eq!(
            resolve_image_url("https://cdn.example.com/a.jpg", FRONTEND, BACKEND),
            "https://cdn.example.com/a.jpg"
        );
    }

    #[test]
    fn test_resolve_uploads_path_uses_backend() {
        assert_eq!(
            resolve_image_url("/uploads/figure.png", FRONTEND, BACKEND),
            "https://api.otakushop.example/uploads/figure.png"
        );
    }

    #[test]
    fn test_resolve_other_absolute_path_uses_frontend() {
        assert_eq!(
            resolve_image_url("/images/banner.jpg", FRONTEND, BACKEND),
            "https://otakushop.example/images/banner.jpg"
        );
    }

    #[test]
    fn test_resolve_bare_name_assumes_uploads() {
        assert_eq!(
            resolve_image_url("figure.png", FRONTEND, BACKEND),
            "https://api.otakushop.example/uploads/figure.png"
        );
    }

    #[test]
    fn test_is_local_url() {
        assert!(is_local_url("http://localhost:3001/uploads/a.jpg"));
        assert!(is_local_url("http://127.0.0.1/a.jpg"));
        assert!(!is_local_url("https://api.otakushop.example/a.jpg"));
    }

    #[test]
    fn test_render_uses_placeholder_for_local_images() {
        use entre_nous_core::ProductId;
        use rust_decimal::Decimal;

        let product = Product {
            id: ProductId::new(1),
            name: "Gojo Figure".to_string(),
            price: Decimal::new(12500, 2),
            image: "/uploads/gojo.jpg".to_string(),
            category: "Figures".to_string(),
        };

        let resolved = resolve_image_url(&product.image, FRONTEND, "http://localhost:3001");
        assert!(is_local_url(&resolved));

        let html = NewProductEmailHtml {
            name: &product.name,
            category: &product.category,
            price: "$125.00",
            image_url: None,
            store_url: FRONTEND,
        }
        .render()
        .expect("render");

        assert!(html.contains("Gojo Figure"));
        assert!(html.contains("View on website to see image"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_render_embeds_product_details() {
        let html = NewProductEmailHtml {
            name: "Tanjiro Figure",
            category: "Figures",
            price: "$89.99",
            image_url: Some("https://api.otakushop.example/uploads/tanjiro.jpg"),
            store_url: FRONTEND,
        }
        .render()
        .expect("render");

        assert!(html.contains("Tanjiro Figure"));
        assert!(html.contains("Figures"));
        assert!(html.contains("$89.99"));
        assert!(html.contains("https://api.otakushop.example/uploads/tanjiro.jpg"));

        let text = NewProductEmailText {
            name: "Tanjiro Figure",
            category: "Figures",
            price: "$89.99",
            store_url: FRONTEND,
        }
        .render()
        .expect("render");

        assert!(text.contains("Tanjiro Figure"));
        assert!(text.contains("$89.99"));
    }
}
