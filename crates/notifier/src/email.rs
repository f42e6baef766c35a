//! Reminder email delivery via the Resend HTTP API.

use async_trait::async_trait;

use cashflow_common::config::AppConfig;
use cashflow_common::error::AppError;
use cashflow_common::types::Invoice;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// A rendered email ready for delivery.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub subject: String,
    pub html: String,
}

/// External mail transport for overdue reminders.
///
/// Opaque to the notification pipeline: implementations decide how
/// delivery happens and report only success or failure.
#[async_trait]
pub trait EmailDispatcher: Send + Sync {
    /// Deliver an overdue reminder for `invoice` to its client address.
    async fn send_overdue_reminder(&self, invoice: &Invoice) -> Result<(), AppError>;
}

/// Render the reminder message for an overdue invoice.
pub fn overdue_reminder(invoice: &Invoice, app_url: &str) -> EmailMessage {
    let payment_link = format!(
        "{}/pay-invoice/{}",
        app_url.trim_end_matches('/'),
        invoice.id
    );
    let due_date = invoice.due_date.format("%B %d, %Y");
    let amount = format!("${:.2}", invoice.amount);

    EmailMessage {
        subject: format!("Overdue Invoice: {}", invoice.invoice_number),
        html: format!(
            "<p>Dear {},</p>\
             <p>This is a friendly reminder that your invoice <strong>{}</strong> \
             for {} is now overdue. The payment was due on {}.</p>\
             <p><a href=\"{}\">Make Payment Now</a></p>\
             <p>If you have already made this payment, please disregard this notice.</p>",
            invoice.client_name, invoice.invoice_number, amount, due_date, payment_link
        ),
    }
}

/// Resend-backed mailer.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
    app_url: String,
}

impl ResendMailer {
    /// Build a mailer from configuration.
    ///
    /// Requires `RESEND_API_KEY` and `EMAIL_FROM` to be set.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let api_key = config.resend_api_key.clone().ok_or_else(|| {
            AppError::Config("RESEND_API_KEY is required for email delivery".to_string())
        })?;
        let from = config.email_from.clone().ok_or_else(|| {
            AppError::Config("EMAIL_FROM is required for email delivery".to_string())
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            from,
            app_url: config.app_url.clone(),
        })
    }
}

#[async_trait]
impl EmailDispatcher for ResendMailer {
    async fn send_overdue_reminder(&self, invoice: &Invoice) -> Result<(), AppError> {
        let Some(to) = invoice.client_email.as_deref() else {
            return Err(AppError::Email(format!(
                "Invoice {} has no client email",
                invoice.invoice_number
            )));
        };

        let message = overdue_reminder(invoice, &self.app_url);
        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "from": self.from,
                "to": [to],
                "subject": message.subject,
                "html": message.html,
            }))
            .send()
            .await
            .map_err(|e| AppError::Email(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Email(format!(
                "Resend API returned {}: {}",
                status, body
            )));
        }

        tracing::debug!(invoice_id = %invoice.id, "Reminder email accepted for delivery");
        Ok(())
    }
}
