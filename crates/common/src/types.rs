use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payment status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Overdue => write!(f, "overdue"),
        }
    }
}

/// An invoice issued to a client.
///
/// Serialized with camelCase field names — the shape the record store has
/// always persisted, so existing stored collections keep deserializing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Opaque unique record key (e.g., "INV-4c2f...")
    pub id: String,
    pub client_name: String,
    /// Contact address for payment reminders; absent means the client
    /// cannot be notified.
    pub client_email: Option<String>,
    pub invoice_number: String,
    pub amount: f64,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    #[serde(rename = "paymentStatus")]
    pub status: PaymentStatus,
}

/// A recorded business expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Opaque unique record key (e.g., "EXP-91ab...")
    pub id: String,
    pub category: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub payment_method: String,
    pub description: String,
}
