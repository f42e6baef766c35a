//! Invoice service — CRUD operations for invoice records.
//!
//! The whole collection is persisted as one serialized array under a fixed
//! storage key and rewritten on every mutation. Newest records sit at the
//! head of the list.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cashflow_common::error::AppError;
use cashflow_common::storage::KvStore;
use cashflow_common::types::{Invoice, PaymentStatus};

/// Fixed storage key for the invoice collection.
pub const INVOICES_KEY: &str = "invoices";

/// Service layer for invoice CRUD operations.
pub struct InvoiceService;

/// Parameters for creating a new invoice.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CreateInvoiceParams {
    pub client_name: String,
    pub client_email: Option<String>,
    pub invoice_number: String,
    pub amount: f64,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    /// Defaults to `Pending` when omitted.
    pub status: Option<PaymentStatus>,
}

impl InvoiceService {
    /// Load the full invoice collection. An absent key means no invoices yet.
    pub async fn list(store: &dyn KvStore) -> Result<Vec<Invoice>, AppError> {
        match store.get(INVOICES_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Create a new invoice and persist the updated collection.
    pub async fn create(
        store: &dyn KvStore,
        params: &CreateInvoiceParams,
    ) -> Result<Invoice, AppError> {
        if params.client_name.trim().is_empty() {
            return Err(AppError::Validation(
                "client_name must not be empty".to_string(),
            ));
        }
        if params.invoice_number.trim().is_empty() {
            return Err(AppError::Validation(
                "invoice_number must not be empty".to_string(),
            ));
        }
        if !params.amount.is_finite() || params.amount <= 0.0 {
            return Err(AppError::Validation(
                "amount must be a positive number".to_string(),
            ));
        }

        let invoice = Invoice {
            id: format!("INV-{}", Uuid::new_v4()),
            client_name: params.client_name.clone(),
            client_email: params.client_email.clone(),
            invoice_number: params.invoice_number.clone(),
            amount: params.amount,
            issue_date: params.issue_date,
            due_date: params.due_date,
            status: params.status.unwrap_or(PaymentStatus::Pending),
        };

        let mut invoices = Self::list(store).await?;
        invoices.insert(0, invoice.clone());
        Self::persist(store, &invoices).await?;

        tracing::info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            "Invoice created"
        );

        Ok(invoice)
    }

    /// Update an invoice's payment status.
    pub async fn update_status(
        store: &dyn KvStore,
        invoice_id: &str,
        status: PaymentStatus,
    ) -> Result<Invoice, AppError> {
        let mut invoices = Self::list(store).await?;

        let Some(invoice) = invoices.iter_mut().find(|i| i.id == invoice_id) else {
            return Err(AppError::NotFound(format!(
                "Invoice {} not found",
                invoice_id
            )));
        };
        invoice.status = status;
        let updated = invoice.clone();

        Self::persist(store, &invoices).await?;

        tracing::info!(invoice_id = %invoice_id, status = %status, "Invoice status updated");

        Ok(updated)
    }

    /// Delete an invoice. Returns true if it was deleted.
    pub async fn delete(store: &dyn KvStore, invoice_id: &str) -> Result<bool, AppError> {
        let mut invoices = Self::list(store).await?;
        let before = invoices.len();
        invoices.retain(|i| i.id != invoice_id);

        let deleted = invoices.len() != before;
        if deleted {
            Self::persist(store, &invoices).await?;
            tracing::info!(invoice_id = %invoice_id, "Invoice deleted");
        }

        Ok(deleted)
    }

    /// Filter invoices by payment status. `None` keeps everything.
    pub fn filter_by_status(
        invoices: &[Invoice],
        status: Option<PaymentStatus>,
    ) -> Vec<&Invoice> {
        invoices
            .iter()
            .filter(|i| status.is_none_or(|s| i.status == s))
            .collect()
    }

    /// Invoices whose payment was not received by the due date.
    pub fn overdue(invoices: &[Invoice]) -> Vec<&Invoice> {
        invoices
            .iter()
            .filter(|i| i.status == PaymentStatus::Overdue)
            .collect()
    }

    async fn persist(store: &dyn KvStore, invoices: &[Invoice]) -> Result<(), AppError> {
        let raw = serde_json::to_string(invoices)?;
        store.set(INVOICES_KEY, &raw).await
    }
}
