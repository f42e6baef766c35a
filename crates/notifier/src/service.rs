//! Overdue-reminder pipeline.
//!
//! For each overdue invoice:
//! 1. Check that the invoice carries a contact address
//! 2. Check the sent history (via `NotificationTracker`)
//! 3. Dispatch the email and await the outcome
//! 4. Record the send and persist the history
//!
//! The dispatch is awaited before anything is recorded: a failed send
//! leaves no trace, so the next sweep retries it. The mark-then-persist
//! step after a successful dispatch is not transactional with the send;
//! a crash between the two can produce one duplicate reminder after
//! restart.

use cashflow_common::error::AppError;
use cashflow_common::storage::KvStore;
use cashflow_common::types::{Invoice, PaymentStatus};

use crate::email::EmailDispatcher;
use crate::tracker::NotificationTracker;

/// Orchestrates de-duplicated overdue-reminder dispatch.
///
/// Methods take `&mut self`, so two sends through one service cannot
/// interleave around the dispatch await; callers sharing a service across
/// tasks serialize the whole check-dispatch-record sequence with it.
pub struct NotificationService {
    tracker: NotificationTracker,
}

impl NotificationService {
    pub fn new() -> Self {
        Self {
            tracker: NotificationTracker::new(),
        }
    }

    /// Build a service over an already-populated tracker.
    pub fn with_tracker(tracker: NotificationTracker) -> Self {
        Self { tracker }
    }

    /// Replace the in-memory history with the persisted one, if present.
    pub async fn load_history(&mut self, store: &dyn KvStore) {
        self.tracker.load(store).await;
    }

    /// Whether a reminder was already sent for this invoice.
    pub fn has_sent(&self, invoice_id: &str) -> bool {
        self.tracker.has_sent(invoice_id)
    }

    /// Number of invoices in the sent history.
    pub fn sent_count(&self) -> usize {
        self.tracker.sent_count()
    }

    /// Try to send an overdue reminder for one invoice.
    ///
    /// Returns `Ok(true)` when a reminder was dispatched and recorded.
    /// Returns `Ok(false)` without side effects when the invoice has no
    /// client email or a reminder was already sent. A dispatch failure
    /// propagates as an error with nothing marked and nothing persisted.
    pub async fn try_send_overdue(
        &mut self,
        invoice: &Invoice,
        store: &dyn KvStore,
        mailer: &dyn EmailDispatcher,
    ) -> Result<bool, AppError> {
        let has_email = invoice
            .client_email
            .as_deref()
            .is_some_and(|email| !email.trim().is_empty());
        if !has_email {
            tracing::warn!(
                invoice_id = %invoice.id,
                "Cannot send reminder for invoice {}: missing client email",
                invoice.invoice_number
            );
            return Ok(false);
        }

        if self.tracker.has_sent(&invoice.id) {
            return Ok(false);
        }

        mailer.send_overdue_reminder(invoice).await?;

        // History persistence failure is logged inside save(); the dispatch
        // already succeeded, so the send is still reported to the caller.
        self.tracker.mark_sent(&invoice.id);
        self.tracker.save(store).await;

        tracing::info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            "Overdue reminder sent"
        );

        Ok(true)
    }

    /// Sweep a collection, dispatching reminders for every overdue invoice
    /// that still needs one. Returns the number dispatched; per-invoice
    /// dispatch failures are logged and do not abort the sweep.
    pub async fn process_overdue(
        &mut self,
        invoices: &[Invoice],
        store: &dyn KvStore,
        mailer: &dyn EmailDispatcher,
    ) -> u32 {
        let mut sent = 0u32;

        for invoice in invoices
            .iter()
            .filter(|i| i.status == PaymentStatus::Overdue)
        {
            match self.try_send_overdue(invoice, store, mailer).await {
                Ok(true) => sent += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(
                        invoice_id = %invoice.id,
                        error = %e,
                        "Overdue reminder dispatch failed"
                    );
                }
            }
        }

        sent
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}
