//! Notification de-duplication tracker.
//!
//! Remembers which invoices already received an overdue reminder so a
//! reminder is dispatched at most once per invoice across the lifetime of
//! the stored history. Membership is monotonic: ids are only ever added.
//!
//! The set is persisted as a serialized id list under a fixed key and
//! reloaded at startup. Load and save failures are reported through
//! `tracing` and never surface to the caller; the safe default on a failed
//! load is whatever the tracker already held (an empty set at startup).

use std::collections::HashSet;

use cashflow_common::storage::KvStore;

/// Fixed storage key for the sent-reminder history.
pub const SENT_NOTIFICATIONS_KEY: &str = "sent_invoice_notifications";

/// Persisted set of invoice ids that already received an overdue reminder.
#[derive(Debug)]
pub struct NotificationTracker {
    sent: HashSet<String>,
}

impl NotificationTracker {
    pub fn new() -> Self {
        Self {
            sent: HashSet::new(),
        }
    }

    /// Whether a reminder was already sent for this invoice. No side effects.
    pub fn has_sent(&self, invoice_id: &str) -> bool {
        self.sent.contains(invoice_id)
    }

    /// Record that a reminder was sent. Re-inserting a present id is a no-op.
    pub fn mark_sent(&mut self, invoice_id: &str) {
        self.sent.insert(invoice_id.to_string());
    }

    /// Number of invoices in the history (for monitoring).
    pub fn sent_count(&self) -> usize {
        self.sent.len()
    }

    /// Replace in-memory membership with the persisted history, if one exists.
    pub async fn load(&mut self, store: &dyn KvStore) {
        match store.get(SENT_NOTIFICATIONS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                // Collecting into the set drops duplicate ids in the stored list
                Ok(ids) => self.sent = ids.into_iter().collect(),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to parse notification history")
                }
            },
            Ok(None) => {}
            Err(e) => tracing::error!(error = %e, "Failed to load notification history"),
        }
    }

    /// Persist the current membership as a serialized id list (order irrelevant).
    pub async fn save(&self, store: &dyn KvStore) {
        let ids: Vec<&str> = self.sent.iter().map(String::as_str).collect();
        match serde_json::to_string(&ids) {
            Ok(raw) => {
                if let Err(e) = store.set(SENT_NOTIFICATIONS_KEY, &raw).await {
                    tracing::error!(error = %e, "Failed to save notification history");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize notification history")
            }
        }
    }
}

impl Default for NotificationTracker {
    fn default() -> Self {
        Self::new()
    }
}
