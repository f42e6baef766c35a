//! Dashboard analytics — summation over the record collections.
//!
//! Pure functions over already-loaded records; nothing here touches storage.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use cashflow_common::types::{Expense, Invoice, PaymentStatus};

/// Headline figures across both collections.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FinancialSummary {
    /// Sum of all invoice amounts, regardless of status
    pub total_invoiced: f64,
    /// Sum of all expense amounts
    pub total_expenses: f64,
    /// Sum of invoice amounts still awaiting payment
    pub pending_amount: f64,
    /// `total_invoiced - total_expenses`
    pub net_balance: f64,
}

/// Aggregates over a (possibly filtered) expense collection.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ExpenseBreakdown {
    pub total: f64,
    /// Mean expense amount; zero for an empty collection
    pub average: f64,
    /// Date of the most recent expense, if any
    pub latest: Option<DateTime<Utc>>,
    /// Per-category totals
    pub by_category: BTreeMap<String, f64>,
}

/// Ledger analytics service.
pub struct LedgerAnalyzer;

impl LedgerAnalyzer {
    /// Compute the dashboard headline figures.
    pub fn summarize(invoices: &[Invoice], expenses: &[Expense]) -> FinancialSummary {
        let total_invoiced: f64 = invoices.iter().map(|i| i.amount).sum();
        let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();
        let pending_amount: f64 = invoices
            .iter()
            .filter(|i| i.status == PaymentStatus::Pending)
            .map(|i| i.amount)
            .sum();

        FinancialSummary {
            total_invoiced,
            total_expenses,
            pending_amount,
            net_balance: total_invoiced - total_expenses,
        }
    }

    /// Aggregate an expense collection.
    pub fn expense_breakdown(expenses: &[Expense]) -> ExpenseBreakdown {
        let total: f64 = expenses.iter().map(|e| e.amount).sum();
        let average = if expenses.is_empty() {
            0.0
        } else {
            total / expenses.len() as f64
        };
        let latest = expenses.iter().map(|e| e.date).max();

        let mut by_category = BTreeMap::new();
        for expense in expenses {
            *by_category.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
        }

        ExpenseBreakdown {
            total,
            average,
            latest,
            by_category,
        }
    }
}
