//! Integration tests for the ledger services.
//!
//! All tests run against the in-memory store; no external services needed.

use chrono::Utc;

use cashflow_common::storage::{KvStore, MemoryStore};
use cashflow_common::types::PaymentStatus;
use cashflow_ledger::expenses::{CreateExpenseParams, ExpenseService};
use cashflow_ledger::invoices::{CreateInvoiceParams, INVOICES_KEY, InvoiceService};
use cashflow_ledger::summary::LedgerAnalyzer;

fn invoice_params(invoice_number: &str, amount: f64) -> CreateInvoiceParams {
    CreateInvoiceParams {
        client_name: "Global Solutions".to_string(),
        client_email: Some("accounts@globalsolutions.test".to_string()),
        invoice_number: invoice_number.to_string(),
        amount,
        issue_date: Utc::now(),
        due_date: Utc::now(),
        status: None,
    }
}

fn expense_params(category: &str, amount: f64) -> CreateExpenseParams {
    CreateExpenseParams {
        category: category.to_string(),
        amount,
        date: Utc::now(),
        payment_method: "Bank Transfer".to_string(),
        description: format!("Expense for {}", category.to_lowercase()),
    }
}

#[tokio::test]
async fn test_invoice_lifecycle_round_trips_through_store() {
    let store = MemoryStore::new();

    let created = InvoiceService::create(&store, &invoice_params("INV-2001", 900.0))
        .await
        .unwrap();
    InvoiceService::create(&store, &invoice_params("INV-2002", 450.0))
        .await
        .unwrap();

    // A fresh read sees both records, newest first
    let invoices = InvoiceService::list(&store).await.unwrap();
    assert_eq!(invoices.len(), 2);
    assert_eq!(invoices[0].invoice_number, "INV-2002");

    // Mark overdue, then confirm the persisted copy changed
    InvoiceService::update_status(&store, &created.id, PaymentStatus::Overdue)
        .await
        .unwrap();
    let invoices = InvoiceService::list(&store).await.unwrap();
    let overdue = InvoiceService::overdue(&invoices);
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].id, created.id);

    // Delete and confirm it is gone from storage
    assert!(InvoiceService::delete(&store, &created.id).await.unwrap());
    assert_eq!(InvoiceService::list(&store).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_persisted_shape_is_a_camel_case_array() {
    let store = MemoryStore::new();
    InvoiceService::create(&store, &invoice_params("INV-2001", 900.0))
        .await
        .unwrap();

    let raw = store.get(INVOICES_KEY).await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["invoiceNumber"], "INV-2001");
    assert_eq!(records[0]["paymentStatus"], "pending");
}

#[tokio::test]
async fn test_summary_over_stored_records() {
    let store = MemoryStore::new();

    let overdue = InvoiceService::create(&store, &invoice_params("INV-2001", 1000.0))
        .await
        .unwrap();
    InvoiceService::update_status(&store, &overdue.id, PaymentStatus::Overdue)
        .await
        .unwrap();
    InvoiceService::create(&store, &invoice_params("INV-2002", 600.0))
        .await
        .unwrap();

    ExpenseService::create(&store, &expense_params("Marketing", 250.0))
        .await
        .unwrap();
    ExpenseService::create(&store, &expense_params("Marketing", 150.0))
        .await
        .unwrap();
    ExpenseService::create(&store, &expense_params("Utilities", 100.0))
        .await
        .unwrap();

    let invoices = InvoiceService::list(&store).await.unwrap();
    let expenses = ExpenseService::list(&store).await.unwrap();

    let summary = LedgerAnalyzer::summarize(&invoices, &expenses);
    assert_eq!(summary.total_invoiced, 1600.0);
    assert_eq!(summary.total_expenses, 500.0);
    assert_eq!(summary.pending_amount, 600.0);
    assert_eq!(summary.net_balance, 1100.0);

    let breakdown = LedgerAnalyzer::expense_breakdown(&expenses);
    assert_eq!(breakdown.by_category["Marketing"], 400.0);
    assert_eq!(breakdown.by_category["Utilities"], 100.0);

    assert_eq!(
        ExpenseService::categories(&expenses),
        vec!["Marketing".to_string(), "Utilities".to_string()]
    );
}
