//! Expense service — CRUD operations for expense records.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cashflow_common::error::AppError;
use cashflow_common::storage::KvStore;
use cashflow_common::types::Expense;

/// Fixed storage key for the expense collection.
pub const EXPENSES_KEY: &str = "expenses";

/// Service layer for expense CRUD operations.
pub struct ExpenseService;

/// Parameters for creating a new expense.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CreateExpenseParams {
    pub category: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub payment_method: String,
    pub description: String,
}

impl ExpenseService {
    /// Load the full expense collection. An absent key means no expenses yet.
    pub async fn list(store: &dyn KvStore) -> Result<Vec<Expense>, AppError> {
        match store.get(EXPENSES_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Create a new expense and persist the updated collection.
    pub async fn create(
        store: &dyn KvStore,
        params: &CreateExpenseParams,
    ) -> Result<Expense, AppError> {
        if params.category.trim().is_empty() {
            return Err(AppError::Validation(
                "category must not be empty".to_string(),
            ));
        }
        if params.payment_method.trim().is_empty() {
            return Err(AppError::Validation(
                "payment_method must not be empty".to_string(),
            ));
        }
        if !params.amount.is_finite() || params.amount <= 0.0 {
            return Err(AppError::Validation(
                "amount must be a positive number".to_string(),
            ));
        }

        let expense = Expense {
            id: format!("EXP-{}", Uuid::new_v4()),
            category: params.category.clone(),
            amount: params.amount,
            date: params.date,
            payment_method: params.payment_method.clone(),
            description: params.description.clone(),
        };

        let mut expenses = Self::list(store).await?;
        expenses.insert(0, expense.clone());
        Self::persist(store, &expenses).await?;

        tracing::info!(expense_id = %expense.id, category = %expense.category, "Expense created");

        Ok(expense)
    }

    /// Delete an expense. Returns true if it was deleted.
    pub async fn delete(store: &dyn KvStore, expense_id: &str) -> Result<bool, AppError> {
        let mut expenses = Self::list(store).await?;
        let before = expenses.len();
        expenses.retain(|e| e.id != expense_id);

        let deleted = expenses.len() != before;
        if deleted {
            Self::persist(store, &expenses).await?;
            tracing::info!(expense_id = %expense_id, "Expense deleted");
        }

        Ok(deleted)
    }

    /// Filter expenses by category. `None` keeps everything.
    pub fn filter_by_category<'a>(
        expenses: &'a [Expense],
        category: Option<&str>,
    ) -> Vec<&'a Expense> {
        expenses
            .iter()
            .filter(|e| category.is_none_or(|c| e.category == c))
            .collect()
    }

    /// Distinct expense categories, sorted.
    pub fn categories(expenses: &[Expense]) -> Vec<String> {
        let mut categories: Vec<String> =
            expenses.iter().map(|e| e.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    async fn persist(store: &dyn KvStore, expenses: &[Expense]) -> Result<(), AppError> {
        let raw = serde_json::to_string(expenses)?;
        store.set(EXPENSES_KEY, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashflow_common::storage::MemoryStore;

    fn make_params(category: &str) -> CreateExpenseParams {
        CreateExpenseParams {
            category: category.to_string(),
            amount: 120.0,
            date: Utc::now(),
            payment_method: "Credit Card".to_string(),
            description: format!("Expense for {}", category.to_lowercase()),
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let store = MemoryStore::new();
        ExpenseService::create(&store, &make_params("Software"))
            .await
            .unwrap();
        ExpenseService::create(&store, &make_params("Travel"))
            .await
            .unwrap();

        let expenses = ExpenseService::list(&store).await.unwrap();
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].category, "Travel");
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let store = MemoryStore::new();

        let mut params = make_params("Software");
        params.category = String::new();
        assert!(matches!(
            ExpenseService::create(&store, &params).await,
            Err(AppError::Validation(_))
        ));

        let mut params = make_params("Software");
        params.payment_method = "   ".to_string();
        assert!(matches!(
            ExpenseService::create(&store, &params).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        let created = ExpenseService::create(&store, &make_params("Rent"))
            .await
            .unwrap();

        assert!(ExpenseService::delete(&store, &created.id).await.unwrap());
        assert!(!ExpenseService::delete(&store, &created.id).await.unwrap());
        assert!(ExpenseService::list(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filter_and_categories() {
        let store = MemoryStore::new();
        ExpenseService::create(&store, &make_params("Software"))
            .await
            .unwrap();
        ExpenseService::create(&store, &make_params("Software"))
            .await
            .unwrap();
        ExpenseService::create(&store, &make_params("Travel"))
            .await
            .unwrap();

        let expenses = ExpenseService::list(&store).await.unwrap();
        assert_eq!(
            ExpenseService::filter_by_category(&expenses, Some("Software")).len(),
            2
        );
        assert_eq!(ExpenseService::filter_by_category(&expenses, None).len(), 3);
        assert_eq!(
            ExpenseService::categories(&expenses),
            vec!["Software".to_string(), "Travel".to_string()]
        );
    }
}
