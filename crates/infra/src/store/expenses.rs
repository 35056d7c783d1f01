use sharebook_core::{CategoryId, DomainResult, ExpenseId, LedgerId, SoftDelete};
use sharebook_ledger::{Expense, ExpenseFilter, ExpenseStore, Page, PageRequest};

use super::Table;

#[derive(Debug)]
pub struct InMemoryExpenseStore {
    expenses: Table<ExpenseId, Expense>,
}

impl InMemoryExpenseStore {
    pub fn new() -> Self {
        Self {
            expenses: Table::new("expense"),
        }
    }
}

impl Default for InMemoryExpenseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseStore for InMemoryExpenseStore {
    fn find_active_in_ledger(
        &self,
        id: ExpenseId,
        ledger_id: LedgerId,
    ) -> DomainResult<Option<Expense>> {
        Ok(self
            .expenses
            .read()?
            .get(&id)
            .filter(|e| e.is_active() && e.ledger_id == ledger_id)
            .cloned())
    }

    fn find_page(
        &self,
        ledger_id: LedgerId,
        filter: &ExpenseFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Expense>> {
        let mut rows: Vec<Expense> = self
            .expenses
            .read()?
            .values()
            .filter(|e| e.is_active() && e.ledger_id == ledger_id && filter.matches(e))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.expense_date
                .cmp(&a.expense_date)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        });
        Ok(page.slice(rows))
    }

    fn count_by_category(&self, category_id: CategoryId) -> DomainResult<usize> {
        Ok(self
            .expenses
            .read()?
            .values()
            .filter(|e| e.is_active() && e.category_id == Some(category_id))
            .count())
    }

    fn save(&self, expense: Expense) -> DomainResult<()> {
        self.expenses.write()?.insert(expense.id, expense);
        Ok(())
    }
}
