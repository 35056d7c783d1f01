//! Expenses recorded in a ledger.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use sharebook_auth::{LedgerAction, MembershipStore, PrincipalStore, authorize};
use sharebook_core::{
    Amount, CategoryId, DomainError, DomainResult, Entity, ExpenseId, LedgerId, SoftDelete, UserId,
    Validator,
};

use crate::access::LedgerGuard;
use crate::category::{Category, CategoryStore};
use crate::ledger::LedgerStore;
use crate::page::{Page, PageRequest};

pub const DESCRIPTION_MAX_LEN: usize = 255;
pub const PAYMENT_METHOD_MAX_LEN: usize = 50;
const UNKNOWN_USER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub id: ExpenseId,
    pub ledger_id: LedgerId,
    pub category_id: Option<CategoryId>,
    pub amount: Amount,
    pub description: String,
    pub expense_date: NaiveDate,
    pub payment_method: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for Expense {
    type Id = ExpenseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl SoftDelete for Expense {
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at.get_or_insert(at);
    }
}

/// List filter; every field is optional and they combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Inclusive.
    pub start_date: Option<NaiveDate>,
    /// Inclusive.
    pub end_date: Option<NaiveDate>,
    pub category_id: Option<CategoryId>,
}

impl ExpenseFilter {
    pub fn matches(&self, e: &Expense) -> bool {
        self.start_date.is_none_or(|d| e.expense_date >= d)
            && self.end_date.is_none_or(|d| e.expense_date <= d)
            && self.category_id.is_none_or(|c| e.category_id == Some(c))
    }
}

/// Expense rows. Soft-deleted rows are invisible to every method here.
pub trait ExpenseStore: Send + Sync {
    fn find_active_in_ledger(
        &self,
        id: ExpenseId,
        ledger_id: LedgerId,
    ) -> DomainResult<Option<Expense>>;
    /// Matching expenses, newest expense date first, then newest created.
    fn find_page(
        &self,
        ledger_id: LedgerId,
        filter: &ExpenseFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Expense>>;
    fn count_by_category(&self, category_id: CategoryId) -> DomainResult<usize>;
    fn save(&self, expense: Expense) -> DomainResult<()>;
}

impl<S> ExpenseStore for Arc<S>
where
    S: ExpenseStore + ?Sized,
{
    fn find_active_in_ledger(
        &self,
        id: ExpenseId,
        ledger_id: LedgerId,
    ) -> DomainResult<Option<Expense>> {
        (**self).find_active_in_ledger(id, ledger_id)
    }

    fn find_page(
        &self,
        ledger_id: LedgerId,
        filter: &ExpenseFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Expense>> {
        (**self).find_page(ledger_id, filter, page)
    }

    fn count_by_category(&self, category_id: CategoryId) -> DomainResult<usize> {
        (**self).count_by_category(category_id)
    }

    fn save(&self, expense: Expense) -> DomainResult<()> {
        (**self).save(expense)
    }
}

/// Raw create input. The amount stays textual until validated so a bad value
/// is reported as a field error.
#[derive(Debug, Clone, Default)]
pub struct CreateExpense {
    pub amount: Option<String>,
    pub description: Option<String>,
    pub expense_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub category_id: Option<CategoryId>,
}

/// Partial update: `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateExpense {
    pub amount: Option<String>,
    pub description: Option<String>,
    pub expense_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
    pub icon: Option<String>,
}

impl From<&Category> for CategorySummary {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            color: c.color.clone(),
            icon: c.icon.clone(),
        }
    }
}

/// Creator as shown on an expense; the name is "Unknown" once the account is
/// gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatorSummary {
    pub id: UserId,
    pub name: String,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseView {
    pub id: ExpenseId,
    pub ledger_id: LedgerId,
    pub amount: Amount,
    pub description: String,
    pub expense_date: NaiveDate,
    pub payment_method: Option<String>,
    pub category: Option<CategorySummary>,
    pub created_by: CreatorSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct ExpenseService<L, M, C, E, P> {
    guard: LedgerGuard<L, M>,
    categories: C,
    expenses: E,
    principals: P,
}

impl<L, M, C, E, P> ExpenseService<L, M, C, E, P>
where
    L: LedgerStore,
    M: MembershipStore,
    C: CategoryStore,
    E: ExpenseStore,
    P: PrincipalStore,
{
    pub fn new(guard: LedgerGuard<L, M>, categories: C, expenses: E, principals: P) -> Self {
        Self {
            guard,
            categories,
            expenses,
            principals,
        }
    }

    pub fn list(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
        filter: &ExpenseFilter,
        page: PageRequest,
    ) -> DomainResult<Page<ExpenseView>> {
        self.guard.enter(user_id, ledger_id, &LedgerAction::Read)?;
        let page = self.expenses.find_page(ledger_id, filter, page)?;
        tracing::debug!(ledger_id = %ledger_id, total = page.total_elements, "listed expenses");
        self.enrich_page(ledger_id, page)
    }

    pub fn get(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
        expense_id: ExpenseId,
    ) -> DomainResult<ExpenseView> {
        self.guard.enter(user_id, ledger_id, &LedgerAction::Read)?;
        let expense = self.require(expense_id, ledger_id)?;
        self.enrich_one(ledger_id, expense)
    }

    pub fn create(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
        input: CreateExpense,
    ) -> DomainResult<ExpenseView> {
        let mut v = Validator::new();
        let amount = match input.amount.as_deref() {
            None => {
                v.push("amount", "Amount is required");
                None
            }
            Some(raw) => parse_amount(&mut v, raw),
        };
        let description = input.description.unwrap_or_default();
        v.required_text("description", &description, DESCRIPTION_MAX_LEN)
            .optional_text(
                "payment_method",
                input.payment_method.as_deref(),
                PAYMENT_METHOD_MAX_LEN,
            );
        if input.expense_date.is_none() {
            v.push("expense_date", "Expense date is required");
        }
        v.finish()?;

        self.guard
            .enter(user_id, ledger_id, &LedgerAction::CreateExpense)?;

        if let Some(category_id) = input.category_id {
            self.require_visible_category(category_id, ledger_id)?;
        }

        let (Some(amount), Some(expense_date)) = (amount, input.expense_date) else {
            return Err(DomainError::bad_request("Validation failed"));
        };

        let now = Utc::now();
        let expense = Expense {
            id: ExpenseId::new(),
            ledger_id,
            category_id: input.category_id,
            amount,
            description: description.trim().to_string(),
            expense_date,
            payment_method: input.payment_method,
            created_by: user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.expenses.save(expense.clone())?;

        tracing::info!(
            ledger_id = %ledger_id,
            expense_id = %expense.id,
            user_id = %user_id,
            "expense created",
        );
        self.enrich_one(ledger_id, expense)
    }

    pub fn update(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
        expense_id: ExpenseId,
        input: UpdateExpense,
    ) -> DomainResult<ExpenseView> {
        let mut v = Validator::new();
        let amount = input.amount.as_deref().and_then(|raw| parse_amount(&mut v, raw));
        v.optional_nonblank("description", input.description.as_deref(), DESCRIPTION_MAX_LEN)
            .optional_text(
                "payment_method",
                input.payment_method.as_deref(),
                PAYMENT_METHOD_MAX_LEN,
            );
        v.finish()?;

        let (_, me) = self.guard.enter_as_member(user_id, ledger_id)?;
        let mut expense = self.require(expense_id, ledger_id)?;
        authorize(
            me.role,
            &LedgerAction::ModifyExpense {
                own: expense.created_by == user_id,
            },
        )?;

        if let Some(category_id) = input.category_id {
            self.require_visible_category(category_id, ledger_id)?;
            expense.category_id = Some(category_id);
        }
        if let Some(amount) = amount {
            expense.amount = amount;
        }
        if let Some(description) = input.description {
            expense.description = description.trim().to_string();
        }
        if let Some(date) = input.expense_date {
            expense.expense_date = date;
        }
        if let Some(method) = input.payment_method {
            expense.payment_method = Some(method);
        }
        expense.updated_at = Utc::now();
        self.expenses.save(expense.clone())?;

        tracing::info!(
            ledger_id = %ledger_id,
            expense_id = %expense_id,
            user_id = %user_id,
            "expense updated",
        );
        self.enrich_one(ledger_id, expense)
    }

    /// Soft delete. Creator or ADMIN+.
    pub fn delete(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
        expense_id: ExpenseId,
    ) -> DomainResult<()> {
        let (_, me) = self.guard.enter_as_member(user_id, ledger_id)?;
        let mut expense = self.require(expense_id, ledger_id)?;
        authorize(
            me.role,
            &LedgerAction::ModifyExpense {
                own: expense.created_by == user_id,
            },
        )?;

        expense.mark_deleted(Utc::now());
        self.expenses.save(expense)?;
        tracing::info!(
            ledger_id = %ledger_id,
            expense_id = %expense_id,
            user_id = %user_id,
            "expense deleted",
        );
        Ok(())
    }

    fn require(&self, expense_id: ExpenseId, ledger_id: LedgerId) -> DomainResult<Expense> {
        self.expenses
            .find_active_in_ledger(expense_id, ledger_id)?
            .ok_or_else(|| DomainError::resource_not_found("Expense", expense_id))
    }

    fn require_visible_category(
        &self,
        category_id: CategoryId,
        ledger_id: LedgerId,
    ) -> DomainResult<Category> {
        self.categories
            .find_by_id_for_ledger(category_id, ledger_id)?
            .ok_or_else(|| DomainError::resource_not_found("Category", category_id))
    }

    fn enrich_one(&self, ledger_id: LedgerId, expense: Expense) -> DomainResult<ExpenseView> {
        let page = Page::new(vec![expense], PageRequest::new(None, Some(1)), 1);
        let mut views = self.enrich_page(ledger_id, page)?.content;
        views
            .pop()
            .ok_or_else(|| DomainError::storage("expense vanished during enrichment"))
    }

    /// Attach category and creator summaries, loading each set once.
    fn enrich_page(
        &self,
        ledger_id: LedgerId,
        page: Page<Expense>,
    ) -> DomainResult<Page<ExpenseView>> {
        let categories = if page.content.iter().any(|e| e.category_id.is_some()) {
            self.categories.find_visible(ledger_id)?
        } else {
            Vec::new()
        };

        let mut creator_ids: Vec<UserId> = page.content.iter().map(|e| e.created_by).collect();
        creator_ids.sort();
        creator_ids.dedup();
        let creators = self.principals.find_many(&creator_ids)?;

        Ok(page.map(|e| {
            let category = e
                .category_id
                .and_then(|id| categories.iter().find(|c| c.id == id))
                .map(CategorySummary::from);
            let created_by = match creators.iter().find(|u| u.id == e.created_by) {
                Some(u) => CreatorSummary {
                    id: u.id,
                    name: u.name.clone(),
                    profile_image: u.profile_image.clone(),
                },
                None => CreatorSummary {
                    id: e.created_by,
                    name: UNKNOWN_USER.to_string(),
                    profile_image: None,
                },
            };
            ExpenseView {
                id: e.id,
                ledger_id: e.ledger_id,
                amount: e.amount,
                description: e.description,
                expense_date: e.expense_date,
                payment_method: e.payment_method,
                category,
                created_by,
                created_at: e.created_at,
                updated_at: e.updated_at,
            }
        }))
    }
}

fn parse_amount(v: &mut Validator, raw: &str) -> Option<Amount> {
    match raw.parse::<Amount>() {
        Ok(a) => Some(a),
        Err(e) => {
            v.push("amount", e.to_string());
            None
        }
    }
}
