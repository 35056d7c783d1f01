//! Expense categories: global defaults plus per-ledger custom ones.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use sharebook_auth::{LedgerAction, MembershipStore};
use sharebook_core::{
    CategoryId, DomainError, DomainResult, Entity, HexColor, LedgerId, UserId, Validator,
};

use crate::access::LedgerGuard;
use crate::expense::ExpenseStore;
use crate::ledger::LedgerStore;

pub const NAME_MAX_LEN: usize = 50;
pub const ICON_MAX_LEN: usize = 50;

/// Defaults visible in every ledger, seeded once at startup.
pub const DEFAULT_CATEGORIES: [(&str, &str, &str); 9] = [
    ("Food", "#FF6B6B", "restaurant"),
    ("Transport", "#4ECDC4", "directions_car"),
    ("Shopping", "#FFD93D", "shopping_bag"),
    ("Housing", "#6C5CE7", "home"),
    ("Utilities", "#A29BFE", "bolt"),
    ("Health", "#00B894", "local_hospital"),
    ("Entertainment", "#FD79A8", "movie"),
    ("Education", "#0984E3", "school"),
    ("Other", "#808080", "more_horiz"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    /// `None` for default categories.
    pub ledger_id: Option<LedgerId>,
    pub name: String,
    pub color: String,
    pub icon: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn default_category(name: &str, color: &str, icon: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: CategoryId::new(),
            ledger_id: None,
            name: name.to_string(),
            color: color.to_string(),
            icon: Some(icon.to_string()),
            is_default: true,
            created_at: now,
        }
    }

    /// Defaults are visible everywhere; custom ones only in their ledger.
    pub fn is_visible_in(&self, ledger_id: LedgerId) -> bool {
        self.is_default || self.ledger_id == Some(ledger_id)
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Category rows.
pub trait CategoryStore: Send + Sync {
    /// Defaults plus the ledger's custom categories; defaults first, then by
    /// name.
    fn find_visible(&self, ledger_id: LedgerId) -> DomainResult<Vec<Category>>;
    fn find_by_id(&self, id: CategoryId) -> DomainResult<Option<Category>>;
    /// The category if it is visible in `ledger_id`.
    fn find_by_id_for_ledger(
        &self,
        id: CategoryId,
        ledger_id: LedgerId,
    ) -> DomainResult<Option<Category>>;
    fn find_defaults(&self) -> DomainResult<Vec<Category>>;
    fn exists_by_ledger_and_name(&self, ledger_id: LedgerId, name: &str) -> DomainResult<bool>;
    /// Fails with `BadRequest` when another custom category of the same
    /// ledger already has this name.
    fn save(&self, category: Category) -> DomainResult<()>;
    fn delete(&self, id: CategoryId) -> DomainResult<bool>;
}

impl<S> CategoryStore for Arc<S>
where
    S: CategoryStore + ?Sized,
{
    fn find_visible(&self, ledger_id: LedgerId) -> DomainResult<Vec<Category>> {
        (**self).find_visible(ledger_id)
    }

    fn find_by_id(&self, id: CategoryId) -> DomainResult<Option<Category>> {
        (**self).find_by_id(id)
    }

    fn find_by_id_for_ledger(
        &self,
        id: CategoryId,
        ledger_id: LedgerId,
    ) -> DomainResult<Option<Category>> {
        (**self).find_by_id_for_ledger(id, ledger_id)
    }

    fn find_defaults(&self) -> DomainResult<Vec<Category>> {
        (**self).find_defaults()
    }

    fn exists_by_ledger_and_name(&self, ledger_id: LedgerId, name: &str) -> DomainResult<bool> {
        (**self).exists_by_ledger_and_name(ledger_id, name)
    }

    fn save(&self, category: Category) -> DomainResult<()> {
        (**self).save(category)
    }

    fn delete(&self, id: CategoryId) -> DomainResult<bool> {
        (**self).delete(id)
    }
}

/// Insert the default categories unless some already exist. Returns how many
/// were inserted.
pub fn seed_default_categories<C: CategoryStore>(store: &C) -> DomainResult<usize> {
    if !store.find_defaults()?.is_empty() {
        return Ok(0);
    }
    let now = Utc::now();
    for (name, color, icon) in DEFAULT_CATEGORIES {
        store.save(Category::default_category(name, color, icon, now))?;
    }
    tracing::info!(count = DEFAULT_CATEGORIES.len(), "default categories seeded");
    Ok(DEFAULT_CATEGORIES.len())
}

#[derive(Debug, Clone, Default)]
pub struct CreateCategory {
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

pub struct CategoryService<L, M, C, E> {
    guard: LedgerGuard<L, M>,
    categories: C,
    expenses: E,
}

impl<L, M, C, E> CategoryService<L, M, C, E>
where
    L: LedgerStore,
    M: MembershipStore,
    C: CategoryStore,
    E: ExpenseStore,
{
    pub fn new(guard: LedgerGuard<L, M>, categories: C, expenses: E) -> Self {
        Self {
            guard,
            categories,
            expenses,
        }
    }

    pub fn list(&self, user_id: UserId, ledger_id: LedgerId) -> DomainResult<Vec<Category>> {
        self.guard.enter(user_id, ledger_id, &LedgerAction::Read)?;
        self.categories.find_visible(ledger_id)
    }

    pub fn create(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
        input: CreateCategory,
    ) -> DomainResult<Category> {
        let mut v = Validator::new();
        v.required_text("name", &input.name, NAME_MAX_LEN)
            .optional_text("icon", input.icon.as_deref(), ICON_MAX_LEN);
        let color = v.hex_color("color", input.color.as_deref());
        v.finish()?;

        self.guard
            .enter(user_id, ledger_id, &LedgerAction::ManageCategories)?;

        let name = input.name.trim().to_string();
        if self.categories.exists_by_ledger_and_name(ledger_id, &name)? {
            return Err(DomainError::bad_request(
                "Category with this name already exists",
            ));
        }

        let category = Category {
            id: CategoryId::new(),
            ledger_id: Some(ledger_id),
            name,
            color: color.unwrap_or_default().as_str().to_string(),
            icon: input.icon,
            is_default: false,
            created_at: Utc::now(),
        };
        self.categories.save(category.clone())?;

        tracing::info!(ledger_id = %ledger_id, category_id = %category.id, "category created");
        Ok(category)
    }

    pub fn delete(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
        category_id: CategoryId,
    ) -> DomainResult<()> {
        self.guard
            .enter(user_id, ledger_id, &LedgerAction::ManageCategories)?;

        let category = self
            .categories
            .find_by_id(category_id)?
            .ok_or_else(|| DomainError::resource_not_found("Category", category_id))?;

        if category.is_default {
            return Err(DomainError::bad_request("Cannot delete default categories"));
        }
        if category.ledger_id != Some(ledger_id) {
            return Err(DomainError::forbidden(
                "Category does not belong to this ledger",
            ));
        }

        let in_use = self.expenses.count_by_category(category_id)?;
        if in_use > 0 {
            return Err(DomainError::bad_request(format!(
                "Cannot delete category that is used by {in_use} expense(s)"
            )));
        }

        self.categories.delete(category_id)?;
        tracing::info!(ledger_id = %ledger_id, category_id = %category_id, "category deleted");
        Ok(())
    }
}
