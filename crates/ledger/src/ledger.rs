//! Ledgers: the shared books and the tenancy boundary for everything else.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use sharebook_auth::{LedgerAction, MemberRole, Membership, MembershipStore};
use sharebook_core::{DomainError, DomainResult, Entity, LedgerId, SoftDelete, UserId, Validator};

use crate::access::LedgerGuard;

pub const DEFAULT_CURRENCY: &str = "KRW";
pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const CURRENCY_MAX_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    pub id: LedgerId,
    pub name: String,
    pub description: Option<String>,
    pub currency: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for Ledger {
    type Id = LedgerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl SoftDelete for Ledger {
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at.get_or_insert(at);
    }
}

/// Ledger rows. Lookups only return active ledgers.
pub trait LedgerStore: Send + Sync {
    fn find_active(&self, id: LedgerId) -> DomainResult<Option<Ledger>>;
    /// Active ledgers among `ids`, newest first.
    fn find_active_by_ids(&self, ids: &[LedgerId]) -> DomainResult<Vec<Ledger>>;
    fn save(&self, ledger: Ledger) -> DomainResult<()>;
    /// Physically drop a row. Only used to undo a half-finished create.
    fn remove(&self, id: LedgerId) -> DomainResult<()>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn find_active(&self, id: LedgerId) -> DomainResult<Option<Ledger>> {
        (**self).find_active(id)
    }

    fn find_active_by_ids(&self, ids: &[LedgerId]) -> DomainResult<Vec<Ledger>> {
        (**self).find_active_by_ids(ids)
    }

    fn save(&self, ledger: Ledger) -> DomainResult<()> {
        (**self).save(ledger)
    }

    fn remove(&self, id: LedgerId) -> DomainResult<()> {
        (**self).remove(id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateLedger {
    pub name: String,
    pub description: Option<String>,
    pub currency: Option<String>,
}

/// Partial update: `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateLedger {
    pub name: Option<String>,
    pub description: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerView {
    pub id: LedgerId,
    pub name: String,
    pub description: Option<String>,
    pub currency: String,
    pub created_by: UserId,
    pub member_count: usize,
    pub my_role: MemberRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LedgerView {
    fn new(ledger: Ledger, member_count: usize, my_role: MemberRole) -> Self {
        Self {
            id: ledger.id,
            name: ledger.name,
            description: ledger.description,
            currency: ledger.currency,
            created_by: ledger.created_by,
            member_count,
            my_role,
            created_at: ledger.created_at,
            updated_at: ledger.updated_at,
        }
    }
}

pub struct LedgerService<L, M> {
    guard: LedgerGuard<L, M>,
}

impl<L, M> LedgerService<L, M>
where
    L: LedgerStore,
    M: MembershipStore,
{
    pub fn new(guard: LedgerGuard<L, M>) -> Self {
        Self { guard }
    }

    /// Create a ledger with the caller as its OWNER.
    pub fn create(&self, user_id: UserId, input: CreateLedger) -> DomainResult<LedgerView> {
        let mut v = Validator::new();
        v.required_text("name", &input.name, NAME_MAX_LEN)
            .optional_text("description", input.description.as_deref(), DESCRIPTION_MAX_LEN)
            .optional_nonblank("currency", input.currency.as_deref(), CURRENCY_MAX_LEN);
        v.finish()?;

        let now = Utc::now();
        let ledger = Ledger {
            id: LedgerId::new(),
            name: input.name.trim().to_string(),
            description: input.description,
            currency: input
                .currency
                .map(|c| c.trim().to_uppercase())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            created_by: user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        self.guard.ledgers().save(ledger.clone())?;
        let owner = Membership::owner(ledger.id, user_id, now);
        if let Err(e) = self.guard.memberships().save(owner) {
            // Never leave a ledger without its OWNER.
            self.guard.ledgers().remove(ledger.id)?;
            return Err(e);
        }

        tracing::info!(ledger_id = %ledger.id, user_id = %user_id, "ledger created");
        Ok(LedgerView::new(ledger, 1, MemberRole::Owner))
    }

    /// Active ledgers the caller is a member of.
    pub fn list_mine(&self, user_id: UserId) -> DomainResult<Vec<LedgerView>> {
        let members = self.guard.memberships();
        let ids = members.find_ledger_ids_by_user(user_id)?;
        let ledgers = self.guard.ledgers().find_active_by_ids(&ids)?;

        let mut views = Vec::with_capacity(ledgers.len());
        for ledger in ledgers {
            let Some(me) = members.find_by_user_and_ledger(user_id, ledger.id)? else {
                continue;
            };
            let count = members.count_by_ledger(ledger.id)?;
            views.push(LedgerView::new(ledger, count, me.role));
        }
        tracing::debug!(user_id = %user_id, count = views.len(), "listed ledgers");
        Ok(views)
    }

    pub fn get(&self, user_id: UserId, ledger_id: LedgerId) -> DomainResult<LedgerView> {
        let (ledger, me) = self.guard.enter(user_id, ledger_id, &LedgerAction::Read)?;
        let count = self.guard.memberships().count_by_ledger(ledger_id)?;
        Ok(LedgerView::new(ledger, count, me.role))
    }

    pub fn update(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
        input: UpdateLedger,
    ) -> DomainResult<LedgerView> {
        let (mut ledger, me) = self
            .guard
            .enter(user_id, ledger_id, &LedgerAction::ModifyLedger)?;

        let mut v = Validator::new();
        v.optional_nonblank("name", input.name.as_deref(), NAME_MAX_LEN)
            .optional_text("description", input.description.as_deref(), DESCRIPTION_MAX_LEN)
            .optional_nonblank("currency", input.currency.as_deref(), CURRENCY_MAX_LEN);
        v.finish()?;

        if let Some(name) = input.name {
            ledger.name = name.trim().to_string();
        }
        if let Some(description) = input.description {
            ledger.description = Some(description);
        }
        if let Some(currency) = input.currency {
            ledger.currency = currency.trim().to_uppercase();
        }
        ledger.updated_at = Utc::now();
        self.guard.ledgers().save(ledger.clone())?;

        tracing::info!(ledger_id = %ledger_id, user_id = %user_id, "ledger updated");
        let count = self.guard.memberships().count_by_ledger(ledger_id)?;
        Ok(LedgerView::new(ledger, count, me.role))
    }

    /// Soft delete. OWNER only.
    pub fn delete(&self, user_id: UserId, ledger_id: LedgerId) -> DomainResult<()> {
        let (mut ledger, _) = self
            .guard
            .enter(user_id, ledger_id, &LedgerAction::DeleteLedger)?;
        ledger.mark_deleted(Utc::now());
        self.guard.ledgers().save(ledger)?;
        tracing::info!(ledger_id = %ledger_id, user_id = %user_id, "ledger deleted");
        Ok(())
    }
}

/// Shared helper: load an active ledger or fail with `NotFound`.
pub(crate) fn require_ledger<L: LedgerStore>(ledgers: &L, id: LedgerId) -> DomainResult<Ledger> {
    ledgers
        .find_active(id)?
        .ok_or_else(|| DomainError::resource_not_found("Ledger", id))
}
