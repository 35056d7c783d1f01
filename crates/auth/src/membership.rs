use std::sync::Arc;

use chrono::{DateTime, Utc};

use sharebook_core::{DomainError, DomainResult, Entity, LedgerId, MemberId, UserId};

use crate::{LedgerAction, MemberRole, authorize};

/// A user's membership in one ledger. At most one per (user, ledger).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub id: MemberId,
    pub ledger_id: LedgerId,
    pub user_id: UserId,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
    /// `None` for the OWNER row created with the ledger.
    pub invited_by: Option<UserId>,
}

impl Membership {
    pub fn owner(ledger_id: LedgerId, user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: MemberId::new(),
            ledger_id,
            user_id,
            role: MemberRole::Owner,
            joined_at: now,
            invited_by: None,
        }
    }

    pub fn invited(
        ledger_id: LedgerId,
        user_id: UserId,
        role: MemberRole,
        invited_by: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MemberId::new(),
            ledger_id,
            user_id,
            role,
            joined_at: now,
            invited_by: Some(invited_by),
        }
    }
}

impl Entity for Membership {
    type Id = MemberId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Membership rows; the single source of truth for who holds which role.
pub trait MembershipStore: Send + Sync {
    fn find_by_id(&self, id: MemberId) -> DomainResult<Option<Membership>>;
    fn find_by_user_and_ledger(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
    ) -> DomainResult<Option<Membership>>;
    /// Members of a ledger, oldest first.
    fn find_by_ledger(&self, ledger_id: LedgerId) -> DomainResult<Vec<Membership>>;
    fn find_ledger_ids_by_user(&self, user_id: UserId) -> DomainResult<Vec<LedgerId>>;
    fn count_by_ledger(&self, ledger_id: LedgerId) -> DomainResult<usize>;
    fn exists_by_user_and_ledger(&self, user_id: UserId, ledger_id: LedgerId) -> DomainResult<bool>;
    /// Insert or replace by id. A second row for the same (user, ledger) is
    /// rejected.
    fn save(&self, membership: Membership) -> DomainResult<()>;
    /// Set the role of an existing row in one step. `None` when the row is
    /// gone, so a concurrent removal is never undone.
    fn update_role(&self, id: MemberId, role: MemberRole) -> DomainResult<Option<Membership>>;
    /// Returns `false` when the id is unknown.
    fn delete(&self, id: MemberId) -> DomainResult<bool>;
}

impl<S> MembershipStore for Arc<S>
where
    S: MembershipStore + ?Sized,
{
    fn find_by_id(&self, id: MemberId) -> DomainResult<Option<Membership>> {
        (**self).find_by_id(id)
    }

    fn find_by_user_and_ledger(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
    ) -> DomainResult<Option<Membership>> {
        (**self).find_by_user_and_ledger(user_id, ledger_id)
    }

    fn find_by_ledger(&self, ledger_id: LedgerId) -> DomainResult<Vec<Membership>> {
        (**self).find_by_ledger(ledger_id)
    }

    fn find_ledger_ids_by_user(&self, user_id: UserId) -> DomainResult<Vec<LedgerId>> {
        (**self).find_ledger_ids_by_user(user_id)
    }

    fn count_by_ledger(&self, ledger_id: LedgerId) -> DomainResult<usize> {
        (**self).count_by_ledger(ledger_id)
    }

    fn exists_by_user_and_ledger(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
    ) -> DomainResult<bool> {
        (**self).exists_by_user_and_ledger(user_id, ledger_id)
    }

    fn save(&self, membership: Membership) -> DomainResult<()> {
        (**self).save(membership)
    }

    fn update_role(&self, id: MemberId, role: MemberRole) -> DomainResult<Option<Membership>> {
        (**self).update_role(id, role)
    }

    fn delete(&self, id: MemberId) -> DomainResult<bool> {
        (**self).delete(id)
    }
}

/// Resolves (user, ledger) to a membership and runs the authorization
/// decision on top of it.
#[derive(Debug, Clone)]
pub struct MembershipResolver<M> {
    store: M,
}

impl<M: MembershipStore> MembershipResolver<M> {
    pub fn new(store: M) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &M {
        &self.store
    }

    pub fn resolve(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
    ) -> DomainResult<Option<Membership>> {
        self.store.find_by_user_and_ledger(user_id, ledger_id)
    }

    /// Like [`MembershipResolver::resolve`] but absence is `Forbidden`.
    pub fn require(&self, user_id: UserId, ledger_id: LedgerId) -> DomainResult<Membership> {
        self.resolve(user_id, ledger_id)?
            .ok_or_else(DomainError::not_a_member)
    }

    /// Resolve the caller's membership and check `action` against its role.
    pub fn authorize(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
        action: &LedgerAction,
    ) -> DomainResult<Membership> {
        let membership = self.require(user_id, ledger_id)?;
        if let Err(e) = authorize(membership.role, action) {
            tracing::debug!(
                user_id = %user_id,
                ledger_id = %ledger_id,
                role = %membership.role,
                action = %action,
                "authorization denied"
            );
            return Err(e.into());
        }
        Ok(membership)
    }
}
