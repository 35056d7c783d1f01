//! Entry check shared by every ledger-scoped operation.

use sharebook_auth::{LedgerAction, Membership, MembershipResolver, MembershipStore};
use sharebook_core::{DomainResult, LedgerId, UserId};

use crate::ledger::{Ledger, LedgerStore, require_ledger};

/// Resolves the ledger and the caller's membership, then authorizes the
/// action. Services call [`LedgerGuard::enter`] once per operation.
///
/// Order: ledger missing or deleted (`NotFound`), caller not a member
/// (`Forbidden`), role insufficient (`Forbidden` or `BadRequest`).
#[derive(Debug, Clone)]
pub struct LedgerGuard<L, M> {
    ledgers: L,
    resolver: MembershipResolver<M>,
}

impl<L, M> LedgerGuard<L, M>
where
    L: LedgerStore,
    M: MembershipStore,
{
    pub fn new(ledgers: L, memberships: M) -> Self {
        Self {
            ledgers,
            resolver: MembershipResolver::new(memberships),
        }
    }

    pub fn ledgers(&self) -> &L {
        &self.ledgers
    }

    pub fn memberships(&self) -> &M {
        self.resolver.store()
    }

    pub fn enter(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
        action: &LedgerAction,
    ) -> DomainResult<(Ledger, Membership)> {
        let ledger = require_ledger(&self.ledgers, ledger_id)?;
        let membership = self.resolver.authorize(user_id, ledger_id, action)?;
        Ok((ledger, membership))
    }

    /// Like [`LedgerGuard::enter`] with a read action, for checks whose final
    /// decision needs facts only known after loading a target row.
    pub fn enter_as_member(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
    ) -> DomainResult<(Ledger, Membership)> {
        self.enter(user_id, ledger_id, &LedgerAction::Read)
    }
}
