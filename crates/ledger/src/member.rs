//! Ledger membership management: list, invite, change role, remove.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sharebook_auth::{
    LedgerAction, MemberRole, Membership, MembershipStore, PrincipalStore, UserSummary, authorize,
};
use sharebook_core::{DomainError, DomainResult, LedgerId, MemberId, UserId, Validator};

use crate::access::LedgerGuard;
use crate::ledger::LedgerStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberView {
    pub id: MemberId,
    /// `None` when the member's account has since been deleted.
    pub user: Option<UserSummary>,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
    pub invited_by: Option<UserId>,
}

impl MemberView {
    fn new(m: Membership, user: Option<UserSummary>) -> Self {
        Self {
            id: m.id,
            user,
            role: m.role,
            joined_at: m.joined_at,
            invited_by: m.invited_by,
        }
    }
}

pub struct MemberService<L, M, P> {
    guard: LedgerGuard<L, M>,
    principals: P,
}

impl<L, M, P> MemberService<L, M, P>
where
    L: LedgerStore,
    M: MembershipStore,
    P: PrincipalStore,
{
    pub fn new(guard: LedgerGuard<L, M>, principals: P) -> Self {
        Self { guard, principals }
    }

    pub fn list(&self, user_id: UserId, ledger_id: LedgerId) -> DomainResult<Vec<MemberView>> {
        self.guard.enter(user_id, ledger_id, &LedgerAction::Read)?;

        let members = self.guard.memberships().find_by_ledger(ledger_id)?;
        let ids: Vec<UserId> = members.iter().map(|m| m.user_id).collect();
        let users = self.principals.find_many(&ids)?;

        Ok(members
            .into_iter()
            .map(|m| {
                let user = users.iter().find(|u| u.id == m.user_id).map(|u| u.summary());
                MemberView::new(m, user)
            })
            .collect())
    }

    /// Add an existing user to the ledger by e-mail.
    pub fn invite(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
        email: &str,
        role: MemberRole,
    ) -> DomainResult<MemberView> {
        let mut v = Validator::new();
        let email = v.email("email", email);
        v.finish()?;
        let email = email.ok_or_else(|| DomainError::bad_request("Invalid email format"))?;

        self.guard
            .enter(user_id, ledger_id, &LedgerAction::InviteMember { role })?;

        let invitee = self
            .principals
            .find_by_email(email.as_str())?
            .ok_or_else(|| DomainError::not_found(format!("User with email {email} not found")))?;

        let members = self.guard.memberships();
        if members.exists_by_user_and_ledger(invitee.id, ledger_id)? {
            return Err(DomainError::bad_request(
                "User is already a member of this ledger",
            ));
        }

        let membership = Membership::invited(ledger_id, invitee.id, role, user_id, Utc::now());
        members.save(membership.clone())?;

        tracing::info!(
            ledger_id = %ledger_id,
            member_id = %membership.id,
            role = %role,
            invited_by = %user_id,
            "member added"
        );
        Ok(MemberView::new(membership, Some(invitee.summary())))
    }

    pub fn update_role(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
        member_id: MemberId,
        new_role: MemberRole,
    ) -> DomainResult<MemberView> {
        let (_, me) = self.guard.enter_as_member(user_id, ledger_id)?;
        // Non-owners are turned away before the target is even looked up.
        if me.role != MemberRole::Owner {
            return Err(DomainError::forbidden("Only OWNER can change member roles"));
        }

        let target = self.find_in_ledger(ledger_id, member_id)?;
        authorize(
            me.role,
            &LedgerAction::ChangeRole {
                target_role: target.role,
                new_role,
            },
        )?;

        let target = self
            .guard
            .memberships()
            .update_role(target.id, new_role)?
            .ok_or_else(|| DomainError::resource_not_found("Member", member_id))?;
        tracing::info!(
            ledger_id = %ledger_id,
            member_id = %member_id,
            role = %new_role,
            "member role changed",
        );

        let user = self.principals.find_by_id(target.user_id)?.map(|u| u.summary());
        Ok(MemberView::new(target, user))
    }

    /// Remove a member, or leave the ledger when the target is the caller.
    pub fn remove(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
        member_id: MemberId,
    ) -> DomainResult<()> {
        let (_, me) = self.guard.enter_as_member(user_id, ledger_id)?;
        let target = self.find_in_ledger(ledger_id, member_id)?;

        authorize(
            me.role,
            &LedgerAction::RemoveMember {
                target_role: target.role,
                is_self: target.user_id == user_id,
            },
        )?;

        self.guard.memberships().delete(target.id)?;
        tracing::info!(
            ledger_id = %ledger_id,
            member_id = %member_id,
            removed_by = %user_id,
            "member removed",
        );
        Ok(())
    }

    fn find_in_ledger(&self, ledger_id: LedgerId, member_id: MemberId) -> DomainResult<Membership> {
        self.guard
            .memberships()
            .find_by_id(member_id)?
            .filter(|m| m.ledger_id == ledger_id)
            .ok_or_else(|| DomainError::resource_not_found("Member", member_id))
    }
}
