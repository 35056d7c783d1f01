use sharebook_auth::{MemberRole, Membership, MembershipStore};
use sharebook_core::{DomainError, DomainResult, LedgerId, MemberId, UserId};

use super::Table;

#[derive(Debug)]
pub struct InMemoryMembershipStore {
    members: Table<MemberId, Membership>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self {
            members: Table::new("membership"),
        }
    }
}

impl Default for InMemoryMembershipStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MembershipStore for InMemoryMembershipStore {
    fn find_by_id(&self, id: MemberId) -> DomainResult<Option<Membership>> {
        Ok(self.members.read()?.get(&id).cloned())
    }

    fn find_by_user_and_ledger(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
    ) -> DomainResult<Option<Membership>> {
        Ok(self
            .members
            .read()?
            .values()
            .find(|m| m.user_id == user_id && m.ledger_id == ledger_id)
            .cloned())
    }

    fn find_by_ledger(&self, ledger_id: LedgerId) -> DomainResult<Vec<Membership>> {
        let mut rows: Vec<Membership> = self
            .members
            .read()?
            .values()
            .filter(|m| m.ledger_id == ledger_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.joined_at.cmp(&b.joined_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    fn find_ledger_ids_by_user(&self, user_id: UserId) -> DomainResult<Vec<LedgerId>> {
        Ok(self
            .members
            .read()?
            .values()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.ledger_id)
            .collect())
    }

    fn count_by_ledger(&self, ledger_id: LedgerId) -> DomainResult<usize> {
        Ok(self
            .members
            .read()?
            .values()
            .filter(|m| m.ledger_id == ledger_id)
            .count())
    }

    fn exists_by_user_and_ledger(
        &self,
        user_id: UserId,
        ledger_id: LedgerId,
    ) -> DomainResult<bool> {
        Ok(self.find_by_user_and_ledger(user_id, ledger_id)?.is_some())
    }

    fn save(&self, membership: Membership) -> DomainResult<()> {
        let mut members = self.members.write()?;
        let duplicate = members.values().any(|m| {
            m.id != membership.id
                && m.user_id == membership.user_id
                && m.ledger_id == membership.ledger_id
        });
        if duplicate {
            return Err(DomainError::bad_request("User is already a member of this ledger"));
        }
        members.insert(membership.id, membership);
        Ok(())
    }

    fn update_role(&self, id: MemberId, role: MemberRole) -> DomainResult<Option<Membership>> {
        let mut members = self.members.write()?;
        Ok(members.get_mut(&id).map(|m| {
            m.role = role;
            m.clone()
        }))
    }

    fn delete(&self, id: MemberId) -> DomainResult<bool> {
        Ok(self.members.write()?.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn second_row_for_same_user_and_ledger_is_rejected() {
        let store = InMemoryMembershipStore::new();
        let (ledger, user) = (LedgerId::new(), UserId::new());
        store.save(Membership::owner(ledger, user, Utc::now())).unwrap();

        let again =
            Membership::invited(ledger, user, MemberRole::Member, UserId::new(), Utc::now());
        let err = store.save(again).unwrap_err();
        assert_eq!(err.message(), "User is already a member of this ledger");
        assert_eq!(store.count_by_ledger(ledger).unwrap(), 1);
    }

    #[test]
    fn saving_an_existing_row_updates_it() {
        let store = InMemoryMembershipStore::new();
        let ledger = LedgerId::new();
        let mut m = Membership::invited(
            ledger,
            UserId::new(),
            MemberRole::Viewer,
            UserId::new(),
            Utc::now(),
        );
        store.save(m.clone()).unwrap();

        m.role = MemberRole::Admin;
        store.save(m.clone()).unwrap();
        assert_eq!(store.find_by_id(m.id).unwrap().unwrap().role, MemberRole::Admin);
    }

    #[test]
    fn members_are_listed_oldest_first() {
        let store = InMemoryMembershipStore::new();
        let ledger = LedgerId::new();
        let now = Utc::now();
        let owner = Membership::owner(ledger, UserId::new(), now - Duration::minutes(5));
        let late =
            Membership::invited(ledger, UserId::new(), MemberRole::Member, owner.user_id, now);
        store.save(late.clone()).unwrap();
        store.save(owner.clone()).unwrap();
        store.save(Membership::owner(LedgerId::new(), UserId::new(), now)).unwrap();

        let ids: Vec<_> = store.find_by_ledger(ledger).unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![owner.id, late.id]);
    }

    #[test]
    fn delete_reports_whether_a_row_existed() {
        let store = InMemoryMembershipStore::new();
        let m = Membership::owner(LedgerId::new(), UserId::new(), Utc::now());
        store.save(m.clone()).unwrap();
        assert!(store.delete(m.id).unwrap());
        assert!(!store.delete(m.id).unwrap());
        assert!(!store.exists_by_user_and_ledger(m.user_id, m.ledger_id).unwrap());
    }

    #[test]
    fn role_update_never_resurrects_a_removed_row() {
        let store = InMemoryMembershipStore::new();
        let ledger = LedgerId::new();
        let m = Membership::invited(
            ledger,
            UserId::new(),
            MemberRole::Viewer,
            UserId::new(),
            Utc::now(),
        );
        store.save(m.clone()).unwrap();

        let updated = store.update_role(m.id, MemberRole::Admin).unwrap().unwrap();
        assert_eq!(updated.role, MemberRole::Admin);
        assert_eq!(updated.joined_at, m.joined_at);

        store.delete(m.id).unwrap();
        assert!(store.update_role(m.id, MemberRole::Member).unwrap().is_none());
        assert!(store.find_by_id(m.id).unwrap().is_none());
        assert_eq!(store.count_by_ledger(ledger).unwrap(), 0);
    }
}
