use sharebook_auth::{PrincipalStore, User};
use sharebook_core::{DomainError, DomainResult, SoftDelete, UserId};

use super::Table;

#[derive(Debug)]
pub struct InMemoryPrincipalStore {
    users: Table<UserId, User>,
}

impl InMemoryPrincipalStore {
    pub fn new() -> Self {
        Self {
            users: Table::new("principal"),
        }
    }
}

impl Default for InMemoryPrincipalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PrincipalStore for InMemoryPrincipalStore {
    fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let users = self.users.read()?;
        Ok(users
            .values()
            .find(|u| u.is_active() && u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        let users = self.users.read()?;
        Ok(users.get(&id).filter(|u| u.is_active()).cloned())
    }

    fn exists_by_email(&self, email: &str) -> DomainResult<bool> {
        Ok(self.find_by_email(email)?.is_some())
    }

    fn find_many(&self, ids: &[UserId]) -> DomainResult<Vec<User>> {
        let users = self.users.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id))
            .filter(|u| u.is_active())
            .cloned()
            .collect())
    }

    fn save(&self, user: User) -> DomainResult<()> {
        let mut users = self.users.write()?;
        // Unique e-mail among active users, checked under the same guard as the write.
        let taken = user.is_active()
            && users.values().any(|other| {
                other.id != user.id
                    && other.is_active()
                    && other.email.eq_ignore_ascii_case(&user.email)
            });
        if taken {
            return Err(DomainError::bad_request(format!(
                "Email already registered: {}",
                user.email
            )));
        }
        users.insert(user.id, user);
        Ok(())
    }

    fn update_active(
        &self,
        id: UserId,
        change: &mut dyn FnMut(&mut User),
    ) -> DomainResult<Option<User>> {
        let mut users = self.users.write()?;
        Ok(users.get_mut(&id).filter(|u| u.is_active()).map(|u| {
            change(u);
            u.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sharebook_core::EmailAddress;

    use super::*;

    fn user(email: &str) -> User {
        User::new(
            EmailAddress::parse(email).unwrap(),
            "hash".into(),
            "Name".into(),
            Utc::now(),
        )
    }

    #[test]
    fn deleted_users_are_invisible() {
        let store = InMemoryPrincipalStore::new();
        let mut u = user("a@x.com");
        store.save(u.clone()).unwrap();
        assert!(store.find_by_email("a@x.com").unwrap().is_some());

        u.mark_deleted(Utc::now());
        store.save(u.clone()).unwrap();
        assert!(store.find_by_email("a@x.com").unwrap().is_none());
        assert!(store.find_by_id(u.id).unwrap().is_none());
        assert!(store.find_many(&[u.id]).unwrap().is_empty());
        assert!(!store.exists_by_email("a@x.com").unwrap());
    }

    #[test]
    fn update_applies_only_to_active_users() {
        let store = InMemoryPrincipalStore::new();
        let u = user("a@x.com");
        store.save(u.clone()).unwrap();

        let renamed = store
            .update_active(u.id, &mut |row| row.name = "Renamed".into())
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "Renamed");

        let now = Utc::now();
        store.update_active(u.id, &mut |row| row.mark_deleted(now)).unwrap();
        let mut touched = false;
        let again = store
            .update_active(u.id, &mut |row| {
                touched = true;
                row.name = "Back".into();
            })
            .unwrap();
        assert!(again.is_none());
        assert!(!touched);
        assert!(store.find_by_id(u.id).unwrap().is_none());
    }

    #[test]
    fn email_can_be_reused_after_deletion() {
        let store = InMemoryPrincipalStore::new();
        let mut first = user("a@x.com");
        store.save(first.clone()).unwrap();
        assert!(store.save(user("a@x.com")).is_err());

        first.mark_deleted(Utc::now());
        store.save(first).unwrap();
        assert!(store.save(user("a@x.com")).is_ok());
    }
}
