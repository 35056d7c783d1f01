use sharebook_core::{DomainResult, LedgerId, SoftDelete};
use sharebook_ledger::{Ledger, LedgerStore};

use super::Table;

#[derive(Debug)]
pub struct InMemoryLedgerStore {
    ledgers: Table<LedgerId, Ledger>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            ledgers: Table::new("ledger"),
        }
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn find_active(&self, id: LedgerId) -> DomainResult<Option<Ledger>> {
        Ok(self
            .ledgers
            .read()?
            .get(&id)
            .filter(|l| l.is_active())
            .cloned())
    }

    fn find_active_by_ids(&self, ids: &[LedgerId]) -> DomainResult<Vec<Ledger>> {
        let ledgers = self.ledgers.read()?;
        let mut rows: Vec<Ledger> = ids
            .iter()
            .filter_map(|id| ledgers.get(id))
            .filter(|l| l.is_active())
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    fn save(&self, ledger: Ledger) -> DomainResult<()> {
        self.ledgers.write()?.insert(ledger.id, ledger);
        Ok(())
    }

    fn remove(&self, id: LedgerId) -> DomainResult<()> {
        self.ledgers.write()?.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sharebook_core::UserId;

    use super::*;

    fn ledger(name: &str, age_minutes: i64) -> Ledger {
        let at = Utc::now() - Duration::minutes(age_minutes);
        Ledger {
            id: LedgerId::new(),
            name: name.into(),
            description: None,
            currency: "KRW".into(),
            created_by: UserId::new(),
            created_at: at,
            updated_at: at,
            deleted_at: None,
        }
    }

    #[test]
    fn lists_newest_first_and_skips_deleted() {
        let store = InMemoryLedgerStore::new();
        let old = ledger("old", 10);
        let new = ledger("new", 1);
        let mut gone = ledger("gone", 5);
        gone.mark_deleted(Utc::now());
        for l in [old.clone(), new.clone(), gone.clone()] {
            store.save(l).unwrap();
        }

        let names: Vec<_> = store
            .find_active_by_ids(&[old.id, new.id, gone.id])
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["new", "old"]);
        assert!(store.find_active(gone.id).unwrap().is_none());
    }
}
