use sharebook_core::{CategoryId, DomainError, DomainResult, LedgerId};
use sharebook_ledger::{Category, CategoryStore};

use super::Table;

#[derive(Debug)]
pub struct InMemoryCategoryStore {
    categories: Table<CategoryId, Category>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self {
            categories: Table::new("category"),
        }
    }
}

impl Default for InMemoryCategoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryStore for InMemoryCategoryStore {
    fn find_visible(&self, ledger_id: LedgerId) -> DomainResult<Vec<Category>> {
        let mut rows: Vec<Category> = self
            .categories
            .read()?
            .values()
            .filter(|c| c.is_visible_in(ledger_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.is_default.cmp(&a.is_default).then_with(|| a.name.cmp(&b.name)));
        Ok(rows)
    }

    fn find_by_id(&self, id: CategoryId) -> DomainResult<Option<Category>> {
        Ok(self.categories.read()?.get(&id).cloned())
    }

    fn find_by_id_for_ledger(
        &self,
        id: CategoryId,
        ledger_id: LedgerId,
    ) -> DomainResult<Option<Category>> {
        Ok(self
            .categories
            .read()?
            .get(&id)
            .filter(|c| c.is_visible_in(ledger_id))
            .cloned())
    }

    fn find_defaults(&self) -> DomainResult<Vec<Category>> {
        let mut rows: Vec<Category> = self
            .categories
            .read()?
            .values()
            .filter(|c| c.is_default)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    fn exists_by_ledger_and_name(&self, ledger_id: LedgerId, name: &str) -> DomainResult<bool> {
        Ok(self
            .categories
            .read()?
            .values()
            .any(|c| c.ledger_id == Some(ledger_id) && c.name == name))
    }

    fn save(&self, category: Category) -> DomainResult<()> {
        let mut rows = self.categories.write()?;
        // Name is unique per ledger, checked under the same guard as the write.
        let taken = category.ledger_id.is_some()
            && rows.values().any(|other| {
                other.id != category.id
                    && other.ledger_id == category.ledger_id
                    && other.name == category.name
            });
        if taken {
            return Err(DomainError::bad_request(
                "Category with this name already exists",
            ));
        }
        rows.insert(category.id, category);
        Ok(())
    }

    fn delete(&self, id: CategoryId) -> DomainResult<bool> {
        Ok(self.categories.write()?.remove(&id).is_some())
    }
}
