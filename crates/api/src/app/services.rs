//! Service wiring: in-memory stores behind the generic business services.

use std::sync::Arc;

use sharebook_auth::{Argon2PasswordVerifier, AuthConfig, AuthService, TokenLifecycleManager};
use sharebook_core::DomainResult;
use sharebook_infra::{
    InMemoryCategoryStore, InMemoryExpenseStore, InMemoryLedgerStore, InMemoryMembershipStore,
    InMemoryPrincipalStore, InMemoryRefreshTokenStore,
};
use sharebook_ledger::{
    CategoryService, ExpenseService, LedgerGuard, LedgerService, MemberService, UserService,
    seed_default_categories,
};

pub type Principals = Arc<InMemoryPrincipalStore>;
pub type RefreshTokens = Arc<InMemoryRefreshTokenStore>;
pub type Ledgers = Arc<InMemoryLedgerStore>;
pub type Memberships = Arc<InMemoryMembershipStore>;
pub type Categories = Arc<InMemoryCategoryStore>;
pub type Expenses = Arc<InMemoryExpenseStore>;
pub type Passwords = Argon2PasswordVerifier;

pub type Lifecycle = TokenLifecycleManager<RefreshTokens, Principals>;

pub struct AppServices {
    pub lifecycle: Arc<Lifecycle>,
    pub refresh_tokens: RefreshTokens,
    pub auth: AuthService<Principals, RefreshTokens, Passwords>,
    pub users: UserService<Principals, RefreshTokens, Passwords>,
    pub ledgers: LedgerService<Ledgers, Memberships>,
    pub members: MemberService<Ledgers, Memberships, Principals>,
    pub categories: CategoryService<Ledgers, Memberships, Categories, Expenses>,
    pub expenses: ExpenseService<Ledgers, Memberships, Categories, Expenses, Principals>,
}

/// Build every service over fresh stores and seed the default categories.
pub fn build_services(config: &AuthConfig) -> DomainResult<AppServices> {
    let principals: Principals = Arc::new(InMemoryPrincipalStore::new());
    let refresh_tokens: RefreshTokens = Arc::new(InMemoryRefreshTokenStore::new());
    let ledgers: Ledgers = Arc::new(InMemoryLedgerStore::new());
    let memberships: Memberships = Arc::new(InMemoryMembershipStore::new());
    let categories: Categories = Arc::new(InMemoryCategoryStore::new());
    let expenses: Expenses = Arc::new(InMemoryExpenseStore::new());

    seed_default_categories(&categories)?;

    let lifecycle = Arc::new(TokenLifecycleManager::new(
        config,
        refresh_tokens.clone(),
        principals.clone(),
    ));
    let guard = LedgerGuard::new(ledgers, memberships);
    let passwords = Argon2PasswordVerifier;

    Ok(AppServices {
        auth: AuthService::new(
            principals.clone(),
            lifecycle.clone(),
            passwords,
            config.min_password_length,
        ),
        users: UserService::new(
            principals.clone(),
            lifecycle.clone(),
            passwords,
            config.min_password_length,
        ),
        ledgers: LedgerService::new(guard.clone()),
        members: MemberService::new(guard.clone(), principals.clone()),
        categories: CategoryService::new(guard.clone(), categories.clone(), expenses.clone()),
        expenses: ExpenseService::new(guard, categories, expenses, principals),
        lifecycle,
        refresh_tokens,
    })
}
