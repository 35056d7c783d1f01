//! `sharebook-ledger`: business services for ledgers, members, categories,
//! expenses and user profiles.
//!
//! Every ledger-scoped operation enters through [`access::LedgerGuard`], which
//! resolves the caller's membership once and runs the authorization decision.
//! Stores are traits; implementations live in the infrastructure crate.

pub mod access;
pub mod category;
pub mod expense;
pub mod ledger;
pub mod member;
pub mod page;
pub mod user;

pub use access::LedgerGuard;
pub use category::{
    Category, CategoryService, CategoryStore, CreateCategory, DEFAULT_CATEGORIES,
    seed_default_categories,
};
pub use expense::{
    CategorySummary, CreateExpense, CreatorSummary, Expense, ExpenseFilter, ExpenseService,
    ExpenseStore, ExpenseView, UpdateExpense,
};
pub use ledger::{CreateLedger, Ledger, LedgerService, LedgerStore, LedgerView, UpdateLedger};
pub use member::{MemberService, MemberView};
pub use page::{Page, PageRequest};
pub use user::{UpdateProfile, UserProfile, UserService};
