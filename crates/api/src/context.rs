use sharebook_core::UserId;

/// Authenticated caller, inserted by the auth middleware.
///
/// Ledger roles are never carried here; they are resolved per request from
/// the membership store.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    user_id: UserId,
}

impl PrincipalContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
