use thiserror::Error;

use sharebook_core::DomainError;

use crate::{LedgerAction, MemberRole};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// The role does not allow the action.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The action would break a ledger invariant (e.g. touch the OWNER).
    #[error("invalid: {0}")]
    Invalid(String),
}

impl From<AuthzError> for DomainError {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::Forbidden(msg) => DomainError::Forbidden(msg),
            AuthzError::Invalid(msg) => DomainError::bad_request(msg),
        }
    }
}

fn forbidden(msg: &str) -> Result<(), AuthzError> {
    Err(AuthzError::Forbidden(msg.to_string()))
}

fn invalid(msg: &str) -> Result<(), AuthzError> {
    Err(AuthzError::Invalid(msg.to_string()))
}

/// Decide whether a member holding `role` may perform `action`.
///
/// - No IO
/// - No panics
/// - Deterministic: the same inputs always give the same answer
///
/// When several rules reject the same request the order of the checks below
/// decides which error is reported.
pub fn authorize(role: MemberRole, action: &LedgerAction) -> Result<(), AuthzError> {
    match *action {
        LedgerAction::Read => Ok(()),

        LedgerAction::ModifyLedger => {
            if role.can_manage() {
                Ok(())
            } else {
                forbidden("Only OWNER and ADMIN can update ledger")
            }
        }

        LedgerAction::DeleteLedger => {
            if role == MemberRole::Owner {
                Ok(())
            } else {
                forbidden("Only OWNER can delete ledger")
            }
        }

        LedgerAction::ManageCategories => {
            if role.can_manage() {
                Ok(())
            } else {
                forbidden("Only OWNER and ADMIN can manage categories")
            }
        }

        LedgerAction::CreateExpense => {
            if role.can_write_expenses() {
                Ok(())
            } else {
                forbidden("VIEWER cannot create expenses")
            }
        }

        LedgerAction::ModifyExpense { own } => {
            // A VIEWER never writes, even on rows it somehow created.
            if role.can_manage() || (own && role.can_write_expenses()) {
                Ok(())
            } else {
                forbidden("You can only modify your own expenses or be an ADMIN+")
            }
        }

        LedgerAction::InviteMember { role: requested } => {
            if !role.can_manage() {
                return forbidden("Only OWNER and ADMIN can add members");
            }
            if requested == MemberRole::Owner {
                return invalid("Cannot add member as OWNER");
            }
            Ok(())
        }

        LedgerAction::RemoveMember {
            target_role,
            is_self,
        } => {
            if target_role == MemberRole::Owner {
                return invalid("Cannot remove OWNER from ledger");
            }
            if is_self || role.can_manage() {
                Ok(())
            } else {
                forbidden("Only OWNER and ADMIN can remove members")
            }
        }

        LedgerAction::ChangeRole {
            target_role,
            new_role,
        } => {
            if role != MemberRole::Owner {
                return forbidden("Only OWNER can change member roles");
            }
            if target_role == MemberRole::Owner {
                return invalid("Cannot change OWNER's role");
            }
            if new_role == MemberRole::Owner {
                return invalid("Cannot assign OWNER role");
            }
            Ok(())
        }
    }
}
