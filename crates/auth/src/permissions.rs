use crate::MemberRole;

/// An action a member wants to perform inside one ledger.
///
/// Actions carry the facts the decision depends on (ownership of an expense,
/// the role of a member being targeted), so the decision itself never needs
/// to look anything up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerAction {
    /// Read the ledger, its members, categories or expenses.
    Read,
    /// Change ledger name/description/currency.
    ModifyLedger,
    DeleteLedger,
    /// Create or delete a custom category.
    ManageCategories,
    CreateExpense,
    /// Edit or delete an expense. `own` is true when the actor created it.
    ModifyExpense { own: bool },
    InviteMember { role: MemberRole },
    RemoveMember { target_role: MemberRole, is_self: bool },
    ChangeRole { target_role: MemberRole, new_role: MemberRole },
}

impl LedgerAction {
    /// Short stable name, used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerAction::Read => "ledger.read",
            LedgerAction::ModifyLedger => "ledger.modify",
            LedgerAction::DeleteLedger => "ledger.delete",
            LedgerAction::ManageCategories => "category.manage",
            LedgerAction::CreateExpense => "expense.create",
            LedgerAction::ModifyExpense { .. } => "expense.modify",
            LedgerAction::InviteMember { .. } => "member.invite",
            LedgerAction::RemoveMember { .. } => "member.remove",
            LedgerAction::ChangeRole { .. } => "member.change_role",
        }
    }
}

impl core::fmt::Display for LedgerAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
