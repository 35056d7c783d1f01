use core::str::FromStr;

use serde::{Deserialize, Serialize};

use sharebook_core::DomainError;

/// Role of a member within one ledger.
///
/// Totally ordered: `Owner > Admin > Member > Viewer`. The ordinal is the
/// rank, so a *lower* ordinal means *more* privilege.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
    Viewer,
}

impl MemberRole {
    pub const ALL: [MemberRole; 4] = [
        MemberRole::Owner,
        MemberRole::Admin,
        MemberRole::Member,
        MemberRole::Viewer,
    ];

    pub fn ordinal(self) -> u8 {
        match self {
            MemberRole::Owner => 0,
            MemberRole::Admin => 1,
            MemberRole::Member => 2,
            MemberRole::Viewer => 3,
        }
    }

    /// `true` when `self` is `required` or ranks above it.
    pub fn has_at_least(self, required: MemberRole) -> bool {
        self.ordinal() <= required.ordinal()
    }

    /// OWNER and ADMIN may manage the ledger's settings, categories and members.
    pub fn can_manage(self) -> bool {
        self.has_at_least(MemberRole::Admin)
    }

    pub fn can_write_expenses(self) -> bool {
        self.has_at_least(MemberRole::Member)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MemberRole::Owner => "OWNER",
            MemberRole::Admin => "ADMIN",
            MemberRole::Member => "MEMBER",
            MemberRole::Viewer => "VIEWER",
        }
    }
}

impl core::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OWNER" => Ok(MemberRole::Owner),
            "ADMIN" => Ok(MemberRole::Admin),
            "MEMBER" => Ok(MemberRole::Member),
            "VIEWER" => Ok(MemberRole::Viewer),
            other => Err(DomainError::bad_request(format!("unknown role: {other}"))),
        }
    }
}
