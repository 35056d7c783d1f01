use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;

use sharebook_auth::{MemberRole, SignupInput};
use sharebook_core::{CategoryId, DomainError, DomainResult, FieldError};
use sharebook_ledger::{
    CreateCategory, CreateExpense, CreateLedger, ExpenseFilter, PageRequest, UpdateExpense,
    UpdateLedger, UpdateProfile,
};

// -------------------------
// Auth / users
// -------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl From<SignupRequest> for SignupInput {
    fn from(r: SignupRequest) -> Self {
        Self {
            email: r.email,
            password: r.password,
            name: r.name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub profile_image: Option<String>,
}

impl From<UpdateUserRequest> for UpdateProfile {
    fn from(r: UpdateUserRequest) -> Self {
        Self {
            name: r.name,
            profile_image: r.profile_image,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// -------------------------
// Ledgers / members
// -------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateLedgerRequest {
    pub name: String,
    pub description: Option<String>,
    pub currency: Option<String>,
}

impl From<CreateLedgerRequest> for CreateLedger {
    fn from(r: CreateLedgerRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            currency: r.currency,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateLedgerRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub currency: Option<String>,
}

impl From<UpdateLedgerRequest> for UpdateLedger {
    fn from(r: UpdateLedgerRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            currency: r.currency,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InviteMemberRequest {
    pub email: String,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateMemberRoleRequest {
    pub role: Option<String>,
}

/// Role names are case-insensitive; a missing role is a field error.
pub fn parse_role(raw: Option<&str>) -> DomainResult<MemberRole> {
    match raw {
        None => Err(DomainError::validation(vec![FieldError::new(
            "role",
            "Role is required",
        )])),
        Some(r) => MemberRole::from_str(r),
    }
}

// -------------------------
// Categories / expenses
// -------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl From<CreateCategoryRequest> for CreateCategory {
    fn from(r: CreateCategoryRequest) -> Self {
        Self {
            name: r.name,
            color: r.color,
            icon: r.icon,
        }
    }
}

/// Amounts arrive as JSON numbers or strings; both are validated as text.
fn amount_text(v: serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

fn parse_category_id(raw: Option<String>) -> DomainResult<Option<CategoryId>> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| CategoryId::from_str(s.trim()))
        .transpose()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateExpenseRequest {
    pub amount: Option<serde_json::Value>,
    pub description: Option<String>,
    pub expense_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub category_id: Option<String>,
}

impl CreateExpenseRequest {
    pub fn into_input(self) -> DomainResult<CreateExpense> {
        Ok(CreateExpense {
            amount: self.amount.map(amount_text),
            description: self.description,
            expense_date: self.expense_date,
            payment_method: self.payment_method,
            category_id: parse_category_id(self.category_id)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateExpenseRequest {
    pub amount: Option<serde_json::Value>,
    pub description: Option<String>,
    pub expense_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub category_id: Option<String>,
}

impl UpdateExpenseRequest {
    pub fn into_input(self) -> DomainResult<UpdateExpense> {
        Ok(UpdateExpense {
            amount: self.amount.map(amount_text),
            description: self.description,
            expense_date: self.expense_date,
            payment_method: self.payment_method,
            category_id: parse_category_id(self.category_id)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExpenseQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category_id: Option<String>,
    pub page: Option<usize>,
    pub size: Option<usize>,
}

impl ExpenseQuery {
    pub fn into_parts(self) -> DomainResult<(ExpenseFilter, PageRequest)> {
        let filter = ExpenseFilter {
            start_date: self.start_date,
            end_date: self.end_date,
            category_id: parse_category_id(self.category_id)?,
        };
        Ok((filter, PageRequest::new(self.page, self.size)))
    }
}

#[cfg(test)]
mod tests {
    use sharebook_core::ErrorKind;

    use super::*;

    #[test]
    fn numeric_and_textual_amounts_both_become_text() {
        let body: CreateExpenseRequest =
            serde_json::from_str(r#"{"amount": 12.5, "description": "x"}"#).unwrap();
        assert_eq!(body.into_input().unwrap().amount.as_deref(), Some("12.5"));

        let body: CreateExpenseRequest = serde_json::from_str(r#"{"amount": "7.25"}"#).unwrap();
        assert_eq!(body.into_input().unwrap().amount.as_deref(), Some("7.25"));
    }

    #[test]
    fn bad_category_id_is_a_bad_request() {
        let body: CreateExpenseRequest =
            serde_json::from_str(r#"{"category_id": "not-a-uuid"}"#).unwrap();
        assert_eq!(body.into_input().unwrap_err().kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn missing_role_is_a_field_error() {
        let err = parse_role(None).unwrap_err();
        assert_eq!(err.field_errors()[0].field, "role");
        assert_eq!(parse_role(Some("admin")).unwrap(), MemberRole::Admin);
        assert!(parse_role(Some("king")).is_err());
    }

    #[test]
    fn query_defaults_to_first_page() {
        let (filter, page) = ExpenseQuery::default().into_parts().unwrap();
        assert_eq!(filter, ExpenseFilter::default());
        assert_eq!(page, PageRequest::default());
    }
}
