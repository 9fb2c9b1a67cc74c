//! Phone user API: listing, profile, calling plans and phone numbers

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::{segment, AssignPhoneNumbersRequest, AssignedPhoneNumber};
use crate::api::common::{paginate, ApiQueryParams, Page, PageRequest};
use crate::api::{ApiError, Client};

/// Page size used when walking the phone user listing
pub const USERS_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhoneUserSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub extension_id: Option<String>,
    #[serde(default)]
    pub extension_number: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PhoneUsersPage {
    #[serde(default)]
    pub users: Vec<PhoneUserSummary>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub total_records: Option<u64>,
}

impl Page for PhoneUsersPage {
    type Item = PhoneUserSummary;

    fn into_parts(self) -> (Vec<PhoneUserSummary>, Option<String>) {
        (self.users, self.next_page_token)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallingPlan {
    #[serde(default, rename = "type")]
    pub plan_type: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub billing_account_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhoneUserProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub extension_id: Option<String>,
    #[serde(default)]
    pub calling_plans: Vec<CallingPlan>,
    #[serde(default)]
    pub phone_numbers: Vec<AssignedPhoneNumber>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallingPlanRef {
    #[serde(rename = "type")]
    pub plan_type: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_account_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssignCallingPlansRequest {
    pub calling_plans: Vec<CallingPlanRef>,
}

pub struct UsersApi<'a> {
    client: &'a Client,
}

impl<'a> UsersApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn path(user_id: &str) -> String {
        format!("/phone/users/{}", segment(user_id))
    }

    pub async fn list(&self, page: &PageRequest) -> Result<PhoneUsersPage, ApiError> {
        self.client
            .get_with_params("/phone/users", &page.to_query_params())
            .await
    }

    /// Every phone user in the account, across all pages
    pub async fn list_all(&self) -> Result<Vec<PhoneUserSummary>, ApiError> {
        paginate(USERS_PAGE_SIZE, |page| async move { self.list(&page).await }).await
    }

    pub async fn get(&self, user_id: &str) -> Result<PhoneUserProfile, ApiError> {
        self.client.get(&Self::path(user_id)).await
    }

    pub async fn assign_calling_plans(
        &self,
        user_id: &str,
        request: &AssignCallingPlansRequest,
    ) -> Result<(), ApiError> {
        let path = format!("{}/calling_plans", Self::path(user_id));
        self.client.post::<IgnoredAny, _>(&path, request).await?;
        Ok(())
    }

    pub async fn unassign_calling_plan(
        &self,
        user_id: &str,
        plan_type: i64,
        billing_account_id: Option<&str>,
    ) -> Result<(), ApiError> {
        let path = format!("{}/calling_plans/{}", Self::path(user_id), plan_type);
        let params = ApiQueryParams::new().add_optional("billing_account_id", billing_account_id);
        self.client
            .delete_with_params::<IgnoredAny>(&path, &params)
            .await?;
        Ok(())
    }

    pub async fn assign_phone_numbers(
        &self,
        user_id: &str,
        request: &AssignPhoneNumbersRequest,
    ) -> Result<(), ApiError> {
        let path = format!("{}/phone_numbers", Self::path(user_id));
        self.client.post::<IgnoredAny, _>(&path, request).await?;
        Ok(())
    }

    pub async fn unassign_phone_number(
        &self,
        user_id: &str,
        phone_number_id: &str,
    ) -> Result<(), ApiError> {
        let path = format!(
            "{}/phone_numbers/{}",
            Self::path(user_id),
            segment(phone_number_id)
        );
        self.client.delete::<IgnoredAny>(&path).await?;
        Ok(())
    }
}
