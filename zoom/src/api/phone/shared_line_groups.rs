//! Shared line group API

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::{segment, AddMembersRequest, AssignPhoneNumbersRequest, AssignedPhoneNumber};
use crate::api::{ApiError, Client};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Site {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SharedLineGroupMember {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub extension_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SharedLineGroupMembers {
    #[serde(default)]
    pub common_areas: Vec<SharedLineGroupMember>,
    #[serde(default)]
    pub users: Vec<SharedLineGroupMember>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SharedLineGroup {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub extension_id: Option<String>,
    #[serde(default)]
    pub extension_number: Option<i64>,
    #[serde(default)]
    pub primary_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub site: Option<Site>,
    #[serde(default)]
    pub phone_numbers: Vec<AssignedPhoneNumber>,
    #[serde(default)]
    pub members: Option<SharedLineGroupMembers>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSharedLineGroupRequest {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedSharedLineGroup {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Fields Zoom only accepts on update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateSharedLineGroupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_number: Option<String>,
}

pub struct SharedLineGroupsApi<'a> {
    client: &'a Client,
}

impl<'a> SharedLineGroupsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn path(group_id: &str) -> String {
        format!("/phone/shared_line_groups/{}", segment(group_id))
    }

    pub async fn get(&self, group_id: &str) -> Result<SharedLineGroup, ApiError> {
        self.client.get(&Self::path(group_id)).await
    }

    pub async fn create(
        &self,
        request: &CreateSharedLineGroupRequest,
    ) -> Result<CreatedSharedLineGroup, ApiError> {
        self.client.post("/phone/shared_line_groups", request).await
    }

    pub async fn update(
        &self,
        group_id: &str,
        request: &UpdateSharedLineGroupRequest,
    ) -> Result<(), ApiError> {
        self.client
            .patch::<IgnoredAny, _>(&Self::path(group_id), request)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, group_id: &str) -> Result<(), ApiError> {
        self.client.delete::<IgnoredAny>(&Self::path(group_id)).await?;
        Ok(())
    }

    pub async fn add_members(
        &self,
        group_id: &str,
        request: &AddMembersRequest,
    ) -> Result<(), ApiError> {
        let path = format!("{}/members", Self::path(group_id));
        self.client.post::<IgnoredAny, _>(&path, request).await?;
        Ok(())
    }

    pub async fn remove_member(&self, group_id: &str, member_id: &str) -> Result<(), ApiError> {
        let path = format!("{}/members/{}", Self::path(group_id), segment(member_id));
        self.client.delete::<IgnoredAny>(&path).await?;
        Ok(())
    }

    pub async fn remove_all_members(&self, group_id: &str) -> Result<(), ApiError> {
        let path = format!("{}/members", Self::path(group_id));
        self.client.delete::<IgnoredAny>(&path).await?;
        Ok(())
    }

    pub async fn assign_phone_numbers(
        &self,
        group_id: &str,
        request: &AssignPhoneNumbersRequest,
    ) -> Result<(), ApiError> {
        let path = format!("{}/phone_numbers", Self::path(group_id));
        self.client.post::<IgnoredAny, _>(&path, request).await?;
        Ok(())
    }

    pub async fn unassign_phone_number(
        &self,
        group_id: &str,
        phone_number_id: &str,
    ) -> Result<(), ApiError> {
        let path = format!(
            "{}/phone_numbers/{}",
            Self::path(group_id),
            segment(phone_number_id)
        );
        self.client.delete::<IgnoredAny>(&path).await?;
        Ok(())
    }

    pub async fn unassign_all_phone_numbers(&self, group_id: &str) -> Result<(), ApiError> {
        let path = format!("{}/phone_numbers", Self::path(group_id));
        self.client.delete::<IgnoredAny>(&path).await?;
        Ok(())
    }
}
