//! Call queue API: members, phone numbers and voicemail policy

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::{segment, AddMembersRequest, AssignPhoneNumbersRequest, AssignedPhoneNumber};
use crate::api::common::{paginate, ApiQueryParams, Page, PageRequest};
use crate::api::{ApiError, Client};

/// Largest page the member listing accepts
pub const MEMBERS_PAGE_SIZE: u32 = 300;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallQueue {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub extension_id: Option<String>,
    #[serde(default)]
    pub phone_numbers: Vec<AssignedPhoneNumber>,
    #[serde(default)]
    pub policy: Option<CallQueuePolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallQueuePolicy {
    #[serde(default)]
    pub voicemail_access_members: Vec<VoicemailAccessMember>,
}

/// Shared voicemail access entry. `shared_id` is assigned by Zoom on add.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoicemailAccessMember {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_download: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_delete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_sharing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VoicemailPolicyRequest {
    pub voicemail_access_members: Vec<VoicemailAccessMember>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallQueueMember {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// `user` or `commonArea`
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub receive_call: Option<bool>,
    #[serde(default)]
    pub extension_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallQueueMembersPage {
    #[serde(default)]
    pub call_queue_members: Vec<CallQueueMember>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub total_records: Option<u64>,
}

impl Page for CallQueueMembersPage {
    type Item = CallQueueMember;

    fn into_parts(self) -> (Vec<CallQueueMember>, Option<String>) {
        (self.call_queue_members, self.next_page_token)
    }
}

pub struct CallQueuesApi<'a> {
    client: &'a Client,
}

impl<'a> CallQueuesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn path(call_queue_id: &str) -> String {
        format!("/phone/call_queues/{}", segment(call_queue_id))
    }

    pub async fn get(&self, call_queue_id: &str) -> Result<CallQueue, ApiError> {
        self.client.get(&Self::path(call_queue_id)).await
    }

    pub async fn list_members(
        &self,
        call_queue_id: &str,
        page: &PageRequest,
    ) -> Result<CallQueueMembersPage, ApiError> {
        let path = format!("{}/members", Self::path(call_queue_id));
        self.client
            .get_with_params(&path, &page.to_query_params())
            .await
    }

    /// Every member of the queue, across all pages
    pub async fn list_all_members(
        &self,
        call_queue_id: &str,
    ) -> Result<Vec<CallQueueMember>, ApiError> {
        paginate(MEMBERS_PAGE_SIZE, |page| async move {
            self.list_members(call_queue_id, &page).await
        })
        .await
    }

    pub async fn add_members(
        &self,
        call_queue_id: &str,
        request: &AddMembersRequest,
    ) -> Result<(), ApiError> {
        let path = format!("{}/members", Self::path(call_queue_id));
        self.client.post::<IgnoredAny, _>(&path, request).await?;
        Ok(())
    }

    pub async fn remove_member(&self, call_queue_id: &str, member_id: &str) -> Result<(), ApiError> {
        let path = format!("{}/members/{}", Self::path(call_queue_id), segment(member_id));
        self.client.delete::<IgnoredAny>(&path).await?;
        Ok(())
    }

    pub async fn remove_all_members(&self, call_queue_id: &str) -> Result<(), ApiError> {
        let path = format!("{}/members", Self::path(call_queue_id));
        self.client.delete::<IgnoredAny>(&path).await?;
        Ok(())
    }

    pub async fn assign_phone_numbers(
        &self,
        call_queue_id: &str,
        request: &AssignPhoneNumbersRequest,
    ) -> Result<(), ApiError> {
        let path = format!("{}/phone_numbers", Self::path(call_queue_id));
        self.client.post::<IgnoredAny, _>(&path, request).await?;
        Ok(())
    }

    pub async fn unassign_phone_number(
        &self,
        call_queue_id: &str,
        phone_number_id: &str,
    ) -> Result<(), ApiError> {
        let path = format!(
            "{}/phone_numbers/{}",
            Self::path(call_queue_id),
            segment(phone_number_id)
        );
        self.client.delete::<IgnoredAny>(&path).await?;
        Ok(())
    }

    pub async fn unassign_all_phone_numbers(&self, call_queue_id: &str) -> Result<(), ApiError> {
        let path = format!("{}/phone_numbers", Self::path(call_queue_id));
        self.client.delete::<IgnoredAny>(&path).await?;
        Ok(())
    }

    pub async fn add_voicemail_policy(
        &self,
        call_queue_id: &str,
        request: &VoicemailPolicyRequest,
    ) -> Result<(), ApiError> {
        let path = format!("{}/policies/voice_mail", Self::path(call_queue_id));
        self.client.post::<IgnoredAny, _>(&path, request).await?;
        Ok(())
    }

    pub async fn update_voicemail_policy(
        &self,
        call_queue_id: &str,
        request: &VoicemailPolicyRequest,
    ) -> Result<(), ApiError> {
        let path = format!("{}/policies/voice_mail", Self::path(call_queue_id));
        self.client.patch::<IgnoredAny, _>(&path, request).await?;
        Ok(())
    }

    /// Remove voicemail access entries by shared id. Zoom accepts at most 20 per call.
    pub async fn remove_voicemail_policy(
        &self,
        call_queue_id: &str,
        shared_ids: &[String],
    ) -> Result<(), ApiError> {
        let path = format!("{}/policies/voice_mail", Self::path(call_queue_id));
        let params = shared_ids
            .iter()
            .fold(ApiQueryParams::new(), |params, id| params.add("shared_ids", id));
        self.client
            .delete_with_params::<IgnoredAny>(&path, &params)
            .await?;
        Ok(())
    }
}
