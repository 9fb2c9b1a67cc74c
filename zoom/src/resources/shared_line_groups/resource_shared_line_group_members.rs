//! Shared line group members resource

use async_trait::async_trait;

use crate::api::phone::shared_line_groups::SharedLineGroupMember;
use crate::api::phone::AddMembersRequest;
use crate::api::{ApiError, Client};
use crate::resources::members::{MemberDirectory, MembersResource, RemoteMember, RemoteMembers};
use crate::sync::{found_or_deleted, SyncError};

pub type SharedLineGroupMembersResource = MembersResource<SharedLineGroupMembers>;

#[derive(Debug, Default)]
pub struct SharedLineGroupMembers;

// The group listing carries no receive_call flag
impl From<SharedLineGroupMember> for RemoteMember {
    fn from(member: SharedLineGroupMember) -> Self {
        Self {
            id: member.id,
            name: member.name,
            extension_id: member.extension_id,
            receive_call: None,
        }
    }
}

#[async_trait]
impl MemberDirectory for SharedLineGroupMembers {
    const TYPE_NAME: &'static str = "zoom_phone_shared_line_group_members";
    const PARENT_ID: &'static str = "shared_line_group_id";
    const LABEL: &'static str = "phone shared line group members";
    const PARENT_LABEL: &'static str = "shared line group";
    const DESCRIPTION: &'static str = "Manages the users and common areas that are members of a Zoom Phone shared line group.";

    async fn list(
        &self,
        client: &Client,
        parent_id: &str,
    ) -> Result<Option<RemoteMembers>, SyncError> {
        let group = found_or_deleted(
            client.phone().shared_line_groups().get(parent_id).await,
            ApiError::is_deleted_on_read,
        )
        .map_err(SyncError::remote(format!(
            "unable to read {} {}",
            Self::LABEL,
            parent_id
        )))?;

        Ok(group.map(|group| {
            let members = group.members.unwrap_or_default();
            RemoteMembers {
                users: members.users.into_iter().map(Into::into).collect(),
                common_areas: members.common_areas.into_iter().map(Into::into).collect(),
            }
        }))
    }

    async fn add(
        &self,
        client: &Client,
        parent_id: &str,
        request: &AddMembersRequest,
    ) -> Result<(), ApiError> {
        client
            .phone()
            .shared_line_groups()
            .add_members(parent_id, request)
            .await
    }

    async fn remove(
        &self,
        client: &Client,
        parent_id: &str,
        member_id: &str,
    ) -> Result<(), ApiError> {
        client
            .phone()
            .shared_line_groups()
            .remove_member(parent_id, member_id)
            .await
    }

    async fn remove_all(&self, client: &Client, parent_id: &str) -> Result<(), ApiError> {
        client
            .phone()
            .shared_line_groups()
            .remove_all_members(parent_id)
            .await
    }
}
