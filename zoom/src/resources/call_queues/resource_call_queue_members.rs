//! Call queue members resource

use async_trait::async_trait;

use crate::api::phone::call_queues::CallQueueMember;
use crate::api::phone::AddMembersRequest;
use crate::api::{ApiError, Client};
use crate::resources::members::{MemberDirectory, MembersResource, RemoteMember, RemoteMembers};
use crate::sync::{found_or_deleted, SyncError};

pub type CallQueueMembersResource = MembersResource<CallQueueMembers>;

#[derive(Debug, Default)]
pub struct CallQueueMembers;

impl From<CallQueueMember> for RemoteMember {
    fn from(member: CallQueueMember) -> Self {
        Self {
            id: member.id,
            name: member.name,
            extension_id: member.extension_id,
            receive_call: member.receive_call,
        }
    }
}

/// Split the flat member listing by level
fn split_by_level(members: Vec<CallQueueMember>) -> Result<RemoteMembers, SyncError> {
    let mut remote = RemoteMembers::default();
    for member in members {
        match member.level.as_deref() {
            Some("user") => remote.users.push(member.into()),
            Some("commonArea") => remote.common_areas.push(member.into()),
            other => {
                return Err(SyncError::UnexpectedResponse(format!(
                    "unexpected level: {}",
                    other.unwrap_or_default()
                )))
            }
        }
    }
    Ok(remote)
}

#[async_trait]
impl MemberDirectory for CallQueueMembers {
    const TYPE_NAME: &'static str = "zoom_phone_call_queue_members";
    const PARENT_ID: &'static str = "call_queue_id";
    const LABEL: &'static str = "phone call queue members";
    const PARENT_LABEL: &'static str = "call queue";
    const DESCRIPTION: &'static str = "Manages the users and common areas that are members of a Zoom Phone call queue.";

    async fn list(
        &self,
        client: &Client,
        parent_id: &str,
    ) -> Result<Option<RemoteMembers>, SyncError> {
        let members = found_or_deleted(
            client.phone().call_queues().list_all_members(parent_id).await,
            ApiError::is_deleted_on_read,
        )
        .map_err(SyncError::remote(format!(
            "unable to read {} {}",
            Self::LABEL,
            parent_id
        )))?;

        members.map(split_by_level).transpose()
    }

    async fn add(
        &self,
        client: &Client,
        parent_id: &str,
        request: &AddMembersRequest,
    ) -> Result<(), ApiError> {
        client
            .phone()
            .call_queues()
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
            .call_queues()
            .remove_member(parent_id, member_id)
            .await
    }

    async fn remove_all(&self, client: &Client, parent_id: &str) -> Result<(), ApiError> {
        client.phone().call_queues().remove_all_members(parent_id).await
    }
}
