//! Shared line group phone numbers resource, including the group's primary number

use async_trait::async_trait;

use crate::api::phone::shared_line_groups::UpdateSharedLineGroupRequest;
use crate::api::phone::AssignPhoneNumbersRequest;
use crate::api::{ApiError, Client};
use crate::resources::phone_numbers::{NumberAssignments, PhoneNumbersResource, RemoteNumbers};
use crate::sync::found_or_deleted;

pub type SharedLineGroupPhoneNumbersResource = PhoneNumbersResource<SharedLineGroupPhoneNumbers>;

#[derive(Debug, Default)]
pub struct SharedLineGroupPhoneNumbers;

#[async_trait]
impl NumberAssignments for SharedLineGroupPhoneNumbers {
    const TYPE_NAME: &'static str = "zoom_phone_shared_line_group_phone_numbers";
    const PARENT_ID: &'static str = "shared_line_group_id";
    const LABEL: &'static str = "phone shared line group phone numbers";
    const PARENT_LABEL: &'static str = "shared line group";
    const DESCRIPTION: &'static str =
        "Manages the phone numbers and primary number of a Zoom Phone shared line group.";
    const HAS_PRIMARY: bool = true;

    async fn list(&self, client: &Client, parent_id: &str) -> Result<Option<RemoteNumbers>, ApiError> {
        let group = found_or_deleted(
            client.phone().shared_line_groups().get(parent_id).await,
            ApiError::is_deleted_on_read,
        )?;
        Ok(group.map(|group| RemoteNumbers {
            numbers: group.phone_numbers,
            primary_number: group.primary_number,
        }))
    }

    async fn assign(
        &self,
        client: &Client,
        parent_id: &str,
        request: &AssignPhoneNumbersRequest,
    ) -> Result<(), ApiError> {
        client
            .phone()
            .shared_line_groups()
            .assign_phone_numbers(parent_id, request)
            .await
    }

    async fn unassign(
        &self,
        client: &Client,
        parent_id: &str,
        number_id: &str,
    ) -> Result<(), ApiError> {
        client
            .phone()
            .shared_line_groups()
            .unassign_phone_number(parent_id, number_id)
            .await
    }

    async fn unassign_all(&self, client: &Client, parent_id: &str) -> Result<(), ApiError> {
        client
            .phone()
            .shared_line_groups()
            .unassign_all_phone_numbers(parent_id)
            .await
    }

    async fn set_primary(&self, client: &Client, parent_id: &str, number: &str) -> Result<(), ApiError> {
        let request = UpdateSharedLineGroupRequest {
            primary_number: Some(number.to_string()),
            ..Default::default()
        };
        client
            .phone()
            .shared_line_groups()
            .update(parent_id, &request)
            .await
    }
}
