//! User phone numbers resource

use async_trait::async_trait;

use crate::api::phone::AssignPhoneNumbersRequest;
use crate::api::{ApiError, Client};
use crate::resources::phone_numbers::{NumberAssignments, PhoneNumbersResource, RemoteNumbers};
use crate::sync::found_or_deleted;

pub type UserPhoneNumbersResource = PhoneNumbersResource<UserPhoneNumbers>;

/// Users have no bulk unassign endpoint, so delete falls back to one call per number
#[derive(Debug, Default)]
pub struct UserPhoneNumbers;

#[async_trait]
impl NumberAssignments for UserPhoneNumbers {
    const TYPE_NAME: &'static str = "zoom_phone_user_phone_numbers";
    const PARENT_ID: &'static str = "user_id";
    const LABEL: &'static str = "phone user phone numbers";
    const PARENT_LABEL: &'static str = "phone user";
    const DESCRIPTION: &'static str = "Manages the phone numbers assigned to a Zoom Phone user.";

    async fn list(&self, client: &Client, parent_id: &str) -> Result<Option<RemoteNumbers>, ApiError> {
        let user = found_or_deleted(
            client.phone().users().get(parent_id).await,
            ApiError::is_not_found,
        )?;
        Ok(user.map(|user| RemoteNumbers {
            numbers: user.phone_numbers,
            primary_number: None,
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
            .users()
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
            .users()
            .unassign_phone_number(parent_id, number_id)
            .await
    }
}
