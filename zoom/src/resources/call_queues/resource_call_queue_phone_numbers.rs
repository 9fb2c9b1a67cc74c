//! Call queue phone numbers resource

use async_trait::async_trait;

use crate::api::phone::AssignPhoneNumbersRequest;
use crate::api::{ApiError, Client};
use crate::resources::phone_numbers::{NumberAssignments, PhoneNumbersResource, RemoteNumbers};
use crate::sync::found_or_deleted;

pub type CallQueuePhoneNumbersResource = PhoneNumbersResource<CallQueuePhoneNumbers>;

#[derive(Debug, Default)]
pub struct CallQueuePhoneNumbers;

#[async_trait]
impl NumberAssignments for CallQueuePhoneNumbers {
    const TYPE_NAME: &'static str = "zoom_phone_call_queue_phone_numbers";
    const PARENT_ID: &'static str = "call_queue_id";
    const LABEL: &'static str = "phone call queue phone numbers";
    const PARENT_LABEL: &'static str = "call queue";
    const DESCRIPTION: &'static str = "Manages the phone numbers assigned to a Zoom Phone call queue.";
    const HAS_SOURCE: bool = true;

    async fn list(&self, client: &Client, parent_id: &str) -> Result<Option<RemoteNumbers>, ApiError> {
        let queue = found_or_deleted(
            client.phone().call_queues().get(parent_id).await,
            ApiError::is_deleted_on_read,
        )?;
        Ok(queue.map(|queue| RemoteNumbers {
            numbers: queue.phone_numbers,
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
            .call_queues()
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
            .call_queues()
            .unassign_phone_number(parent_id, number_id)
            .await
    }

    async fn unassign_all(&self, client: &Client, parent_id: &str) -> Result<(), ApiError> {
        client
            .phone()
            .call_queues()
            .unassign_all_phone_numbers(parent_id)
            .await
    }
}
