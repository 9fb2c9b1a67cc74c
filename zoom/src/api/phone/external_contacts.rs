//! External contact API

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::segment;
use crate::api::{ApiError, Client};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalContact {
    #[serde(default)]
    pub external_contact_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub extension_number: Option<String>,
    #[serde(default)]
    pub phone_numbers: Vec<String>,
    #[serde(default)]
    pub routing_path: Option<String>,
    #[serde(default)]
    pub auto_call_recorded: Option<bool>,
}

/// Body shared by create and update
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExternalContactRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_number: Option<String>,
    pub phone_numbers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_call_recorded: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedExternalContact {
    #[serde(default)]
    pub external_contact_id: Option<String>,
}

pub struct ExternalContactsApi<'a> {
    client: &'a Client,
}

impl<'a> ExternalContactsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn path(external_contact_id: &str) -> String {
        format!("/phone/external_contacts/{}", segment(external_contact_id))
    }

    pub async fn create(
        &self,
        request: &ExternalContactRequest,
    ) -> Result<CreatedExternalContact, ApiError> {
        self.client.post("/phone/external_contacts", request).await
    }

    pub async fn get(&self, external_contact_id: &str) -> Result<ExternalContact, ApiError> {
        self.client.get(&Self::path(external_contact_id)).await
    }

    pub async fn update(
        &self,
        external_contact_id: &str,
        request: &ExternalContactRequest,
    ) -> Result<(), ApiError> {
        self.client
            .patch::<IgnoredAny, _>(&Self::path(external_contact_id), request)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, external_contact_id: &str) -> Result<(), ApiError> {
        self.client
            .delete::<IgnoredAny>(&Self::path(external_contact_id))
            .await?;
        Ok(())
    }
}
