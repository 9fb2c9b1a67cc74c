//! Zoom Phone API

use crate::api::Client;
use serde::{Deserialize, Serialize};

pub mod auto_receptionists;
pub mod call_queues;
pub mod external_contacts;
pub mod shared_line_groups;
pub mod users;

pub struct PhoneApi<'a> {
    client: &'a Client,
}

impl<'a> PhoneApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn auto_receptionists(&self) -> auto_receptionists::AutoReceptionistsApi<'a> {
        auto_receptionists::AutoReceptionistsApi::new(self.client)
    }

    pub fn call_queues(&self) -> call_queues::CallQueuesApi<'a> {
        call_queues::CallQueuesApi::new(self.client)
    }

    pub fn external_contacts(&self) -> external_contacts::ExternalContactsApi<'a> {
        external_contacts::ExternalContactsApi::new(self.client)
    }

    pub fn shared_line_groups(&self) -> shared_line_groups::SharedLineGroupsApi<'a> {
        shared_line_groups::SharedLineGroupsApi::new(self.client)
    }

    pub fn users(&self) -> users::UsersApi<'a> {
        users::UsersApi::new(self.client)
    }
}

/// Percent-encode an identifier for use as a path segment
pub(crate) fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

/// Phone number attached to a call queue, shared line group or user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignedPhoneNumber {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// A phone number to assign, by id or by E.164 number
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhoneNumberRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

impl PhoneNumberRef {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            number: None,
        }
    }

    pub fn by_number(number: impl Into<String>) -> Self {
        Self {
            id: None,
            number: Some(number.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssignPhoneNumbersRequest {
    pub phone_numbers: Vec<PhoneNumberRef>,
}

/// A user to add as member, by id or by email
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct MembersPayload {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub common_area_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<UserRef>,
}

/// Body of the call queue and shared line group add-members endpoints
#[derive(Debug, Serialize)]
pub struct AddMembersRequest {
    pub members: MembersPayload,
}

impl AddMembersRequest {
    pub fn common_areas(ids: Vec<String>) -> Self {
        Self {
            members: MembersPayload {
                common_area_ids: ids,
                users: Vec::new(),
            },
        }
    }

    pub fn users(users: Vec<UserRef>) -> Self {
        Self {
            members: MembersPayload {
                common_area_ids: Vec::new(),
                users,
            },
        }
    }
}
