//! Auto receptionist IVR API

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::segment;
use crate::api::common::ApiQueryParams;
use crate::api::{ApiError, Client};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AudioPrompt {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForwardTo {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub extension_id: Option<String>,
    #[serde(default)]
    pub extension_number: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallerEntersNoAction {
    #[serde(default)]
    pub action: Option<i64>,
    #[serde(default)]
    pub audio_prompt_repeat: Option<i64>,
    #[serde(default)]
    pub forward_to: Option<ForwardTo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyActionTarget {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub extension_id: Option<String>,
    #[serde(default)]
    pub extension_number: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoicemailGreeting {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyAction {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub action: Option<i64>,
    #[serde(default)]
    pub target: Option<KeyActionTarget>,
    #[serde(default)]
    pub voicemail_greeting: Option<VoicemailGreeting>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ivr {
    #[serde(default)]
    pub audio_prompt: Option<AudioPrompt>,
    #[serde(default)]
    pub caller_enters_no_action: Option<CallerEntersNoAction>,
    /// Disabled keys are omitted by the API
    #[serde(default)]
    pub key_actions: Vec<KeyAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateCallerEntersNoAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_prompt_repeat: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_to_extension_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateKeyActionTarget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateKeyAction {
    pub key: String,
    pub action: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<UpdateKeyActionTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voicemail_greeting_id: Option<String>,
}

/// PATCH body. Zoom accepts at most one key action per call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateIvrRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_prompt_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_enters_no_action: Option<UpdateCallerEntersNoAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_action: Option<UpdateKeyAction>,
}

pub struct AutoReceptionistsApi<'a> {
    client: &'a Client,
}

impl<'a> AutoReceptionistsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn ivr_path(auto_receptionist_id: &str) -> String {
        format!(
            "/phone/auto_receptionists/{}/ivr",
            segment(auto_receptionist_id)
        )
    }

    pub async fn get_ivr(
        &self,
        auto_receptionist_id: &str,
        hours_type: Option<&str>,
        holiday_id: Option<&str>,
    ) -> Result<Ivr, ApiError> {
        let params = ApiQueryParams::new()
            .add_optional("hours_type", hours_type)
            .add_optional("holiday_id", holiday_id);
        self.client
            .get_with_params(&Self::ivr_path(auto_receptionist_id), &params)
            .await
    }

    pub async fn update_ivr(
        &self,
        auto_receptionist_id: &str,
        request: &UpdateIvrRequest,
    ) -> Result<(), ApiError> {
        self.client
            .patch::<IgnoredAny, _>(&Self::ivr_path(auto_receptionist_id), request)
            .await?;
        Ok(())
    }
}
