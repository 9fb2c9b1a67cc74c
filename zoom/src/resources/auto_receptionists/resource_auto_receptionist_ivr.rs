//! Auto receptionist IVR resource
//!
//! The IVR exists as long as its auto receptionist does. Create and update
//! overwrite it; delete restores the factory defaults. The update endpoint
//! accepts a single key action per call, so every write is one PATCH for the
//! common fields followed by one PATCH per key.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
use tfplug::import::import_state_passthrough_id;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure,
    ResourceWithImportState, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::{
    Attribute, AttributeBuilder, AttributeType, NestedType, ObjectNestingMode, Schema,
    SchemaBuilder,
};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::{
    MapKeysValidator, NumberRangeValidator, SizeValidator, StringOneOfValidator,
};

use crate::api::phone::auto_receptionists::{
    AudioPrompt, CallerEntersNoAction, ForwardTo, Ivr, KeyAction, KeyActionTarget,
    UpdateCallerEntersNoAction, UpdateIvrRequest, UpdateKeyAction, UpdateKeyActionTarget,
    VoicemailGreeting,
};
use crate::api::{ApiError, Client};
use crate::resources::{not_configured, object_type, required_id};
use crate::sync::{found_or_deleted, SyncError};
use crate::value::TfValue;
use crate::ZoomProviderData;

const ALL_KEYS: [&str; 12] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "*", "#"];

const KEY_ACTION_DISABLED: i64 = -1;
/// Leave voicemail to the current extension
const KEY_ACTION_LEAVE_VOICEMAIL: i64 = 100;
const KEY_ACTION_REPEAT_GREETING: i64 = 21;
const DEFAULT_PROMPT_REPEAT: i64 = 3;

/// Nested attributes are objects; anything else counts as not configured
fn nested(value: &Dynamic) -> Option<&Dynamic> {
    match value {
        Dynamic::Map(_) => Some(value),
        _ => None,
    }
}

fn nested_or_null<T>(model: &Option<T>, to_dynamic: impl Fn(&T) -> Dynamic) -> Dynamic {
    model.as_ref().map(to_dynamic).unwrap_or(Dynamic::Null)
}

#[derive(Debug, Clone, Default, PartialEq)]
struct AudioPromptModel {
    id: TfValue<String>,
    name: TfValue<String>,
}

impl AudioPromptModel {
    fn from_dynamic(value: &Dynamic) -> Self {
        Self {
            id: TfValue::attr(value, "id"),
            name: TfValue::attr(value, "name"),
        }
    }

    fn from_remote(prompt: AudioPrompt) -> Self {
        Self {
            id: prompt.id.into(),
            name: prompt.name.into(),
        }
    }

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::object([
            ("id", self.id.clone().to_dynamic()),
            ("name", self.name.clone().to_dynamic()),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ForwardToModel {
    extension_id: TfValue<String>,
    display_name: TfValue<String>,
    extension_number: TfValue<String>,
    id: TfValue<String>,
}

impl ForwardToModel {
    fn from_dynamic(value: &Dynamic) -> Self {
        Self {
            extension_id: TfValue::attr(value, "extension_id"),
            display_name: TfValue::attr(value, "display_name"),
            extension_number: TfValue::attr(value, "extension_number"),
            id: TfValue::attr(value, "id"),
        }
    }

    fn from_remote(forward_to: ForwardTo) -> Self {
        Self {
            extension_id: forward_to.extension_id.into(),
            display_name: forward_to.display_name.into(),
            extension_number: forward_to.extension_number.into(),
            id: forward_to.id.into(),
        }
    }

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::object([
            ("extension_id", self.extension_id.clone().to_dynamic()),
            ("display_name", self.display_name.clone().to_dynamic()),
            ("extension_number", self.extension_number.clone().to_dynamic()),
            ("id", self.id.clone().to_dynamic()),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct NoActionModel {
    action: TfValue<i64>,
    audio_prompt_repeat: TfValue<i64>,
    forward_to: Option<ForwardToModel>,
}

impl NoActionModel {
    fn from_dynamic(value: &Dynamic) -> Self {
        Self {
            action: TfValue::attr(value, "action"),
            audio_prompt_repeat: TfValue::attr(value, "audio_prompt_repeat"),
            forward_to: nested(value.attribute("forward_to")).map(ForwardToModel::from_dynamic),
        }
    }

    fn from_remote(configured: &NoActionModel, remote: CallerEntersNoAction) -> Self {
        let forward_to = match (&configured.forward_to, remote.forward_to) {
            (Some(_), Some(forward_to)) => Some(ForwardToModel::from_remote(forward_to)),
            _ => None,
        };
        Self {
            action: remote.action.into(),
            audio_prompt_repeat: remote.audio_prompt_repeat.into(),
            forward_to,
        }
    }

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::object([
            ("action", self.action.clone().to_dynamic()),
            ("audio_prompt_repeat", self.audio_prompt_repeat.clone().to_dynamic()),
            ("forward_to", nested_or_null(&self.forward_to, ForwardToModel::to_dynamic)),
        ])
    }

    fn to_request(&self) -> UpdateCallerEntersNoAction {
        UpdateCallerEntersNoAction {
            action: self.action.clone().into_wire(),
            audio_prompt_repeat: self.audio_prompt_repeat.clone().into_wire(),
            forward_to_extension_id: self
                .forward_to
                .as_ref()
                .and_then(|forward_to| forward_to.extension_id.clone().into_wire()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct TargetModel {
    extension_id: TfValue<String>,
    phone_number: TfValue<String>,
    display_name: TfValue<String>,
    extension_number: TfValue<String>,
    id: TfValue<String>,
}

impl TargetModel {
    fn from_dynamic(value: &Dynamic) -> Self {
        Self {
            extension_id: TfValue::attr(value, "extension_id"),
            phone_number: TfValue::attr(value, "phone_number"),
            display_name: TfValue::attr(value, "display_name"),
            extension_number: TfValue::attr(value, "extension_number"),
            id: TfValue::attr(value, "id"),
        }
    }

    fn from_remote(target: KeyActionTarget) -> Self {
        Self {
            extension_id: target.extension_id.into(),
            phone_number: target.phone_number.into(),
            display_name: target.display_name.into(),
            extension_number: target.extension_number.into(),
            id: target.id.into(),
        }
    }

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::object([
            ("extension_id", self.extension_id.clone().to_dynamic()),
            ("phone_number", self.phone_number.clone().to_dynamic()),
            ("display_name", self.display_name.clone().to_dynamic()),
            ("extension_number", self.extension_number.clone().to_dynamic()),
            ("id", self.id.clone().to_dynamic()),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct GreetingModel {
    id: TfValue<String>,
    name: TfValue<String>,
}

impl GreetingModel {
    fn from_dynamic(value: &Dynamic) -> Self {
        Self {
            id: TfValue::attr(value, "id"),
            name: TfValue::attr(value, "name"),
        }
    }

    fn from_remote(greeting: VoicemailGreeting) -> Self {
        Self {
            id: greeting.id.into(),
            name: greeting.name.into(),
        }
    }

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::object([
            ("id", self.id.clone().to_dynamic()),
            ("name", self.name.clone().to_dynamic()),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct KeyActionModel {
    action: TfValue<i64>,
    target: Option<TargetModel>,
    voicemail_greeting: Option<GreetingModel>,
}

impl KeyActionModel {
    fn disabled() -> Self {
        Self {
            action: TfValue::Known(KEY_ACTION_DISABLED),
            ..Default::default()
        }
    }

    fn is_disabled(&self) -> bool {
        self.action.as_known() == Some(&KEY_ACTION_DISABLED)
    }

    fn from_dynamic(value: &Dynamic) -> Self {
        Self {
            action: TfValue::attr(value, "action"),
            target: nested(value.attribute("target")).map(TargetModel::from_dynamic),
            voicemail_greeting: nested(value.attribute("voicemail_greeting"))
                .map(GreetingModel::from_dynamic),
        }
    }

    fn from_remote(configured: &KeyActionModel, remote: KeyAction) -> Self {
        let target = match (&configured.target, remote.target) {
            (Some(_), Some(target)) => Some(TargetModel::from_remote(target)),
            _ => None,
        };
        let voicemail_greeting = match (&configured.voicemail_greeting, remote.voicemail_greeting) {
            (Some(_), Some(greeting)) => Some(GreetingModel::from_remote(greeting)),
            _ => None,
        };
        Self {
            action: remote.action.into(),
            target,
            voicemail_greeting,
        }
    }

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::object([
            ("action", self.action.clone().to_dynamic()),
            ("target", nested_or_null(&self.target, TargetModel::to_dynamic)),
            (
                "voicemail_greeting",
                nested_or_null(&self.voicemail_greeting, GreetingModel::to_dynamic),
            ),
        ])
    }

    fn to_request(&self, key: &str) -> UpdateKeyAction {
        UpdateKeyAction {
            key: key.to_string(),
            action: self.action.as_known().copied().unwrap_or(KEY_ACTION_DISABLED),
            target: self.target.as_ref().map(|target| UpdateKeyActionTarget {
                extension_id: target.extension_id.clone().into_wire(),
                phone_number: target.phone_number.clone().into_wire(),
            }),
            voicemail_greeting_id: self
                .voicemail_greeting
                .as_ref()
                .and_then(|greeting| greeting.id.clone().into_wire()),
        }
    }
}

fn reset_key_action(key: &str) -> UpdateKeyAction {
    let (action, voicemail_greeting_id) = match key {
        "0" => (KEY_ACTION_LEAVE_VOICEMAIL, Some(String::new())),
        "*" => (KEY_ACTION_REPEAT_GREETING, None),
        _ => (KEY_ACTION_DISABLED, None),
    };
    UpdateKeyAction {
        key: key.to_string(),
        action,
        target: None,
        voicemail_greeting_id,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct IvrModel {
    auto_receptionist_id: TfValue<String>,
    hours_type: TfValue<String>,
    holiday_id: TfValue<String>,
    audio_prompt: Option<AudioPromptModel>,
    caller_enters_no_action: Option<NoActionModel>,
    key_actions: BTreeMap<String, KeyActionModel>,
}

impl IvrModel {
    fn from_state(state: &DynamicValue) -> Self {
        let value = &state.value;
        let key_actions = value
            .attribute("key_actions")
            .as_map()
            .map(|entries| {
                entries
                    .iter()
                    .map(|(key, action)| (key.clone(), KeyActionModel::from_dynamic(action)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            auto_receptionist_id: TfValue::attr(value, "auto_receptionist_id"),
            hours_type: TfValue::attr(value, "hours_type"),
            holiday_id: TfValue::attr(value, "holiday_id"),
            audio_prompt: nested(value.attribute("audio_prompt")).map(AudioPromptModel::from_dynamic),
            caller_enters_no_action: nested(value.attribute("caller_enters_no_action"))
                .map(NoActionModel::from_dynamic),
            key_actions,
        }
    }

    fn to_state(&self) -> DynamicValue {
        let key_actions = self
            .key_actions
            .iter()
            .map(|(key, action)| (key.clone(), action.to_dynamic()))
            .collect();

        DynamicValue::new(Dynamic::object([
            ("auto_receptionist_id", self.auto_receptionist_id.clone().to_dynamic()),
            ("hours_type", self.hours_type.clone().to_dynamic()),
            ("holiday_id", self.holiday_id.clone().to_dynamic()),
            ("audio_prompt", nested_or_null(&self.audio_prompt, AudioPromptModel::to_dynamic)),
            (
                "caller_enters_no_action",
                nested_or_null(&self.caller_enters_no_action, NoActionModel::to_dynamic),
            ),
            ("key_actions", Dynamic::Map(key_actions)),
        ]))
    }

    /// Every PATCH addresses the same hours type and holiday
    fn scope(&self) -> UpdateIvrRequest {
        UpdateIvrRequest {
            holiday_id: self.holiday_id.clone().into_wire(),
            hours_type: self.hours_type.clone().into_wire(),
            ..Default::default()
        }
    }

    /// Requests that make the remote IVR match this model. Keys missing from
    /// the map are disabled so the result does not depend on prior state.
    fn to_requests(&self) -> Vec<UpdateIvrRequest> {
        let mut requests = vec![UpdateIvrRequest {
            audio_prompt_id: self
                .audio_prompt
                .as_ref()
                .and_then(|prompt| prompt.id.clone().into_wire()),
            caller_enters_no_action: self
                .caller_enters_no_action
                .as_ref()
                .map(NoActionModel::to_request),
            ..self.scope()
        }];

        requests.extend(ALL_KEYS.iter().map(|key| {
            let key_action = match self.key_actions.get(*key) {
                Some(action) => action.to_request(key),
                None => KeyActionModel::disabled().to_request(key),
            };
            UpdateIvrRequest {
                key_action: Some(key_action),
                ..self.scope()
            }
        }));
        requests
    }

    /// Requests that restore the defaults of a new auto receptionist
    fn reset_requests(&self) -> Vec<UpdateIvrRequest> {
        let mut requests = vec![UpdateIvrRequest {
            audio_prompt_id: Some(String::new()),
            caller_enters_no_action: Some(UpdateCallerEntersNoAction {
                action: Some(KEY_ACTION_DISABLED),
                audio_prompt_repeat: Some(DEFAULT_PROMPT_REPEAT),
                forward_to_extension_id: None,
            }),
            ..self.scope()
        }];

        requests.extend(ALL_KEYS.iter().map(|key| UpdateIvrRequest {
            key_action: Some(reset_key_action(key)),
            ..self.scope()
        }));
        requests
    }

    /// Build state from the API response, keeping only what this model configures
    fn merge_remote(&self, remote: Ivr) -> Self {
        let audio_prompt = match (&self.audio_prompt, remote.audio_prompt) {
            (Some(_), Some(prompt)) => Some(AudioPromptModel::from_remote(prompt)),
            _ => None,
        };
        let caller_enters_no_action = match (&self.caller_enters_no_action, remote.caller_enters_no_action) {
            (Some(configured), Some(no_action)) => Some(NoActionModel::from_remote(configured, no_action)),
            _ => None,
        };

        let mut key_actions = BTreeMap::new();
        for action in remote.key_actions {
            let Some(key) = action.key.clone() else {
                continue;
            };
            if let Some(configured) = self.key_actions.get(&key) {
                key_actions.insert(key, KeyActionModel::from_remote(configured, action));
            }
        }
        // Disabled keys are omitted from the response
        for (key, configured) in &self.key_actions {
            if configured.is_disabled() {
                key_actions.insert(key.clone(), KeyActionModel::disabled());
            }
        }

        Self {
            auto_receptionist_id: self.auto_receptionist_id.clone(),
            hours_type: self.hours_type.clone(),
            holiday_id: self.holiday_id.clone(),
            audio_prompt,
            caller_enters_no_action,
            key_actions,
        }
    }
}

#[derive(Default)]
pub struct AutoReceptionistIvrResource {
    provider_data: Option<ZoomProviderData>,
}

impl AutoReceptionistIvrResource {
    pub fn new() -> Self {
        Self::default()
    }

    async fn read_ivr(
        client: &Client,
        auto_receptionist_id: &str,
        configured: &IvrModel,
    ) -> Result<Option<IvrModel>, ApiError> {
        let ivr = found_or_deleted(
            client
                .phone()
                .auto_receptionists()
                .get_ivr(
                    auto_receptionist_id,
                    configured.hours_type.as_deref(),
                    configured.holiday_id.as_deref(),
                )
                .await,
            ApiError::is_deleted_on_read,
        )?;
        Ok(ivr.map(|ivr| configured.merge_remote(ivr)))
    }

    /// Send the requests in order, stopping at the first failure
    async fn apply(
        client: &Client,
        auto_receptionist_id: &str,
        requests: Vec<UpdateIvrRequest>,
    ) -> Result<(), SyncError> {
        let api = client.phone().auto_receptionists();
        for request in requests {
            let context = match &request.key_action {
                Some(key_action) => format!(
                    "error updating phone auto receptionist ivr on key={}",
                    key_action.key
                ),
                None => "error updating phone auto receptionist ivr".to_string(),
            };
            api.update_ivr(auto_receptionist_id, &request)
                .await
                .map_err(SyncError::remote(context))?;
        }
        Ok(())
    }

    async fn write_and_read(
        client: &Client,
        auto_receptionist_id: &str,
        plan: &IvrModel,
    ) -> Result<DynamicValue, (String, String)> {
        tracing::debug!(
            "Writing phone auto receptionist ivr {} with {} configured keys",
            auto_receptionist_id,
            plan.key_actions.len()
        );
        Self::apply(client, auto_receptionist_id, plan.to_requests())
            .await
            .map_err(|e| (String::new(), e.to_string()))?;

        match Self::read_ivr(client, auto_receptionist_id, plan).await {
            Ok(Some(model)) => Ok(model.to_state()),
            Ok(None) => Err((
                " on reading".to_string(),
                format!("auto receptionist {} not found", auto_receptionist_id),
            )),
            Err(e) => Err((" on reading".to_string(), format!("API error: {}", e))),
        }
    }
}

fn ivr_schema() -> tfplug::Result<Schema> {
    Ok(SchemaBuilder::new()
        .version(0)
        .description("Interactive voice response (IVR) system of an auto receptionist.")
        .attribute(
            AttributeBuilder::new("auto_receptionist_id", AttributeType::String)
                .description("The unique identifier of the auto receptionist.")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("hours_type", AttributeType::String)
                .description("The hours type, `business_hours` or `closed_hours`.")
                .optional()
                .computed()
                .default(StaticDefault::string("business_hours"))
                .validator(StringOneOfValidator::create(&["business_hours", "closed_hours"]))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("holiday_id", AttributeType::String)
                .description("The holiday hours ID. Takes priority over `hours_type` when both are set.")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("audio_prompt", object_type())
                .description("The greeting prompt played to callers.")
                .optional()
                .computed()
                .default(StaticDefault::create(Dynamic::object([
                    ("id", Dynamic::from("")),
                    ("name", Dynamic::from("Default")),
                ])))
                .nested_type(NestedType {
                    attributes: vec![
                        AttributeBuilder::new("id", AttributeType::String)
                            .description("The audio prompt file ID. An empty string selects the default prompt.")
                            .required()
                            .build(),
                        AttributeBuilder::new("name", AttributeType::String)
                            .description("The audio prompt name.")
                            .computed()
                            .build(),
                    ],
                    nesting: ObjectNestingMode::Single,
                })
                .build(),
        )
        .attribute(
            AttributeBuilder::new("caller_enters_no_action", object_type())
                .description("What happens when the caller does not press a key.")
                .optional()
                .nested_type(NestedType {
                    attributes: no_action_attributes(),
                    nesting: ObjectNestingMode::Single,
                })
                .build(),
        )
        .attribute(
            AttributeBuilder::new("key_actions", AttributeType::Map(Box::new(object_type())))
                .description("Actions keyed by the digit, `*` or `#` the caller presses.")
                .required()
                .validator(SizeValidator::at_least(1))
                .validator(MapKeysValidator::create(r"^[0-9*#]$", "a single digit, * or #")?)
                .nested_type(NestedType {
                    attributes: key_action_attributes(),
                    nesting: ObjectNestingMode::Map,
                })
                .build(),
        )
        .build())
}

fn no_action_attributes() -> Vec<Attribute> {
    vec![
        AttributeBuilder::new("action", AttributeType::Number)
            .description("The action to take. -1 disconnects the call.")
            .required()
            .build(),
        AttributeBuilder::new("audio_prompt_repeat", AttributeType::Number)
            .description("How many times the prompt repeats before the action runs.")
            .required()
            .validator(NumberRangeValidator::between(1.0, 3.0))
            .build(),
        AttributeBuilder::new("forward_to", object_type())
            .description("The extension calls are forwarded to.")
            .optional()
            .nested_type(NestedType {
                attributes: vec![
                    AttributeBuilder::new("extension_id", AttributeType::String)
                        .description("The extension ID.")
                        .required()
                        .build(),
                    computed_string("display_name", "The display name."),
                    computed_string("extension_number", "The extension number."),
                    computed_string("id", "The ID of the forwarding target."),
                ],
                nesting: ObjectNestingMode::Single,
            })
            .build(),
    ]
}

fn key_action_attributes() -> Vec<Attribute> {
    vec![
        AttributeBuilder::new("action", AttributeType::Number)
            .description("The action bound to the key. -1 disables the key.")
            .required()
            .build(),
        AttributeBuilder::new("target", object_type())
            .description("Where the call is routed.")
            .optional()
            .nested_type(NestedType {
                attributes: vec![
                    AttributeBuilder::new("extension_id", AttributeType::String)
                        .description("The target extension ID.")
                        .optional()
                        .build(),
                    AttributeBuilder::new("phone_number", AttributeType::String)
                        .description("The target phone number.")
                        .optional()
                        .build(),
                    computed_string("display_name", "The display name."),
                    computed_string("extension_number", "The extension number."),
                    computed_string("id", "The ID of the target."),
                ],
                nesting: ObjectNestingMode::Single,
            })
            .build(),
        AttributeBuilder::new("voicemail_greeting", object_type())
            .description("The voicemail greeting played for voicemail actions.")
            .optional()
            .nested_type(NestedType {
                attributes: vec![
                    AttributeBuilder::new("id", AttributeType::String)
                        .description("The greeting ID. An empty string selects the default greeting.")
                        .required()
                        .build(),
                    computed_string("name", "The greeting name."),
                ],
                nesting: ObjectNestingMode::Single,
            })
            .build(),
    ]
}

fn computed_string(name: &str, description: &str) -> Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .description(description)
        .computed()
        .build()
}

fn schema_error(e: tfplug::TfplugError) -> Diagnostic {
    Diagnostic::error("Invalid schema", e.to_string())
}

#[async_trait]
impl Resource for AutoReceptionistIvrResource {
    fn type_name(&self) -> &str {
        "zoom_phone_auto_receptionist_ivr"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        match ivr_schema() {
            Ok(schema) => ResourceSchemaResponse {
                schema,
                diagnostics: vec![],
            },
            Err(e) => ResourceSchemaResponse {
                schema: SchemaBuilder::new().build(),
                diagnostics: vec![schema_error(e)],
            },
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        let diagnostics = match ivr_schema() {
            Ok(schema) => schema.validate(&request.config),
            Err(e) => vec![schema_error(e)],
        };
        ValidateResourceConfigResponse { diagnostics }
    }

    async fn create(&self, _ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };

        let auto_receptionist_id = match required_id(&request.planned_state, "auto_receptionist_id") {
            Ok(id) => id,
            Err(diag) => {
                diagnostics.push(diag);
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };

        // The IVR comes with the auto receptionist, so create only overwrites it
        let plan = IvrModel::from_state(&request.planned_state);
        match Self::write_and_read(&provider_data.client, &auto_receptionist_id, &plan).await {
            Ok(new_state) => CreateResourceResponse {
                new_state,
                private: vec![],
                diagnostics,
            },
            Err((phase, detail)) => {
                diagnostics.push(Diagnostic::error(
                    format!("Error creating phone auto receptionist ivr{}", phase),
                    detail,
                ));
                CreateResourceResponse {
                    new_state: request.planned_state,
                    private: vec![],
                    diagnostics,
                }
            }
        }
    }

    async fn read(&self, _ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                    deferred: None,
                };
            }
        };

        let auto_receptionist_id = match required_id(&request.current_state, "auto_receptionist_id") {
            Ok(id) => id,
            Err(diag) => {
                diagnostics.push(diag);
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                    deferred: None,
                };
            }
        };

        let current = IvrModel::from_state(&request.current_state);
        match Self::read_ivr(&provider_data.client, &auto_receptionist_id, &current).await {
            Ok(Some(model)) => ReadResourceResponse {
                new_state: Some(model.to_state()),
                diagnostics,
                private: request.private,
                deferred: None,
            },
            Ok(None) => {
                tracing::info!(
                    "Auto receptionist {} no longer exists, removing ivr from state",
                    auto_receptionist_id
                );
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: request.private,
                    deferred: None,
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Error reading phone auto receptionist ivr",
                    format!("API error: {}", e),
                ));
                ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics,
                    private: request.private,
                    deferred: None,
                }
            }
        }
    }

    async fn update(
        &self,
        _ctx: Context,
        request: UpdateResourceRequest,
    ) -> UpdateResourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return UpdateResourceResponse {
                    new_state: request.planned_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };

        let auto_receptionist_id = match required_id(&request.planned_state, "auto_receptionist_id") {
            Ok(id) => id,
            Err(diag) => {
                diagnostics.push(diag);
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };

        let plan = IvrModel::from_state(&request.planned_state);
        match Self::write_and_read(&provider_data.client, &auto_receptionist_id, &plan).await {
            Ok(new_state) => UpdateResourceResponse {
                new_state,
                private: vec![],
                diagnostics,
            },
            Err((phase, detail)) => {
                diagnostics.push(Diagnostic::error(
                    format!("Error updating phone auto receptionist ivr{}", phase),
                    format!(
                        "Could not update phone auto receptionist ivr {}, unexpected error: {}",
                        auto_receptionist_id, detail
                    ),
                ));
                UpdateResourceResponse {
                    new_state: request.prior_state,
                    private: vec![],
                    diagnostics,
                }
            }
        }
    }

    async fn delete(
        &self,
        _ctx: Context,
        request: DeleteResourceRequest,
    ) -> DeleteResourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return DeleteResourceResponse { diagnostics };
            }
        };

        let auto_receptionist_id = match required_id(&request.prior_state, "auto_receptionist_id") {
            Ok(id) => id,
            Err(diag) => {
                diagnostics.push(diag);
                return DeleteResourceResponse { diagnostics };
            }
        };

        // There is no delete endpoint; restore the defaults instead
        let state = IvrModel::from_state(&request.prior_state);
        match Self::apply(&provider_data.client, &auto_receptionist_id, state.reset_requests()).await {
            Ok(()) => tracing::info!(
                "Reset phone auto receptionist ivr {} (hours_type: {:?}, holiday_id: {:?})",
                auto_receptionist_id,
                state.hours_type.as_deref(),
                state.holiday_id.as_deref()
            ),
            Err(e) => diagnostics.push(Diagnostic::error(
                "Error deleting phone auto receptionist ivr",
                format!(
                    "Could not delete phone auto receptionist ivr {}, unexpected error: {}",
                    auto_receptionist_id, e
                ),
            )),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for AutoReceptionistIvrResource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        let mut diagnostics = vec![];
        match ZoomProviderData::extract(request.provider_data, "resource") {
            Ok(data) => self.provider_data = Some(data),
            Err(diag) => diagnostics.push(diag),
        }
        ConfigureResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithImportState for AutoReceptionistIvrResource {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
            deferred: None,
        };
        import_state_passthrough_id(
            &ctx,
            AttributePath::new("auto_receptionist_id"),
            &request,
            &mut response,
        );
        response
    }
}
