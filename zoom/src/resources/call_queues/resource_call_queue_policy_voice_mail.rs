//! Call queue voicemail access policy resource

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::import::import_state_passthrough_id;
use tfplug::plan_modifier::RequiresReplace;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure,
    ResourceWithImportState, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, NestedType, ObjectNestingMode, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

use crate::api::error::CODE_ABSENT;
use crate::api::phone::call_queues::{VoicemailAccessMember, VoicemailPolicyRequest};
use crate::api::{ApiError, Client};
use crate::resources::{collection, not_configured, object_set, required_id};
use crate::sync::{
    for_each_chunk, found_or_deleted, ok_if_absent, reconcile, same_key, SyncError,
    REMOVE_POLICY_CHUNK,
};
use crate::value::TfValue;
use crate::ZoomProviderData;

const LABEL: &str = "phone call queue policy voice mail";

#[derive(Debug, Clone, Default, PartialEq)]
struct AccessMemberModel {
    access_user_id: TfValue<String>,
    allow_download: TfValue<bool>,
    allow_delete: TfValue<bool>,
    allow_sharing: TfValue<bool>,
    shared_id: TfValue<String>,
}

impl AccessMemberModel {
    fn from_dynamic(value: &Dynamic) -> Self {
        Self {
            access_user_id: TfValue::attr(value, "access_user_id"),
            allow_download: TfValue::attr(value, "allow_download"),
            allow_delete: TfValue::attr(value, "allow_delete"),
            allow_sharing: TfValue::attr(value, "allow_sharing"),
            shared_id: TfValue::attr(value, "shared_id"),
        }
    }

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::object([
            ("access_user_id", self.access_user_id.clone().to_dynamic()),
            ("allow_download", self.allow_download.clone().to_dynamic()),
            ("allow_delete", self.allow_delete.clone().to_dynamic()),
            ("allow_sharing", self.allow_sharing.clone().to_dynamic()),
            ("shared_id", self.shared_id.clone().to_dynamic()),
        ])
    }

    /// Wire form. `shared_id` is only sent when updating an existing entry.
    fn to_wire(&self, shared_id: Option<String>) -> VoicemailAccessMember {
        VoicemailAccessMember {
            access_user_id: self.access_user_id.clone().into_wire(),
            allow_download: self.allow_download.clone().into_wire(),
            allow_delete: self.allow_delete.clone().into_wire(),
            allow_sharing: self.allow_sharing.clone().into_wire(),
            shared_id,
        }
    }
}

impl From<VoicemailAccessMember> for AccessMemberModel {
    fn from(member: VoicemailAccessMember) -> Self {
        Self {
            access_user_id: member.access_user_id.into(),
            allow_download: member.allow_download.into(),
            allow_delete: member.allow_delete.into(),
            allow_sharing: member.allow_sharing.into(),
            shared_id: member.shared_id.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct VoicemailPolicyModel {
    call_queue_id: String,
    access_members: Vec<AccessMemberModel>,
}

impl VoicemailPolicyModel {
    fn from_state(state: &DynamicValue) -> Result<Self, Diagnostic> {
        Ok(Self {
            call_queue_id: required_id(state, "call_queue_id")?,
            access_members: collection(state.value.attribute("access_members"))
                .map(|items| items.iter().map(AccessMemberModel::from_dynamic).collect())
                .unwrap_or_default(),
        })
    }

    fn to_state(&self) -> DynamicValue {
        DynamicValue::new(Dynamic::object([
            ("call_queue_id", Dynamic::from(self.call_queue_id.as_str())),
            (
                "access_members",
                Dynamic::List(self.access_members.iter().map(AccessMemberModel::to_dynamic).collect()),
            ),
        ]))
    }
}

#[derive(Default)]
pub struct CallQueueVoicemailPolicyResource {
    provider_data: Option<ZoomProviderData>,
}

impl CallQueueVoicemailPolicyResource {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Current access entries. A 400 on the call queue means it is gone.
async fn read_members(
    client: &Client,
    call_queue_id: &str,
) -> Result<Option<Vec<VoicemailAccessMember>>, ApiError> {
    let queue = found_or_deleted(
        client.phone().call_queues().get(call_queue_id).await,
        ApiError::is_bad_request,
    )?;
    Ok(queue.map(|queue| {
        queue
            .policy
            .map(|policy| policy.voicemail_access_members)
            .unwrap_or_default()
    }))
}

async fn read_policy(
    client: &Client,
    call_queue_id: &str,
) -> Result<Option<VoicemailPolicyModel>, SyncError> {
    let members = read_members(client, call_queue_id)
        .await
        .map_err(SyncError::remote(format!("unable to read {} {}", LABEL, call_queue_id)))?;
    Ok(members.map(|members| VoicemailPolicyModel {
        call_queue_id: call_queue_id.to_string(),
        access_members: members.into_iter().map(Into::into).collect(),
    }))
}

/// Remove entries by shared id, at most 20 per call. Entries already gone are skipped.
async fn remove_shared_ids(
    client: &Client,
    call_queue_id: &str,
    shared_ids: &[String],
) -> Result<(), SyncError> {
    let context = format!("could not remove {} {}", LABEL, call_queue_id);
    let context = context.as_str();
    for_each_chunk(shared_ids, REMOVE_POLICY_CHUNK, |chunk| async move {
        ok_if_absent(
            client
                .phone()
                .call_queues()
                .remove_voicemail_policy(call_queue_id, chunk)
                .await,
            |e| e.is_bad_request_with(CODE_ABSENT),
        )
        .map_err(SyncError::remote(context))
    })
    .await?;
    Ok(())
}

/// PATCH the given entries. Zoom rejects an empty list, so nothing is sent for one.
async fn update_members(
    client: &Client,
    call_queue_id: &str,
    members: Vec<VoicemailAccessMember>,
) -> Result<(), ApiError> {
    if members.is_empty() {
        tracing::debug!("No voicemail access entries to update on {}", call_queue_id);
        return Ok(());
    }
    client
        .phone()
        .call_queues()
        .update_voicemail_policy(
            call_queue_id,
            &VoicemailPolicyRequest {
                voicemail_access_members: members,
            },
        )
        .await
}

async fn sync(client: &Client, plan: &VoicemailPolicyModel) -> Result<(), SyncError> {
    let call_queue_id = plan.call_queue_id.as_str();

    let current = read_members(client, call_queue_id)
        .await
        .map_err(SyncError::remote(format!(
            "could not sync {} {} on read",
            LABEL, call_queue_id
        )))?
        .ok_or_else(|| SyncError::UnexpectedResponse(format!("call queue not found {}", call_queue_id)))?;

    let diff = reconcile(&current, &plan.access_members, |c, d| {
        same_key(c.access_user_id.as_deref(), d.access_user_id.as_deref())
    });

    let retired: Vec<String> = diff
        .to_remove
        .iter()
        .filter_map(|m| m.shared_id.clone())
        .collect();
    remove_shared_ids(client, call_queue_id, &retired).await?;

    let added: Vec<VoicemailAccessMember> = diff.to_add.iter().map(|m| m.to_wire(None)).collect();
    if !added.is_empty() {
        client
            .phone()
            .call_queues()
            .add_voicemail_policy(
                call_queue_id,
                &VoicemailPolicyRequest {
                    voicemail_access_members: added,
                },
            )
            .await
            .map_err(SyncError::remote(format!(
                "could not sync {} {} on add",
                LABEL, call_queue_id
            )))?;
    }

    let retained: Vec<VoicemailAccessMember> = diff
        .retained
        .iter()
        .map(|(current, desired)| desired.to_wire(current.shared_id.clone()))
        .collect();
    update_members(client, call_queue_id, retained)
        .await
        .map_err(SyncError::remote(format!(
            "could not update {} {} on update",
            LABEL, call_queue_id
        )))?;

    Ok(())
}

fn policy_schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("The voicemail policy sub-setting of a Zoom Phone call queue: who can access the queue's shared voicemail.")
        .attribute(
            AttributeBuilder::new("call_queue_id", AttributeType::String)
                .description("Unique identifier of the call queue.")
                .required()
                .plan_modifier(RequiresReplace::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("access_members", object_set())
                .description("The shared voicemail access member list.")
                .required()
                .nested_type(NestedType {
                    attributes: vec![
                        AttributeBuilder::new("access_user_id", AttributeType::String)
                            .description("The Zoom user ID or email to share the access permissions with.")
                            .required()
                            .build(),
                        AttributeBuilder::new("allow_download", AttributeType::Bool)
                            .description("Whether the member has download permissions.")
                            .required()
                            .build(),
                        AttributeBuilder::new("allow_delete", AttributeType::Bool)
                            .description("Whether the member has delete permissions.")
                            .required()
                            .build(),
                        AttributeBuilder::new("allow_sharing", AttributeType::Bool)
                            .description("Whether the member has the permission to share.")
                            .required()
                            .build(),
                        AttributeBuilder::new("shared_id", AttributeType::String)
                            .description("Identifier Zoom assigns to the access entry.")
                            .computed()
                            .build(),
                    ],
                    nesting: ObjectNestingMode::Set,
                })
                .build(),
        )
        .build()
}

#[async_trait]
impl Resource for CallQueueVoicemailPolicyResource {
    fn type_name(&self) -> &str {
        "zoom_phone_call_queue_policy_voice_mail"
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
        ResourceSchemaResponse {
            schema: policy_schema(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: policy_schema().validate(&request.config),
        }
    }

    async fn create(
        &self,
        _ctx: Context,
        request: CreateResourceRequest,
    ) -> CreateResourceResponse {
        match self.apply(&request.planned_state, "creating").await {
            Ok(new_state) => CreateResourceResponse {
                new_state,
                private: vec![],
                diagnostics: vec![],
            },
            Err(diag) => CreateResourceResponse {
                new_state: request.planned_state,
                private: vec![],
                diagnostics: vec![diag],
            },
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

        let call_queue_id = match required_id(&request.current_state, "call_queue_id") {
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

        match read_policy(&provider_data.client, &call_queue_id).await {
            Ok(Some(model)) => ReadResourceResponse {
                new_state: Some(model.to_state()),
                diagnostics,
                private: request.private,
                deferred: None,
            },
            Ok(None) => ReadResourceResponse {
                new_state: None,
                diagnostics,
                private: request.private,
                deferred: None,
            },
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!("Error reading {}", LABEL),
                    e.to_string(),
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
        match self.apply(&request.planned_state, "updating").await {
            Ok(new_state) => UpdateResourceResponse {
                new_state,
                private: vec![],
                diagnostics: vec![],
            },
            Err(diag) => UpdateResourceResponse {
                new_state: request.prior_state,
                private: vec![],
                diagnostics: vec![diag],
            },
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

        let call_queue_id = match required_id(&request.prior_state, "call_queue_id") {
            Ok(id) => id,
            Err(diag) => {
                diagnostics.push(diag);
                return DeleteResourceResponse { diagnostics };
            }
        };

        let client = provider_data.client.as_ref();
        let members = match read_members(client, &call_queue_id).await {
            Ok(Some(members)) => members,
            Ok(None) => return DeleteResourceResponse { diagnostics },
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!("Error deleting {} on read", LABEL),
                    format!(
                        "Could not delete phone call queue policy {}, unexpected error: {}",
                        call_queue_id, e
                    ),
                ));
                return DeleteResourceResponse { diagnostics };
            }
        };

        let shared_ids: Vec<String> = members.into_iter().filter_map(|m| m.shared_id).collect();
        if let Err(e) = remove_shared_ids(client, &call_queue_id, &shared_ids).await {
            diagnostics.push(Diagnostic::error(
                format!("Error deleting {}", LABEL),
                format!(
                    "Could not delete phone call queue policy {}, unexpected error: {}",
                    call_queue_id, e
                ),
            ));
        } else {
            tracing::info!("Deleted {} for call queue {}", LABEL, call_queue_id);
        }

        DeleteResourceResponse { diagnostics }
    }
}

impl CallQueueVoicemailPolicyResource {
    async fn apply(&self, planned_state: &DynamicValue, action: &str) -> Result<DynamicValue, Diagnostic> {
        let provider_data = self.provider_data.as_ref().ok_or_else(not_configured)?;
        let client = provider_data.client.as_ref();
        let plan = VoicemailPolicyModel::from_state(planned_state)?;

        sync(client, &plan)
            .await
            .map_err(|e| Diagnostic::error(format!("Error {} {}", action, LABEL), e.to_string()))?;

        match read_policy(client, &plan.call_queue_id).await {
            Ok(Some(model)) => Ok(model.to_state()),
            Ok(None) => Err(Diagnostic::error(
                format!("Error {} {} on reading", action, LABEL),
                format!("call queue not found {}", plan.call_queue_id),
            )),
            Err(e) => Err(Diagnostic::error(
                format!("Error {} {} on reading", action, LABEL),
                e.to_string(),
            )),
        }
    }
}

#[async_trait]
impl ResourceWithConfigure for CallQueueVoicemailPolicyResource {
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
impl ResourceWithImportState for CallQueueVoicemailPolicyResource {
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
        import_state_passthrough_id(&ctx, AttributePath::new("call_queue_id"), &request, &mut response);
        response
    }
}
