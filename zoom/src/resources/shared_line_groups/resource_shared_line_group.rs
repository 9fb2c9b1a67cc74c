//! Shared line group resource

use std::time::Duration;

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
use tfplug::import::import_state_passthrough_id;
use tfplug::plan_modifier::{RequiresReplace, UseStateForUnknown};
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure,
    ResourceWithImportState, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::{StringLengthValidator, StringOneOfValidator};

use crate::api::error::CODE_ABSENT;
use crate::api::phone::shared_line_groups::{
    CreateSharedLineGroupRequest, SharedLineGroup, UpdateSharedLineGroupRequest,
};
use crate::api::{ApiError, Client};
use crate::resources::{not_configured, required_id};
use crate::sync::{found_or_deleted, ok_if_absent};
use crate::value::TfValue;
use crate::wait::{wait_for, Poll, WaitError};
use crate::ZoomProviderData;

/// How long a new group may take to become readable
const CREATE_TIMEOUT: Duration = Duration::from_secs(60);
const CREATE_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Flat view of a shared line group, shared with the data source
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SharedLineGroupModel {
    pub id: TfValue<String>,
    pub display_name: TfValue<String>,
    pub extension_id: TfValue<String>,
    pub extension_number: TfValue<i64>,
    pub primary_number: TfValue<String>,
    pub site_id: TfValue<String>,
    pub status: TfValue<String>,
}

impl SharedLineGroupModel {
    fn from_state(state: &DynamicValue) -> Self {
        let value = &state.value;
        Self {
            id: TfValue::attr(value, "id"),
            display_name: TfValue::attr(value, "display_name"),
            extension_id: TfValue::attr(value, "extension_id"),
            extension_number: TfValue::attr(value, "extension_number"),
            primary_number: TfValue::attr(value, "primary_number"),
            site_id: TfValue::attr(value, "site_id"),
            status: TfValue::attr(value, "status"),
        }
    }

    pub(crate) fn to_state(&self) -> DynamicValue {
        DynamicValue::new(Dynamic::object([
            ("id", self.id.clone().to_dynamic()),
            ("display_name", self.display_name.clone().to_dynamic()),
            ("extension_id", self.extension_id.clone().to_dynamic()),
            ("extension_number", self.extension_number.clone().to_dynamic()),
            ("primary_number", self.primary_number.clone().to_dynamic()),
            ("site_id", self.site_id.clone().to_dynamic()),
            ("status", self.status.clone().to_dynamic()),
        ]))
    }

    /// Fields only the update endpoint accepts
    fn to_update_request(&self) -> UpdateSharedLineGroupRequest {
        UpdateSharedLineGroupRequest {
            display_name: self.display_name.clone().into_wire(),
            extension_number: self.extension_number.clone().into_wire(),
            status: self.status.clone().into_wire(),
            primary_number: None,
        }
    }
}

impl From<SharedLineGroup> for SharedLineGroupModel {
    fn from(group: SharedLineGroup) -> Self {
        Self {
            id: group.id.into(),
            display_name: group.display_name.into(),
            extension_id: group.extension_id.into(),
            extension_number: group.extension_number.into(),
            primary_number: group.primary_number.into(),
            site_id: group.site.and_then(|site| site.id).into(),
            status: group.status.into(),
        }
    }
}

/// Fetch a group. A 400 with code 300 means it is gone.
pub(crate) async fn read_group(
    client: &Client,
    group_id: &str,
) -> Result<Option<SharedLineGroupModel>, ApiError> {
    let group = found_or_deleted(
        client.phone().shared_line_groups().get(group_id).await,
        ApiError::is_deleted_on_read,
    )?;
    Ok(group.map(Into::into))
}

#[derive(Default)]
pub struct SharedLineGroupResource {
    provider_data: Option<ZoomProviderData>,
}

impl SharedLineGroupResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create, wait until readable, then apply the update-only fields.
    /// Returns the new group id.
    async fn create_group(
        ctx: &Context,
        client: &Client,
        plan: &SharedLineGroupModel,
    ) -> Result<String, Diagnostic> {
        let request = CreateSharedLineGroupRequest {
            display_name: plan.display_name.as_deref().unwrap_or_default().to_string(),
            description: None,
            extension_number: plan.extension_number.clone().into_wire(),
            site_id: plan.site_id.clone().into_wire(),
        };
        let groups = client.phone().shared_line_groups();

        let created = groups.create(&request).await.map_err(|e| {
            Diagnostic::error(
                "Error creating phone shared line group",
                format!("API error: {}", e),
            )
        })?;
        let group_id = created.id.ok_or_else(|| {
            Diagnostic::error(
                "Error creating phone shared line group",
                "The API response did not include an id",
            )
        })?;
        tracing::info!("Created phone shared line group {}", group_id);

        let wait_ctx = ctx.clone().with_timeout(CREATE_TIMEOUT);
        let id = group_id.as_str();
        let readable = wait_for(&wait_ctx, CREATE_POLL_INTERVAL, move || async move {
            Ok(match read_group(client, id).await? {
                Some(_) => Poll::Ready,
                None => Poll::Pending,
            })
        })
        .await;

        let updated = match readable {
            Ok(()) => groups
                .update(&group_id, &plan.to_update_request())
                .await
                .map_err(|e| format!("API error: {}", e)),
            Err(WaitError::Check(e)) => Err(format!("API error: {}", e)),
            Err(e) => Err(format!("shared line group {} did not become readable: {}", group_id, e)),
        };

        if let Err(detail) = updated {
            if let Err(e) = groups.delete(&group_id).await {
                tracing::warn!("Could not clean up shared line group {}: {}", group_id, e);
            }
            return Err(Diagnostic::error(
                "Error creating phone shared line group on updating",
                detail,
            ));
        }

        Ok(group_id)
    }

    async fn read_back(client: &Client, group_id: &str, summary: &str) -> Result<DynamicValue, Diagnostic> {
        match read_group(client, group_id).await {
            Ok(Some(model)) => Ok(model.to_state()),
            Ok(None) => Err(Diagnostic::error(
                summary,
                format!("shared line group {} not found", group_id),
            )),
            Err(e) => Err(Diagnostic::error(summary, format!("API error: {}", e))),
        }
    }
}

fn group_schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("A shared line group lets phone users or common areas share a phone number and extension.")
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .description("The unique identifier of the shared line group.")
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("display_name", AttributeType::String)
                .description("The name to identify the shared line group.")
                .required()
                .validator(StringLengthValidator::at_most(200))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("extension_id", AttributeType::String)
                .description("Extension ID.")
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("extension_number", AttributeType::Number)
                .description("Extension number of the shared line group.")
                .required()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("primary_number", AttributeType::String)
                .description("The primary number used for desk phones when several direct numbers are assigned.")
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("site_id", AttributeType::String)
                .description("Unique identifier of the site the shared line group is assigned to.")
                .optional()
                .plan_modifier(RequiresReplace::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("status", AttributeType::String)
                .description("The status of the shared line group, `active` or `inactive`.")
                .optional()
                .computed()
                .default(StaticDefault::string("active"))
                .validator(StringOneOfValidator::create(&["active", "inactive"]))
                .build(),
        )
        .build()
}

#[async_trait]
impl Resource for SharedLineGroupResource {
    fn type_name(&self) -> &str {
        "zoom_phone_shared_line_group"
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
            schema: group_schema(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: group_schema().validate(&request.config),
        }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
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

        let client = provider_data.client.as_ref();
        let plan = SharedLineGroupModel::from_state(&request.planned_state);

        let result = match Self::create_group(&ctx, client, &plan).await {
            Ok(group_id) => {
                Self::read_back(client, &group_id, "Error creating phone shared line group on reading").await
            }
            Err(diag) => Err(diag),
        };

        match result {
            Ok(new_state) => CreateResourceResponse {
                new_state,
                private: vec![],
                diagnostics,
            },
            Err(diag) => {
                diagnostics.push(diag);
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

        let group_id = match required_id(&request.current_state, "id") {
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

        match read_group(&provider_data.client, &group_id).await {
            Ok(Some(model)) => ReadResourceResponse {
                new_state: Some(model.to_state()),
                diagnostics,
                private: request.private,
                deferred: None,
            },
            Ok(None) => {
                tracing::info!("Shared line group {} no longer exists, removing from state", group_id);
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: request.private,
                    deferred: None,
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Error reading phone shared line group",
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

        let group_id = match required_id(&request.prior_state, "id") {
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

        let client = provider_data.client.as_ref();
        let plan = SharedLineGroupModel::from_state(&request.planned_state);

        if let Err(e) = client
            .phone()
            .shared_line_groups()
            .update(&group_id, &plan.to_update_request())
            .await
        {
            diagnostics.push(Diagnostic::error(
                "Error updating phone shared line group",
                format!(
                    "Could not update phone shared line group {}, unexpected error: {}",
                    group_id, e
                ),
            ));
            return UpdateResourceResponse {
                new_state: request.prior_state,
                private: vec![],
                diagnostics,
            };
        }

        match Self::read_back(client, &group_id, "Error updating phone shared line group").await {
            Ok(new_state) => UpdateResourceResponse {
                new_state,
                private: vec![],
                diagnostics,
            },
            Err(diag) => {
                diagnostics.push(diag);
                UpdateResourceResponse {
                    new_state: request.planned_state,
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

        let group_id = match required_id(&request.prior_state, "id") {
            Ok(id) => id,
            Err(diag) => {
                diagnostics.push(diag);
                return DeleteResourceResponse { diagnostics };
            }
        };

        let result = ok_if_absent(
            provider_data
                .client
                .phone()
                .shared_line_groups()
                .delete(&group_id)
                .await,
            |e| e.is_bad_request_with(CODE_ABSENT),
        );
        match result {
            Ok(()) => tracing::info!("Deleted phone shared line group {}", group_id),
            Err(e) => diagnostics.push(Diagnostic::error(
                "Error deleting phone shared line group",
                format!(
                    "Could not delete phone shared line group {}, unexpected error: {}",
                    group_id, e
                ),
            )),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for SharedLineGroupResource {
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
impl ResourceWithImportState for SharedLineGroupResource {
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
        import_state_passthrough_id(&ctx, AttributePath::new("id"), &request, &mut response);
        response
    }
}
