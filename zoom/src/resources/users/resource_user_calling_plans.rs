//! Calling plans assigned to a phone user

use async_trait::async_trait;
use futures::future::join_all;
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
use tfplug::schema::{
    Attribute, AttributeBuilder, AttributeType, NestedType, ObjectNestingMode, Schema,
    SchemaBuilder,
};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::NumberOneOfValidator;

use crate::api::phone::users::{AssignCallingPlansRequest, CallingPlan, CallingPlanRef};
use crate::api::{ApiError, Client};
use crate::calling_plans::{codes, name_of, CallingPlanTable, CALLING_PLANS};
use crate::resources::{collection, not_configured, object_set, required_id};
use crate::sync::{found_or_deleted, ok_if_absent, SyncError};
use crate::value::TfValue;
use crate::ZoomProviderData;

#[derive(Debug, Clone, Default, PartialEq)]
struct CallingPlanModel {
    plan_type: TfValue<i64>,
    billing_account_id: TfValue<String>,
    name: TfValue<String>,
}

impl CallingPlanModel {
    fn from_dynamic(value: &Dynamic) -> Self {
        Self {
            plan_type: TfValue::attr(value, "type"),
            billing_account_id: TfValue::attr(value, "billing_account_id"),
            name: TfValue::attr(value, "name"),
        }
    }

    fn from_remote(plan: CallingPlan, table: CallingPlanTable) -> Self {
        let name = plan
            .name
            .or_else(|| plan.plan_type.and_then(|code| name_of(table, code)).map(str::to_string));
        Self {
            plan_type: plan.plan_type.into(),
            billing_account_id: plan.billing_account_id.into(),
            name: name.into(),
        }
    }

    fn to_dynamic(&self) -> Dynamic {
        Dynamic::object([
            ("type", self.plan_type.clone().to_dynamic()),
            ("billing_account_id", self.billing_account_id.clone().to_dynamic()),
            ("name", self.name.clone().to_dynamic()),
        ])
    }

    /// Plans without a known type cannot be sent and are skipped
    fn to_ref(&self) -> Option<CallingPlanRef> {
        self.plan_type.as_known().map(|plan_type| CallingPlanRef {
            plan_type: *plan_type,
            billing_account_id: self.billing_account_id.clone().into_wire(),
        })
    }
}

fn plans_from_state(state: &DynamicValue) -> Vec<CallingPlanModel> {
    collection(state.value.attribute("calling_plans"))
        .map(|plans| plans.iter().map(CallingPlanModel::from_dynamic).collect())
        .unwrap_or_default()
}

fn plans_to_state(user_id: &str, plans: &[CallingPlanModel]) -> DynamicValue {
    DynamicValue::new(Dynamic::object([
        ("user_id", Dynamic::from(user_id)),
        (
            "calling_plans",
            Dynamic::List(plans.iter().map(CallingPlanModel::to_dynamic).collect()),
        ),
    ]))
}

pub struct UserCallingPlansResource {
    provider_data: Option<ZoomProviderData>,
    plans: CallingPlanTable,
}

impl Default for UserCallingPlansResource {
    fn default() -> Self {
        Self::with_table(CALLING_PLANS)
    }
}

impl UserCallingPlansResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different calling plan table for validation and names
    pub fn with_table(plans: CallingPlanTable) -> Self {
        Self {
            provider_data: None,
            plans,
        }
    }

    fn plans_schema(&self) -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Assigns calling plans to a Zoom Phone user.")
            .attribute(
                AttributeBuilder::new("user_id", AttributeType::String)
                    .description("The ID of the Zoom user.")
                    .required()
                    .plan_modifier(RequiresReplace::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("calling_plans", object_set())
                    .description("Calling plans assigned to the user.")
                    .required()
                    .nested_type(NestedType {
                        attributes: self.calling_plan_attributes(),
                        nesting: ObjectNestingMode::Set,
                    })
                    .build(),
            )
            .build()
    }

    fn calling_plan_attributes(&self) -> Vec<Attribute> {
        vec![
            AttributeBuilder::new("type", AttributeType::Number)
                .description("The calling plan type code.")
                .required()
                .validator(NumberOneOfValidator::create(codes(self.plans)))
                .build(),
            AttributeBuilder::new("billing_account_id", AttributeType::String)
                .description("The billing account ID. Required for users located in India.")
                .optional()
                .build(),
            AttributeBuilder::new("name", AttributeType::String)
                .description("The name of the calling plan.")
                .computed()
                .build(),
        ]
    }

    async fn read_plans(
        &self,
        client: &Client,
        user_id: &str,
    ) -> Result<Option<Vec<CallingPlanModel>>, ApiError> {
        let profile = found_or_deleted(
            client.phone().users().get(user_id).await,
            ApiError::is_not_found,
        )?;
        Ok(profile.map(|profile| {
            profile
                .calling_plans
                .into_iter()
                .map(|plan| CallingPlanModel::from_remote(plan, self.plans))
                .collect()
        }))
    }

    async fn assign(
        client: &Client,
        user_id: &str,
        plans: &[CallingPlanModel],
    ) -> Result<(), ApiError> {
        let calling_plans: Vec<_> = plans.iter().filter_map(CallingPlanModel::to_ref).collect();
        if calling_plans.is_empty() {
            return Ok(());
        }
        client
            .phone()
            .users()
            .assign_calling_plans(user_id, &AssignCallingPlansRequest { calling_plans })
            .await
    }

    /// Unassign every plan concurrently. A plan already gone counts as removed.
    async fn unassign(
        client: &Client,
        user_id: &str,
        plans: &[CallingPlanModel],
    ) -> Result<(), SyncError> {
        let users = client.phone().users();
        let removals = plans.iter().filter_map(CallingPlanModel::to_ref).map(|plan| {
            let users = &users;
            async move {
                let result = users
                    .unassign_calling_plan(user_id, plan.plan_type, plan.billing_account_id.as_deref())
                    .await;
                ok_if_absent(result, ApiError::is_not_found).map_err(SyncError::remote(format!(
                    "could not unassign calling plan {} from user {}",
                    plan.plan_type, user_id
                )))
            }
        });

        let errors = join_all(removals)
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect();
        match SyncError::join(errors) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn read_back(
        &self,
        client: &Client,
        user_id: &str,
        summary: &str,
    ) -> Result<DynamicValue, Diagnostic> {
        match self.read_plans(client, user_id).await {
            Ok(Some(plans)) => Ok(plans_to_state(user_id, &plans)),
            Ok(None) => Err(Diagnostic::error(
                summary,
                format!("phone user {} not found", user_id),
            )),
            Err(e) => Err(Diagnostic::error(summary, format!("API error: {}", e))),
        }
    }
}

#[async_trait]
impl Resource for UserCallingPlansResource {
    fn type_name(&self) -> &str {
        "zoom_phone_user_calling_plans"
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
            schema: self.plans_schema(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: self.plans_schema().validate(&request.config),
        }
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

        let user_id = match required_id(&request.planned_state, "user_id") {
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

        let client = provider_data.client.as_ref();
        let plans = plans_from_state(&request.planned_state);

        if let Err(e) = Self::assign(client, &user_id, &plans).await {
            diagnostics.push(Diagnostic::error(
                "Error creating phone calling plan of the user",
                format!("API error: {}", e),
            ));
            return CreateResourceResponse {
                new_state: request.planned_state,
                private: vec![],
                diagnostics,
            };
        }
        tracing::info!("Assigned {} calling plans to user {}", plans.len(), user_id);

        match self
            .read_back(client, &user_id, "Error reading phone calling plan of the user on creating")
            .await
        {
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

        let user_id = match required_id(&request.current_state, "user_id") {
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

        match self.read_plans(&provider_data.client, &user_id).await {
            Ok(Some(plans)) => ReadResourceResponse {
                new_state: Some(plans_to_state(&user_id, &plans)),
                diagnostics,
                private: request.private,
                deferred: None,
            },
            Ok(None) => {
                tracing::info!("Phone user {} no longer exists, removing from state", user_id);
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: request.private,
                    deferred: None,
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Error reading phone calling plan of the user",
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

        let user_id = match required_id(&request.planned_state, "user_id") {
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
        let prior = plans_from_state(&request.prior_state);
        let planned = plans_from_state(&request.planned_state);

        if let Err(e) = Self::unassign(client, &user_id, &prior).await {
            diagnostics.push(Diagnostic::error(
                "Error deleting phone calling plan of the user on updating",
                e.to_string(),
            ));
            return UpdateResourceResponse {
                new_state: request.prior_state,
                private: vec![],
                diagnostics,
            };
        }

        if let Err(e) = Self::assign(client, &user_id, &planned).await {
            diagnostics.push(Diagnostic::error(
                "Error creating phone calling plan of the user on updating",
                format!("API error: {}", e),
            ));
            return UpdateResourceResponse {
                new_state: request.prior_state,
                private: vec![],
                diagnostics,
            };
        }

        match self
            .read_back(client, &user_id, "Error reading phone calling plan of the user on updating")
            .await
        {
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

        let user_id = match required_id(&request.prior_state, "user_id") {
            Ok(id) => id,
            Err(diag) => {
                diagnostics.push(diag);
                return DeleteResourceResponse { diagnostics };
            }
        };

        let plans = plans_from_state(&request.prior_state);
        if let Err(e) = Self::unassign(&provider_data.client, &user_id, &plans).await {
            diagnostics.push(Diagnostic::error(
                "Error deleting phone calling plan of the user",
                format!(
                    "Could not delete phone calling plan of the user {}, unexpected error: {}",
                    user_id, e
                ),
            ));
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for UserCallingPlansResource {
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
impl ResourceWithImportState for UserCallingPlansResource {
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
        import_state_passthrough_id(&ctx, AttributePath::new("user_id"), &request, &mut response);
        response
    }
}
