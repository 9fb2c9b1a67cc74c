//! Phone number assignments of call queues, shared line groups and users
//!
//! The three parents share the assign and unassign shape. [`NumberAssignments`]
//! supplies the endpoints and says whether the parent reports a number source
//! or owns a primary number.

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
use tfplug::schema::{
    Attribute, AttributeBuilder, AttributeType, NestedType, ObjectNestingMode, Schema,
    SchemaBuilder,
};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

use super::{collection, keep_null, not_configured, object_set, required_id};
use crate::api::phone::{AssignPhoneNumbersRequest, AssignedPhoneNumber, PhoneNumberRef};
use crate::api::{ApiError, Client};
use crate::sync::{
    for_each_chunk, ok_if_absent, reconcile, same_key, SyncError, ASSIGN_PHONE_NUMBERS_CHUNK,
};
use crate::value::TfValue;
use crate::ZoomProviderData;

/// Numbers currently assigned to a parent
#[derive(Debug, Clone, Default)]
pub struct RemoteNumbers {
    pub numbers: Vec<AssignedPhoneNumber>,
    pub primary_number: Option<String>,
}

#[async_trait]
pub trait NumberAssignments: Default + Send + Sync + 'static {
    const TYPE_NAME: &'static str;
    const PARENT_ID: &'static str;
    const LABEL: &'static str;
    const PARENT_LABEL: &'static str;
    const DESCRIPTION: &'static str;
    /// Entries expose the computed `source` attribute
    const HAS_SOURCE: bool = false;
    /// The resource manages the parent's `primary_number`
    const HAS_PRIMARY: bool = false;

    /// Current numbers, or `None` when the parent no longer exists
    async fn list(&self, client: &Client, parent_id: &str) -> Result<Option<RemoteNumbers>, ApiError>;

    async fn assign(
        &self,
        client: &Client,
        parent_id: &str,
        request: &AssignPhoneNumbersRequest,
    ) -> Result<(), ApiError>;

    async fn unassign(&self, client: &Client, parent_id: &str, number_id: &str)
        -> Result<(), ApiError>;

    /// Remove every assignment. Parents without a bulk endpoint unassign one by one.
    async fn unassign_all(&self, client: &Client, parent_id: &str) -> Result<(), ApiError> {
        let Some(current) = self.list(client, parent_id).await? else {
            return Ok(());
        };
        for id in current.numbers.iter().filter_map(|n| n.id.as_deref()) {
            ok_if_absent(self.unassign(client, parent_id, id).await, ApiError::is_not_found)?;
        }
        Ok(())
    }

    async fn set_primary(
        &self,
        _client: &Client,
        _parent_id: &str,
        _number: &str,
    ) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhoneNumberModel {
    pub id: TfValue<String>,
    pub number: TfValue<String>,
    pub source: TfValue<String>,
}

impl PhoneNumberModel {
    fn from_dynamic(value: &Dynamic) -> Self {
        Self {
            id: TfValue::attr(value, "id"),
            number: TfValue::attr(value, "number"),
            source: TfValue::attr(value, "source"),
        }
    }

    fn from_remote(number: AssignedPhoneNumber, with_source: bool) -> Self {
        Self {
            id: number.id.into(),
            number: number.number.into(),
            source: if with_source {
                number.source.into()
            } else {
                TfValue::Null
            },
        }
    }

    fn to_dynamic(&self, with_source: bool) -> Dynamic {
        let mut attributes = vec![
            ("id", self.id.clone().to_dynamic()),
            ("number", self.number.clone().to_dynamic()),
        ];
        if with_source {
            attributes.push(("source", self.source.clone().to_dynamic()));
        }
        Dynamic::object(attributes)
    }

    fn known_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|s| !s.is_empty())
    }

    fn known_number(&self) -> Option<&str> {
        self.number.as_deref().filter(|s| !s.is_empty())
    }
}

fn same_number(current: &AssignedPhoneNumber, desired: &PhoneNumberModel) -> bool {
    same_key(current.id.as_deref(), desired.id.as_deref())
        || same_key(current.number.as_deref(), desired.number.as_deref())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhoneNumbersModel {
    pub parent_id: String,
    pub phone_numbers: Option<Vec<PhoneNumberModel>>,
    pub primary_number: TfValue<String>,
}

impl PhoneNumbersModel {
    fn from_state(state: &DynamicValue, parent_attr: &str) -> Result<Self, Diagnostic> {
        Ok(Self {
            parent_id: required_id(state, parent_attr)?,
            phone_numbers: collection(state.value.attribute("phone_numbers"))
                .map(|items| items.iter().map(PhoneNumberModel::from_dynamic).collect()),
            primary_number: TfValue::attr(&state.value, "primary_number"),
        })
    }

    fn to_state<T: NumberAssignments>(&self) -> DynamicValue {
        let numbers = match &self.phone_numbers {
            Some(numbers) => Dynamic::List(
                numbers
                    .iter()
                    .map(|n| n.to_dynamic(T::HAS_SOURCE))
                    .collect(),
            ),
            None => Dynamic::Null,
        };
        let mut attributes = vec![
            (T::PARENT_ID, Dynamic::from(self.parent_id.as_str())),
            ("phone_numbers", numbers),
        ];
        if T::HAS_PRIMARY {
            attributes.push(("primary_number", self.primary_number.clone().to_dynamic()));
        }
        DynamicValue::new(Dynamic::object(attributes))
    }
}

/// Checks that need no remote call
fn validate_plan(plan: &PhoneNumbersModel, with_primary: bool) -> Result<(), SyncError> {
    let numbers = plan.phone_numbers.as_deref().unwrap_or_default();

    if numbers
        .iter()
        .any(|n| n.known_id().is_none() && n.known_number().is_none())
    {
        return Err(SyncError::validation(
            "either `id` or `number` must be specified on phone number",
        ));
    }

    if with_primary {
        if let Some(primary) = plan.primary_number.as_known() {
            if !numbers.iter().any(|n| n.known_number() == Some(primary.as_str())) {
                return Err(SyncError::validation(format!(
                    "primary number {} must be included in phone_numbers",
                    primary
                )));
            }
        }
    }

    Ok(())
}

#[derive(Default)]
pub struct PhoneNumbersResource<T: NumberAssignments> {
    assignments: T,
    provider_data: Option<ZoomProviderData>,
}

impl<T: NumberAssignments> PhoneNumbersResource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn read_model(
        &self,
        client: &Client,
        prior: &PhoneNumbersModel,
    ) -> Result<Option<PhoneNumbersModel>, SyncError> {
        let remote = self
            .assignments
            .list(client, &prior.parent_id)
            .await
            .map_err(SyncError::remote(format!(
                "unable to read {} {}",
                T::LABEL,
                prior.parent_id
            )))?;

        Ok(remote.map(|remote| {
            let numbers: Vec<PhoneNumberModel> = remote
                .numbers
                .into_iter()
                .map(|n| PhoneNumberModel::from_remote(n, T::HAS_SOURCE))
                .collect();
            PhoneNumbersModel {
                parent_id: prior.parent_id.clone(),
                phone_numbers: keep_null(prior.phone_numbers.is_none(), numbers),
                primary_number: remote.primary_number.into(),
            }
        }))
    }

    /// Unassign what the plan dropped, assign what it added, then set the primary number
    pub(crate) async fn sync(&self, client: &Client, plan: &PhoneNumbersModel) -> Result<(), SyncError> {
        validate_plan(plan, T::HAS_PRIMARY)?;

        let parent_id = plan.parent_id.as_str();
        let context = format!("could not sync {} {}", T::LABEL, parent_id);

        let current = self
            .assignments
            .list(client, parent_id)
            .await
            .map_err(SyncError::remote(context.as_str()))?
            .ok_or_else(|| {
                SyncError::UnexpectedResponse(format!("{} not found {}", T::PARENT_LABEL, parent_id))
            })?;

        let desired = plan.phone_numbers.as_deref().unwrap_or_default();
        let diff = reconcile(&current.numbers, desired, same_number);
        tracing::debug!(
            "Syncing {} {}: unassigning {}, assigning {}",
            T::LABEL,
            parent_id,
            diff.to_remove.len(),
            diff.to_add.len()
        );

        for number in &diff.to_remove {
            let Some(id) = number.id.as_deref() else {
                continue;
            };
            ok_if_absent(
                self.assignments.unassign(client, parent_id, id).await,
                ApiError::is_not_found,
            )
            .map_err(SyncError::remote(context.as_str()))?;
        }

        let by_id: Vec<PhoneNumberRef> = diff
            .to_add
            .iter()
            .filter_map(|n| n.known_id().map(PhoneNumberRef::by_id))
            .collect();
        let by_number: Vec<PhoneNumberRef> = diff
            .to_add
            .iter()
            .filter(|n| n.known_id().is_none())
            .filter_map(|n| n.known_number().map(PhoneNumberRef::by_number))
            .collect();

        let assignments = &self.assignments;
        let context = context.as_str();
        for refs in [&by_id, &by_number] {
            for_each_chunk(refs, ASSIGN_PHONE_NUMBERS_CHUNK, |chunk| async move {
                let request = AssignPhoneNumbersRequest {
                    phone_numbers: chunk.to_vec(),
                };
                assignments
                    .assign(client, parent_id, &request)
                    .await
                    .map_err(SyncError::remote(context))
            })
            .await?;
        }

        if T::HAS_PRIMARY {
            if let Some(primary) = plan.primary_number.as_known() {
                assignments
                    .set_primary(client, parent_id, primary)
                    .await
                    .map_err(SyncError::remote(context))?;
            }
        }

        Ok(())
    }

    async fn apply(&self, planned_state: &DynamicValue, action: &str) -> Result<DynamicValue, Diagnostic> {
        let provider_data = self.provider_data.as_ref().ok_or_else(not_configured)?;
        let client = provider_data.client.as_ref();
        let plan = PhoneNumbersModel::from_state(planned_state, T::PARENT_ID)?;

        self.sync(client, &plan).await.map_err(|e| {
            Diagnostic::error(format!("Error {} {}", action, T::LABEL), e.to_string())
        })?;

        match self.read_model(client, &plan).await {
            Ok(Some(model)) => Ok(model.to_state::<T>()),
            Ok(None) => Err(Diagnostic::error(
                format!("Error {} {} on reading", action, T::LABEL),
                format!("{} not found {}", T::PARENT_LABEL, plan.parent_id),
            )),
            Err(e) => Err(Diagnostic::error(
                format!("Error {} {} on reading", action, T::LABEL),
                e.to_string(),
            )),
        }
    }
}

fn numbers_schema<T: NumberAssignments>() -> Schema {
    let mut builder = SchemaBuilder::new()
        .version(0)
        .description(T::DESCRIPTION)
        .attribute(
            AttributeBuilder::new(T::PARENT_ID, AttributeType::String)
                .description(&format!("Unique identifier of the {}.", T::PARENT_LABEL))
                .required()
                .plan_modifier(RequiresReplace::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("phone_numbers", object_set())
                .description("Assigned phone numbers. Identify each by `id` or `number`.")
                .optional()
                .nested_type(NestedType {
                    attributes: number_attributes(T::HAS_SOURCE),
                    nesting: ObjectNestingMode::Set,
                })
                .build(),
        );

    if T::HAS_PRIMARY {
        builder = builder.attribute(
            AttributeBuilder::new("primary_number", AttributeType::String)
                .description("Primary phone number. Must be one of `phone_numbers`.")
                .required()
                .build(),
        );
    }

    builder.build()
}

fn number_attributes(with_source: bool) -> Vec<Attribute> {
    let mut attributes = vec![
        AttributeBuilder::new("id", AttributeType::String)
            .description("Phone number ID.")
            .optional()
            .computed()
            .build(),
        AttributeBuilder::new("number", AttributeType::String)
            .description("Phone number in E164 format.")
            .optional()
            .computed()
            .build(),
    ];
    if with_source {
        attributes.push(
            AttributeBuilder::new("source", AttributeType::String)
                .description("Source of the phone number, `internal` or `external`.")
                .computed()
                .build(),
        );
    }
    attributes
}

#[async_trait]
impl<T: NumberAssignments> Resource for PhoneNumbersResource<T> {
    fn type_name(&self) -> &str {
        T::TYPE_NAME
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
            schema: numbers_schema::<T>(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        let mut diagnostics = numbers_schema::<T>().validate(&request.config);

        let Some(items) = collection(request.config.value.attribute("phone_numbers")) else {
            return ValidateResourceConfigResponse { diagnostics };
        };
        let numbers: Vec<PhoneNumberModel> = items.iter().map(PhoneNumberModel::from_dynamic).collect();
        let fully_known = numbers
            .iter()
            .all(|n| !n.id.is_unknown() && !n.number.is_unknown());
        if !fully_known {
            return ValidateResourceConfigResponse { diagnostics };
        }

        let plan = PhoneNumbersModel {
            parent_id: String::new(),
            phone_numbers: Some(numbers),
            primary_number: TfValue::attr(&request.config.value, "primary_number"),
        };
        if let Err(e) = validate_plan(&plan, T::HAS_PRIMARY) {
            diagnostics.push(
                Diagnostic::error("Invalid phone numbers", e.to_string())
                    .with_attribute(AttributePath::new("phone_numbers")),
            );
        }

        ValidateResourceConfigResponse { diagnostics }
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

        let prior = match PhoneNumbersModel::from_state(&request.current_state, T::PARENT_ID) {
            Ok(prior) => prior,
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

        match self.read_model(&provider_data.client, &prior).await {
            Ok(Some(model)) => ReadResourceResponse {
                new_state: Some(model.to_state::<T>()),
                diagnostics,
                private: request.private,
                deferred: None,
            },
            Ok(None) => {
                tracing::info!(
                    "{} {} no longer exists, removing from state",
                    T::PARENT_LABEL,
                    prior.parent_id
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
                    format!("Error reading {}", T::LABEL),
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

        let parent_id = match required_id(&request.prior_state, T::PARENT_ID) {
            Ok(id) => id,
            Err(diag) => {
                diagnostics.push(diag);
                return DeleteResourceResponse { diagnostics };
            }
        };

        let result = ok_if_absent(
            self.assignments
                .unassign_all(&provider_data.client, &parent_id)
                .await,
            ApiError::is_not_found,
        );
        if let Err(e) = result {
            diagnostics.push(Diagnostic::error(
                format!("Error deleting {}", T::LABEL),
                format!(
                    "Could not delete {} {}, unexpected error: {}",
                    T::LABEL,
                    parent_id,
                    e
                ),
            ));
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl<T: NumberAssignments> ResourceWithConfigure for PhoneNumbersResource<T> {
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
impl<T: NumberAssignments> ResourceWithImportState for PhoneNumbersResource<T> {
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
        import_state_passthrough_id(&ctx, AttributePath::new(T::PARENT_ID), &request, &mut response);
        response
    }
}
