//! Member lists of call queues and shared line groups
//!
//! Both parents hold users and common areas and expose the same add and remove
//! calls, so one resource implementation serves both. A [`MemberDirectory`]
//! supplies the parent-specific endpoints and names.

use std::collections::HashMap;

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
use crate::api::phone::{AddMembersRequest, UserRef};
use crate::api::{ApiError, Client};
use crate::sync::{
    for_each_chunk, ok_if_absent, reconcile, same_key, SyncError, ASSIGN_MEMBERS_CHUNK,
};
use crate::value::TfValue;
use crate::ZoomProviderData;

/// A member as reported by the parent's listing
#[derive(Debug, Clone, Default)]
pub struct RemoteMember {
    pub id: Option<String>,
    pub name: Option<String>,
    pub extension_id: Option<String>,
    pub receive_call: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct RemoteMembers {
    pub users: Vec<RemoteMember>,
    pub common_areas: Vec<RemoteMember>,
}

/// Parent-specific half of a members resource
#[async_trait]
pub trait MemberDirectory: Default + Send + Sync + 'static {
    const TYPE_NAME: &'static str;
    /// State attribute holding the parent id, also the import id
    const PARENT_ID: &'static str;
    /// Used in error messages, e.g. "phone call queue members"
    const LABEL: &'static str;
    /// The parent kind, e.g. "call queue"
    const PARENT_LABEL: &'static str;
    const DESCRIPTION: &'static str;

    /// Current members, or `None` when the parent no longer exists
    async fn list(&self, client: &Client, parent_id: &str)
        -> Result<Option<RemoteMembers>, SyncError>;

    async fn add(
        &self,
        client: &Client,
        parent_id: &str,
        request: &AddMembersRequest,
    ) -> Result<(), ApiError>;

    async fn remove(&self, client: &Client, parent_id: &str, member_id: &str)
        -> Result<(), ApiError>;

    async fn remove_all(&self, client: &Client, parent_id: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberModel {
    pub id: TfValue<String>,
    pub email: TfValue<String>,
    pub name: TfValue<String>,
    pub extension_id: TfValue<String>,
    pub receive_call: TfValue<bool>,
}

impl MemberModel {
    fn from_dynamic(value: &Dynamic) -> Self {
        Self {
            id: TfValue::attr(value, "id"),
            email: TfValue::attr(value, "email"),
            name: TfValue::attr(value, "name"),
            extension_id: TfValue::attr(value, "extension_id"),
            receive_call: TfValue::attr(value, "receive_call"),
        }
    }

    fn from_remote(member: RemoteMember, email: Option<String>) -> Self {
        Self {
            id: member.id.into(),
            email: email.into(),
            name: member.name.into(),
            extension_id: member.extension_id.into(),
            receive_call: member.receive_call.into(),
        }
    }

    fn to_dynamic(&self, with_email: bool) -> Dynamic {
        let mut attributes = vec![
            ("id", self.id.clone().to_dynamic()),
            ("name", self.name.clone().to_dynamic()),
            ("extension_id", self.extension_id.clone().to_dynamic()),
            ("receive_call", self.receive_call.clone().to_dynamic()),
        ];
        if with_email {
            attributes.push(("email", self.email.clone().to_dynamic()));
        }
        Dynamic::object(attributes)
    }

    fn has_identity(&self) -> bool {
        let present = |v: &TfValue<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.id) || present(&self.email)
    }
}

fn same_user(a: &MemberModel, b: &MemberModel) -> bool {
    same_key(a.id.as_deref(), b.id.as_deref()) || same_key(a.email.as_deref(), b.email.as_deref())
}

fn same_common_area(a: &MemberModel, b: &MemberModel) -> bool {
    same_key(a.id.as_deref(), b.id.as_deref())
}

/// Resource state. A `None` list is null in state, distinct from an empty set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MembersModel {
    pub parent_id: String,
    pub users: Option<Vec<MemberModel>>,
    pub common_areas: Option<Vec<MemberModel>>,
}

impl MembersModel {
    fn from_state(state: &DynamicValue, parent_attr: &str) -> Result<Self, Diagnostic> {
        let members = |name: &str| {
            collection(state.value.attribute(name))
                .map(|items| items.iter().map(MemberModel::from_dynamic).collect())
        };
        Ok(Self {
            parent_id: required_id(state, parent_attr)?,
            users: members("users"),
            common_areas: members("common_areas"),
        })
    }

    fn to_state(&self, parent_attr: &str) -> DynamicValue {
        let list = |members: &Option<Vec<MemberModel>>, with_email: bool| match members {
            Some(members) => Dynamic::List(
                members
                    .iter()
                    .map(|m| m.to_dynamic(with_email))
                    .collect(),
            ),
            None => Dynamic::Null,
        };
        DynamicValue::new(Dynamic::object([
            (parent_attr, Dynamic::from(self.parent_id.as_str())),
            ("users", list(&self.users, true)),
            ("common_areas", list(&self.common_areas, false)),
        ]))
    }
}

#[derive(Default)]
pub struct MembersResource<D: MemberDirectory> {
    directory: D,
    provider_data: Option<ZoomProviderData>,
}

impl<D: MemberDirectory> MembersResource<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the remote membership shaped after `prior`, whose null lists stay
    /// null when the remote side has no members of that kind.
    pub(crate) async fn read_model(
        &self,
        client: &Client,
        prior: &MembersModel,
    ) -> Result<Option<MembersModel>, SyncError> {
        let Some(remote) = self.directory.list(client, &prior.parent_id).await? else {
            return Ok(None);
        };

        let emails = if remote.users.is_empty() {
            HashMap::new()
        } else {
            user_emails(client).await.map_err(SyncError::remote(format!(
                "unable to read {} {}",
                D::LABEL,
                prior.parent_id
            )))?
        };

        let users = remote
            .users
            .into_iter()
            .map(|member| {
                let extension_id = member.extension_id.clone().unwrap_or_default();
                match emails.get(&extension_id) {
                    Some(email) => Ok(MemberModel::from_remote(member, email.clone())),
                    None => Err(SyncError::UnexpectedResponse(format!(
                        "user not found: {}",
                        extension_id
                    ))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let common_areas: Vec<MemberModel> = remote
            .common_areas
            .into_iter()
            .map(|member| MemberModel::from_remote(member, None))
            .collect();

        Ok(Some(MembersModel {
            parent_id: prior.parent_id.clone(),
            users: keep_null(prior.users.is_none(), users),
            common_areas: keep_null(prior.common_areas.is_none(), common_areas),
        }))
    }

    /// Bring the remote membership in line with `plan`: removals first, then
    /// common areas and users are added in chunks.
    pub(crate) async fn sync(&self, client: &Client, plan: &MembersModel) -> Result<(), SyncError> {
        validate_users(plan.users.as_deref().unwrap_or_default())?;

        let parent_id = plan.parent_id.as_str();
        let context = format!("could not sync {} {}", D::LABEL, parent_id);

        let current = self.read_model(client, plan).await?.ok_or_else(|| {
            SyncError::UnexpectedResponse(format!("{} not found {}", D::PARENT_LABEL, parent_id))
        })?;

        let current_users = current.users.unwrap_or_default();
        let current_areas = current.common_areas.unwrap_or_default();
        let desired_users = plan.users.as_deref().unwrap_or_default();
        let desired_areas = plan.common_areas.as_deref().unwrap_or_default();

        let users = reconcile(&current_users, desired_users, same_user);
        let areas = reconcile(&current_areas, desired_areas, same_common_area);
        tracing::debug!(
            "Syncing {} {}: removing {} users and {} common areas, adding {} users and {} common areas",
            D::LABEL,
            parent_id,
            users.to_remove.len(),
            areas.to_remove.len(),
            users.to_add.len(),
            areas.to_add.len()
        );

        for member in users.to_remove.iter().chain(areas.to_remove.iter()) {
            let Some(member_id) = member.id.as_deref() else {
                continue;
            };
            ok_if_absent(
                self.directory.remove(client, parent_id, member_id).await,
                ApiError::is_not_found,
            )
            .map_err(SyncError::remote(context.as_str()))?;
        }

        let directory = &self.directory;
        let context = context.as_str();

        let area_ids: Vec<String> = areas
            .to_add
            .iter()
            .filter_map(|m| m.id.as_known().cloned())
            .collect();
        for_each_chunk(&area_ids, ASSIGN_MEMBERS_CHUNK, |chunk| async move {
            directory
                .add(client, parent_id, &AddMembersRequest::common_areas(chunk.to_vec()))
                .await
                .map_err(SyncError::remote(context))
        })
        .await?;

        let user_refs: Vec<UserRef> = users
            .to_add
            .iter()
            .map(|m| UserRef {
                id: non_empty(&m.id),
                email: non_empty(&m.email),
            })
            .collect();
        for_each_chunk(&user_refs, ASSIGN_MEMBERS_CHUNK, |chunk| async move {
            directory
                .add(client, parent_id, &AddMembersRequest::users(chunk.to_vec()))
                .await
                .map_err(SyncError::remote(context))
        })
        .await?;

        Ok(())
    }

    async fn apply(&self, planned_state: &DynamicValue, action: &str) -> Result<DynamicValue, Diagnostic> {
        let provider_data = self.provider_data.as_ref().ok_or_else(not_configured)?;
        let client = provider_data.client.as_ref();
        let plan = MembersModel::from_state(planned_state, D::PARENT_ID)?;

        self.sync(client, &plan).await.map_err(|e| {
            Diagnostic::error(format!("Error {} {}", action, D::LABEL), e.to_string())
        })?;

        match self.read_model(client, &plan).await {
            Ok(Some(model)) => Ok(model.to_state(D::PARENT_ID)),
            Ok(None) => Err(Diagnostic::error(
                format!("Error {} {} on reading", action, D::LABEL),
                format!("{} not found {}", D::PARENT_LABEL, plan.parent_id),
            )),
            Err(e) => Err(Diagnostic::error(
                format!("Error {} {} on reading", action, D::LABEL),
                e.to_string(),
            )),
        }
    }
}

async fn user_emails(client: &Client) -> Result<HashMap<String, Option<String>>, ApiError> {
    let users = client.phone().users().list_all().await?;
    Ok(users
        .into_iter()
        .filter_map(|user| Some((user.extension_id?, user.email)))
        .collect())
}

fn non_empty(value: &TfValue<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}

fn validate_users(users: &[MemberModel]) -> Result<(), SyncError> {
    if users.iter().all(MemberModel::has_identity) {
        Ok(())
    } else {
        Err(SyncError::validation(
            "either `id` or `email` must be specified on user",
        ))
    }
}

fn members_schema<D: MemberDirectory>() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description(D::DESCRIPTION)
        .attribute(
            AttributeBuilder::new(D::PARENT_ID, AttributeType::String)
                .description(&format!("Unique identifier of the {}.", D::PARENT_LABEL))
                .required()
                .plan_modifier(RequiresReplace::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("users", object_set())
                .description("Users to add as members. Identify each by `id` or `email`.")
                .optional()
                .nested_type(NestedType {
                    attributes: user_attributes(),
                    nesting: ObjectNestingMode::Set,
                })
                .build(),
        )
        .attribute(
            AttributeBuilder::new("common_areas", object_set())
                .description("Common areas to add as members.")
                .optional()
                .nested_type(NestedType {
                    attributes: common_area_attributes(),
                    nesting: ObjectNestingMode::Set,
                })
                .build(),
        )
        .build()
}

fn user_attributes() -> Vec<Attribute> {
    let mut attributes = vec![
        AttributeBuilder::new("id", AttributeType::String)
            .description("User ID.")
            .optional()
            .computed()
            .build(),
        AttributeBuilder::new("email", AttributeType::String)
            .description("User email address.")
            .optional()
            .computed()
            .build(),
    ];
    attributes.extend(computed_member_attributes());
    attributes
}

fn common_area_attributes() -> Vec<Attribute> {
    let mut attributes = vec![AttributeBuilder::new("id", AttributeType::String)
        .description("Common area ID.")
        .required()
        .build()];
    attributes.extend(computed_member_attributes());
    attributes
}

fn computed_member_attributes() -> Vec<Attribute> {
    vec![
        AttributeBuilder::new("name", AttributeType::String)
            .description("Member name.")
            .computed()
            .build(),
        AttributeBuilder::new("extension_id", AttributeType::String)
            .description("Member extension ID.")
            .computed()
            .build(),
        AttributeBuilder::new("receive_call", AttributeType::Bool)
            .description("Whether the member receives calls.")
            .computed()
            .build(),
    ]
}

#[async_trait]
impl<D: MemberDirectory> Resource for MembersResource<D> {
    fn type_name(&self) -> &str {
        D::TYPE_NAME
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
            schema: members_schema::<D>(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        let mut diagnostics = members_schema::<D>().validate(&request.config);

        if let Some(users) = collection(request.config.value.attribute("users")) {
            for (i, user) in users.iter().enumerate() {
                let member = MemberModel::from_dynamic(user);
                // Unknown values are checked again at apply time
                if member.id.is_unknown() || member.email.is_unknown() {
                    continue;
                }
                if !member.has_identity() {
                    diagnostics.push(
                        Diagnostic::error(
                            "Invalid user",
                            "either `id` or `email` must be specified on user",
                        )
                        .with_attribute(AttributePath::new("users").index(i as i64)),
                    );
                }
            }
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

        let prior = match MembersModel::from_state(&request.current_state, D::PARENT_ID) {
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
                new_state: Some(model.to_state(D::PARENT_ID)),
                diagnostics,
                private: request.private,
                deferred: None,
            },
            Ok(None) => {
                tracing::info!("{} {} no longer exists, removing from state", D::PARENT_LABEL, prior.parent_id);
                ReadResourceResponse {
                    new_state: None,
                    diagnostics,
                    private: request.private,
                    deferred: None,
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    format!("Error reading {}", D::LABEL),
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

        let parent_id = match required_id(&request.prior_state, D::PARENT_ID) {
            Ok(id) => id,
            Err(diag) => {
                diagnostics.push(diag);
                return DeleteResourceResponse { diagnostics };
            }
        };

        let result = ok_if_absent(
            self.directory
                .remove_all(&provider_data.client, &parent_id)
                .await,
            ApiError::is_not_found,
        );
        if let Err(e) = result {
            diagnostics.push(Diagnostic::error(
                format!("Error deleting {}", D::LABEL),
                format!(
                    "Could not delete {} {}, unexpected error: {}",
                    D::LABEL,
                    parent_id,
                    e
                ),
            ));
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl<D: MemberDirectory> ResourceWithConfigure for MembersResource<D> {
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
impl<D: MemberDirectory> ResourceWithImportState for MembersResource<D> {
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
        import_state_passthrough_id(&ctx, AttributePath::new(D::PARENT_ID), &request, &mut response);
        response
    }
}
