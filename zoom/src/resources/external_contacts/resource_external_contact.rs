//! External contact resource

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
use tfplug::import::import_state_passthrough_id;
use tfplug::plan_modifier::UseStateForUnknown;
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
use tfplug::validator::{SizeValidator, StringLengthValidator};

use crate::api::error::CODE_NOT_FOUND;
use crate::api::phone::external_contacts::{ExternalContact, ExternalContactRequest};
use crate::api::{ApiError, Client};
use crate::resources::{collection, not_configured, required_id};
use crate::sync::{found_or_deleted, ok_if_absent};
use crate::value::TfValue;
use crate::ZoomProviderData;

#[derive(Debug, Clone, Default, PartialEq)]
struct ExternalContactModel {
    external_contact_id: TfValue<String>,
    id: TfValue<String>,
    name: TfValue<String>,
    description: TfValue<String>,
    extension_number: TfValue<String>,
    email: TfValue<String>,
    phone_numbers: Vec<String>,
    auto_call_recorded: TfValue<bool>,
    routing_path: TfValue<String>,
}

impl ExternalContactModel {
    fn from_state(state: &DynamicValue) -> Self {
        let value = &state.value;
        Self {
            external_contact_id: TfValue::attr(value, "external_contact_id"),
            id: TfValue::attr(value, "id"),
            name: TfValue::attr(value, "name"),
            description: TfValue::attr(value, "description"),
            extension_number: TfValue::attr(value, "extension_number"),
            email: TfValue::attr(value, "email"),
            phone_numbers: collection(value.attribute("phone_numbers"))
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Dynamic::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            auto_call_recorded: TfValue::attr(value, "auto_call_recorded"),
            routing_path: TfValue::attr(value, "routing_path"),
        }
    }

    fn to_state(&self) -> DynamicValue {
        DynamicValue::new(Dynamic::object([
            ("external_contact_id", self.external_contact_id.clone().to_dynamic()),
            ("id", self.id.clone().to_dynamic()),
            ("name", self.name.clone().to_dynamic()),
            ("description", self.description.clone().to_dynamic()),
            ("extension_number", self.extension_number.clone().to_dynamic()),
            ("email", self.email.clone().to_dynamic()),
            (
                "phone_numbers",
                Dynamic::List(self.phone_numbers.iter().map(|n| Dynamic::from(n.as_str())).collect()),
            ),
            ("auto_call_recorded", self.auto_call_recorded.clone().to_dynamic()),
            ("routing_path", self.routing_path.clone().to_dynamic()),
        ]))
    }

    fn to_request(&self) -> ExternalContactRequest {
        ExternalContactRequest {
            name: self.name.as_deref().unwrap_or_default().to_string(),
            id: self.id.clone().into_wire(),
            description: self.description.clone().into_wire(),
            email: self.email.clone().into_wire(),
            extension_number: self.extension_number.clone().into_wire(),
            phone_numbers: self.phone_numbers.clone(),
            routing_path: self.routing_path.clone().into_wire(),
            auto_call_recorded: self.auto_call_recorded.clone().into_wire(),
        }
    }
}

impl From<ExternalContact> for ExternalContactModel {
    fn from(contact: ExternalContact) -> Self {
        Self {
            external_contact_id: contact.external_contact_id.into(),
            id: contact.id.into(),
            name: contact.name.into(),
            description: contact.description.into(),
            extension_number: contact.extension_number.into(),
            email: contact.email.into(),
            phone_numbers: contact.phone_numbers,
            auto_call_recorded: contact.auto_call_recorded.into(),
            routing_path: contact.routing_path.into(),
        }
    }
}

#[derive(Default)]
pub struct ExternalContactResource {
    provider_data: Option<ZoomProviderData>,
}

impl ExternalContactResource {
    pub fn new() -> Self {
        Self::default()
    }

    async fn read_contact(
        client: &Client,
        external_contact_id: &str,
    ) -> Result<Option<ExternalContactModel>, ApiError> {
        let contact = found_or_deleted(
            client.phone().external_contacts().get(external_contact_id).await,
            ApiError::is_deleted_on_read,
        )?;
        Ok(contact.map(Into::into))
    }

    /// Read back after a write. A contact missing right after the write is an error.
    async fn read_back(
        client: &Client,
        external_contact_id: &str,
        summary: &str,
    ) -> Result<DynamicValue, Diagnostic> {
        match Self::read_contact(client, external_contact_id).await {
            Ok(Some(model)) => Ok(model.to_state()),
            Ok(None) => Err(Diagnostic::error(
                summary,
                format!("external contact {} not found", external_contact_id),
            )),
            Err(e) => Err(Diagnostic::error(summary, format!("API error: {}", e))),
        }
    }
}

fn contact_schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("External contact's information.")
        .attribute(
            AttributeBuilder::new("external_contact_id", AttributeType::String)
                .description("The Zoom-generated external contact ID.")
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .description("The customer-configured external contact ID. Zoom generates one when omitted.")
                .optional()
                .computed()
                .plan_modifier(UseStateForUnknown::create())
                .build(),
        )
        .attribute(
            AttributeBuilder::new("name", AttributeType::String)
                .description("The external contact's username or extension display name.")
                .required()
                .validator(StringLengthValidator::at_most(255))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("description", AttributeType::String)
                .description("The external contact's description.")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("extension_number", AttributeType::String)
                .description("The external contact's extension number.")
                .optional()
                .build(),
        )
        .attribute(
            AttributeBuilder::new("email", AttributeType::String)
                .description("The external contact's email address.")
                .optional()
                .validator(StringLengthValidator::at_most(255))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("phone_numbers", AttributeType::Set(Box::new(AttributeType::String)))
                .description("The external contact's phone numbers in E.164 format.")
                .required()
                .validator(SizeValidator::at_least(1))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("auto_call_recorded", AttributeType::Bool)
                .description("Whether to allow the automatic call recording.")
                .optional()
                .computed()
                .default(StaticDefault::bool(false))
                .build(),
        )
        .attribute(
            AttributeBuilder::new("routing_path", AttributeType::String)
                .description("The external contact's SIP group, to define the call routing path.")
                .optional()
                .computed()
                .build(),
        )
        .build()
}

#[async_trait]
impl Resource for ExternalContactResource {
    fn type_name(&self) -> &str {
        "zoom_phone_external_contact"
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
            schema: contact_schema(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: contact_schema().validate(&request.config),
        }
    }

    async fn create(
        &self,
        _ctx: Context,
        request: CreateResourceRequest,
    ) -> CreateResourceResponse {
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

        let plan = ExternalContactModel::from_state(&request.planned_state);
        let client = provider_data.client.as_ref();

        let created = match client
            .phone()
            .external_contacts()
            .create(&plan.to_request())
            .await
        {
            Ok(created) => created,
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Error creating phone external contact",
                    format!("API error: {}", e),
                ));
                return CreateResourceResponse {
                    new_state: request.planned_state,
                    private: vec![],
                    diagnostics,
                };
            }
        };

        let Some(external_contact_id) = created.external_contact_id else {
            diagnostics.push(Diagnostic::error(
                "Error creating phone external contact",
                "The API response did not include an external_contact_id",
            ));
            return CreateResourceResponse {
                new_state: request.planned_state,
                private: vec![],
                diagnostics,
            };
        };
        tracing::info!("Created phone external contact {}", external_contact_id);

        match Self::read_back(
            client,
            &external_contact_id,
            "Error creating phone external contact on reading",
        )
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

        let external_contact_id = match required_id(&request.current_state, "external_contact_id") {
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

        match Self::read_contact(&provider_data.client, &external_contact_id).await {
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
                    "Error reading phone external contact",
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

        let external_contact_id = match required_id(&request.prior_state, "external_contact_id") {
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

        let plan = ExternalContactModel::from_state(&request.planned_state);
        let client = provider_data.client.as_ref();

        if let Err(e) = client
            .phone()
            .external_contacts()
            .update(&external_contact_id, &plan.to_request())
            .await
        {
            diagnostics.push(Diagnostic::error(
                "Error updating phone external contact",
                format!(
                    "Could not update phone external contact {}, unexpected error: {}",
                    external_contact_id, e
                ),
            ));
            return UpdateResourceResponse {
                new_state: request.prior_state,
                private: vec![],
                diagnostics,
            };
        }

        match Self::read_back(client, &external_contact_id, "Error updating phone external contact").await {
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

        let external_contact_id = match required_id(&request.prior_state, "external_contact_id") {
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
                .external_contacts()
                .delete(&external_contact_id)
                .await,
            |e| e.is_bad_request_with(CODE_NOT_FOUND),
        );
        match result {
            Ok(()) => tracing::info!("Deleted phone external contact {}", external_contact_id),
            Err(e) => diagnostics.push(Diagnostic::error(
                "Error deleting phone external contact",
                format!(
                    "Could not delete phone external contact {}, unexpected error: {}",
                    external_contact_id, e
                ),
            )),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[async_trait]
impl ResourceWithConfigure for ExternalContactResource {
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
impl ResourceWithImportState for ExternalContactResource {
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
            AttributePath::new("external_contact_id"),
            &request,
            &mut response,
        );
        response
    }
}
