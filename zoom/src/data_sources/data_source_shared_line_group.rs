//! Shared line group data source

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceMetadataRequest,
    DataSourceMetadataResponse, DataSourceSchemaRequest, DataSourceSchemaResponse,
    DataSourceWithConfigure, ReadDataSourceRequest, ReadDataSourceResponse,
    ValidateDataSourceConfigRequest, ValidateDataSourceConfigResponse,
};
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

use crate::resources::not_configured;
use crate::resources::shared_line_groups::resource_shared_line_group::read_group;
use crate::ZoomProviderData;

#[derive(Default)]
pub struct SharedLineGroupDataSource {
    provider_data: Option<ZoomProviderData>,
}

impl SharedLineGroupDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

fn computed(name: &str, r#type: AttributeType, description: &str) -> tfplug::schema::Attribute {
    AttributeBuilder::new(name, r#type)
        .description(description)
        .computed()
        .build()
}

fn data_source_schema() -> Schema {
    SchemaBuilder::new()
        .version(0)
        .description("Looks up a Zoom Phone shared line group by ID")
        .attribute(
            AttributeBuilder::new("id", AttributeType::String)
                .description("The unique identifier of the shared line group")
                .required()
                .build(),
        )
        .attribute(computed("display_name", AttributeType::String, "The shared line group name"))
        .attribute(computed("extension_id", AttributeType::String, "Extension ID"))
        .attribute(computed("extension_number", AttributeType::Number, "Extension number"))
        .attribute(computed("primary_number", AttributeType::String, "The primary phone number"))
        .attribute(computed("site_id", AttributeType::String, "The site the group belongs to"))
        .attribute(computed("status", AttributeType::String, "`active` or `inactive`"))
        .build()
}

#[async_trait]
impl DataSource for SharedLineGroupDataSource {
    fn type_name(&self) -> &str {
        "zoom_phone_shared_line_group"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: DataSourceMetadataRequest,
    ) -> DataSourceMetadataResponse {
        DataSourceMetadataResponse {
            type_name: self.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        DataSourceSchemaResponse {
            schema: data_source_schema(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateDataSourceConfigRequest,
    ) -> ValidateDataSourceConfigResponse {
        ValidateDataSourceConfigResponse {
            diagnostics: data_source_schema().validate(&request.config),
        }
    }

    async fn read(&self, _ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let mut diagnostics = vec![];

        let provider_data = match &self.provider_data {
            Some(data) => data,
            None => {
                diagnostics.push(not_configured());
                return ReadDataSourceResponse {
                    state: DynamicValue::null(),
                    diagnostics,
                    deferred: None,
                };
            }
        };

        let group_id = match request.config.get_string(&AttributePath::new("id")) {
            Ok(id) if !id.is_empty() => id,
            _ => {
                diagnostics.push(
                    Diagnostic::error("Missing id", "The 'id' attribute is required")
                        .with_attribute(AttributePath::new("id")),
                );
                return ReadDataSourceResponse {
                    state: DynamicValue::null(),
                    diagnostics,
                    deferred: None,
                };
            }
        };

        tracing::debug!("Reading shared line group data source {}", group_id);

        match read_group(&provider_data.client, &group_id).await {
            Ok(Some(model)) => ReadDataSourceResponse {
                state: model.to_state(),
                diagnostics,
                deferred: None,
            },
            Ok(None) => {
                diagnostics.push(Diagnostic::error(
                    "Shared line group not found",
                    format!("No phone shared line group with id {}", group_id),
                ));
                ReadDataSourceResponse {
                    state: DynamicValue::null(),
                    diagnostics,
                    deferred: None,
                }
            }
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Failed to read phone shared line group",
                    format!("API error: {}", e),
                ));
                ReadDataSourceResponse {
                    state: DynamicValue::null(),
                    diagnostics,
                    deferred: None,
                }
            }
        }
    }
}

#[async_trait]
impl DataSourceWithConfigure for SharedLineGroupDataSource {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        let mut diagnostics = vec![];
        match ZoomProviderData::extract(request.provider_data, "data source") {
            Ok(data) => self.provider_data = Some(data),
            Err(diag) => diagnostics.push(diag),
        }
        ConfigureDataSourceResponse { diagnostics }
    }
}
