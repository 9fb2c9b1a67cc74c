//! Terraform provider for Zoom Phone

pub mod api;
pub mod calling_plans;
pub mod data_sources;
pub mod logging;
pub mod provider_data;
pub mod resources;
pub mod sync;
pub mod value;
pub mod wait;

pub use provider_data::ZoomProviderData;

use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::data_source::DataSourceWithConfigure;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, DataSourceFactory, Provider,
    ProviderMetaSchemaRequest, ProviderMetaSchemaResponse, ProviderMetadataRequest,
    ProviderMetadataResponse, ProviderSchemaRequest, ProviderSchemaResponse, ResourceFactory,
    StopProviderRequest, StopProviderResponse, ValidateProviderConfigRequest,
    ValidateProviderConfigResponse,
};
use tfplug::resource::ResourceWithConfigure;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue, ServerCapabilities};

use api::{Client, Credentials};

pub const DEFAULT_API_URL: &str = "https://api.zoom.us/v2";
pub const DEFAULT_OAUTH_URL: &str = "https://zoom.us";

#[derive(Default)]
pub struct ZoomProvider {
    provider_data: Option<ZoomProviderData>,
}

impl ZoomProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider_data(&self) -> Option<&ZoomProviderData> {
        self.provider_data.as_ref()
    }
}

fn provider_schema() -> Schema {
    let optional = |name: &str, description: &str| {
        AttributeBuilder::new(name, AttributeType::String)
            .description(description)
            .optional()
            .build()
    };

    SchemaBuilder::new()
        .version(0)
        .description("Provider for Zoom Phone, authenticated with Server-to-Server OAuth")
        .attribute(optional(
            "account_id",
            "Zoom account ID. Can also be set with ZOOM_ACCOUNT_ID.",
        ))
        .attribute(optional(
            "client_id",
            "OAuth client ID. Can also be set with ZOOM_CLIENT_ID.",
        ))
        .attribute(
            AttributeBuilder::new("client_secret", AttributeType::String)
                .description("OAuth client secret. Can also be set with ZOOM_CLIENT_SECRET.")
                .optional()
                .sensitive()
                .build(),
        )
        .attribute(optional(
            "api_url",
            "Zoom API base URL. Can also be set with ZOOM_API_URL. Defaults to https://api.zoom.us/v2.",
        ))
        .attribute(optional(
            "oauth_url",
            "Zoom OAuth base URL. Can also be set with ZOOM_OAUTH_URL. Defaults to https://zoom.us.",
        ))
        .build()
}

/// A configured attribute, or its environment variable when unset or empty
fn config_or_env(config: &DynamicValue, name: &str, env: &str) -> Option<String> {
    config
        .get_string(&AttributePath::new(name))
        .ok()
        .filter(|value| !value.is_empty())
        .or_else(|| std::env::var(env).ok().filter(|value| !value.is_empty()))
}

fn required_setting(
    config: &DynamicValue,
    name: &str,
    env: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<String> {
    let value = config_or_env(config, name, env);
    if value.is_none() {
        diagnostics.push(
            Diagnostic::error(
                format!("Missing {}", name),
                format!(
                    "The provider requires '{}' to be set in configuration or through the {} environment variable",
                    name, env
                ),
            )
            .with_attribute(AttributePath::new(name)),
        );
    }
    value
}

#[async_trait]
impl Provider for ZoomProvider {
    fn type_name(&self) -> &str {
        "zoom"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: "zoom".to_string(),
            server_capabilities: ServerCapabilities {
                plan_destroy: false,
                get_provider_schema_optional: false,
                move_resource_state: false,
            },
        }
    }

    async fn schema(&self, _ctx: Context, _request: ProviderSchemaRequest) -> ProviderSchemaResponse {
        ProviderSchemaResponse {
            schema: provider_schema(),
            diagnostics: vec![],
        }
    }

    async fn meta_schema(
        &self,
        _ctx: Context,
        _request: ProviderMetaSchemaRequest,
    ) -> ProviderMetaSchemaResponse {
        ProviderMetaSchemaResponse {
            schema: None,
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        logging::init();

        let config = &request.config;
        let mut diagnostics = vec![];

        let account_id = required_setting(config, "account_id", "ZOOM_ACCOUNT_ID", &mut diagnostics);
        let client_id = required_setting(config, "client_id", "ZOOM_CLIENT_ID", &mut diagnostics);
        let client_secret =
            required_setting(config, "client_secret", "ZOOM_CLIENT_SECRET", &mut diagnostics);
        let api_url = config_or_env(config, "api_url", "ZOOM_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let oauth_url = config_or_env(config, "oauth_url", "ZOOM_OAUTH_URL")
            .unwrap_or_else(|| DEFAULT_OAUTH_URL.to_string());

        let (Some(account_id), Some(client_id), Some(client_secret)) =
            (account_id, client_id, client_secret)
        else {
            return ConfigureProviderResponse {
                diagnostics,
                provider_data: None,
            };
        };

        let credentials = Credentials {
            account_id,
            client_id,
            client_secret,
        };

        let client = match Client::new(&api_url, &oauth_url, credentials) {
            Ok(client) => client,
            Err(e) => {
                diagnostics.push(Diagnostic::error(
                    "Failed to create Zoom API client",
                    format!("Invalid provider configuration: {}", e),
                ));
                return ConfigureProviderResponse {
                    diagnostics,
                    provider_data: None,
                };
            }
        };

        tracing::info!("Configured Zoom provider for {}", api_url);

        let data = ZoomProviderData::new(client);
        self.provider_data = Some(data.clone());

        ConfigureProviderResponse {
            diagnostics,
            provider_data: Some(Arc::new(data) as Arc<dyn Any + Send + Sync>),
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateProviderConfigRequest,
    ) -> ValidateProviderConfigResponse {
        ValidateProviderConfigResponse {
            diagnostics: provider_schema().validate(&request.config),
        }
    }

    async fn stop(&self, _ctx: Context, _request: StopProviderRequest) -> StopProviderResponse {
        StopProviderResponse { error: None }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        let mut factories: HashMap<String, ResourceFactory> = HashMap::new();

        factories.insert(
            "zoom_phone_auto_receptionist_ivr".to_string(),
            Box::new(|| {
                Box::new(resources::AutoReceptionistIvrResource::new())
                    as Box<dyn ResourceWithConfigure>
            }),
        );
        factories.insert(
            "zoom_phone_call_queue_members".to_string(),
            Box::new(|| {
                Box::new(resources::CallQueueMembersResource::new())
                    as Box<dyn ResourceWithConfigure>
            }),
        );
        factories.insert(
            "zoom_phone_call_queue_phone_numbers".to_string(),
            Box::new(|| {
                Box::new(resources::CallQueuePhoneNumbersResource::new())
                    as Box<dyn ResourceWithConfigure>
            }),
        );
        factories.insert(
            "zoom_phone_call_queue_policy_voice_mail".to_string(),
            Box::new(|| {
                Box::new(resources::CallQueueVoicemailPolicyResource::new())
                    as Box<dyn ResourceWithConfigure>
            }),
        );
        factories.insert(
            "zoom_phone_external_contact".to_string(),
            Box::new(|| {
                Box::new(resources::ExternalContactResource::new())
                    as Box<dyn ResourceWithConfigure>
            }),
        );
        factories.insert(
            "zoom_phone_shared_line_group".to_string(),
            Box::new(|| {
                Box::new(resources::SharedLineGroupResource::new())
                    as Box<dyn ResourceWithConfigure>
            }),
        );
        factories.insert(
            "zoom_phone_shared_line_group_members".to_string(),
            Box::new(|| {
                Box::new(resources::SharedLineGroupMembersResource::new())
                    as Box<dyn ResourceWithConfigure>
            }),
        );
        factories.insert(
            "zoom_phone_shared_line_group_phone_numbers".to_string(),
            Box::new(|| {
                Box::new(resources::SharedLineGroupPhoneNumbersResource::new())
                    as Box<dyn ResourceWithConfigure>
            }),
        );
        factories.insert(
            "zoom_phone_user_calling_plans".to_string(),
            Box::new(|| {
                Box::new(resources::UserCallingPlansResource::new())
                    as Box<dyn ResourceWithConfigure>
            }),
        );
        factories.insert(
            "zoom_phone_user_phone_numbers".to_string(),
            Box::new(|| {
                Box::new(resources::UserPhoneNumbersResource::new())
                    as Box<dyn ResourceWithConfigure>
            }),
        );

        factories
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        let mut factories: HashMap<String, DataSourceFactory> = HashMap::new();
        factories.insert(
            "zoom_phone_shared_line_group".to_string(),
            Box::new(|| {
                Box::new(data_sources::SharedLineGroupDataSource::new())
                    as Box<dyn DataSourceWithConfigure>
            }),
        );
        factories
    }
}
