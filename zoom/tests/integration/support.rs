//! Shared setup: a provider configured against a mockito server

use std::any::Any;
use std::sync::Arc;

use mockito::{Mock, ServerGuard};
use tfplug::context::Context;
use tfplug::provider::{ConfigureProviderRequest, Provider};
use tfplug::resource::{
    ConfigureResourceRequest, CreateResourceRequest, DeleteResourceRequest, ReadResourceRequest,
    ResourceWithConfigure, UpdateResourceRequest,
};
use tfplug::types::{AttributePath, ClientCapabilities, DynamicValue};
use zoom::ZoomProvider;

pub type ProviderData = Option<Arc<dyn Any + Send + Sync>>;

pub fn capabilities() -> ClientCapabilities {
    ClientCapabilities {
        deferral_allowed: false,
        write_only_attributes_allowed: false,
    }
}

pub async fn mock_oauth(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", "/oauth/token")
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"integration-token","token_type":"bearer","expires_in":3600}"#)
        .create_async()
        .await
}

/// Configure the provider with the mock server as both API and OAuth endpoint
pub async fn configure_provider(server: &ServerGuard) -> (ZoomProvider, ProviderData) {
    let mut provider = ZoomProvider::new();

    let mut config = DynamicValue::null();
    let _ = config.set_string(&AttributePath::new("account_id"), "acct".to_string());
    let _ = config.set_string(&AttributePath::new("client_id"), "cid".to_string());
    let _ = config.set_string(&AttributePath::new("client_secret"), "secret".to_string());
    let _ = config.set_string(&AttributePath::new("api_url"), server.url());
    let _ = config.set_string(&AttributePath::new("oauth_url"), server.url());

    let response = provider
        .configure(
            Context::new(),
            ConfigureProviderRequest {
                terraform_version: "1.0.0".to_string(),
                config,
                client_capabilities: capabilities(),
            },
        )
        .await;
    assert!(response.diagnostics.is_empty());
    assert!(response.provider_data.is_some());

    (provider, response.provider_data)
}

/// Build a resource through the provider's factory and hand it the provider data
pub async fn configured_resource(
    provider: &ZoomProvider,
    provider_data: &ProviderData,
    type_name: &str,
) -> Box<dyn ResourceWithConfigure> {
    let factories = provider.resources();
    let factory = factories.get(type_name).unwrap();
    let mut resource = factory();

    let response = resource
        .configure(
            Context::new(),
            ConfigureResourceRequest {
                provider_data: provider_data.clone(),
            },
        )
        .await;
    assert!(response.diagnostics.is_empty());
    resource
}

pub fn create_request(type_name: &str, planned_state: DynamicValue) -> CreateResourceRequest {
    CreateResourceRequest {
        type_name: type_name.to_string(),
        config: planned_state.clone(),
        planned_state,
        planned_private: vec![],
        provider_meta: None,
    }
}

pub fn read_request(type_name: &str, current_state: DynamicValue) -> ReadResourceRequest {
    ReadResourceRequest {
        type_name: type_name.to_string(),
        current_state,
        private: vec![],
        provider_meta: None,
        client_capabilities: capabilities(),
    }
}

pub fn update_request(
    type_name: &str,
    prior_state: DynamicValue,
    planned_state: DynamicValue,
) -> UpdateResourceRequest {
    UpdateResourceRequest {
        type_name: type_name.to_string(),
        prior_state,
        config: planned_state.clone(),
        planned_state,
        planned_private: vec![],
        provider_meta: None,
    }
}

pub fn delete_request(type_name: &str, prior_state: DynamicValue) -> DeleteResourceRequest {
    DeleteResourceRequest {
        type_name: type_name.to_string(),
        prior_state,
        planned_private: vec![],
        provider_meta: None,
    }
}
