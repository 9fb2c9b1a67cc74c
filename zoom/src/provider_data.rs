//! Provider data structure passed to resources and data sources

use crate::api::Client;
use std::any::Any;
use std::sync::Arc;
use tfplug::types::Diagnostic;

#[derive(Clone)]
pub struct ZoomProviderData {
    pub client: Arc<Client>,
}

impl ZoomProviderData {
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Recover the provider data handed to a resource or data source configure call.
    /// `receiver` names the kind of object being configured.
    pub fn extract(
        provider_data: Option<Arc<dyn Any + Send + Sync>>,
        receiver: &str,
    ) -> Result<Self, Diagnostic> {
        let data = provider_data.ok_or_else(|| {
            Diagnostic::error(
                "No provider data",
                format!("No provider data was provided to the {}", receiver),
            )
        })?;

        data.downcast_ref::<ZoomProviderData>()
            .cloned()
            .ok_or_else(|| {
                Diagnostic::error(
                    "Invalid provider data",
                    "Failed to extract ZoomProviderData from provider data",
                )
            })
    }
}
