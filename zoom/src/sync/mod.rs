//! Membership synchronization: set reconciliation, chunked dispatch and
//! classification of "already gone" API errors.

pub mod batch;
pub mod reconcile;

pub use batch::{for_each_chunk, ASSIGN_MEMBERS_CHUNK, ASSIGN_PHONE_NUMBERS_CHUNK, REMOVE_POLICY_CHUNK};
pub use reconcile::{reconcile, same_key, Reconciliation};

use crate::api::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Rejected before any remote call was made
    #[error("{0}")]
    Validation(String),

    /// The remote side returned data that cannot be mapped to state
    #[error("{0}")]
    UnexpectedResponse(String),

    #[error("{context}: {source}")]
    Remote {
        context: String,
        #[source]
        source: ApiError,
    },

    #[error("{}", join_errors(.0))]
    Multiple(Vec<SyncError>),
}

fn join_errors(errors: &[SyncError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl SyncError {
    pub fn validation(message: impl Into<String>) -> Self {
        SyncError::Validation(message.into())
    }

    /// Adapter for `map_err` that attaches operation context to an API error
    pub fn remote(context: impl Into<String>) -> impl FnOnce(ApiError) -> SyncError {
        let context = context.into();
        move |source| SyncError::Remote { context, source }
    }

    /// Collapse a list of failures. None when the list is empty.
    pub fn join(mut errors: Vec<SyncError>) -> Option<SyncError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(SyncError::Multiple(errors)),
        }
    }
}

/// Treat errors matching `absent` as success. Used on unassign and delete,
/// where the target being gone is the desired outcome.
pub fn ok_if_absent(
    result: Result<(), ApiError>,
    absent: impl Fn(&ApiError) -> bool,
) -> Result<(), ApiError> {
    match result {
        Err(e) if absent(&e) => {
            tracing::debug!("Treating API error as already absent: {}", e);
            Ok(())
        }
        other => other,
    }
}

/// Map errors matching `deleted` to `Ok(None)` so a read can drop the resource
pub fn found_or_deleted<T>(
    result: Result<T, ApiError>,
    deleted: impl Fn(&ApiError) -> bool,
) -> Result<Option<T>, ApiError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if deleted(&e) => {
            tracing::info!("Remote entity no longer exists: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
