//! REST client for the Zoom API

pub mod client;
pub mod common;
pub mod error;
pub mod oauth;
pub mod phone;
pub mod pool;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use client::{Client, RetryConfig};
pub use common::{paginate, ApiQueryParams, Page, PageRequest};
pub use error::ApiError;
pub use oauth::Credentials;
