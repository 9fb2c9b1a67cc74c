//! Common types and utilities for the Zoom API

use serde::Deserialize;
use std::future::Future;

use super::error::ApiError;

/// Error body returned by Zoom on non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub code: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ApiQueryParams {
    params: Vec<(String, String)>,
}

impl ApiQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn add_optional<K: Into<String>, V: ToString>(mut self, key: K, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.params.push((key.into(), v.to_string()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn to_query_string(&self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!(
                "?{}",
                self.params
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                    .collect::<Vec<_>>()
                    .join("&")
            )
        }
    }
}

/// Cursor pagination as used by Zoom list endpoints
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub page_size: u32,
    pub next_page_token: Option<String>,
}

impl PageRequest {
    pub fn to_query_params(&self) -> ApiQueryParams {
        ApiQueryParams::new()
            .add("page_size", self.page_size)
            .add_optional("next_page_token", self.next_page_token.as_deref())
    }
}

/// One page of a cursor-paginated listing
pub trait Page {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

/// Walk every page, accumulating items in arrival order.
/// An absent or empty `next_page_token` ends the walk.
pub async fn paginate<P, F, Fut>(page_size: u32, mut fetch: F) -> Result<Vec<P::Item>, ApiError>
where
    P: Page,
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<P, ApiError>>,
{
    let mut items = Vec::new();
    let mut next_page_token = None;

    loop {
        let page = fetch(PageRequest {
            page_size,
            next_page_token: next_page_token.take(),
        })
        .await?;

        let (mut batch, token) = page.into_parts();
        items.append(&mut batch);

        match token {
            Some(token) if !token.is_empty() => next_page_token = Some(token),
            _ => return Ok(items),
        }
    }
}
