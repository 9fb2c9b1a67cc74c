//! Chunked dispatch for endpoints that cap the number of items per call

use std::future::Future;

use super::SyncError;

/// Phone numbers per assignment call
pub const ASSIGN_PHONE_NUMBERS_CHUNK: usize = 5;
/// Members per add-members call
pub const ASSIGN_MEMBERS_CHUNK: usize = 10;
/// Shared ids per voicemail policy removal call
pub const REMOVE_POLICY_CHUNK: usize = 20;

/// Issue one call per chunk of at most `size` items, in order.
///
/// Stops at the first failing chunk. Chunks already sent are not rolled back.
/// Returns the number of calls made.
pub async fn for_each_chunk<'a, T, F, Fut>(
    items: &'a [T],
    size: usize,
    mut call: F,
) -> Result<usize, SyncError>
where
    F: FnMut(&'a [T]) -> Fut,
    Fut: Future<Output = Result<(), SyncError>>,
{
    if size == 0 {
        return Err(SyncError::validation("chunk size must be greater than 0"));
    }

    let mut calls = 0;
    for chunk in items.chunks(size) {
        tracing::debug!("Dispatching chunk {} with {} items", calls + 1, chunk.len());
        call(chunk).await?;
        calls += 1;
    }
    Ok(calls)
}
