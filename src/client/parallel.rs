//! Concurrent fetching of chunked list requests.
//!
//! Used by the batched reference fetcher to resolve many ids with a bounded
//! number of in-flight `list` calls.

use std::future::Future;
use std::pin::Pin;

use futures::stream::{FuturesUnordered, StreamExt};
use log::debug;

use crate::error::Result;

/// Boxed future yielding a chunk index and its outcome
type ChunkFuture<T> = Pin<Box<dyn Future<Output = (usize, Result<Vec<T>>)> + Send>>;

/// Fetch every chunk, keeping at most `max_concurrent` requests in flight.
///
/// Unlike a fail-fast join, every chunk runs to completion: the result for
/// each chunk is returned alongside its index, in arrival order, so callers
/// can keep the rows of successful chunks and report the failed ones.
///
/// # Example
///
/// ```ignore
/// let chunks: Vec<Vec<String>> = ids.chunks(30).map(<[_]>::to_vec).collect();
/// let outcomes = fetch_chunks(
///     chunks,
///     |chunk| {
///         let api = api.clone();
///         async move {
///             let query = ListQuery::new().filter_in("user_id", chunk);
///             api.list(endpoint, &query).await.map(|r| r.results)
///         }
///     },
///     8,
/// ).await;
/// ```
pub async fn fetch_chunks<I, T, F, Fut>(
    chunks: Vec<I>,
    fetch_chunk: F,
    max_concurrent: usize,
) -> Vec<(usize, Result<Vec<T>>)>
where
    T: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
{
    if chunks.is_empty() {
        return Vec::new();
    }

    let max_concurrent = max_concurrent.max(1);
    debug!(
        "Fetching {} chunks with max {} concurrent",
        chunks.len(),
        max_concurrent
    );

    let mut outcomes = Vec::with_capacity(chunks.len());
    let mut futures: FuturesUnordered<ChunkFuture<T>> = FuturesUnordered::new();
    let mut pending = chunks.into_iter().enumerate();

    let make_future = |index: usize, chunk: I, f: &F| -> ChunkFuture<T> {
        let fut = f(chunk);
        Box::pin(async move { (index, fut.await) })
    };

    for (index, chunk) in pending.by_ref().take(max_concurrent) {
        futures.push(make_future(index, chunk, &fetch_chunk));
    }

    while let Some((index, result)) = futures.next().await {
        match &result {
            Ok(rows) => debug!("Chunk {} returned {} rows", index, rows.len()),
            Err(e) => debug!("Chunk {} failed: {}", index, e),
        }
        outcomes.push((index, result));

        if let Some((next, chunk)) = pending.next() {
            futures.push(make_future(next, chunk, &fetch_chunk));
        }
    }

    outcomes
}
