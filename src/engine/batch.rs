//! Bounded-concurrency batch execution
//!
//! Items are split into consecutive chunks of at most `batch_size`. All items
//! of a chunk run concurrently on the calling task; the next chunk starts only
//! once every item of the current one has settled.

use crate::config::DEFAULT_BATCH_SIZE;
use futures::future::try_join_all;
use std::future::Future;

/// Runs an async task over items, one chunk at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRunner {
    batch_size: usize,
}

impl BatchRunner {
    /// Creates a runner; a batch size of zero is treated as one
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of chunks `len` items are split into
    pub fn batch_count(&self, len: usize) -> usize {
        len.div_ceil(self.batch_size)
    }

    /// Runs `task` over every item and returns the results in item order
    ///
    /// `on_batch_complete(batch_index, batch_count)` is called after each chunk
    /// has fully settled.
    ///
    /// # Errors
    ///
    /// The first task error aborts the run: the remaining tasks of its chunk
    /// are dropped, no further chunk starts, and the error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use gsc_reindex::engine::BatchRunner;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let runner = BatchRunner::new(2);
    /// let items = vec![1, 2, 3];
    /// let doubled = runner
    ///     .run(
    ///         |n: &i32| {
    ///             let n = *n;
    ///             async move { Ok::<_, ()>(n * 2) }
    ///         },
    ///         &items,
    ///         |_, _| {},
    ///     )
    ///     .await
    ///     .unwrap();
    /// assert_eq!(doubled, vec![2, 4, 6]);
    /// # }
    /// ```
    pub async fn run<'a, T, R, E, F, Fut, C>(
        &self,
        task: F,
        items: &'a [T],
        mut on_batch_complete: C,
    ) -> Result<Vec<R>, E>
    where
        F: Fn(&'a T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        C: FnMut(usize, usize),
    {
        let batch_count = self.batch_count(items.len());
        let mut results = Vec::with_capacity(items.len());

        for (batch_index, chunk) in items.chunks(self.batch_size).enumerate() {
            let chunk_results = try_join_all(chunk.iter().map(&task)).await?;
            results.extend(chunk_results);
            on_batch_complete(batch_index, batch_count);
        }

        Ok(results)
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}
