//! Rayon-based parallelisation of independent trials.
//!
//! Trials are embarrassingly parallel: the map runs over trial indices and
//! `collect` preserves index order, so the reduce step sees the same
//! sequence whatever the thread count.

use rayon::prelude::*;

/// Minimum trials handed to one Rayon task.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Trial count from which the map runs in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1_000;

/// Configuration for parallel execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Minimum trials per Rayon task
    pub batch_size: usize,
    /// Minimum trial count before using parallelism
    pub parallel_threshold: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ParallelConfig {
    /// Creates a new parallel configuration.
    pub fn new(batch_size: usize, parallel_threshold: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            parallel_threshold,
        }
    }

    /// Always sequential.
    pub fn sequential() -> Self {
        Self::new(DEFAULT_BATCH_SIZE, usize::MAX)
    }

    /// Returns whether to use parallel processing for the given item count.
    #[inline]
    pub fn should_parallelize(&self, n_items: usize) -> bool {
        n_items >= self.parallel_threshold
    }

    /// Maps `mapper` over `0..n`, in parallel above the threshold.
    ///
    /// The output is in index order either way.
    pub fn map_indices<R, F>(&self, n: usize, mapper: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Sync + Send,
    {
        if self.should_parallelize(n) {
            (0..n)
                .into_par_iter()
                .with_min_len(self.batch_size)
                .map(mapper)
                .collect()
        } else {
            (0..n).map(mapper).collect()
        }
    }
}
