// SPDX-License-Identifier: AGPL-3.0-only

//! Execution contexts: where data-parallel solver stages run.
//!
//! Every per-particle and per-pair stage of the solver is a pure function of
//! its index. A context evaluates that function for every index in
//! `[0, count)` and returns the results in index order, so the caller sees
//! the same vector no matter how the work was scheduled. Writes into the
//! shared tensor blocks happen afterwards, in a single ordered scatter, which
//! keeps accumulated corrections bitwise reproducible across contexts.
//!
//! | Context | Substrate | Use |
//! |---------|-----------|-----|
//! | [`Serial`] | one host thread | reference path, debugging |
//! | [`Threaded`] | rayon work-stealing pool | production path |

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::StokesianError;

/// Capability required by the solver from an execution substrate.
///
/// `op` must be a pure function of its index: no ordering between indices
/// is guaranteed and the context may call it from several threads at once.
pub trait ExecutionContext: Send + Sync {
    /// Short identifier used in log output.
    fn name(&self) -> &'static str;

    /// Evaluate `op(i)` for every `i` in `[0, count)`; element `i` of the
    /// result is `op(i)`.
    fn map<T, F>(&self, count: usize, op: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync;

    /// Produce the value at every position of a `count`-long vector.
    fn tabulate<F>(&self, count: usize, op: F) -> Vec<f64>
    where
        F: Fn(usize) -> f64 + Send + Sync,
    {
        self.map(count, op)
    }

    /// Copy a host slice into a buffer owned by this context.
    fn upload(&self, host: &[f64]) -> Vec<f64> {
        host.to_vec()
    }

    /// Copy a context-owned buffer back to the host.
    fn download(&self, buffer: &[f64]) -> Vec<f64> {
        buffer.to_vec()
    }
}

/// Single-threaded reference context.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serial;

impl ExecutionContext for Serial {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn map<T, F>(&self, count: usize, op: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        (0..count).map(op).collect()
    }
}

/// Multi-core host context backed by rayon.
///
/// Uses the global rayon pool unless built with [`Threaded::with_threads`].
#[derive(Debug, Default)]
pub struct Threaded {
    pool: Option<ThreadPool>,
}

impl Threaded {
    /// Context on a dedicated pool of `threads` workers.
    ///
    /// # Errors
    ///
    /// Returns [`StokesianError::ThreadPool`] if rayon cannot spawn the pool.
    pub fn with_threads(threads: usize) -> Result<Self, StokesianError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| StokesianError::ThreadPool(e.to_string()))?;
        Ok(Self { pool: Some(pool) })
    }

    /// Number of worker threads this context schedules onto.
    #[must_use]
    pub fn threads(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, ThreadPool::current_num_threads)
    }
}

impl ExecutionContext for Threaded {
    fn name(&self) -> &'static str {
        "threaded"
    }

    fn map<T, F>(&self, count: usize, op: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        let run = || -> Vec<T> { (0..count).into_par_iter().map(&op).collect() };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    fn upload(&self, host: &[f64]) -> Vec<f64> {
        host.par_iter().copied().collect()
    }

    fn download(&self, buffer: &[f64]) -> Vec<f64> {
        buffer.par_iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_map_preserves_order() {
        let out = Serial.map(5, |i| i * i);
        assert_eq!(out, vec![0, 1, 4, 9, 16]);
    }

    #[test]
    fn threaded_map_preserves_order() {
        let ctx = Threaded::with_threads(4).unwrap();
        let out = ctx.map(1000, |i| i as f64 * 0.5);
        for (i, v) in out.iter().enumerate() {
            assert_eq!(*v, i as f64 * 0.5);
        }
    }

    #[test]
    fn contexts_agree_bitwise() {
        let op = |i: usize| ((i as f64) * 0.1).sin() / (1.0 + i as f64);
        let a = Serial.tabulate(777, op);
        let b = Threaded::default().tabulate(777, op);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_range_yields_empty_vector() {
        let out: Vec<f64> = Threaded::default().map(0, |_| 1.0);
        assert!(out.is_empty());
    }

    #[test]
    fn upload_download_round_trip() {
        let ctx = Threaded::default();
        let host = vec![1.0, -2.0, 3.5];
        let buf = ctx.upload(&host);
        assert_eq!(ctx.download(&buf), host);
    }

    #[test]
    fn dedicated_pool_reports_thread_count() {
        let ctx = Threaded::with_threads(2).unwrap();
        assert_eq!(ctx.threads(), 2);
    }
}
