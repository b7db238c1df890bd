//! Order-preserving parallel map over independent work units.
//!
//! The Rust counterpart of MNE's `parallel_func`: one interface, two
//! backends.
//!
//! - [`Parallel::Sequential`] — plain loop on the calling thread.
//! - [`Parallel::Pool`] — a dedicated rayon pool with `n_jobs` threads
//!   (only with the `parallel` feature).
//!
//! Both return results index-aligned with the inputs. Units receive shared
//! references only, so a unit cannot mutate caller-owned state.
use crate::error::PsdError;

/// Resolve a user-facing `n_jobs` to a worker count.
///
/// Positive values are used as-is. Non-positive values count back from the
/// number of CPUs, like joblib: `-1` → all cores, `-2` → all but one. `0` is
/// treated as "all cores".
///
/// ```
/// use exg_psd::parallel::check_n_jobs;
/// assert_eq!(check_n_jobs(3).unwrap(), 3);
/// assert!(check_n_jobs(-1).unwrap() >= 1);
/// ```
pub fn check_n_jobs(n_jobs: i32) -> Result<usize, PsdError> {
    if n_jobs > 0 {
        return Ok(n_jobs as usize);
    }
    let n_cores = std::thread::available_parallelism().map_or(1, |n| n.get());
    let n = (n_cores as i64 + n_jobs as i64 + 1).min(n_cores as i64);
    if n <= 0 {
        return Err(PsdError::InvalidJobs { n_jobs, n_cores });
    }
    Ok(n as usize)
}

/// Dispatcher for independent, index-aligned work units.
#[derive(Debug)]
pub enum Parallel {
    Sequential,
    #[cfg(feature = "parallel")]
    Pool(rayon::ThreadPool),
}

impl Parallel {
    /// Pick a backend for `n_jobs` workers.
    ///
    /// One worker runs sequentially. More workers build a rayon pool; if the
    /// `parallel` feature is off or the pool cannot be built, a warning is
    /// logged and execution falls back to sequential.
    pub fn new(n_jobs: i32) -> Result<Self, PsdError> {
        let n = check_n_jobs(n_jobs)?;
        if n == 1 {
            return Ok(Parallel::Sequential);
        }
        Ok(Self::pool(n))
    }

    #[cfg(feature = "parallel")]
    fn pool(n: usize) -> Self {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .thread_name(|i| format!("exg-psd-{i}"))
            .build()
        {
            Ok(pool) => {
                tracing::debug!(n_jobs = n, "dispatching on rayon pool");
                Parallel::Pool(pool)
            }
            Err(e) => {
                tracing::warn!("could not build a {n}-thread pool ({e}); running sequentially");
                Parallel::Sequential
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn pool(n: usize) -> Self {
        tracing::warn!("n_jobs={n} requested but the `parallel` feature is disabled; running sequentially");
        Parallel::Sequential
    }

    /// Effective number of workers.
    pub fn n_jobs(&self) -> usize {
        match self {
            Parallel::Sequential => 1,
            #[cfg(feature = "parallel")]
            Parallel::Pool(pool) => pool.current_num_threads(),
        }
    }

    /// Apply `f` to every input; result `i` belongs to `inputs[i]`.
    ///
    /// On failure no results are returned. Sequentially, iteration stops at
    /// the first failing unit. On a pool, every unit already handed to a
    /// worker runs to completion, then the error of the lowest-index failing
    /// unit is returned.
    pub fn map<A, T, E, F>(&self, inputs: &[A], f: F) -> Result<Vec<T>, E>
    where
        A: Sync,
        T: Send,
        E: Send,
        F: Fn(&A) -> Result<T, E> + Sync + Send,
    {
        match self {
            Parallel::Sequential => inputs.iter().map(f).collect(),
            #[cfg(feature = "parallel")]
            Parallel::Pool(pool) => {
                use rayon::prelude::*;
                let results: Vec<Result<T, E>> =
                    pool.install(|| inputs.par_iter().map(&f).collect());
                results.into_iter().collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn slow_square(x: &u64) -> Result<u64, String> {
        // Earlier inputs sleep longer so completion order is reversed.
        std::thread::sleep(Duration::from_millis(20u64.saturating_sub(*x * 2)));
        Ok(x * x)
    }

    #[test]
    fn check_n_jobs_positive_passthrough() {
        assert_eq!(check_n_jobs(1).unwrap(), 1);
        assert_eq!(check_n_jobs(8).unwrap(), 8);
    }

    #[test]
    fn check_n_jobs_negative_counts_from_cores() {
        let n_cores = std::thread::available_parallelism().map_or(1, |n| n.get());
        assert_eq!(check_n_jobs(-1).unwrap(), n_cores);
        assert_eq!(check_n_jobs(0).unwrap(), n_cores);
        assert!(matches!(
            check_n_jobs(-(n_cores as i32) - 1),
            Err(PsdError::InvalidJobs { .. })
        ));
    }

    #[test]
    fn one_job_is_sequential() {
        let p = Parallel::new(1).unwrap();
        assert!(matches!(p, Parallel::Sequential));
        assert_eq!(p.n_jobs(), 1);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn many_jobs_build_a_pool() {
        let p = Parallel::new(4).unwrap();
        assert!(matches!(p, Parallel::Pool(_)));
        assert_eq!(p.n_jobs(), 4);
    }

    #[test]
    fn order_preserved_across_backends() {
        let inputs: Vec<u64> = (0..10).collect();
        let seq = Parallel::new(1).unwrap().map(&inputs, slow_square).unwrap();
        let par = Parallel::new(4).unwrap().map(&inputs, slow_square).unwrap();
        let expected: Vec<u64> = inputs.iter().map(|x| x * x).collect();
        assert_eq!(seq, expected);
        assert_eq!(par, expected);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let out: Vec<u64> = Parallel::new(4).unwrap().map(&[] as &[u64], slow_square).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn sequential_failure_stops_early() {
        let calls = AtomicUsize::new(0);
        let inputs = [0, 1, 2, 3, 4];
        let res: Result<Vec<i32>, String> = Parallel::Sequential.map(&inputs, |&i| {
            calls.fetch_add(1, Ordering::SeqCst);
            if i == 1 { Err(format!("unit {i} failed")) } else { Ok(i) }
        });
        assert_eq!(res, Err("unit 1 failed".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn pooled_failure_reports_lowest_index() {
        let calls = AtomicUsize::new(0);
        let inputs = [0, 1, 2, 3, 4];
        let res: Result<Vec<i32>, String> = Parallel::new(4).unwrap().map(&inputs, |&i| {
            calls.fetch_add(1, Ordering::SeqCst);
            if i == 1 || i == 3 { Err(format!("unit {i} failed")) } else { Ok(i) }
        });
        assert_eq!(res, Err("unit 1 failed".to_string()));
        #[cfg(feature = "parallel")]
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }
}
