//! Worker pool for per-origin searches.
//!
//! Batch solvers fan independent single-origin searches out over a fixed
//! pool.  Each worker owns one [`DijkstraSpt`] for the whole batch, the
//! network is shared read-only, and results come back in input order no
//! matter which worker finished first.
//!
//! Without the `parallel` feature the same API runs sequentially on the
//! calling thread with a single engine.

use nf_algo::DijkstraSpt;
use nf_core::NfResult;

pub struct WorkerPool {
    #[cfg(feature = "parallel")]
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    /// Pool of `threads` workers; `None` uses every logical core.
    pub fn new(threads: Option<usize>) -> NfResult<Self> {
        #[cfg(feature = "parallel")]
        {
            let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("nf-worker-{i}"));
            if let Some(n) = threads {
                builder = builder.num_threads(n);
            }
            let pool = builder
                .build()
                .map_err(|e| nf_core::NfError::Config(format!("worker pool: {e}")))?;
            Ok(Self { pool })
        }

        #[cfg(not(feature = "parallel"))]
        {
            let _ = threads;
            Ok(Self {})
        }
    }

    /// Number of workers.
    pub fn threads(&self) -> usize {
        #[cfg(feature = "parallel")]
        {
            self.pool.current_num_threads()
        }

        #[cfg(not(feature = "parallel"))]
        {
            1
        }
    }

    /// Run `task` once per item with a per-worker engine of heap arity
    /// `arity`.  Output order matches `items`.
    pub fn map_with_engine<I, T, F>(&self, items: &[I], arity: usize, task: F) -> Vec<T>
    where
        I: Sync,
        T: Send,
        F: Fn(&mut DijkstraSpt, &I) -> T + Sync + Send,
    {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.pool.install(|| {
                items
                    .par_iter()
                    .map_init(|| DijkstraSpt::with_arity(Some(arity)), |spt, item| task(spt, item))
                    .collect()
            })
        }

        #[cfg(not(feature = "parallel"))]
        {
            let mut spt = DijkstraSpt::with_arity(Some(arity));
            items.iter().map(|item| task(&mut spt, item)).collect()
        }
    }
}
