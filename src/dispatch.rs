//! Parallel dispatch of the interpolation kernel over samples.
//!
//! The forward direction writes every sample slot from exactly one task, so the
//! samples are simply distributed over the worker pool in dynamically scheduled
//! chunks. The adjoint direction writes to shared grid cells, so every worker
//! accumulates into a private grid and the private grids are summed once all
//! workers are done.

use crate::{
    error::{InterpError, InterpResult},
    field::SampleCoords2,
    interpolation::TableInterpolator,
    io::Verbosity,
    kernel::Interp2Kernel,
    num::TableValue,
};
use indicatif::ParallelProgressIterator;
use ndarray::prelude::*;
use num::{Complex, Zero};
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};
use std::{num::NonZeroUsize, thread};

/// How many worker threads to use and how to split the samples between them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parallelism {
    n_threads: NonZeroUsize,
    min_samples_per_task: usize,
}

impl Parallelism {
    /// Smallest number of samples handed to a task by default.
    pub const DEFAULT_MIN_SAMPLES_PER_TASK: usize = 64;

    /// Creates a configuration using the given number of worker threads.
    pub fn new(n_threads: usize) -> InterpResult<Self> {
        let n_threads = NonZeroUsize::new(n_threads).ok_or_else(|| {
            InterpError::invalid_argument("Number of worker threads must be at least one")
        })?;
        Ok(Self {
            n_threads,
            min_samples_per_task: Self::DEFAULT_MIN_SAMPLES_PER_TASK,
        })
    }

    /// Creates a configuration using a single worker thread.
    pub fn sequential() -> Self {
        Self {
            n_threads: NonZeroUsize::MIN,
            min_samples_per_task: Self::DEFAULT_MIN_SAMPLES_PER_TASK,
        }
    }

    /// Creates a configuration using as many worker threads as the hardware supports.
    pub fn available() -> Self {
        Self {
            n_threads: thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
            min_samples_per_task: Self::DEFAULT_MIN_SAMPLES_PER_TASK,
        }
    }

    /// Sets the smallest number of samples handed to a task at a time.
    pub fn with_min_samples_per_task(mut self, min_samples_per_task: usize) -> Self {
        self.min_samples_per_task = min_samples_per_task.max(1);
        self
    }

    /// Returns the number of worker threads.
    pub fn n_threads(&self) -> usize {
        self.n_threads.get()
    }

    /// Returns the smallest number of samples handed to a task at a time.
    pub fn min_samples_per_task(&self) -> usize {
        self.min_samples_per_task
    }
}

/// A worker pool for running interpolation kernels.
///
/// The pool is created once and can be reused for any number of calls.
#[derive(Debug)]
pub struct Dispatcher {
    pool: ThreadPool,
    parallelism: Parallelism,
}

impl Dispatcher {
    /// Creates a new worker pool with the given parallelism.
    pub fn new(parallelism: &Parallelism) -> InterpResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(parallelism.n_threads())
            .thread_name(|idx| format!("tabnufft-worker-{}", idx))
            .build()
            .map_err(|err| {
                InterpError::resource_exhausted(format!("Could not create worker pool: {}", err))
            })?;
        Ok(Self {
            pool,
            parallelism: parallelism.clone(),
        })
    }

    /// Returns the parallelism of the pool.
    pub fn parallelism(&self) -> &Parallelism {
        &self.parallelism
    }

    /// Evaluates the kernel at every sample coordinate.
    ///
    /// # Parameters
    ///
    /// - `kernel`: Kernel to evaluate.
    /// - `grid_values`: Grid values with the first axis varying fastest.
    /// - `coords`: Sample coordinates.
    /// - `verbosity`: Whether and how to report progress.
    ///
    /// # Returns
    ///
    /// A `InterpResult` which is either:
    ///
    /// - `Ok`: Contains the value of every sample.
    /// - `Err`: `InvalidArgument` if the number of grid values does not match the grid,
    ///   otherwise the first error encountered. No partial result is returned.
    pub fn forward<V, I>(
        &self,
        kernel: &Interp2Kernel<'_, V, I>,
        grid_values: &[Complex<V::Real>],
        coords: &SampleCoords2<V::Real>,
        verbosity: &Verbosity,
    ) -> InterpResult<Array1<Complex<V::Real>>>
    where
        V: TableValue,
        I: TableInterpolator,
    {
        check_len(grid_values.len(), kernel.grid().n_cells(), "grid values")?;
        let n_samples = coords.n_samples();
        let mut sample_values = allocate_zeroed(n_samples, "sample values")?;

        if verbosity.print_messages() {
            println!(
                "Interpolating {} samples with {} ({} thread{})",
                n_samples,
                I::ORDER,
                self.parallelism.n_threads(),
                if self.parallelism.n_threads() == 1 { "" } else { "s" }
            );
        }

        self.pool.install(|| {
            sample_values
                .par_iter_mut()
                .enumerate()
                .with_min_len(self.parallelism.min_samples_per_task())
                .progress_with(verbosity.create_progress_bar(n_samples))
                .try_for_each_init(
                    || kernel.workspace(),
                    |workspace, (sample, sample_value)| {
                        *sample_value = kernel.forward_sample(
                            grid_values,
                            sample,
                            &coords.coord(sample),
                            workspace,
                        )?;
                        Ok(())
                    },
                )
        })?;

        Ok(Array1::from_vec(sample_values))
    }

    /// Scatters the sample values onto the grid with the conjugated kernel.
    ///
    /// Every worker handles a contiguous range of samples and accumulates into its
    /// own grid. The private grids are summed in worker order.
    ///
    /// # Parameters
    ///
    /// - `kernel`: Kernel to scatter with.
    /// - `sample_values`: Value of every sample.
    /// - `coords`: Sample coordinates.
    /// - `verbosity`: Whether and how to report progress.
    ///
    /// # Returns
    ///
    /// A `InterpResult` which is either:
    ///
    /// - `Ok`: Contains the grid values with the first axis varying fastest.
    /// - `Err`: `InvalidArgument` if there is not one value per sample coordinate,
    ///   otherwise the first error encountered. No partial result is returned.
    pub fn adjoint<V, I>(
        &self,
        kernel: &Interp2Kernel<'_, V, I>,
        sample_values: ArrayView1<'_, Complex<V::Real>>,
        coords: &SampleCoords2<V::Real>,
        verbosity: &Verbosity,
    ) -> InterpResult<Vec<Complex<V::Real>>>
    where
        V: TableValue,
        I: TableInterpolator,
    {
        let n_cells = kernel.grid().n_cells();
        let n_samples = coords.n_samples();
        check_len(sample_values.len(), n_samples, "sample values")?;
        let n_workers = self.parallelism.n_threads().min(n_samples).max(1);
        let samples_per_worker = (n_samples + n_workers - 1) / n_workers;

        if verbosity.print_messages() {
            println!(
                "Scattering {} samples with {} onto {} grid cells ({} private grid{})",
                n_samples,
                I::ORDER,
                n_cells,
                n_workers,
                if n_workers == 1 { "" } else { "s" }
            );
        }

        let progress_bar = verbosity.create_progress_bar(n_samples);

        let private_grids: Vec<Vec<Complex<V::Real>>> = self.pool.install(|| {
            (0..n_workers)
                .into_par_iter()
                .map(|worker| {
                    let mut grid_values = allocate_zeroed(n_cells, "private grid")?;
                    let mut workspace = kernel.workspace();

                    let start = (worker * samples_per_worker).min(n_samples);
                    let end = (start + samples_per_worker).min(n_samples);
                    for sample in start..end {
                        kernel.adjoint_sample(
                            sample_values[sample],
                            sample,
                            &coords.coord(sample),
                            &mut workspace,
                            &mut grid_values,
                        )?;
                    }
                    progress_bar.inc((end - start) as u64);
                    Ok(grid_values)
                })
                .collect::<InterpResult<Vec<_>>>()
        })?;
        progress_bar.finish_and_clear();

        let mut private_grids = private_grids.into_iter();
        let mut grid_values = match private_grids.next() {
            Some(first) => first,
            None => allocate_zeroed(n_cells, "grid values")?,
        };
        for private_grid in private_grids {
            grid_values
                .iter_mut()
                .zip(private_grid.iter())
                .for_each(|(total, &private)| *total = *total + private);
        }
        Ok(grid_values)
    }
}

fn check_len(len: usize, expected_len: usize, description: &str) -> InterpResult<()> {
    if len == expected_len {
        Ok(())
    } else {
        Err(InterpError::invalid_argument(format!(
            "Expected {} {}, got {}",
            expected_len, description, len
        )))
    }
}

/// Allocates a buffer of the given length filled with zeros, reporting failure
/// instead of aborting.
fn allocate_zeroed<F>(len: usize, description: &str) -> InterpResult<Vec<Complex<F>>>
where
    Complex<F>: Clone + Zero,
{
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|err| {
        InterpError::resource_exhausted(format!(
            "Could not allocate {} for {} values: {}",
            description, len, err
        ))
    })?;
    buffer.resize(len, Complex::zero());
    Ok(buffer)
}
