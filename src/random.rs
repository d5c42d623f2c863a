//! Utilities related to random numbers.

use crate::{
    field::{GridValues2, SampleCoords2},
    geometry::{Dim2, In2D},
    num::BFloat,
};
use ndarray::prelude::*;
use num::Complex;
use rand::{
    distributions::{uniform::SampleUniform, Distribution, Uniform},
    rngs::StdRng,
    Rng, SeedableRng,
};

/// Creates a random number generator that is reproducible if a seed is given.
pub fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn draw_complex<F, R>(distribution: &Uniform<F>, rng: &mut R) -> Complex<F>
where
    F: BFloat + SampleUniform,
    R: Rng,
{
    Complex::new(distribution.sample(rng), distribution.sample(rng))
}

/// Draws grid values whose real and imaginary parts are uniform in `[-1, 1)`.
pub fn draw_grid_values<F, R>(shape: In2D<usize>, rng: &mut R) -> GridValues2<F>
where
    F: BFloat + SampleUniform,
    R: Rng,
{
    let distribution = Uniform::new(-F::one(), F::one());
    let mut grid_values = GridValues2::zeros(shape);
    grid_values
        .values_mut()
        .iter_mut()
        .for_each(|value| *value = draw_complex(&distribution, rng));
    grid_values
}

/// Draws sample values whose real and imaginary parts are uniform in `[-1, 1)`.
pub fn draw_sample_values<F, R>(n_samples: usize, rng: &mut R) -> Array1<Complex<F>>
where
    F: BFloat + SampleUniform,
    R: Rng,
{
    let distribution = Uniform::new(-F::one(), F::one());
    Array1::from_shape_simple_fn(n_samples, || draw_complex(&distribution, rng))
}

/// Draws sample coordinates uniformly over the given number of periods of the grid
/// along each axis, centered on the fundamental period.
pub fn draw_sample_coords<F, R>(
    shape: &In2D<usize>,
    n_periods: F,
    n_samples: usize,
    rng: &mut R,
) -> SampleCoords2<F>
where
    F: BFloat + SampleUniform,
    R: Rng,
{
    let distributions = In2D::with_each_component(|dim: Dim2| {
        let size = F::from_index(shape[dim] as i64);
        let half_extent = F::from_f64(0.5).unwrap_or_else(F::zero) * n_periods * size;
        let center = F::from_f64(0.5).unwrap_or_else(F::zero) * size;
        Uniform::new(center - half_extent, center + half_extent)
    });
    let pairs: Vec<(F, F)> = (0..n_samples)
        .map(|_| {
            (
                distributions[Dim2::X].sample(rng),
                distributions[Dim2::Y].sample(rng),
            )
        })
        .collect();
    SampleCoords2::from_pairs(&pairs)
}
