#![allow(dead_code)]

use ndarray::prelude::*;
use num::Complex;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f64::consts::PI;
use tabnufft::{
    dispatch::{Dispatcher, Parallelism},
    field::{GridValues2, SampleCoords2},
    geometry::In2D,
    interp2::{Interp2Params, TableInterp2},
    interpolation::InterpOrder,
    io::Verbosity,
    num::TableValue,
    table::KernelTable,
};

/// Coordinates are drawn on a grid of this many points per grid unit, so that they
/// and any shift by a whole number of periods are exactly representable.
pub const COORD_RESOLUTION: i64 = 64;

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn random_complex<R: Rng>(rng: &mut R) -> Complex<f64> {
    Complex::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
}

pub fn random_grid<R: Rng>(shape: In2D<usize>, rng: &mut R) -> GridValues2<f64> {
    let values = (0..shape.product()).map(|_| random_complex(rng)).collect();
    GridValues2::from_vec(shape, values).unwrap()
}

pub fn random_samples<R: Rng>(n_samples: usize, rng: &mut R) -> Array1<Complex<f64>> {
    Array1::from_shape_simple_fn(n_samples, || random_complex(rng))
}

/// Draws coordinates spread over three periods of the grid along each axis.
pub fn random_coords<R: Rng>(
    shape: &In2D<usize>,
    n_samples: usize,
    rng: &mut R,
) -> SampleCoords2<f64> {
    let mut draw = |size: usize| {
        let extent = 3 * size as i64 * COORD_RESOLUTION;
        rng.gen_range(-extent..extent) as f64 / COORD_RESOLUTION as f64
    };
    let pairs: Vec<_> = (0..n_samples)
        .map(|_| (draw(shape.to_tuple().0), draw(shape.to_tuple().1)))
        .collect();
    SampleCoords2::from_pairs(&pairs)
}

pub fn single_precision_grid(grid_values: &GridValues2<f64>) -> GridValues2<f32> {
    GridValues2::from_array(
        grid_values
            .values()
            .mapv(|value| Complex::new(value.re as f32, value.im as f32))
            .view(),
    )
}

pub fn single_precision_samples(sample_values: &Array1<Complex<f64>>) -> Array1<Complex<f32>> {
    sample_values.mapv(|value| Complex::new(value.re as f32, value.im as f32))
}

/// Coordinates from `random_coords` are exactly representable in single precision.
pub fn single_precision_coords(coords: &SampleCoords2<f64>) -> SampleCoords2<f32> {
    let pairs: Vec<_> = (0..coords.n_samples())
        .map(|sample| {
            let (x, y) = coords.coord(sample).to_tuple();
            (x as f32, y as f32)
        })
        .collect();
    SampleCoords2::from_pairs(&pairs)
}

pub fn triangular_tables(support: &In2D<usize>, oversampling: &In2D<usize>) -> In2D<KernelTable<f64>> {
    In2D::with_each_component(|dim| KernelTable::triangular(support[dim], oversampling[dim]).unwrap())
}

/// Triangular kernel with a phase varying linearly across the support.
pub fn phased_tables(
    support: &In2D<usize>,
    oversampling: &In2D<usize>,
) -> In2D<KernelTable<Complex<f64>>> {
    In2D::with_each_component(|dim| {
        let half_width = 0.5 * support[dim] as f64;
        KernelTable::tabulate(support[dim], oversampling[dim], |offset: f64| {
            let magnitude = (1.0 - offset.abs() / half_width).max(0.0);
            Complex::from_polar(magnitude, 0.3 * PI * offset)
        })
        .unwrap()
    })
}

pub fn params(
    grid_shape: In2D<usize>,
    support: In2D<usize>,
    oversampling: In2D<usize>,
    order: InterpOrder,
    sign_flips: In2D<bool>,
) -> Interp2Params {
    Interp2Params::new(grid_shape, support, oversampling, order)
        .unwrap()
        .with_sign_flips(sign_flips)
}

pub fn operator<V: TableValue>(params: &Interp2Params, tables: In2D<KernelTable<V>>) -> TableInterp2<V> {
    TableInterp2::new(params, tables).unwrap()
}

pub fn dispatcher(n_threads: usize) -> Dispatcher {
    Dispatcher::new(&Parallelism::new(n_threads).unwrap().with_min_samples_per_task(4)).unwrap()
}

pub fn forward<V: TableValue<Real = f64>>(
    operator: &TableInterp2<V>,
    grid_values: &GridValues2<f64>,
    coords: &SampleCoords2<f64>,
    dispatcher: &Dispatcher,
) -> Array1<Complex<f64>> {
    operator
        .forward(grid_values, coords, dispatcher, &Verbosity::Quiet)
        .unwrap()
}

pub fn adjoint<V: TableValue<Real = f64>>(
    operator: &TableInterp2<V>,
    sample_values: &Array1<Complex<f64>>,
    coords: &SampleCoords2<f64>,
    dispatcher: &Dispatcher,
) -> GridValues2<f64> {
    operator
        .adjoint(sample_values, coords, dispatcher, &Verbosity::Quiet)
        .unwrap()
}

/// Computes `sqrt(sum(|a - b|^2) / sum(|b|^2))`.
pub fn relative_deviation<'a, I>(values: I, reference: I) -> f64
where
    I: IntoIterator<Item = &'a Complex<f64>>,
{
    let (difference, norm) = values.into_iter().zip(reference).fold(
        (0.0, 0.0),
        |(difference, norm), (value, reference)| {
            (
                difference + (value - reference).norm_sqr(),
                norm + reference.norm_sqr(),
            )
        },
    );
    if difference == 0.0 {
        0.0
    } else {
        (difference / norm).sqrt()
    }
}
