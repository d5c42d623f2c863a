//! Two-dimensional periodic table interpolation, forward and adjoint.

use crate::{
    dispatch::{Dispatcher, Parallelism},
    error::{InterpError, InterpResult},
    field::{GridValues2, SampleCoords2, SplitPlanes},
    geometry::{Dim2, In2D},
    grid::PeriodicGrid2,
    interpolation::{InterpOrder, LinearTableInterpolator, NearestTableInterpolator},
    io::Verbosity,
    kernel::Interp2Kernel,
    num::TableValue,
    table::KernelTable,
};
use ndarray::prelude::*;
use num::Complex;

/// Parameters describing the grid and the kernel tables of an interpolation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interp2Params {
    grid_shape: In2D<usize>,
    support: In2D<usize>,
    oversampling: In2D<usize>,
    order: InterpOrder,
    sign_flips: In2D<bool>,
}

impl Interp2Params {
    /// Creates a new set of interpolation parameters.
    ///
    /// # Parameters
    ///
    /// - `grid_shape`: Number of grid cells `(K1, K2)`.
    /// - `support`: Kernel support widths `(J1, J2)` in grid units.
    /// - `oversampling`: Table entries per grid unit `(L1, L2)`.
    /// - `order`: Order of the interpolation between table entries.
    ///
    /// # Returns
    ///
    /// A `InterpResult` which is either:
    ///
    /// - `Ok`: Contains the parameters, with sign flipping disabled on both axes.
    /// - `Err`: `InvalidArgument` if any of the sizes is zero.
    pub fn new(
        grid_shape: In2D<usize>,
        support: In2D<usize>,
        oversampling: In2D<usize>,
        order: InterpOrder,
    ) -> InterpResult<Self> {
        for dim in Dim2::slice() {
            if grid_shape[dim] == 0 || support[dim] == 0 || oversampling[dim] == 0 {
                return Err(InterpError::invalid_argument(format!(
                    "Grid size ({}), kernel support ({}) and oversampling ({}) along {} must all be at least one",
                    grid_shape[dim], support[dim], oversampling[dim], dim
                )));
            }
        }
        Ok(Self {
            grid_shape,
            support,
            oversampling,
            order,
            sign_flips: In2D::same(false),
        })
    }

    /// Sets for each axis whether the kernel changes sign every time a grid index
    /// wraps around the periodic boundary.
    pub fn with_sign_flips(mut self, sign_flips: In2D<bool>) -> Self {
        self.sign_flips = sign_flips;
        self
    }

    pub fn grid_shape(&self) -> &In2D<usize> {
        &self.grid_shape
    }

    pub fn support(&self) -> &In2D<usize> {
        &self.support
    }

    pub fn oversampling(&self) -> &In2D<usize> {
        &self.oversampling
    }

    pub fn order(&self) -> InterpOrder {
        self.order
    }

    pub fn sign_flips(&self) -> &In2D<bool> {
        &self.sign_flips
    }

    fn create_grid(&self) -> InterpResult<PeriodicGrid2> {
        PeriodicGrid2::new(self.grid_shape.clone(), self.sign_flips.clone())
    }

    fn validate_tables<V: TableValue>(&self, tables: &In2D<&KernelTable<V>>) -> InterpResult<()> {
        for dim in Dim2::slice() {
            let table = tables[dim];
            if table.support() != self.support[dim]
                || table.oversampling() != self.oversampling[dim]
            {
                return Err(InterpError::invalid_argument(format!(
                    "Kernel table for {} has support {} and oversampling {}, expected {} and {}",
                    dim,
                    table.support(),
                    table.oversampling(),
                    self.support[dim],
                    self.oversampling[dim]
                )));
            }
        }
        Ok(())
    }
}

/// A validated interpolation operator that can be applied any number of times.
#[derive(Clone, Debug)]
pub struct TableInterp2<V: TableValue> {
    grid: PeriodicGrid2,
    tables: In2D<KernelTable<V>>,
    order: InterpOrder,
}

impl<V: TableValue> TableInterp2<V> {
    /// Creates a new interpolation operator from the given parameters and kernel tables.
    pub fn new(params: &Interp2Params, tables: In2D<KernelTable<V>>) -> InterpResult<Self> {
        params.validate_tables(&tables.as_refs())?;
        Ok(Self {
            grid: params.create_grid()?,
            tables,
            order: params.order(),
        })
    }

    /// Returns the periodic grid the operator acts on.
    pub fn grid(&self) -> &PeriodicGrid2 {
        &self.grid
    }

    /// Returns the kernel table used along the given axis.
    pub fn table(&self, dim: Dim2) -> &KernelTable<V> {
        &self.tables[dim]
    }

    /// Returns the order of the interpolation between table entries.
    pub fn order(&self) -> InterpOrder {
        self.order
    }

    /// Evaluates the grid values at the given sample coordinates.
    ///
    /// # Parameters
    ///
    /// - `grid_values`: Values on the full `K1 x K2` grid.
    /// - `coords`: Coordinates of the samples in grid units.
    /// - `dispatcher`: Worker pool to run on.
    /// - `verbosity`: Whether and how to report progress.
    ///
    /// # Returns
    ///
    /// A `InterpResult` which is either:
    ///
    /// - `Ok`: Contains one value per sample.
    /// - `Err`: `InvalidArgument` if the grid shape is wrong, or `CoordinateOutOfRange`
    ///   for the first coordinate that could not be mapped.
    pub fn forward(
        &self,
        grid_values: &GridValues2<V::Real>,
        coords: &SampleCoords2<V::Real>,
        dispatcher: &Dispatcher,
        verbosity: &Verbosity,
    ) -> InterpResult<Array1<Complex<V::Real>>> {
        if grid_values.shape() != self.grid.shape() {
            return Err(InterpError::invalid_argument(format!(
                "Grid values have shape {}, expected {}",
                grid_values.shape(),
                self.grid.shape()
            )));
        }
        forward_with_order(
            &self.grid,
            self.tables.as_refs(),
            self.order,
            grid_values.as_slice(),
            coords,
            dispatcher,
            verbosity,
        )
    }

    /// Scatters the sample values onto the grid with the conjugated kernel.
    ///
    /// # Parameters
    ///
    /// - `sample_values`: One value per sample.
    /// - `coords`: Coordinates of the samples in grid units.
    /// - `dispatcher`: Worker pool to run on.
    /// - `verbosity`: Whether and how to report progress.
    ///
    /// # Returns
    ///
    /// A `InterpResult` which is either:
    ///
    /// - `Ok`: Contains the values on the full `K1 x K2` grid.
    /// - `Err`: `InvalidArgument` if the number of sample values and coordinates differ,
    ///   `CoordinateOutOfRange` for the first coordinate that could not be mapped or
    ///   `ResourceExhausted` if the private grids could not be allocated.
    pub fn adjoint(
        &self,
        sample_values: &Array1<Complex<V::Real>>,
        coords: &SampleCoords2<V::Real>,
        dispatcher: &Dispatcher,
        verbosity: &Verbosity,
    ) -> InterpResult<GridValues2<V::Real>> {
        let values = adjoint_with_order(
            &self.grid,
            self.tables.as_refs(),
            self.order,
            sample_values.view(),
            coords,
            dispatcher,
            verbosity,
        )?;
        GridValues2::from_vec(self.grid.shape(), values)
    }
}

fn forward_with_order<V: TableValue>(
    grid: &PeriodicGrid2,
    tables: In2D<&KernelTable<V>>,
    order: InterpOrder,
    grid_values: &[Complex<V::Real>],
    coords: &SampleCoords2<V::Real>,
    dispatcher: &Dispatcher,
    verbosity: &Verbosity,
) -> InterpResult<Array1<Complex<V::Real>>> {
    match order {
        InterpOrder::Nearest => dispatcher.forward(
            &Interp2Kernel::new(grid, tables, NearestTableInterpolator),
            grid_values,
            coords,
            verbosity,
        ),
        InterpOrder::Linear => dispatcher.forward(
            &Interp2Kernel::new(grid, tables, LinearTableInterpolator),
            grid_values,
            coords,
            verbosity,
        ),
    }
}

fn adjoint_with_order<V: TableValue>(
    grid: &PeriodicGrid2,
    tables: In2D<&KernelTable<V>>,
    order: InterpOrder,
    sample_values: ArrayView1<'_, Complex<V::Real>>,
    coords: &SampleCoords2<V::Real>,
    dispatcher: &Dispatcher,
    verbosity: &Verbosity,
) -> InterpResult<Vec<Complex<V::Real>>> {
    if sample_values.len() != coords.n_samples() {
        return Err(InterpError::invalid_argument(format!(
            "Got {} sample values for {} sample coordinates",
            sample_values.len(),
            coords.n_samples()
        )));
    }
    match order {
        InterpOrder::Nearest => dispatcher.adjoint(
            &Interp2Kernel::new(grid, tables, NearestTableInterpolator),
            sample_values,
            coords,
            verbosity,
        ),
        InterpOrder::Linear => dispatcher.adjoint(
            &Interp2Kernel::new(grid, tables, LinearTableInterpolator),
            sample_values,
            coords,
            verbosity,
        ),
    }
}

/// Evaluates a grid given as split planes at the given sample coordinates.
///
/// # Parameters
///
/// - `grid_values`: `K1*K2` grid values with the first axis varying fastest.
/// - `tables`: Kernel table for each axis, real or complex.
/// - `params`: Grid shape, kernel sizes, interpolation order and sign flipping.
/// - `coords`: `2*M` coordinates, all first-axis coordinates followed by all second-axis coordinates.
/// - `n_samples`: Number of samples `M`.
/// - `parallelism`: Number of worker threads to use.
///
/// # Returns
///
/// A `InterpResult` which is either:
///
/// - `Ok`: Contains the `M` sample values as split planes.
/// - `Err`: The first error encountered. No partial result is returned.
pub fn interp2_forward<V: TableValue>(
    grid_values: &SplitPlanes<V::Real>,
    tables: In2D<&KernelTable<V>>,
    params: &Interp2Params,
    coords: &[V::Real],
    n_samples: usize,
    parallelism: &Parallelism,
) -> InterpResult<SplitPlanes<V::Real>> {
    params.validate_tables(&tables)?;
    let grid = params.create_grid()?;
    let grid_values = GridValues2::from_planes(grid.shape(), grid_values)?;
    let coords = SampleCoords2::from_blocks(coords.to_vec(), n_samples)?;
    let dispatcher = Dispatcher::new(parallelism)?;

    let sample_values = forward_with_order(
        &grid,
        tables,
        params.order(),
        grid_values.as_slice(),
        &coords,
        &dispatcher,
        &Verbosity::Quiet,
    )?;
    Ok(SplitPlanes::from_complex(sample_values.iter()))
}

/// Scatters sample values given as split planes onto the grid with the conjugated
/// kernel.
///
/// # Parameters
///
/// - `sample_values`: `M` sample values.
/// - `tables`: Kernel table for each axis, real or complex.
/// - `params`: Grid shape, kernel sizes, interpolation order and sign flipping.
/// - `coords`: `2*M` coordinates, all first-axis coordinates followed by all second-axis coordinates.
/// - `n_samples`: Number of samples `M`.
/// - `parallelism`: Number of worker threads to use.
///
/// # Returns
///
/// A `InterpResult` which is either:
///
/// - `Ok`: Contains the `K1*K2` grid values as split planes, first axis varying fastest.
/// - `Err`: The first error encountered. No partial result is returned.
pub fn interp2_adjoint<V: TableValue>(
    sample_values: &SplitPlanes<V::Real>,
    tables: In2D<&KernelTable<V>>,
    params: &Interp2Params,
    coords: &[V::Real],
    n_samples: usize,
    parallelism: &Parallelism,
) -> InterpResult<SplitPlanes<V::Real>> {
    params.validate_tables(&tables)?;
    let grid = params.create_grid()?;
    let coords = SampleCoords2::from_blocks(coords.to_vec(), n_samples)?;
    if sample_values.len() != n_samples {
        return Err(InterpError::invalid_argument(format!(
            "Got {} sample values for {} samples",
            sample_values.len(),
            n_samples
        )));
    }
    let sample_values = Array1::from_vec(sample_values.to_complex());
    let dispatcher = Dispatcher::new(parallelism)?;

    let grid_values = adjoint_with_order(
        &grid,
        tables,
        params.order(),
        sample_values.view(),
        &coords,
        &dispatcher,
        &Verbosity::Quiet,
    )?;
    Ok(SplitPlanes::from_complex(&grid_values))
}

#[cfg(test)]
mod tests {

    use super::*;

    fn params(order: InterpOrder) -> Interp2Params {
        Interp2Params::new(In2D::same(8), In2D::same(4), In2D::same(100), order).unwrap()
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert!(matches!(
            Interp2Params::new(
                In2D::new(8, 0),
                In2D::same(4),
                In2D::same(100),
                InterpOrder::Linear
            ),
            Err(InterpError::InvalidArgument(_))
        ));
        assert!(Interp2Params::new(
            In2D::same(8),
            In2D::same(4),
            In2D::new(100, 0),
            InterpOrder::Nearest
        )
        .is_err());
    }

    #[test]
    fn tables_must_match_declared_sizes() {
        let table = KernelTable::<f64>::triangular(4, 100).unwrap();
        let other = KernelTable::<f64>::triangular(4, 50).unwrap();
        assert!(TableInterp2::new(
            &params(InterpOrder::Linear),
            In2D::new(table.clone(), table.clone())
        )
        .is_ok());
        assert!(matches!(
            TableInterp2::new(&params(InterpOrder::Linear), In2D::new(table, other)),
            Err(InterpError::InvalidArgument(_))
        ));
    }

    #[test]
    fn impulse_at_sample_gives_product_of_peaks() {
        let table = KernelTable::<f64>::triangular(4, 100).unwrap();
        let mut real = vec![0.0; 64];
        real[4 * 8 + 4] = 1.0;
        let grid_values = SplitPlanes::from_real(real);

        for order in [InterpOrder::Nearest, InterpOrder::Linear] {
            let samples = interp2_forward(
                &grid_values,
                In2D::new(&table, &table),
                &params(order),
                &[4.0, 4.0],
                1,
                &Parallelism::sequential(),
            )
            .unwrap();
            assert_eq!(samples.real(), &[table.peak() * table.peak()]);
            assert_eq!(samples.imag(), &[0.0]);
        }
    }

    #[test]
    fn mismatched_boundary_lengths_are_rejected() {
        let table = KernelTable::<f64>::triangular(4, 100).unwrap();
        let tables = In2D::new(&table, &table);
        let params = params(InterpOrder::Linear);
        let parallelism = Parallelism::sequential();

        let short_grid = SplitPlanes::from_real(vec![0.0; 63]);
        assert!(matches!(
            interp2_forward(&short_grid, tables.clone(), &params, &[1.0, 1.0], 1, &parallelism),
            Err(InterpError::InvalidArgument(_))
        ));

        let grid = SplitPlanes::from_real(vec![0.0; 64]);
        assert!(matches!(
            interp2_forward(&grid, tables.clone(), &params, &[1.0, 1.0, 1.0], 1, &parallelism),
            Err(InterpError::InvalidArgument(_))
        ));

        let samples = SplitPlanes::from_real(vec![1.0; 2]);
        assert!(matches!(
            interp2_adjoint(&samples, tables, &params, &[1.0, 1.0], 1, &parallelism),
            Err(InterpError::InvalidArgument(_))
        ));
    }

    #[test]
    fn operator_rejects_wrong_grid_shape() {
        let table = KernelTable::<f64>::triangular(4, 100).unwrap();
        let interp = TableInterp2::new(
            &params(InterpOrder::Nearest),
            In2D::new(table.clone(), table.clone()),
        )
        .unwrap();
        let dispatcher = Dispatcher::new(&Parallelism::sequential()).unwrap();
        let coords = SampleCoords2::from_pairs(&[(1.0, 2.0)]);
        let wrong = GridValues2::zeros(In2D::new(8, 4));
        assert!(matches!(
            interp.forward(&wrong, &coords, &dispatcher, &Verbosity::Quiet),
            Err(InterpError::InvalidArgument(_))
        ));
        let right = GridValues2::zeros(In2D::same(8));
        assert_eq!(
            interp
                .forward(&right, &coords, &dispatcher, &Verbosity::Quiet)
                .unwrap()
                .len(),
            1
        );
    }
}
