//! Per-sample accumulation of grid values (forward) and scattering of sample
//! values onto the grid (adjoint).
//!
//! The forward direction evaluates, for a sample at `(t1, t2)`,
//!
//! `f = sum_{k1,k2} c[k1 mod K1, k2 mod K2] * h1(t1 - k1) * h2(t2 - k2)`
//!
//! over the `J1 x J2` grid cells surrounding the sample. The adjoint direction adds
//! `conj(h1(t1 - k1)) * conj(h2(t2 - k2)) * f` to each of those cells.

use crate::{
    error::{InterpError, InterpResult},
    geometry::{
        Dim2::{self, X, Y},
        In2D,
    },
    grid::PeriodicGrid2,
    interpolation::{resolve_axis_coefs, AxisCoef, TableInterpolator},
    num::TableValue,
    table::{CenteredTable, KernelTable},
};
use num::{Complex, ToPrimitive, Zero};

/// Scratch space for the coefficients of a single sample.
///
/// Each worker owns one workspace and reuses it for all its samples.
#[derive(Clone, Debug)]
pub struct SampleWorkspace<V> {
    coefs: In2D<Vec<AxisCoef<V>>>,
}

impl<V: TableValue> SampleWorkspace<V> {
    fn with_supports(supports: &In2D<usize>) -> Self {
        Self {
            coefs: In2D::new(
                Vec::with_capacity(supports[X]),
                Vec::with_capacity(supports[Y]),
            ),
        }
    }
}

/// The table-based interpolation kernel for a periodic 2D grid.
#[derive(Clone, Debug)]
pub struct Interp2Kernel<'a, V: TableValue, I: TableInterpolator> {
    grid: &'a PeriodicGrid2,
    tables: In2D<CenteredTable<'a, V>>,
    supports: In2D<usize>,
    interpolator: I,
}

impl<'a, V, I> Interp2Kernel<'a, V, I>
where
    V: TableValue,
    I: TableInterpolator,
{
    /// Creates a new kernel for the given grid, using the given kernel table for each axis.
    pub fn new(grid: &'a PeriodicGrid2, tables: In2D<&'a KernelTable<V>>, interpolator: I) -> Self {
        Self {
            grid,
            tables: In2D::new(tables[X].centered(), tables[Y].centered()),
            supports: In2D::new(tables[X].support(), tables[Y].support()),
            interpolator,
        }
    }

    /// Returns the grid the kernel operates on.
    pub fn grid(&self) -> &PeriodicGrid2 {
        self.grid
    }

    /// Creates scratch space sized for this kernel.
    pub fn workspace(&self) -> SampleWorkspace<V> {
        SampleWorkspace::with_supports(&self.supports)
    }

    fn resolve_coefs(
        &self,
        sample: usize,
        coord: &In2D<V::Real>,
        workspace: &mut SampleWorkspace<V>,
    ) -> InterpResult<()> {
        for dim in Dim2::slice() {
            resolve_axis_coefs(
                &self.interpolator,
                self.grid.axis(dim),
                &self.tables[dim],
                self.supports[dim],
                coord[dim],
                &mut workspace.coefs[dim],
            )
            .ok_or_else(|| InterpError::CoordinateOutOfRange {
                sample,
                axis: dim,
                coord: coord[dim].to_f64().unwrap_or(f64::NAN),
            })?;
        }
        Ok(())
    }

    /// Computes the interpolated value of the grid at the given sample coordinate.
    ///
    /// # Parameters
    ///
    /// - `grid_values`: Grid values with the first axis varying fastest.
    /// - `sample`: Index of the sample, used for error reporting.
    /// - `coord`: Coordinate of the sample in grid units.
    /// - `workspace`: Scratch space created by `workspace`.
    ///
    /// # Returns
    ///
    /// A `InterpResult` which is either:
    ///
    /// - `Ok`: Contains the interpolated value.
    /// - `Err`: `CoordinateOutOfRange` if the coordinate could not be mapped to the grid.
    ///
    /// # Panics
    ///
    /// If `grid_values` holds fewer values than the grid has cells.
    #[inline]
    pub fn forward_sample(
        &self,
        grid_values: &[Complex<V::Real>],
        sample: usize,
        coord: &In2D<V::Real>,
        workspace: &mut SampleWorkspace<V>,
    ) -> InterpResult<Complex<V::Real>> {
        self.resolve_coefs(sample, coord, workspace)?;

        let mut sum = Complex::zero();
        for coef_y in &workspace.coefs[Y] {
            let row = &grid_values[self.grid.linear_idx(0, coef_y.idx)..];

            let mut row_sum = Complex::zero();
            for coef_x in &workspace.coefs[X] {
                row_sum = row_sum + coef_x.coef.apply(row[coef_x.idx]);
            }
            sum = sum + coef_y.coef.apply(row_sum);
        }
        Ok(sum)
    }

    /// Adds the value of the sample at the given coordinate to the surrounding grid
    /// cells, weighted with the conjugated kernel.
    ///
    /// # Parameters
    ///
    /// - `value`: Value of the sample.
    /// - `sample`: Index of the sample, used for error reporting.
    /// - `coord`: Coordinate of the sample in grid units.
    /// - `workspace`: Scratch space created by `workspace`.
    /// - `grid_values`: Grid values to accumulate into, with the first axis varying fastest.
    ///
    /// # Panics
    ///
    /// If `grid_values` holds fewer values than the grid has cells.
    #[inline]
    pub fn adjoint_sample(
        &self,
        value: Complex<V::Real>,
        sample: usize,
        coord: &In2D<V::Real>,
        workspace: &mut SampleWorkspace<V>,
        grid_values: &mut [Complex<V::Real>],
    ) -> InterpResult<()> {
        self.resolve_coefs(sample, coord, workspace)?;

        for coef_y in &workspace.coefs[Y] {
            let row_value = coef_y.coef.conj().apply(value);
            let row_start = self.grid.linear_idx(0, coef_y.idx);
            let row = &mut grid_values[row_start..];

            for coef_x in &workspace.coefs[X] {
                let cell = &mut row[coef_x.idx];
                *cell = *cell + coef_x.coef.conj().apply(row_value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::interpolation::{LinearTableInterpolator, NearestTableInterpolator};

    fn impulse_grid(shape: (usize, usize), at: (usize, usize)) -> Vec<Complex<f64>> {
        let mut values = vec![Complex::zero(); shape.0 * shape.1];
        values[at.1 * shape.0 + at.0] = Complex::new(1.0, 0.0);
        values
    }

    #[test]
    fn impulse_at_sample_center_gives_peak_coefficient() {
        let grid = PeriodicGrid2::new(In2D::new(8, 8), In2D::same(false)).unwrap();
        let table = KernelTable::<f64>::triangular(4, 100).unwrap();
        let values = impulse_grid((8, 8), (4, 4));
        let coord = In2D::new(4.0, 4.0);

        let kernel = Interp2Kernel::new(&grid, In2D::new(&table, &table), NearestTableInterpolator);
        let mut workspace = kernel.workspace();
        let result = kernel
            .forward_sample(&values, 0, &coord, &mut workspace)
            .unwrap();
        assert_eq!(result, Complex::new(table.peak() * table.peak(), 0.0));

        let kernel = Interp2Kernel::new(&grid, In2D::new(&table, &table), LinearTableInterpolator);
        let result = kernel
            .forward_sample(&values, 0, &coord, &mut workspace)
            .unwrap();
        assert_eq!(result, Complex::new(1.0, 0.0));
    }

    #[test]
    fn forward_uses_unconjugated_complex_coefficients() {
        let grid = PeriodicGrid2::new(In2D::new(4, 4), In2D::same(false)).unwrap();
        let table_x = KernelTable::tabulate(1, 2, |_x: f64| Complex::new(0.0, 1.0)).unwrap();
        let table_y = KernelTable::tabulate(1, 2, |_x: f64| Complex::new(2.0, 0.0)).unwrap();
        let values = vec![Complex::new(1.0, 1.0); 16];

        let kernel = Interp2Kernel::new(&grid, In2D::new(&table_x, &table_y), NearestTableInterpolator);
        let mut workspace = kernel.workspace();
        let result = kernel
            .forward_sample(&values, 0, &In2D::new(1.2, 2.7), &mut workspace)
            .unwrap();
        // (0 + i)*2*(1 + i) = -2 + 2i
        assert_eq!(result, Complex::new(-2.0, 2.0));
    }

    #[test]
    fn adjoint_scatters_conjugated_weights() {
        let grid = PeriodicGrid2::new(In2D::new(4, 4), In2D::same(false)).unwrap();
        let table_x = KernelTable::tabulate(1, 2, |_x: f64| Complex::new(0.0, 1.0)).unwrap();
        let table_y = KernelTable::tabulate(1, 2, |_x: f64| Complex::new(2.0, 0.0)).unwrap();
        let mut values = vec![Complex::zero(); 16];

        let kernel = Interp2Kernel::new(&grid, In2D::new(&table_x, &table_y), NearestTableInterpolator);
        let mut workspace = kernel.workspace();
        kernel
            .adjoint_sample(
                Complex::new(1.0, 0.0),
                0,
                &In2D::new(5.2, -1.3),
                &mut workspace,
                &mut values,
            )
            .unwrap();
        // Window of width one: k1 = 1 + floor(4.7) = 5 -> 1, k2 = 1 + floor(-1.8) = -1 -> 3
        let touched: Vec<_> = values
            .iter()
            .enumerate()
            .filter(|(_, value)| !value.is_zero())
            .collect();
        assert_eq!(touched.len(), 1);
        assert_eq!(touched[0].0, 3 * 4 + 1);
        assert_eq!(*touched[0].1, Complex::new(0.0, -2.0));
    }

    #[test]
    fn non_finite_coordinate_is_reported_with_axis_and_sample() {
        let grid = PeriodicGrid2::new(In2D::new(8, 8), In2D::same(false)).unwrap();
        let table = KernelTable::<f64>::triangular(2, 10).unwrap();
        let values = vec![Complex::zero(); 64];
        let kernel = Interp2Kernel::new(&grid, In2D::new(&table, &table), LinearTableInterpolator);
        let mut workspace = kernel.workspace();
        let err = kernel
            .forward_sample(&values, 7, &In2D::new(1.0, f64::INFINITY), &mut workspace)
            .unwrap_err();
        assert!(matches!(
            err,
            InterpError::CoordinateOutOfRange {
                sample: 7,
                axis: Dim2::Y,
                ..
            }
        ));
    }
}
