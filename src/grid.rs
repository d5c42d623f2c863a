//! Periodic grids and the mapping from continuous coordinates to grid indices.

use crate::{
    error::{InterpError, InterpResult},
    geometry::{Dim2, In2D},
    num::BFloat,
};

/// A grid index reduced into the fundamental period of an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WrappedIdx {
    /// Index in `[0, K)`.
    pub idx: usize,
    /// Number of whole periods that were crossed to get there (may be negative).
    pub n_wraps: i64,
}

/// One periodic axis of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodicAxis {
    size: usize,
    flips_sign: bool,
}

impl PeriodicAxis {
    /// Creates a new periodic axis with the given number of grid cells.
    ///
    /// If `flips_sign` is set, the kernel changes sign for every period crossed.
    pub fn new(size: usize, flips_sign: bool) -> InterpResult<Self> {
        if size == 0 {
            return Err(InterpError::invalid_argument(
                "Cannot create grid with size zero along any dimension",
            ));
        }
        Ok(Self { size, flips_sign })
    }

    /// Returns the number of grid cells along the axis.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the kernel sign alternates between periodic copies.
    pub fn flips_sign(&self) -> bool {
        self.flips_sign
    }

    /// Reduces the given raw grid index into `[0, K)`.
    #[inline]
    pub fn wrap(&self, k: i64) -> WrappedIdx {
        let size = self.size as i64;
        let n_wraps = k.div_euclid(size);
        WrappedIdx {
            idx: (k - size * n_wraps) as usize,
            n_wraps,
        }
    }

    /// Whether a coefficient for a grid index wrapped the given number of times
    /// must be negated.
    #[inline]
    pub fn negates(&self, n_wraps: i64) -> bool {
        self.flips_sign && n_wraps % 2 != 0
    }
}

/// The `J` consecutive grid indices influencing a sample along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexWindow {
    start: i64,
    width: usize,
}

impl IndexWindow {
    /// Computes the window of the given width covering the given coordinate,
    /// starting at `1 + floor(t - J/2)`.
    ///
    /// Returns `None` if the coordinate is not finite or the window indices
    /// are not representable.
    #[inline]
    pub fn covering<F: BFloat>(coord: F, width: usize) -> Option<Self> {
        if !coord.is_finite() {
            return None;
        }
        let half_width = F::from_index(width as i64) / F::from_index(2);
        let start = (coord - half_width).floor().to_i64()?.checked_add(1)?;
        start.checked_add(width as i64)?;
        Some(Self { start, width })
    }

    /// Returns the first raw grid index of the window.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Returns the number of grid indices in the window.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Iterates over the raw (unwrapped) grid indices of the window.
    #[inline]
    pub fn indices(&self) -> impl Iterator<Item = i64> {
        self.start..self.start + self.width as i64
    }

    /// Computes the fractional table offset `(t - k)*L` of grid index `k`.
    #[inline]
    pub fn table_offset<F: BFloat>(coord: F, k: i64, oversampling: F) -> F {
        (coord - F::from_index(k)) * oversampling
    }
}

/// A two-dimensional periodic grid whose first axis varies fastest in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeriodicGrid2 {
    axes: In2D<PeriodicAxis>,
}

impl PeriodicGrid2 {
    /// Creates a new periodic grid with the given shape and sign flip flags.
    pub fn new(shape: In2D<usize>, sign_flips: In2D<bool>) -> InterpResult<Self> {
        Ok(Self {
            axes: In2D::new(
                PeriodicAxis::new(shape[Dim2::X], sign_flips[Dim2::X])?,
                PeriodicAxis::new(shape[Dim2::Y], sign_flips[Dim2::Y])?,
            ),
        })
    }

    /// Returns the periodic axis along the given dimension.
    pub fn axis(&self, dim: Dim2) -> &PeriodicAxis {
        &self.axes[dim]
    }

    /// Returns the shape `(K1, K2)` of the grid.
    pub fn shape(&self) -> In2D<usize> {
        self.axes.map(PeriodicAxis::size)
    }

    /// Returns the total number of grid cells.
    pub fn n_cells(&self) -> usize {
        self.shape().product()
    }

    /// Computes the linear memory index `k2*K1 + k1` of wrapped indices.
    #[inline]
    pub fn linear_idx(&self, idx_x: usize, idx_y: usize) -> usize {
        idx_y * self.axes[Dim2::X].size + idx_x
    }
}
