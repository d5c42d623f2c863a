//! Tabulated one-dimensional interpolation kernels.
//!
//! A kernel with support width `J` (in grid units) is sampled at `L` points per grid
//! unit, giving `J*L + 1` stored values. The stored values are centered, so that the
//! logical table index `n` corresponds to the kernel evaluated at the offset `n/L`
//! and is found at storage position `n + floor(J*L/2)`. Outside the stored range the
//! kernel is taken to be zero.

use crate::{
    error::{InterpError, InterpResult},
    num::{BFloat, TableValue},
};
use num::Complex;

/// A tabulated kernel for one grid axis.
#[derive(Clone, Debug, PartialEq)]
pub struct KernelTable<V> {
    values: Vec<V>,
    support: usize,
    oversampling: usize,
}

impl<V: TableValue> KernelTable<V> {
    /// Creates a new kernel table from the given tabulated values.
    ///
    /// # Parameters
    ///
    /// - `values`: Kernel values sampled at offsets `(n - floor(J*L/2))/L` for `n = 0..=J*L`.
    /// - `support`: Support width `J` of the kernel in grid units.
    /// - `oversampling`: Number of table entries `L` per grid unit.
    ///
    /// # Returns
    ///
    /// A `InterpResult` which is either:
    ///
    /// - `Ok`: Contains the new table.
    /// - `Err`: `InvalidArgument` if `J` or `L` is zero or the number of values is not `J*L + 1`.
    pub fn new(values: Vec<V>, support: usize, oversampling: usize) -> InterpResult<Self> {
        if support == 0 || oversampling == 0 {
            return Err(InterpError::invalid_argument(format!(
                "Kernel support ({}) and oversampling ({}) must be at least one",
                support, oversampling
            )));
        }
        let expected_len = Self::required_len(support, oversampling);
        if values.len() != expected_len {
            return Err(InterpError::invalid_argument(format!(
                "Kernel table with support {} and oversampling {} must have {} values, got {}",
                support,
                oversampling,
                expected_len,
                values.len()
            )));
        }
        Ok(Self {
            values,
            support,
            oversampling,
        })
    }

    /// Creates a new kernel table by evaluating the given kernel function at every
    /// tabulated offset (in grid units).
    pub fn tabulate<K>(support: usize, oversampling: usize, evaluate_kernel: K) -> InterpResult<Self>
    where
        K: Fn(V::Real) -> V,
    {
        if oversampling == 0 {
            return Err(InterpError::invalid_argument(
                "Kernel oversampling must be at least one",
            ));
        }
        let len = Self::required_len(support, oversampling);
        let center = Self::center_for(support, oversampling) as i64;
        let oversampling_float = V::Real::from_index(oversampling as i64);
        let values = (0..len as i64)
            .map(|idx| evaluate_kernel(V::Real::from_index(idx - center) / oversampling_float))
            .collect();
        Self::new(values, support, oversampling)
    }

    /// Number of values a table with the given support and oversampling must hold.
    pub fn required_len(support: usize, oversampling: usize) -> usize {
        support * oversampling + 1
    }

    fn center_for(support: usize, oversampling: usize) -> usize {
        (support * oversampling) / 2
    }

    /// Returns the support width `J` in grid units.
    pub fn support(&self) -> usize {
        self.support
    }

    /// Returns the number of table entries `L` per grid unit.
    pub fn oversampling(&self) -> usize {
        self.oversampling
    }

    /// Returns the stored values, in storage order.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Returns the value at logical index zero (zero offset).
    pub fn peak(&self) -> V {
        self.values[Self::center_for(self.support, self.oversampling)]
    }

    /// Returns a view of the table indexed by logical (centered) index.
    pub fn centered(&self) -> CenteredTable<'_, V> {
        CenteredTable {
            values: &self.values,
            center: Self::center_for(self.support, self.oversampling) as i64,
            oversampling: V::Real::from_index(self.oversampling as i64),
        }
    }
}

impl<F: BFloat> KernelTable<F>
where
    F: TableValue<Real = F>,
{
    /// Creates the normalized triangular kernel `max(0, 1 - |x|/(J/2))`,
    /// which has unit peak and vanishes at the edges of the support.
    pub fn triangular(support: usize, oversampling: usize) -> InterpResult<Self> {
        let half_width = F::from_index(support as i64) / F::from_index(2);
        Self::tabulate(support, oversampling, |offset| {
            (F::one() - offset.abs() / half_width).max(F::zero())
        })
    }
}

impl<F: BFloat> KernelTable<Complex<F>>
where
    Complex<F>: TableValue<Real = F>,
{
    /// Creates a complex kernel table from separate real and imaginary planes.
    pub fn from_planes(
        real: &[F],
        imag: &[F],
        support: usize,
        oversampling: usize,
    ) -> InterpResult<Self> {
        if real.len() != imag.len() {
            return Err(InterpError::invalid_argument(format!(
                "Real ({}) and imaginary ({}) kernel planes differ in length",
                real.len(),
                imag.len()
            )));
        }
        let values = real
            .iter()
            .zip(imag)
            .map(|(&re, &im)| Complex::new(re, im))
            .collect();
        Self::new(values, support, oversampling)
    }
}

/// Read-only view of a kernel table addressed by logical index.
#[derive(Clone, Copy, Debug)]
pub struct CenteredTable<'a, V: TableValue> {
    values: &'a [V],
    center: i64,
    oversampling: V::Real,
}

impl<'a, V: TableValue> CenteredTable<'a, V> {
    /// Returns the value at the given logical index, or `None` if the index
    /// falls outside the stored table.
    #[inline]
    pub fn get(&self, index: i64) -> Option<V> {
        let storage_idx = index.checked_add(self.center)?;
        if storage_idx < 0 {
            None
        } else {
            self.values.get(storage_idx as usize).copied()
        }
    }

    /// Returns the value at the given logical index, taking the kernel to vanish
    /// outside the stored table.
    #[inline]
    pub fn value_at(&self, index: i64) -> V {
        self.get(index).unwrap_or_else(V::zero)
    }

    /// Returns the number of table entries per grid unit as a float.
    #[inline]
    pub fn oversampling(&self) -> V::Real {
        self.oversampling
    }
}
