//! Grid values, sample values and sample coordinates.
//!
//! Grid values are stored with the first axis varying fastest, so the flat index of
//! grid cell `(k1, k2)` is `k2*K1 + k1`. Sample coordinates are stored as two
//! contiguous blocks: all first-axis coordinates followed by all second-axis
//! coordinates. At the boundary to other code, complex arrays are exchanged as
//! separate real and imaginary planes.

use crate::{
    error::{InterpError, InterpResult},
    geometry::{Dim2, In2D},
    num::BFloat,
};
use ndarray::prelude::*;
use num::{Complex, Zero};

/// Complex values stored as separate real and imaginary planes.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitPlanes<F> {
    real: Vec<F>,
    imag: Vec<F>,
}

impl<F: BFloat> SplitPlanes<F> {
    /// Creates new split planes from real and imaginary parts of equal length.
    pub fn new(real: Vec<F>, imag: Vec<F>) -> InterpResult<Self> {
        if real.len() != imag.len() {
            return Err(InterpError::invalid_argument(format!(
                "Real ({}) and imaginary ({}) planes differ in length",
                real.len(),
                imag.len()
            )));
        }
        Ok(Self { real, imag })
    }

    /// Creates split planes for purely real values.
    pub fn from_real(real: Vec<F>) -> Self {
        let imag = vec![F::zero(); real.len()];
        Self { real, imag }
    }

    /// Creates split planes from complex values.
    pub fn from_complex<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a Complex<F>>,
        F: 'a,
    {
        let (real, imag) = values.into_iter().map(|value| (value.re, value.im)).unzip();
        Self { real, imag }
    }

    /// Returns the number of complex values.
    pub fn len(&self) -> usize {
        self.real.len()
    }

    /// Whether there are no values.
    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    /// Returns the real plane.
    pub fn real(&self) -> &[F] {
        &self.real
    }

    /// Returns the imaginary plane.
    pub fn imag(&self) -> &[F] {
        &self.imag
    }

    /// Combines the planes into complex values.
    pub fn to_complex(&self) -> Vec<Complex<F>> {
        self.real
            .iter()
            .zip(self.imag.iter())
            .map(|(&re, &im)| Complex::new(re, im))
            .collect()
    }

    /// Consumes the planes and returns the real and imaginary parts.
    pub fn into_parts(self) -> (Vec<F>, Vec<F>) {
        (self.real, self.imag)
    }
}

/// Complex values on a periodic `K1 x K2` grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridValues2<F: BFloat> {
    values: Array2<Complex<F>>,
}

impl<F: BFloat> GridValues2<F> {
    /// Creates a grid of the given shape filled with zeros.
    pub fn zeros(shape: In2D<usize>) -> Self {
        Self {
            values: Array2::zeros(shape.to_tuple().f()),
        }
    }

    /// Creates grid values from a flat vector with the first axis varying fastest.
    pub fn from_vec(shape: In2D<usize>, values: Vec<Complex<F>>) -> InterpResult<Self> {
        let n_cells = shape.product();
        if values.len() != n_cells {
            return Err(InterpError::invalid_argument(format!(
                "Grid of shape {} must have {} values, got {}",
                shape,
                n_cells,
                values.len()
            )));
        }
        Array2::from_shape_vec(shape.to_tuple().f(), values)
            .map(|values| Self { values })
            .map_err(|err| InterpError::invalid_argument(err.to_string()))
    }

    /// Creates grid values from separate real and imaginary planes.
    pub fn from_planes(shape: In2D<usize>, planes: &SplitPlanes<F>) -> InterpResult<Self> {
        Self::from_vec(shape, planes.to_complex())
    }

    /// Creates grid values from an array indexed as `[[k1, k2]]`, whatever its memory layout.
    pub fn from_array(values: ArrayView2<'_, Complex<F>>) -> Self {
        let mut grid = Self::zeros(In2D::new(values.nrows(), values.ncols()));
        grid.values.assign(&values);
        grid
    }

    /// Returns the shape `(K1, K2)` of the grid.
    pub fn shape(&self) -> In2D<usize> {
        In2D::new(self.values.nrows(), self.values.ncols())
    }

    /// Returns a view of the values indexed as `[[k1, k2]]`.
    pub fn values(&self) -> ArrayView2<'_, Complex<F>> {
        self.values.view()
    }

    /// Returns a mutable view of the values indexed as `[[k1, k2]]`.
    pub fn values_mut(&mut self) -> ArrayViewMut2<'_, Complex<F>> {
        self.values.view_mut()
    }

    /// Returns the values as a flat slice with the first axis varying fastest.
    pub fn as_slice(&self) -> &[Complex<F>] {
        self.values
            .as_slice_memory_order()
            .expect("Grid values are always stored contiguously")
    }

    /// Splits the values into real and imaginary planes with the first axis varying fastest.
    pub fn to_planes(&self) -> SplitPlanes<F> {
        SplitPlanes::from_complex(self.as_slice())
    }

    /// Computes the inner product `sum(conj(self)*other)` with another grid.
    pub fn inner_product(&self, other: &Self) -> Complex<F> {
        self.as_slice()
            .iter()
            .zip(other.as_slice())
            .fold(Complex::zero(), |sum, (a, b)| sum + a.conj() * b)
    }
}

/// Continuous coordinates of samples, in grid units.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleCoords2<F: BFloat> {
    coords: Array2<F>,
}

impl<F: BFloat> SampleCoords2<F> {
    /// Creates sample coordinates from a flat vector holding all first-axis
    /// coordinates followed by all second-axis coordinates.
    pub fn from_blocks(coords: Vec<F>, n_samples: usize) -> InterpResult<Self> {
        if coords.len() != 2 * n_samples {
            return Err(InterpError::invalid_argument(format!(
                "Coordinates for {} samples must have {} values, got {}",
                n_samples,
                2 * n_samples,
                coords.len()
            )));
        }
        Array2::from_shape_vec((n_samples, 2).f(), coords)
            .map(|coords| Self { coords })
            .map_err(|err| InterpError::invalid_argument(err.to_string()))
    }

    /// Creates sample coordinates from `(t1, t2)` pairs.
    pub fn from_pairs(pairs: &[(F, F)]) -> Self {
        let mut coords = Array2::zeros((pairs.len(), 2).f());
        for (mut row, &(coord_x, coord_y)) in coords.outer_iter_mut().zip(pairs) {
            row[0] = coord_x;
            row[1] = coord_y;
        }
        Self { coords }
    }

    /// Returns the number of samples.
    pub fn n_samples(&self) -> usize {
        self.coords.nrows()
    }

    /// Returns the coordinates of the sample with the given index.
    #[inline]
    pub fn coord(&self, sample: usize) -> In2D<F> {
        In2D::new(self.coords[[sample, 0]], self.coords[[sample, 1]])
    }

    /// Returns a view of the coordinates along the given axis for all samples.
    pub fn along(&self, dim: Dim2) -> ArrayView1<'_, F> {
        self.coords.column(dim.num())
    }

    /// Returns a copy of the coordinates shifted by the given amount along one axis.
    pub fn shifted(&self, dim: Dim2, shift: F) -> Self {
        let mut coords = self.coords.clone();
        coords.column_mut(dim.num()).mapv_inplace(|coord| coord + shift);
        Self { coords }
    }

    /// Returns the coordinates as a flat slice in block layout.
    pub fn as_slice(&self) -> &[F] {
        self.coords
            .as_slice_memory_order()
            .expect("Sample coordinates are always stored contiguously")
    }
}

/// Computes the inner product `sum(conj(a)*b)` of two sets of sample values.
pub fn sample_inner_product<F: BFloat>(a: &Array1<Complex<F>>, b: &Array1<Complex<F>>) -> Complex<F> {
    a.iter()
        .zip(b.iter())
        .fold(Complex::zero(), |sum, (a, b)| sum + a.conj() * b)
}
