//! Utilities related to numbers.

use ::num::{self as num_crate, Complex, Zero};
use std::{
    fmt,
    ops::{Add, Mul, Neg},
};

/// Floating point marker trait for easier control over trait bounds.
pub trait BFloat:
    Sync + Send + num_crate::Float + num_crate::cast::FromPrimitive + fmt::Debug + fmt::Display
{
    /// Converts a (small) signed grid or table index to a float.
    fn from_index(index: i64) -> Self;
}

impl BFloat for f32 {
    fn from_index(index: i64) -> Self {
        index as f32
    }
}

impl BFloat for f64 {
    fn from_index(index: i64) -> Self {
        index as f64
    }
}

/// A value stored in a kernel table: either a real or a complex kernel sample.
///
/// Tabulated values are only ever combined with complex grid and sample values,
/// so the trait exposes how a coefficient scales a complex number rather than
/// general arithmetic with it.
pub trait TableValue:
    Copy + Sync + Send + fmt::Debug + Zero + Add<Output = Self> + Mul<Output = Self> + Neg<Output = Self>
{
    /// Floating point type of the underlying components.
    type Real: BFloat;

    /// Whether the value carries an imaginary component.
    const IS_COMPLEX: bool;

    /// Multiplies the value by a real scalar.
    fn scaled(self, factor: Self::Real) -> Self;

    /// Returns the complex conjugate of the value.
    fn conj(self) -> Self;

    /// Multiplies the given complex number by the value.
    fn apply(self, value: Complex<Self::Real>) -> Complex<Self::Real>;
}

macro_rules! impl_real_table_value {
    ($float:ty) => {
        impl TableValue for $float {
            type Real = $float;
            const IS_COMPLEX: bool = false;

            fn scaled(self, factor: Self::Real) -> Self {
                self * factor
            }

            fn conj(self) -> Self {
                self
            }

            fn apply(self, value: Complex<Self::Real>) -> Complex<Self::Real> {
                value * self
            }
        }
    };
}

macro_rules! impl_complex_table_value {
    ($float:ty) => {
        impl TableValue for Complex<$float> {
            type Real = $float;
            const IS_COMPLEX: bool = true;

            fn scaled(self, factor: Self::Real) -> Self {
                self * factor
            }

            fn conj(self) -> Self {
                Complex::conj(&self)
            }

            fn apply(self, value: Complex<Self::Real>) -> Complex<Self::Real> {
                self * value
            }
        }
    };
}

impl_real_table_value!(f32);
impl_real_table_value!(f64);
impl_complex_table_value!(f32);
impl_complex_table_value!(f64);
