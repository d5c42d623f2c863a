//! The `tabnufft` crate provides the table-based interpolation kernels at the heart
//! of gridding non-uniform FFTs in two dimensions.
//!
//! Given a complex grid on a `K1 x K2` periodic lattice and a set of sample
//! coordinates, the forward operation evaluates the grid convolved with a tabulated
//! separable kernel at every sample, and the adjoint operation scatters sample values
//! back onto the grid with the conjugated kernel.

pub mod error;
pub mod num;
pub mod geometry;
pub mod io;
pub mod table;
pub mod grid;
pub mod interpolation;
pub mod field;
pub mod kernel;
pub mod dispatch;
pub mod interp2;

#[cfg(feature = "cli")]
pub mod random;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{InterpError, InterpResult};
pub use interp2::{interp2_adjoint, interp2_forward, Interp2Params, TableInterp2};
