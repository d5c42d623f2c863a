//! Resolution of per-axis kernel coefficients from tabulated kernels.

pub mod linear;
pub mod nearest;

use crate::{
    grid::{IndexWindow, PeriodicAxis},
    num::TableValue,
    table::CenteredTable,
};
use std::{fmt, str::FromStr};

pub use linear::LinearTableInterpolator;
pub use nearest::NearestTableInterpolator;

/// Order of the interpolation between tabulated kernel values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpOrder {
    /// Use the nearest tabulated value.
    Nearest,
    /// Interpolate linearly between the two adjacent tabulated values.
    Linear,
}

impl fmt::Display for InterpOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Nearest => "nearest",
                Self::Linear => "linear",
            }
        )
    }
}

impl FromStr for InterpOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" | "nearest" => Ok(Self::Nearest),
            "1" | "linear" => Ok(Self::Linear),
            _ => Err(format!("Invalid interpolation order: {}", s)),
        }
    }
}

/// Defines the properties of an interpolator for tabulated kernels.
pub trait TableInterpolator: Clone + Copy + Sync + Send {
    /// The order of the interpolation.
    const ORDER: InterpOrder;

    /// Computes the kernel value at the given fractional table offset.
    ///
    /// # Parameters
    ///
    /// - `table`: Centered kernel table to look up values in.
    /// - `offset`: Table offset `(t - k)*L` in units of table entries.
    ///
    /// # Returns
    ///
    /// The interpolated kernel value, or `None` if the offset is not representable
    /// as a table index.
    fn lookup<V: TableValue>(&self, table: &CenteredTable<'_, V>, offset: V::Real) -> Option<V>;
}

/// A kernel coefficient for one grid index along one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisCoef<V> {
    /// Grid index reduced into the fundamental period.
    pub idx: usize,
    /// Kernel coefficient, including any sign flip from wrapping.
    pub coef: V,
}

/// Computes the coefficients for all grid indices in the window covering the given
/// coordinate along one axis.
///
/// The coefficients are written to `coefs`, which is cleared first. Coefficients of
/// indices that wrapped an odd number of times around an axis with sign flipping
/// are negated.
///
/// Returns `None` if the coordinate is not finite or maps outside the representable
/// index range.
pub fn resolve_axis_coefs<I, V>(
    interpolator: &I,
    axis: &PeriodicAxis,
    table: &CenteredTable<'_, V>,
    support: usize,
    coord: V::Real,
    coefs: &mut Vec<AxisCoef<V>>,
) -> Option<()>
where
    I: TableInterpolator,
    V: TableValue,
{
    coefs.clear();
    let window = IndexWindow::covering(coord, support)?;
    let oversampling = table.oversampling();
    for k in window.indices() {
        let offset = IndexWindow::table_offset(coord, k, oversampling);
        let mut coef = interpolator.lookup(table, offset)?;
        let wrapped = axis.wrap(k);
        if axis.negates(wrapped.n_wraps) {
            coef = -coef;
        }
        coefs.push(AxisCoef {
            idx: wrapped.idx,
            coef,
        });
    }
    Some(())
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::table::KernelTable;
    use num::Complex;

    #[test]
    fn order_is_parsed_from_names_and_numbers() {
        assert_eq!("0".parse::<InterpOrder>(), Ok(InterpOrder::Nearest));
        assert_eq!("linear".parse::<InterpOrder>(), Ok(InterpOrder::Linear));
        assert!("cubic".parse::<InterpOrder>().is_err());
        assert_eq!(InterpOrder::Nearest.to_string(), "nearest");
    }

    #[test]
    fn axis_coefs_cover_window_and_wrap() {
        let table = KernelTable::<f64>::triangular(4, 100).unwrap();
        let axis = PeriodicAxis::new(8, false).unwrap();
        let mut coefs = Vec::new();
        resolve_axis_coefs(
            &NearestTableInterpolator,
            &axis,
            &table.centered(),
            4,
            0.5,
            &mut coefs,
        )
        .unwrap();
        let indices: Vec<_> = coefs.iter().map(|c| c.idx).collect();
        assert_eq!(indices, vec![7, 0, 1, 2]);
        assert!((coefs[1].coef - 0.75).abs() < 1e-12);
        assert!((coefs[2].coef - 0.75).abs() < 1e-12);
    }

    #[test]
    fn wrapped_coefs_flip_sign_when_requested() {
        let table = KernelTable::<f64>::triangular(4, 100).unwrap();
        let mut plain = Vec::new();
        let mut flipped = Vec::new();
        for (flips, coefs) in [(false, &mut plain), (true, &mut flipped)] {
            let axis = PeriodicAxis::new(8, flips).unwrap();
            resolve_axis_coefs(
                &LinearTableInterpolator,
                &axis,
                &table.centered(),
                4,
                0.3,
                coefs,
            )
            .unwrap();
        }
        // Index -1 wraps once, the rest stay in the fundamental period
        assert_eq!(flipped[0].coef, -plain[0].coef);
        for (p, f) in plain.iter().zip(flipped.iter()).skip(1) {
            assert_eq!(p.coef, f.coef);
        }
    }

    #[test]
    fn complex_coefs_flip_both_parts() {
        let table = KernelTable::tabulate(2, 4, |x: f64| Complex::new(1.0 - x.abs(), x)).unwrap();
        let axis = PeriodicAxis::new(4, true).unwrap();
        let mut coefs = Vec::new();
        resolve_axis_coefs(
            &NearestTableInterpolator,
            &axis,
            &table.centered(),
            2,
            4.25,
            &mut coefs,
        )
        .unwrap();
        // Window is [4, 5], both wrapped once
        assert_eq!(coefs[0].idx, 0);
        assert_eq!(coefs[0].coef, Complex::new(-0.75, -0.25));
        assert_eq!(coefs[1].coef, Complex::new(-0.25, 0.75));
    }

    #[test]
    fn window_edge_beyond_odd_table_reads_zero() {
        // J*L = 3, so the stored logical indices are -1..=2 and the window edge at
        // offset -1.5 reaches past the table
        let table = KernelTable::new(vec![1.0_f64, 2.0, 3.0, 4.0], 3, 1).unwrap();
        let axis = PeriodicAxis::new(8, false).unwrap();
        let mut coefs = Vec::new();

        resolve_axis_coefs(
            &NearestTableInterpolator,
            &axis,
            &table.centered(),
            3,
            0.5,
            &mut coefs,
        )
        .unwrap();
        let indices: Vec<_> = coefs.iter().map(|c| c.idx).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        let values: Vec<_> = coefs.iter().map(|c| c.coef).collect();
        assert_eq!(values, vec![3.0, 1.0, 0.0]);

        resolve_axis_coefs(
            &LinearTableInterpolator,
            &axis,
            &table.centered(),
            3,
            0.5,
            &mut coefs,
        )
        .unwrap();
        let values: Vec<_> = coefs.iter().map(|c| c.coef).collect();
        assert_eq!(values, vec![2.5, 1.5, 0.5]);
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let table = KernelTable::<f64>::triangular(4, 10).unwrap();
        let axis = PeriodicAxis::new(8, false).unwrap();
        let mut coefs = Vec::new();
        assert!(resolve_axis_coefs(
            &LinearTableInterpolator,
            &axis,
            &table.centered(),
            4,
            f64::NAN,
            &mut coefs
        )
        .is_none());
    }
}
