//! First-order (linear) interpolation in tabulated kernels.

use super::{InterpOrder, TableInterpolator};
use crate::{num::TableValue, table::CenteredTable};
use num::{Float, One, ToPrimitive, Zero};

/// Interpolates linearly between the two table entries surrounding the
/// requested offset.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearTableInterpolator;

impl TableInterpolator for LinearTableInterpolator {
    const ORDER: InterpOrder = InterpOrder::Linear;

    #[inline]
    fn lookup<V: TableValue>(&self, table: &CenteredTable<'_, V>, offset: V::Real) -> Option<V> {
        let lower_offset = offset.floor();
        let idx = lower_offset.to_i64()?;
        let alpha = offset - lower_offset;
        let lower_value = table.value_at(idx);

        // Offsets landing exactly on an entry never touch the next one
        if alpha == V::Real::zero() {
            Some(lower_value)
        } else {
            let upper_value = table.value_at(idx + 1);
            Some(lower_value.scaled(V::Real::one() - alpha) + upper_value.scaled(alpha))
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::table::KernelTable;
    use num::Complex;

    #[test]
    fn values_between_entries_are_interpolated() {
        let values: Vec<f64> = (0..9).map(|n| (n * n) as f64).collect();
        let table = KernelTable::new(values, 4, 2).unwrap();
        let view = table.centered();
        let interpolator = LinearTableInterpolator;
        assert_eq!(interpolator.lookup(&view, 0.0), Some(16.0));
        assert_eq!(interpolator.lookup(&view, 0.5), Some(20.5));
        assert_eq!(interpolator.lookup(&view, -0.25), Some(0.25 * 9.0 + 0.75 * 16.0));
        assert_eq!(interpolator.lookup(&view, 4.0), Some(64.0));
        assert_eq!(interpolator.lookup(&view, 4.5), Some(32.0));
    }

    #[test]
    fn complex_entries_are_interpolated_componentwise() {
        let table = KernelTable::from_planes(&[0.0, 1.0, 2.0], &[2.0, 0.0, -2.0], 2, 1).unwrap();
        let value = LinearTableInterpolator
            .lookup(&table.centered(), 0.25)
            .unwrap();
        assert_eq!(value, Complex::new(1.25, -0.5));
    }
}
