//! Zeroth-order (nearest entry) lookup in tabulated kernels.

use super::{InterpOrder, TableInterpolator};
use crate::{num::TableValue, table::CenteredTable};
use num::{Float, ToPrimitive};

/// Looks up the table entry closest to the requested offset.
///
/// Ties are broken by rounding half-way offsets away from zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestTableInterpolator;

impl TableInterpolator for NearestTableInterpolator {
    const ORDER: InterpOrder = InterpOrder::Nearest;

    #[inline]
    fn lookup<V: TableValue>(&self, table: &CenteredTable<'_, V>, offset: V::Real) -> Option<V> {
        let idx = offset.round().to_i64()?;
        Some(table.value_at(idx))
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::table::KernelTable;

    #[test]
    fn nearest_entry_is_selected_with_ties_away_from_zero() {
        let values: Vec<f64> = (0..9).map(|n| n as f64).collect();
        let table = KernelTable::new(values, 4, 2).unwrap();
        let view = table.centered();
        let interpolator = NearestTableInterpolator;
        assert_eq!(interpolator.lookup(&view, 0.0), Some(4.0));
        assert_eq!(interpolator.lookup(&view, 1.49), Some(5.0));
        assert_eq!(interpolator.lookup(&view, 1.5), Some(6.0));
        assert_eq!(interpolator.lookup(&view, -1.5), Some(2.0));
        assert_eq!(interpolator.lookup(&view, -4.6), Some(0.0));
        assert_eq!(interpolator.lookup(&view, f64::NAN), None);
    }
}
