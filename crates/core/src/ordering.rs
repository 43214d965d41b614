//! `display_order` bookkeeping for admin-sorted lists.
//!
//! FAQs, help articles and hero images are shown in `display_order`. New
//! rows are appended, and moving a row renumbers the whole list `0..n` so
//! the stored order never has gaps or ties after an edit.

use serde::Deserialize;

/// Direction of a one-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Order for a row appended to a list of `count` rows.
#[must_use]
pub fn next_display_order(count: i64) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// Order for a row appended after the current maximum (`max + 1`; `1` for an
/// empty list).
#[must_use]
pub fn next_after_max(orders: impl IntoIterator<Item = i32>) -> i32 {
    orders.into_iter().max().unwrap_or(0).saturating_add(1)
}

/// Target index for a one-step move, or `None` at either end.
#[must_use]
pub fn step(index: usize, direction: MoveDirection, len: usize) -> Option<usize> {
    let target = match direction {
        MoveDirection::Up => index.checked_sub(1)?,
        MoveDirection::Down => index.checked_add(1)?,
    };
    (target < len).then_some(target)
}

/// Move the item at `from` to `to` and return every id with its new order.
///
/// `ids` must already be sorted by current display order. Returns `None`
/// if either index is out of range.
///
/// ```rust
/// # use velora_core::ordering::reorder;
/// let moved = reorder(&["a", "b", "c"], 2, 0).unwrap();
/// assert_eq!(moved, vec![("c", 0), ("a", 1), ("b", 2)]);
/// ```
#[must_use]
pub fn reorder<I: Copy>(ids: &[I], from: usize, to: usize) -> Option<Vec<(I, i32)>> {
    if from >= ids.len() || to >= ids.len() {
        return None;
    }
    let mut ordered = ids.to_vec();
    let item = ordered.remove(from);
    ordered.insert(to, item);
    Some(
        ordered
            .into_iter()
            .zip(0..)
            .collect(),
    )
}

/// Position of `id` in a list already sorted by display order.
#[must_use]
pub fn position_of<I: PartialEq>(ids: &[I], id: &I) -> Option<usize> {
    ids.iter().position(|candidate| candidate == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_orders() {
        assert_eq!(next_display_order(0), 0);
        assert_eq!(next_display_order(7), 7);
        assert_eq!(next_after_max([]), 1);
        assert_eq!(next_after_max([0, 4, 2]), 5);
    }

    #[test]
    fn test_step_bounds() {
        assert_eq!(step(0, MoveDirection::Up, 3), None);
        assert_eq!(step(2, MoveDirection::Down, 3), None);
        assert_eq!(step(1, MoveDirection::Up, 3), Some(0));
        assert_eq!(step(1, MoveDirection::Down, 3), Some(2));
    }

    #[test]
    fn test_reorder_renumbers_from_zero() {
        assert_eq!(
            reorder(&[10, 20, 30, 40], 0, 2),
            Some(vec![(20, 0), (30, 1), (10, 2), (40, 3)])
        );
        assert_eq!(reorder(&[1, 2], 0, 0), Some(vec![(1, 0), (2, 1)]));
        assert_eq!(reorder(&[1, 2], 0, 2), None);
        assert_eq!(reorder::<u8>(&[], 0, 0), None);
    }

    #[test]
    fn test_position_of() {
        assert_eq!(position_of(&["a", "b"], &"b"), Some(1));
        assert_eq!(position_of(&["a", "b"], &"z"), None);
    }
}
