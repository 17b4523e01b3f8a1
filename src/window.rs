//! Horizontal column virtualization: which bookkeeper columns to
//! materialize for a given scroll position, and where to place them.
//!
//! The runner column is pinned and exempt from windowing; every offset
//! produced here already accounts for its width.

use serde::{Deserialize, Serialize};

/// Scroll geometry of the grid container. Widths are uniform per device
/// class; the presets mirror the rendered column sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub scroll_left: f64,
    pub viewport_width: f64,
    pub runner_col_width: f64,
    pub bookkeeper_col_width: f64,
    pub overscan: usize,
}

impl GridGeometry {
    pub const DEFAULT_OVERSCAN: usize = 5;

    /// Regular (desktop) column widths.
    pub fn regular(scroll_left: f64, viewport_width: f64) -> Self {
        Self {
            scroll_left,
            viewport_width,
            runner_col_width: 110.0,
            bookkeeper_col_width: 130.0,
            overscan: Self::DEFAULT_OVERSCAN,
        }
    }

    /// Compact (narrow viewport) column widths.
    pub fn compact(scroll_left: f64, viewport_width: f64) -> Self {
        Self {
            scroll_left,
            viewport_width,
            runner_col_width: 90.0,
            bookkeeper_col_width: 110.0,
            overscan: Self::DEFAULT_OVERSCAN,
        }
    }
}

/// One materialized column: its index in the ordered column list and the
/// absolute pixel offset it must be positioned at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnSlot {
    pub index: usize,
    pub offset: f64,
}

/// The contiguous materialization range for one render pass.
///
/// `slots` is authoritative: it is empty when there are no columns, in
/// which case the index fields carry no meaning. `total_content_width` is
/// the summed width of all bookkeeper columns (the layout spacer width; the
/// pinned runner column is not included).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnWindow {
    pub start_index: usize,
    pub end_index: usize,
    pub slots: Vec<ColumnSlot>,
    pub total_content_width: f64,
}

impl ColumnWindow {
    pub fn empty() -> Self {
        Self {
            start_index: 0,
            end_index: 0,
            slots: Vec::new(),
            total_content_width: 0.0,
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        !self.slots.is_empty() && index >= self.start_index && index <= self.end_index
    }
}

/// Computes the inclusive `[start_index, end_index]` range of columns to
/// materialize: every column intersecting the visible scroll region, padded
/// by `overscan` on each side and clamped to `[0, column_count - 1]`.
pub fn compute_window(column_count: usize, geometry: &GridGeometry) -> ColumnWindow {
    if column_count == 0 || geometry.bookkeeper_col_width <= 0.0 {
        return ColumnWindow::empty();
    }

    let width = geometry.bookkeeper_col_width;
    let last = column_count - 1;

    let scroll = geometry.scroll_left.max(0.0);
    let first_visible = ((scroll / width).floor() as usize).min(last);
    let right_edge = scroll + geometry.viewport_width.max(0.0);
    let last_visible = ((right_edge / width).ceil() as usize)
        .saturating_sub(1)
        .clamp(first_visible, last);

    let start_index = first_visible.saturating_sub(geometry.overscan);
    let end_index = last_visible.saturating_add(geometry.overscan).min(last);

    let slots = (start_index..=end_index)
        .map(|index| ColumnSlot {
            index,
            offset: geometry.runner_col_width + width * index as f64,
        })
        .collect();

    ColumnWindow {
        start_index,
        end_index,
        slots,
        total_content_width: width * column_count as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(scroll_left: f64, viewport_width: f64, overscan: usize) -> GridGeometry {
        GridGeometry {
            scroll_left,
            viewport_width,
            runner_col_width: 110.0,
            bookkeeper_col_width: 130.0,
            overscan,
        }
    }

    #[test]
    fn zero_columns_yield_an_empty_window_and_zero_spacer() {
        let window = compute_window(0, &geometry(500.0, 780.0, 5));
        assert!(window.slots.is_empty());
        assert_eq!(window.total_content_width, 0.0);
        assert!(!window.contains(0));
    }

    #[test]
    fn start_of_scroll_clamps_overscan_at_zero() {
        let window = compute_window(200, &geometry(0.0, 780.0, 5));
        assert_eq!(window.start_index, 0);
        // Six columns fit the viewport, plus right-side overscan.
        assert_eq!(window.end_index, 10);
    }

    #[test]
    fn end_of_scroll_clamps_at_the_last_column() {
        let columns = 200;
        let total = 130.0 * columns as f64;
        let window = compute_window(columns, &geometry(total - 780.0, 780.0, 5));
        assert_eq!(window.end_index, columns - 1);
        assert!(window.start_index >= columns - 1 - 10);
    }

    #[test]
    fn window_covers_every_geometrically_visible_column() {
        let geometry = geometry(1000.0, 780.0, 2);
        let window = compute_window(200, &geometry);
        let width = geometry.bookkeeper_col_width;

        for index in 0..200 {
            let left = width * index as f64;
            let right = left + width;
            let visible =
                right > geometry.scroll_left && left < geometry.scroll_left + geometry.viewport_width;
            if visible {
                assert!(window.contains(index), "column {index} visible but not materialized");
            }
        }
    }

    #[test]
    fn materialized_range_is_contiguous_with_stable_offsets() {
        let geometry = geometry(1300.0, 780.0, 2);
        let window = compute_window(50, &geometry);

        for (slot_pos, slot) in window.slots.iter().enumerate() {
            assert_eq!(slot.index, window.start_index + slot_pos);
            assert_eq!(
                slot.offset,
                geometry.runner_col_width + geometry.bookkeeper_col_width * slot.index as f64
            );
        }
    }

    #[test]
    fn scroll_beyond_content_does_not_index_out_of_bounds() {
        let window = compute_window(3, &geometry(10_000.0, 780.0, 5));
        assert_eq!(window.start_index, 0);
        assert_eq!(window.end_index, 2);
    }

    #[test]
    fn spacer_width_reflects_full_content() {
        let window = compute_window(200, &geometry(0.0, 780.0, 5));
        assert_eq!(window.total_content_width, 26_000.0);
    }

    #[test]
    fn device_presets_carry_the_rendered_widths() {
        let regular = GridGeometry::regular(0.0, 780.0);
        assert_eq!(regular.runner_col_width, 110.0);
        assert_eq!(regular.bookkeeper_col_width, 130.0);

        let compact = GridGeometry::compact(0.0, 320.0);
        assert_eq!(compact.runner_col_width, 90.0);
        assert_eq!(compact.bookkeeper_col_width, 110.0);
        assert_eq!(compact.overscan, GridGeometry::DEFAULT_OVERSCAN);
    }
}
