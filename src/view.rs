//! Grid render model: the pivot, sorter, window, and change detector
//! composed into the exact structure a render pass materializes.

use serde::Serialize;

use crate::delta::{change_info, Trend};
use crate::matrix::{build_matrix, OddsEntry};
use crate::sort::{sorted_bookkeepers, SortState};
use crate::window::{compute_window, ColumnWindow, GridGeometry};

/// One windowed header cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderSlot {
    pub bookkeeper: String,
    pub offset: f64,
    /// `Some(descending)` when this column is the active sort.
    pub sort: Option<bool>,
}

/// One materialized odds cell with its movement since the previous poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub fixed_p: f64,
    pub fixed_w: f64,
    pub p_trend: Trend,
    pub w_trend: Trend,
    pub offset: f64,
}

/// One grid row: the pinned runner cell plus the windowed cells, aligned
/// index-for-index with [`GridModel::header`]. `None` is the "no data"
/// state for a (runner, bookkeeper) pair absent from the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub runner: String,
    pub cells: Vec<Option<GridCell>>,
}

/// Everything one render pass needs, recomputed deterministically from the
/// two snapshots plus user interaction state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridModel {
    pub runner_col_width: f64,
    pub bookkeeper_col_width: f64,
    pub header: Vec<HeaderSlot>,
    pub rows: Vec<GridRow>,
    pub window: ColumnWindow,
    pub sort: Option<SortState>,
}

/// Builds the render model for `current`, diffed against `previous`.
///
/// Only columns inside the computed window are materialized; the header and
/// every row use the same slot order, so a column found at slot `i` in the
/// header never disagrees with slot `i` in any row.
pub fn build_grid(
    current: &[OddsEntry],
    previous: Option<&[OddsEntry]>,
    sort: Option<&SortState>,
    geometry: &GridGeometry,
) -> GridModel {
    let matrix = build_matrix(current);
    let prev_matrix = previous.map(build_matrix);
    let ordered = sorted_bookkeepers(&matrix.bookkeepers, sort);
    let window = compute_window(ordered.len(), geometry);

    let header = window
        .slots
        .iter()
        .map(|slot| {
            let bookkeeper = ordered[slot.index].clone();
            let active = sort.filter(|s| s.bookkeeper == bookkeeper);
            HeaderSlot {
                bookkeeper,
                offset: slot.offset,
                sort: active.map(|s| s.descending),
            }
        })
        .collect();

    let rows = matrix
        .runners
        .iter()
        .map(|runner| {
            let cells = window
                .slots
                .iter()
                .map(|slot| {
                    let bookkeeper = &ordered[slot.index];
                    matrix.cell(runner, bookkeeper).map(|next| {
                        let prev = prev_matrix
                            .as_ref()
                            .and_then(|m| m.cell(runner, bookkeeper));
                        let change = change_info(prev, next);
                        GridCell {
                            fixed_p: next.fixed_p,
                            fixed_w: next.fixed_w,
                            p_trend: change.p,
                            w_trend: change.w,
                            offset: slot.offset,
                        }
                    })
                })
                .collect();
            GridRow {
                runner: runner.clone(),
                cells,
            }
        })
        .collect();

    GridModel {
        runner_col_width: geometry.runner_col_width,
        bookkeeper_col_width: geometry.bookkeeper_col_width,
        header,
        rows,
        window,
        sort: sort.cloned(),
    }
}
