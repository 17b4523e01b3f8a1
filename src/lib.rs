//! Live odds grid core.
//!
//! Implemented scope:
//! - flat snapshot pivot into a runner × bookkeeper matrix
//! - per-cell change classification between consecutive polls
//! - bookkeeper column sorting with header-click cycling
//! - horizontal column virtualization geometry
//! - periodic snapshot polling with an atomic previous/current swap
//! - in-memory backing store with a randomized mutation job and HTTP routes

mod delta;
mod matrix;
mod observability;
mod refresh;
mod server;
mod sort;
mod store;
mod view;
mod window;

pub use delta::{change_info, ChangeInfo, Trend};
pub use matrix::{build_matrix, OddsEntry, OddsMatrix};
pub use observability::{
    init_logging, log_app_bind, log_app_start, log_store_seeded, logging_config_from_env,
    LogFormat, LoggingConfig, LoggingInitError,
};
pub use refresh::{
    apply_poll_result, fetch_initial, FetchError, HttpOddsFetcher, OddsFetcher, RefreshConfig,
    RefreshController, RefreshHandle, RefreshStatus, SnapshotHistory,
};
pub use server::{odds_router, render_grid_html, GridQuery};
pub use sort::{compare_natural, sorted_bookkeepers, toggle_sort, SortState};
pub use store::{seed_entries, MutationConfig, MutationJob, OddsStore, SeedConfig};
pub use view::{build_grid, GridCell, GridModel, GridRow, HeaderSlot};
pub use window::{compute_window, ColumnSlot, ColumnWindow, GridGeometry};
