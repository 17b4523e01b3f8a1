//! HTTP surface: the snapshot JSON endpoint and the server-rendered grid
//! page.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::delta::Trend;
use crate::refresh::SnapshotHistory;
use crate::sort::{toggle_sort, SortState};
use crate::store::OddsStore;
use crate::view::{build_grid, GridModel};
use crate::window::GridGeometry;

/// Caching contract of the snapshot endpoint: serve slightly stale data for
/// a few seconds rather than hit the store on every poll.
const SNAPSHOT_CACHE_CONTROL: &str = "s-maxage=5, stale-while-revalidate=30";

const DEFAULT_VIEWPORT_WIDTH: f64 = 780.0;

/// Query parameters of the grid page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridQuery {
    pub scroll: Option<f64>,
    pub viewport: Option<f64>,
    pub compact: Option<bool>,
    pub sort: Option<String>,
    pub desc: Option<bool>,
}

#[derive(Clone)]
struct OddsAppState {
    store: OddsStore,
    history: SnapshotHistory,
}

pub fn odds_router(store: OddsStore) -> Router {
    let state = OddsAppState {
        store,
        history: SnapshotHistory::new(Vec::new()),
    };
    Router::new()
        .route("/", get(get_grid_page))
        .route("/api/odds", get(get_odds_snapshot))
        .with_state(state)
}

async fn get_odds_snapshot(State(state): State<OddsAppState>) -> Response {
    let entries = state.store.snapshot();
    info!(
        component = "odds_server",
        event = "http.snapshot.request",
        entries = entries.len()
    );

    if entries.is_empty() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "No data available" })),
        )
            .into_response();
    }

    (
        [(header::CACHE_CONTROL, SNAPSHOT_CACHE_CONTROL)],
        Json(entries),
    )
        .into_response()
}

async fn get_grid_page(
    State(state): State<OddsAppState>,
    Query(query): Query<GridQuery>,
) -> impl IntoResponse {
    let next = state.store.snapshot();
    // An empty read keeps the previously rendered snapshot, like a failed
    // poll would.
    if !next.is_empty() {
        state.history.commit(next);
    }
    let (current, previous) = state.history.snapshot_pair();

    let scroll = query.scroll.unwrap_or(0.0);
    let viewport = query.viewport.unwrap_or(DEFAULT_VIEWPORT_WIDTH);
    let geometry = if query.compact.unwrap_or(false) {
        GridGeometry::compact(scroll, viewport)
    } else {
        GridGeometry::regular(scroll, viewport)
    };
    let sort = query.sort.as_ref().map(|bookkeeper| SortState {
        bookkeeper: bookkeeper.clone(),
        descending: query.desc.unwrap_or(false),
    });

    let model = build_grid(&current, previous.as_deref(), sort.as_ref(), &geometry);
    info!(
        component = "odds_server",
        event = "http.page.request",
        runners = model.rows.len(),
        materialized_columns = model.header.len()
    );

    Html(render_grid_html(&model))
}

/// Renders the grid page: pinned runner column, width spacer, absolutely
/// positioned windowed columns, per-field trend markup, header sort links,
/// and an auto-refresh script on the poll cadence.
pub fn render_grid_html(model: &GridModel) -> String {
    let now_utc = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

    let mut out = String::new();
    out.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str("<title>Live Odds Comparison</title>\n");
    out.push_str("<style>body{margin:0;font-family:\"Segoe UI\",sans-serif;background:#f7f7f5;color:#222}.shell{max-width:1200px;margin:0 auto;padding:20px 14px}.hero{margin-bottom:12px}.hero h1{margin:0 0 4px;font-size:1.4rem}.hero-meta{font-size:.85rem;color:#666;display:flex;gap:14px;flex-wrap:wrap}.grid-wrap{position:relative;overflow-x:auto;background:#fff;border:1px solid #ddd;border-radius:10px}.grid-row{position:relative;height:44px;border-bottom:1px solid #eee}.grid-row:nth-child(even){background:#fafaf8}.grid-head{height:38px;background:#f0ede6;font-weight:600}.runner-cell{position:sticky;left:0;z-index:2;display:inline-flex;align-items:center;justify-content:center;height:100%;background:inherit;border-right:1px solid #ddd}.col-cell{position:absolute;top:0;height:100%;display:flex;align-items:center;justify-content:center;font-size:.8rem}.col-cell a{color:inherit;text-decoration:none}.spacer{display:inline-block;height:1px}.pair{display:inline-flex;align-items:center;gap:2px;padding:2px 4px;border-radius:4px;margin:0 2px}.cell-up{background:#e3f6e8;color:#1a7a3c}.cell-down{background:#fbe4e8;color:#b02343}.cell-none{background:#f0f0f0;color:#555}.no-data{color:#aaa}</style>\n");
    out.push_str("</head><body><main class=\"shell\">\n");
    out.push_str("<section class=\"hero\"><h1>Live Odds Comparison</h1>");
    out.push_str("<div class=\"hero-meta\">");
    out.push_str(&format!("<span>Runners: {}</span>", model.rows.len()));
    out.push_str(&format!(
        "<span>Columns materialized: {}</span>",
        model.header.len()
    ));
    out.push_str(&format!("<span>Generated: {}</span>", escape_html(&now_utc)));
    out.push_str("</div></section>\n");

    out.push_str("<section class=\"grid-wrap\">\n");

    // Header row: pinned runner header, spacer, windowed bookkeeper headers.
    out.push_str("<div class=\"grid-row grid-head\">");
    out.push_str(&format!(
        "<span class=\"runner-cell\" style=\"width:{}px\">Runner</span>",
        model.runner_col_width
    ));
    out.push_str(&format!(
        "<span class=\"spacer\" style=\"width:{}px\"></span>",
        model.window.total_content_width
    ));
    for slot in &model.header {
        let marker = match slot.sort {
            Some(true) => " &darr;",
            Some(false) => " &uarr;",
            None => "",
        };
        let href = sort_href(model.sort.as_ref(), &slot.bookkeeper);
        out.push_str(&format!(
            "<span class=\"col-cell\" style=\"left:{}px;width:{}px\"><a href=\"{}\" title=\"{}\">{}{}</a></span>",
            slot.offset,
            model.bookkeeper_col_width,
            escape_html(&href),
            escape_html(&slot.bookkeeper),
            escape_html(&slot.bookkeeper),
            marker
        ));
    }
    out.push_str("</div>\n");

    for row in &model.rows {
        out.push_str("<div class=\"grid-row\">");
        out.push_str(&format!(
            "<span class=\"runner-cell\" style=\"width:{}px\">{}</span>",
            model.runner_col_width,
            escape_html(&row.runner)
        ));
        out.push_str(&format!(
            "<span class=\"spacer\" style=\"width:{}px\"></span>",
            model.window.total_content_width
        ));
        for (cell, slot) in row.cells.iter().zip(&model.window.slots) {
            match cell {
                Some(cell) => {
                    out.push_str(&format!(
                        "<span class=\"col-cell\" style=\"left:{}px;width:{}px\">",
                        cell.offset,
                        model.bookkeeper_col_width
                    ));
                    out.push_str(&trend_pair("P", cell.fixed_p, cell.p_trend));
                    out.push_str(&trend_pair("W", cell.fixed_w, cell.w_trend));
                    out.push_str("</span>");
                }
                None => {
                    out.push_str(&format!(
                        "<span class=\"col-cell no-data\" style=\"left:{}px;width:{}px\">&ndash;</span>",
                        slot.offset,
                        model.bookkeeper_col_width
                    ));
                }
            }
        }
        out.push_str("</div>\n");
    }

    out.push_str("</section>\n");
    out.push_str("<script>setTimeout(function(){location.reload();},5000);</script>\n");
    out.push_str("</main></body></html>\n");
    out
}

fn trend_pair(label: &str, value: f64, trend: Trend) -> String {
    let arrow = match trend {
        Trend::Up => "&#9650;",
        Trend::Down => "&#9660;",
        Trend::None => "&ndash;",
    };
    format!(
        "<span class=\"pair cell-{}\">{}: {:.1} {}</span>",
        trend.as_str(),
        label,
        value,
        arrow
    )
}

fn sort_href(current: Option<&SortState>, bookkeeper: &str) -> String {
    match toggle_sort(current.cloned(), bookkeeper) {
        None => "/".to_string(),
        Some(next) => format!(
            "/?sort={}&desc={}",
            encode_query_value(&next.bookkeeper),
            next.descending
        ),
    }
}

fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
