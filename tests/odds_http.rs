use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use oddsgrid::{odds_router, OddsEntry, OddsStore};
use tower::util::ServiceExt;

fn entry(runner: &str, bookkeeper: &str, fixed_p: f64, fixed_w: f64) -> OddsEntry {
    OddsEntry {
        runner: runner.to_string(),
        bookkeeper: bookkeeper.to_string(),
        fixed_p,
        fixed_w,
    }
}

fn sample_store() -> OddsStore {
    OddsStore::new(vec![
        entry("Runner 1", "Bookkeeper 2", 5.0, 2.0),
        entry("Runner 1", "Bookkeeper 1", 6.5, 3.0),
        entry("Runner 2", "Bookkeeper 2", 7.0, 1.5),
    ])
}

#[tokio::test]
async fn snapshot_endpoint_returns_wire_shaped_entries_with_cache_header() {
    let app = odds_router(sample_store());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/odds")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok()),
        Some("s-maxage=5, stale-while-revalidate=30")
    );

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let entries = json.as_array().unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["runner"], "Runner 1");
    assert_eq!(entries[0]["bookkeeper"], "Bookkeeper 2");
    assert_eq!(entries[0]["fixedP"], 5.0);
    assert_eq!(entries[0]["fixedW"], 2.0);
}

#[tokio::test]
async fn empty_store_yields_503_with_an_error_body() {
    let app = odds_router(OddsStore::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/odds")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "No data available");
}

#[tokio::test]
async fn grid_page_renders_pinned_column_cells_and_refresh_script() {
    let app = odds_router(sample_store());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();

    assert!(html.contains("runner-cell"));
    assert!(html.contains("Runner 1"));
    assert!(html.contains("Bookkeeper 2"));
    // First paint has no prior snapshot: every cell is neutral.
    assert!(html.contains("pair cell-none"));
    assert!(!html.contains("pair cell-up"));
    assert!(html.contains("location.reload()"));
    // Builder (arrival) order, not alphabetical.
    let b2 = html.find("Bookkeeper 2").unwrap();
    let b1 = html.find("Bookkeeper 1").unwrap();
    assert!(b2 < b1);
}

#[tokio::test]
async fn grid_page_applies_sort_and_compact_geometry_from_the_query() {
    let app = odds_router(sample_store());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?sort=Bookkeeper%201&desc=false&compact=true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();

    // Ascending marker on the active column.
    assert!(html.contains("&uarr;"));
    // Compact runner column width.
    assert!(html.contains("width:90px"));
    // Sorted order puts Bookkeeper 1 first.
    let b1 = html.find("Bookkeeper 1").unwrap();
    let b2 = html.find("Bookkeeper 2").unwrap();
    assert!(b1 < b2);
}

#[tokio::test]
async fn grid_page_with_an_empty_store_renders_an_empty_grid() {
    let app = odds_router(OddsStore::default());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Runners: 0"));
}

#[tokio::test]
async fn second_page_load_diffs_against_the_previous_render() {
    let store = sample_store();
    let app = odds_router(store.clone());

    let first = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    // The store moves between renders, like the mutation job would.
    store.replace(vec![
        entry("Runner 1", "Bookkeeper 2", 5.5, 2.0),
        entry("Runner 1", "Bookkeeper 1", 6.5, 3.0),
        entry("Runner 2", "Bookkeeper 2", 6.0, 1.5),
    ]);

    let second = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = to_bytes(second.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();

    assert!(html.contains("pair cell-up"));
    assert!(html.contains("pair cell-down"));
    assert!(html.contains("pair cell-none"));
}
