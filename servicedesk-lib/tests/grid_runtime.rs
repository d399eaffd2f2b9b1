//! Concurrent runtime behavior: overlapping commands and out-of-order
//! completions.

mod common;

use std::sync::Arc;

use common::GatedTransport;
use common::Pending;
use common::RecordingRenderer;
use common::RenderEvent;
use common::rows;
use common::ticket_columns;
use servicedesk_lib::api::query::FilterCriteria;
use servicedesk_lib::error::Error;
use servicedesk_lib::grid::GridHandle;
use servicedesk_lib::grid::GridOptions;
use servicedesk_lib::grid::GridRuntime;
use servicedesk_lib::grid::GridState;
use servicedesk_lib::grid::Outcome;
use servicedesk_lib::grid::ScrollPosition;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

struct Harness {
    handle: GridHandle,
    task: JoinHandle<()>,
    pending: mpsc::UnboundedReceiver<Pending>,
    renderer: RecordingRenderer,
}

fn spawn(options: GridOptions) -> Harness {
    let (transport, pending) = GatedTransport::new();
    let renderer = RecordingRenderer::default();
    let state = GridState::new(ticket_columns(), options).unwrap();
    let (handle, task) = GridRuntime::spawn(state, Arc::new(transport), Box::new(renderer.clone()));
    Harness {
        handle,
        task,
        pending,
        renderer,
    }
}

async fn mounted(options: GridOptions) -> Harness {
    let mut harness = spawn(options);
    let handle = harness.handle.clone();
    let mount = tokio::spawn(async move { handle.mount().await });
    let request = harness.pending.recv().await.unwrap();
    request.respond(Ok(rows(0, 20)));
    assert_eq!(mount.await.unwrap().unwrap(), Outcome::Replaced { rows: 20 });
    harness
}

#[tokio::test]
async fn test_second_scroll_skipped_while_loading() {
    let mut harness = mounted(GridOptions::default()).await;

    let handle = harness.handle.clone();
    let first = tokio::spawn(async move { handle.scroll(ScrollPosition::at_bottom()).await });
    let page = harness.pending.recv().await.unwrap();
    assert_eq!(page.params.get("start"), Some("20"));
    assert_eq!(page.params.get("end"), Some("40"));

    let snapshot = harness.handle.snapshot().await.unwrap();
    assert!(snapshot.loading);

    // Crossing again while the page is in flight does nothing.
    let second = harness.handle.scroll(ScrollPosition::at_bottom()).await.unwrap();
    assert_eq!(second, Outcome::Skipped);

    page.respond(Ok(rows(20, 20)));
    assert_eq!(first.await.unwrap().unwrap(), Outcome::Appended { rows: 20 });

    let snapshot = harness.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.rows.len(), 40);
    assert!(!snapshot.loading);
    assert!(harness.pending.try_recv().is_err());
}

#[tokio::test]
async fn test_stale_append_discarded_after_filter() {
    let mut harness = mounted(GridOptions::default()).await;

    let handle = harness.handle.clone();
    let scroll = tokio::spawn(async move { handle.scroll(ScrollPosition::at_bottom()).await });
    let page = harness.pending.recv().await.unwrap();

    let handle = harness.handle.clone();
    let criteria = FilterCriteria::new().with("status", "1");
    let filter = tokio::spawn(async move { handle.apply_filter(Some(criteria)).await });
    let reload = harness.pending.recv().await.unwrap();
    assert_eq!(reload.params.get("status"), Some("1"));
    assert_eq!(reload.params.get("start"), Some("0"));
    assert_eq!(reload.params.get("end"), Some("21"));

    // The filtered reload lands first; the old page arrives afterwards.
    reload.respond(Ok(rows(900, 3)));
    assert_eq!(filter.await.unwrap().unwrap(), Outcome::Replaced { rows: 3 });
    page.respond(Ok(rows(20, 20)));
    assert_eq!(scroll.await.unwrap().unwrap(), Outcome::Superseded);

    let snapshot = harness.handle.snapshot().await.unwrap();
    let ids: Vec<_> = snapshot.rows.iter().filter_map(|r| r.id_string()).collect();
    assert_eq!(ids, vec!["900", "901", "902"]);
    assert!(!snapshot.loading);
    assert!(
        !harness
            .renderer
            .drawn()
            .iter()
            .any(|e| matches!(e, RenderEvent::Append(_)))
    );
}

#[tokio::test]
async fn test_scroll_skipped_while_reload_in_flight() {
    let mut harness = mounted(GridOptions::default()).await;

    let handle = harness.handle.clone();
    let criteria = FilterCriteria::new().with("status", "1");
    let filter = tokio::spawn(async move { handle.apply_filter(Some(criteria)).await });
    let reload = harness.pending.recv().await.unwrap();

    let skipped = harness.handle.scroll(ScrollPosition::at_bottom()).await.unwrap();
    assert_eq!(skipped, Outcome::Skipped);
    assert!(harness.pending.try_recv().is_err());

    reload.respond(Ok(rows(0, 21)));
    assert_eq!(filter.await.unwrap().unwrap(), Outcome::Replaced { rows: 21 });

    let snapshot = harness.handle.snapshot().await.unwrap();
    assert_eq!((snapshot.start, snapshot.end), (0, 21));
    assert_eq!(snapshot.rows.len(), 21);

    let handle = harness.handle.clone();
    let scroll = tokio::spawn(async move { handle.scroll(ScrollPosition::at_bottom()).await });
    let page = harness.pending.recv().await.unwrap();
    assert_eq!(page.params.get("start"), Some("21"));
    assert_eq!(page.params.get("end"), Some("41"));
    page.respond(Ok(rows(21, 20)));
    assert_eq!(scroll.await.unwrap().unwrap(), Outcome::Appended { rows: 20 });
    assert_eq!(harness.handle.snapshot().await.unwrap().rows.len(), 41);
}

#[tokio::test]
async fn test_scroll_before_mount_skipped() {
    let mut harness = spawn(GridOptions::default());
    let skipped = harness.handle.scroll(ScrollPosition::at_bottom()).await.unwrap();
    assert_eq!(skipped, Outcome::Skipped);
    assert!(harness.pending.try_recv().is_err());

    let snapshot = harness.handle.snapshot().await.unwrap();
    assert_eq!((snapshot.start, snapshot.end), (0, 20));
}

#[tokio::test]
async fn test_latest_reload_wins() {
    let mut harness = mounted(GridOptions::default()).await;

    let handle = harness.handle.clone();
    let older = tokio::spawn(async move { handle.click_header("owner").await });
    let first = harness.pending.recv().await.unwrap();
    assert_eq!(first.params.get("sort"), Some("owner"));

    let handle = harness.handle.clone();
    let newer = tokio::spawn(async move { handle.click_header("priority").await });
    let second = harness.pending.recv().await.unwrap();
    assert_eq!(second.params.get("sort"), Some("priority"));

    second.respond(Ok(rows(0, 21)));
    first.respond(Ok(rows(300, 21)));
    assert_eq!(newer.await.unwrap().unwrap(), Outcome::Replaced { rows: 21 });
    assert_eq!(older.await.unwrap().unwrap(), Outcome::Superseded);

    let snapshot = harness.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.rows[0].id_string().as_deref(), Some("0"));
    assert_eq!(snapshot.sorted.column_id, "priority");
}

#[tokio::test]
async fn test_failed_append_clears_loading() {
    let mut harness = mounted(GridOptions::default()).await;

    let handle = harness.handle.clone();
    let scroll = tokio::spawn(async move { handle.scroll(ScrollPosition::at_bottom()).await });
    let page = harness.pending.recv().await.unwrap();
    page.respond(Err(Error::Api(servicedesk_lib::error::ApiError::http(503, "Unavailable"))));

    let err = scroll.await.unwrap().unwrap_err();
    assert_eq!(err.status_code(), Some(503));

    let snapshot = harness.handle.snapshot().await.unwrap();
    assert!(!snapshot.loading);
    assert_eq!(snapshot.rows.len(), 20);
    assert_eq!(harness.renderer.events().last(), Some(&RenderEvent::Loading(false)));
}

#[tokio::test]
async fn test_closed_runtime() {
    let harness = spawn(GridOptions::default());
    harness.task.abort();
    let _ = harness.task.await;

    assert!(matches!(harness.handle.reload().await, Err(Error::RuntimeClosed)));
    assert!(matches!(harness.handle.snapshot().await, Err(Error::RuntimeClosed)));
}

#[tokio::test]
async fn test_runtime_stops_when_handles_drop() {
    let harness = spawn(GridOptions::default());
    drop(harness.handle);
    harness.task.await.unwrap();
}
