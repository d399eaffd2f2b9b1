//! Test doubles shared by the grid integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use servicedesk_lib::api::Transport;
use servicedesk_lib::api::query::QueryParams;
use servicedesk_lib::api::query::SortKey;
use servicedesk_lib::error::Error;
use servicedesk_lib::grid::Renderer;
use servicedesk_lib::model::ColumnCatalog;
use servicedesk_lib::model::ColumnDescriptor;
use servicedesk_lib::model::Row;
use servicedesk_lib::model::SortType;
use tokio::sync::mpsc;
use tokio::sync::oneshot;

pub fn ticket_columns() -> ColumnCatalog {
    ColumnCatalog::new([
        ColumnDescriptor::new("id", "ID").sortable(SortType::Number),
        ColumnDescriptor::new("priority", "Priority").sortable(SortType::String),
        ColumnDescriptor::new("owner", "Owner").sortable(SortType::String),
        ColumnDescriptor::new("description", "Description"),
    ])
    .unwrap()
}

pub fn rows(from: usize, count: usize) -> Vec<Row> {
    (from..from + count)
        .map(|i| Row::new().set("id", i as i64).set("owner", format!("user{i}")))
        .collect()
}

/// Serves queued responses in order and records every query.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Vec<Row>, Error>>>,
    seen: Mutex<Vec<QueryParams>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, response: Result<Vec<Row>, Error>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn seen(&self) -> Vec<QueryParams> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> QueryParams {
        self.seen().pop().expect("no request was made")
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, params: &QueryParams) -> Result<Vec<Row>, Error> {
        self.seen.lock().unwrap().push(params.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// A fetch parked until the test responds to it.
pub struct Pending {
    pub params: QueryParams,
    respond: oneshot::Sender<Result<Vec<Row>, Error>>,
}

impl Pending {
    pub fn respond(self, result: Result<Vec<Row>, Error>) {
        let _ = self.respond.send(result);
    }
}

/// Parks every fetch so the test controls completion order.
#[derive(Clone)]
pub struct GatedTransport {
    requests: mpsc::UnboundedSender<Pending>,
}

impl GatedTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Pending>) {
        let (requests, receiver) = mpsc::unbounded_channel();
        (Self { requests }, receiver)
    }
}

#[async_trait]
impl Transport for GatedTransport {
    async fn fetch(&self, params: &QueryParams) -> Result<Vec<Row>, Error> {
        let (respond, response) = oneshot::channel();
        self.requests
            .send(Pending {
                params: params.clone(),
                respond,
            })
            .map_err(|_| Error::RuntimeClosed)?;
        response.await.map_err(|_| Error::RuntimeClosed)?
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Replace(Vec<String>),
    Append(Vec<String>),
    Loading(bool),
    Sorted(SortKey),
}

/// Records what a grid asked to draw. Row ids stand in for rows.
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    events: Arc<Mutex<Vec<RenderEvent>>>,
}

impl RecordingRenderer {
    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn drawn(&self) -> Vec<RenderEvent> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, RenderEvent::Replace(_) | RenderEvent::Append(_)))
            .collect()
    }

    fn record(&self, event: RenderEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn ids(rows: &[Row]) -> Vec<String> {
    rows.iter().filter_map(Row::id_string).collect()
}

impl Renderer for RecordingRenderer {
    fn replace_rows(&mut self, _columns: &ColumnCatalog, rows: &[Row]) {
        self.record(RenderEvent::Replace(ids(rows)));
    }

    fn append_rows(&mut self, _columns: &ColumnCatalog, rows: &[Row]) {
        self.record(RenderEvent::Append(ids(rows)));
    }

    fn set_loading(&mut self, loading: bool) {
        self.record(RenderEvent::Loading(loading));
    }

    fn set_sorted(&mut self, sort: &SortKey) {
        self.record(RenderEvent::Sorted(sort.clone()));
    }
}
