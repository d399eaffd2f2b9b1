//! Concurrent grid runtime.
//!
//! [`GridRuntime`] owns a [`GridState`] on a tokio task and accepts
//! [`GridCommand`]s while fetches are in flight. Fetch results are merged
//! in completion order; results from a window that was reset in the
//! meantime are dropped by generation.

use std::sync::Arc;

use futures::FutureExt;
use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use log::debug;
use log::info;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::FetchRequest;
use super::GridState;
use super::HeaderAction;
use super::Outcome;
use super::Renderer;
use super::ScrollPosition;
use crate::api::Transport;
use crate::api::query::Direction;
use crate::api::query::FilterCriteria;
use crate::api::query::SortKey;
use crate::error::Error;
use crate::model::Row;

const COMMAND_BUFFER: usize = 64;

/// A user action sent to a running grid.
#[derive(Debug, Clone)]
pub enum GridCommand {
    Mount,
    ClickHeader(String),
    Scroll(ScrollPosition),
    ApplyFilter(Option<FilterCriteria>),
    Reload,
    SetFiltered(Option<FilterCriteria>),
    SortOnServer {
        column_id: String,
        direction: Direction,
        start: usize,
        end: usize,
    },
    SortLocally {
        column_id: String,
        direction: Direction,
    },
    AddRows(Vec<Row>),
    Update(Vec<Row>),
}

/// A point-in-time copy of a grid's observable state.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSnapshot {
    pub sorted: SortKey,
    pub start: usize,
    pub end: usize,
    pub filtered: Option<FilterCriteria>,
    pub loading: bool,
    pub generation: u64,
    pub rows: Vec<Row>,
}

impl GridSnapshot {
    fn of(state: &GridState) -> Self {
        Self {
            sorted: state.sorted().clone(),
            start: state.start(),
            end: state.end(),
            filtered: state.filtered().cloned(),
            loading: state.is_loading(),
            generation: state.window().generation(),
            rows: state.rows().to_vec(),
        }
    }
}

type Reply = oneshot::Sender<Result<Outcome, Error>>;

enum Message {
    Command(GridCommand, Reply),
    Snapshot(oneshot::Sender<GridSnapshot>),
}

struct FetchDone {
    request: FetchRequest,
    result: Result<Vec<Row>, Error>,
    reply: Reply,
}

enum Event {
    Message(Option<Message>),
    Fetched(FetchDone),
}

/// Runs a grid on its own task.
pub struct GridRuntime {
    state: GridState,
    transport: Arc<dyn Transport>,
    renderer: Box<dyn Renderer>,
    receiver: mpsc::Receiver<Message>,
    in_flight: FuturesUnordered<BoxFuture<'static, FetchDone>>,
}

impl GridRuntime {
    /// Spawns the runtime on the current tokio runtime.
    ///
    /// The task ends once every [`GridHandle`] is dropped and in-flight
    /// fetches have finished.
    pub fn spawn(
        state: GridState,
        transport: Arc<dyn Transport>,
        renderer: Box<dyn Renderer>,
    ) -> (GridHandle, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(COMMAND_BUFFER);
        let runtime = Self {
            state,
            transport,
            renderer,
            receiver,
            in_flight: FuturesUnordered::new(),
        };
        let task = tokio::spawn(runtime.run());
        (GridHandle { sender }, task)
    }

    async fn run(mut self) {
        loop {
            let event = tokio::select! {
                message = self.receiver.recv() => Event::Message(message),
                Some(done) = self.in_flight.next(), if !self.in_flight.is_empty() => Event::Fetched(done),
            };

            match event {
                Event::Message(Some(message)) => self.handle(message),
                Event::Message(None) => break,
                Event::Fetched(done) => self.finish(done),
            }
        }

        if !self.in_flight.is_empty() {
            debug!("Grid closing, waiting for {} fetches", self.in_flight.len());
        }
        while let Some(done) = self.in_flight.next().await {
            self.finish(done);
        }
        info!("Grid runtime stopped");
    }

    fn handle(&mut self, message: Message) {
        let (command, reply) = match message {
            Message::Command(command, reply) => (command, reply),
            Message::Snapshot(reply) => {
                let _ = reply.send(GridSnapshot::of(&self.state));
                return;
            }
        };

        match command {
            GridCommand::Mount => {
                let request = self.state.mount();
                self.renderer.set_sorted(self.state.sorted());
                self.dispatch(request, reply);
            }
            GridCommand::ClickHeader(column_id) => match self.state.click_header(&column_id) {
                Ok(HeaderAction::Ignored) => respond(reply, Ok(Outcome::Ignored)),
                Ok(HeaderAction::Local(key)) => {
                    let outcome = self.present(Outcome::SortedLocally(key));
                    respond(reply, Ok(outcome));
                }
                Ok(HeaderAction::Fetch(request)) => {
                    self.renderer.set_sorted(self.state.sorted());
                    self.dispatch(request, reply);
                }
                Err(e) => respond(reply, Err(e.into())),
            },
            GridCommand::Scroll(position) => match self.state.scroll(position) {
                Some(request) => self.dispatch(request, reply),
                None => respond(reply, Ok(Outcome::Skipped)),
            },
            GridCommand::ApplyFilter(criteria) => {
                let request = self.state.apply_filter(criteria);
                self.dispatch(request, reply);
            }
            GridCommand::Reload => {
                let request = self.state.reload();
                self.dispatch(request, reply);
            }
            GridCommand::SetFiltered(criteria) => {
                self.state.set_filtered(criteria);
                respond(reply, Ok(Outcome::Skipped));
            }
            GridCommand::SortOnServer {
                column_id,
                direction,
                start,
                end,
            } => match self.state.sort_on_server(&column_id, direction, start, end) {
                Ok(request) => {
                    self.renderer.set_sorted(self.state.sorted());
                    self.dispatch(request, reply);
                }
                Err(e) => respond(reply, Err(e.into())),
            },
            GridCommand::SortLocally { column_id, direction } => {
                match self.state.sort_locally(&column_id, direction) {
                    Ok(key) => {
                        let outcome = self.present(Outcome::SortedLocally(key));
                        respond(reply, Ok(outcome));
                    }
                    Err(e) => respond(reply, Err(e.into())),
                }
            }
            GridCommand::AddRows(rows) => {
                let count = rows.len();
                self.state.add_rows(rows);
                let outcome = self.present(Outcome::Replaced { rows: count });
                respond(reply, Ok(outcome));
            }
            GridCommand::Update(rows) => {
                let count = rows.len();
                self.state.update(rows);
                let outcome = self.present(Outcome::Appended { rows: count });
                respond(reply, Ok(outcome));
            }
        }
    }

    fn dispatch(&mut self, request: FetchRequest, reply: Reply) {
        debug!(
            "Fetching ({:?}, generation {}): {}",
            request.kind,
            request.generation,
            request.params.to_query_string()
        );

        if self.in_flight.is_empty() {
            self.renderer.set_loading(true);
        }

        let transport = Arc::clone(&self.transport);
        self.in_flight.push(
            async move {
                let result = transport.fetch(&request.params).await;
                FetchDone { request, result, reply }
            }
            .boxed(),
        );
    }

    fn finish(&mut self, done: FetchDone) {
        let outcome = self
            .state
            .complete(&done.request, done.result)
            .map(|outcome| self.present(outcome));

        if self.in_flight.is_empty() {
            self.renderer.set_loading(false);
        }
        respond(done.reply, outcome);
    }

    fn present(&mut self, outcome: Outcome) -> Outcome {
        self.state.render(&outcome, &mut self.renderer);
        outcome
    }
}

fn respond(reply: Reply, result: Result<Outcome, Error>) {
    // The caller may have stopped waiting.
    let _ = reply.send(result);
}

/// Sends commands to a [`GridRuntime`]. Cheap to clone.
///
/// Every command method waits for the command to take effect, including
/// any fetch it starts, and returns its [`Outcome`]. Commands issued from
/// concurrent tasks are processed concurrently by the runtime.
#[derive(Debug, Clone)]
pub struct GridHandle {
    sender: mpsc::Sender<Message>,
}

impl GridHandle {
    /// Sends a command and waits for its outcome.
    pub async fn send(&self, command: GridCommand) -> Result<Outcome, Error> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Message::Command(command, reply))
            .await
            .map_err(|_| Error::RuntimeClosed)?;
        response.await.map_err(|_| Error::RuntimeClosed)?
    }

    pub async fn mount(&self) -> Result<Outcome, Error> {
        self.send(GridCommand::Mount).await
    }

    pub async fn click_header(&self, column_id: impl Into<String>) -> Result<Outcome, Error> {
        self.send(GridCommand::ClickHeader(column_id.into())).await
    }

    pub async fn scroll(&self, position: ScrollPosition) -> Result<Outcome, Error> {
        self.send(GridCommand::Scroll(position)).await
    }

    pub async fn apply_filter(&self, criteria: Option<FilterCriteria>) -> Result<Outcome, Error> {
        self.send(GridCommand::ApplyFilter(criteria)).await
    }

    pub async fn reset_filters(&self) -> Result<Outcome, Error> {
        self.apply_filter(None).await
    }

    pub async fn reload(&self) -> Result<Outcome, Error> {
        self.send(GridCommand::Reload).await
    }

    pub async fn set_filtered(&self, criteria: Option<FilterCriteria>) -> Result<Outcome, Error> {
        self.send(GridCommand::SetFiltered(criteria)).await
    }

    pub async fn sort_on_server(
        &self,
        column_id: impl Into<String>,
        direction: Direction,
        start: usize,
        end: usize,
    ) -> Result<Outcome, Error> {
        self.send(GridCommand::SortOnServer {
            column_id: column_id.into(),
            direction,
            start,
            end,
        })
        .await
    }

    pub async fn sort_locally(&self, column_id: impl Into<String>, direction: Direction) -> Result<Outcome, Error> {
        self.send(GridCommand::SortLocally {
            column_id: column_id.into(),
            direction,
        })
        .await
    }

    pub async fn add_rows(&self, rows: Vec<Row>) -> Result<Outcome, Error> {
        self.send(GridCommand::AddRows(rows)).await
    }

    pub async fn update(&self, rows: Vec<Row>) -> Result<Outcome, Error> {
        self.send(GridCommand::Update(rows)).await
    }

    /// Returns a copy of the grid's current state.
    pub async fn snapshot(&self) -> Result<GridSnapshot, Error> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Message::Snapshot(reply))
            .await
            .map_err(|_| Error::RuntimeClosed)?;
        response.await.map_err(|_| Error::RuntimeClosed)
    }
}
