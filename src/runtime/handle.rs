use std::sync::Arc;

use thiserror::Error;
use tokio::{
    sync::{broadcast, mpsc, oneshot},
    time::{Duration, Instant, sleep_until},
};
use tracing::debug;

use crate::{
    api::{ApiResult, CatalogApi},
    character::{Character, CharacterDraft, CharacterPatch, PageEnvelope},
    controller::{
        debounce::Debouncer,
        detail::{self, ConfirmGate, DetailExit, DetailSource, LocalResolution, Presentation},
        form::{CharacterForm, FormSubmission},
        list::{FetchOutcome, ListController, PageRequest},
    },
    core::{cursor::ListCursor, store::CatalogStore},
    routes::Route,
    types::CharacterId,
};

use super::events::CatalogEvent;

/// Errors returned by [`CatalogHandle`] calls.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The runtime loop has stopped.
    #[error("catalog runtime is not running")]
    ChannelClosed,
}

/// Runtime tuning.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Quiet period before search input is applied.
    pub search_debounce_ms: u64,
    /// Bounded command queue depth.
    pub command_queue_bound: usize,
    /// Broadcast event channel capacity.
    pub event_capacity: usize,
    /// Issue the page-1 fetch as soon as the loop starts.
    pub reload_on_start: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 300,
            command_queue_bound: 256,
            event_capacity: 1024,
            reload_on_start: true,
        }
    }
}

/// Cloneable handle to a running catalog loop.
pub struct CatalogHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<CatalogEvent>,
}

impl Clone for CatalogHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    Search {
        text: String,
        resp: oneshot::Sender<()>,
    },
    Reload {
        resp: oneshot::Sender<()>,
    },
    NearEnd {
        resp: oneshot::Sender<bool>,
    },
    Create {
        draft: CharacterDraft,
        resp: oneshot::Sender<Character>,
    },
    Update {
        id: CharacterId,
        patch: CharacterPatch,
        resp: oneshot::Sender<Option<Character>>,
    },
    Delete {
        id: CharacterId,
        resp: oneshot::Sender<()>,
    },
    Find {
        id: CharacterId,
        resp: oneshot::Sender<Option<Character>>,
    },
    Resolve {
        source: DetailSource,
        resp: oneshot::Sender<Option<Character>>,
    },
    Filtered {
        resp: oneshot::Sender<Vec<Character>>,
    },
    Cursor {
        resp: oneshot::Sender<ListCursor>,
    },
    Select {
        character: Option<Character>,
        resp: oneshot::Sender<()>,
    },
    Selected {
        resp: oneshot::Sender<Option<Character>>,
    },
    EditForm {
        id: CharacterId,
        resp: oneshot::Sender<CharacterForm>,
    },
    Submit {
        submission: FormSubmission,
        resp: oneshot::Sender<Route>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

struct FetchDone {
    request: PageRequest,
    result: ApiResult<PageEnvelope>,
}

/// Starts the loop that owns `store`. Must be called inside a tokio runtime.
pub fn spawn_catalog<A: CatalogApi>(
    store: CatalogStore,
    api: Arc<A>,
    config: RuntimeConfig,
) -> CatalogHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<CatalogEvent>(config.event_capacity);
    let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel::<FetchDone>();

    let mut catalog = Catalog {
        store,
        list: ListController::new(),
        search: Debouncer::new(Duration::from_millis(config.search_debounce_ms)),
        api,
        fetch_tx,
        events_tx: events_tx.clone(),
    };

    tokio::spawn(async move {
        if config.reload_on_start {
            catalog.reload();
        }

        loop {
            let deadline = catalog.search.deadline();
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break; };
                    if catalog.handle_command(cmd) {
                        break;
                    }
                }
                Some(done) = fetch_rx.recv() => {
                    catalog.finish_fetch(done);
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    catalog.settle_search();
                }
            }
        }
    });

    CatalogHandle { cmd_tx, events_tx }
}

impl CatalogHandle {
    /// Subscribes to runtime events.
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events_tx.subscribe()
    }

    /// Feeds raw search-box text; it is applied once input goes quiet.
    pub async fn search(&self, text: impl Into<String>) -> Result<(), RuntimeError> {
        let text = text.into();
        self.request(|resp| Command::Search { text, resp }).await
    }

    /// Restarts the list from page 1 with the current query.
    pub async fn reload(&self) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Reload { resp }).await
    }

    /// Viewport reached the end of the content. Returns whether a fetch was issued.
    pub async fn near_end(&self) -> Result<bool, RuntimeError> {
        self.request(|resp| Command::NearEnd { resp }).await
    }

    /// Creates a record locally and returns it with its assigned id.
    pub async fn create(&self, draft: CharacterDraft) -> Result<Character, RuntimeError> {
        self.request(|resp| Command::Create { draft, resp }).await
    }

    /// Edits a visible record. `None` when the id does not resolve.
    pub async fn update(
        &self,
        id: CharacterId,
        patch: CharacterPatch,
    ) -> Result<Option<Character>, RuntimeError> {
        self.request(|resp| Command::Update { id, patch, resp }).await
    }

    /// Tombstones `id` without confirmation.
    pub async fn delete(&self, id: CharacterId) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Delete { id, resp }).await
    }

    /// Local lookup with overlay precedence.
    pub async fn find(&self, id: CharacterId) -> Result<Option<Character>, RuntimeError> {
        self.request(|resp| Command::Find { id, resp }).await
    }

    /// One resolution attempt: inline data, the store, then the remote catalog.
    pub async fn resolve_detail(
        &self,
        source: DetailSource,
    ) -> Result<Option<Character>, RuntimeError> {
        self.request(|resp| Command::Resolve { source, resp }).await
    }

    /// The visible list.
    pub async fn filtered(&self) -> Result<Vec<Character>, RuntimeError> {
        self.request(|resp| Command::Filtered { resp }).await
    }

    /// Pagination cursor snapshot.
    pub async fn cursor(&self) -> Result<ListCursor, RuntimeError> {
        self.request(|resp| Command::Cursor { resp }).await
    }

    /// Sets or clears the selected record.
    pub async fn select(&self, character: Option<Character>) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Select { character, resp }).await
    }

    /// Currently selected record.
    pub async fn selected(&self) -> Result<Option<Character>, RuntimeError> {
        self.request(|resp| Command::Selected { resp }).await
    }

    /// Edit form for `id`, prefilled from the store.
    pub async fn edit_form(&self, id: CharacterId) -> Result<CharacterForm, RuntimeError> {
        self.request(|resp| Command::EditForm { id, resp }).await
    }

    /// Validates `form` and applies it. `Ok(None)` means validation failed and
    /// the form now has every field marked touched.
    pub async fn submit(&self, form: &mut CharacterForm) -> Result<Option<Route>, RuntimeError> {
        let Ok(submission) = form.submit() else {
            return Ok(None);
        };
        let route = self
            .request(|resp| Command::Submit { submission, resp })
            .await?;
        Ok(Some(route))
    }

    /// Delete workflow: confirm, delete, and report how to leave the view.
    /// `Ok(None)` means the user cancelled.
    pub async fn remove(
        &self,
        id: CharacterId,
        gate: &mut impl ConfirmGate,
        presentation: Presentation,
    ) -> Result<Option<DetailExit>, RuntimeError> {
        let Some(exit) = detail::confirm_delete(gate, presentation) else {
            return Ok(None);
        };
        self.delete(id).await?;
        Ok(Some(exit))
    }

    /// Stops the loop after acknowledging.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.request(|resp| Command::Shutdown { resp }).await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

struct Catalog<A> {
    store: CatalogStore,
    list: ListController,
    search: Debouncer<String>,
    api: Arc<A>,
    fetch_tx: mpsc::UnboundedSender<FetchDone>,
    events_tx: broadcast::Sender<CatalogEvent>,
}

impl<A: CatalogApi> Catalog<A> {
    fn emit(&self, event: CatalogEvent) {
        let _ = self.events_tx.send(event);
    }

    fn reload(&mut self) {
        let request = self.list.begin_reload(&mut self.store);
        self.issue(request);
    }

    fn load_more(&mut self) -> bool {
        match self.list.begin_load_more(&mut self.store) {
            Some(request) => {
                self.issue(request);
                true
            }
            None => false,
        }
    }

    fn issue(&self, request: PageRequest) {
        debug!(
            page = request.page,
            query = %request.query,
            generation = request.generation,
            "fetching page"
        );
        self.emit(CatalogEvent::FetchStarted { page: request.page });

        let api = Arc::clone(&self.api);
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = api.list_characters(request.page, &request.query).await;
            let _ = tx.send(FetchDone { request, result });
        });
    }

    fn finish_fetch(&mut self, done: FetchDone) {
        let page = done.request.page;
        let event = match self.list.complete(&mut self.store, &done.request, done.result) {
            FetchOutcome::Replaced { len } => CatalogEvent::ListReplaced { len },
            FetchOutcome::Appended { added } => CatalogEvent::PageAppended { page, added },
            FetchOutcome::Failed => CatalogEvent::FetchFailed { page },
            FetchOutcome::Stale => CatalogEvent::StaleDropped { page },
        };
        self.emit(event);
    }

    fn settle_search(&mut self) {
        let Some(query) = self.search.poll(Instant::now()) else {
            return;
        };
        debug!(%query, "search settled");
        self.store.set_query(query.clone());
        self.emit(CatalogEvent::QuerySettled { query });
        self.reload();
    }

    fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Search { text, resp } => {
                self.search.push(text, Instant::now());
                let _ = resp.send(());
            }
            Command::Reload { resp } => {
                self.reload();
                let _ = resp.send(());
            }
            Command::NearEnd { resp } => {
                let issued = self.load_more();
                let _ = resp.send(issued);
            }
            Command::Create { draft, resp } => {
                let created = self.store.create_local(draft);
                self.emit(CatalogEvent::Created { id: created.id });
                let _ = resp.send(created);
            }
            Command::Update { id, patch, resp } => {
                let updated = self.store.update_local(id, &patch);
                if updated.is_some() {
                    self.emit(CatalogEvent::Updated { id });
                }
                let _ = resp.send(updated);
            }
            Command::Delete { id, resp } => {
                self.store.delete_local(id);
                self.emit(CatalogEvent::Deleted { id });
                let _ = resp.send(());
            }
            Command::Find { id, resp } => {
                let _ = resp.send(self.store.find_by_id(id));
            }
            Command::Resolve { source, resp } => match detail::resolve_local(&self.store, source) {
                LocalResolution::Resolved(rec) => {
                    let _ = resp.send(Some(rec));
                }
                LocalResolution::NotFound => {
                    let _ = resp.send(None);
                }
                LocalResolution::Remote(id) => {
                    let api = Arc::clone(&self.api);
                    tokio::spawn(async move {
                        let rec = detail::fetch_remote(api.as_ref(), id).await;
                        let _ = resp.send(rec);
                    });
                }
            },
            Command::Filtered { resp } => {
                let _ = resp.send(self.store.filtered());
            }
            Command::Cursor { resp } => {
                let _ = resp.send(self.store.cursor().clone());
            }
            Command::Select { character, resp } => {
                self.store.select(character);
                let _ = resp.send(());
            }
            Command::Selected { resp } => {
                let _ = resp.send(self.store.selected().cloned());
            }
            Command::EditForm { id, resp } => {
                let _ = resp.send(CharacterForm::edit(&self.store, id));
            }
            Command::Submit { submission, resp } => {
                let created = matches!(submission, FormSubmission::Create(_));
                let (route, changed) = submission.apply(&mut self.store);
                if let Some(rec) = changed {
                    self.emit(if created {
                        CatalogEvent::Created { id: rec.id }
                    } else {
                        CatalogEvent::Updated { id: rec.id }
                    });
                }
                let _ = resp.send(route);
            }
            Command::Shutdown { resp } => {
                let _ = resp.send(());
                return true;
            }
        }

        false
    }
}
