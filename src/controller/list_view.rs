use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use crate::controller::debounce::{self, Debouncer};
use crate::controller::handle::ListViewHandle;
use crate::controller::ports::{ConfirmationPrompt, NotificationKind, ViewPorts};
use crate::controller::state::{ListViewState, LoadPhase, PendingDeletion};
use crate::controller::{
    ControllerError, ControllerResult, DELETE_DIALOG_TITLE, DELETE_ERROR_MESSAGE,
    DELETE_SUCCESS_MESSAGE, EMPTY_SEARCH_MESSAGE, ListViewConfig,
};
use crate::domain::client::{ClientListQuery, ClientPage};
use crate::domain::types::{ClientId, PerPage};
use crate::dto::main::ListUrlParams;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ClientReader, ClientWriter};

const COMMAND_QUEUE_CAPACITY: usize = 32;

pub(crate) enum Command {
    Initialize,
    SetSearchText(String),
    SubmitSearch,
    ClearSearch,
    GoToPage(usize),
    SetPerPage(PerPage),
    Retry,
    RequestDelete {
        client_id: ClientId,
        client_name: String,
    },
    CancelDelete,
    ConfirmDelete,
}

pub(crate) type Envelope = (Command, oneshot::Sender<ControllerResult<()>>);

/// Backend call results fed back into the controller task.
enum Completion {
    Fetched {
        request: u64,
        query: ClientListQuery,
        result: RepositoryResult<ClientPage>,
    },
    Deleted {
        client_id: ClientId,
        result: RepositoryResult<()>,
    },
}

/// Owner of the list page state; see the [module docs](crate::controller).
pub struct ListViewController<R: ?Sized> {
    repo: Arc<R>,
    ports: ViewPorts,
    state: ListViewState,
    debounce: Debouncer,
    latest_request: u64,
    commands: mpsc::Receiver<Envelope>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    published: watch::Sender<ListViewState>,
}

impl<R> ListViewController<R>
where
    R: ClientReader + ClientWriter + ?Sized + 'static,
{
    /// Starts the controller task and returns a handle to drive it.
    ///
    /// The task stops once every handle has been dropped. Must be called from
    /// within a tokio runtime.
    pub fn spawn(repo: Arc<R>, ports: ViewPorts, config: ListViewConfig) -> ListViewHandle {
        let (commands_tx, commands) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let (published, state_rx) = watch::channel(ListViewState::default());

        let controller = Self {
            repo,
            ports,
            state: ListViewState::default(),
            debounce: Debouncer::new(config.search_debounce),
            latest_request: 0,
            commands,
            completions_tx,
            completions,
            published,
        };
        tokio::spawn(controller.run());

        ListViewHandle::new(commands_tx, state_rx)
    }

    async fn run(mut self) {
        log::debug!("List view controller started");
        loop {
            let deadline = self.debounce.deadline();
            tokio::select! {
                envelope = self.commands.recv() => {
                    let Some((command, reply)) = envelope else {
                        break;
                    };
                    let result = self.handle(command);
                    self.publish();
                    let _ = reply.send(result);
                }
                Some(completion) = self.completions.recv() => {
                    self.complete(completion);
                    self.publish();
                }
                () = debounce::wait_for(deadline) => {
                    self.debounce.fire();
                    self.on_search_debounced();
                    self.publish();
                }
            }
        }
        log::debug!("List view controller stopped");
    }

    fn publish(&self) {
        self.published.send_if_modified(|current| {
            if *current == self.state {
                false
            } else {
                current.clone_from(&self.state);
                true
            }
        });
    }

    fn handle(&mut self, command: Command) -> ControllerResult<()> {
        match command {
            Command::Initialize => self.initialize(),
            Command::SetSearchText(text) => self.set_search_text(text),
            Command::SubmitSearch => return self.submit_search(),
            Command::ClearSearch => self.clear_search(),
            Command::GoToPage(page) => self.go_to_page(page),
            Command::SetPerPage(per_page) => self.set_per_page(per_page),
            Command::Retry => self.fetch_page(self.state.latest_query().clone()),
            Command::RequestDelete {
                client_id,
                client_name,
            } => self.request_delete(client_id, client_name),
            Command::CancelDelete => self.cancel_delete(),
            Command::ConfirmDelete => self.confirm_delete(),
        }
        Ok(())
    }

    fn initialize(&mut self) {
        let raw = self.ports.url.current();
        let query = ListUrlParams::parse(&raw).to_query();
        log::info!(
            "Loading clients list (search: {:?}, page: {}, per page: {})",
            query.search,
            query.page,
            query.per_page
        );
        self.debounce.cancel();
        self.state.search_input = query.search.clone();
        self.fetch_page(query);
    }

    fn set_search_text(&mut self, text: String) {
        self.state.search_input = text;
        self.debounce.rearm();
    }

    fn on_search_debounced(&mut self) {
        let term = self.state.search_input.trim().to_string();
        if term.is_empty() {
            log::debug!("Search input emptied; waiting for an explicit clear");
            return;
        }
        self.commit_search(term);
    }

    fn submit_search(&mut self) -> ControllerResult<()> {
        if self.debounce.cancel() {
            log::debug!("Explicit search submit superseded the pending debounce");
        }

        let term = self.state.search_input.trim().to_string();
        if term.is_empty() {
            self.ports
                .notifier
                .notify(EMPTY_SEARCH_MESSAGE, NotificationKind::Error);
            self.ports.search_field.focus();
            return Err(ControllerError::EmptySearch);
        }

        self.commit_search(term);
        Ok(())
    }

    fn commit_search(&mut self, term: String) {
        let query = ClientListQuery::new()
            .search(term)
            .paginate(1, self.state.latest_query().per_page);
        self.fetch_page(query);
    }

    fn clear_search(&mut self) {
        self.debounce.cancel();
        self.state.search_input.clear();
        let query = ClientListQuery::new().paginate(1, self.state.latest_query().per_page);
        self.fetch_page(query);
    }

    fn go_to_page(&mut self, requested: usize) {
        let Some(page) = &self.state.page else {
            log::debug!("Ignoring page change to {requested} before the first load");
            return;
        };

        let target = page.clamp_page(requested);
        if target == self.state.current_page() && self.state.requested.is_none() {
            return;
        }

        let mut query = self.state.latest_query().clone();
        query.page = target;
        self.fetch_page(query);
    }

    fn set_per_page(&mut self, per_page: PerPage) {
        // Built from the argument, never from state updated later.
        let query = ClientListQuery::new()
            .search(self.state.latest_query().search.clone())
            .paginate(1, per_page);
        self.fetch_page(query);
    }

    fn fetch_page(&mut self, query: ClientListQuery) {
        self.latest_request += 1;
        let request = self.latest_request;

        self.state.requested = Some(query.clone());
        self.state.phase = LoadPhase::Loading;
        self.state.error = None;

        log::debug!("Fetching clients #{request}: {query:?}");
        let repo = Arc::clone(&self.repo);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = repo.list_clients(&query).await;
            let _ = completions.send(Completion::Fetched {
                request,
                query,
                result,
            });
        });
    }

    fn request_delete(&mut self, client_id: ClientId, client_name: String) {
        if let Some(deleting) = self.state.deleting {
            log::warn!("Ignoring delete request for {client_id}: {deleting} is being deleted");
            return;
        }

        let prompt = ConfirmationPrompt {
            title: DELETE_DIALOG_TITLE.to_string(),
            message: format!(
                "¿Está seguro de eliminar a {client_name}? Esta acción no se puede deshacer."
            ),
        };
        self.state.pending_deletion = Some(PendingDeletion {
            client_id,
            client_name,
        });
        self.ports.dialog.open(prompt);
    }

    fn cancel_delete(&mut self) {
        if self.state.deleting.is_some() {
            return;
        }
        if self.state.pending_deletion.take().is_some() {
            self.ports.dialog.close();
        }
    }

    fn confirm_delete(&mut self) {
        if self.state.deleting.is_some() {
            return;
        }
        let Some(pending) = &self.state.pending_deletion else {
            return;
        };

        let client_id = pending.client_id;
        self.state.deleting = Some(client_id);
        self.ports.dialog.set_loading(true);

        log::info!("Deleting client {client_id}");
        let repo = Arc::clone(&self.repo);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = repo.delete_client(client_id).await;
            let _ = completions.send(Completion::Deleted { client_id, result });
        });
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Fetched {
                request,
                query,
                result,
            } => self.on_fetched(request, query, result),
            Completion::Deleted { client_id, result } => self.on_deleted(client_id, result),
        }
    }

    fn on_fetched(
        &mut self,
        request: u64,
        mut query: ClientListQuery,
        result: RepositoryResult<ClientPage>,
    ) {
        if request != self.latest_request {
            log::debug!(
                "Discarding stale clients response #{request} (latest #{})",
                self.latest_request
            );
            return;
        }

        match result {
            Ok(page) => {
                if page.current_page != query.page {
                    log::info!(
                        "Server moved page {} to {} (last page {})",
                        query.page,
                        page.current_page,
                        page.last_page
                    );
                    query.page = page.current_page;
                }
                self.state.query = query;
                self.state.requested = None;
                self.state.page = Some(page);
                self.state.phase = LoadPhase::Loaded;
                self.state.error = None;

                let url = ListUrlParams::from_query(&self.state.query).to_query_string();
                self.ports.url.replace(&url);
            }
            Err(err) => {
                log::error!("Failed to list clients: {err}");
                self.state.phase = LoadPhase::Failed;
                self.state.error = Some(err.user_message().to_string());
            }
        }
    }

    fn on_deleted(&mut self, client_id: ClientId, result: RepositoryResult<()>) {
        if self.state.deleting == Some(client_id) {
            self.state.deleting = None;
        }
        self.ports.dialog.set_loading(false);

        match result {
            Ok(()) => {
                log::info!("Deleted client {client_id}");
                self.ports.dialog.close();
                self.state.pending_deletion = None;
                if let Some(page) = self.state.page.as_mut() {
                    let before = page.items.len();
                    page.items.retain(|client| client.id != client_id);
                    if page.items.len() < before {
                        page.total = page.total.saturating_sub(1);
                    }
                }
                self.ports
                    .notifier
                    .notify(DELETE_SUCCESS_MESSAGE, NotificationKind::Success);
                self.fetch_page(self.state.latest_query().clone());
            }
            Err(err) => {
                // The dialog stays open so the user can retry or cancel.
                log::error!("Failed to delete client {client_id}: {err}");
                self.ports
                    .notifier
                    .notify(DELETE_ERROR_MESSAGE, NotificationKind::Error);
            }
        }
    }
}
