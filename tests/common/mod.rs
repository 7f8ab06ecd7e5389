#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use clientes_admin::controller::{
    ConfirmationDialog, ConfirmationPrompt, ListViewConfig, ListViewController, ListViewHandle,
    NotificationKind, Notifier, SearchField, UrlStateStore, ViewPorts,
};
use clientes_admin::domain::client::{Client, ClientListQuery, ClientPage, NewClient, UpdateClient};
use clientes_admin::domain::types::{ClientEmail, ClientId};
use clientes_admin::repository::errors::{RepositoryError, RepositoryResult};
use clientes_admin::repository::{ClientReader, ClientWriter};

pub fn client(id: i64, name: &str, email: &str) -> Client {
    Client {
        id: ClientId::new(id).unwrap(),
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
    }
}

/// `count` customers named "Cliente 01", "Cliente 02", ...
pub fn numbered_clients(count: i64) -> Vec<Client> {
    (1..=count)
        .map(|i| {
            client(
                i,
                &format!("Cliente {i:02}"),
                &format!("cliente{i:02}@example.com"),
            )
        })
        .collect()
}

#[derive(Default)]
struct Inner {
    clients: Vec<Client>,
    list_calls: Vec<ClientListQuery>,
    delete_calls: Vec<ClientId>,
    list_failures: VecDeque<RepositoryError>,
    list_delays: VecDeque<Duration>,
    delete_failures: VecDeque<RepositoryError>,
    delete_delay: Option<Duration>,
}

/// In-memory backend that paginates like the real API and records every call.
///
/// Out-of-range pages are clamped to the last page, the way the server does.
#[derive(Default)]
pub struct FakeRepository {
    inner: Mutex<Inner>,
}

impl FakeRepository {
    pub fn new(clients: Vec<Client>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                clients,
                ..Inner::default()
            }),
        }
    }

    pub fn fail_next_list(&self, err: RepositoryError) {
        self.inner.lock().unwrap().list_failures.push_back(err);
    }

    /// Delays the response of the next list call that has no delay yet.
    pub fn delay_next_list(&self, delay: Duration) {
        self.inner.lock().unwrap().list_delays.push_back(delay);
    }

    pub fn fail_next_delete(&self, err: RepositoryError) {
        self.inner.lock().unwrap().delete_failures.push_back(err);
    }

    pub fn delay_deletes(&self, delay: Duration) {
        self.inner.lock().unwrap().delete_delay = Some(delay);
    }

    pub fn list_calls(&self) -> Vec<ClientListQuery> {
        self.inner.lock().unwrap().list_calls.clone()
    }

    pub fn delete_calls(&self) -> Vec<ClientId> {
        self.inner.lock().unwrap().delete_calls.clone()
    }

    fn page_for(clients: &[Client], query: &ClientListQuery) -> ClientPage {
        let needle = query.search.to_lowercase();
        let matching: Vec<&Client> = clients
            .iter()
            .filter(|c| {
                needle.is_empty()
                    || c.name.to_lowercase().contains(&needle)
                    || c.email.to_lowercase().contains(&needle)
            })
            .collect();

        let per_page = query.per_page.get();
        let total = matching.len();
        let last_page = total.div_ceil(per_page).max(1);
        let current_page = query.page.clamp(1, last_page);
        let items = matching
            .into_iter()
            .skip((current_page - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();

        ClientPage {
            items,
            current_page,
            last_page,
            total,
        }
    }
}

#[async_trait]
impl ClientReader for FakeRepository {
    async fn list_clients(&self, query: &ClientListQuery) -> RepositoryResult<ClientPage> {
        let (result, delay) = {
            let mut inner = self.inner.lock().unwrap();
            inner.list_calls.push(query.clone());
            let delay = inner.list_delays.pop_front();
            let result = match inner.list_failures.pop_front() {
                Some(err) => Err(err),
                None => Ok(Self::page_for(&inner.clients, query)),
            };
            (result, delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.clients.iter().find(|c| c.id == id).cloned())
    }

    async fn email_exists(
        &self,
        email: &ClientEmail,
        exclude_id: Option<ClientId>,
    ) -> RepositoryResult<bool> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .clients
            .iter()
            .any(|c| c.email == email.as_str() && Some(c.id) != exclude_id))
    }
}

#[async_trait]
impl ClientWriter for FakeRepository {
    async fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        let mut inner = self.inner.lock().unwrap();
        let next_id = inner.clients.iter().map(|c| c.id.get()).max().unwrap_or(0) + 1;
        let created = Client {
            id: ClientId::new(next_id).unwrap(),
            name: new_client.name.as_str().to_string(),
            email: new_client.email.as_str().to_string(),
            phone: new_client.phone.as_ref().map(|p| p.as_str().to_string()),
        };
        inner.clients.push(created.clone());
        Ok(created)
    }

    async fn update_client(
        &self,
        client_id: ClientId,
        updates: &UpdateClient,
    ) -> RepositoryResult<Client> {
        let mut inner = self.inner.lock().unwrap();
        let existing = inner
            .clients
            .iter_mut()
            .find(|c| c.id == client_id)
            .ok_or(RepositoryError::NotFound)?;
        existing.name = updates.name.as_str().to_string();
        existing.email = updates.email.as_str().to_string();
        existing.phone = updates.phone.as_ref().map(|p| p.as_str().to_string());
        Ok(existing.clone())
    }

    async fn delete_client(&self, client_id: ClientId) -> RepositoryResult<()> {
        let (failure, delay) = {
            let mut inner = self.inner.lock().unwrap();
            inner.delete_calls.push(client_id);
            (inner.delete_failures.pop_front(), inner.delete_delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = failure {
            return Err(err);
        }
        self.inner
            .lock()
            .unwrap()
            .clients
            .retain(|c| c.id != client_id);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier(Arc<Mutex<Vec<(String, NotificationKind)>>>);

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, NotificationKind)> {
        self.0.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str, kind: NotificationKind) {
        self.0.lock().unwrap().push((message.to_string(), kind));
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogEvent {
    Opened(ConfirmationPrompt),
    Loading(bool),
    Closed,
}

#[derive(Clone, Default)]
pub struct RecordingDialog(Arc<Mutex<Vec<DialogEvent>>>);

impl RecordingDialog {
    pub fn events(&self) -> Vec<DialogEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl ConfirmationDialog for RecordingDialog {
    fn open(&mut self, prompt: ConfirmationPrompt) {
        self.0.lock().unwrap().push(DialogEvent::Opened(prompt));
    }

    fn set_loading(&mut self, loading: bool) {
        self.0.lock().unwrap().push(DialogEvent::Loading(loading));
    }

    fn close(&mut self) {
        self.0.lock().unwrap().push(DialogEvent::Closed);
    }
}

#[derive(Clone, Default)]
pub struct MemoryUrl {
    current: Arc<Mutex<String>>,
    replaced: Arc<Mutex<Vec<String>>>,
}

impl MemoryUrl {
    pub fn new(initial: &str) -> Self {
        let url = Self::default();
        *url.current.lock().unwrap() = initial.to_string();
        url
    }

    pub fn get(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    /// Every value passed to `replace`, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.replaced.lock().unwrap().clone()
    }
}

impl UrlStateStore for MemoryUrl {
    fn current(&self) -> String {
        self.get()
    }

    fn replace(&mut self, query: &str) {
        *self.current.lock().unwrap() = query.to_string();
        self.replaced.lock().unwrap().push(query.to_string());
    }
}

#[derive(Clone, Default)]
pub struct FocusCounter(Arc<AtomicUsize>);

impl FocusCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl SearchField for FocusCounter {
    fn focus(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// A running controller wired to a fake backend and recording ports.
pub struct Harness {
    pub handle: ListViewHandle,
    pub repo: Arc<FakeRepository>,
    pub notifier: RecordingNotifier,
    pub dialog: RecordingDialog,
    pub url: MemoryUrl,
    pub focus: FocusCounter,
}

impl Harness {
    pub fn start(repo: FakeRepository, initial_url: &str) -> Self {
        let repo = Arc::new(repo);
        let notifier = RecordingNotifier::default();
        let dialog = RecordingDialog::default();
        let url = MemoryUrl::new(initial_url);
        let focus = FocusCounter::default();

        let ports = ViewPorts {
            notifier: Box::new(notifier.clone()),
            dialog: Box::new(dialog.clone()),
            url: Box::new(url.clone()),
            search_field: Box::new(focus.clone()),
        };
        let handle = ListViewController::spawn(repo.clone(), ports, ListViewConfig::default());

        Self {
            handle,
            repo,
            notifier,
            dialog,
            url,
            focus,
        }
    }

    /// Starts the controller, runs the initial load and waits for it.
    pub async fn loaded(repo: FakeRepository, initial_url: &str) -> Self {
        let harness = Self::start(repo, initial_url);
        harness.handle.initialize().await.unwrap();
        harness.handle.settled().await.unwrap();
        harness
    }
}
