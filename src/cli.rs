//! Terminal front-end: stdin commands in, rendered list page out.

use std::io;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::controller::{
    ConfirmationDialog, ConfirmationPrompt, ControllerError, ListViewController, ListViewHandle,
    ListViewState, NotificationKind, Notifier, SearchField, UrlStateStore, ViewPorts,
};
use crate::domain::GLOBAL_ERROR_KEY;
use crate::domain::types::{ClientId, PerPage};
use crate::forms::client::ClientForm;
use crate::models::config::AppConfig;
use crate::pagination::render_links;
use crate::repository::{ClientReader, ClientWriter, HttpRepository};
use crate::services::ServiceError;
use crate::services::client::{create_client, email_available, load_client, update_client};

const HELP: &str = "\
Comandos:
  type <texto>      escribir en el buscador (búsqueda diferida)
  search [texto]    buscar ahora
  clear             limpiar la búsqueda
  page <n> | next | prev
  per-page <10|25|50>
  new <nombre>;<email>[;<teléfono>]
  edit <id> <nombre>;<email>[;<teléfono>]
  view <id>         ver un cliente
  check-email <email>
  delete <id>       pedir confirmación para eliminar
  confirm | cancel  responder al diálogo
  retry             reintentar la carga
  show | help | quit";

const FIELDS_FORMAT: &str = "Formato: <nombre>;<email>[;<teléfono>]";
const CLIENT_CREATED_MESSAGE: &str = "Cliente creado correctamente";
const CLIENT_UPDATED_MESSAGE: &str = "Cliente actualizado correctamente";

/// A parsed terminal command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Type(String),
    Search(Option<String>),
    Clear,
    Page(usize),
    Next,
    Prev,
    PerPage(PerPage),
    Create(ClientForm),
    Edit(ClientId, ClientForm),
    View(ClientId),
    CheckEmail(String),
    Delete(ClientId),
    Confirm,
    Cancel,
    Retry,
    Show,
    Help,
    Quit,
}

fn parse_id(raw: &str) -> Result<ClientId, String> {
    raw.parse()
        .map_err(|_| format!("Id de cliente inválido: {raw:?}"))
}

/// Splits `nombre;email[;teléfono]` into a form; validation happens later.
fn parse_fields(raw: &str) -> Result<ClientForm, String> {
    let parts: Vec<&str> = raw.split(';').collect();
    match parts.as_slice() {
        [name, email] => Ok(ClientForm::new(*name, *email, None::<String>)),
        [name, email, phone] => Ok(ClientForm::new(*name, *email, Some(*phone))),
        _ => Err(FIELDS_FORMAT.to_string()),
    }
}

/// Parses one input line.
pub fn parse_command(line: &str) -> Result<CliCommand, String> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(word, rest)| (word, rest.trim()))
        .unwrap_or((line, ""));

    let command = match word.to_lowercase().as_str() {
        "type" => CliCommand::Type(rest.to_string()),
        "search" | "s" if rest.is_empty() => CliCommand::Search(None),
        "search" | "s" => CliCommand::Search(Some(rest.to_string())),
        "clear" => CliCommand::Clear,
        "page" | "p" => CliCommand::Page(
            rest.parse()
                .map_err(|_| format!("Número de página inválido: {rest:?}"))?,
        ),
        "next" | "n" => CliCommand::Next,
        "prev" => CliCommand::Prev,
        "per-page" => CliCommand::PerPage(
            rest.parse()
                .map_err(|_| format!("Cantidad por página inválida: {rest:?}"))?,
        ),
        "new" => CliCommand::Create(parse_fields(rest)?),
        "edit" => {
            let (id, fields) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "Uso: edit <id> <nombre>;<email>[;<teléfono>]".to_string())?;
            CliCommand::Edit(parse_id(id)?, parse_fields(fields.trim())?)
        }
        "view" => CliCommand::View(parse_id(rest)?),
        "check-email" if rest.is_empty() => return Err("Uso: check-email <email>".to_string()),
        "check-email" => CliCommand::CheckEmail(rest.to_string()),
        "delete" | "d" => CliCommand::Delete(parse_id(rest)?),
        "confirm" | "y" => CliCommand::Confirm,
        "cancel" => CliCommand::Cancel,
        "retry" => CliCommand::Retry,
        "show" | "" => CliCommand::Show,
        "help" | "?" => CliCommand::Help,
        "quit" | "q" | "exit" => CliCommand::Quit,
        other => return Err(format!("Comando desconocido: {other}")),
    };
    Ok(command)
}

struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&mut self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Success => println!("✔ {message}"),
            NotificationKind::Error => println!("✖ {message}"),
        }
    }
}

struct TerminalDialog;

impl ConfirmationDialog for TerminalDialog {
    fn open(&mut self, prompt: ConfirmationPrompt) {
        println!("{}: {} (confirm / cancel)", prompt.title, prompt.message);
    }

    fn set_loading(&mut self, loading: bool) {
        if loading {
            println!("Eliminando...");
        }
    }

    fn close(&mut self) {}
}

/// In-memory stand-in for the browser location, shared with the renderer.
#[derive(Clone, Default)]
struct SharedUrl(Arc<Mutex<String>>);

impl SharedUrl {
    fn get(&self) -> String {
        self.0.lock().map(|url| url.clone()).unwrap_or_default()
    }
}

impl UrlStateStore for SharedUrl {
    fn current(&self) -> String {
        self.get()
    }

    fn replace(&mut self, query: &str) {
        log::debug!("Replacing list URL query with {query:?}");
        if let Ok(mut url) = self.0.lock() {
            *url = query.to_string();
        }
    }
}

struct TerminalSearchField;

impl SearchField for TerminalSearchField {
    fn focus(&mut self) {
        println!("(escriba un término con `type <texto>` o `search <texto>`)");
    }
}

fn render(state: &ListViewState, url: &SharedUrl) {
    println!();
    println!("Gestión de Clientes  /?{}", url.get());
    if !state.search_input.is_empty() {
        println!("Buscar: {}", state.search_input);
    }
    if let Some(error) = &state.error {
        println!("⚠ {error} (escriba `retry` para reintentar)");
    }

    let Some(page) = &state.page else {
        return;
    };
    if page.items.is_empty() {
        println!("No se encontraron clientes.");
        return;
    }

    println!("{:>6}  {:<30} {:<32} {:<16}", "Id", "Nombre", "Email", "Teléfono");
    for client in &page.items {
        let marker = if state.is_deleting(client.id) {
            "  (eliminando...)"
        } else {
            ""
        };
        println!(
            "{:>6}  {:<30} {:<32} {:<16}{marker}",
            client.id,
            client.name,
            client.email,
            client.phone.as_deref().unwrap_or("-"),
        );
    }
    if page.last_page() > 1 {
        println!(
            "Página {} de {}  |  Total: {} clientes  |  {}",
            state.current_page(),
            page.last_page(),
            page.total,
            render_links(state.current_page(), page.last_page())
        );
    }
}

/// Whether a settled state shows something the last rendered one did not.
///
/// Keystrokes in the search buffer alone do not redraw the table.
fn needs_redraw(shown: &ListViewState, next: &ListViewState) -> bool {
    shown.query != next.query
        || shown.page != next.page
        || shown.phase != next.phase
        || shown.error != next.error
}

fn report_service_error(prefix: &str, err: &ServiceError) {
    match err {
        ServiceError::Form(errors) => {
            for (field, message) in errors {
                if field == GLOBAL_ERROR_KEY {
                    println!("✖ {message}");
                } else {
                    println!("  {field}: {message}");
                }
            }
        }
        ServiceError::NotFound => println!("✖ Cliente no encontrado"),
        other => println!("✖ {prefix}: {other}"),
    }
}

async fn dispatch<R>(
    handle: &ListViewHandle,
    repo: &R,
    command: CliCommand,
) -> Result<(), ControllerError>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    match command {
        CliCommand::Type(text) => handle.set_search_text(text).await?,
        CliCommand::Search(text) => {
            if let Some(text) = text {
                handle.set_search_text(text).await?;
            }
            handle.submit_search().await?;
        }
        CliCommand::Clear => handle.clear_search().await?,
        CliCommand::Page(page) => handle.go_to_page(page).await?,
        CliCommand::Next => {
            let page = handle.state().current_page() + 1;
            handle.go_to_page(page).await?;
        }
        CliCommand::Prev => {
            let page = handle.state().current_page().saturating_sub(1);
            handle.go_to_page(page).await?;
        }
        CliCommand::PerPage(per_page) => handle.set_per_page(per_page).await?,
        CliCommand::Create(form) => match create_client(repo, form).await {
            Ok(client) => {
                println!("✔ {CLIENT_CREATED_MESSAGE}: {} (#{})", client.name, client.id);
                handle.retry().await?;
            }
            Err(err) => report_service_error("Error al crear cliente", &err),
        },
        CliCommand::Edit(client_id, form) => match update_client(repo, client_id, form).await {
            Ok(client) => {
                println!("✔ {CLIENT_UPDATED_MESSAGE}: {} (#{})", client.name, client.id);
                handle.retry().await?;
            }
            Err(err) => report_service_error("Error al actualizar cliente", &err),
        },
        CliCommand::View(client_id) => match load_client(repo, client_id).await {
            Ok(client) => println!(
                "#{}  {}  <{}>  {}",
                client.id,
                client.name,
                client.email,
                client.phone.as_deref().unwrap_or("-")
            ),
            Err(err) => report_service_error("Error al cargar cliente", &err),
        },
        CliCommand::CheckEmail(email) => {
            if email_available(repo, &email, None).await {
                println!("{email} está disponible");
            } else {
                println!("✖ {email}: Este email ya está registrado");
            }
        }
        CliCommand::Delete(client_id) => {
            let state = handle.state();
            let name = state
                .page
                .as_ref()
                .and_then(|page| page.items.iter().find(|client| client.id == client_id))
                .map(|client| client.name.clone());
            match name {
                Some(name) => handle.request_delete(client_id, name).await?,
                None => println!("El cliente {client_id} no está en la página actual"),
            }
        }
        CliCommand::Confirm => handle.confirm_delete().await?,
        CliCommand::Cancel => handle.cancel_delete().await?,
        CliCommand::Retry => handle.retry().await?,
        CliCommand::Help => println!("{HELP}"),
        CliCommand::Show | CliCommand::Quit => {}
    }
    Ok(())
}

/// Runs the terminal front-end until `quit` or end of input.
///
/// The table is redrawn whenever the controller publishes a settled state
/// that differs from the one on screen, including debounced searches that
/// fire between commands.
pub async fn run(config: AppConfig) -> io::Result<()> {
    let repo = HttpRepository::new(&config.api_base_url, config.request_timeout())
        .map_err(|e| io::Error::other(format!("Failed to build API client: {e}")))?;
    let repo = Arc::new(repo);

    let url = SharedUrl::default();
    url.clone().replace(&config.initial_query);

    let ports = ViewPorts {
        notifier: Box::new(TerminalNotifier),
        dialog: Box::new(TerminalDialog),
        url: Box::new(url.clone()),
        search_field: Box::new(TerminalSearchField),
    };
    let handle = ListViewController::spawn(Arc::clone(&repo), ports, config.list_view());
    let mut updates = handle.subscribe();

    log::info!("Using clients API at {}", config.api_base_url);
    handle.initialize().await.map_err(io::Error::other)?;
    let mut shown = handle.settled().await.map_err(io::Error::other)?;
    render(&shown, &url);
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        println!("{message}");
                        continue;
                    }
                };
                match command {
                    CliCommand::Quit => break,
                    CliCommand::Show => {
                        shown = handle.state();
                        render(&shown, &url);
                    }
                    command => match dispatch(&handle, repo.as_ref(), command).await {
                        // Already reported through the notifier.
                        Ok(()) | Err(ControllerError::EmptySearch) => {}
                        Err(err @ ControllerError::Closed) => return Err(io::Error::other(err)),
                    },
                }
            }
            changed = updates.changed() => {
                changed.map_err(|_| io::Error::other(ControllerError::Closed))?;
                let state = updates.borrow_and_update().clone();
                if state.is_settled() && needs_redraw(&shown, &state) {
                    render(&state, &url);
                    shown = state;
                }
            }
        }
    }

    Ok(())
}
