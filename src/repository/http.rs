//! REST implementation of the customer repository.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Response, StatusCode, Url};
use serde_json::Value;

use crate::domain::client::{Client, ClientListQuery, ClientPage, NewClient, UpdateClient};
use crate::domain::types::{ClientEmail, ClientId};
use crate::domain::{FieldErrors, GLOBAL_ERROR_KEY};
use crate::dto::api::{ApiItemResponse, ApiListResponse, ClientRequest, EmailCheckResponse};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ClientReader, ClientWriter};

const CLIENTS_ENDPOINT: &str = "/clientes";
const CHECK_EMAIL_ENDPOINT: &str = "/clientes/check-email";

/// Customer repository talking JSON to the `/api/clientes` backend.
#[derive(Clone)]
pub struct HttpRepository {
    http: HttpClient,
    base_url: String,
}

impl HttpRepository {
    /// Builds a repository for `base_url` (for example `http://127.0.0.1:8000/api`).
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> RepositoryResult<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| RepositoryError::Unexpected(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn clients_url(&self) -> String {
        format!("{}{CLIENTS_ENDPOINT}", self.base_url)
    }

    fn client_url(&self, id: ClientId) -> String {
        format!("{}{CLIENTS_ENDPOINT}/{id}", self.base_url)
    }

    /// The email is pushed as one percent-encoded path segment.
    fn check_email_url(&self, email: &ClientEmail) -> RepositoryResult<Url> {
        let mut url = Url::parse(&format!("{}{CHECK_EMAIL_ENDPOINT}", self.base_url))
            .map_err(|e| RepositoryError::Unexpected(format!("Invalid API base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| RepositoryError::Unexpected("API base URL cannot have a path".into()))?
            .push(email.as_str());
        Ok(url)
    }
}

/// Normalizes a backend error body into a field to message map.
///
/// Understands `{ "errors": { "field": ["msg"] } }`, top-level
/// `{ "field": ["msg"] }` and a bare `{ "message": "..." }`.
pub fn normalize_api_errors(body: &Value) -> Option<FieldErrors> {
    let object = body.as_object()?;

    if let Some(errors) = object.get("errors").and_then(Value::as_object) {
        let out = errors
            .iter()
            .map(|(field, value)| (field.clone(), first_message(value)))
            .collect();
        return Some(out);
    }

    let out: FieldErrors = object
        .iter()
        .filter_map(|(field, value)| {
            let first = value.as_array()?.first()?;
            Some((field.clone(), value_to_string(first)))
        })
        .collect();
    if !out.is_empty() {
        return Some(out);
    }

    object
        .get("message")
        .and_then(Value::as_str)
        .map(|message| FieldErrors::from([(GLOBAL_ERROR_KEY.to_string(), message.to_string())]))
}

fn first_message(value: &Value) -> String {
    match value {
        Value::Array(messages) => messages.first().map(value_to_string).unwrap_or_default(),
        other => value_to_string(other),
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Maps non-success responses to repository errors, passing successes through.
async fn check_status(response: Response) -> RepositoryResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: Value = response.json().await.unwrap_or(Value::Null);
    log::debug!("Backend answered {status}: {body}");

    match status {
        StatusCode::NOT_FOUND => Err(RepositoryError::NotFound),
        StatusCode::UNPROCESSABLE_ENTITY => match normalize_api_errors(&body) {
            Some(errors) => Err(RepositoryError::Validation(errors)),
            None => Err(RepositoryError::Server {
                status: status.as_u16(),
                message: "validation failed".to_string(),
            }),
        },
        _ => Err(RepositoryError::Server {
            status: status.as_u16(),
            message: body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string()),
        }),
    }
}

fn list_params(query: &ClientListQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(4);
    if !query.search.is_empty() {
        params.push(("search", query.search.clone()));
    }
    params.push(("paginate", "true".to_string()));
    params.push(("per_page", query.per_page.to_string()));
    params.push(("page", query.page.to_string()));
    params
}

#[async_trait]
impl ClientReader for HttpRepository {
    async fn list_clients(&self, query: &ClientListQuery) -> RepositoryResult<ClientPage> {
        let response = self
            .http
            .get(self.clients_url())
            .query(&list_params(query))
            .send()
            .await?;
        let envelope: ApiListResponse = check_status(response).await?.json().await?;

        if !envelope.success {
            return Err(RepositoryError::Server {
                status: StatusCode::OK.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "Error al cargar clientes".to_string()),
            });
        }

        envelope
            .into_page()
            .map_err(RepositoryError::from)
    }

    async fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        let response = self.http.get(self.client_url(id)).send().await?;
        let response = match check_status(response).await {
            Ok(response) => response,
            Err(RepositoryError::NotFound) => return Ok(None),
            Err(err) => return Err(err),
        };
        let item: ApiItemResponse = response.json().await?;
        let client = Client::try_from(item.data)?;
        Ok(Some(client))
    }

    async fn email_exists(
        &self,
        email: &ClientEmail,
        exclude_id: Option<ClientId>,
    ) -> RepositoryResult<bool> {
        let mut request = self.http.get(self.check_email_url(email)?);
        if let Some(exclude_id) = exclude_id {
            request = request.query(&[("exclude_id", exclude_id.get())]);
        }
        let check: EmailCheckResponse = check_status(request.send().await?).await?.json().await?;
        Ok(check.exists)
    }
}

#[async_trait]
impl ClientWriter for HttpRepository {
    async fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        let response = self
            .http
            .post(self.clients_url())
            .json(&ClientRequest::from(new_client))
            .send()
            .await?;
        let item: ApiItemResponse = check_status(response).await?.json().await?;
        Client::try_from(item.data).map_err(RepositoryError::from)
    }

    async fn update_client(
        &self,
        client_id: ClientId,
        updates: &UpdateClient,
    ) -> RepositoryResult<Client> {
        let response = self
            .http
            .put(self.client_url(client_id))
            .json(&ClientRequest::from(updates))
            .send()
            .await?;
        let item: ApiItemResponse = check_status(response).await?.json().await?;
        Client::try_from(item.data).map_err(RepositoryError::from)
    }

    async fn delete_client(&self, client_id: ClientId) -> RepositoryResult<()> {
        let response = self.http.delete(self.client_url(client_id)).send().await?;
        check_status(response).await?;
        Ok(())
    }
}
