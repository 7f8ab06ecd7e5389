//! Wire shapes of the `/api/clientes` REST endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::client::{Client, ClientPage, NewClient, UpdateClient};
use crate::domain::types::{ClientId, TypeConstraintError};

/// Customer as serialized by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientPayload {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    #[serde(default)]
    pub telefono: Option<String>,
}

impl TryFrom<ClientPayload> for Client {
    type Error = TypeConstraintError;

    fn try_from(payload: ClientPayload) -> Result<Self, Self::Error> {
        Ok(Client {
            id: ClientId::new(payload.id)?,
            name: payload.nombre,
            email: payload.email,
            phone: payload.telefono.filter(|phone| !phone.trim().is_empty()),
        })
    }
}

/// Pagination block attached to paginated list responses.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ApiPagination {
    pub current_page: usize,
    pub last_page: usize,
    pub total: usize,
}

/// Envelope returned by `GET /clientes`.
#[derive(Debug, Deserialize)]
pub struct ApiListResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<ClientPayload>,
    #[serde(default)]
    pub pagination: Option<ApiPagination>,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

impl ApiListResponse {
    /// Converts the envelope into a domain page.
    ///
    /// Unpaginated responses are treated as a single page holding everything.
    pub fn into_page(self) -> Result<ClientPage, TypeConstraintError> {
        let items = self
            .data
            .into_iter()
            .map(Client::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let page = match self.pagination {
            Some(pagination) => ClientPage {
                items,
                current_page: pagination.current_page.max(1),
                last_page: pagination.last_page.max(1),
                total: pagination.total,
            },
            None => ClientPage {
                total: items.len(),
                items,
                current_page: 1,
                last_page: 1,
            },
        };
        Ok(page)
    }
}

/// Envelope returned by single-customer endpoints.
#[derive(Debug, Deserialize)]
pub struct ApiItemResponse {
    pub data: ClientPayload,
}

/// Response of `GET /clientes/check-email/{email}`.
#[derive(Debug, Deserialize)]
pub struct EmailCheckResponse {
    pub exists: bool,
}

/// Body for create and update requests.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ClientRequest<'a> {
    pub nombre: &'a str,
    pub email: &'a str,
    pub telefono: Option<&'a str>,
}

impl<'a> From<&'a NewClient> for ClientRequest<'a> {
    fn from(client: &'a NewClient) -> Self {
        Self {
            nombre: client.name.as_str(),
            email: client.email.as_str(),
            telefono: client.phone.as_ref().map(|phone| phone.as_str()),
        }
    }
}

impl<'a> From<&'a UpdateClient> for ClientRequest<'a> {
    fn from(client: &'a UpdateClient) -> Self {
        Self {
            nombre: client.name.as_str(),
            email: client.email.as_str(),
            telefono: client.phone.as_ref().map(|phone| phone.as_str()),
        }
    }
}
