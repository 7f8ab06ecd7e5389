use async_trait::async_trait;

use crate::{
    domain::{
        client::{Client, ClientListQuery, ClientPage, NewClient, UpdateClient},
        types::{ClientEmail, ClientId},
    },
    repository::errors::RepositoryResult,
};

pub mod errors;
#[cfg(feature = "http")]
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

#[cfg(feature = "http")]
pub use http::HttpRepository;

/// Read side of the customer backend.
#[async_trait]
pub trait ClientReader: Send + Sync {
    /// Returns one page of customers matching the query.
    async fn list_clients(&self, query: &ClientListQuery) -> RepositoryResult<ClientPage>;
    async fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
    /// Checks whether another customer already uses `email`.
    async fn email_exists(
        &self,
        email: &ClientEmail,
        exclude_id: Option<ClientId>,
    ) -> RepositoryResult<bool>;
}

/// Write side of the customer backend.
#[async_trait]
pub trait ClientWriter: Send + Sync {
    async fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    async fn update_client(
        &self,
        client_id: ClientId,
        updates: &UpdateClient,
    ) -> RepositoryResult<Client>;
    async fn delete_client(&self, client_id: ClientId) -> RepositoryResult<()>;
}
