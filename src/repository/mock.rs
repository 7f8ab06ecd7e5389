//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::client::{Client, ClientListQuery, ClientPage, NewClient, UpdateClient};
use crate::domain::types::{ClientEmail, ClientId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ClientReader, ClientWriter};

mock! {
    pub Repository {}

    #[async_trait]
    impl ClientReader for Repository {
        async fn list_clients(&self, query: &ClientListQuery) -> RepositoryResult<ClientPage>;
        async fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
        async fn email_exists(
            &self,
            email: &ClientEmail,
            exclude_id: Option<ClientId>,
        ) -> RepositoryResult<bool>;
    }

    #[async_trait]
    impl ClientWriter for Repository {
        async fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
        async fn update_client(
            &self,
            client_id: ClientId,
            updates: &UpdateClient,
        ) -> RepositoryResult<Client>;
        async fn delete_client(&self, client_id: ClientId) -> RepositoryResult<()>;
    }
}
