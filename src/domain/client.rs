use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientEmail, ClientId, ClientName, PerPage, PhoneNumber};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Payload for registering a new customer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewClient {
    pub name: ClientName,
    pub email: ClientEmail,
    pub phone: Option<PhoneNumber>,
}

impl NewClient {
    #[must_use]
    pub fn new(name: ClientName, email: ClientEmail, phone: Option<PhoneNumber>) -> Self {
        Self { name, email, phone }
    }
}

/// Replacement values for an existing customer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateClient {
    pub name: ClientName,
    pub email: ClientEmail,
    pub phone: Option<PhoneNumber>,
}

impl UpdateClient {
    #[must_use]
    pub fn new(name: ClientName, email: ClientEmail, phone: Option<PhoneNumber>) -> Self {
        Self { name, email, phone }
    }
}

/// Search term and pagination window driving a list fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientListQuery {
    pub search: String,
    pub page: usize,
    pub per_page: PerPage,
}

impl Default for ClientListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            per_page: PerPage::default(),
        }
    }
}

impl ClientListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search term, keeping it trimmed.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into().trim().to_string();
        self
    }

    /// Sets the requested page, treating `0` as the first page.
    pub fn paginate(mut self, page: usize, per_page: PerPage) -> Self {
        self.page = page.max(1);
        self.per_page = per_page;
        self
    }
}

/// One server-returned page of customers plus pagination metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientPage {
    pub items: Vec<Client>,
    pub current_page: usize,
    pub last_page: usize,
    pub total: usize,
}

impl ClientPage {
    /// Last page number, never below `1` even for an empty result.
    pub fn last_page(&self) -> usize {
        self.last_page.max(1)
    }

    /// Clamps a requested page number into the known page range.
    pub fn clamp_page(&self, page: usize) -> usize {
        page.clamp(1, self.last_page())
    }
}
