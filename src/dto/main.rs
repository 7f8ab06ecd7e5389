//! Query string representation of the customer list page.

use serde::{Deserialize, Serialize};

use crate::domain::client::ClientListQuery;
use crate::domain::types::PerPage;

/// Raw `search`, `page` and `per_page` parameters as they appear in the URL.
///
/// Values are kept as strings so that a malformed parameter degrades to its
/// default instead of discarding the whole query string.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUrlParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<String>,
}

impl ListUrlParams {
    /// Parses a query string with or without the leading `?`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().trim_start_matches('?');
        match serde_html_form::from_str::<ListUrlParams>(raw) {
            Ok(params) => params,
            Err(err) => {
                log::warn!("Ignoring malformed list query string {raw:?}: {err}");
                Self::default()
            }
        }
    }

    /// Resolves the parameters into a list query, falling back to defaults.
    pub fn to_query(&self) -> ClientListQuery {
        let search = self.search.as_deref().unwrap_or_default();
        let page = self
            .page
            .as_deref()
            .and_then(|page| page.trim().parse::<usize>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1);
        let per_page = self
            .per_page
            .as_deref()
            .and_then(|per_page| per_page.parse::<PerPage>().ok())
            .unwrap_or_default();

        ClientListQuery::new()
            .search(search)
            .paginate(page, per_page)
    }

    /// Builds the parameters for a query, omitting default values.
    pub fn from_query(query: &ClientListQuery) -> Self {
        Self {
            search: Some(query.search.clone()).filter(|search| !search.is_empty()),
            page: Some(query.page)
                .filter(|page| *page > 1)
                .map(|page| page.to_string()),
            per_page: Some(query.per_page)
                .filter(|per_page| *per_page != PerPage::default())
                .map(|per_page| per_page.to_string()),
        }
    }

    /// Encodes the parameters as a query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        serde_html_form::to_string(self).unwrap_or_else(|err| {
            log::error!("Failed to encode list query string: {err}");
            String::new()
        })
    }
}
