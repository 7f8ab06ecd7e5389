//! Data transfer objects for the REST API and the list page URL.

pub mod api;
pub mod main;
