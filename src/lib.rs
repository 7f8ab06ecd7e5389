//! Customer ("cliente") management client.
//!
//! The [`controller`] module holds the list page state machine; [`services`]
//! back the create and edit pages; [`repository`] talks to the REST API.

#[cfg(feature = "cli")]
pub mod cli;
pub mod controller;
pub mod domain;
pub mod dto;
mod error_conversions;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod services;

#[cfg(feature = "cli")]
pub use cli::run;
