//! Application-level models shared across the front-ends.

pub mod config;
