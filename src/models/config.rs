//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

use crate::controller::ListViewConfig;

fn default_search_debounce_ms() -> u64 {
    500
}

#[derive(Clone, Debug, Deserialize)]
/// Settings for the terminal front-end.
pub struct AppConfig {
    /// Base URL of the REST API, e.g. `http://127.0.0.1:8000/api`.
    pub api_base_url: String,
    /// Quiet period before a typed search is sent.
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Optional per-request timeout; requests wait indefinitely when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Initial list query string, as if taken from the page URL.
    #[serde(default)]
    pub initial_query: String,
}

impl AppConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn list_view(&self) -> ListViewConfig {
        ListViewConfig {
            search_debounce: Duration::from_millis(self.search_debounce_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn optional_settings_have_defaults() {
        let config: AppConfig =
            serde_json::from_value(json!({"api_base_url": "http://localhost/api"})).unwrap();
        assert_eq!(config.search_debounce_ms, 500);
        assert!(config.request_timeout().is_none());
        assert_eq!(
            config.list_view().search_debounce,
            Duration::from_millis(500)
        );
    }
}
