//! Admin panel configuration.

/// Admin panel configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Public base path of uploaded files, used by file view widgets
    pub storage_base_url: String,
    /// Base path of the UI icon images
    pub image_base_url: String,
    /// Default grid page size when a request omits `rows`
    pub default_page_size: usize,
    /// Language used when a request does not name one
    pub default_language: String,
    /// Refuse requests that carry no authenticated user
    pub require_auth: bool,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Response timeout in milliseconds
    pub response_timeout_ms: u64,
    /// Capacity of the request channel between the HTTP layer and the runtime
    pub request_queue_capacity: usize,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            storage_base_url: "files".to_string(),
            image_base_url: "images".to_string(),
            default_page_size: 50,
            default_language: "en".to_string(),
            require_auth: false,
            request_timeout_ms: 5000,   // 5 seconds default
            response_timeout_ms: 10000, // 10 seconds default
            request_queue_capacity: 1000,
        }
    }
}
