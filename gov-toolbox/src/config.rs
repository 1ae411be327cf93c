use std::time::Duration;

pub const DEFAULT_KOIOS_BASE_URL: &str = "https://api.koios.rest/api/v1";

/// Fetch parameters handed to the loaders as an explicit value. Nothing in
/// this crate reads process-wide state for these.
#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Koios pages are capped at this many rows; a short page ends pagination.
    pub page_limit: usize,
    /// Batch size for POST endpoints taking an id list.
    pub batch_size: usize,
    /// Attempts per request before giving up.
    pub retries: u32,
    pub retry_delay: Duration,
    /// Pause between consecutive requests.
    pub request_pause: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_KOIOS_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            page_limit: 1000,
            batch_size: 80,
            retries: 3,
            retry_delay: Duration::from_secs(5),
            request_pause: Duration::from_millis(150),
        }
    }
}
