use std::env;

pub const DEFAULT_DATA_FILE: &str = "library.json";
pub const DEFAULT_LOOKUP_URL: &str = "https://openlibrary.org";
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8000";

// Configuration abstracts config options for the book catalog
#[derive(Debug, PartialEq, Clone)]
pub struct Configuration {
    pub data_file: String,
    pub lookup_url: String,
    pub lookup_timeout_secs: u64,
    pub http_addr: String,
    pub log_level: String,
}

impl Configuration {
    pub fn new(data_file: &str) -> Self {
        Configuration {
            data_file: data_file.to_string(),
            lookup_url: DEFAULT_LOOKUP_URL.to_string(),
            lookup_timeout_secs: DEFAULT_LOOKUP_TIMEOUT_SECS,
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            log_level: "info".to_string(),
        }
    }

    // from_env starts from the defaults and applies LIBRARY_* overrides
    pub fn from_env() -> Self {
        let mut config = Configuration::new(DEFAULT_DATA_FILE);
        config.apply(|key| env::var(key).ok());
        config
    }

    pub fn with_lookup_url(mut self, lookup_url: &str) -> Self {
        self.lookup_url = lookup_url.trim_end_matches('/').to_string();
        self
    }

    fn apply<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if let Some(data_file) = lookup("LIBRARY_DATA_FILE").filter(|v| !v.is_empty()) {
            self.data_file = data_file;
        }
        if let Some(url) = lookup("LIBRARY_LOOKUP_URL").filter(|v| !v.is_empty()) {
            self.lookup_url = url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = lookup("LIBRARY_LOOKUP_TIMEOUT_SECS").and_then(|v| v.parse::<u64>().ok()) {
            self.lookup_timeout_secs = timeout;
        }
        if let Some(addr) = lookup("LIBRARY_HTTP_ADDR").filter(|v| !v.is_empty()) {
            self.http_addr = addr;
        }
        if let Some(level) = lookup("LIBRARY_LOG_LEVEL").filter(|v| !v.is_empty()) {
            self.log_level = level;
        }
    }
}
