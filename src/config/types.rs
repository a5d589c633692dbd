use serde::Deserialize;

/// Main configuration structure for Sumi-Scrape
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub naming: NamingConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User agent header; when absent no custom header is sent
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// Negative cache sizing
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// How many non-HTML URLs to remember
    #[serde(rename = "invalid-html-capacity", default = "default_cache_capacity")]
    pub invalid_html_capacity: usize,

    /// How many non-image URLs to remember
    #[serde(rename = "invalid-image-capacity", default = "default_cache_capacity")]
    pub invalid_image_capacity: usize,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON results file
    #[serde(rename = "results-path", default = "default_results_path")]
    pub results_path: String,

    /// Directory under which per-page image folders are created
    #[serde(rename = "download-dir", default = "default_download_dir")]
    pub download_dir: String,
}

/// Limits applied when turning untrusted strings into file system names
#[derive(Debug, Clone, Deserialize)]
pub struct NamingConfig {
    #[serde(rename = "max-folder-name-length", default = "default_max_folder_name_length")]
    pub max_folder_name_length: usize,

    #[serde(rename = "max-file-name-length", default = "default_max_file_name_length")]
    pub max_file_name_length: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            invalid_html_capacity: default_cache_capacity(),
            invalid_image_capacity: default_cache_capacity(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: default_results_path(),
            download_dir: default_download_dir(),
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            max_folder_name_length: default_max_folder_name_length(),
            max_file_name_length: default_max_file_name_length(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_cache_capacity() -> usize {
    1000
}

fn default_results_path() -> String {
    "results.json".to_string()
}

fn default_download_dir() -> String {
    ".".to_string()
}

fn default_max_folder_name_length() -> usize {
    100
}

fn default_max_file_name_length() -> usize {
    200
}
