use crate::config::types::{CacheConfig, Config, HttpConfig, NamingConfig, OutputConfig};
use crate::ConfigError;

/// Longest name, in bytes, most file systems accept for a single path component
const MAX_COMPONENT_LENGTH: usize = 255;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_cache_config(&config.cache)?;
    validate_output_config(&config.output)?;
    validate_naming_config(&config.naming)?;
    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    if let Some(user_agent) = &config.user_agent {
        if user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user_agent cannot be blank when set".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.invalid_html_capacity == 0 {
        return Err(ConfigError::Validation(
            "invalid_html_capacity must be >= 1".to_string(),
        ));
    }

    if config.invalid_image_capacity == 0 {
        return Err(ConfigError::Validation(
            "invalid_image_capacity must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "results_path cannot be empty".to_string(),
        ));
    }

    if config.download_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "download_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_naming_config(config: &NamingConfig) -> Result<(), ConfigError> {
    for (field, value) in [
        ("max_folder_name_length", config.max_folder_name_length),
        ("max_file_name_length", config.max_file_name_length),
    ] {
        if value == 0 || value > MAX_COMPONENT_LENGTH {
            return Err(ConfigError::Validation(format!(
                "{} must be between 1 and {} bytes, got {}",
                field, MAX_COMPONENT_LENGTH, value
            )));
        }
    }

    Ok(())
}
