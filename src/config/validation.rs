//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URLs, the chain id and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PublisherConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::PublisherConfig;

/// Longest validity window the ledger accepts for a transaction.
pub const MAX_EXPIRATION_SECS: u64 = 3600;

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &PublisherConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "ledger.rpc_url", &config.ledger.rpc_url);
    for (i, url) in config.ledger.failover_urls.iter().enumerate() {
        check_url(&mut errors, &format!("ledger.failover_urls[{}]", i), url);
    }
    check_url(&mut errors, "hoster.base_url", &config.hoster.base_url);
    check_url(&mut errors, "dictionary.base_url", &config.dictionary.base_url);

    match hex::decode(&config.ledger.chain_id) {
        Ok(bytes) if bytes.len() == 32 => {}
        Ok(bytes) => errors.push(ValidationError::new(
            "ledger.chain_id",
            format!("expected 32 bytes, got {}", bytes.len()),
        )),
        Err(e) => errors.push(ValidationError::new("ledger.chain_id", format!("not hex: {}", e))),
    }

    if config.ledger.expiration_secs == 0 || config.ledger.expiration_secs > MAX_EXPIRATION_SECS {
        errors.push(ValidationError::new(
            "ledger.expiration_secs",
            format!("must be within 1..={}", MAX_EXPIRATION_SECS),
        ));
    }

    for (field, secs) in [
        ("ledger.rpc_timeout_secs", config.ledger.rpc_timeout_secs),
        ("hoster.timeout_secs", config.hoster.timeout_secs),
        ("dictionary.timeout_secs", config.dictionary.timeout_secs),
    ] {
        if secs == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }

    for (field, value) in [
        ("ledger.address_prefix", &config.ledger.address_prefix),
        ("ledger.parent_permlink", &config.ledger.parent_permlink),
        ("app.version", &config.app.version),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    match url::Url::parse(value) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
        Ok(u) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", u.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&PublisherConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = PublisherConfig::default();
        config.ledger.rpc_url = "not a url".into();
        config.ledger.chain_id = "abcd".into();
        config.ledger.expiration_secs = 7200;
        config.hoster.timeout_secs = 0;
        config.app.version = "  ".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "ledger.rpc_url",
                "ledger.chain_id",
                "ledger.expiration_secs",
                "hoster.timeout_secs",
                "app.version",
            ]
        );
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let mut config = PublisherConfig::default();
        config.hoster.base_url = "ftp://files.example.org".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("unsupported scheme 'ftp'"));
    }
}
