use crate::config::ProjectConfig;
use crate::ConfigError;
use url::Url;

/// Validates a project configuration before it is persisted or used.
pub fn validate(config: &ProjectConfig) -> Result<(), ConfigError> {
    validate_base_url(&config.base_url)?;
    validate_scope_rules(&config.scope_rules)?;
    Ok(())
}

/// Validates the base URL: parseable, http(s), with a host and no path.
fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: "missing host".to_string(),
        });
    }

    if parsed.path() != "/" && !parsed.path().is_empty() {
        return Err(ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: "base URL must be an origin without a path".to_string(),
        });
    }

    Ok(())
}

/// Validates scope rules: each trimmed rule must start with `/` or `!/`.
fn validate_scope_rules(rules: &[String]) -> Result<(), ConfigError> {
    for rule in rules {
        let trimmed = rule.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::InvalidScopeRule(rule.clone()));
        }

        let pattern = trimmed.strip_prefix('!').unwrap_or(trimmed);
        if !pattern.starts_with('/') {
            return Err(ConfigError::InvalidScopeRule(rule.clone()));
        }
    }

    Ok(())
}
