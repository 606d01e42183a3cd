use crate::config::types::CrawlOptions;
use crate::url::HostGlob;
use crate::ConfigError;
use url::Url;

/// Validates resolved crawl options plus the seed and host-glob lists
pub fn validate(
    options: &CrawlOptions,
    seeds: &[String],
    hosts: &[String],
) -> Result<(), ConfigError> {
    validate_options(options)?;
    validate_seeds(seeds)?;
    validate_patterns(hosts)?;
    validate_patterns(&options.skip)?;
    Ok(())
}

fn validate_options(options: &CrawlOptions) -> Result<(), ConfigError> {
    if options.connections < 1 || options.connections > 100 {
        return Err(ConfigError::Validation(format!(
            "connections must be between 1 and 100, got {}",
            options.connections
        )));
    }

    if options.timeout.is_zero() {
        return Err(ConfigError::Validation(
            "timeout must be at least 1 second".to_string(),
        ));
    }

    if options.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("seed '{}': {}", seed, e)))?;

        if !crate::url::is_supported_scheme(url.scheme()) {
            return Err(ConfigError::InvalidUrl(format!(
                "seed '{}' uses unsupported scheme '{}'",
                seed,
                url.scheme()
            )));
        }
    }

    Ok(())
}

fn validate_patterns(patterns: &[String]) -> Result<(), ConfigError> {
    for pattern in patterns {
        HostGlob::new(pattern)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeds() -> Vec<String> {
        vec!["http://localhost:4000/".to_string()]
    }

    #[test]
    fn test_valid_configuration() {
        let options = CrawlOptions::default();
        assert!(validate(&options, &seeds(), &[]).is_ok());
    }

    #[test]
    fn test_zero_connections_rejected() {
        let options = CrawlOptions {
            connections: 0,
            ..Default::default()
        };
        let result = validate(&options, &seeds(), &[]);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_excessive_connections_rejected() {
        let options = CrawlOptions {
            connections: 500,
            ..Default::default()
        };
        assert!(validate(&options, &seeds(), &[]).is_err());
    }

    #[test]
    fn test_no_seeds_rejected() {
        let options = CrawlOptions::default();
        let result = validate(&options, &[], &[]);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_unparseable_seed_rejected() {
        let options = CrawlOptions::default();
        let result = validate(&options, &["not a url".to_string()], &[]);
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_unsupported_seed_scheme_rejected() {
        let options = CrawlOptions::default();
        let result = validate(&options, &["mailto:x@y.com".to_string()], &[]);
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_file_seed_accepted() {
        let options = CrawlOptions::default();
        assert!(validate(&options, &["file:///tmp/site/index.html".to_string()], &[]).is_ok());
    }

    #[test]
    fn test_empty_host_pattern_rejected() {
        let options = CrawlOptions::default();
        let result = validate(&options, &seeds(), &["".to_string()]);
        assert!(matches!(result, Err(ConfigError::InvalidPattern(_))));
    }
}
