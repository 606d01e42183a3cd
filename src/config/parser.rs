use crate::config::types::FileConfig;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a TOML configuration file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use linkscout::config::load_config;
///
/// let config = load_config(Path::new("linkscout.toml")).unwrap();
/// println!("{} extra seeds", config.seeds.len());
/// ```
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
seeds = ["http://localhost:4000/"]
hosts = ["http://localhost:4000/**"]
skip = ["http://localhost:4000/archive/**"]
connections = 8
timeout = 30
check-external = false
user-agent = "docs-checker/2.0"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.seeds.len(), 1);
        assert_eq!(config.hosts.len(), 1);
        assert_eq!(config.skip.len(), 1);
        assert_eq!(config.connections, Some(8));
        assert_eq!(config.timeout, Some(30));
        assert_eq!(config.check_external, Some(false));
        assert_eq!(config.user_agent.as_deref(), Some("docs-checker/2.0"));
    }

    #[test]
    fn test_load_empty_config() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();
        assert!(config.seeds.is_empty());
        assert_eq!(config.connections, None);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/linkscout.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
