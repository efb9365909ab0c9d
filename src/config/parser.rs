//! Loading of client settings, declared records and persisted state.
//!
//! Settings come from a YAML file, then `SSM_ASSOCIATION_*` environment
//! variables override individual keys. Declared associations are YAML;
//! persisted state is JSON.

use crate::error::{AssociationError, ConfigError, Result};
use crate::migrate::RawResourceState;
use crate::resource::AssociationRecord;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::settings::{ClientSettings, ENV_PREFIX};

/// Parser for settings and declared association files.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving `.env`.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving relative paths.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads client settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_settings(&self, path: impl AsRef<Path>) -> Result<ClientSettings> {
        let path = path.as_ref();
        info!("Loading settings from: {}", path.display());

        let content = read_file(path)?;
        self.parse_settings(&content, Some(path))
    }

    /// Parses client settings from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_settings(&self, content: &str, source: Option<&Path>) -> Result<ClientSettings> {
        debug!("Parsing client settings");

        // An empty file is valid and means "all defaults".
        if content.trim().is_empty() {
            return Ok(ClientSettings::default());
        }

        serde_yaml::from_str(content).map_err(|e| yaml_error(&e, source))
    }

    /// Resolves settings: the explicit file if given, else the first file
    /// found by [`find_config_file`], else defaults. Environment overrides
    /// are applied last.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be parsed or an override is invalid.
    pub fn resolve_settings(&self, explicit: Option<&Path>) -> Result<ClientSettings> {
        let mut settings = match explicit {
            Some(path) => self.load_settings(path)?,
            None => {
                let start = self
                    .base_path
                    .clone()
                    .map_or_else(std::env::current_dir, Ok)?;

                match find_config_file(&start) {
                    Ok(path) => self.load_settings(path)?,
                    Err(_) => {
                        debug!("No settings file found, using AWS defaults");
                        ClientSettings::default()
                    }
                }
            }
        };

        Self::apply_env_overrides(&mut settings, |name| std::env::var(name).ok())?;
        Ok(settings)
    }

    /// Applies `SSM_ASSOCIATION_<KEY>` overrides using `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric override does not parse.
    pub fn apply_env_overrides(
        settings: &mut ClientSettings,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<()> {
        let var = |key: &str| {
            let name = format!("{ENV_PREFIX}_{key}");
            lookup(&name).map(|value| (name, value))
        };

        if let Some((_, region)) = var("REGION") {
            debug!("Overriding region from environment");
            settings.region = Some(region);
        }

        if let Some((_, profile)) = var("PROFILE") {
            debug!("Overriding profile from environment");
            settings.profile = Some(profile);
        }

        if let Some((_, endpoint)) = var("ENDPOINT_URL") {
            debug!("Overriding endpoint_url from environment");
            settings.endpoint_url = Some(endpoint);
        }

        if let Some((name, value)) = var("MAX_ATTEMPTS") {
            debug!("Overriding max_attempts from environment");
            settings.max_attempts = Some(parse_number(name, value)?);
        }

        if let Some((name, value)) = var("TIMEOUT_SECS") {
            debug!("Overriding timeout_secs from environment");
            settings.timeout_secs = Some(parse_number(name, value)?);
        }

        Ok(())
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                AssociationError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }

    /// Loads a declared association from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_record(&self, path: impl AsRef<Path>) -> Result<AssociationRecord> {
        let path = path.as_ref();
        info!("Loading association from: {}", path.display());

        let content = read_file(path)?;
        self.parse_record(&content, Some(path))
    }

    /// Parses a declared association from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_record(&self, content: &str, source: Option<&Path>) -> Result<AssociationRecord> {
        let record: AssociationRecord =
            serde_yaml::from_str(content).map_err(|e| yaml_error(&e, source))?;

        debug!("Parsed association for document: {}", record.name);
        Ok(record)
    }

    /// Loads persisted raw state from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_state(&self, path: impl AsRef<Path>) -> Result<RawResourceState> {
        let path = path.as_ref();
        debug!("Loading state from: {}", path.display());

        let content = read_file(path)?;
        serde_json::from_str(&content).map_err(|e| {
            AssociationError::Config(ConfigError::ParseError {
                message: format!("JSON parse error: {e}"),
                location: Some(path.display().to_string()),
            })
        })
    }
}

/// Default settings file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["ssm-association.yaml", "ssm-association.yml"];

/// Finds the settings file in the given directory or its parents, then in
/// the user's config directory.
///
/// # Errors
///
/// Returns an error if no settings file is found.
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found settings file: {}", config_path.display());
                return Ok(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join("ssm-association").join("config.yaml");
        if user_path.exists() {
            info!("Found settings file: {}", user_path.display());
            return Ok(user_path);
        }
    }

    Err(AssociationError::Config(ConfigError::FileNotFound {
        path: start.join(DEFAULT_CONFIG_FILES[0]),
    }))
}

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(AssociationError::Config(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        }));
    }

    std::fs::read_to_string(path).map_err(|e| {
        AssociationError::Config(ConfigError::ParseError {
            message: format!("Failed to read file: {e}"),
            location: Some(path.display().to_string()),
        })
    })
}

fn yaml_error(error: &serde_yaml::Error, source: Option<&Path>) -> AssociationError {
    AssociationError::Config(ConfigError::ParseError {
        message: format!("YAML parse error: {error}"),
        location: source.map(|p| p.display().to_string()),
    })
}

fn parse_number<T: std::str::FromStr>(name: String, value: String) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AssociationError::Config(ConfigError::InvalidEnvVar { name, value }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_parse_record() {
        let yaml = r"
name: AWS-ApplyPatchBaseline
instance_id: i-0abc
parameters:
  Operation: Install
";
        let record = ConfigParser::new().parse_record(yaml, None).expect("valid record");
        assert_eq!(record.name, "AWS-ApplyPatchBaseline");
        assert_eq!(record.parameters["Operation"], "Install");
    }

    #[test]
    fn test_parse_record_error_carries_location() {
        let err = ConfigParser::new()
            .parse_record("targets: nope", Some(Path::new("assoc.yaml")))
            .unwrap_err();

        assert!(matches!(
            err,
            AssociationError::Config(ConfigError::ParseError { location: Some(ref l), .. })
                if l == "assoc.yaml"
        ));
    }

    #[test]
    fn test_empty_settings_file_is_default() {
        let settings = ConfigParser::new().parse_settings("  \n", None).expect("empty ok");
        assert_eq!(settings, ClientSettings::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = ClientSettings::new().with_region("eu-west-1");

        ConfigParser::apply_env_overrides(
            &mut settings,
            env(&[
                ("SSM_ASSOCIATION_REGION", "us-east-2"),
                ("SSM_ASSOCIATION_MAX_ATTEMPTS", "7"),
            ]),
        )
        .expect("valid overrides");

        assert_eq!(settings.region.as_deref(), Some("us-east-2"));
        assert_eq!(settings.max_attempts, Some(7));
        assert!(settings.timeout_secs.is_none());
    }

    #[test]
    fn test_invalid_numeric_override() {
        let mut settings = ClientSettings::default();

        let err = ConfigParser::apply_env_overrides(
            &mut settings,
            env(&[("SSM_ASSOCIATION_TIMEOUT_SECS", "soon")]),
        )
        .unwrap_err();

        assert!(err.to_string().contains("SSM_ASSOCIATION_TIMEOUT_SECS"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConfigParser::new()
            .load_record("/nonexistent/assoc.yaml")
            .unwrap_err();
        assert!(matches!(
            err,
            AssociationError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_find_config_file_searches_parents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).expect("create dirs");
        std::fs::write(dir.path().join("ssm-association.yaml"), "region: eu-west-1\n")
            .expect("write settings");

        let found = find_config_file(&nested).expect("found");
        assert_eq!(found, dir.path().join("ssm-association.yaml"));

        let settings = ConfigParser::new().load_settings(found).expect("parsed");
        assert_eq!(settings.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_load_state_and_dotenv() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state_path = dir.path().join("state.json");
        std::fs::write(
            &state_path,
            r#"{"schema_version": 1, "id": "assoc-1", "attributes": {"name": "doc"}}"#,
        )
        .expect("write state");

        let parser = ConfigParser::new().with_base_path(dir.path());
        let state = parser.load_state(&state_path).expect("valid state");
        assert_eq!(state.id, "assoc-1");

        // No .env in the directory is not an error.
        assert!(parser.load_dotenv().is_ok());
    }
}
