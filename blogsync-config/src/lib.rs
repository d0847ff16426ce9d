//! Loader for blogsync configuration with YAML + environment overlays.
//!
//! Sources are merged in this order, later ones winning:
//!
//! 1. built-in defaults (every field has one, so an empty config is valid)
//! 2. YAML files / inline snippets added through the loader
//! 3. `BLOGSYNC__`-prefixed environment variables (`__` separates nesting,
//!    e.g. `BLOGSYNC__IMPORT__PAGE_SIZE=50`)
//!
//! String values may reference `${VAR}` placeholders; they are expanded
//! recursively before deserialization.
use blogsync_common::observability::{LogConfig, LogFormat};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "BLOGSYNC";
pub const CONFIG_FILE_NAME: &str = "blogsync.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlogsyncConfig {
    /// Target blog. When unset the first blog of the signed-in user is used.
    #[serde(deserialize_with = "opt_string_or_number")]
    pub blog_id: Option<String>,
    pub api: ApiConfig,
    pub import: ImportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub login_url: String,
    /// Client identifier sent with the login request.
    pub source: String,
    /// Pre-issued OAuth token; skips the password login when present.
    pub access_token: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/blogger/v3/".into(),
            login_url: "https://www.google.com/accounts/ClientLogin".into(),
            source: "blogsync-0.1".into(),
            access_token: None,
            timeout_secs: 15,
            max_retries: 0,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub input: PathBuf,
    pub audit_log: PathBuf,
    pub author_name: String,
    pub page_size: u32,
    pub max_pages: u32,
    pub comment_delay_secs: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("export.txt"),
            audit_log: PathBuf::from("/tmp/hmmap.txt"),
            author_name: "Blog Import".into(),
            page_size: 100,
            max_pages: 10,
            comment_delay_secs: 160,
        }
    }
}

impl ImportConfig {
    pub fn comment_delay(&self) -> Duration {
        Duration::from_secs(self.comment_delay_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    pub stderr: bool,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::Text,
            stderr: true,
            filter: "info".into(),
        }
    }
}

impl LoggingConfig {
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            app_name: "blogsync",
            log_dir: self.dir.clone(),
            emit_stderr: self.stderr,
            format: self.format,
            default_filter: self.filter.clone(),
        }
    }
}

/// Blog ids are long numbers; YAML and parsed env values may hand them over unquoted.
fn opt_string_or_number<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(de)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "blog_id must be a string or number, got {other}"
        ))),
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Where to look for a config file when none is given on the command line:
/// `./blogsync.yaml` first, then `<config dir>/blogsync/blogsync.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|d| d.join("blogsync").join(CONFIG_FILE_NAME))
        .filter(|p| p.is_file())
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct BlogsyncConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for BlogsyncConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl BlogsyncConfigLoader {
    /// Start from the built-in defaults.
    ///
    /// ```
    /// use blogsync_config::BlogsyncConfigLoader;
    ///
    /// let config = BlogsyncConfigLoader::new().load().expect("defaults are valid");
    /// assert_eq!(config.import.page_size, 100);
    /// assert_eq!(config.import.max_pages, 10);
    /// assert_eq!(config.import.comment_delay_secs, 160);
    /// assert!(config.blog_id.is_none());
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`with_file`](Self::with_file), but a missing file is not an error.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use blogsync_config::BlogsyncConfigLoader;
    ///
    /// let cfg = BlogsyncConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// blog_id: 1938689576098732827
    /// import:
    ///   author_name: "Pontus"
    ///   comment_delay_secs: 0
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.blog_id.as_deref(), Some("1938689576098732827"));
    /// assert_eq!(cfg.import.author_name, "Pontus");
    /// assert_eq!(cfg.import.comment_delay_secs, 0);
    /// assert_eq!(cfg.import.page_size, 100);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// Environment variables are layered last so they override files, then
    /// `${VAR}` placeholders are expanded.
    pub fn load(self) -> Result<BlogsyncConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("CITY", Some("Winston")), ("STATE", Some("NC"))], || {
            let mut v = json!(["hello-$CITY", { "loc": "${CITY}-${STATE}" }, 42, true, null]);
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!(["hello-Winston", { "loc": "Winston-NC" }, 42, true, null])
            );
        });
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST}"));
    }

    #[test]
    fn blog_id_accepts_numbers_and_blanks() {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(deserialize_with = "opt_string_or_number", default)]
            id: Option<String>,
        }
        let p: Probe = serde_json::from_value(json!({"id": 42})).unwrap();
        assert_eq!(p.id.as_deref(), Some("42"));
        let p: Probe = serde_json::from_value(json!({"id": " "})).unwrap();
        assert!(p.id.is_none());
        let p: Probe = serde_json::from_value(json!({})).unwrap();
        assert!(p.id.is_none());
        assert!(serde_json::from_value::<Probe>(json!({"id": [1]})).is_err());
    }

    #[test]
    fn logging_section_maps_to_log_config() {
        let logging = LoggingConfig {
            format: LogFormat::Json,
            stderr: false,
            filter: "debug".into(),
            ..Default::default()
        };
        let lc = logging.to_log_config();
        assert_eq!(lc.format, LogFormat::Json);
        assert!(!lc.emit_stderr);
        assert_eq!(lc.default_filter, "debug");
    }
}
