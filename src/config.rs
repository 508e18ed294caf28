//! Harness configuration and its validation.
//!
//! A config is loaded from TOML (or YAML by extension) and is immutable for
//! the duration of a run. Programmatic plugins are added through the builder
//! and are never serialized.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::hooks::{Plugin, ScriptPlugin};
use crate::launcher::DEFAULT_BROWSER;
use crate::report::ReporterKind;

/// Browser names with a bundled launcher.
pub const KNOWN_BROWSERS: &[&str] = &["phantomjs", "chrome-headless", "firefox-headless"];

/// Configuration for one harness run.
#[derive(Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// URL of the page under test.
    pub target: String,

    /// Path the harness page is served under.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Local port of the harness server. Accepts a number or a numeric string.
    #[serde(default = "default_port", deserialize_with = "deserialize_port")]
    pub port: u16,

    /// Browsers to launch. Empty means the default browser.
    #[serde(default)]
    pub browsers: Vec<String>,

    /// Spec files, in load order.
    #[serde(default)]
    pub specs: Vec<PathBuf>,

    /// Reporter registered on the runner.
    #[serde(default)]
    pub reporter: ReporterKind,

    /// Declarative hook plugins, applied before programmatic ones.
    #[serde(default)]
    pub hooks: Vec<ScriptPlugin>,

    /// Programmatic plugins, in insertion order.
    #[serde(skip)]
    pub plugins: Vec<Arc<dyn Plugin>>,
}

fn default_endpoint() -> String {
    "/harness".to_string()
}

fn default_port() -> u16 {
    8000
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortValue {
    Number(u16),
    Text(String),
}

fn deserialize_port<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    match PortValue::deserialize(deserializer)? {
        PortValue::Number(port) => Ok(port),
        PortValue::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid port '{}'", text))),
    }
}

impl HarnessConfig {
    /// Creates a config for `target` with default endpoint and port.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            endpoint: default_endpoint(),
            port: default_port(),
            browsers: Vec::new(),
            specs: Vec::new(),
            reporter: ReporterKind::default(),
            hooks: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Loads a config file. `.yaml`/`.yml` files are parsed as YAML, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// Parses a TOML config.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {}", e)))
    }

    /// Parses a YAML config.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))
    }

    /// Sets the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Adds a browser.
    pub fn with_browser(mut self, browser: impl Into<String>) -> Self {
        self.browsers.push(browser.into());
        self
    }

    /// Adds a spec file.
    pub fn with_spec(mut self, spec: impl Into<PathBuf>) -> Self {
        self.specs.push(spec.into());
        self
    }

    /// Sets the reporter.
    pub fn with_reporter(mut self, reporter: ReporterKind) -> Self {
        self.reporter = reporter;
        self
    }

    /// Adds a declarative hook plugin.
    pub fn with_hook(mut self, hook: ScriptPlugin) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Adds a programmatic plugin.
    pub fn with_plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Browsers to launch, falling back to [`DEFAULT_BROWSER`].
    pub fn browser_names(&self) -> Vec<&str> {
        if self.browsers.is_empty() {
            vec![DEFAULT_BROWSER]
        } else {
            self.browsers.iter().map(String::as_str).collect()
        }
    }

    /// URL the browsers open: the local harness server, never `target`.
    pub fn launcher_url(&self) -> String {
        format!("http://localhost:{}{}", self.port, self.endpoint)
    }

    /// All plugins in application order.
    pub fn plugins(&self) -> impl Iterator<Item = &dyn Plugin> + '_ {
        self.hooks
            .iter()
            .map(|hook| hook as &dyn Plugin)
            .chain(self.plugins.iter().map(|plugin| &**plugin as &dyn Plugin))
    }
}

impl std::fmt::Debug for HarnessConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarnessConfig")
            .field("target", &self.target)
            .field("endpoint", &self.endpoint)
            .field("port", &self.port)
            .field("browsers", &self.browsers)
            .field("specs", &self.specs)
            .field("reporter", &self.reporter)
            .field("hooks", &self.hooks)
            .field("plugins", &self.plugins.len())
            .finish()
    }
}

/// Problems found while checking a config.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Problems that must be fixed before running.
    pub errors: Vec<String>,
    /// Problems that are only logged.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// True when no errors were recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Records a problem that makes the config unusable.
    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Records a problem worth logging that does not stop a run.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Appends the errors and warnings of `other`.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Returns the warnings, or an `Error::Config` joining every error.
    pub fn into_result(self) -> Result<Vec<String>> {
        if self.is_valid() {
            Ok(self.warnings)
        } else {
            Err(Error::Config(self.errors.join("; ")))
        }
    }
}

/// Config types that can check themselves before a run.
pub trait Validate {
    /// Collects every error and warning for this value.
    fn validate(&self) -> ValidationResult;
}

impl Validate for HarnessConfig {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.target.trim().is_empty() {
            result.add_error("target cannot be empty");
        } else if !self.target.starts_with("http://") && !self.target.starts_with("https://") {
            result.add_error(format!("target '{}' must be an http(s) URL", self.target));
        }

        if !self.endpoint.starts_with('/') {
            result.add_error(format!("endpoint '{}' must start with '/'", self.endpoint));
        }

        if self.port == 0 {
            result.add_error("port must be non-zero");
        }

        if self.specs.is_empty() {
            result.add_warning("no specs configured - the run will only load helpers and hooks");
        }

        let mut seen = HashSet::new();
        for browser in &self.browsers {
            if !KNOWN_BROWSERS.contains(&browser.as_str()) {
                result.add_warning(format!("unknown browser '{}'", browser));
            }
            if !seen.insert(browser.as_str()) {
                result.add_warning(format!("browser '{}' is listed more than once", browser));
            }
        }

        for hook in &self.hooks {
            result.merge(hook.validate());
        }

        result
    }
}

impl Validate for ScriptPlugin {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.before.is_empty() && self.after.is_empty() {
            result.add_warning(format!("hook '{}' includes no scripts", self.name));
        }

        result
    }
}
