//! Browser launchers and the registry that builds them by name.
//!
//! Launchers are created per run against the harness URL. The registry maps
//! a browser name to a factory so that callers never need to know concrete
//! launcher types.

mod process;

pub use process::ProcessLauncher;

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Browser used when the config names none.
pub const DEFAULT_BROWSER: &str = "phantomjs";

/// A browser instance pointed at the harness URL.
pub trait Launcher: Send {
    /// Browser name this launcher was created for.
    fn name(&self) -> &str;

    /// URL the browser will open.
    fn url(&self) -> &str;

    /// Starts the browser.
    fn start(&mut self) -> Result<()>;

    /// Stops the browser. Stopping a browser that is not running is a no-op.
    fn stop(&mut self) -> Result<()>;
}

/// Builds a launcher for the given URL.
pub type LauncherFactory = Box<dyn Fn(&str) -> Box<dyn Launcher> + Send + Sync>;

/// Launcher factories keyed by browser name.
#[derive(Default)]
pub struct LauncherRegistry {
    factories: HashMap<String, LauncherFactory>,
}

impl LauncherRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with process launchers for the common headless browsers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DEFAULT_BROWSER, |url| {
            Box::new(ProcessLauncher::new(DEFAULT_BROWSER, "phantomjs", url))
        });
        registry.register("chrome-headless", |url| {
            Box::new(
                ProcessLauncher::new("chrome-headless", "chromium", url)
                    .with_args(["--headless", "--disable-gpu"]),
            )
        });
        registry.register("firefox-headless", |url| {
            Box::new(ProcessLauncher::new("firefox-headless", "firefox", url).with_args(["--headless"]))
        });
        registry
    }

    /// Registers a factory, replacing any previous one for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&str) -> Box<dyn Launcher> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
        self
    }

    /// Returns true if a factory exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered browser names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Instantiates the launcher registered for `name`.
    pub fn create(&self, name: &str, url: &str) -> Result<Box<dyn Launcher>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| Error::UnknownBrowser(name.to_string()))?;
        Ok(factory(url))
    }
}

impl std::fmt::Debug for LauncherRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LauncherRegistry")
            .field("browsers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubLauncher {
        name: String,
        url: String,
    }

    impl Launcher for StubLauncher {
        fn name(&self) -> &str {
            &self.name
        }

        fn url(&self) -> &str {
            &self.url
        }

        fn start(&mut self) -> Result<()> {
            Ok(())
        }

        fn stop(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn create_passes_url_to_factory() {
        let mut registry = LauncherRegistry::new();
        registry.register("stub", |url| {
            Box::new(StubLauncher {
                name: "stub-instance".to_string(),
                url: url.to_string(),
            })
        });

        let launcher = registry.create("stub", "http://localhost:8000/x").unwrap();

        assert_eq!(launcher.name(), "stub-instance");
        assert_eq!(launcher.url(), "http://localhost:8000/x");
    }

    #[test]
    fn create_fails_for_unknown_browser() {
        let registry = LauncherRegistry::new();
        let err = registry.create("netscape", "http://localhost/").err().unwrap();
        assert!(matches!(err, Error::UnknownBrowser(name) if name == "netscape"));
    }

    #[test]
    fn defaults_include_phantomjs() {
        let registry = LauncherRegistry::with_defaults();
        assert!(registry.contains(DEFAULT_BROWSER));
        assert_eq!(
            registry.names(),
            vec!["chrome-headless", "firefox-headless", "phantomjs"]
        );
    }

    #[test]
    fn register_replaces_existing_factory() {
        let mut registry = LauncherRegistry::with_defaults();
        registry.register(DEFAULT_BROWSER, |url| {
            Box::new(StubLauncher {
                name: "replacement".to_string(),
                url: url.to_string(),
            })
        });

        let launcher = registry.create(DEFAULT_BROWSER, "http://localhost/").unwrap();
        assert_eq!(launcher.name(), "replacement");
    }
}
