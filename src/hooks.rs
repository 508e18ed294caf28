//! Plugin hooks that inject scripts around the spec files.
//!
//! Every plugin is applied once per run against a fresh [`Hooks`] builder.
//! Plugins append file paths to `before_specs` or `after_specs`; insertion
//! order is kept and decides script execution order in the browser.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Ordered list of hook script paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookList {
    paths: Vec<PathBuf>,
}

impl HookList {
    /// Appends a script path.
    pub fn include(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        let path = path.into();
        tracing::debug!(path = ?path, "hook script included");
        self.paths.push(path);
        self
    }

    /// Returns the included paths in registration order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Collection points handed to each plugin.
#[derive(Debug, Clone, Default)]
pub struct Hooks {
    /// Scripts loaded before the specs.
    pub before_specs: HookList,
    /// Scripts loaded after the specs.
    pub after_specs: HookList,
}

impl Hooks {
    /// Creates an empty hook registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finalizes the registry once all plugins have run.
    pub fn finish(self) -> ResolvedHooks {
        ResolvedHooks {
            before: self.before_specs.paths,
            after: self.after_specs.paths,
        }
    }
}

/// Hook paths after every plugin has been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedHooks {
    /// Paths loaded before the specs.
    pub before: Vec<PathBuf>,
    /// Paths loaded after the specs.
    pub after: Vec<PathBuf>,
}

/// A harness plugin.
pub trait Plugin: Send + Sync {
    /// Registers scripts on the hook registry.
    fn apply(&self, hooks: &mut Hooks) -> Result<()>;

    /// Name used in logs.
    fn name(&self) -> &str {
        "anonymous"
    }
}

/// Plugin backed by a closure. Created with [`from_fn`].
pub struct FnPlugin<F> {
    f: F,
}

impl<F> Plugin for FnPlugin<F>
where
    F: Fn(&mut Hooks) -> Result<()> + Send + Sync,
{
    fn apply(&self, hooks: &mut Hooks) -> Result<()> {
        (self.f)(hooks)
    }
}

/// Wraps a closure as a plugin.
///
/// ```
/// use browser_harness::hooks::{from_fn, Hooks, Plugin};
///
/// let plugin = from_fn(|hooks| {
///     hooks.before_specs.include("vendor/jquery.js");
///     Ok(())
/// });
///
/// let mut hooks = Hooks::new();
/// plugin.apply(&mut hooks).unwrap();
/// assert_eq!(hooks.before_specs.len(), 1);
/// ```
pub fn from_fn<F>(f: F) -> FnPlugin<F>
where
    F: Fn(&mut Hooks) -> Result<()> + Send + Sync,
{
    FnPlugin { f }
}

/// Declarative plugin read from the harness config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptPlugin {
    /// Plugin name.
    pub name: String,
    /// Scripts to load before the specs.
    #[serde(default)]
    pub before: Vec<PathBuf>,
    /// Scripts to load after the specs.
    #[serde(default)]
    pub after: Vec<PathBuf>,
}

impl ScriptPlugin {
    /// Creates a plugin with no scripts.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Adds a script loaded before the specs.
    pub fn with_before(mut self, path: impl Into<PathBuf>) -> Self {
        self.before.push(path.into());
        self
    }

    /// Adds a script loaded after the specs.
    pub fn with_after(mut self, path: impl Into<PathBuf>) -> Self {
        self.after.push(path.into());
        self
    }
}

impl Plugin for ScriptPlugin {
    fn apply(&self, hooks: &mut Hooks) -> Result<()> {
        for path in &self.before {
            hooks.before_specs.include(path.clone());
        }
        for path in &self.after {
            hooks.after_specs.include(path.clone());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
