//! Bootstrap: assembles and starts one in-browser test run.
//!
//! [`Bootstrap::run`] is a single linear sequence. Registration on the runner
//! happens first, then the script list is built and handed to the server, and
//! the runner is started last. Collaborator errors are propagated as-is.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::HarnessConfig;
use crate::error::Result;
use crate::fs::FileReader;
use crate::hooks::{Hooks, ResolvedHooks};
use crate::launcher::{Launcher, LauncherRegistry};
use crate::runner::TestRunner;
use crate::server::ServerHandle;
use crate::transform::{SourceTransformer, TransformOptions};

/// DOM event simulator, relative to the base path.
pub const EVENT_SIMULATOR_PATH: &str = "../node_modules/simulant/dist/simulant.umd.js";

/// Test-frame helper, relative to the base path.
pub const TEST_FRAME_PATH: &str = "browser/test-frame.js";

/// Wires reader, transformer, runner, server and launchers for a run.
pub struct Bootstrap<F, T, R> {
    reader: F,
    transformer: T,
    runner: R,
    server: ServerHandle,
    launchers: LauncherRegistry,
    config: HarnessConfig,
    base_path: PathBuf,
}

impl<F, T, R> Bootstrap<F, T, R>
where
    F: FileReader,
    T: SourceTransformer,
    R: TestRunner,
{
    /// Creates a bootstrap. Nothing is resolved until [`run`](Self::run).
    pub fn new(
        reader: F,
        transformer: T,
        runner: R,
        server: ServerHandle,
        launchers: LauncherRegistry,
        config: HarnessConfig,
        base_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            reader,
            transformer,
            runner,
            server,
            launchers,
            config,
            base_path: base_path.into(),
        }
    }

    /// Runs one bootstrap sequence and starts the runner.
    pub fn run(&mut self) -> Result<()> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("bootstrap", run_id = %run_id);
        let _guard = span.enter();

        let url = self.launcher_url();
        let launchers = self.create_launchers(&url)?;
        tracing::info!(count = launchers.len(), url = %url, "registering launchers");
        self.runner.launchers(launchers);

        self.runner.reporters(vec![self.config.reporter.reporter()]);
        self.runner.server(Arc::clone(&self.server));

        let scripts = self.assemble_scripts()?;
        tracing::info!(count = scripts.len(), "registering scripts");
        self.server.scripts(scripts);

        self.server.port(self.config.port);
        self.server.endpoint(&self.config.endpoint);
        self.server.target(&self.config.target);
        tracing::info!(
            port = self.config.port,
            endpoint = %self.config.endpoint,
            target_url = %self.config.target,
            "configured server"
        );

        tracing::info!("starting runner");
        self.runner.run()
    }

    /// URL every launcher is created with.
    pub fn launcher_url(&self) -> String {
        self.config.launcher_url()
    }

    /// Builds the ordered script list: event simulator, test frame, before
    /// hooks, transformed specs, after hooks.
    pub fn assemble_scripts(&self) -> Result<Vec<String>> {
        let simulator = self.read(&self.base_path.join(EVENT_SIMULATOR_PATH))?;
        let frame = self.read(&self.base_path.join(TEST_FRAME_PATH))?;

        let hooks = self.collect_hooks()?;

        let mut scripts =
            Vec::with_capacity(2 + hooks.before.len() + self.config.specs.len() + hooks.after.len());
        scripts.push(simulator);
        scripts.push(frame);

        for path in &hooks.before {
            scripts.push(self.read(path)?);
        }

        let options = TransformOptions::default();
        for spec in &self.config.specs {
            let source = self.read(spec)?;
            tracing::debug!(spec = ?spec, "transforming spec");
            scripts.push(self.transformer.transform(&source, &options)?.code);
        }

        for path in &hooks.after {
            scripts.push(self.read(path)?);
        }

        Ok(scripts)
    }

    /// The runner this bootstrap drives.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    fn create_launchers(&self, url: &str) -> Result<Vec<Box<dyn Launcher>>> {
        self.config
            .browser_names()
            .into_iter()
            .map(|name| {
                tracing::debug!(browser = %name, "creating launcher");
                self.launchers.create(name, url)
            })
            .collect()
    }

    fn collect_hooks(&self) -> Result<ResolvedHooks> {
        let mut hooks = Hooks::new();
        for plugin in self.config.plugins() {
            tracing::debug!(plugin = %plugin.name(), "applying plugin");
            plugin.apply(&mut hooks)?;
        }

        let hooks = hooks.finish();
        tracing::debug!(
            before = hooks.before.len(),
            after = hooks.after.len(),
            "hooks resolved"
        );
        Ok(hooks)
    }

    fn read(&self, path: &Path) -> Result<String> {
        tracing::debug!(path = ?path, "loading script");
        self.reader.read(path)
    }
}
