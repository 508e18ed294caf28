//! Test runner contract and a planning runner.
//!
//! The runner engine that actually drives browsers and collects results lives
//! outside this crate. [`PlanRunner`] takes the registrations and turns them
//! into a [`RunPlan`] without starting anything.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::launcher::Launcher;
use crate::report::Reporter;
use crate::server::ServerHandle;

/// Registration and start calls the bootstrap makes on a runner.
pub trait TestRunner {
    /// Registers the browser launchers for this run.
    fn launchers(&mut self, launchers: Vec<Box<dyn Launcher>>);

    /// Registers the reporters for this run.
    fn reporters(&mut self, reporters: Vec<Reporter>);

    /// Registers the server the browsers load the harness from.
    fn server(&mut self, server: ServerHandle);

    /// Starts the run.
    fn run(&mut self) -> Result<()>;
}

/// One browser a run would start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedLauncher {
    pub browser: String,
    pub url: String,
}

/// What a run would do, as seen by the runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunPlan {
    /// Browsers in start order.
    pub launchers: Vec<PlannedLauncher>,
    /// Number of registered reporters.
    pub reporters: usize,
    /// Harness page URL reported by the registered server.
    pub server_url: Option<String>,
}

/// Runner that records registrations and produces a [`RunPlan`].
#[derive(Default)]
pub struct PlanRunner {
    launchers: Vec<Box<dyn Launcher>>,
    reporters: Vec<Reporter>,
    server: Option<ServerHandle>,
    plan: Option<RunPlan>,
}

impl PlanRunner {
    /// Creates an empty runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// The plan produced by the last `run`.
    pub fn plan(&self) -> Option<&RunPlan> {
        self.plan.as_ref()
    }
}

impl TestRunner for PlanRunner {
    fn launchers(&mut self, launchers: Vec<Box<dyn Launcher>>) {
        self.launchers = launchers;
    }

    fn reporters(&mut self, reporters: Vec<Reporter>) {
        self.reporters = reporters;
    }

    fn server(&mut self, server: ServerHandle) {
        self.server = Some(server);
    }

    fn run(&mut self) -> Result<()> {
        let server = self
            .server
            .as_ref()
            .ok_or_else(|| Error::Runner("no server registered".to_string()))?;
        let server_url = server.url();

        let launchers = self
            .launchers
            .iter()
            .map(|launcher| PlannedLauncher {
                browser: launcher.name().to_string(),
                url: launcher.url().to_string(),
            })
            .collect::<Vec<_>>();

        for launcher in &launchers {
            tracing::info!(browser = %launcher.browser, url = %launcher.url, "planned browser");
        }

        self.plan = Some(RunPlan {
            launchers,
            reporters: self.reporters.len(),
            server_url,
        });
        Ok(())
    }
}
