//! Browser Harness - bootstrap layer for in-browser test runs
//!
//! Wires a static test server, headless browser launchers, a source
//! transpiler and a test runner so that specs written in a newer script
//! dialect run inside a real browser DOM and report back to the host.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod fs;
pub mod hooks;
pub mod launcher;
pub mod report;
pub mod runner;
pub mod server;
pub mod transform;

pub use bootstrap::{Bootstrap, EVENT_SIMULATOR_PATH, TEST_FRAME_PATH};
pub use config::{HarnessConfig, Validate, ValidationResult, KNOWN_BROWSERS};
pub use error::{Error, Result};
pub use fs::{FileReader, LocalFileReader};
pub use hooks::{from_fn, HookList, Hooks, Plugin, ResolvedHooks, ScriptPlugin};
pub use launcher::{Launcher, LauncherFactory, LauncherRegistry, ProcessLauncher, DEFAULT_BROWSER};
pub use report::{json_reporter, spec_reporter, Outcome, Reporter, ReporterKind, TestEvent};
pub use runner::{PlanRunner, PlannedLauncher, RunPlan, TestRunner};
pub use server::{ServerHandle, ServerSettings, StaticServer, TestServer};
pub use transform::{
    CommandTransformer, PassthroughTransformer, Preset, SourceTransformer, TransformOptions,
    TransformOutput,
};
