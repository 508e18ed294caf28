//! Launcher that runs a browser as a child process.

use std::process::{Child, Command, Stdio};

use crate::error::{Error, Result};

use super::Launcher;

/// Starts a browser binary with the harness URL as its last argument.
#[derive(Debug)]
pub struct ProcessLauncher {
    /// Browser name.
    name: String,
    /// Path to the browser binary.
    program: String,
    /// Arguments placed before the URL.
    args: Vec<String>,
    /// URL to open.
    url: String,
    /// Running browser process, if started.
    child: Option<Child>,
}

impl ProcessLauncher {
    /// Creates a launcher for `program` pointed at `url`.
    pub fn new(name: impl Into<String>, program: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            url: url.into(),
            child: None,
        }
    }

    /// Appends arguments placed before the URL.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Returns the binary this launcher runs.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Builds the full argument list.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(self.url.clone());
        args
    }

    /// Returns true while the browser process is running.
    pub fn is_running(&self) -> bool {
        self.child.is_some()
    }
}

impl Launcher for ProcessLauncher {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn start(&mut self) -> Result<()> {
        if self.child.is_some() {
            return Ok(());
        }

        let args = self.build_args();

        tracing::info!(
            browser = %self.name,
            program = %self.program,
            url = %self.url,
            "starting browser"
        );

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Launcher(format!("failed to spawn {}: {}", self.program, e)))?;

        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        // Already exited on its own
        if child.try_wait()?.is_some() {
            return Ok(());
        }

        child
            .kill()
            .map_err(|e| Error::Launcher(format!("failed to kill {}: {}", self.name, e)))?;
        child.wait()?;

        tracing::info!(browser = %self.name, "stopped browser");
        Ok(())
    }
}

impl Drop for ProcessLauncher {
    fn drop(&mut self) {
        if self.child.is_some() {
            if let Err(e) = self.stop() {
                tracing::error!(error = %e, browser = %self.name, "failed to stop browser on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_last_argument() {
        let launcher = ProcessLauncher::new("chrome-headless", "chromium", "http://localhost:8000/t")
            .with_args(["--headless", "--disable-gpu"]);

        assert_eq!(
            launcher.build_args(),
            vec!["--headless", "--disable-gpu", "http://localhost:8000/t"]
        );
        assert_eq!(launcher.program(), "chromium");
    }

    #[test]
    fn stop_without_start_is_noop() {
        let mut launcher = ProcessLauncher::new("phantomjs", "phantomjs", "http://localhost/");
        assert!(launcher.stop().is_ok());
        assert!(!launcher.is_running());
    }

    #[test]
    fn start_reports_missing_binary() {
        let mut launcher =
            ProcessLauncher::new("ghost", "definitely-not-a-browser-binary", "http://localhost/");
        let err = launcher.start().unwrap_err();
        assert!(matches!(err, Error::Launcher(_)));
        assert!(!launcher.is_running());
    }

    #[cfg(unix)]
    #[test]
    fn start_then_stop_kills_process() {
        // The URL slot carries the sleep duration.
        let mut launcher = ProcessLauncher::new("sleeper", "sleep", "30");

        launcher.start().unwrap();
        assert!(launcher.is_running());

        launcher.stop().unwrap();
        assert!(!launcher.is_running());
    }
}
