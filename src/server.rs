//! Test server configuration surface.
//!
//! Serving itself happens outside this crate. [`StaticServer`] keeps the
//! settings a run hands over and renders the harness page that an HTTP layer
//! serves at the configured endpoint.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};

/// Configuration setters the bootstrap drives.
///
/// Setters take `&self` because the same server is shared with the runner.
pub trait TestServer: Send + Sync {
    /// Sets the port to listen on.
    fn port(&self, port: u16);

    /// Sets the path the harness page is served under.
    fn endpoint(&self, endpoint: &str);

    /// Sets the URL of the page under test.
    fn target(&self, target: &str);

    /// Sets the scripts injected into the harness page, in load order.
    fn scripts(&self, scripts: Vec<String>);

    /// Local URL of the harness page, once port and endpoint are set.
    fn url(&self) -> Option<String>;
}

/// Shared handle to a test server.
pub type ServerHandle = Arc<dyn TestServer>;

/// Snapshot of a server's settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerSettings {
    pub port: Option<u16>,
    pub endpoint: Option<String>,
    pub target: Option<String>,
    pub scripts: Vec<String>,
}

/// In-process server state.
#[derive(Debug, Default)]
pub struct StaticServer {
    settings: Mutex<ServerSettings>,
}

impl StaticServer {
    /// Creates a server with nothing configured.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ServerSettings> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the current settings.
    pub fn settings(&self) -> ServerSettings {
        self.lock().clone()
    }

    /// Renders the harness page.
    ///
    /// The page frames the target and then inlines every script in order.
    pub fn render_page(&self) -> Result<String> {
        let settings = self.lock();

        if settings.endpoint.is_none() {
            return Err(Error::Server("endpoint not configured".to_string()));
        }
        let target = settings
            .target
            .as_deref()
            .ok_or_else(|| Error::Server("target not configured".to_string()))?;

        let mut page = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n</head>\n<body>\n");
        page.push_str(&format!(
            "<iframe id=\"test-frame\" src=\"{}\"></iframe>\n",
            escape_attribute(target)
        ));
        for script in &settings.scripts {
            page.push_str("<script>\n");
            page.push_str(&escape_script(script));
            page.push_str("\n</script>\n");
        }
        page.push_str("</body>\n</html>\n");

        Ok(page)
    }
}

impl TestServer for StaticServer {
    fn port(&self, port: u16) {
        tracing::debug!(port, "server port set");
        self.lock().port = Some(port);
    }

    fn endpoint(&self, endpoint: &str) {
        tracing::debug!(endpoint = %endpoint, "server endpoint set");
        self.lock().endpoint = Some(endpoint.to_string());
    }

    fn target(&self, target: &str) {
        tracing::debug!(url = %target, "server target set");
        self.lock().target = Some(target.to_string());
    }

    fn scripts(&self, scripts: Vec<String>) {
        tracing::debug!(count = scripts.len(), "server scripts set");
        self.lock().scripts = scripts;
    }

    fn url(&self) -> Option<String> {
        let settings = self.lock();
        match (settings.port, settings.endpoint.as_deref()) {
            (Some(port), Some(endpoint)) => Some(format!("http://localhost:{}{}", port, endpoint)),
            _ => None,
        }
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// An inline script ends at the first `</script`, whatever the case.
fn escape_script(source: &str) -> String {
    let lower = source.to_ascii_lowercase();
    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    for (idx, _) in lower.match_indices("</script") {
        out.push_str(&source[last..idx]);
        out.push_str("<\\/");
        last = idx + 2;
    }
    out.push_str(&source[last..]);
    out
}
