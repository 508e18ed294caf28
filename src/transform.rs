//! Source transformation from the spec dialect to what the browser runs.
//!
//! The transpiler itself lives outside this crate. [`CommandTransformer`]
//! drives one as an external CLI; [`PassthroughTransformer`] is used when specs
//! are already in the browser dialect.

use std::io::Write;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Syntax preset handed to the transpiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// ES2015+ down to browser-compatible script.
    #[default]
    Es2015,
}

impl Preset {
    /// Returns the preset name as the transpiler expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Es2015 => "es2015",
        }
    }
}

/// Options passed with every transform call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    /// Presets applied in order.
    pub presets: Vec<Preset>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            presets: vec![Preset::Es2015],
        }
    }
}

/// Output of a transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    /// Transpiled source text.
    pub code: String,
}

/// Converts spec source text into browser-ready script.
pub trait SourceTransformer {
    /// Transforms one source text.
    fn transform(&self, source: &str, options: &TransformOptions) -> Result<TransformOutput>;
}

impl<T: SourceTransformer + ?Sized> SourceTransformer for Box<T> {
    fn transform(&self, source: &str, options: &TransformOptions) -> Result<TransformOutput> {
        (**self).transform(source, options)
    }
}

/// Returns the source unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTransformer;

impl SourceTransformer for PassthroughTransformer {
    fn transform(&self, source: &str, _options: &TransformOptions) -> Result<TransformOutput> {
        Ok(TransformOutput {
            code: source.to_string(),
        })
    }
}

/// Pipes source through an external transpiler CLI (stdin to stdout).
#[derive(Debug, Clone)]
pub struct CommandTransformer {
    /// Program to invoke.
    program: String,
    /// Fixed arguments placed before the preset flag.
    args: Vec<String>,
    /// Flag used to pass presets, if any.
    preset_flag: Option<String>,
}

impl CommandTransformer {
    /// Creates a transformer that runs `program`, passing presets with `--presets`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            preset_flag: Some("--presets".to_string()),
        }
    }

    /// Builds a transformer from a whitespace separated command line.
    pub fn from_command_line(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::Config("transform command is empty".to_string()))?;
        Ok(Self::new(program).with_args(parts))
    }

    /// Appends fixed arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Stops passing presets on the command line.
    pub fn without_preset_flag(mut self) -> Self {
        self.preset_flag = None;
        self
    }

    /// Builds the argument list for one invocation.
    fn build_args(&self, options: &TransformOptions) -> Vec<String> {
        let mut args = self.args.clone();

        if let Some(flag) = &self.preset_flag {
            if !options.presets.is_empty() {
                args.push(flag.clone());
                args.push(
                    options
                        .presets
                        .iter()
                        .map(Preset::as_str)
                        .collect::<Vec<_>>()
                        .join(","),
                );
            }
        }

        args
    }
}

impl SourceTransformer for CommandTransformer {
    fn transform(&self, source: &str, options: &TransformOptions) -> Result<TransformOutput> {
        let args = self.build_args(options);

        tracing::debug!(program = %self.program, args = ?args, "running transpiler");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Transform(format!("failed to spawn {}: {}", self.program, e)))?;

        // Feed stdin from a separate thread so a full stdout pipe cannot stall us.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Transform("transpiler stdin unavailable".to_string()))?;
        let input = source.to_string();
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child
            .wait_with_output()
            .map_err(|e| Error::Transform(format!("failed to wait for {}: {}", self.program, e)))?;

        let written = writer
            .join()
            .map_err(|_| Error::Transform("stdin writer panicked".to_string()))?;

        // A failed exit reports stderr, never the write error it caused.
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Transform(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        match written {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                tracing::warn!(program = %self.program, "transpiler exited before reading all source");
            }
            Err(e) => {
                return Err(Error::Transform(format!("failed to write source: {}", e)));
            }
        }

        let code = String::from_utf8(output.stdout)
            .map_err(|e| Error::Transform(format!("transpiler emitted invalid UTF-8: {}", e)))?;

        Ok(TransformOutput { code })
    }
}
