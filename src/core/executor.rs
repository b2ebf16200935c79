//! Script execution.
//!
//! Command and router scripts are spawned with inherited stdio. The
//! interpreter is chosen from the file extension; files with an unknown
//! extension are executed directly.

use std::path::{Path, PathBuf};
use std::process::{Command as ProcessCommand, ExitStatus, Stdio};
use std::time::{Duration, Instant};

/// Extensions recognised as command scripts.
pub const SCRIPT_EXTENSIONS: &[&str] = &["sh", "bash", "py", "js", "rb", "ps1"];

/// Result of running a script.
#[derive(Debug)]
pub struct ExecutionResult {
    /// Exit status of the script
    pub status: ExitStatus,

    /// Standard output (if captured)
    pub stdout: Option<String>,

    /// Time taken to execute
    pub duration: Duration,
}

impl ExecutionResult {
    /// Check if the script succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Get the exit code; a signal-terminated script reports 1.
    pub fn code(&self) -> i32 {
        self.status.code().unwrap_or(1)
    }
}

/// A script invocation.
#[derive(Debug, Clone)]
pub struct Script {
    /// Script file
    pub path: PathBuf,

    /// Positional arguments
    pub args: Vec<String>,

    /// Extra environment variables
    pub env: Vec<(String, String)>,

    /// Working directory; the caller's when unset
    pub working_dir: Option<PathBuf>,
}

impl Script {
    /// Create a new invocation of the script at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), args: Vec::new(), env: Vec::new(), working_dir: None }
    }

    /// Append positional arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Run the script in `dir` instead of the caller's working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// Script executor.
#[derive(Debug, Default)]
pub struct Executor {
    /// Whether to capture stdout (vs pass through to terminal)
    pub capture_output: bool,
}

impl Executor {
    /// Create a new executor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to capture output.
    #[must_use]
    pub fn capture(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    /// Run a script to completion.
    pub fn execute(&self, script: &Script) -> anyhow::Result<ExecutionResult> {
        let start = Instant::now();

        let mut cmd = match interpreter_for(&script.path) {
            Some(interpreter) => {
                let mut cmd = ProcessCommand::new(interpreter);
                cmd.arg(&script.path);
                cmd
            }
            None => ProcessCommand::new(&script.path),
        };
        cmd.args(&script.args);

        if let Some(dir) = &script.working_dir {
            cmd.current_dir(dir);
        }

        for (key, value) in &script.env {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
        cmd.stdout(if self.capture_output { Stdio::piped() } else { Stdio::inherit() });

        tracing::debug!(script = %script.path.display(), args = ?script.args, "Running script");

        let output = cmd
            .output()
            .map_err(|e| anyhow::anyhow!("Failed to run {}: {e}", script.path.display()))?;

        let duration = start.elapsed();
        let stdout = self
            .capture_output
            .then(|| String::from_utf8_lossy(&output.stdout).to_string());

        tracing::debug!(
            script = %script.path.display(),
            code = ?output.status.code(),
            elapsed_ms = duration.as_millis() as u64,
            "Script finished"
        );

        Ok(ExecutionResult { status: output.status, stdout, duration })
    }
}

/// Get the interpreter for a script based on its extension.
pub fn interpreter_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    match ext {
        "sh" => Some("sh"),
        "bash" => Some("bash"),
        "py" => Some(if cfg!(windows) { "python" } else { "python3" }),
        "js" => Some("node"),
        "rb" => Some("ruby"),
        "ps1" => Some("pwsh"),
        _ => None,
    }
}

/// Check if a file name has a recognised script extension.
pub fn is_script(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SCRIPT_EXTENSIONS.contains(&ext))
}
