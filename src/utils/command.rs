//! Command execution primitives with consistent error handling.

use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde::Serialize;

/// Captured output from command execution.
/// Reusable primitive for any command that executes external processes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CapturedOutput {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl CapturedOutput {
    pub fn new(stdout: String, stderr: String, success: bool, exit_code: Option<i32>) -> Self {
        Self {
            stdout,
            stderr,
            success,
            exit_code,
        }
    }

    pub fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            exit_code: output.status.code(),
        }
    }
}

fn command_in(dir: Option<&Path>, program: &str, args: &[String]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }
    cmd
}

/// Run a command quietly and capture both streams, whatever the exit status.
pub fn capture_in(dir: Option<&Path>, program: &str, args: &[String]) -> io::Result<CapturedOutput> {
    let output = command_in(dir, program, args)
        .stdin(Stdio::null())
        .output()?;
    Ok(CapturedOutput::from_output(&output))
}

/// Run a command with stdout inherited and stderr echoed line by line to our
/// own stderr while it is also collected.
///
/// The collected stderr is what failure classification works from; the
/// operator still sees everything as it happens.
pub fn run_streaming_in(
    dir: Option<&Path>,
    program: &str,
    args: &[String],
) -> io::Result<CapturedOutput> {
    let mut child = command_in(dir, program, args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::piped())
        .spawn()?;

    let mut collected = String::new();
    if let Some(stderr) = child.stderr.take() {
        let reader = BufReader::new(stderr);
        let console = io::stderr();
        for line in reader.lines() {
            let line = line.unwrap_or_default();
            let mut handle = console.lock();
            writeln!(handle, "{}", line).ok();
            collected.push_str(&line);
            collected.push('\n');
        }
    }

    let status = child.wait()?;
    Ok(CapturedOutput::new(
        String::new(),
        collected,
        status.success(),
        status.code(),
    ))
}

/// Extract error text from command output.
///
/// Prefers stderr, falls back to stdout if stderr is empty.
pub fn error_text(output: &CapturedOutput) -> String {
    if !output.stderr.trim().is_empty() {
        output.stderr.trim().to_string()
    } else {
        output.stdout.trim().to_string()
    }
}
