//! Typed git operations over a `CommandRunner`.
//!
//! Every call runs `git` inside one working tree. Mutating commands go through
//! `CommandRunner::run` (live output, retry); probes use `capture` and look at
//! the exit status or stdout.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::runner::{CommandRunner, CommandSpec};
use crate::utils::command::CapturedOutput;

pub const GIT: &str = "git";

pub struct Git<'a, R: CommandRunner> {
    runner: &'a R,
    work_dir: PathBuf,
}

impl<'a, R: CommandRunner> Git<'a, R> {
    pub fn new(runner: &'a R, work_dir: &Path) -> Self {
        Self {
            runner,
            work_dir: work_dir.to_path_buf(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn spec(&self, args: &[&str]) -> CommandSpec {
        CommandSpec::new(GIT, args.iter().copied()).in_dir(&self.work_dir)
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        self.runner.run(&self.spec(args))?;
        Ok(())
    }

    fn capture(&self, args: &[&str]) -> Result<CapturedOutput> {
        self.runner.capture(&self.spec(args))
    }

    /// `git --version`; any failure means git is not usable.
    pub fn version(&self) -> Result<String> {
        match self.capture(&["--version"]) {
            Ok(out) if out.success => Ok(out.stdout.trim().to_string()),
            _ => Err(Error::tool_missing(GIT)),
        }
    }

    pub fn is_repository(&self) -> bool {
        self.work_dir.join(".git").exists()
    }

    pub fn init(&self) -> Result<()> {
        self.run(&["init"])
    }

    /// Create or reset `branch` and check it out.
    pub fn checkout_branch(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", "-B", branch])
    }

    /// Effective value of a config key, `None` when unset or blank.
    pub fn config_get(&self, key: &str) -> Result<Option<String>> {
        let out = self.capture(&["config", "--get", key])?;
        if !out.success {
            return Ok(None);
        }
        let value = out.stdout.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }

    pub fn config_set(&self, key: &str, value: &str) -> Result<()> {
        self.run(&["config", key, value])
    }

    /// Set `key` only when it has no value yet. Returns true if it was written.
    pub fn config_set_if_missing(&self, key: &str, value: &str) -> Result<bool> {
        if self.config_get(key)?.is_some() {
            return Ok(false);
        }
        self.config_set(key, value)?;
        Ok(true)
    }

    /// Names of the configured remotes.
    pub fn remotes(&self) -> Result<Vec<String>> {
        let out = self.capture(&["remote"])?;
        if !out.success {
            return Err(Error::git_command_failed(format!(
                "git remote failed: {}",
                out.stderr.trim()
            )));
        }
        Ok(out
            .stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    pub fn remote_add(&self, name: &str, url: &str) -> Result<()> {
        self.run(&["remote", "add", name, url])
    }

    pub fn remote_set_url(&self, name: &str, url: &str) -> Result<()> {
        self.run(&["remote", "set-url", name, url])
    }

    pub fn add_all(&self) -> Result<()> {
        self.run(&["add", "--all"])
    }

    /// Probe the index: `diff --cached --quiet` exits 0 when nothing is staged
    /// and 1 when something is.
    pub fn has_staged_changes(&self) -> Result<bool> {
        let out = self.capture(&["diff", "--cached", "--quiet"])?;
        match out.exit_code {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            code => Err(Error::git_command_failed(format!(
                "git diff --cached --quiet exited with {:?}: {}",
                code,
                out.stderr.trim()
            ))),
        }
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message])
    }

    pub fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", "-u", remote, branch])
    }
}
