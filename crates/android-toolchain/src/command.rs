//! Tool Commands
//!
//! Foreground invocation of external build tools. Output is streamed to the
//! terminal as it is produced; only the exit status is observed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use xcompile_core::{Result, XcompileError};

use crate::env::BuildEnvironment;

/// One external tool invocation
#[derive(Debug, Clone)]
pub struct ToolCommand {
    phase: String,
    program: PathBuf,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    env: Option<BuildEnvironment>,
}

impl ToolCommand {
    /// Command for `phase` running `program`
    pub fn new(phase: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        Self {
            phase: phase.into(),
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Run with exactly `env` instead of the inherited environment
    pub fn env(mut self, env: BuildEnvironment) -> Self {
        self.env = Some(env);
        self
    }

    pub fn phase(&self) -> &str {
        &self.phase
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    pub fn get_env(&self) -> Option<&BuildEnvironment> {
        self.env.as_ref()
    }

    /// Run in the foreground and fail on a non-zero exit status
    pub async fn run(&self) -> Result<()> {
        debug!("Running [{}]: {}", self.phase, self);

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }

        if let Some(ref env) = self.env {
            cmd.env_clear();
            for (key, value) in env {
                cmd.env(key, value);
            }
        }

        let status = cmd.status().await.map_err(|e| XcompileError::BuildToolFailure {
            phase: self.phase.clone(),
            command: self.to_string(),
            status: format!("failed to start: {}", e),
        })?;

        if !status.success() {
            return Err(XcompileError::BuildToolFailure {
                phase: self.phase.clone(),
                command: self.to_string(),
                status: status.to_string(),
            });
        }

        Ok(())
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
