//! Invocation of the external mkvtoolnix programs.
//!
//! Everything that spawns a process goes through [`ToolRunner`] so the
//! inspection and extraction stages can be driven by a fake in tests.

use crate::error::{DualsubError, Result};
use async_trait::async_trait;
use std::ffi::OsString;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one finished process.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into an `ExternalTool` error.
    pub fn check(self, tool: &str) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(DualsubError::ExternalTool {
                tool: tool.to_string(),
                code: self.code,
                stderr: self.stderr,
            })
        }
    }
}

#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run `program` with `args` to completion, capturing both output streams.
    async fn run(&self, program: &str, args: &[OsString]) -> Result<ToolOutput>;
}

/// Runs programs as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl ToolRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[OsString]) -> Result<ToolOutput> {
        debug!("Running {} {:?}", program, args);

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| DualsubError::ExternalTool {
                tool: program.to_string(),
                code: None,
                stderr: format!("failed to start: {e}"),
            })?;

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Check that `program` is installed and answers `--version`.
pub async fn check_tool(runner: &dyn ToolRunner, program: &str) -> Result<()> {
    let output = runner
        .run(program, &[OsString::from("--version")])
        .await
        .map_err(|e| match e {
            DualsubError::ExternalTool { tool, code, stderr } => DualsubError::ExternalTool {
                tool,
                code,
                stderr: format!(
                    "{stderr}. Install MKVToolNix and make sure it is in your PATH"
                ),
            },
            other => other,
        })?;

    output.check(program)?;
    debug!("{} is available", program);
    Ok(())
}
