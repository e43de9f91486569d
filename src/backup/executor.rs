use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::WithMsg;
use derive_more::Display;
use std::process::Command;

/// Exit status of one external tool invocation.
///
/// `code` is `None` when the process was terminated by a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[display("{}", code.map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}")))]
pub struct ToolStatus {
    pub code: Option<i32>,
}

impl ToolStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ToolStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Runs the external synchronization tool and blocks until it exits.
pub trait CommandExecutor {
    fn execute(&self, program: &str, args: &[String]) -> Result<ToolStatus>;
}

/// Spawns the tool as a child process with inherited stdio, so its
/// progress output goes straight to the terminal.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn execute(&self, program: &str, args: &[String]) -> Result<ToolStatus> {
        Command::new(program)
            .args(args)
            .status()
            .map(ToolStatus::from)
            .map_err(Error::from)
            .with_msg(format!("Failed to launch {program:?}"))
    }
}
