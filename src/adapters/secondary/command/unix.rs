/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Unix command execution adapter

use crate::domain::{CommandError, SystemError};
use crate::ports::{CommandExecutor, CommandOutput, SystemCommand};
use async_trait::async_trait;
use log::debug;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Unix-based command executor that handles privilege escalation and timeouts
///
/// Each command runs exactly once. Privileged commands go through
/// `sudo -n` unless the process already runs as root or escalation is
/// disabled, in which case they run directly and may fail for lack of access.
pub struct UnixCommandExecutor {
    /// Timeout applied when a command does not set its own; none by default
    default_timeout: Option<Duration>,
    /// Whether privileged commands are prefixed with `sudo -n`
    escalate: bool,
}

impl UnixCommandExecutor {
    /// Create a new Unix command executor
    ///
    /// # Arguments
    /// * `default_timeout` - Timeout for commands that do not set one
    /// * `allow_sudo` - Use `sudo -n` for privileged commands when not root
    pub fn new(default_timeout: Option<Duration>, allow_sudo: bool) -> Self {
        let escalate = allow_sudo && !Self::running_as_root();
        if allow_sudo && !escalate {
            debug!("Running as root, privileged commands run without sudo");
        }
        Self {
            default_timeout,
            escalate,
        }
    }

    /// Create a Unix command executor with default settings
    pub fn with_defaults() -> Self {
        Self::new(None, true)
    }

    /// Check if the process runs with an effective UID of 0
    pub fn running_as_root() -> bool {
        let euid = unsafe { libc::geteuid() };
        euid == 0
    }

    fn build_command(&self, command: &SystemCommand, privileged: bool) -> Command {
        let mut cmd = if privileged && self.escalate {
            let mut sudo_cmd = Command::new("sudo");
            sudo_cmd.arg("-n").arg(&command.program);
            sudo_cmd.args(&command.args);
            sudo_cmd
        } else {
            let mut base_cmd = Command::new(&command.program);
            base_cmd.args(&command.args);
            base_cmd
        };

        if let Some(ref env_vars) = command.env_vars {
            for (key, value) in env_vars {
                cmd.env(key, value);
            }
        }

        cmd.stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    /// Execute a command once
    async fn execute_once(
        &self,
        command: &SystemCommand,
        privileged: bool,
    ) -> Result<CommandOutput, CommandError> {
        let mut cmd = self.build_command(command, privileged);
        debug!(
            "Executing: {}{}",
            if privileged && self.escalate {
                "sudo -n "
            } else {
                ""
            },
            command.command_line()
        );

        let output = match command.timeout.or(self.default_timeout) {
            Some(limit) => timeout(limit, cmd.output())
                .await
                .map_err(|_| CommandError::TimedOut {
                    program: command.program.clone(),
                    seconds: limit.as_secs(),
                })?,
            None => cmd.output().await,
        };

        let output = output.map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                CommandError::System(SystemError::CommandNotFound(command.program.clone()))
            }
            ErrorKind::PermissionDenied => {
                CommandError::System(SystemError::PermissionDenied(command.program.clone()))
            }
            _ => CommandError::ExecutionFailed(format!(
                "Failed to execute command '{}': {}",
                command.program, e
            )),
        })?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
            success: output.status.success(),
        };

        if !result.success {
            debug!(
                "Command '{}' exited with {:?}: {}",
                command.program,
                result.exit_code,
                result.stderr.trim()
            );
        }

        Ok(result)
    }
}

#[async_trait]
impl CommandExecutor for UnixCommandExecutor {
    async fn execute(&self, command: &SystemCommand) -> Result<CommandOutput, CommandError> {
        self.execute_once(command, false).await
    }

    async fn execute_with_privileges(
        &self,
        command: &SystemCommand,
    ) -> Result<CommandOutput, CommandError> {
        self.execute_once(command, true).await
    }
}
