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

use thiserror::Error;

/// Errors specific to the machine description service
#[derive(Debug, Clone, Error)]
pub enum ReportError {
    /// The current platform has no system information provider
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
    /// Description assembly failed
    #[error("Report generation failed: {0}")]
    GenerationFailed(String),
}

/// Errors raised while writing a finished description
#[derive(Debug, Clone, Error)]
pub enum PublishError {
    /// Serialization to the requested format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),
    /// Writing to the output stream failed
    #[error("Write failed: {0}")]
    WriteFailed(String),
}

/// System-level errors for adapters (not exposed to the report)
#[derive(Debug, Clone, Error)]
pub enum SystemError {
    /// Command execution failed
    #[error("Command '{command}' failed{}", failure_detail(.exit_code, .stderr))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },
    /// Command not found at any known location
    #[error("Command not found: {0}")]
    CommandNotFound(String),
    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    /// I/O operation failed
    #[error("I/O error: {0}")]
    IoError(String),
    /// Timeout
    #[error("Timeout: {0}")]
    Timeout(String),
}

fn failure_detail(exit_code: &Option<i32>, stderr: &str) -> String {
    let mut detail = String::new();
    if let Some(code) = exit_code {
        detail.push_str(&format!(" with exit code {code}"));
    }
    if !stderr.is_empty() {
        detail.push_str(&format!(": {stderr}"));
    }
    detail
}

/// Command execution errors
#[derive(Debug, Clone, Error)]
pub enum CommandError {
    /// System error occurred
    #[error("{0}")]
    System(#[from] SystemError),
    /// Command could not be spawned or waited on
    #[error("Command execution failed: {0}")]
    ExecutionFailed(String),
    /// Command exceeded its configured timeout
    #[error("Command '{program}' timed out after {seconds}s")]
    TimedOut { program: String, seconds: u64 },
}

impl From<CommandError> for SystemError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::System(sys_err) => sys_err,
            CommandError::ExecutionFailed(msg) => SystemError::IoError(msg),
            CommandError::TimedOut { program, seconds } => {
                SystemError::Timeout(format!("{program} after {seconds}s"))
            }
        }
    }
}
