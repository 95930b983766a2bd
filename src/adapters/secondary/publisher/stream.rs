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

//! Publisher that writes a rendered description to stdout or a file

use crate::domain::{render_text, MachineDescription, OutputFormat, PublishError};
use crate::ports::ReportPublisher;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Where a rendered description is written
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OutputTarget {
    #[default]
    Stdout,
    File(PathBuf),
}

/// Render a description in the requested format
pub fn render(description: &MachineDescription, format: OutputFormat) -> Result<String, PublishError> {
    match format {
        OutputFormat::Text => Ok(render_text(description)),
        OutputFormat::Json => serde_json::to_string_pretty(description)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| {
                PublishError::SerializationFailed(format!("JSON serialization failed: {}", e))
            }),
        OutputFormat::Toml => toml::to_string_pretty(description).map_err(|e| {
            PublishError::SerializationFailed(format!("TOML serialization failed: {}", e))
        }),
    }
}

/// Writes descriptions to standard output or a file
pub struct StreamPublisher {
    target: OutputTarget,
}

impl StreamPublisher {
    pub fn new(target: OutputTarget) -> Self {
        Self { target }
    }

    /// Publisher that prints to standard output
    pub fn stdout() -> Self {
        Self::new(OutputTarget::Stdout)
    }
}

impl Default for StreamPublisher {
    fn default() -> Self {
        Self::stdout()
    }
}

#[async_trait]
impl ReportPublisher for StreamPublisher {
    async fn publish(
        &self,
        description: &MachineDescription,
        format: OutputFormat,
    ) -> Result<(), PublishError> {
        let rendered = render(description, format)?;

        match &self.target {
            OutputTarget::Stdout => {
                let mut stdout = tokio::io::stdout();
                stdout
                    .write_all(rendered.as_bytes())
                    .await
                    .map_err(|e| PublishError::WriteFailed(format!("stdout: {}", e)))?;
                stdout
                    .flush()
                    .await
                    .map_err(|e| PublishError::WriteFailed(format!("stdout: {}", e)))?;
            }
            OutputTarget::File(path) => {
                // Ensure parent directory exists
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).await.map_err(|e| {
                        PublishError::WriteFailed(format!("Failed to create directory: {}", e))
                    })?;
                }

                fs::write(path, rendered).await.map_err(|e| {
                    PublishError::WriteFailed(format!(
                        "Failed to write {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }
}
