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

use crate::domain::{MachineDescription, OutputFormat, PublishError, ReportConfig, ReportError};
use async_trait::async_trait;

/// Primary port - Main interface offered by the machine description domain
///
/// This is what external systems (the CLI, library consumers) use to describe
/// the current machine.
#[async_trait]
pub trait DescriptionService: Send + Sync {
    /// Describe the current machine
    ///
    /// Sections that cannot be collected are left out of the description
    /// rather than failing the call.
    ///
    /// # Arguments
    /// * `config` - Which sections to collect
    ///
    /// # Returns
    /// * `Ok(MachineDescription)` - Collected facts
    /// * `Err(ReportError)` - The request itself was unusable
    async fn describe(&self, config: ReportConfig) -> Result<MachineDescription, ReportError>;

    /// Write a description in the requested format
    ///
    /// # Arguments
    /// * `description` - The description to write
    /// * `format` - Text report or structured output
    ///
    /// # Returns
    /// * `Ok(())` - Description written
    /// * `Err(PublishError)` - Serialization or output failed
    async fn publish(
        &self,
        description: &MachineDescription,
        format: OutputFormat,
    ) -> Result<(), PublishError>;
}
