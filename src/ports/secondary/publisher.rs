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

use crate::domain::{MachineDescription, OutputFormat, PublishError};
use async_trait::async_trait;

/// Secondary port - Description output abstraction
///
/// This interface abstracts where finished descriptions go (standard output,
/// a file, an in-memory buffer for tests).
#[async_trait]
pub trait ReportPublisher: Send + Sync {
    /// Render and write a description
    ///
    /// # Arguments
    /// * `description` - The description to write
    /// * `format` - Output format
    ///
    /// # Returns
    /// * `Ok(())` - Description written
    /// * `Err(PublishError)` - Serialization or write failed
    async fn publish(
        &self,
        description: &MachineDescription,
        format: OutputFormat,
    ) -> Result<(), PublishError>;
}
