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

use crate::domain::{
    CpuFacts, MachineDescription, OutputFormat, PublishError, ReportConfig, ReportError, Section,
    StorageFacts, SystemError,
};
use crate::ports::{DescriptionService, ReportPublisher, SystemInfoProvider};
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;

/// Domain service that implements machine description collection
///
/// Sections are collected one after another in report order. A section
/// whose collection fails is logged and left out; it never aborts the others.
pub struct DescriptionCollectionService {
    /// System information provider (platform-specific)
    system_provider: Arc<dyn SystemInfoProvider>,
    /// Output for finished descriptions
    publisher: Arc<dyn ReportPublisher>,
}

impl DescriptionCollectionService {
    /// Create a new description collection service
    ///
    /// # Arguments
    /// * `system_provider` - Platform-specific system information provider
    /// * `publisher` - Output for finished descriptions
    pub fn new(
        system_provider: Arc<dyn SystemInfoProvider>,
        publisher: Arc<dyn ReportPublisher>,
    ) -> Self {
        Self {
            system_provider,
            publisher,
        }
    }
}

/// Keep a collected section, or log the failure and drop it
fn degrade<T>(section: &str, result: Result<T, SystemError>) -> Option<T> {
    match result {
        Ok(facts) => Some(facts),
        Err(e) => {
            warn!("{section} information unavailable: {e}");
            None
        }
    }
}

#[async_trait]
impl DescriptionService for DescriptionCollectionService {
    async fn describe(&self, config: ReportConfig) -> Result<MachineDescription, ReportError> {
        if config.sections.is_empty() {
            return Err(ReportError::GenerationFailed(
                "no report sections selected".to_string(),
            ));
        }

        let provider = &self.system_provider;
        let mut description = MachineDescription::default();

        if config.includes(Section::Memory) {
            description.memory = degrade("Memory", provider.get_memory_facts().await);
        }
        if config.includes(Section::Cpu) {
            description.cpu = degrade("CPU", provider.get_cpu_facts().await);
        }
        if config.includes(Section::Os) {
            description.os = degrade("Operating system", provider.get_os_facts().await);
        }
        if config.includes(Section::Storage) {
            let hp = degrade("HP controller", provider.get_hp_inventory().await).flatten();
            let lsi = degrade("LSI controller", provider.get_lsi_inventory().await).flatten();
            if hp.is_none() && lsi.is_none() {
                debug!("No supported RAID controller software found");
            }
            description.storage = Some(StorageFacts { hp, lsi });
        }
        if config.includes(Section::Network) {
            description.adapters = degrade("PCI adapter", provider.get_pci_inventory().await);
        }
        if config.includes(Section::Hdfs) {
            description.hdfs = degrade("HDFS", provider.get_hdfs_facts().await).flatten();
        }

        description.effective_cores = description
            .cpu
            .as_ref()
            .map(CpuFacts::effective_cores)
            .unwrap_or(0);
        debug!("Effective cores: {}", description.effective_cores);

        Ok(description)
    }

    async fn publish(
        &self,
        description: &MachineDescription,
        format: OutputFormat,
    ) -> Result<(), PublishError> {
        self.publisher.publish(description, format).await
    }
}
