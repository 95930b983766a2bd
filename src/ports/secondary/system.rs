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
    ControllerInventory, CpuFacts, HdfsFacts, MemoryFacts, OsFacts, PciInventory, SystemError,
};
use async_trait::async_trait;

/// Secondary port - Host file access
///
/// Kernel pseudo-files and release files are read through this interface so
/// that collection can run against a captured filesystem tree.
#[async_trait]
pub trait HostFiles: Send + Sync {
    /// Read a whole file as text
    ///
    /// # Arguments
    /// * `path` - Absolute path on the described host, e.g. "/proc/cpuinfo"
    ///
    /// # Returns
    /// * `Ok(String)` - File contents
    /// * `Err(SystemError)` - Missing or unreadable file
    async fn read_to_string(&self, path: &str) -> Result<String, SystemError>;

    /// Check whether a file or directory exists
    async fn exists(&self, path: &str) -> bool;
}

/// Secondary port - System information provider
///
/// One method per report section. Each method gathers raw text through the
/// command and file ports and returns parsed facts.
#[async_trait]
pub trait SystemInfoProvider: Send + Sync {
    /// Collect DIMM layout and kernel-visible memory
    ///
    /// # Returns
    /// * `Ok(MemoryFacts)` - Memory details; DIMMs are empty without root
    /// * `Err(SystemError)` - Error collecting memory info
    async fn get_memory_facts(&self) -> Result<MemoryFacts, SystemError>;

    /// Collect CPU topology
    ///
    /// # Returns
    /// * `Ok(CpuFacts)` - CPU topology
    /// * `Err(SystemError)` - /proc/cpuinfo could not be read
    async fn get_cpu_facts(&self) -> Result<CpuFacts, SystemError>;

    /// Collect distribution, kernel and tunables
    async fn get_os_facts(&self) -> Result<OsFacts, SystemError>;

    /// Collect HP Smart Array controllers and drives
    ///
    /// # Returns
    /// * `Ok(Some(ControllerInventory))` - hpacucli found controllers
    /// * `Ok(None)` - hpacucli is not installed or found no controllers
    /// * `Err(SystemError)` - Error running hpacucli
    async fn get_hp_inventory(&self) -> Result<Option<ControllerInventory>, SystemError>;

    /// Collect LSI MegaRAID adapters and drives
    ///
    /// # Returns
    /// * `Ok(Some(ControllerInventory))` - MegaCli found adapters
    /// * `Ok(None)` - MegaCli is not installed or found no adapters
    /// * `Err(SystemError)` - Error running MegaCli
    async fn get_lsi_inventory(&self) -> Result<Option<ControllerInventory>, SystemError>;

    /// Collect network controllers and PCIe flash cards
    async fn get_pci_inventory(&self) -> Result<PciInventory, SystemError>;

    /// Probe the HDFS client configuration
    ///
    /// # Returns
    /// * `Ok(Some(HdfsFacts))` - hdfs is on the PATH
    /// * `Ok(None)` - hdfs is not installed
    /// * `Err(SystemError)` - Error running hdfs
    async fn get_hdfs_facts(&self) -> Result<Option<HdfsFacts>, SystemError>;
}
