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

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Describes one machine (root aggregate)
///
/// Each section is `None` when it was not requested or could not be
/// collected at all. A RAID vendor whose tool is absent is `None` inside
/// [`StorageFacts`].
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct MachineDescription {
    /// DIMM layout and kernel-visible memory
    pub memory: Option<MemoryFacts>,
    /// CPU package/core/thread topology
    pub cpu: Option<CpuFacts>,
    /// Distribution, kernel and tunables
    pub os: Option<OsFacts>,
    /// RAID controllers, logical volumes and physical drives
    pub storage: Option<StorageFacts>,
    /// PCI network and flash adapters
    pub adapters: Option<PciInventory>,
    /// HDFS block size probe
    pub hdfs: Option<HdfsFacts>,
    /// Effective core count (packages x cores, or threads when virtual)
    pub effective_cores: u32,
}

/// Memory information
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct MemoryFacts {
    /// Manufacturer and product name from the DMI system block
    pub system_label: String,
    /// MemTotal as reported by the kernel, in KB
    pub kernel_total_kb: Option<u64>,
    /// DIMM histogram in ascending size order
    pub dimms: Vec<DimmGroup>,
    /// Clock speed of the last populated DIMM seen
    pub speed: Option<String>,
}

impl MemoryFacts {
    /// Installed capacity in GB, summed over the DIMM histogram
    pub fn total_gb(&self) -> u64 {
        self.dimms
            .iter()
            .map(|group| group.size_gb as u64 * group.count as u64)
            .sum()
    }
}

/// Identical DIMMs grouped by size
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DimmGroup {
    /// Module size in GB
    pub size_gb: u32,
    /// Number of modules of this size
    pub count: u32,
}

/// CPU vendor, used to decide whether hyperthreading is reported
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum CpuBrand {
    #[default]
    Intel,
    Amd,
    Other,
}

/// CPU topology derived from /proc/cpuinfo
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct CpuFacts {
    /// Distinct physical packages; zero on virtual machines
    pub packages: u32,
    /// Cores per package
    pub cores_per_package: u32,
    /// Hardware threads (processor entries)
    pub threads: u32,
    /// More threads than physical cores
    pub hyperthreading: bool,
    /// CPU vendor
    pub brand: CpuBrand,
    /// Model name with vendor boilerplate removed
    pub model: String,
}

impl CpuFacts {
    /// No package topology is exposed (Amazon and other virtual machines)
    pub fn virtualized(&self) -> bool {
        self.packages == 0
    }

    /// Cores available to workloads
    pub fn effective_cores(&self) -> u32 {
        if self.virtualized() {
            self.threads
        } else {
            self.cores_per_package.saturating_mul(self.packages)
        }
    }
}

impl fmt::Display for CpuFacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.virtualized() {
            return write!(f, "{} x {} (virtual)", self.threads, self.model);
        }

        if self.packages > 1 {
            write!(f, "{} x ", self.packages)?;
        }
        write!(f, "{} ", self.model)?;

        if self.cores_per_package != 1 {
            write!(f, "{} cores", self.cores_per_package)?;
            if self.packages > 1 {
                write!(f, " each")?;
            }
        } else {
            write!(f, "single-core")?;
        }

        if self.brand == CpuBrand::Intel {
            if self.hyperthreading {
                write!(f, " ({} Hyperthreads)", self.threads)?;
            } else {
                write!(f, " (Hyperthreading off)")?;
            }
        }
        Ok(())
    }
}

/// State of a transparent huge page control file
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PageSetting {
    Enabled,
    Disabled,
    Unknown,
}

impl fmt::Display for PageSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSetting::Enabled => write!(f, "enabled"),
            PageSetting::Disabled => write!(f, "disabled"),
            PageSetting::Unknown => write!(f, "unknown"),
        }
    }
}

/// Transparent huge page configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HugePageFacts {
    /// Which sysfs layout was found ("Red Hat" or "Modern Linux")
    pub variant: String,
    pub enabled: PageSetting,
    pub defrag: PageSetting,
}

/// vm.overcommit_memory mode
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Overcommit {
    Enabled,
    Maybe,
    Disabled,
}

impl fmt::Display for Overcommit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Overcommit::Enabled => write!(f, "enabled"),
            Overcommit::Maybe => write!(f, "maybe"),
            Overcommit::Disabled => write!(f, "disabled"),
        }
    }
}

/// Operating system facts
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct OsFacts {
    /// Distribution name without code name
    pub distribution: Option<String>,
    /// Kernel release
    pub kernel: Option<String>,
    /// Kernel command line minus boot noise
    pub boot_options: Vec<String>,
    pub huge_pages: Option<HugePageFacts>,
    pub overcommit: Option<Overcommit>,
}

/// RAID striping of a logical volume
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Stripe {
    /// Strip (chunk) size in KB
    pub chunk_kb: u64,
    /// Number of data drives in a full stripe
    pub width: u64,
}

/// A controller-presented virtual disk
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct LogicalVolume {
    /// Volume number, unique only within its controller
    pub id: u32,
    pub capacity: Option<String>,
    pub state: Option<String>,
    pub raid_level: Option<String>,
    pub stripe: Option<Stripe>,
    pub cache_policy: Option<String>,
    pub disk_name: Option<String>,
}

impl LogicalVolume {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// One-line description: capacity, topology, state, cache policy, disk
    pub fn description(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(capacity) = &self.capacity {
            parts.push(capacity.clone());
        }
        if let Some(stripe) = &self.stripe {
            parts.push(format!("{} KB X {}", stripe.chunk_kb, stripe.width));
        }
        if let Some(level) = &self.raid_level {
            parts.push(format!("RAID {level}"));
        }
        if let Some(state) = &self.state {
            parts.push(state.clone());
        }
        if let Some(policy) = &self.cache_policy {
            parts.push(policy.clone());
        }
        if let Some(disk) = &self.disk_name {
            parts.push(disk.clone());
        }
        parts.join(" ")
    }
}

/// RAID/HBA adapter identity from the enumeration query
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Controller {
    pub id: String,
    pub description: String,
}

/// Logical volumes found under one controller
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ControllerSection {
    /// Controller heading; `None` for volumes listed before any controller line
    pub label: Option<String>,
    /// Volumes in ascending id order
    pub volumes: Vec<LogicalVolume>,
}

/// Identical physical drives grouped by model
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PhysicalDriveGroup {
    pub model: String,
    pub count: u32,
    /// Vendor-formatted size of the last drive seen
    pub size: String,
    /// Inferred or reported speed class; empty when unknown
    pub speed: String,
}

/// RAID tool family
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum RaidVendor {
    /// HP Smart Array via hpacucli
    Hp,
    /// LSI MegaRAID via MegaCli
    Lsi,
}

impl fmt::Display for RaidVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaidVendor::Hp => write!(f, "HP"),
            RaidVendor::Lsi => write!(f, "LSI"),
        }
    }
}

/// Everything one RAID tool reported
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ControllerInventory {
    pub vendor: RaidVendor,
    pub controllers: Vec<ControllerSection>,
    /// Drive histogram in first-seen order
    pub drives: Vec<PhysicalDriveGroup>,
}

impl ControllerInventory {
    pub fn volume_count(&self) -> usize {
        self.controllers.iter().map(|c| c.volumes.len()).sum()
    }
}

/// Storage controller facts for both supported vendors
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct StorageFacts {
    pub hp: Option<ControllerInventory>,
    pub lsi: Option<ControllerInventory>,
}

/// PCI functions grouped by normalized description
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AdapterGroup {
    pub description: String,
    pub count: u32,
}

/// Network and flash adapters found on the PCI bus
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PciInventory {
    pub storage: Vec<AdapterGroup>,
    pub network: Vec<AdapterGroup>,
}

/// HDFS configuration relevant to performance
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HdfsFacts {
    /// dfs.blocksize in MB; `None` when it could not be parsed
    pub block_size_mb: Option<u64>,
    /// dfs.datanode.max.transfer.threads as printed by the tool
    pub transfer_threads: String,
}

/// Report sections that can be selected individually
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Memory,
    Cpu,
    Os,
    Storage,
    Network,
    Hdfs,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Memory,
        Section::Cpu,
        Section::Os,
        Section::Storage,
        Section::Network,
        Section::Hdfs,
    ];
}

/// Configuration for description generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Sections to collect; collection order is fixed regardless of this set
    pub sections: BTreeSet<Section>,
}

impl ReportConfig {
    /// Collect only the given sections
    pub fn with_sections<I: IntoIterator<Item = Section>>(sections: I) -> Self {
        Self {
            sections: sections.into_iter().collect(),
        }
    }

    pub fn includes(&self, section: Section) -> bool {
        self.sections.contains(&section)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::with_sections(Section::ALL)
    }
}

/// Output format for a finished description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// TOML
    Toml,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xeon(packages: u32, cores: u32, threads: u32) -> CpuFacts {
        CpuFacts {
            packages,
            cores_per_package: cores,
            threads,
            hyperthreading: threads > cores.saturating_mul(packages),
            brand: CpuBrand::Intel,
            model: "CPU X5660 @ 2.80GHz".to_string(),
        }
    }

    #[test]
    fn test_cpu_display_multi_package() {
        assert_eq!(
            xeon(2, 6, 24).to_string(),
            "2 x CPU X5660 @ 2.80GHz 6 cores each (24 Hyperthreads)"
        );
        assert_eq!(
            xeon(1, 4, 4).to_string(),
            "CPU X5660 @ 2.80GHz 4 cores (Hyperthreading off)"
        );
        assert_eq!(
            xeon(1, 1, 1).to_string(),
            "CPU X5660 @ 2.80GHz single-core (Hyperthreading off)"
        );
    }

    #[test]
    fn test_cpu_display_amd_has_no_hyperthread_clause() {
        let cpu = CpuFacts {
            brand: CpuBrand::Amd,
            model: "AMD Opteron 6174".to_string(),
            ..xeon(4, 12, 48)
        };
        assert_eq!(cpu.to_string(), "4 x AMD Opteron 6174 12 cores each");
        assert_eq!(cpu.effective_cores(), 48);
    }

    #[test]
    fn test_effective_cores_saturate() {
        assert_eq!(xeon(2, u32::MAX, 4).effective_cores(), u32::MAX);
    }

    #[test]
    fn test_cpu_virtual() {
        let cpu = xeon(0, 0, 4);
        assert!(cpu.virtualized());
        assert_eq!(cpu.to_string(), "4 x CPU X5660 @ 2.80GHz (virtual)");
        assert_eq!(cpu.effective_cores(), 4);
    }

    #[test]
    fn test_memory_total() {
        let memory = MemoryFacts {
            dimms: vec![
                DimmGroup { size_gb: 2, count: 1 },
                DimmGroup { size_gb: 16, count: 17 },
            ],
            ..Default::default()
        };
        assert_eq!(memory.total_gb(), 274);
    }

    #[test]
    fn test_logical_volume_description_order() {
        let volume = LogicalVolume {
            id: 1,
            capacity: Some("558.9 GB".to_string()),
            state: Some("OK".to_string()),
            raid_level: Some("1+0".to_string()),
            stripe: Some(Stripe { chunk_kb: 256, width: 2 }),
            cache_policy: None,
            disk_name: Some("/dev/sda".to_string()),
        };
        assert_eq!(volume.description(), "558.9 GB 256 KB X 2 RAID 1+0 OK /dev/sda");
        assert_eq!(LogicalVolume::new(3).description(), "");
    }

    #[test]
    fn test_report_config_default_includes_everything() {
        let config = ReportConfig::default();
        assert!(Section::ALL.iter().all(|s| config.includes(*s)));

        let config = ReportConfig::with_sections([Section::Cpu]);
        assert!(config.includes(Section::Cpu));
        assert!(!config.includes(Section::Memory));
    }
}
