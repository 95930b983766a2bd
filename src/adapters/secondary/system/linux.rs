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

//! Linux system information provider

use crate::domain::parsers::raid::{hpacucli, megacli, Listing};
use crate::domain::parsers::{
    parse_block_size, parse_boot_options, parse_cpuinfo, parse_distribution,
    parse_dmidecode_memory, parse_huge_page_setting, parse_kernel_release, parse_lspci,
    parse_meminfo_total, parse_os_release, parse_overcommit, parse_transfer_threads,
    resolve_command_path, DmiMemory,
};
use crate::domain::{
    ControllerInventory, CpuFacts, HdfsFacts, HugePageFacts, MemoryFacts, OsFacts, Overcommit,
    PageSetting, PciInventory, RaidVendor, SystemError,
};
use crate::ports::{CommandExecutor, CommandOutput, HostFiles, SystemCommand, SystemInfoProvider};
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;

const LSB_RELEASE_PATHS: &[&str] = &["/usr/bin/lsb_release", "/usr/sbin/lsb_release"];
const REDHAT_RELEASE: &str = "/etc/redhat-release";
const OS_RELEASE: &str = "/etc/os-release";
const KERNEL_RELEASE: &str = "/proc/sys/kernel/osrelease";
const KERNEL_CMDLINE: &str = "/proc/cmdline";
const CPUINFO: &str = "/proc/cpuinfo";
const MEMINFO: &str = "/proc/meminfo";
const OVERCOMMIT: &str = "/proc/sys/vm/overcommit_memory";

/// Transparent huge page control directories, with the name reported for each
const HUGE_PAGE_DIRS: &[(&str, &str)] = &[
    ("/sys/kernel/mm/redhat_transparent_hugepage", "Red Hat"),
    ("/sys/kernel/mm/transparent_hugepage", "Modern Linux"),
];

const MEGACLI_PATHS: &[&str] = &["/opt/MegaRAID/MegaCli/MegaCli64", "/usr/sbin/MegaCli64"];
const HPACUCLI_PATHS: &[&str] = &["/usr/sbin/hpacucli", "/opt/hp/hpacucli/bld/hpacucli"];

/// Build a command with a fixed locale so output parses the same everywhere
fn host_command(program: &str, args: &[&str]) -> SystemCommand {
    SystemCommand::new(program)
        .args(args)
        .env_vars(vec![("LC_ALL", "C")])
}

/// Reject a failed command that produced nothing to parse
///
/// Vendor RAID tools exit non-zero for benign reasons, so a failure with
/// usable output is still parsed.
fn checked(command: &SystemCommand, output: CommandOutput) -> Result<CommandOutput, SystemError> {
    if !output.success && output.stdout.trim().is_empty() {
        return Err(SystemError::CommandFailed {
            command: command.command_line(),
            exit_code: output.exit_code,
            stderr: output.stderr.trim().to_string(),
        });
    }
    Ok(output)
}

/// Linux system information provider using /proc, /sys and standard tools
pub struct LinuxSystemInfoProvider {
    command_executor: Arc<dyn CommandExecutor>,
    files: Arc<dyn HostFiles>,
}

impl LinuxSystemInfoProvider {
    /// Create a new Linux system information provider
    ///
    /// # Arguments
    /// * `command_executor` - Runs host tools
    /// * `files` - Reads kernel pseudo-files and release files
    pub fn new(command_executor: Arc<dyn CommandExecutor>, files: Arc<dyn HostFiles>) -> Self {
        Self {
            command_executor,
            files,
        }
    }

    /// First candidate path that exists on the host
    async fn first_existing(&self, candidates: &[&'static str]) -> Option<&'static str> {
        for path in candidates {
            if self.files.exists(path).await {
                return Some(*path);
            }
        }
        None
    }

    async fn run(&self, command: &SystemCommand) -> Result<CommandOutput, SystemError> {
        Ok(self.command_executor.execute(command).await?)
    }

    async fn run_privileged(&self, command: &SystemCommand) -> Result<CommandOutput, SystemError> {
        let output = self.command_executor.execute_with_privileges(command).await?;
        checked(command, output)
    }

    /// Output of a privileged listing command; a failure reads as no output
    async fn listing_output(&self, command: &SystemCommand) -> Option<String> {
        match self.run_privileged(command).await {
            Ok(output) => Some(output.stdout),
            Err(e) => {
                debug!("{} produced no listing: {e}", command.command_line());
                None
            }
        }
    }

    async fn dmi_memory(&self) -> DmiMemory {
        let command = host_command("dmidecode", &[]);
        match self.command_executor.execute_with_privileges(&command).await {
            Ok(output) if output.success => parse_dmidecode_memory(&output.stdout),
            Ok(output) => {
                debug!(
                    "dmidecode exited with {:?}, DIMM details unavailable: {}",
                    output.exit_code,
                    output.stderr.trim()
                );
                DmiMemory::default()
            }
            Err(e) => {
                debug!("dmidecode unavailable: {e}");
                DmiMemory::default()
            }
        }
    }

    async fn distribution(&self) -> Option<String> {
        if let Some(lsb_release) = self.first_existing(LSB_RELEASE_PATHS).await {
            match self.run(&host_command(lsb_release, &["--description"])).await {
                Ok(output) => return parse_distribution(&output.stdout),
                Err(e) => debug!("lsb_release failed: {e}"),
            }
        }
        if let Ok(release) = self.files.read_to_string(REDHAT_RELEASE).await {
            return parse_distribution(&release);
        }
        match self.files.read_to_string(OS_RELEASE).await {
            Ok(text) => parse_os_release(&text),
            Err(e) => {
                debug!("No distribution description found: {e}");
                None
            }
        }
    }

    async fn kernel(&self) -> Option<String> {
        match self.run(&host_command("uname", &["--kernel-release"])).await {
            Ok(output) if output.success => {
                if let Some(release) = parse_kernel_release(&output.stdout) {
                    return Some(release);
                }
            }
            Ok(output) => debug!("uname exited with {:?}", output.exit_code),
            Err(e) => debug!("uname failed: {e}"),
        }
        self.files
            .read_to_string(KERNEL_RELEASE)
            .await
            .ok()
            .and_then(|text| parse_kernel_release(&text))
    }

    async fn page_setting(&self, path: &str) -> PageSetting {
        match self.files.read_to_string(path).await {
            Ok(text) => parse_huge_page_setting(&text),
            Err(e) => {
                debug!("Cannot read {path}: {e}");
                PageSetting::Unknown
            }
        }
    }

    async fn huge_pages(&self) -> Option<HugePageFacts> {
        for (dir, variant) in HUGE_PAGE_DIRS {
            if !self.files.exists(dir).await {
                continue;
            }
            return Some(HugePageFacts {
                variant: variant.to_string(),
                enabled: self.page_setting(&format!("{dir}/enabled")).await,
                defrag: self.page_setting(&format!("{dir}/defrag")).await,
            });
        }
        None
    }

    async fn overcommit(&self) -> Option<Overcommit> {
        match self.files.read_to_string(OVERCOMMIT).await {
            Ok(text) => parse_overcommit(&text),
            Err(e) => {
                warn!("Virtual memory over-commit setting unavailable: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl SystemInfoProvider for LinuxSystemInfoProvider {
    async fn get_memory_facts(&self) -> Result<MemoryFacts, SystemError> {
        let dmi = self.dmi_memory().await;

        let kernel_total_kb = match self.files.read_to_string(MEMINFO).await {
            Ok(meminfo) => parse_meminfo_total(&meminfo),
            Err(e) => {
                debug!("Kernel memory total unavailable: {e}");
                None
            }
        };

        Ok(MemoryFacts {
            system_label: dmi.system_label,
            kernel_total_kb,
            dimms: dmi.dimms,
            speed: dmi.speed,
        })
    }

    async fn get_cpu_facts(&self) -> Result<CpuFacts, SystemError> {
        let cpuinfo = self.files.read_to_string(CPUINFO).await?;
        Ok(parse_cpuinfo(&cpuinfo))
    }

    async fn get_os_facts(&self) -> Result<OsFacts, SystemError> {
        let boot_options = match self.files.read_to_string(KERNEL_CMDLINE).await {
            Ok(cmdline) => parse_boot_options(&cmdline),
            Err(e) => {
                debug!("Boot options unavailable: {e}");
                Vec::new()
            }
        };

        Ok(OsFacts {
            distribution: self.distribution().await,
            kernel: self.kernel().await,
            boot_options,
            huge_pages: self.huge_pages().await,
            overcommit: self.overcommit().await,
        })
    }

    async fn get_hp_inventory(&self) -> Result<Option<ControllerInventory>, SystemError> {
        let Some(hpacucli) = self.first_existing(HPACUCLI_PATHS).await else {
            debug!("hpacucli not installed");
            return Ok(None);
        };

        let list = self
            .run_privileged(&host_command(hpacucli, &["controller", "all", "show"]))
            .await?;
        let controllers = hpacucli::parse_controller_list(&list.stdout);
        if controllers.is_empty() {
            debug!("hpacucli found no Smart Array controllers");
            return Ok(None);
        }
        debug!("Found {} Smart Array controller(s)", controllers.len());

        let detail = self
            .run_privileged(&host_command(
                hpacucli,
                &["controller", "all", "show", "config", "detail"],
            ))
            .await?;
        let listing = hpacucli::parse_config_detail(&detail.stdout);

        Ok(Some(ControllerInventory {
            vendor: RaidVendor::Hp,
            controllers: listing.controllers,
            drives: listing.drives,
        }))
    }

    async fn get_lsi_inventory(&self) -> Result<Option<ControllerInventory>, SystemError> {
        let Some(megacli) = self.first_existing(MEGACLI_PATHS).await else {
            debug!("MegaCli not installed");
            return Ok(None);
        };

        let info = self
            .run_privileged(&host_command(megacli, &["-AdpAllInfo", "-aAll", "-NoLog"]))
            .await?;
        let controllers = megacli::parse_adapter_info(&info.stdout);
        if controllers.is_empty() {
            debug!("MegaCli found no adapters");
            return Ok(None);
        }

        let mut listing = match self
            .listing_output(&host_command(megacli, &["-LdPdInfo", "-aAll", "-NoLog"]))
            .await
        {
            Some(volumes) => megacli::parse_listing(&volumes, &controllers, false),
            None => Listing {
                controllers: megacli::adapter_sections(&controllers),
                drives: Vec::new(),
            },
        };

        if listing.drives.is_empty() && listing.volume_count() == 0 {
            debug!("MegaCli volume listing is empty, listing physical drives");
            if let Some(drives) = self
                .listing_output(&host_command(megacli, &["-PdList", "-aAll", "-NoLog"]))
                .await
            {
                listing.drives = megacli::parse_listing(&drives, &controllers, true).drives;
            }
        }

        Ok(Some(ControllerInventory {
            vendor: RaidVendor::Lsi,
            controllers: listing.controllers,
            drives: listing.drives,
        }))
    }

    async fn get_pci_inventory(&self) -> Result<PciInventory, SystemError> {
        let command = host_command("lspci", &[]);
        let output = checked(&command, self.run(&command).await?)?;
        Ok(parse_lspci(&output.stdout))
    }

    async fn get_hdfs_facts(&self) -> Result<Option<HdfsFacts>, SystemError> {
        let which = match self.run(&host_command("which", &["hdfs"])).await {
            Ok(output) => output,
            Err(SystemError::CommandNotFound(_)) => {
                debug!("which is not installed, skipping HDFS");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let Some(hdfs) = resolve_command_path(&which.combined()) else {
            debug!("hdfs is not on the PATH");
            return Ok(None);
        };

        let block_size = self
            .run(&host_command(&hdfs, &["getconf", "-confKey", "dfs.blocksize"]))
            .await?;
        let threads = self
            .run(&host_command(
                &hdfs,
                &["getconf", "-confKey", "dfs.datanode.max.transfer.threads"],
            ))
            .await?;

        Ok(Some(HdfsFacts {
            block_size_mb: parse_block_size(&block_size.stdout),
            transfer_threads: parse_transfer_threads(&threads.stdout),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommandError;
    use std::collections::HashMap;

    /// Executor that answers from a table keyed by command line
    #[derive(Default)]
    struct CannedExecutor {
        outputs: HashMap<String, CommandOutput>,
    }

    impl CannedExecutor {
        fn answer(mut self, command_line: &str, stdout: &str) -> Self {
            self.outputs.insert(
                command_line.to_string(),
                CommandOutput {
                    stdout: stdout.to_string(),
                    success: true,
                    exit_code: Some(0),
                    ..Default::default()
                },
            );
            self
        }

        fn answer_with_stderr(mut self, command_line: &str, stdout: &str, stderr: &str) -> Self {
            self.outputs.insert(
                command_line.to_string(),
                CommandOutput {
                    stdout: stdout.to_string(),
                    stderr: stderr.to_string(),
                    success: true,
                    exit_code: Some(0),
                },
            );
            self
        }

        fn fail(mut self, command_line: &str, stderr: &str) -> Self {
            self.outputs.insert(
                command_line.to_string(),
                CommandOutput {
                    stderr: stderr.to_string(),
                    success: false,
                    exit_code: Some(1),
                    ..Default::default()
                },
            );
            self
        }

        fn lookup(&self, command: &SystemCommand) -> Result<CommandOutput, CommandError> {
            self.outputs
                .get(&command.command_line())
                .cloned()
                .ok_or_else(|| {
                    CommandError::System(SystemError::CommandNotFound(command.program.clone()))
                })
        }
    }

    #[async_trait]
    impl CommandExecutor for CannedExecutor {
        async fn execute(&self, command: &SystemCommand) -> Result<CommandOutput, CommandError> {
            self.lookup(command)
        }

        async fn execute_with_privileges(
            &self,
            command: &SystemCommand,
        ) -> Result<CommandOutput, CommandError> {
            self.lookup(command)
        }
    }

    /// In-memory host filesystem; directories are listed explicitly
    #[derive(Default)]
    struct MemoryFiles {
        files: HashMap<String, String>,
        dirs: Vec<String>,
    }

    impl MemoryFiles {
        fn file(mut self, path: &str, contents: &str) -> Self {
            self.files.insert(path.to_string(), contents.to_string());
            self
        }

        fn dir(mut self, path: &str) -> Self {
            self.dirs.push(path.to_string());
            self
        }
    }

    #[async_trait]
    impl HostFiles for MemoryFiles {
        async fn read_to_string(&self, path: &str) -> Result<String, SystemError> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| SystemError::IoError(format!("{path}: not found")))
        }

        async fn exists(&self, path: &str) -> bool {
            self.files.contains_key(path) || self.dirs.iter().any(|dir| dir == path)
        }
    }

    fn provider(executor: CannedExecutor, files: MemoryFiles) -> LinuxSystemInfoProvider {
        LinuxSystemInfoProvider::new(Arc::new(executor), Arc::new(files))
    }

    #[tokio::test]
    async fn test_os_facts_from_release_file() {
        let files = MemoryFiles::default()
            .file(REDHAT_RELEASE, "CentOS release 6.6 (Final)\n")
            .file(KERNEL_CMDLINE, "ro root=/dev/sda1 rhgb quiet elevator=deadline\n")
            .dir("/sys/kernel/mm/redhat_transparent_hugepage")
            .file(
                "/sys/kernel/mm/redhat_transparent_hugepage/enabled",
                "always madvise [never]\n",
            )
            .file(OVERCOMMIT, "0\n");
        let executor =
            CannedExecutor::default().answer("uname --kernel-release", "2.6.32-504.el6.x86_64\n");

        let os = provider(executor, files).get_os_facts().await.unwrap();
        assert_eq!(os.distribution.as_deref(), Some("CentOS 6.6"));
        assert_eq!(os.kernel.as_deref(), Some("2.6.32-504.el6.x86_64"));
        assert_eq!(os.boot_options, vec!["elevator=deadline".to_string()]);
        let thp = os.huge_pages.unwrap();
        assert_eq!(thp.variant, "Red Hat");
        assert_eq!(thp.enabled, PageSetting::Disabled);
        assert_eq!(thp.defrag, PageSetting::Unknown);
        assert_eq!(os.overcommit, Some(Overcommit::Disabled));
    }

    #[tokio::test]
    async fn test_os_facts_fall_back_to_files() {
        let files = MemoryFiles::default()
            .file(OS_RELEASE, "NAME=\"Ubuntu\"\nPRETTY_NAME=\"Ubuntu 22.04.4 LTS\"\n")
            .file(KERNEL_RELEASE, "5.15.0-105-generic\n");

        let os = provider(CannedExecutor::default(), files)
            .get_os_facts()
            .await
            .unwrap();
        assert_eq!(os.distribution.as_deref(), Some("Ubuntu 22.04.4 LTS"));
        assert_eq!(os.kernel.as_deref(), Some("5.15.0-105-generic"));
        assert!(os.boot_options.is_empty());
        assert!(os.huge_pages.is_none());
        assert!(os.overcommit.is_none());
    }

    #[tokio::test]
    async fn test_memory_without_dmidecode() {
        let files = MemoryFiles::default().file(MEMINFO, "MemTotal:       16331456 kB\n");

        let memory = provider(CannedExecutor::default(), files)
            .get_memory_facts()
            .await
            .unwrap();
        assert_eq!(memory.kernel_total_kb, Some(16331456));
        assert!(memory.dimms.is_empty());
        assert!(memory.system_label.is_empty());
    }

    #[tokio::test]
    async fn test_missing_cpuinfo_is_an_error() {
        let result = provider(CannedExecutor::default(), MemoryFiles::default())
            .get_cpu_facts()
            .await;
        assert!(matches!(result, Err(SystemError::IoError(_))));
    }

    #[tokio::test]
    async fn test_raid_tools_absent() {
        let provider = provider(CannedExecutor::default(), MemoryFiles::default());
        assert!(provider.get_hp_inventory().await.unwrap().is_none());
        assert!(provider.get_lsi_inventory().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_hp_without_controllers_is_absent() {
        let files = MemoryFiles::default().file("/usr/sbin/hpacucli", "");
        let executor = CannedExecutor::default().answer("/usr/sbin/hpacucli controller all show", "\n");

        let inventory = provider(executor, files).get_hp_inventory().await.unwrap();
        assert!(inventory.is_none());
    }

    #[tokio::test]
    async fn test_lsi_falls_back_to_physical_listing() {
        let megacli = "/usr/sbin/MegaCli64";
        let files = MemoryFiles::default().file(megacli, "");
        let executor = CannedExecutor::default()
            .answer(
                &format!("{megacli} -AdpAllInfo -aAll -NoLog"),
                "Adapter #0\n\nProduct Name    : LSI MegaRAID SAS 9260-8i\nMemory Size     : 512MB\n",
            )
            .answer(&format!("{megacli} -LdPdInfo -aAll -NoLog"), "\nAdapter #0\n\n")
            .answer(
                &format!("{megacli} -PdList -aAll -NoLog"),
                "Adapter #0\n\n\
                 Raw Size: 931.512 GB [0x74706db0 Sectors]\n\
                 Inquiry Data: SEAGATE ST91000640SS    AS03\n\
                 Raw Size: 931.512 GB [0x74706db0 Sectors]\n\
                 Inquiry Data: SEAGATE ST91000640SS    AS03\n",
            );
        let provider = provider(executor, files);

        let inventory = provider.get_lsi_inventory().await.unwrap().unwrap();
        assert_eq!(inventory.vendor, RaidVendor::Lsi);
        assert_eq!(inventory.drives.len(), 1);
        assert_eq!(inventory.drives[0].count, 2);
        assert_eq!(inventory.volume_count(), 0);
    }

    const PERC_ADAPTER_INFO: &str =
        "Adapter #0\n\nProduct Name    : PERC H710 Mini\nMemory Size     : 512MB\n";

    const PD_LIST: &str = "Adapter #0\n\n\
                           Raw Size: 279.396 GB [0x22ecb25c Sectors]\n\
                           Inquiry Data: SEAGATE ST9300603SS     FS66\n";

    #[tokio::test]
    async fn test_lsi_failed_volume_listing_falls_back() {
        let megacli = "/opt/MegaRAID/MegaCli/MegaCli64";
        let files = MemoryFiles::default().file(megacli, "");
        let executor = CannedExecutor::default()
            .answer(&format!("{megacli} -AdpAllInfo -aAll -NoLog"), PERC_ADAPTER_INFO)
            .fail(&format!("{megacli} -LdPdInfo -aAll -NoLog"), "Invalid input")
            .answer(&format!("{megacli} -PdList -aAll -NoLog"), PD_LIST);

        let inventory = provider(executor, files)
            .get_lsi_inventory()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(inventory.controllers.len(), 1);
        assert_eq!(
            inventory.controllers[0].label.as_deref(),
            Some("Adapter #0 PERC H710 Mini 512MB")
        );
        assert_eq!(inventory.volume_count(), 0);
        assert_eq!(inventory.drives.len(), 1);
        assert_eq!(inventory.drives[0].model, "SEAGATE ST9300603SS");
    }

    #[tokio::test]
    async fn test_lsi_all_listings_failed_keeps_adapters() {
        let megacli = "/usr/sbin/MegaCli64";
        let files = MemoryFiles::default().file(megacli, "");
        let executor = CannedExecutor::default()
            .answer(&format!("{megacli} -AdpAllInfo -aAll -NoLog"), PERC_ADAPTER_INFO)
            .fail(&format!("{megacli} -LdPdInfo -aAll -NoLog"), "Invalid input")
            .fail(&format!("{megacli} -PdList -aAll -NoLog"), "Invalid input");

        let inventory = provider(executor, files)
            .get_lsi_inventory()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(inventory.controllers.len(), 1);
        assert!(inventory.drives.is_empty());
    }

    #[tokio::test]
    async fn test_hp_from_alternate_install_path() {
        let hpacucli = "/opt/hp/hpacucli/bld/hpacucli";
        let files = MemoryFiles::default().file(hpacucli, "");
        let executor = CannedExecutor::default()
            .answer(
                &format!("{hpacucli} controller all show"),
                "\nSmart Array P410 in Slot 4 (sn: PACCRID11111111)\n\n",
            )
            .answer(
                &format!("{hpacucli} controller all show config detail"),
                "\nSmart Array P410 in Slot 4\n\n   physicaldrive 1I:1:1\n      Size: 300 GB\n      Rotational Speed: 10000\n      Model: HP      EG0300FAWHV\n",
            );

        let inventory = provider(executor, files)
            .get_hp_inventory()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(inventory.vendor, RaidVendor::Hp);
        assert_eq!(
            inventory.controllers[0].label.as_deref(),
            Some("P410 in Slot 4")
        );
        assert_eq!(inventory.drives[0].model, "HP EG0300FAWHV");
        assert_eq!(inventory.drives[0].speed, "10K RPM");
    }

    #[tokio::test]
    async fn test_modern_transparent_huge_pages() {
        let files = MemoryFiles::default()
            .dir("/sys/kernel/mm/transparent_hugepage")
            .file(
                "/sys/kernel/mm/transparent_hugepage/enabled",
                "[always] madvise never\n",
            )
            .file(
                "/sys/kernel/mm/transparent_hugepage/defrag",
                "always defer defer+madvise [madvise] never\n",
            );

        let os = provider(CannedExecutor::default(), files)
            .get_os_facts()
            .await
            .unwrap();
        let thp = os.huge_pages.unwrap();
        assert_eq!(thp.variant, "Modern Linux");
        assert_eq!(thp.enabled, PageSetting::Enabled);
        assert_eq!(thp.defrag, PageSetting::Disabled);
    }

    #[tokio::test]
    async fn test_hdfs_values_ignore_stderr_warnings() {
        let warning = "WARN util.NativeCodeLoader: Unable to load native-hadoop library\n";
        let executor = CannedExecutor::default()
            .answer("which hdfs", "/usr/bin/hdfs\n")
            .answer_with_stderr(
                "/usr/bin/hdfs getconf -confKey dfs.blocksize",
                "134217728\n",
                warning,
            )
            .answer_with_stderr(
                "/usr/bin/hdfs getconf -confKey dfs.datanode.max.transfer.threads",
                "4096\n",
                warning,
            );

        let facts = provider(executor, MemoryFiles::default())
            .get_hdfs_facts()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(facts.block_size_mb, Some(128));
        assert_eq!(facts.transfer_threads, "4096");
    }

    #[tokio::test]
    async fn test_hdfs_not_installed() {
        let executor = CannedExecutor::default().answer("which hdfs", "");
        let facts = provider(executor, MemoryFiles::default())
            .get_hdfs_facts()
            .await
            .unwrap();
        assert!(facts.is_none());
    }

    #[tokio::test]
    async fn test_hdfs_probe() {
        let executor = CannedExecutor::default()
            .answer("which hdfs", "/usr/bin/hdfs\n")
            .answer("/usr/bin/hdfs getconf -confKey dfs.blocksize", "134217728\n")
            .answer(
                "/usr/bin/hdfs getconf -confKey dfs.datanode.max.transfer.threads",
                "4096\n",
            );
        let facts = provider(executor, MemoryFiles::default())
            .get_hdfs_facts()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(facts.block_size_mb, Some(128));
        assert_eq!(facts.transfer_threads, "4096");
    }
}
