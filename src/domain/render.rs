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

//! Human-readable rendering of a machine description

use crate::domain::parsers::size_to_human;
use crate::domain::{
    ControllerInventory, CpuFacts, HdfsFacts, MachineDescription, MemoryFacts, OsFacts,
    PciInventory, RaidVendor, StorageFacts,
};

/// Collects report lines
#[derive(Default)]
struct Report {
    lines: Vec<String>,
}

impl Report {
    fn line<S: Into<String>>(&mut self, line: S) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn finish(self) -> String {
        let mut text = self.lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }
}

/// Render a description as the plain-text report
///
/// Sections appear in fixed order: memory, CPU, operating system, HP and LSI
/// controllers, PCI adapters, HDFS. Sections that were not collected are
/// skipped.
pub fn render_text(description: &MachineDescription) -> String {
    let mut report = Report::default();

    if let Some(memory) = &description.memory {
        render_memory(&mut report, memory);
    }
    if let Some(cpu) = &description.cpu {
        render_cpu(&mut report, cpu);
    }
    if let Some(os) = &description.os {
        render_os(&mut report, os);
    }
    if let Some(storage) = &description.storage {
        render_storage(&mut report, storage);
    }
    if let Some(adapters) = &description.adapters {
        render_adapters(&mut report, adapters);
    }
    if let Some(hdfs) = &description.hdfs {
        render_hdfs(&mut report, hdfs);
    }

    report.finish()
}

/// Build the `Memory:` summary line
pub fn memory_line(memory: &MemoryFacts) -> String {
    let mut parts: Vec<String> = vec!["Memory:".to_string()];
    if let Some(kb) = memory.kernel_total_kb {
        parts.push(format!("{} used by kernel,", size_to_human(kb)));
    }

    for (index, group) in memory.dimms.iter().enumerate() {
        let plus = if index > 0 { "+" } else { "" };
        parts.push(format!("{plus}{} x {} GB", group.count, group.size_gb));
    }
    if memory.dimms.is_empty() {
        parts.push("(need elevated privileges for details)".to_string());
    } else {
        parts.push(format!("= {} GB", memory.total_gb()));
    }

    if let Some(speed) = &memory.speed {
        parts.push(format!("@ {speed}"));
    }
    parts.join(" ")
}

fn render_memory(report: &mut Report, memory: &MemoryFacts) {
    if !memory.system_label.is_empty() {
        report.line(memory.system_label.clone());
    }
    report.line(memory_line(memory));
}

fn render_cpu(report: &mut Report, cpu: &CpuFacts) {
    report.line(cpu.to_string());
}

fn render_os(report: &mut Report, os: &OsFacts) {
    report.line("Operating system:");
    if let Some(distribution) = &os.distribution {
        report.line(format!(" Linux distribution: {distribution}"));
    }
    if let Some(kernel) = &os.kernel {
        report.line(format!(" Kernel: {kernel}"));
    }
    if !os.boot_options.is_empty() {
        report.line(format!(" Boot options: {}", os.boot_options.join(" ")));
    }
    if let Some(thp) = &os.huge_pages {
        report.line(format!(
            " {} transparent huge pages {} and defrag {}",
            thp.variant, thp.enabled, thp.defrag
        ));
    }
    if let Some(overcommit) = &os.overcommit {
        report.line(format!(" Virtual memory over-commit {overcommit}"));
    }
    report.blank();
}

fn render_inventory(report: &mut Report, inventory: &ControllerInventory) {
    report.line(format!(
        "Logical drives on {} controllers:",
        inventory.vendor
    ));
    for section in &inventory.controllers {
        if let Some(label) = &section.label {
            report.line(label.clone());
        }
        if section.volumes.is_empty() {
            continue;
        }
        for volume in &section.volumes {
            report.line(
                format!(" {}: {}", volume.id, volume.description())
                    .trim_end()
                    .to_string(),
            );
        }
        report.blank();
    }

    // HP always lists its drives, LSI only when it found some
    if inventory.drives.is_empty() && inventory.vendor == RaidVendor::Lsi {
        return;
    }
    report.line("Physical drives:");
    for drive in &inventory.drives {
        report.line(
            format!(
                "  {} x {} {} {}",
                drive.count, drive.model, drive.size, drive.speed
            )
            .trim_end()
            .to_string(),
        );
    }
    report.blank();
}

fn render_storage(report: &mut Report, storage: &StorageFacts) {
    if let Some(hp) = &storage.hp {
        render_inventory(report, hp);
    }
    if let Some(lsi) = &storage.lsi {
        render_inventory(report, lsi);
    }
    if storage.hp.is_none() && storage.lsi.is_none() {
        report.line("Did not find vendor disk controller software");
    }
}

fn render_adapters(report: &mut Report, adapters: &PciInventory) {
    if !adapters.storage.is_empty() {
        report.blank();
        report.line("Storage:");
        for group in &adapters.storage {
            report.line(format!(" {} x {}", group.count, group.description));
        }
    }
    if !adapters.network.is_empty() {
        report.line("Network interface controllers:");
        for group in &adapters.network {
            report.line(format!(" {} x {}", group.count, group.description));
        }
    }
}

fn render_hdfs(report: &mut Report, hdfs: &HdfsFacts) {
    report.blank();
    let block_size = match hdfs.block_size_mb {
        Some(mb) => format!("{mb} MB"),
        None => "unknown?".to_string(),
    };
    report.line(format!(
        "HDFS block size {block_size} data threads {}",
        hdfs.transfer_threads
    ));
    report.blank();
}
