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

//! PCI device listing parser

use super::common::{starts_with_words, strip_noise_tokens, NoiseFilter, Tally};
use crate::domain::{AdapterGroup, PciInventory};

static VENDOR_NOISE: NoiseFilter = NoiseFilter {
    words: &["Corporation", "Technologies"],
    prefixes: &[],
};

const NETWORK_CLASSES: &[&str] = &["Ethernet", "Network"];

/// Number of class tokens before the device name
const FLASH_CLASS_TOKENS: usize = 4;
const NETWORK_CLASS_TOKENS: usize = 2;

fn into_groups(tally: Tally<()>) -> Vec<AdapterGroup> {
    tally
        .into_entries()
        .into_iter()
        .map(|entry| AdapterGroup {
            description: entry.key,
            count: entry.count,
        })
        .collect()
}

/// Parse `lspci` output into network controllers and PCIe flash storage
///
/// The bus address is dropped. A line mentioning `Flash` whose class is
/// `Serial Attached SCSI controller:` is a flash card; otherwise only
/// `Ethernet controller:` and `Network controller:` lines are kept.
///
/// # Arguments
/// * `lspci_output` - Raw `lspci` output
///
/// # Returns
/// * Adapters grouped by description in first-seen order
pub fn parse_lspci(lspci_output: &str) -> PciInventory {
    let mut storage: Tally<()> = Tally::new();
    let mut network: Tally<()> = Tally::new();

    for line in lspci_output.lines() {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() < 2 {
            continue;
        }
        // Bus address
        let words = &words[1..];

        if words.contains(&"Flash") && starts_with_words(words, &["Serial", "Attached", "SCSI"]) {
            let device = words.get(FLASH_CLASS_TOKENS..).unwrap_or_default();
            storage.record(device.join(" "), ());
            continue;
        }
        if !NETWORK_CLASSES.contains(&words[0]) {
            continue;
        }
        let device = words.get(NETWORK_CLASS_TOKENS..).unwrap_or_default();
        let cleaned = strip_noise_tokens(device.iter().copied(), &VENDOR_NOISE);
        network.record(cleaned.join(" "), ());
    }

    PciInventory {
        storage: into_groups(storage),
        network: into_groups(network),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LSPCI: &str = "\
00:00.0 Host bridge: Intel Corporation 5520 I/O Hub to ESI Port (rev 13)
02:00.0 Ethernet controller: NetXen Incorporated NX3031 Multifunction 1/10-Gigabit Server Adapter (rev 42)
02:00.1 Ethernet controller: NetXen Incorporated NX3031 Multifunction 1/10-Gigabit Server Adapter (rev 42)
03:00.0 Ethernet controller: Broadcom Corporation NetXtreme II BCM5709 Gigabit Ethernet (rev 20)
03:00.1 Ethernet controller: Broadcom Corporation NetXtreme II BCM5709 Gigabit Ethernet (rev 20)
04:00.0 Network controller: Mellanox Technologies MT27500 Family [ConnectX-3]
05:00.0 Serial Attached SCSI controller: LSI Logic / Symbios Logic SAS2008 PCI-Express Fusion-MPT SAS-2 [Falcon] (rev 03)
06:00.0 Serial Attached SCSI controller: LSI Logic / Symbios Logic Nytro WarpDrive Flash (rev 01)
07:00.0 Serial Attached SCSI controller: LSI Logic / Symbios Logic Nytro WarpDrive Flash (rev 01)
";

    #[test]
    fn test_network_controllers_grouped_in_order() {
        let inventory = parse_lspci(LSPCI);
        assert_eq!(
            inventory.network,
            vec![
                AdapterGroup {
                    description:
                        "NetXen Incorporated NX3031 Multifunction 1/10-Gigabit Server Adapter (rev 42)"
                            .to_string(),
                    count: 2,
                },
                AdapterGroup {
                    description: "Broadcom NetXtreme II BCM5709 Gigabit Ethernet (rev 20)"
                        .to_string(),
                    count: 2,
                },
                AdapterGroup {
                    description: "Mellanox MT27500 Family [ConnectX-3]".to_string(),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn test_flash_storage_detected() {
        let inventory = parse_lspci(LSPCI);
        assert_eq!(
            inventory.storage,
            vec![AdapterGroup {
                description: "LSI Logic / Symbios Logic Nytro WarpDrive Flash (rev 01)".to_string(),
                count: 2,
            }]
        );
    }

    #[test]
    fn test_no_adapters() {
        let inventory = parse_lspci("00:1f.2 SATA controller: Intel Corporation 82801 (rev 05)\n\n");
        assert!(inventory.network.is_empty());
        assert!(inventory.storage.is_empty());
    }
}
