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

//! LSI MegaRAID (MegaCli64) output parsers

use super::speed::infer_drive_speed;
use super::{Listing, ListingScan, ScanMode};
use crate::domain::parsers::common::{join_from, starts_with_words};
use crate::domain::{Controller, ControllerSection};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RAID_LEVEL_RE: Regex = Regex::new(r"Primary-(\d+),\s*Secondary-(\d+)").unwrap();
}

/// Part number that MegaCli reports with the drive serial glued in front
const SERIAL_PREFIXED_PART: &str = "ST91000640NS";

/// Label used when a listing names an adapter the info query did not report
const UNKNOWN_ADAPTER: &str = "UNKNOWN?";

/// Parse adapters from `MegaCli64 -AdpAllInfo -aAll -NoLog`
///
/// # Arguments
/// * `adapter_info` - Raw command output
///
/// # Returns
/// * One controller per `Adapter #N` heading, described by product name and
///   cache memory size. Empty when no LSI hardware is installed.
pub fn parse_adapter_info(adapter_info: &str) -> Vec<Controller> {
    let mut controllers: Vec<Controller> = Vec::new();

    for line in adapter_info.lines() {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() < 2 {
            continue;
        }
        if words[0] == "Adapter" && words[1].starts_with('#') {
            controllers.push(Controller {
                id: words[1].to_string(),
                description: String::new(),
            });
        } else if starts_with_words(&words, &["Product", "Name", ":"])
            || starts_with_words(&words, &["Memory", "Size", ":"])
        {
            let Some(controller) = controllers.last_mut() else {
                continue;
            };
            let value = join_from(&words, 3);
            if value.is_empty() {
                continue;
            }
            if !controller.description.is_empty() {
                controller.description.push(' ');
            }
            controller.description.push_str(&value);
        }
    }

    controllers
}

/// Map a `RAID Level` line to a level string
///
/// A secondary level of 3 marks a spanned array, so `Primary-1, Secondary-3`
/// is RAID 10.
fn parse_raid_level(line: &str) -> Option<String> {
    let captures = RAID_LEVEL_RE.captures(line)?;
    let primary = captures.get(1)?.as_str();
    let secondary = captures.get(2)?.as_str();
    let level = if secondary == "3" {
        format!("{primary}0")
    } else {
        primary.to_string()
    };
    if level == "0" {
        None
    } else {
        Some(level)
    }
}

/// Normalize an `Inquiry Data:` value into a drive model
fn inquiry_model(words: &[&str]) -> String {
    let model = words[2..words.len().min(4)].join(" ");
    if !model.contains(SERIAL_PREFIXED_PART) {
        return model;
    }
    let part = words
        .get(2)
        .and_then(|word| word.get(8..))
        .unwrap_or_default();
    format!("Seagate {part}")
}

/// Heading for adapter `id`, described from the enumeration query
fn adapter_label(id: &str, controllers: &[Controller]) -> String {
    let description = controllers
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.description.as_str())
        .unwrap_or(UNKNOWN_ADAPTER);
    format!("Adapter {id} {description}").trim_end().to_string()
}

/// Empty sections for each enumerated adapter, used when no volume listing
/// could be read
pub fn adapter_sections(controllers: &[Controller]) -> Vec<ControllerSection> {
    controllers
        .iter()
        .map(|c| ControllerSection {
            label: Some(adapter_label(&c.id, controllers)),
            volumes: Vec::new(),
        })
        .collect()
}

/// Parse a MegaCli drive listing
///
/// Handles both `-LdPdInfo` (adapters, virtual drives and their physical
/// drives) and `-PdList` (physical drives only). In physical-only mode adapter
/// headings are ignored.
///
/// # Arguments
/// * `listing` - Raw command output
/// * `controllers` - Adapters from [`parse_adapter_info`], used for headings
/// * `physical_only` - Scan as a `-PdList` listing
pub fn parse_listing(listing: &str, controllers: &[Controller], physical_only: bool) -> Listing {
    let mut scan = ListingScan::new(if physical_only {
        ScanMode::Physical
    } else {
        ScanMode::Idle
    });

    for line in listing.lines() {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        if words[0] == "Adapter" && words.get(1).is_some_and(|w| w.starts_with('#')) {
            if physical_only {
                continue;
            }
            scan.boundary(adapter_label(words[1], controllers));
        } else if starts_with_words(&words, &["Virtual", "Drive:"]) {
            if let Some(id) = words.get(2).and_then(|w| w.parse::<u32>().ok()) {
                scan.start_volume(id);
            }
        } else if words[0] == "PD:" {
            scan.set_mode(ScanMode::Physical);
        } else if scan.mode() == ScanMode::Logical {
            let Some(volume) = scan.volume_mut() else {
                continue;
            };
            if starts_with_words(&words, &["Size", ":"]) {
                volume.capacity = Some(join_from(&words, 2));
            } else if starts_with_words(&words, &["State", ":"]) {
                volume.state = Some(join_from(&words, 2));
            } else if starts_with_words(&words, &["Current", "Cache", "Policy:"]) {
                if let Some(policy) = words.get(3) {
                    volume.cache_policy = Some(policy.trim_end_matches(',').to_string());
                }
            } else if starts_with_words(&words, &["RAID", "Level", ":"]) {
                volume.raid_level = parse_raid_level(line);
            }
        } else if scan.mode() == ScanMode::Physical {
            if starts_with_words(&words, &["Raw", "Size:"]) {
                scan.pending_drive_mut().size = words[2..words.len().min(4)].join(" ");
            } else if starts_with_words(&words, &["Inquiry", "Data:"]) && words.len() > 2 {
                let model = inquiry_model(&words);
                scan.pending_drive_mut().speed = infer_drive_speed(&model);
                scan.commit_drive(model);
            }
        }
    }

    scan.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADAPTER_INFO: &str = "
Adapter #0

==============================================================================
                    Versions
                ================
Product Name    : PERC H710 Mini
Serial No       : 29E00ZB
FW Package Build: 21.3.0-0009

                    Mfg. Data
                ================
Memory Size      : 512MB

                Supported Adapter Operations
                ================
Rebuild Rate                    : Yes
";

    const LD_PD_INFO: &str = "
Adapter #0

Number of Virtual Disks: 2
Virtual Drive: 1 (Target Id: 1)
Name                :
RAID Level          : Primary-1, Secondary-3, RAID Level Qualifier-0
Size                : 557.75 GB
State               : Optimal
Strip Size          : 64 KB
Number Of Drives per span:2
Current Cache Policy: WriteBack, ReadAdaptive, Direct, No Write Cache if Bad BBU
PD: 0 Information
Enclosure Device ID: 32
Raw Size: 279.396 GB [0x22ecb25c Sectors]
Inquiry Data: SEAGATE ST9300603SS     FS66            6SE1Y6VM
PD: 1 Information
Raw Size: 279.396 GB [0x22ecb25c Sectors]
Inquiry Data: SEAGATE ST9300603SS     FS66            6SE1Y6VN
Virtual Drive: 0 (Target Id: 0)
RAID Level          : Primary-0, Secondary-0, RAID Level Qualifier-0
Size                : 278.875 GB
State               : Optimal
Current Cache Policy: WriteThrough, ReadAheadNone, Direct, No Write Cache if Bad BBU
PD: 0 Information
Raw Size: 931.512 GB [0x74706db0 Sectors]
Inquiry Data:             9XG3ABCDST91000640NS                          SN03
";

    #[test]
    fn test_parse_adapter_info() {
        let controllers = parse_adapter_info(ADAPTER_INFO);
        assert_eq!(
            controllers,
            vec![Controller {
                id: "#0".to_string(),
                description: "PERC H710 Mini 512MB".to_string(),
            }]
        );
    }

    #[test]
    fn test_adapter_info_without_hardware() {
        assert!(parse_adapter_info("Exit Code: 0x00\n").is_empty());
    }

    #[test]
    fn test_parse_ld_pd_listing() {
        let controllers = parse_adapter_info(ADAPTER_INFO);
        let listing = parse_listing(LD_PD_INFO, &controllers, false);

        assert_eq!(listing.controllers.len(), 1);
        let section = &listing.controllers[0];
        assert_eq!(section.label.as_deref(), Some("Adapter #0 PERC H710 Mini 512MB"));
        assert_eq!(
            section.volumes[0].description(),
            "278.875 GB Optimal WriteThrough"
        );
        assert_eq!(
            section.volumes[1].description(),
            "557.75 GB RAID 10 Optimal WriteBack"
        );

        assert_eq!(listing.drives.len(), 2);
        assert_eq!(listing.drives[0].model, "SEAGATE ST9300603SS");
        assert_eq!(listing.drives[0].count, 2);
        assert_eq!(listing.drives[0].size, "279.396 GB");
        assert_eq!(listing.drives[0].speed, "10K RPM 2.5 inch");
        assert_eq!(listing.drives[1].model, "Seagate ST91000640NS");
        assert_eq!(listing.drives[1].size, "931.512 GB");
    }

    #[test]
    fn test_adapter_sections_without_listing() {
        let sections = adapter_sections(&parse_adapter_info(ADAPTER_INFO));
        assert_eq!(
            sections,
            vec![ControllerSection {
                label: Some("Adapter #0 PERC H710 Mini 512MB".to_string()),
                volumes: Vec::new(),
            }]
        );
    }

    #[test]
    fn test_unknown_adapter_label() {
        let listing = parse_listing("Adapter #1\nVirtual Drive: 0 (Target Id: 0)\n", &[], false);
        assert_eq!(
            listing.controllers[0].label.as_deref(),
            Some("Adapter #1 UNKNOWN?")
        );
        assert_eq!(listing.volume_count(), 1);
    }

    #[test]
    fn test_physical_only_listing_ignores_adapters() {
        let pd_list = "
Adapter #0

Enclosure Device ID: 252
Raw Size: 1.819 TB [0xe8e088b0 Sectors]
Inquiry Data: TOSHIBA MG03SCA200      DG02X3B0A0X2
";
        let listing = parse_listing(pd_list, &[], true);
        assert!(listing.controllers.is_empty());
        assert_eq!(listing.drives.len(), 1);
        assert_eq!(listing.drives[0].model, "TOSHIBA MG03SCA200");
        assert_eq!(listing.drives[0].size, "1.819 TB");
        assert_eq!(listing.drives[0].speed, "7.2K RPM 3.5 inch");
    }

    #[test]
    fn test_malformed_virtual_drive_is_skipped() {
        let listing = parse_listing(
            "Adapter #0\nVirtual Drive: x\nSize : 1 GB\n",
            &[],
            false,
        );
        assert_eq!(listing.volume_count(), 0);
    }

    #[test]
    fn test_parse_raid_level() {
        assert_eq!(
            parse_raid_level("RAID Level : Primary-5, Secondary-0, RAID Level Qualifier-3"),
            Some("5".to_string())
        );
        assert_eq!(
            parse_raid_level("RAID Level : Primary-0, Secondary-0, RAID Level Qualifier-0"),
            None
        );
        assert_eq!(parse_raid_level("RAID Level : garbage"), None);
    }
}
