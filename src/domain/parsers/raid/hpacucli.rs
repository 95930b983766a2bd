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

//! HP Smart Array (hpacucli) output parsers

use super::{Listing, ListingScan, ScanMode};
use crate::domain::parsers::common::{join_from, starts_with_words};
use crate::domain::{Controller, Stripe};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CONTROLLER_RE: Regex = Regex::new(r"^\s*Smart Array (.+?) in Slot (\S+)").unwrap();
}

/// Parse controllers from `hpacucli controller all show`
///
/// # Returns
/// * One controller per `Smart Array <model> in Slot <n>` line, keyed by slot
pub fn parse_controller_list(output: &str) -> Vec<Controller> {
    output
        .lines()
        .filter_map(|line| CONTROLLER_RE.captures(line))
        .filter_map(|captures| {
            Some(Controller {
                id: captures.get(2)?.as_str().to_string(),
                description: captures.get(1)?.as_str().to_string(),
            })
        })
        .collect()
}

/// Convert a `Rotational Speed:` value to the report's RPM notation
fn rotational_speed(value: &str) -> String {
    match value {
        "15000" => "15K RPM".to_string(),
        "10000" => "10K RPM".to_string(),
        "7200" => "7.2K RPM".to_string(),
        other => other.to_string(),
    }
}

/// Parse `hpacucli controller all show config detail`
///
/// Every `Smart Array` line opens a controller section labelled with the rest
/// of the line. `Logical Drive: N` blocks describe volumes; `physicaldrive`
/// blocks describe drives and are committed on their `Model:` line.
///
/// # Arguments
/// * `config_detail` - Raw command output
///
/// # Returns
/// * Controller sections and the drive histogram
pub fn parse_config_detail(config_detail: &str) -> Listing {
    let mut scan = ListingScan::new(ScanMode::Idle);
    // Strip size and fault tolerance of the open logical drive
    let mut chunk_kb: Option<u64> = None;
    let mut raid_level: Option<String> = None;

    for line in config_detail.lines() {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            scan.set_mode(ScanMode::Idle);
            continue;
        }

        if starts_with_words(&words, &["Smart", "Array"]) {
            scan.boundary(join_from(&words, 2));
            continue;
        }
        if starts_with_words(&words, &["Logical", "Drive:"]) {
            if let Some(id) = words.get(2).and_then(|w| w.parse::<u32>().ok()) {
                scan.start_volume(id);
                chunk_kb = None;
                raid_level = None;
            }
            continue;
        }
        if words[0] == "physicaldrive" {
            scan.set_mode(ScanMode::Physical);
        }

        match scan.mode() {
            ScanMode::Idle => {}
            ScanMode::Logical => {
                if starts_with_words(&words, &["Fault", "Tolerance:"]) {
                    raid_level = match words.get(2..) {
                        Some(["RAID", level, ..]) => Some(level.to_string()),
                        Some([level, ..]) => Some(level.to_string()),
                        _ => None,
                    };
                } else if starts_with_words(&words, &["Strip", "Size:"]) {
                    chunk_kb = words.get(2).and_then(|w| w.parse().ok());
                } else if starts_with_words(&words, &["Full", "Stripe", "Size:"]) {
                    let full: Option<u64> = words.get(3).and_then(|w| w.parse().ok());
                    let level = raid_level.clone();
                    let Some(volume) = scan.volume_mut() else {
                        continue;
                    };
                    if let (Some(full), Some(chunk)) = (full, chunk_kb.filter(|c| *c > 0)) {
                        let width = full / chunk;
                        if width > 1 {
                            volume.stripe = Some(Stripe {
                                chunk_kb: chunk,
                                width,
                            });
                        }
                    }
                    volume.raid_level = level.filter(|l| l != "0");
                } else if let Some(volume) = scan.volume_mut() {
                    if words[0] == "Size:" {
                        volume.capacity = Some(join_from(&words, 1));
                    } else if starts_with_words(&words, &["Disk", "Name:"]) {
                        volume.disk_name = words.get(2).map(|w| w.to_string());
                    } else if words[0] == "Status:" {
                        volume.state = words.get(1).map(|w| w.to_string());
                    }
                }
            }
            ScanMode::Physical => {
                if words[0] == "Size:" {
                    scan.pending_drive_mut().size = join_from(&words, 1);
                } else if starts_with_words(&words, &["Interface", "Type:", "Solid", "State"]) {
                    scan.pending_drive_mut().speed = "SSD".to_string();
                } else if starts_with_words(&words, &["Rotational", "Speed:"]) {
                    scan.pending_drive_mut().speed = rotational_speed(&join_from(&words, 2));
                } else if words[0] == "Model:" {
                    scan.commit_drive(join_from(&words, 1));
                }
            }
        }
    }

    scan.finish()
}
