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

//! Memory information parsing functions

use super::common::{join_from, starts_with_words, strip_noise_tokens, NoiseFilter};
use crate::domain::DimmGroup;
use std::collections::BTreeMap;

static MANUFACTURER_NOISE: NoiseFilter = NoiseFilter {
    words: &["Inc", "Inc."],
    prefixes: &[],
};

/// Form factors counted as DIMMs; SuperMicro boards also list flash devices
const DIMM_FORM_FACTORS: &[&str] = &["DIMM", "FB-DIMM"];

/// Which dmidecode block the scanner is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DmiMode {
    Idle,
    System,
    Memory,
}

/// Memory facts available from dmidecode
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DmiMemory {
    /// "Manufacturer Product" of the system board
    pub system_label: String,
    /// DIMM histogram in ascending size order
    pub dimms: Vec<DimmGroup>,
    /// Speed of the last populated DIMM
    pub speed: Option<String>,
}

/// Parse the size of a memory device ("16 GB", "16384 MB")
fn parse_dimm_size(words: &[&str]) -> Option<u32> {
    let value: u32 = words.get(1)?.parse().ok()?;
    match words.get(2).copied() {
        Some("GB") => Some(value),
        Some("MB") => Some(value / 1024),
        _ => None,
    }
}

/// Parse system label and DIMM layout from full dmidecode output
///
/// A `Size:` line sets the pending module size; the following
/// `Form Factor:` line confirms it as a DIMM and counts it. Empty slots and
/// non-DIMM devices end the block early.
///
/// # Arguments
/// * `dmidecode_output` - Raw output from `dmidecode` (may be empty)
///
/// # Returns
/// * Parsed memory facts; empty when access was denied
pub fn parse_dmidecode_memory(dmidecode_output: &str) -> DmiMemory {
    let mut mode = DmiMode::Idle;
    let mut system: Vec<String> = Vec::new();
    let mut speed: Option<String> = None;
    let mut pending_size: Option<u32> = None;
    let mut dimms: BTreeMap<u32, u32> = BTreeMap::new();

    for line in dmidecode_output.lines() {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() < 2 {
            mode = DmiMode::Idle;
            continue;
        }
        if words == ["System", "Information"] {
            mode = DmiMode::System;
            continue;
        }
        if words == ["Memory", "Device"] {
            mode = DmiMode::Memory;
            pending_size = None;
            continue;
        }

        match mode {
            DmiMode::Idle => {}
            DmiMode::System => {
                if words[0] == "Manufacturer:" {
                    system.extend(
                        strip_noise_tokens(words[1..].iter().copied(), &MANUFACTURER_NOISE)
                            .into_iter()
                            .map(str::to_string),
                    );
                } else if starts_with_words(&words, &["Product", "Name:"]) {
                    system.push(join_from(&words, 2));
                }
            }
            DmiMode::Memory => {
                if starts_with_words(&words, &["Form", "Factor:"]) {
                    let form = words.get(2).copied().unwrap_or_default();
                    if !DIMM_FORM_FACTORS.contains(&form) {
                        mode = DmiMode::Idle;
                    } else if let Some(size) = pending_size {
                        *dimms.entry(size).or_insert(0) += 1;
                    }
                } else if words[0] == "Speed:" {
                    speed = Some(words[1..words.len().min(3)].join(" "));
                } else if words[0] == "Size:" {
                    if words[1] == "No" {
                        // No Module Installed
                        mode = DmiMode::Idle;
                        continue;
                    }
                    pending_size = parse_dimm_size(&words);
                }
            }
        }
    }

    DmiMemory {
        system_label: system.join(" ").trim().to_string(),
        dimms: dimms
            .into_iter()
            .map(|(size_gb, count)| DimmGroup { size_gb, count })
            .collect(),
        speed: speed.filter(|s| s != "Unknown"),
    }
}

/// Parse total kernel-visible memory from /proc/meminfo
///
/// # Returns
/// * `Some(u64)` - MemTotal in KB
/// * `None` - the file does not start with MemTotal or the value is not numeric
pub fn parse_meminfo_total(meminfo: &str) -> Option<u64> {
    let mut words = meminfo.split_whitespace();
    if words.next()? != "MemTotal:" {
        return None;
    }
    words.next()?.parse().ok()
}
