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

//! CPU information parsing functions

use super::common::{starts_with_words, strip_noise_tokens, NoiseFilter};
use crate::domain::{CpuBrand, CpuFacts};
use std::collections::HashSet;

/// Marketing tokens removed from the model name
static MODEL_NOISE: NoiseFilter = NoiseFilter {
    words: &["Intel(R)", "Xeon(R)", "Processor", "0"],
    prefixes: &[],
};

/// Clean a `model name` value and detect the brand it implies
fn clean_model_name(words: &[&str]) -> (String, Option<CpuBrand>) {
    let mut brand = None;
    let cleaned: Vec<&str> = strip_noise_tokens(words.iter().copied(), &MODEL_NOISE)
        .into_iter()
        .map(|word| match word {
            "Opteron(tm)" => "Opteron",
            "Core(TM)" => "Core",
            "AMD" => {
                brand = Some(CpuBrand::Amd);
                word
            }
            other => other,
        })
        .collect();
    (cleaned.join(" "), brand)
}

fn brand_from_vendor_id(vendor: &str) -> CpuBrand {
    match vendor {
        "GenuineIntel" => CpuBrand::Intel,
        "AuthenticAMD" => CpuBrand::Amd,
        _ => CpuBrand::Other,
    }
}

/// Parse CPU topology from /proc/cpuinfo
///
/// Every `processor` entry is one hardware thread. Packages are the distinct
/// `physical id` values; when `cpu cores` is missing the distinct
/// (`physical id`, `core id`) pairs stand in for it.
///
/// # Arguments
/// * `cpuinfo` - Contents of /proc/cpuinfo
///
/// # Returns
/// * Parsed CPU facts; missing fields stay at zero/"Unknown"
pub fn parse_cpuinfo(cpuinfo: &str) -> CpuFacts {
    let mut threads = 0u32;
    let mut cores = 0u32;
    let mut physical = "0".to_string();
    let mut core_ids: HashSet<(String, String)> = HashSet::new();
    let mut packages: HashSet<String> = HashSet::new();
    let mut model: Option<String> = None;
    let mut model_brand: Option<CpuBrand> = None;
    let mut vendor_brand: Option<CpuBrand> = None;

    for line in cpuinfo.lines() {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() < 3 {
            continue;
        }
        if words[0] == "processor" {
            threads += 1;
            continue;
        }
        if words.len() < 4 {
            // vendor_id is the only interesting key with a one-word value
            if words[0] == "vendor_id" && vendor_brand.is_none() {
                vendor_brand = Some(brand_from_vendor_id(words[2]));
            }
            continue;
        }

        if starts_with_words(&words, &["model", "name"]) {
            if model.is_none() {
                let (cleaned, brand) = clean_model_name(&words[3..]);
                model = Some(cleaned);
                model_brand = brand;
            }
        } else if starts_with_words(&words, &["cpu", "cores"]) {
            if let Ok(count) = words[3].parse::<u32>() {
                cores = cores.max(count);
            }
        } else if starts_with_words(&words, &["physical", "id"]) {
            physical = words[3].to_string();
            packages.insert(physical.clone());
        } else if starts_with_words(&words, &["core", "id"]) {
            core_ids.insert((physical.clone(), words[3].to_string()));
        }
    }

    let chips = packages.len() as u32;
    if cores == 0 {
        // Some kernels do not report "cpu cores"
        cores = core_ids.len() as u32;
        if chips > 1 {
            cores /= chips;
        }
    }

    let brand = vendor_brand.or(model_brand).unwrap_or_default();

    CpuFacts {
        packages: chips,
        cores_per_package: cores,
        threads,
        hyperthreading: chips > 0 && threads > cores.saturating_mul(chips),
        brand,
        model: model.unwrap_or_else(|| "Unknown".to_string()),
    }
}
