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

//! Drive speed inference from vendor part numbers
//!
//! MegaCli reports only the inquiry string of a drive, so the rotational
//! speed and form factor are guessed from well-known part number layouts.

use crate::domain::parsers::common::has_infix_at;

/// Test applied to the first word of a drive model
#[derive(Debug, Clone, Copy)]
enum VendorMatch {
    OneOf(&'static [&'static str]),
    Contains(&'static str),
}

/// Test applied to the second word of a drive model
#[derive(Debug, Clone, Copy)]
enum PartMatch {
    /// Matches whether or not a part word is present
    Any,
    /// `infix` occurs at byte offset `start`
    At(usize, &'static str),
    Prefix(&'static str),
    PrefixContaining(&'static str, &'static str),
}

impl VendorMatch {
    fn matches(&self, vendor: &str) -> bool {
        match self {
            VendorMatch::OneOf(names) => names.contains(&vendor),
            VendorMatch::Contains(infix) => vendor.contains(infix),
        }
    }
}

impl PartMatch {
    fn matches(&self, part: Option<&str>) -> bool {
        match (self, part) {
            (PartMatch::Any, _) => true,
            (_, None) => false,
            (PartMatch::At(start, infix), Some(part)) => has_infix_at(part, *start, infix),
            (PartMatch::Prefix(prefix), Some(part)) => part.starts_with(prefix),
            (PartMatch::PrefixContaining(prefix, infix), Some(part)) => {
                part.starts_with(prefix) && part.contains(infix)
            }
        }
    }
}

/// One row of the speed table; `part` matches when any entry matches
#[derive(Debug, Clone, Copy)]
struct SpeedRule {
    vendor: VendorMatch,
    part: &'static [PartMatch],
    speed: &'static str,
}

const SEAGATE: VendorMatch = VendorMatch::OneOf(&["SEAGATE", "Seagate"]);
const TOSHIBA: VendorMatch = VendorMatch::OneOf(&["TOSHIBA"]);

/// Ordered rules, first match wins
static SPEED_RULES: &[SpeedRule] = &[
    SpeedRule {
        vendor: SEAGATE,
        part: &[PartMatch::At(4, "0MP0")],
        speed: "15K RPM 2.5 inch",
    },
    SpeedRule {
        vendor: SEAGATE,
        part: &[PartMatch::At(6, "06")],
        speed: "7.2K RPM 2.5 inch",
    },
    SpeedRule {
        vendor: SEAGATE,
        part: &[PartMatch::At(5, "0NC0")],
        speed: "7.2K RPM 3.5 inch",
    },
    SpeedRule {
        vendor: SEAGATE,
        part: &[
            PartMatch::At(5, "0NM0"),
            PartMatch::Prefix("ST3"),
            PartMatch::Prefix("ST2"),
        ],
        speed: "7.2K RPM 3.5 inch",
    },
    SpeedRule {
        vendor: SEAGATE,
        part: &[PartMatch::Prefix("ST4000NC")],
        speed: "5.9K RPM 3.5 inch",
    },
    SpeedRule {
        vendor: SEAGATE,
        part: &[PartMatch::PrefixContaining("ST91", "0NS")],
        speed: "7.2K RPM 2.5 inch SATA",
    },
    SpeedRule {
        vendor: SEAGATE,
        part: &[
            PartMatch::Prefix("ST9"),
            PartMatch::At(4, "0MM0"),
            PartMatch::At(5, "0MM0"),
        ],
        speed: "10K RPM 2.5 inch",
    },
    SpeedRule {
        vendor: TOSHIBA,
        part: &[PartMatch::Prefix("MBF2")],
        speed: "10K RPM 2.5 inch",
    },
    SpeedRule {
        vendor: TOSHIBA,
        part: &[PartMatch::Prefix("MG03")],
        speed: "7.2K RPM 3.5 inch",
    },
    // SATA drives whose inquiry string has the serial number glued on
    SpeedRule {
        vendor: VendorMatch::Contains("ST910"),
        part: &[PartMatch::Any],
        speed: "7.2K RPM 2.5 inch SATA",
    },
];

/// Guess the speed class of a drive from its model string
///
/// # Arguments
/// * `model` - Vendor word followed by part number, e.g. "SEAGATE ST9300603SS"
///
/// # Returns
/// * Speed description, or an empty string when no rule applies
pub fn infer_drive_speed(model: &str) -> String {
    let mut words = model.split_whitespace();
    let Some(vendor) = words.next() else {
        return String::new();
    };
    let part = words.next();

    SPEED_RULES
        .iter()
        .find(|rule| rule.vendor.matches(vendor) && rule.part.iter().any(|p| p.matches(part)))
        .map(|rule| rule.speed.to_string())
        .unwrap_or_default()
}
