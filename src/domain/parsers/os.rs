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

//! Operating system and kernel setting parsers

use super::common::{strip_noise_tokens, NoiseFilter};
use crate::domain::{Overcommit, PageSetting};

/// Boilerplate in lsb_release and release-file output
static DISTRIBUTION_NOISE: NoiseFilter = NoiseFilter {
    words: &["Description:", "Server", "release"],
    // Code names such as "(Final)" or "(Santiago)"
    prefixes: &["("],
};

/// Boot parameters that say nothing about performance
static BOOT_NOISE: NoiseFilter = NoiseFilter {
    words: &["ro", "rhgb", "quiet"],
    prefixes: &[
        "root=",
        "ramdisk_size=",
        "vga=",
        "usbcore.autosuspend=",
        "rd_NO_",
        "rd_MD_",
        "rd_LVM_",
        "LANG=",
        "SYSFONT=",
        "KEYBOARDTYPE=",
        "KEYTABLE=",
    ],
};

/// Parse a distribution description
///
/// Accepts `lsb_release --description` output or the contents of a release
/// file such as /etc/redhat-release.
///
/// # Returns
/// * `Some(String)` - e.g. "CentOS 6.6"
/// * `None` - nothing left after removing boilerplate
pub fn parse_distribution(text: &str) -> Option<String> {
    let words = strip_noise_tokens(text.split_whitespace(), &DISTRIBUTION_NOISE);
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Parse PRETTY_NAME from /etc/os-release and clean it like a release file
pub fn parse_os_release(text: &str) -> Option<String> {
    text.lines()
        .filter_map(|line| line.trim().strip_prefix("PRETTY_NAME="))
        .map(|value| value.trim_matches(|c| c == '"' || c == '\''))
        .find_map(parse_distribution)
}

/// Parse a kernel release string (uname --kernel-release)
pub fn parse_kernel_release(text: &str) -> Option<String> {
    let release = text.trim();
    if release.is_empty() {
        None
    } else {
        Some(release.to_string())
    }
}

/// Parse /proc/cmdline into the options worth reporting
pub fn parse_boot_options(cmdline: &str) -> Vec<String> {
    strip_noise_tokens(cmdline.split_whitespace(), &BOOT_NOISE)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Parse a transparent huge page control file ("enabled" or "defrag")
///
/// The active choice is bracketed, e.g. "[always] madvise never".
pub fn parse_huge_page_setting(text: &str) -> PageSetting {
    if text.split_whitespace().any(|word| word == "[always]") {
        PageSetting::Enabled
    } else {
        PageSetting::Disabled
    }
}

/// Parse /proc/sys/vm/overcommit_memory
///
/// # Returns
/// * `Some(Overcommit)` - "1" enabled, "2" maybe, anything else disabled
/// * `None` - the file was empty
pub fn parse_overcommit(text: &str) -> Option<Overcommit> {
    match text.trim_start().chars().next()? {
        '1' => Some(Overcommit::Enabled),
        '2' => Some(Overcommit::Maybe),
        _ => Some(Overcommit::Disabled),
    }
}
