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

//! Hadoop `hdfs getconf` output parsers

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BLOCK_SIZE_RE: Regex = Regex::new(r"^(\d+)([kKmMgGtTpPeE]?)$").unwrap();
}

/// Parse `which hdfs` output
///
/// # Returns
/// * `Some(String)` - the output is exactly one token, the command path
/// * `None` - hdfs is not installed (`which` prints an error sentence)
pub fn resolve_command_path(which_output: &str) -> Option<String> {
    let mut words = which_output.split_whitespace();
    let path = words.next()?;
    if words.next().is_some() {
        return None;
    }
    Some(path.to_string())
}

/// Parse `hdfs getconf -confKey dfs.blocksize` into megabytes
///
/// Accepts a plain byte count or a value with a binary size suffix
/// (`128m`, `1g`), as Hadoop does.
///
/// # Returns
/// * `Some(u64)` - block size in MB, truncated
/// * `None` - unparsable or zero
pub fn parse_block_size(output: &str) -> Option<u64> {
    let captures = BLOCK_SIZE_RE.captures(output.trim())?;
    let value: u64 = captures.get(1)?.as_str().parse().ok()?;
    let shift = match captures.get(2).map(|m| m.as_str().to_ascii_lowercase()).as_deref() {
        Some("k") => 10,
        Some("m") => 20,
        Some("g") => 30,
        Some("t") => 40,
        Some("p") => 50,
        Some("e") => 60,
        _ => 0,
    };
    let bytes = value.checked_mul(1u64.checked_shl(shift)?)?;
    if bytes == 0 {
        return None;
    }
    Some(bytes / (1024 * 1024))
}

/// Parse `hdfs getconf -confKey dfs.datanode.max.transfer.threads`
pub fn parse_transfer_threads(output: &str) -> String {
    output.trim().to_string()
}
