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

//! Common parsing utilities and helper functions

/// Denylist of vendor boilerplate tokens
///
/// A token is noise when it equals one of `words` or starts with one of
/// `prefixes`. Extractors declare their own tables as `static` values.
#[derive(Debug, Clone, Copy)]
pub struct NoiseFilter {
    pub words: &'static [&'static str],
    pub prefixes: &'static [&'static str],
}

impl NoiseFilter {
    /// Check whether a single token is noise
    pub fn is_noise(&self, token: &str) -> bool {
        self.words.contains(&token) || self.prefixes.iter().any(|p| token.starts_with(p))
    }
}

/// Remove noise tokens, keeping the order of the rest
///
/// # Arguments
/// * `words` - Tokens to filter
/// * `filter` - Denylist to apply
///
/// # Returns
/// * The tokens that are not noise
pub fn strip_noise_tokens<'a, I>(words: I, filter: &NoiseFilter) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    words
        .into_iter()
        .filter(|word| !filter.is_noise(word))
        .collect()
}

/// Convert a size in KB to a human-readable string
///
/// Uses truncating integer division and never rounds:
/// 1023 → "1023 KB", 1024 → "1 MB", 1048575 → "1023 MB", 1048576 → "1 GB".
pub fn size_to_human(kb: u64) -> String {
    const KB_PER_MB: u64 = 1024;
    const KB_PER_GB: u64 = 1024 * 1024;

    if kb < KB_PER_MB {
        format!("{kb} KB")
    } else if kb < KB_PER_GB {
        format!("{} MB", kb / KB_PER_MB)
    } else {
        format!("{} GB", kb / KB_PER_GB)
    }
}

/// Check whether a line's leading tokens equal `prefix`
pub fn starts_with_words(words: &[&str], prefix: &[&str]) -> bool {
    words.len() >= prefix.len() && words[..prefix.len()] == *prefix
}

/// Join the tokens from `start` on with single spaces
pub fn join_from(words: &[&str], start: usize) -> String {
    words.get(start..).map(|w| w.join(" ")).unwrap_or_default()
}

/// Whether `infix` occurs in `text` at byte offset `start`
///
/// Returns false when `start` lies beyond the end of `text`.
pub fn has_infix_at(text: &str, start: usize, infix: &str) -> bool {
    text.as_bytes()
        .get(start..)
        .is_some_and(|rest| rest.starts_with(infix.as_bytes()))
}

/// One entry of a [`Tally`]
#[derive(Debug, Clone, PartialEq)]
pub struct TallyEntry<V> {
    pub key: String,
    pub count: u32,
    pub value: V,
}

/// Counting map that keeps keys in first-seen order
///
/// Recording an existing key increments its count and replaces its value,
/// so the value always reflects the last record for that key.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally<V> {
    entries: Vec<TallyEntry<V>>,
}

impl<V> Default for Tally<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> Tally<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: String, value: V) {
        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => {
                entry.count += 1;
                entry.value = value;
            }
            None => self.entries.push(TallyEntry {
                key,
                count: 1,
                value,
            }),
        }
    }

    pub fn into_entries(self) -> Vec<TallyEntry<V>> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static CORPORATE: NoiseFilter = NoiseFilter {
        words: &["Corporation", "Technologies"],
        prefixes: &[],
    };

    static BOOT: NoiseFilter = NoiseFilter {
        words: &["ro", "quiet"],
        prefixes: &["root=", "rd_NO_"],
    };

    #[test]
    fn test_size_to_human_thresholds() {
        assert_eq!(size_to_human(0), "0 KB");
        assert_eq!(size_to_human(1023), "1023 KB");
        assert_eq!(size_to_human(1024), "1 MB");
        assert_eq!(size_to_human(1048575), "1023 MB");
        assert_eq!(size_to_human(1048576), "1 GB");
        assert_eq!(size_to_human(283848260), "270 GB");
    }

    #[test]
    fn test_size_to_human_truncates() {
        // 1.99 MB still reports 1 MB
        assert_eq!(size_to_human(2047), "1 MB");
        assert_eq!(size_to_human(3 * 1024 * 1024 - 1), "2 GB");
    }

    #[test]
    fn test_strip_noise_words_and_prefixes() {
        let line = "ro root=/dev/mapper/vg-root rd_NO_LUKS crashkernel=128M quiet";
        assert_eq!(
            strip_noise_tokens(line.split_whitespace(), &BOOT),
            vec!["crashkernel=128M"]
        );

        let adapter = "Intel Corporation 82599ES 10-Gigabit";
        assert_eq!(
            strip_noise_tokens(adapter.split_whitespace(), &CORPORATE).join(" "),
            "Intel 82599ES 10-Gigabit"
        );
    }

    #[test]
    fn test_starts_with_words() {
        let words = ["Full", "Stripe", "Size:", "512", "KB"];
        assert!(starts_with_words(&words, &["Full", "Stripe", "Size:"]));
        assert!(!starts_with_words(&words, &["Stripe"]));
        assert!(!starts_with_words(&words[..1], &["Full", "Stripe"]));
    }

    #[test]
    fn test_join_from() {
        let words = ["Size", ":", "278.875", "GB"];
        assert_eq!(join_from(&words, 2), "278.875 GB");
        assert_eq!(join_from(&words, 4), "");
        assert_eq!(join_from(&words, 9), "");
    }

    #[test]
    fn test_has_infix_at() {
        assert!(has_infix_at("ST9146803SS", 4, "4680"));
        assert!(has_infix_at("ST3300657SS", 0, "ST3"));
        assert!(!has_infix_at("ST3", 4, "0MP0"));
        assert!(!has_infix_at("ST9146", 4, "46803"));
    }

    #[test]
    fn test_tally_first_seen_order_last_value_wins() {
        let mut tally = Tally::new();
        tally.record("B".to_string(), 1);
        tally.record("A".to_string(), 2);
        tally.record("B".to_string(), 3);

        let entries = tally.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "B");
        assert_eq!(entries[0].count, 2);
        assert_eq!(entries[0].value, 3);
        assert_eq!(entries[1].key, "A");
        assert_eq!(entries[1].count, 1);
    }
}
