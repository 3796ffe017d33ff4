/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

/// Canonical form of a config key.
///
/// Config keys are ascii, `Flush-Interval`, `flush-interval` and
/// `flush_interval` all name the same option.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_key() {
        assert_eq!(normalize("flush_interval"), "flush_interval");
        assert_eq!(normalize("Flush-Interval"), "flush_interval");
        assert_eq!(normalize("MAX-BUFFER_SIZE"), "max_buffer_size");
        assert_eq!(normalize(" token_file "), "token_file");
    }
}
