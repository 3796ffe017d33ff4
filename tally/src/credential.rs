/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::path::Path;

use anyhow::{Context, anyhow};

/// Read an api token from a local file, surrounding white spaces are ignored
pub fn load_token(path: &Path) -> anyhow::Result<String> {
    let content = std::fs::read_to_string(path)
        .context(format!("failed to read token file {}", path.display()))?;
    let token = content.trim();
    if token.is_empty() {
        return Err(anyhow!("token file {} is empty", path.display()));
    }
    Ok(token.to_string())
}
