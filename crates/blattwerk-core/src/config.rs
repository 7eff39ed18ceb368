// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How Remove treats an index that appears more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateIndexPolicy {
    /// Remove each distinct page once.
    #[default]
    Dedupe,
    /// Fail the call with `DuplicatePageIndex`.
    Reject,
}

/// Settings shared by every call made through one engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// PDF version header for documents the engine creates from scratch.
    pub pdf_version: String,
    pub duplicate_indices: DuplicateIndexPolicy,
    /// Drop objects no longer reachable from the trailer when saving.
    pub prune_unused_objects: bool,
    /// Flate-compress uncompressed streams when saving.
    pub compress_output: bool,
    /// Paper size for template layouts that do not name one.
    pub default_paper_size: crate::PaperSize,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pdf_version: "1.5".to_string(),
            duplicate_indices: DuplicateIndexPolicy::Dedupe,
            prune_unused_objects: true,
            compress_output: false,
            default_paper_size: crate::PaperSize::A4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{"duplicate_indices": "reject", "compress_output": true}"#)
                .unwrap();
        assert_eq!(config.duplicate_indices, DuplicateIndexPolicy::Reject);
        assert!(config.compress_output);
        assert_eq!(config.pdf_version, "1.5");
        assert!(config.prune_unused_objects);
    }

    #[test]
    fn malformed_json_is_a_descriptor_error() {
        let err = EngineConfig::from_json_str("{").unwrap_err();
        assert_eq!(err.category(), "InvalidDescriptor");
    }
}
