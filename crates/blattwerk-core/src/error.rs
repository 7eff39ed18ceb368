// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Blattwerk.
//
// Every message renders as "[engine] <Category>: <detail>" so callers that only
// see the string can still pattern-match on the category.

use thiserror::Error;

/// Top-level error type for all page engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    // -- Validation errors --
    #[error("[engine] EmptyInput: {0}")]
    EmptyInput(String),

    #[error("[engine] InvalidPageIndex: page index {index} out of range (document has {page_count} pages)")]
    InvalidPageIndex { index: i64, page_count: usize },

    #[error("[engine] InvalidPageIndex: page index {index} listed more than once")]
    DuplicatePageIndex { index: i64 },

    #[error("[engine] InvalidRange: range {start}..={end} invalid (document has {page_count} pages)")]
    InvalidRange {
        start: i64,
        end: i64,
        page_count: usize,
    },

    #[error("[engine] InvalidPosition: {0}")]
    InvalidPosition(String),

    #[error("[engine] InvalidRotation: rotation must be a multiple of 90, got {0}")]
    InvalidRotation(i64),

    #[error("[engine] UnknownActionType: {0}")]
    UnknownActionType(String),

    // -- Collaborator errors --
    #[error("[engine] CodecError: {0}")]
    Codec(String),

    #[error("[engine] TemplateError: {0}")]
    Template(String),

    #[error("[engine] InvalidDescriptor: {0}")]
    Descriptor(#[from] serde_json::Error),

    #[error("[engine] Internal: {0}")]
    Internal(String),
}

impl EngineError {
    /// The bare category name used in the message prefix.
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyInput(_) => "EmptyInput",
            Self::InvalidPageIndex { .. } | Self::DuplicatePageIndex { .. } => "InvalidPageIndex",
            Self::InvalidRange { .. } => "InvalidRange",
            Self::InvalidPosition(_) => "InvalidPosition",
            Self::InvalidRotation(_) => "InvalidRotation",
            Self::UnknownActionType(_) => "UnknownActionType",
            Self::Codec(_) => "CodecError",
            Self::Template(_) => "TemplateError",
            Self::Descriptor(_) => "InvalidDescriptor",
            Self::Internal(_) => "Internal",
        }
    }

    /// True for errors raised by structural validation, before any mutation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput(_)
                | Self::InvalidPageIndex { .. }
                | Self::DuplicatePageIndex { .. }
                | Self::InvalidRange { .. }
                | Self::InvalidPosition(_)
                | Self::InvalidRotation(_)
                | Self::UnknownActionType(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, EngineError>;
