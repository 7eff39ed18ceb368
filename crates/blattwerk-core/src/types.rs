// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Blattwerk page engine.
//
// Page indices in caller-facing descriptors are `i64` so that negative or
// oversized values coming from structured descriptors reach the bounds
// validator and fail with a typed error instead of a deserialisation error.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{EngineError, Result};

/// Identifier attached to the tracing span of a single engine invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(pub Uuid);

impl CallId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// -- Placement ----------------------------------------------------------------

/// Symbolic insertion point between existing pages.
///
/// Serialised as `"start"`, `"end"`, or a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    /// Before the first page (index 0).
    Start,
    /// After the last page (index = page count).
    #[default]
    End,
    /// Explicit index, clamped into `[0, page_count]` when resolved.
    Index(i64),
}

impl FromStr for Position {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            _ => trimmed.parse::<i64>().map(Self::Index).map_err(|_| {
                EngineError::InvalidPosition(format!(
                    "unknown position {:?}, expected \"start\", \"end\", or an index",
                    s
                ))
            }),
        }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Start => serializer.serialize_str("start"),
            Self::End => serializer.serialize_str("end"),
            Self::Index(index) => serializer.serialize_i64(*index),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPosition {
    Index(i64),
    Keyword(String),
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match RawPosition::deserialize(deserializer)? {
            RawPosition::Index(index) => Ok(Self::Index(index)),
            RawPosition::Keyword(keyword) => keyword.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Inclusive page range. Missing bounds default to the first and last page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

impl PageRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Every page of the document.
    pub fn all() -> Self {
        Self::default()
    }
}

// -- Templates ----------------------------------------------------------------

/// One input record for a template: field name to value.
pub type Record = serde_json::Map<String, Value>;

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Tabloid => (279, 432),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

fn default_font_size() -> f32 {
    11.0
}

/// A text slot on a template page, filled from one record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateField {
    /// Record key whose value is written into this slot.
    pub key: String,
    /// Literal text written before the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Distance from the left page edge.
    pub x_mm: f32,
    /// Distance from the top page edge.
    pub y_mm: f32,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Wrap the rendered text at this many characters per line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap_chars: Option<usize>,
}

impl TemplateField {
    pub fn new(key: impl Into<String>, x_mm: f32, y_mm: f32) -> Self {
        Self {
            key: key.into(),
            label: None,
            x_mm,
            y_mm,
            font_size: default_font_size(),
            wrap_chars: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Declarative page layout rendered once per input record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Falls back to the engine's configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_size: Option<PaperSize>,
    #[serde(default)]
    pub fields: Vec<TemplateField>,
}

// -- Descriptors --------------------------------------------------------------

/// One source of pages for Advanced Merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MergeItem {
    /// Pages of an existing document; all pages when `pages` is absent.
    Document {
        bytes: Vec<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pages: Option<Vec<i64>>,
    },
    /// One rendered page per input record, in record order.
    Template {
        layout: TemplateLayout,
        #[serde(default)]
        inputs: Vec<Record>,
    },
}

impl MergeItem {
    pub const KINDS: [&'static str; 2] = ["document", "template"];

    pub fn document(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Document {
            bytes: bytes.into(),
            pages: None,
        }
    }

    pub fn document_pages(bytes: impl Into<Vec<u8>>, pages: Vec<i64>) -> Self {
        Self::Document {
            bytes: bytes.into(),
            pages: Some(pages),
        }
    }

    pub fn template(layout: TemplateLayout, inputs: Vec<Record>) -> Self {
        Self::Template { layout, inputs }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Document { .. } => "document",
            Self::Template { .. } => "template",
        }
    }

    /// Decode one item, rejecting unknown `kind` tags before field decoding.
    pub fn from_value(value: Value) -> Result<Self> {
        check_tag(&value, "kind", &Self::KINDS, "merge item")?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Decode a JSON array of merge items.
pub fn parse_items(json: &str) -> Result<Vec<MergeItem>> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    values.into_iter().map(MergeItem::from_value).collect()
}

/// One step of the organize pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OrganizeAction {
    Remove { position: i64 },
    Insert { document: Vec<u8>, position: Position },
    Replace { document: Vec<u8>, position: i64 },
    Rotate { position: i64, degrees: i64 },
    Move { from: i64, to: i64 },
}

impl OrganizeAction {
    pub const TYPES: [&'static str; 5] = ["remove", "insert", "replace", "rotate", "move"];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Remove { .. } => "remove",
            Self::Insert { .. } => "insert",
            Self::Replace { .. } => "replace",
            Self::Rotate { .. } => "rotate",
            Self::Move { .. } => "move",
        }
    }

    /// Decode one action, rejecting unknown `type` tags before field decoding.
    pub fn from_value(value: Value) -> Result<Self> {
        check_tag(&value, "type", &Self::TYPES, "action")?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Decode a JSON array of organize actions.
pub fn parse_actions(json: &str) -> Result<Vec<OrganizeAction>> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    values.into_iter().map(OrganizeAction::from_value).collect()
}

fn check_tag(value: &Value, tag: &str, known: &[&str], what: &str) -> Result<()> {
    match value.get(tag).and_then(Value::as_str) {
        Some(name) if known.contains(&name) => Ok(()),
        Some(name) => Err(EngineError::UnknownActionType(format!(
            "unknown {} {} {:?} (expected one of {})",
            what,
            tag,
            name,
            known.join(", ")
        ))),
        None => Err(EngineError::UnknownActionType(format!(
            "{} has no {:?} tag",
            what, tag
        ))),
    }
}

/// A document to splice into a base document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertRequest {
    pub document: Vec<u8>,
    /// Relative to the base document's original page indices.
    pub position: Position,
}

impl InsertRequest {
    pub fn new(document: impl Into<Vec<u8>>, position: Position) -> Self {
        Self {
            document: document.into(),
            position,
        }
    }
}

/// Single-page relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: i64,
    pub to: i64,
}

/// One fold step of Template-Sequence Merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub layout: TemplateLayout,
    #[serde(default)]
    pub inputs: Vec<Record>,
    #[serde(default)]
    pub position: Position,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    #[serde(default)]
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn position_parses_keywords_and_integers() {
        assert_eq!("start".parse::<Position>().unwrap(), Position::Start);
        assert_eq!("END".parse::<Position>().unwrap(), Position::End);
        assert_eq!(" 4 ".parse::<Position>().unwrap(), Position::Index(4));

        let err = "middle".parse::<Position>().unwrap_err();
        assert_eq!(err.category(), "InvalidPosition");
    }

    #[test]
    fn position_deserialises_from_json() {
        let positions: Vec<Position> = serde_json::from_value(json!(["start", "end", 3])).unwrap();
        assert_eq!(
            positions,
            vec![Position::Start, Position::End, Position::Index(3)]
        );
        assert!(serde_json::from_value::<Position>(json!("sideways")).is_err());
        assert_eq!(serde_json::to_value(Position::Index(-2)).unwrap(), json!(-2));
    }

    #[test]
    fn actions_decode_by_type_tag() {
        let actions = parse_actions(
            r#"[
                {"type": "remove", "position": 0},
                {"type": "rotate", "position": 0, "degrees": 90},
                {"type": "move", "from": 2, "to": 0},
                {"type": "insert", "document": [37, 80], "position": "start"}
            ]"#,
        )
        .unwrap();

        assert_eq!(actions[0], OrganizeAction::Remove { position: 0 });
        assert_eq!(
            actions[1],
            OrganizeAction::Rotate {
                position: 0,
                degrees: 90
            }
        );
        assert_eq!(actions[2].name(), "move");
        assert_eq!(
            actions[3],
            OrganizeAction::Insert {
                document: vec![37, 80],
                position: Position::Start
            }
        );
    }

    #[test]
    fn unknown_action_type_is_rejected() {
        let err = parse_actions(r#"[{"type": "shuffle", "seed": 4}]"#).unwrap_err();
        assert!(matches!(err, EngineError::UnknownActionType(_)));

        let err = OrganizeAction::from_value(json!({"position": 1})).unwrap_err();
        assert!(matches!(err, EngineError::UnknownActionType(_)));
    }

    #[test]
    fn malformed_known_action_is_a_descriptor_error() {
        let err = parse_actions(r#"[{"type": "move", "from": 1}]"#).unwrap_err();
        assert_eq!(err.category(), "InvalidDescriptor");
    }

    #[test]
    fn merge_items_decode_by_kind() {
        let items = parse_items(
            r#"[
                {"kind": "document", "bytes": [1, 2], "pages": [1, 0]},
                {"kind": "template", "layout": {"fields": [{"key": "name", "x_mm": 20, "y_mm": 30}]},
                 "inputs": [{"name": "Ada"}, {"name": "Grace"}]}
            ]"#,
        )
        .unwrap();

        assert_eq!(items[0], MergeItem::document_pages(vec![1, 2], vec![1, 0]));
        assert_eq!(items[0].kind(), "document");
        assert_eq!(items[1].kind(), "template");
        match &items[1] {
            MergeItem::Template { layout, inputs } => {
                assert_eq!(layout.fields[0].font_size, 11.0);
                assert_eq!(inputs.len(), 2);
            }
            other => panic!("expected template item, got {:?}", other),
        }

        let err = parse_items(r#"[{"kind": "image"}]"#).unwrap_err();
        assert!(matches!(err, EngineError::UnknownActionType(_)));
    }

    #[test]
    fn page_range_defaults_are_open() {
        let range: PageRange = serde_json::from_value(json!({"end": 2})).unwrap();
        assert_eq!(range.start, None);
        assert_eq!(range.end, Some(2));
        assert_eq!(PageRange::all(), PageRange::default());
    }
}
