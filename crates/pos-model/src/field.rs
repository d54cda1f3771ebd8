//! Target field definitions.
//!
//! A [`TargetField`] describes one attribute of the system being imported
//! into. Fields are static for a session; the catalog they live in is
//! immutable once loaded.

use serde::{Deserialize, Serialize};

use crate::ids::FieldId;

/// Kind of value a target field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text.
    #[default]
    Text,
    /// Decimal amount such as a price.
    Decimal,
    /// Whole number such as a stock count.
    Integer,
    /// EAN/UPC/GTIN style digit string.
    Barcode,
}

impl FieldKind {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Decimal => "Decimal",
            Self::Integer => "Integer",
            Self::Barcode => "Barcode",
        }
    }
}

/// A destination attribute of the import target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetField {
    pub id: FieldId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub kind: FieldKind,
    /// Alternative column labels recognised by auto-mapping.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Values must not repeat across rows.
    #[serde(default)]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl TargetField {
    pub fn required(id: FieldId, label: impl Into<String>) -> Self {
        Self::with_requirement(id, label, true)
    }

    pub fn optional(id: FieldId, label: impl Into<String>) -> Self {
        Self::with_requirement(id, label, false)
    }

    fn with_requirement(id: FieldId, label: impl Into<String>, required: bool) -> Self {
        Self {
            id,
            label: label.into(),
            description: None,
            example: None,
            required,
            kind: FieldKind::Text,
            aliases: Vec::new(),
            unique: false,
            max_length: None,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}
