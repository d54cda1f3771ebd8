//! Target field catalog.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::field::{FieldKind, TargetField};
use crate::ids::FieldId;

/// Ordered, validated list of target fields.
///
/// Field ids are unique and the list is never empty. Order is significant:
/// auto-mapping and error reporting walk fields in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct TargetCatalog {
    name: String,
    fields: Vec<TargetField>,
}

#[derive(Deserialize)]
struct RawCatalog {
    name: String,
    fields: Vec<TargetField>,
}

impl TryFrom<RawCatalog> for TargetCatalog {
    type Error = ModelError;

    fn try_from(raw: RawCatalog) -> Result<Self> {
        Self::new(raw.name, raw.fields)
    }
}

impl TargetCatalog {
    pub fn new(name: impl Into<String>, fields: Vec<TargetField>) -> Result<Self> {
        let name = name.into();
        if fields.is_empty() {
            return Err(ModelError::EmptyCatalog(name));
        }
        let mut seen = BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.id.clone()) {
                return Err(ModelError::DuplicateField(field.id.to_string()));
            }
        }
        Ok(Self { name, fields })
    }

    /// The product catalog of the point-of-sale back office.
    ///
    /// Four required fields (SKU, name, price, category) and three optional
    /// ones (description, stock, barcode).
    pub fn products() -> Self {
        let fields = vec![
            TargetField::required(FieldId::known("sku"), "SKU")
                .with_description("Unique stock keeping unit")
                .with_example("BURG-001")
                .with_aliases(["item code", "product code", "item id", "plu", "sku code"])
                .unique(),
            TargetField::required(FieldId::known("name"), "Product Name")
                .with_description("Name shown on the menu and receipts")
                .with_example("Classic Burger")
                .with_aliases(["item name", "product", "item", "title", "menu item"])
                .with_max_length(120),
            TargetField::required(FieldId::known("price"), "Price")
                .with_kind(FieldKind::Decimal)
                .with_description("Selling price before tax")
                .with_example("12.50")
                .with_aliases(["unit price", "retail price", "sell price", "selling price"]),
            TargetField::required(FieldId::known("category"), "Category")
                .with_description("Menu category the product is listed under")
                .with_example("Mains")
                .with_aliases(["department", "menu category", "group", "product category"]),
            TargetField::optional(FieldId::known("description"), "Description")
                .with_example("Beef patty, cheddar, brioche bun")
                .with_aliases(["details", "desc", "notes"])
                .with_max_length(500),
            TargetField::optional(FieldId::known("stock"), "Stock Quantity")
                .with_kind(FieldKind::Integer)
                .with_example("42")
                .with_aliases(["stock", "quantity", "qty", "on hand", "inventory"]),
            TargetField::optional(FieldId::known("barcode"), "Barcode")
                .with_kind(FieldKind::Barcode)
                .with_example("5012345678900")
                .with_aliases(["upc", "ean", "gtin"]),
        ];
        Self {
            name: "products".to_string(),
            fields,
        }
    }

    /// Parse a catalog from JSON text.
    pub fn from_json_str(json: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| ModelError::CatalogParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| ModelError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json, path)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[TargetField] {
        &self.fields
    }

    pub fn field(&self, id: &FieldId) -> Option<&TargetField> {
        self.fields.iter().find(|f| &f.id == id)
    }

    /// Look up a field by its id string.
    pub fn field_by_str(&self, id: &str) -> Option<&TargetField> {
        self.fields.iter().find(|f| f.id.as_str() == id)
    }

    pub fn contains(&self, id: &FieldId) -> bool {
        self.field(id).is_some()
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &TargetField> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Label of a field, falling back to its id.
    pub fn label_of<'a>(&'a self, id: &'a FieldId) -> &'a str {
        self.field(id).map_or(id.as_str(), |f| f.label.as_str())
    }
}
