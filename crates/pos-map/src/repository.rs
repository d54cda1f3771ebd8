//! Mapping templates persisted on disk.
//!
//! A template records which source column label fed each target field, so a
//! file with the same header layout can be mapped again without manual work.
//!
//! # Storage Format
//!
//! Templates are stored as JSON files named `{name}.json`, where the name is
//! lowercased and every non-alphanumeric character becomes `_`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use pos_model::{ColumnId, FieldId, Mapping, SourceSchema};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::MappingState;

/// A saved field-to-column-label assignment set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingTemplate {
    /// Template name as given by the user.
    pub name: String,
    /// Name of the catalog the template targets.
    pub catalog: String,
    /// Fingerprint of the source schema the template was saved from.
    pub fingerprint: String,
    /// Field id to source column label.
    pub assignments: BTreeMap<FieldId, String>,
    /// When the template was saved.
    pub saved_at: DateTime<Utc>,
    /// Optional notes about this template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Version of the template format.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl MappingTemplate {
    /// Captures the current assignments of `state`.
    pub fn from_state(name: impl Into<String>, state: &MappingState) -> Self {
        let schema = state.schema();
        let assignments = state
            .mapping()
            .iter()
            .map(|(field, column)| (field.clone(), schema.label_of(column).to_string()))
            .collect();
        Self {
            name: name.into(),
            catalog: state.catalog().name().to_string(),
            fingerprint: schema.fingerprint(),
            assignments,
            saved_at: Utc::now(),
            description: None,
            version: default_version(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// True when the template was saved from a file with the same header layout.
    pub fn matches_schema(&self, schema: &SourceSchema) -> bool {
        self.fingerprint == schema.fingerprint()
    }

    /// Resolves the stored labels against `schema`.
    ///
    /// Labels with no matching column are dropped, as are fields already
    /// mapped in `mapping`.
    pub fn assignments_for(
        &self,
        schema: &SourceSchema,
        mapping: &Mapping,
    ) -> Vec<(FieldId, ColumnId)> {
        self.assignments
            .iter()
            .filter(|(field, _)| !mapping.is_mapped(field))
            .filter_map(|(field, label)| {
                schema
                    .find_by_label(label)
                    .map(|column| (field.clone(), column.id.clone()))
            })
            .collect()
    }

    /// Applies the template to `state` without overwriting existing assignments.
    pub fn apply(&self, state: &mut MappingState) -> Vec<(FieldId, ColumnId)> {
        let pairs = self.assignments_for(state.schema(), state.mapping());
        let (applied, _) = state.fill_unmapped(pairs);
        debug!(
            template = %self.name,
            applied = applied.len(),
            "applied mapping template"
        );
        applied
    }
}

/// Directory of saved [`MappingTemplate`]s.
#[derive(Debug, Clone)]
pub struct TemplateRepository {
    base_dir: PathBuf,
}

impl TemplateRepository {
    /// Opens the repository at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).with_context(|| {
            format!(
                "Failed to create template repository: {}",
                base_dir.display()
            )
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Writes `template`, replacing any template with the same name.
    pub fn save(&self, template: &MappingTemplate) -> Result<PathBuf> {
        let path = self.template_path(&template.name);
        let json = serde_json::to_string_pretty(template)
            .with_context(|| format!("Failed to serialize template {}", template.name))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write template to {}", path.display()))?;
        debug!(path = %path.display(), "saved mapping template");
        Ok(path)
    }

    /// Loads a template by name. Returns `None` if it does not exist.
    pub fn load(&self, name: &str) -> Result<Option<MappingTemplate>> {
        let path = self.template_path(name);
        if !path.exists() {
            return Ok(None);
        }
        read_template(&path).map(Some)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.template_path(name).exists()
    }

    /// All readable templates, sorted by name. Unparseable files are skipped.
    pub fn list(&self) -> Result<Vec<MappingTemplate>> {
        let mut templates = Vec::new();
        for entry in fs::read_dir(&self.base_dir)
            .with_context(|| format!("Failed to read repository: {}", self.base_dir.display()))?
        {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_template(&path) {
                Ok(template) => templates.push(template),
                Err(error) => debug!(path = %path.display(), %error, "skipping template"),
            }
        }
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    /// Most recently saved template whose fingerprint matches `schema`.
    pub fn find_for_schema(&self, schema: &SourceSchema) -> Result<Option<MappingTemplate>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|t| t.matches_schema(schema))
            .max_by_key(|t| t.saved_at))
    }

    /// Deletes a template. Returns `false` if it did not exist.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.template_path(name);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .with_context(|| format!("Failed to delete template: {}", path.display()))?;
        Ok(true)
    }

    fn template_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", normalize_name(name)))
    }
}

fn read_template(path: &Path) -> Result<MappingTemplate> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read template from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse template from {}", path.display()))
}

/// Normalize a template name for use in filenames.
fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
