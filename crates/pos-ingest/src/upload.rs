//! Upload zone: file acceptance by extension and size.
//!
//! The zone keeps only a [`FileHandle`] (name, size, optional path) and the
//! drag-hover flag. It never holds file content.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::UploadError;

/// Default maximum upload size: 10 MB.
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// A selected file, before any content is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub size_bytes: u64,
    pub path: Option<PathBuf>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            path: None,
        }
    }

    /// Builds a handle from a file on disk.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            size_bytes: metadata.len(),
            path: Some(path.to_path_buf()),
        })
    }

    /// Lowercased extension including the dot, e.g. `.csv`.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(format!(".{}", ext.to_lowercase()))
    }
}

/// Which files the upload zone accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadPolicy {
    /// Extensions including the leading dot, compared case-insensitively.
    pub allowed_extensions: Vec<String>,
    pub max_size_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: vec![".csv".to_string(), ".xlsx".to_string()],
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn allows_extension(&self, extension: &str) -> bool {
        let wanted = canonical_extension(extension);
        self.allowed_extensions
            .iter()
            .any(|allowed| canonical_extension(allowed) == wanted)
    }

    /// Allowed extensions as prose: `.csv or .xlsx`, `.csv, .tsv or .xlsx`.
    pub fn describe_extensions(&self) -> String {
        let exts: Vec<String> = self
            .allowed_extensions
            .iter()
            .map(String::as_str)
            .map(canonical_extension)
            .collect();
        match exts.split_last() {
            None => "supported".to_string(),
            Some((last, [])) => last.clone(),
            Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
        }
    }

    /// Checks a file against the policy. Extension is checked before size.
    pub fn check(&self, file: &FileHandle) -> Result<(), UploadError> {
        let supported = file
            .extension()
            .is_some_and(|ext| self.allows_extension(&ext));
        if !supported {
            return Err(UploadError::UnsupportedType {
                name: file.name.clone(),
                allowed: self.describe_extensions(),
            });
        }
        if file.size_bytes > self.max_size_bytes {
            return Err(UploadError::TooLarge {
                name: file.name.clone(),
                size_bytes: file.size_bytes,
                max_bytes: self.max_size_bytes,
            });
        }
        Ok(())
    }
}

fn canonical_extension(raw: &str) -> String {
    let trimmed = raw.trim().to_lowercase();
    if trimmed.starts_with('.') {
        trimmed
    } else {
        format!(".{trimmed}")
    }
}

/// State of the upload drop target.
#[derive(Debug, Clone, Default)]
pub struct UploadZone {
    policy: UploadPolicy,
    file: Option<FileHandle>,
    error: Option<String>,
    is_dragging: bool,
}

impl UploadZone {
    pub fn new(policy: UploadPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub fn file(&self) -> Option<&FileHandle> {
        self.file.as_ref()
    }

    /// Message of the last rejection, cleared by the next accepted file.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.is_dragging = dragging;
    }

    /// A file dropped onto the zone.
    pub fn drop_file(&mut self, file: FileHandle) -> Result<&FileHandle, UploadError> {
        self.is_dragging = false;
        self.accept(file)
    }

    /// A file chosen through the file picker.
    pub fn browse_file(&mut self, file: FileHandle) -> Result<&FileHandle, UploadError> {
        self.accept(file)
    }

    /// Accepts or rejects `file`. A rejected file leaves the current
    /// selection untouched.
    pub fn accept(&mut self, file: FileHandle) -> Result<&FileHandle, UploadError> {
        if let Err(error) = self.policy.check(&file) {
            info!(file = %file.name, %error, "upload rejected");
            self.error = Some(error.to_string());
            return Err(error);
        }
        debug!(file = %file.name, size = file.size_bytes, "upload accepted");
        self.error = None;
        Ok(&*self.file.insert(file))
    }

    /// Records a failure that happened after acceptance (e.g. unreadable
    /// content) and drops the selection.
    pub fn reject_selected(&mut self, message: impl Into<String>) {
        self.file = None;
        self.error = Some(message.into());
    }

    /// Clears the current selection and any error.
    pub fn remove_file(&mut self) -> Option<FileHandle> {
        self.error = None;
        self.file.take()
    }
}
