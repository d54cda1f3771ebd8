//! The import wizard state machine.
//!
//! [`ImportWizard`] owns every piece of session state: the upload zone, the
//! loaded source data, the draft mapping, the validation tracker and the
//! import flags. Timed operations (reading the file, validating, importing)
//! are split into a `begin`/`finish` pair around a ticket so the caller can
//! run the slow part elsewhere; finishing with a superseded ticket is a
//! no-op.

use std::collections::BTreeMap;
use std::sync::Arc;

use pos_ingest::{FileHandle, IngestError, UploadError, UploadPolicy, UploadZone};
use pos_map::{MappingChange, MappingState, MappingTemplate};
use pos_model::{
    ColumnId, FieldId, IssueId, ResolvedMapping, SourceData, TargetCatalog, ValidationReport,
};
use pos_validate::{ValidationTicket, ValidationTracker, Validator};
use tracing::{debug, info, warn};

use crate::commit::{ImportReceipt, ImportRequest};
use crate::error::{CommitError, Result, WizardError};
use crate::step::Step;

/// Identifies one file read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket(u64);

/// Identifies one import attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportTicket(u64);

/// A validation run handed out by [`ImportWizard::run_validation`].
#[derive(Debug, Clone)]
pub struct ValidationJob {
    pub ticket: ValidationTicket,
    pub catalog: Arc<TargetCatalog>,
    pub mapping: ResolvedMapping,
    pub data: Arc<SourceData>,
}

impl ValidationJob {
    pub fn run(&self, validator: &dyn Validator) -> ValidationReport {
        validator.validate(&self.catalog, &self.mapping, &self.data)
    }
}

/// An import started by [`ImportWizard::go_next`] at the review step.
#[derive(Debug, Clone)]
pub struct ImportJob {
    pub ticket: ImportTicket,
    pub request: ImportRequest,
}

/// Outcome of [`ImportWizard::go_next`].
#[derive(Debug, Clone)]
pub enum Advance {
    /// Moved to the given step.
    Moved(Step),
    /// At the review step: the import has started.
    StartImport(ImportJob),
    /// The active step's gate is closed.
    Blocked,
}

/// Import progress flags.
#[derive(Debug, Clone, Default)]
struct ImportProgress {
    generation: u64,
    is_importing: bool,
    complete: bool,
    error: Option<String>,
    receipt: Option<ImportReceipt>,
}

/// One import session.
#[derive(Debug, Clone)]
pub struct ImportWizard {
    catalog: Arc<TargetCatalog>,
    active_step: Step,
    upload: UploadZone,
    upload_generation: u64,
    is_uploading: bool,
    source: Option<Arc<SourceData>>,
    mapping: Option<MappingState>,
    validation: ValidationTracker,
    acknowledge_warnings: bool,
    import: ImportProgress,
}

impl ImportWizard {
    pub fn new(catalog: Arc<TargetCatalog>, policy: UploadPolicy) -> Self {
        Self {
            catalog,
            active_step: Step::Upload,
            upload: UploadZone::new(policy),
            upload_generation: 0,
            is_uploading: false,
            source: None,
            mapping: None,
            validation: ValidationTracker::new(),
            acknowledge_warnings: false,
            import: ImportProgress::default(),
        }
    }

    // === Accessors ===

    pub fn catalog(&self) -> &Arc<TargetCatalog> {
        &self.catalog
    }

    pub fn active_step(&self) -> Step {
        self.active_step
    }

    pub fn upload_zone(&self) -> &UploadZone {
        &self.upload
    }

    pub fn file(&self) -> Option<&FileHandle> {
        self.upload.file()
    }

    pub fn upload_error(&self) -> Option<&str> {
        self.upload.error()
    }

    pub fn is_uploading(&self) -> bool {
        self.is_uploading
    }

    pub fn source(&self) -> Option<&SourceData> {
        self.source.as_deref()
    }

    pub fn mapping(&self) -> Option<&MappingState> {
        self.mapping.as_ref()
    }

    /// Per-field mapping errors; empty before a file is loaded.
    pub fn mapping_errors(&self) -> BTreeMap<FieldId, String> {
        self.mapping
            .as_ref()
            .map(MappingState::errors)
            .unwrap_or_default()
    }

    pub fn validation(&self) -> &ValidationTracker {
        &self.validation
    }

    pub fn acknowledge_warnings(&self) -> bool {
        self.acknowledge_warnings
    }

    pub fn is_importing(&self) -> bool {
        self.import.is_importing
    }

    pub fn import_complete(&self) -> bool {
        self.import.complete
    }

    /// Message of the last failed import attempt.
    pub fn import_error(&self) -> Option<&str> {
        self.import.error.as_deref()
    }

    pub fn receipt(&self) -> Option<&ImportReceipt> {
        self.import.receipt.as_ref()
    }

    // === Upload ===

    pub fn set_dragging(&mut self, dragging: bool) {
        self.upload.set_dragging(dragging);
    }

    /// A file dropped onto the upload zone; see [`Self::begin_upload`].
    pub fn drop_file(
        &mut self,
        file: FileHandle,
    ) -> std::result::Result<UploadTicket, UploadError> {
        self.upload.set_dragging(false);
        self.begin_upload(file)
    }

    /// Accepts `file` and starts reading it.
    ///
    /// A rejected file leaves the current selection and session untouched.
    /// An accepted file replaces the previous one and discards everything
    /// derived from it.
    pub fn begin_upload(
        &mut self,
        file: FileHandle,
    ) -> std::result::Result<UploadTicket, UploadError> {
        let name = self.upload.accept(file)?.name.clone();
        self.reset_derived_state();
        self.upload_generation += 1;
        self.is_uploading = true;
        info!(file = %name, "upload started");
        Ok(UploadTicket(self.upload_generation))
    }

    /// Stores the content read for `ticket`.
    ///
    /// A read failure drops the selection and surfaces the message on the
    /// upload zone. Returns `false` for a stale ticket.
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        result: std::result::Result<SourceData, IngestError>,
    ) -> bool {
        if !self.is_uploading || ticket.0 != self.upload_generation {
            debug!(ticket = ticket.0, "dropping stale upload result");
            return false;
        }
        self.is_uploading = false;
        match result {
            Ok(data) => {
                info!(
                    columns = data.schema.len(),
                    rows = data.row_count(),
                    "upload complete"
                );
                self.mapping = Some(MappingState::new(
                    Arc::clone(&self.catalog),
                    data.schema.clone(),
                ));
                self.source = Some(Arc::new(data));
            }
            Err(error) => {
                warn!(%error, "uploaded file could not be read");
                self.upload.reject_selected(error.to_string());
            }
        }
        true
    }

    /// Gives up on the read for `ticket`; the selection is dropped.
    pub fn abandon_upload(&mut self, ticket: UploadTicket) -> bool {
        if !self.is_uploading || ticket.0 != self.upload_generation {
            return false;
        }
        self.is_uploading = false;
        self.upload.remove_file();
        true
    }

    /// Clears the file and every piece of session state.
    pub fn remove_file(&mut self) -> Option<FileHandle> {
        let removed = self.upload.remove_file();
        self.upload_generation += 1;
        self.is_uploading = false;
        self.reset_derived_state();
        self.active_step = Step::Upload;
        info!("file removed, wizard reset");
        removed
    }

    fn reset_derived_state(&mut self) {
        self.source = None;
        self.mapping = None;
        self.validation.invalidate();
        self.acknowledge_warnings = false;
        self.reset_import();
    }

    /// Forgets any import outcome; a result still in flight becomes stale.
    fn reset_import(&mut self) {
        let generation = self.import.generation + 1;
        self.import = ImportProgress {
            generation,
            ..ImportProgress::default()
        };
    }

    // === Mapping ===

    fn mapping_mut(&mut self) -> Result<&mut MappingState> {
        self.mapping.as_mut().ok_or(WizardError::NoSource)
    }

    fn on_mapping_change(&mut self, change: MappingChange) -> MappingChange {
        if change.changed {
            self.validation.invalidate();
            self.acknowledge_warnings = false;
            self.reset_import();
        }
        change
    }

    /// Assigns or clears one field's column.
    ///
    /// Any change discards the validation report, its resolutions and the
    /// outcome of a previous import.
    pub fn set_mapping(
        &mut self,
        field: &FieldId,
        column: Option<&ColumnId>,
    ) -> Result<MappingChange> {
        let change = self.mapping_mut()?.set_mapping(field, column)?;
        Ok(self.on_mapping_change(change))
    }

    /// Fills unmapped fields by label and alias.
    pub fn auto_map(&mut self) -> Result<Vec<(FieldId, ColumnId)>> {
        let (assigned, change) = self.mapping_mut()?.auto_map();
        let _ = self.on_mapping_change(change);
        Ok(assigned)
    }

    /// Fills unmapped fields from a saved template.
    pub fn apply_template(
        &mut self,
        template: &MappingTemplate,
    ) -> Result<Vec<(FieldId, ColumnId)>> {
        let state = self.mapping_mut()?;
        let applied = template.apply(state);
        let _ = self.on_mapping_change(MappingChange {
            changed: !applied.is_empty(),
        });
        Ok(applied)
    }

    pub fn clear_mapping(&mut self) -> Result<MappingChange> {
        let change = self.mapping_mut()?.clear_all();
        Ok(self.on_mapping_change(change))
    }

    // === Validation ===

    /// Starts a validation run, superseding any run in flight.
    ///
    /// Resets the resolved issues and the warning acknowledgment.
    pub fn run_validation(&mut self) -> Result<ValidationJob> {
        let data = self.source.clone().ok_or(WizardError::NoSource)?;
        let mapping = self
            .mapping
            .as_ref()
            .ok_or(WizardError::NoSource)?
            .resolve()?;
        let ticket = self.validation.begin();
        self.acknowledge_warnings = false;
        Ok(ValidationJob {
            ticket,
            catalog: Arc::clone(&self.catalog),
            mapping,
            data,
        })
    }

    /// Stores a report; `false` if the run was superseded.
    pub fn complete_validation(
        &mut self,
        ticket: ValidationTicket,
        report: ValidationReport,
    ) -> bool {
        self.validation.complete(ticket, report)
    }

    pub fn abandon_validation(&mut self, ticket: ValidationTicket) -> bool {
        self.validation.abandon(ticket)
    }

    /// Marks an issue resolved without re-validating.
    pub fn resolve_issue(&mut self, id: &IssueId) -> bool {
        self.validation.resolve_issue(id)
    }

    pub fn set_acknowledge_warnings(&mut self, acknowledge: bool) {
        self.acknowledge_warnings = acknowledge;
    }

    // === Gating ===

    /// Whether `step`'s completion predicate holds.
    pub fn step_completed(&self, step: Step) -> bool {
        match step {
            Step::Upload => self.file().is_some(),
            Step::Mapping => {
                self.file().is_some()
                    && self
                        .mapping
                        .as_ref()
                        .is_some_and(MappingState::is_complete)
            }
            Step::Validation => self.validation.is_complete(),
            Step::Review => self.import.complete,
        }
    }

    /// Whether Next is enabled at the active step.
    pub fn can_go_next(&self) -> bool {
        match self.active_step {
            Step::Upload => self.file().is_some() && !self.is_uploading,
            Step::Mapping => self.step_completed(Step::Mapping),
            Step::Validation => self.validation.is_complete(),
            Step::Review => {
                if self.import.complete {
                    false
                } else if self.validation.has_outstanding_warnings() {
                    self.acknowledge_warnings && !self.import.is_importing
                } else {
                    !self.import.is_importing
                }
            }
        }
    }

    pub fn can_go_back(&self) -> bool {
        !self.active_step.is_first()
    }

    /// Advances past the active step if its gate is open.
    ///
    /// At the review step this starts the import instead.
    pub fn go_next(&mut self) -> Result<Advance> {
        if !self.can_go_next() {
            debug!(step = %self.active_step, "next blocked");
            return Ok(Advance::Blocked);
        }
        match self.active_step.next() {
            Some(step) => {
                info!(from = %self.active_step, to = %step, "step advanced");
                self.active_step = step;
                Ok(Advance::Moved(step))
            }
            None => self.begin_import().map(Advance::StartImport),
        }
    }

    /// Moves back one step. Never resets state.
    pub fn go_back(&mut self) -> bool {
        match self.active_step.prev() {
            Some(step) => {
                info!(from = %self.active_step, to = %step, "step back");
                self.active_step = step;
                true
            }
            None => false,
        }
    }

    // === Import ===

    fn begin_import(&mut self) -> Result<ImportJob> {
        let data = self.source.clone().ok_or(WizardError::NoSource)?;
        let mapping = self
            .mapping
            .as_ref()
            .ok_or(WizardError::NoSource)?
            .resolve()?;

        self.import.generation += 1;
        self.import.is_importing = true;
        self.import.error = None;
        let outstanding_warnings = self.validation.outstanding_warnings().count();
        info!(
            rows = data.row_count(),
            outstanding_warnings, "import started"
        );

        Ok(ImportJob {
            ticket: ImportTicket(self.import.generation),
            request: ImportRequest {
                catalog: Arc::clone(&self.catalog),
                mapping,
                data,
                acknowledged_warnings: self.acknowledge_warnings,
                outstanding_warnings,
            },
        })
    }

    /// Records the outcome of the import for `ticket`.
    ///
    /// A failure leaves the wizard at review with Next enabled for a retry.
    pub fn finish_import(
        &mut self,
        ticket: ImportTicket,
        result: std::result::Result<ImportReceipt, CommitError>,
    ) -> bool {
        if !self.import.is_importing || ticket.0 != self.import.generation {
            debug!(ticket = ticket.0, "dropping stale import result");
            return false;
        }
        self.import.is_importing = false;
        match result {
            Ok(receipt) => {
                info!(imported = receipt.imported, "import complete");
                self.import.complete = true;
                self.import.receipt = Some(receipt);
            }
            Err(error) => {
                warn!(%error, "import failed");
                self.import.error = Some(error.to_string());
            }
        }
        true
    }

    /// Gives up on the import for `ticket` without an outcome.
    pub fn abandon_import(&mut self, ticket: ImportTicket) -> bool {
        if !self.import.is_importing || ticket.0 != self.import.generation {
            return false;
        }
        info!("import abandoned");
        self.import.is_importing = false;
        true
    }
}
