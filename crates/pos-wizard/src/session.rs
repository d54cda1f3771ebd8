//! Async driver for an [`ImportWizard`].
//!
//! The three timed operations run as tokio tasks: a fixed latency followed
//! by the real work on a blocking thread. Starting an operation again aborts
//! the task in flight, and the wizard's tickets make sure a task that slips
//! past the abort cannot overwrite newer state.

use std::sync::Arc;

use pos_ingest::{FileHandle, UploadError, read_source};
use pos_map::{MappingChange, MappingTemplate};
use pos_model::{ColumnId, FieldId};
use pos_validate::{ValidationTicket, Validator};
use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::commit::ImportCommitter;
use crate::config::TimingConfig;
use crate::error::Result;
use crate::wizard::{Advance, ImportTicket, ImportWizard, UploadTicket};

/// An import wizard plus its in-flight tasks.
pub struct ImportSession<V, C> {
    wizard: Arc<Mutex<ImportWizard>>,
    validator: Arc<V>,
    committer: Arc<C>,
    timing: TimingConfig,
    upload_task: Option<(UploadTicket, JoinHandle<()>)>,
    validation_task: Option<(ValidationTicket, JoinHandle<()>)>,
    import_task: Option<(ImportTicket, JoinHandle<()>)>,
}

impl<V, C> ImportSession<V, C>
where
    V: Validator + 'static,
    C: ImportCommitter + 'static,
{
    pub fn new(wizard: ImportWizard, validator: V, committer: C, timing: TimingConfig) -> Self {
        Self {
            wizard: Arc::new(Mutex::new(wizard)),
            validator: Arc::new(validator),
            committer: Arc::new(committer),
            timing,
            upload_task: None,
            validation_task: None,
            import_task: None,
        }
    }

    /// Locks the wizard for reading or for operations without a task.
    pub async fn lock(&self) -> MutexGuard<'_, ImportWizard> {
        self.wizard.lock().await
    }

    /// Accepts `file` and reads it after the upload latency.
    pub async fn upload(&mut self, file: FileHandle) -> std::result::Result<(), UploadError> {
        let ticket = self.wizard.lock().await.begin_upload(file.clone())?;
        self.abort_all();

        let wizard = Arc::clone(&self.wizard);
        let delay = self.timing.upload();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = tokio::task::spawn_blocking(move || read_source(&file)).await;
            let mut wizard = wizard.lock().await;
            match result {
                Ok(result) => {
                    wizard.finish_upload(ticket, result);
                }
                Err(join_error) => {
                    error!(%join_error, "upload task failed");
                    wizard.abandon_upload(ticket);
                }
            }
        });
        self.upload_task = Some((ticket, handle));
        Ok(())
    }

    /// Clears the file and aborts everything in flight.
    pub async fn remove_file(&mut self) -> Option<FileHandle> {
        self.abort_all();
        self.wizard.lock().await.remove_file()
    }

    pub async fn set_mapping(
        &mut self,
        field: &FieldId,
        column: Option<&ColumnId>,
    ) -> Result<MappingChange> {
        let change = self.wizard.lock().await.set_mapping(field, column)?;
        if change.changed {
            self.abort_validation();
            self.abort_import();
        }
        Ok(change)
    }

    pub async fn auto_map(&mut self) -> Result<Vec<(FieldId, ColumnId)>> {
        let assigned = self.wizard.lock().await.auto_map()?;
        if !assigned.is_empty() {
            self.abort_validation();
            self.abort_import();
        }
        Ok(assigned)
    }

    pub async fn apply_template(
        &mut self,
        template: &MappingTemplate,
    ) -> Result<Vec<(FieldId, ColumnId)>> {
        let applied = self.wizard.lock().await.apply_template(template)?;
        if !applied.is_empty() {
            self.abort_validation();
            self.abort_import();
        }
        Ok(applied)
    }

    /// Starts validation after the validation latency, aborting any run in
    /// flight.
    pub async fn run_validation(&mut self) -> Result<ValidationTicket> {
        let job = self.wizard.lock().await.run_validation()?;
        self.abort_validation();

        let ticket = job.ticket;
        let wizard = Arc::clone(&self.wizard);
        let validator = Arc::clone(&self.validator);
        let delay = self.timing.validation();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = tokio::task::spawn_blocking(move || job.run(&*validator)).await;
            let mut wizard = wizard.lock().await;
            match result {
                Ok(report) => {
                    wizard.complete_validation(ticket, report);
                }
                Err(join_error) => {
                    error!(%join_error, "validation task failed");
                    wizard.abandon_validation(ticket);
                }
            }
        });
        self.validation_task = Some((ticket, handle));
        Ok(ticket)
    }

    /// Advances the wizard; at the review step this starts the import.
    pub async fn next(&mut self) -> Result<Advance> {
        let advance = self.wizard.lock().await.go_next()?;
        if let Advance::StartImport(job) = &advance {
            self.abort_import();

            let ticket = job.ticket;
            let request = job.request.clone();
            let wizard = Arc::clone(&self.wizard);
            let committer = Arc::clone(&self.committer);
            let delay = self.timing.import();
            let handle = tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let result = tokio::task::spawn_blocking(move || committer.commit(&request)).await;
                let mut wizard = wizard.lock().await;
                match result {
                    Ok(result) => {
                        wizard.finish_import(ticket, result);
                    }
                    Err(join_error) => {
                        error!(%join_error, "import task failed");
                        wizard.abandon_import(ticket);
                    }
                }
            });
            self.import_task = Some((ticket, handle));
        }
        Ok(advance)
    }

    /// Moves back one step, abandoning an import in flight.
    pub async fn back(&mut self) -> bool {
        let import = self.import_task.take();
        let mut wizard = self.wizard.lock().await;
        if let Some((ticket, handle)) = import {
            handle.abort();
            wizard.abandon_import(ticket);
        }
        wizard.go_back()
    }

    /// Aborts every task in flight and returns the wizard to a resting state.
    ///
    /// An abandoned import leaves the wizard at the review step.
    pub async fn cancel(&mut self) {
        let upload = self.upload_task.take();
        let validation = self.validation_task.take();
        let import = self.import_task.take();

        let mut wizard = self.wizard.lock().await;
        if let Some((ticket, handle)) = upload {
            handle.abort();
            wizard.abandon_upload(ticket);
        }
        if let Some((ticket, handle)) = validation {
            handle.abort();
            wizard.abandon_validation(ticket);
        }
        if let Some((ticket, handle)) = import {
            handle.abort();
            wizard.abandon_import(ticket);
        }
        debug!("session cancelled");
    }

    /// Waits for every task in flight to finish.
    pub async fn settle(&mut self) {
        let handles = [
            self.upload_task.take().map(|(_, h)| h),
            self.validation_task.take().map(|(_, h)| h),
            self.import_task.take().map(|(_, h)| h),
        ];
        for handle in handles.into_iter().flatten() {
            if let Err(join_error) = handle.await
                && !join_error.is_cancelled()
            {
                error!(%join_error, "session task failed");
            }
        }
    }

    fn abort_validation(&mut self) {
        if let Some((ticket, handle)) = self.validation_task.take() {
            debug!(generation = ticket.generation(), "aborting validation");
            handle.abort();
        }
    }

    fn abort_import(&mut self) {
        if let Some((_, handle)) = self.import_task.take() {
            handle.abort();
        }
    }

    fn abort_all(&mut self) {
        if let Some((_, handle)) = self.upload_task.take() {
            handle.abort();
        }
        self.abort_validation();
        self.abort_import();
    }
}

impl<V, C> Drop for ImportSession<V, C> {
    fn drop(&mut self) {
        let tasks = [
            self.upload_task.take().map(|(_, h)| h),
            self.validation_task.take().map(|(_, h)| h),
            self.import_task.take().map(|(_, h)| h),
        ];
        for handle in tasks.into_iter().flatten() {
            handle.abort();
        }
    }
}
