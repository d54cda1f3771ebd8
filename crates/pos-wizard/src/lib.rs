//! Import wizard for the POS product import pipeline.
//!
//! Drives the four steps (upload, map columns, validate, review) and gates
//! progression on the state of the upload zone, the mapping engine and the
//! validation tracker.
//!
//! # Example
//!
//! ```ignore
//! use pos_wizard::{ImportConfig, ImportSession, ImportWizard, SimulatedCommitter};
//!
//! let wizard = ImportWizard::new(catalog, config.upload.clone());
//! let committer = SimulatedCommitter::new();
//! let mut session = ImportSession::new(wizard, validator, committer, config.timing);
//! session.upload(file).await?;
//! session.settle().await;
//! session.auto_map().await?;
//! ```

mod commit;
mod config;
mod error;
mod session;
mod step;
mod wizard;

pub use commit::{ImportCommitter, ImportReceipt, ImportRequest, SimulatedCommitter};
pub use config::{ImportConfig, TimingConfig, ValidationConfig};
pub use error::{CommitError, Result, WizardError};
pub use session::ImportSession;
pub use step::Step;
pub use wizard::{Advance, ImportJob, ImportTicket, ImportWizard, UploadTicket, ValidationJob};
