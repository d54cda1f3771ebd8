//! Validation for the POS import pipeline.
//!
//! [`RowValidator`] checks every mapped cell of an uploaded file and
//! produces a [`ValidationReport`](pos_model::ValidationReport);
//! [`ValidationTracker`] owns the run lifecycle and the client-side issue
//! resolutions the wizard gates on.

pub mod checks;
mod engine;
mod state;

pub use engine::{DEFAULT_SAMPLE_ROWS, RowValidator, Validator};
pub use state::{ValidationStatus, ValidationTicket, ValidationTracker};
