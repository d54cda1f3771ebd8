//! Timed session behavior on a paused tokio clock.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pos_ingest::{FileHandle, UploadPolicy};
use pos_model::{
    ColumnId, FieldId, ResolvedMapping, SourceData, TargetCatalog, ValidationReport,
};
use pos_validate::{RowValidator, ValidationStatus, Validator};
use pos_wizard::{Advance, ImportSession, ImportWizard, SimulatedCommitter, Step, TimingConfig};

const CSV: &str = "\
SKU,Name,Price,Category,Stock
BURG-001,Classic Burger,12.50,Mains,10
SIDE-001,Fries,3.50,Sides,-2
";

/// Row validator that counts its runs.
#[derive(Default)]
struct CountingValidator {
    runs: Arc<AtomicUsize>,
}

impl Validator for CountingValidator {
    fn validate(
        &self,
        catalog: &TargetCatalog,
        mapping: &ResolvedMapping,
        data: &SourceData,
    ) -> ValidationReport {
        self.runs.fetch_add(1, Ordering::SeqCst);
        RowValidator::new().validate(catalog, mapping, data)
    }
}

struct Fixture {
    session: ImportSession<CountingValidator, SimulatedCommitter>,
    runs: Arc<AtomicUsize>,
    _file: tempfile::NamedTempFile,
    handle: FileHandle,
}

fn fixture(committer: SimulatedCommitter) -> Fixture {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(CSV.as_bytes()).unwrap();
    let handle = FileHandle::from_path(file.path()).unwrap();

    let validator = CountingValidator::default();
    let runs = Arc::clone(&validator.runs);
    let wizard = ImportWizard::new(Arc::new(TargetCatalog::products()), UploadPolicy::default());
    Fixture {
        session: ImportSession::new(wizard, validator, committer, TimingConfig::default()),
        runs,
        _file: file,
        handle,
    }
}

/// Uploads, auto-maps and moves to the validation step.
async fn at_validation(fx: &mut Fixture) {
    fx.session.upload(fx.handle.clone()).await.unwrap();
    fx.session.settle().await;
    assert!(matches!(fx.session.next().await.unwrap(), Advance::Moved(Step::Mapping)));
    assert_eq!(fx.session.auto_map().await.unwrap().len(), 5);
    assert!(matches!(
        fx.session.next().await.unwrap(),
        Advance::Moved(Step::Validation)
    ));
}

#[tokio::test(start_paused = true)]
async fn upload_commits_after_latency() {
    let mut fx = fixture(SimulatedCommitter::new());
    fx.session.upload(fx.handle.clone()).await.unwrap();
    {
        let wizard = fx.session.lock().await;
        assert!(wizard.is_uploading());
        assert!(!wizard.can_go_next());
    }

    fx.session.settle().await;

    let wizard = fx.session.lock().await;
    assert!(!wizard.is_uploading());
    assert!(wizard.can_go_next());
    assert_eq!(wizard.source().map(SourceData::row_count), Some(2));
}

#[tokio::test(start_paused = true)]
async fn rejected_upload_starts_no_task() {
    let mut fx = fixture(SimulatedCommitter::new());
    let err = fx
        .session
        .upload(FileHandle::new("products.pdf", 10))
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("Unsupported file type"));
    assert!(!fx.session.lock().await.is_uploading());
}

#[tokio::test(start_paused = true)]
async fn validation_waits_for_latency() {
    let mut fx = fixture(SimulatedCommitter::new());
    at_validation(&mut fx).await;

    fx.session.run_validation().await.unwrap();
    tokio::time::advance(Duration::from_millis(899)).await;
    assert_eq!(
        fx.session.lock().await.validation().status(),
        ValidationStatus::Running
    );

    fx.session.settle().await;
    let wizard = fx.session.lock().await;
    assert_eq!(wizard.validation().status(), ValidationStatus::Succeeded);
    assert_eq!(wizard.validation().outstanding_warnings().count(), 1);
    assert!(wizard.can_go_next());
}

#[tokio::test(start_paused = true)]
async fn rerun_aborts_previous_validation() {
    let mut fx = fixture(SimulatedCommitter::new());
    at_validation(&mut fx).await;

    let first = fx.session.run_validation().await.unwrap();
    let second = fx.session.run_validation().await.unwrap();
    assert_ne!(first, second);

    fx.session.settle().await;
    assert_eq!(fx.runs.load(Ordering::SeqCst), 1);
    assert_eq!(
        fx.session.lock().await.validation().status(),
        ValidationStatus::Succeeded
    );
}

#[tokio::test(start_paused = true)]
async fn mapping_change_aborts_validation() {
    let mut fx = fixture(SimulatedCommitter::new());
    at_validation(&mut fx).await;
    fx.session.run_validation().await.unwrap();

    let stock = FieldId::new("stock").unwrap();
    let change = fx.session.set_mapping(&stock, None).await.unwrap();
    assert!(change.changed);

    fx.session.settle().await;
    assert_eq!(fx.runs.load(Ordering::SeqCst), 0);
    assert_eq!(
        fx.session.lock().await.validation().status(),
        ValidationStatus::Idle
    );
}

#[tokio::test(start_paused = true)]
async fn import_runs_to_completion() {
    let mut fx = fixture(SimulatedCommitter::new());
    at_validation(&mut fx).await;
    fx.session.run_validation().await.unwrap();
    fx.session.settle().await;
    assert!(matches!(fx.session.next().await.unwrap(), Advance::Moved(Step::Review)));

    fx.session.lock().await.set_acknowledge_warnings(true);
    assert!(matches!(
        fx.session.next().await.unwrap(),
        Advance::StartImport(_)
    ));
    assert!(fx.session.lock().await.is_importing());

    fx.session.settle().await;
    let wizard = fx.session.lock().await;
    assert!(!wizard.is_importing());
    assert!(wizard.import_complete());
    assert_eq!(wizard.receipt().map(|r| r.imported), Some(2));
}

#[tokio::test(start_paused = true)]
async fn cancelled_import_returns_to_review() {
    let mut fx = fixture(SimulatedCommitter::new());
    at_validation(&mut fx).await;
    fx.session.run_validation().await.unwrap();
    fx.session.settle().await;
    fx.session.next().await.unwrap();
    fx.session.lock().await.set_acknowledge_warnings(true);
    fx.session.next().await.unwrap();

    fx.session.cancel().await;
    fx.session.settle().await;

    let wizard = fx.session.lock().await;
    assert_eq!(wizard.active_step(), Step::Review);
    assert!(!wizard.is_importing());
    assert!(!wizard.import_complete());
    assert!(wizard.can_go_next());
}

#[tokio::test(start_paused = true)]
async fn back_abandons_running_import() {
    let mut fx = fixture(SimulatedCommitter::new());
    at_validation(&mut fx).await;
    fx.session.run_validation().await.unwrap();
    fx.session.settle().await;
    fx.session.next().await.unwrap();
    fx.session.lock().await.set_acknowledge_warnings(true);
    assert!(matches!(
        fx.session.next().await.unwrap(),
        Advance::StartImport(_)
    ));

    assert!(fx.session.back().await);
    fx.session.settle().await;

    let wizard = fx.session.lock().await;
    assert_eq!(wizard.active_step(), Step::Validation);
    assert!(!wizard.is_importing());
    assert!(!wizard.import_complete());
    assert!(wizard.receipt().is_none());
}

#[tokio::test(start_paused = true)]
async fn failed_import_surfaces_error() {
    let mut fx = fixture(SimulatedCommitter::failing("database offline"));
    at_validation(&mut fx).await;
    fx.session.run_validation().await.unwrap();
    fx.session.settle().await;
    fx.session.next().await.unwrap();
    fx.session.lock().await.set_acknowledge_warnings(true);
    fx.session.next().await.unwrap();
    fx.session.settle().await;

    let wizard = fx.session.lock().await;
    assert_eq!(
        wizard.import_error(),
        Some("import rejected: database offline")
    );
    assert!(wizard.can_go_next());
}

#[tokio::test(start_paused = true)]
async fn remove_file_aborts_upload() {
    let mut fx = fixture(SimulatedCommitter::new());
    fx.session.upload(fx.handle.clone()).await.unwrap();
    fx.session.remove_file().await;
    fx.session.settle().await;

    let wizard = fx.session.lock().await;
    assert!(wizard.file().is_none());
    assert!(wizard.source().is_none());
    assert!(!wizard.is_uploading());
    let sku = FieldId::new("sku").unwrap();
    assert!(wizard.mapping().is_none());
    drop(wizard);
    assert!(
        fx.session
            .set_mapping(&sku, Some(&ColumnId::positional(0)))
            .await
            .is_err()
    );
}
