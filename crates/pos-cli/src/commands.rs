//! `run` and `fields` commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use pos_ingest::FileHandle;
use pos_map::{MappingState, MappingTemplate, TemplateRepository};
use pos_model::{
    CatalogRegistry, ColumnId, FieldId, IssueId, JsonCatalogSource, SourceSchema, StaticCatalog,
    TargetCatalog,
};
use pos_validate::RowValidator;
use pos_wizard::{
    Advance, ImportConfig, ImportSession, ImportWizard, SimulatedCommitter, Step, TimingConfig,
};
use tracing::{Instrument, info, info_span, warn};

use crate::cli::{FieldsArgs, MapArg, RunArgs};
use crate::progress::spinner;
use crate::types::{MappingRow, RunOutcome};

type Session = ImportSession<RowValidator, SimulatedCommitter>;

/// Loads the target catalog from `path`, or the built-in product catalog.
pub fn load_catalog(path: Option<&Path>) -> Result<Arc<TargetCatalog>> {
    let mut registry = match path {
        Some(path) => CatalogRegistry::new(JsonCatalogSource::new(path)),
        None => CatalogRegistry::new(StaticCatalog::products()),
    };
    let catalog = registry
        .initialize()
        .with_context(|| format!("load catalog from {}", registry.source_description()))?;
    Ok(catalog)
}

pub fn run_fields(args: &FieldsArgs) -> Result<Arc<TargetCatalog>> {
    load_catalog(args.catalog.as_deref())
}

/// Runs the wizard headlessly on a fresh tokio runtime.
pub fn run_import(args: &RunArgs) -> Result<RunOutcome> {
    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    let span = info_span!("import", file = %args.file.display());
    runtime.block_on(drive(args).instrument(span))
}

fn load_config(args: &RunArgs) -> Result<ImportConfig> {
    let mut config = match &args.config {
        Some(path) => ImportConfig::load(path)?,
        None => ImportConfig::default(),
    };
    if args.no_delay {
        config.timing = TimingConfig::immediate();
    }
    if let Some(rows) = args.sample_rows {
        config.validation.sample_rows = rows;
    }
    Ok(config)
}

async fn drive(args: &RunArgs) -> Result<RunOutcome> {
    let config = load_config(args)?;
    let catalog = load_catalog(args.catalog.as_deref())?;
    let wizard = ImportWizard::new(catalog, config.upload.clone());
    let validator = RowValidator::new().with_sample_rows(config.validation.sample_rows);
    let mut session: Session =
        ImportSession::new(wizard, validator, SimulatedCommitter::new(), config.timing);

    let mut outcome = RunOutcome {
        file: args.file.clone(),
        ..RunOutcome::default()
    };

    // Upload
    let handle = FileHandle::from_path(&args.file)
        .with_context(|| format!("open {}", args.file.display()))?;
    if let Err(error) = session.upload(handle).await {
        outcome.blocked = Some(error.to_string());
        return Ok(outcome);
    }
    let bar = spinner("Reading file");
    session.settle().await;
    bar.finish_and_clear();
    if let Some(error) = session.lock().await.upload_error() {
        outcome.blocked = Some(error.to_string());
        return Ok(outcome);
    }
    if !advance(&mut session, &mut outcome).await? {
        return Ok(outcome);
    }

    // Mapping
    outcome.template = build_mapping(&mut session, args).await?;
    {
        let wizard = session.lock().await;
        if let Some(state) = wizard.mapping() {
            outcome.mapping = mapping_rows(state);
        }
    }
    let mapping_done = session.lock().await.step_completed(Step::Mapping);
    if let Some(name) = &args.save_template
        && mapping_done
    {
        outcome.saved_template = Some(save_template(&session, args, name).await?);
    }
    if !advance(&mut session, &mut outcome).await? {
        outcome.blocked = Some("Mapping is incomplete".to_string());
        return Ok(outcome);
    }

    // Validation
    session.run_validation().await?;
    let bar = spinner("Validating rows");
    session.settle().await;
    bar.finish_and_clear();
    {
        let mut wizard = session.lock().await;
        let ids: Vec<IssueId> = if args.resolve_all {
            wizard
                .validation()
                .blocking_issues()
                .map(|i| i.id.clone())
                .collect()
        } else {
            Vec::new()
        };
        for raw in args.resolve.iter().map(String::as_str) {
            let id = IssueId::new(raw).with_context(|| format!("invalid issue id '{raw}'"))?;
            if wizard.resolve_issue(&id) {
                outcome.resolved.push(id);
            } else {
                warn!(issue = raw, "unknown issue id");
            }
        }
        for id in ids {
            if wizard.resolve_issue(&id) {
                outcome.resolved.push(id);
            }
        }
        outcome.report = wizard.validation().report().cloned();
        outcome.outstanding = wizard.validation().outstanding_issues().cloned().collect();
    }
    if !advance(&mut session, &mut outcome).await? {
        let blocking = session.lock().await.validation().blocking_issues().count();
        outcome.blocked = Some(format!(
            "{blocking} blocking issue(s); fix the file or pass --resolve"
        ));
        return Ok(outcome);
    }

    // Review
    {
        let mut wizard = session.lock().await;
        wizard.set_acknowledge_warnings(args.acknowledge_warnings);
        if !wizard.can_go_next() {
            let warnings = wizard.validation().outstanding_warnings().count();
            outcome.blocked = Some(format!(
                "{warnings} outstanding warning(s); pass --acknowledge-warnings to import anyway"
            ));
            return Ok(outcome);
        }
    }
    match session.next().await? {
        Advance::StartImport(_) => {}
        other => bail!("import did not start: {other:?}"),
    }
    let bar = spinner("Importing products");
    session.settle().await;
    bar.finish_and_clear();

    let wizard = session.lock().await;
    outcome.receipt = wizard.receipt().cloned();
    if let Some(error) = wizard.import_error() {
        outcome.blocked = Some(error.to_string());
    }
    info!(complete = outcome.is_complete(), "run finished");
    Ok(outcome)
}

/// Moves to the next step, recording where the wizard stands.
async fn advance(session: &mut Session, outcome: &mut RunOutcome) -> Result<bool> {
    let advance = session.next().await?;
    outcome.step = session.lock().await.active_step();
    Ok(matches!(advance, Advance::Moved(_)))
}

/// Applies explicit `--map` pairs, then a template, then auto-map.
///
/// Returns the name of the applied template.
async fn build_mapping(session: &mut Session, args: &RunArgs) -> Result<Option<String>> {
    let schema = session
        .lock()
        .await
        .source()
        .map(|data| data.schema.clone())
        .context("no file loaded")?;

    for pair in &args.map {
        let (field, column) = resolve_map_arg(pair, &schema)?;
        let _ = session.set_mapping(&field, Some(&column)).await?;
    }

    let mut applied = None;
    let template = match &args.template {
        Some(name) => Some(
            repository(args)?
                .load(name)?
                .with_context(|| format!("template '{name}' not found"))?,
        ),
        None if !args.no_auto_map && args.templates_dir.is_dir() => {
            repository(args)?.find_for_schema(&schema)?
        }
        None => None,
    };
    if let Some(template) = template {
        let assigned = session.apply_template(&template).await?;
        info!(template = %template.name, assigned = assigned.len(), "template applied");
        applied = Some(template.name);
    }

    if !args.no_auto_map {
        let assigned = session.auto_map().await?;
        info!(assigned = assigned.len(), "auto-mapped fields");
    }
    Ok(applied)
}

/// Resolves `--map field=column`; the column is matched by label first,
/// then by id.
pub fn resolve_map_arg(pair: &MapArg, schema: &SourceSchema) -> Result<(FieldId, ColumnId)> {
    let field = FieldId::new(pair.field.as_str())?;
    if let Some(column) = schema.find_by_label(&pair.column) {
        return Ok((field, column.id.clone()));
    }
    let id = ColumnId::new(pair.column.as_str())?;
    if schema.contains(&id) {
        return Ok((field, id));
    }
    bail!("column '{}' not found in file", pair.column)
}

fn repository(args: &RunArgs) -> Result<TemplateRepository> {
    TemplateRepository::new(&args.templates_dir)
}

async fn save_template(session: &Session, args: &RunArgs, name: &str) -> Result<PathBuf> {
    let wizard = session.lock().await;
    let state = wizard.mapping().context("no mapping to save")?;
    let template = MappingTemplate::from_state(name, state);
    repository(args)?.save(&template)
}

pub fn mapping_rows(state: &MappingState) -> Vec<MappingRow> {
    let errors = state.errors();
    state
        .catalog()
        .fields()
        .iter()
        .map(|field| MappingRow {
            field: field.id.to_string(),
            label: field.label.clone(),
            required: field.required,
            column: state
                .mapping()
                .get(&field.id)
                .map(|column| state.schema().label_of(column).to_string()),
            error: errors.get(&field.id).cloned(),
        })
        .collect()
}
