use anyhow::{Context, Result};
use rules_core::{
    DataBag, OperationKey, Record, RecordId, StoredRecord, ValidationOutcome, Validator,
    data_bag_from_json,
};
use rules_parser::parse_file;
use rules_validator::{InMemoryStore, RuleEngine};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::output;

/// Arguments of the `validate` command.
pub struct ValidateArgs<'a> {
    pub profile: &'a str,
    pub data: &'a str,
    pub operation: Option<&'a str>,
    pub call: Option<&'a str>,
    pub existing: Option<&'a str>,
    pub key_name: &'a str,
    pub store: Option<&'a str>,
    pub format: &'a str,
}

pub fn execute(args: ValidateArgs<'_>) -> Result<()> {
    info!("Validating {} against profile {}", args.data, args.profile);

    let profile = parse_file(Path::new(args.profile))
        .with_context(|| format!("Failed to parse profile file: {}", args.profile))?;

    let data = load_data(args.data)?;
    let engine = build_engine(args.store)?;

    let record = args.existing.map(|id| {
        let id: RecordId = id.parse().unwrap_or_else(|never| match never {});
        StoredRecord::new(id).with_key_name(args.key_name)
    });

    let text = args.format != "json";
    if text {
        output::print_info(&format!(
            "Profile loaded: {} ({} fields)",
            profile.name,
            profile.rules.len()
        ));
    }

    let mut validator = Validator::new(engine, profile);
    let outcome = run(&mut validator, &args, data, record.as_ref())?;

    output::print_validation_report(&outcome, args.format)?;

    if outcome.fails() {
        std::process::exit(1);
    }

    Ok(())
}

fn run(
    validator: &mut Validator<RuleEngine>,
    args: &ValidateArgs<'_>,
    data: DataBag,
    record: Option<&StoredRecord>,
) -> Result<ValidationOutcome> {
    let record = record.map(|r| r as &dyn Record);

    let outcome = match (args.call, args.operation, record) {
        (Some(call), _, record) => validator
            .dispatch(call, &data, record)
            .with_context(|| format!("Failed to run call: {}", call))?,
        (None, Some(operation), Some(record)) => validator
            .validate_operation_for_existing(&OperationKey::new(operation), &data, record)
            .context("Validation failed")?,
        (None, Some(operation), None) => validator
            .validate_operation(&OperationKey::new(operation), &data)
            .context("Validation failed")?,
        (None, None, Some(record)) => {
            let rules = validator.profile().rules.clone();
            validator
                .validate_for_existing(&data, &rules, record, None)
                .context("Validation failed")?
        }
        (None, None, None) => validator
            .with(data)
            .passes()
            .context("Validation failed")?,
    };

    Ok(outcome)
}

fn load_data(path: &str) -> Result<DataBag> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {}", path))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON data: {}", path))?;
    data_bag_from_json(value).with_context(|| format!("Invalid data payload: {}", path))
}

fn build_engine(store: Option<&str>) -> Result<RuleEngine> {
    let Some(path) = store else {
        return Ok(RuleEngine::new());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read store file: {}", path))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse store JSON: {}", path))?;
    let store =
        InMemoryStore::from_json(value).with_context(|| format!("Invalid store file: {}", path))?;

    info!("Loaded record store from {}", path);
    Ok(RuleEngine::new().with_store(Arc::new(store)))
}
