use std::{collections::HashSet, process, sync::Arc};

use serde::Serialize;
use slugline::{
    application::{behavior::SlugBehavior, error::AppError, records::RecordService},
    config,
    domain::{
        slug::{get_value, get_value_bounded},
        transliterate::transliterate,
    },
    infra::{import, memory::InMemoryRecords, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging)?;

    match cli_args.command {
        config::Command::Transliterate(args) => run_transliterate(args),
        config::Command::Resolve(args) => run_resolve(&settings, args),
        config::Command::Import(args) => run_import(settings, args).await,
    }
}

fn run_transliterate(args: config::TransliterateArgs) -> Result<(), AppError> {
    for text in &args.text {
        println!("{}", transliterate(text));
    }
    Ok(())
}

fn run_resolve(settings: &config::Settings, args: config::ResolveArgs) -> Result<(), AppError> {
    let existing: HashSet<String> = args.existing.into_iter().collect();
    let current = args.current.unwrap_or_default();
    let validate_unique = settings.slug.validate_unique && !args.no_unique;
    let exists = |candidate: &str| existing.contains(candidate);

    let value = match settings.slug.max_attempts {
        None => get_value(&current, &args.text, validate_unique, exists),
        Some(limit) => get_value_bounded(&current, &args.text, validate_unique, limit, exists)
            .map_err(|err| AppError::validation(err.to_string()))?,
    };

    println!("{value}");
    Ok(())
}

async fn run_import(settings: config::Settings, args: config::ImportArgs) -> Result<(), AppError> {
    let field_sets = import::read_field_sets(&args.file).await?;

    info!(
        target = "slugline::import",
        path = %args.file.display(),
        records = field_sets.len(),
        "Starting import"
    );

    let store = Arc::new(InMemoryRecords::new(settings.slug.target_field.as_str()));
    let service = RecordService::new(
        store.clone(),
        store.clone(),
        store,
        SlugBehavior::new(settings.slug),
    );

    for fields in field_sets {
        service.create(fields).await?;
    }

    let records = service.list_all().await?;
    print_json(&records)?;

    info!(
        target = "slugline::import",
        records = records.len(),
        "Import completed"
    );
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::unexpected(format!("failed to render output: {err}")))?;
    println!("{out}");
    Ok(())
}
