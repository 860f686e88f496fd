//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{num::NonZeroU32, path::PathBuf, str::FromStr};

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::application::behavior::LifecycleEvent;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "slugline";
const ENV_PREFIX: &str = "SLUGLINE";
const DEFAULT_SOURCE_FIELD: &str = "title";
const DEFAULT_TARGET_FIELD: &str = "alias";

/// Command-line arguments for the slugline binary.
#[derive(Debug, Parser)]
#[command(
    name = "slugline",
    version,
    about = "Transliterate titles into unique URL slugs"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "SLUGLINE_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: SettingsOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print the slug candidate for each argument.
    Transliterate(TransliterateArgs),
    /// Resolve a unique slug against a set of existing values.
    Resolve(ResolveArgs),
    /// Create records from a JSON file and print them with their slugs.
    Import(ImportArgs),
}

#[derive(Debug, Args, Clone)]
pub struct TransliterateArgs {
    /// Source text, one slug is printed per value.
    #[arg(value_name = "TEXT", required = true)]
    pub text: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ResolveArgs {
    /// Source text used when no current value is given.
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// A slug that is already taken; repeat for several.
    #[arg(long = "existing", value_name = "SLUG")]
    pub existing: Vec<String>,

    /// Manually entered slug that takes precedence over the source text.
    #[arg(long = "current", value_name = "SLUG")]
    pub current: Option<String>,

    /// Skip uniqueness resolution for this run.
    #[arg(long = "no-unique", action = clap::ArgAction::SetTrue)]
    pub no_unique: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ImportArgs {
    /// JSON file holding an array of objects mapping field names to strings.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

#[derive(Debug, Args, Default, Clone)]
pub struct SettingsOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,

    /// Override the field the slug is derived from.
    #[arg(long = "source-field", value_name = "FIELD", global = true)]
    pub source_field: Option<String>,

    /// Override the field the slug is written to.
    #[arg(long = "target-field", value_name = "FIELD", global = true)]
    pub target_field: Option<String>,

    /// Toggle uniqueness resolution.
    #[arg(
        long = "validate-unique",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub validate_unique: Option<bool>,

    /// Give up after this many suffixed candidates.
    #[arg(long = "max-attempts", value_name = "COUNT", global = true)]
    pub max_attempts: Option<u32>,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub slug: SlugSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Which fields the slug behavior binds to and how it resolves collisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugSettings {
    pub source_field: String,
    pub target_field: String,
    pub validate_unique: bool,
    pub events: Vec<LifecycleEvent>,
    /// `None` tries suffixes without limit.
    pub max_attempts: Option<NonZeroU32>,
}

impl Default for SlugSettings {
    fn default() -> Self {
        Self {
            source_field: DEFAULT_SOURCE_FIELD.to_string(),
            target_field: DEFAULT_TARGET_FIELD.to_string(),
            validate_unique: true,
            events: vec![LifecycleEvent::BeforeInsert, LifecycleEvent::BeforeUpdate],
            max_attempts: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Parse the process arguments and load settings for them.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let cli = CliArgs::parse();
    let settings = load(&cli)?;
    Ok((cli, settings))
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("slug.events"),
    );

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    slug: RawSlugSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSlugSettings {
    source_field: Option<String>,
    target_field: Option<String>,
    validate_unique: Option<bool>,
    events: Option<Vec<String>>,
    max_attempts: Option<u32>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &SettingsOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(field) = overrides.source_field.as_ref() {
            self.slug.source_field = Some(field.clone());
        }
        if let Some(field) = overrides.target_field.as_ref() {
            self.slug.target_field = Some(field.clone());
        }
        if let Some(validate) = overrides.validate_unique {
            self.slug.validate_unique = Some(validate);
        }
        if let Some(max) = overrides.max_attempts {
            self.slug.max_attempts = Some(max);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings { logging, slug } = raw;

        let logging = build_logging_settings(logging)?;
        let slug = build_slug_settings(slug)?;

        Ok(Self { logging, slug })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_slug_settings(slug: RawSlugSettings) -> Result<SlugSettings, LoadError> {
    let defaults = SlugSettings::default();

    let source_field = field_name(slug.source_field, defaults.source_field, "slug.source_field")?;
    let target_field = field_name(slug.target_field, defaults.target_field, "slug.target_field")?;
    if source_field == target_field {
        return Err(LoadError::invalid(
            "slug.target_field",
            "must differ from slug.source_field",
        ));
    }

    let events = match slug.events {
        Some(names) => {
            let mut events = Vec::with_capacity(names.len());
            for name in names {
                let event = LifecycleEvent::from_str(name.trim())
                    .map_err(|err| LoadError::invalid("slug.events", err.to_string()))?;
                if !events.contains(&event) {
                    events.push(event);
                }
            }
            events
        }
        None => defaults.events,
    };

    let max_attempts = slug
        .max_attempts
        .map(|value| {
            NonZeroU32::new(value)
                .ok_or_else(|| LoadError::invalid("slug.max_attempts", "must be greater than zero"))
        })
        .transpose()?;

    Ok(SlugSettings {
        source_field,
        target_field,
        validate_unique: slug.validate_unique.unwrap_or(defaults.validate_unique),
        events,
        max_attempts,
    })
}

fn field_name(
    value: Option<String>,
    default: String,
    key: &'static str,
) -> Result<String, LoadError> {
    match value {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(LoadError::invalid(key, "field name must not be empty"));
            }
            Ok(trimmed.to_string())
        }
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests;
