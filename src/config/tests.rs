use std::io::Write;

use serial_test::serial;

use super::*;

fn cli(args: &[&str]) -> CliArgs {
    let mut argv = vec!["slugline"];
    argv.extend_from_slice(args);
    CliArgs::parse_from(argv)
}

#[test]
fn defaults_bind_title_to_alias() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.slug.source_field, "title");
    assert_eq!(settings.slug.target_field, "alias");
    assert!(settings.slug.validate_unique);
    assert_eq!(
        settings.slug.events,
        vec![LifecycleEvent::BeforeInsert, LifecycleEvent::BeforeUpdate]
    );
    assert_eq!(settings.slug.max_attempts, None);
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.slug.target_field = Some("slug".to_string());
    raw.logging.level = Some("info".to_string());

    let overrides = SettingsOverrides {
        target_field: Some("permalink".to_string()),
        log_level: Some("debug".to_string()),
        validate_unique: Some(false),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.slug.target_field, "permalink");
    assert!(!settings.slug.validate_unique);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = SettingsOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_max_attempts_is_rejected() {
    let mut raw = RawSettings::default();
    raw.slug.max_attempts = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero attempts");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "slug.max_attempts",
            ..
        }
    ));
}

#[test]
fn identical_source_and_target_fields_are_rejected() {
    let mut raw = RawSettings::default();
    raw.slug.source_field = Some("alias".to_string());

    let err = Settings::from_raw(raw).expect_err("same field");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "slug.target_field",
            ..
        }
    ));
}

#[test]
fn blank_field_names_are_rejected() {
    let mut raw = RawSettings::default();
    raw.slug.source_field = Some("   ".to_string());

    let err = Settings::from_raw(raw).expect_err("blank field");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "slug.source_field",
            ..
        }
    ));
}

#[test]
fn events_are_parsed_and_deduplicated() {
    let mut raw = RawSettings::default();
    raw.slug.events = Some(vec![
        "before_insert".to_string(),
        " before_insert ".to_string(),
    ]);

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.slug.events, vec![LifecycleEvent::BeforeInsert]);
}

#[test]
fn unknown_events_are_rejected() {
    let mut raw = RawSettings::default();
    raw.slug.events = Some(vec!["after_delete".to_string()]);

    let err = Settings::from_raw(raw).expect_err("unknown event");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "slug.events",
            ..
        }
    ));
}

#[test]
fn invalid_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());

    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn parse_resolve_arguments() {
    let args = cli(&[
        "resolve",
        "Привет мир",
        "--existing",
        "privet-mir",
        "--existing",
        "privet-mir-1",
        "--max-attempts",
        "5",
    ]);

    match args.command {
        Command::Resolve(resolve) => {
            assert_eq!(resolve.text, "Привет мир");
            assert_eq!(resolve.existing, ["privet-mir", "privet-mir-1"]);
            assert_eq!(resolve.current, None);
            assert!(!resolve.no_unique);
        }
        _ => panic!("wrong command parsed"),
    }
    assert_eq!(args.overrides.max_attempts, Some(5));
}

#[test]
fn parse_resolve_no_unique_flag() {
    let args = cli(&["resolve", "Привет", "--current", "hello", "--no-unique"]);

    match args.command {
        Command::Resolve(resolve) => {
            assert!(resolve.no_unique);
            assert_eq!(resolve.current.as_deref(), Some("hello"));
        }
        _ => panic!("wrong command parsed"),
    }
    assert_eq!(args.overrides.validate_unique, None);
}

#[test]
fn parse_transliterate_arguments() {
    let args = cli(&["--validate-unique=false", "transliterate", "один", "два"]);

    match args.command {
        Command::Transliterate(transliterate) => {
            assert_eq!(transliterate.text, ["один", "два"]);
        }
        _ => panic!("wrong command parsed"),
    }
    assert_eq!(args.overrides.validate_unique, Some(false));
}

#[test]
fn parse_import_arguments() {
    let args = cli(&["import", "/tmp/records.json", "--log-json", "true"]);

    match args.command {
        Command::Import(import) => {
            assert_eq!(import.file, std::path::Path::new("/tmp/records.json"));
        }
        _ => panic!("wrong command parsed"),
    }
    assert_eq!(args.overrides.log_json, Some(true));
}

#[test]
#[serial]
fn config_file_and_environment_are_layered() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config");
    writeln!(
        file,
        "[slug]\nsource_field = \"name\"\ntarget_field = \"handle\"\nmax_attempts = 10"
    )
    .expect("write config");

    // SAFETY: env mutation is confined to serialized tests.
    unsafe {
        std::env::set_var("SLUGLINE__SLUG__TARGET_FIELD", "slug");
        std::env::set_var("SLUGLINE__SLUG__EVENTS", "before_update");
    }

    let path = file.path().to_string_lossy().into_owned();
    let args = cli(&["--config-file", &path, "transliterate", "x"]);
    let result = load(&args);

    unsafe {
        std::env::remove_var("SLUGLINE__SLUG__TARGET_FIELD");
        std::env::remove_var("SLUGLINE__SLUG__EVENTS");
    }

    let settings = result.expect("settings");
    assert_eq!(settings.slug.source_field, "name");
    assert_eq!(settings.slug.target_field, "slug");
    assert_eq!(settings.slug.events, vec![LifecycleEvent::BeforeUpdate]);
    assert_eq!(settings.slug.max_attempts, NonZeroU32::new(10));
}

#[test]
#[serial]
fn cli_beats_environment() {
    unsafe {
        std::env::set_var("SLUGLINE__SLUG__SOURCE_FIELD", "headline");
    }

    let args = cli(&["--source-field", "caption", "transliterate", "x"]);
    let result = load(&args);

    unsafe {
        std::env::remove_var("SLUGLINE__SLUG__SOURCE_FIELD");
    }

    let settings = result.expect("settings");
    assert_eq!(settings.slug.source_field, "caption");
}
