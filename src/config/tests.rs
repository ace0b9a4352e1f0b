use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn attachment_limit_defaults_to_10_mib() {
    let raw = RawSettings::default();
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.uploads.max_attachment_bytes.get(),
        DEFAULT_MAX_ATTACHMENT_BYTES
    );
}

#[test]
fn attachment_limit_can_be_overridden_via_cli() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        max_attachment_bytes: Some(1_572_864),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.uploads.max_attachment_bytes.get(), 1_572_864);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["vetrina"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn contact_delays_default_to_the_documented_stubs() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(settings.contact.submit_delay, Duration::from_millis(2000));
    assert_eq!(
        settings.contact.newsletter_delay,
        Duration::from_millis(1500)
    );
}

#[test]
fn blog_page_size_rejects_zero() {
    let mut raw = RawSettings::default();
    raw.listing.blog_page_size = Some(0);
    let error = Settings::from_raw(raw).expect_err("zero page size is invalid");
    assert!(matches!(
        error,
        LoadError::Invalid {
            key: "listing.blog_page_size",
            ..
        }
    ));
}

#[test]
fn store_base_url_must_parse() {
    let mut raw = RawSettings::default();
    raw.store.base_url = Some("not a url".to_string());
    let error = Settings::from_raw(raw).expect_err("invalid url rejected");
    assert!(matches!(
        error,
        LoadError::Invalid {
            key: "store.base_url",
            ..
        }
    ));
}

#[test]
fn parse_serve_arguments() {
    let args = CliArgs::parse_from([
        "vetrina",
        "serve",
        "--server-port",
        "8080",
        "--store-base-url",
        "http://store.internal/",
        "--content-directory",
        "/var/lib/vetrina",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_port, Some(8080));
            assert_eq!(
                serve.overrides.store_base_url.as_deref(),
                Some("http://store.internal/")
            );
            assert_eq!(
                serve.overrides.content_directory.as_deref(),
                Some(std::path::Path::new("/var/lib/vetrina"))
            );
        }
    }
}
