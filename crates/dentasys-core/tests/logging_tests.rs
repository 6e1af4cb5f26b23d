//! Logging setup from the clinic config. Kept in its own binary because the
//! subscriber is process-global.

use dentasys_core::{init_logging_from_config, logging, ClinicConfig};

#[test]
fn test_configured_filter_is_installed() -> anyhow::Result<()> {
    std::env::remove_var("RUST_LOG");

    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("config.json");
    ClinicConfig {
        database_path: dir.path().join("clinic.db"),
        log_filter: "dentasys_core=trace,dentasys_i18n=warn".into(),
        ..Default::default()
    }
    .save(&config_path)?;

    assert!(init_logging_from_config(config_path.to_string_lossy().into_owned())?);
    assert_eq!(
        logging::active_filter(),
        Some("dentasys_core=trace,dentasys_i18n=warn")
    );

    // Already installed; a second call leaves the first filter in place
    assert!(!init_logging_from_config(config_path.to_string_lossy().into_owned())?);
    assert_eq!(
        logging::active_filter(),
        Some("dentasys_core=trace,dentasys_i18n=warn")
    );
    Ok(())
}
