//! Configuration file to running page.

use std::fs;

use tempfile::TempDir;

use trinity_config::{ResolvedConfig, TrinityConfig};
use trinity_engine::{App, InspectionStatus, LoadPhase};
use trinity_types::UiMode;

#[test]
fn config_file_drives_the_page_stack() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        format!(
            r#"
[app]
ui = "headless"
ascii_only = true

[site]
base_url = "https://trinity.example/docs"
model_path = "models/trinity_formal_model.py"

[runtime]
base_url = "https://cdn.example/pyruntime"
version = "v3"
cache_dir = "{}"
"#,
            dir.path().join("cache").display()
        ),
    )
    .expect("write config");

    let config = TrinityConfig::load_from(&path)
        .expect("load")
        .expect("config present");
    let resolved = ResolvedConfig::resolve(&config).expect("resolve");

    assert_eq!(resolved.ui_mode, UiMode::Headless);
    assert!(resolved.ui_options.ascii_only);
    assert_eq!(
        resolved.model_url.as_str(),
        "https://trinity.example/docs/models/trinity_formal_model.py"
    );
    assert_eq!(
        resolved.runtime.bootstrap_url.as_str(),
        "https://cdn.example/pyruntime/v3/bootstrap.py"
    );
    assert_eq!(
        resolved.runtime.index_url.as_str(),
        "https://cdn.example/pyruntime/v3/"
    );

    let app = App::from_config(&resolved).expect("app");
    assert_eq!(app.inspector().model_url(), &resolved.model_url);
    assert_eq!(app.inspector().marker().module(), "z3");
    assert_eq!(app.inspector().status(), InspectionStatus::Idle);
    assert_eq!(app.inspector().runtime_phase(), LoadPhase::NotStarted);
    assert!(app.ui_options().ascii_only);
}

#[test]
fn malformed_config_names_the_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[app\nui = ").expect("write config");

    let err = TrinityConfig::load_from(&path).expect_err("parse error");

    assert!(err.to_string().contains("config.toml"), "{err}");
}
