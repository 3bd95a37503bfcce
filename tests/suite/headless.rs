//! Headless runs of the whole page.

use std::sync::Arc;

use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trinity_engine::{
    Action, HttpModelSource, InspectionStatus, MarkerPattern, ModelInspector, run_headless,
};
use trinity_runtime::{HttpScriptHost, LoaderOptions, RuntimeLoader, resolve_interpreter};

use crate::common::{self, EchoProvider};

const BRIDGE: &str = include_str!("../../public/runtime/v1/bootstrap.py");

#[tokio::test]
async fn headless_run_reports_every_step() {
    let server = MockServer::start().await;
    common::serve_model(&server, "import z3\n").await;
    let provider = EchoProvider::new();
    let mut inspector = common::inspector(&server, &provider);

    let report = run_headless(&mut inspector).await;

    let actions: Vec<Action> = report.steps.iter().map(|s| s.action).collect();
    assert_eq!(
        actions,
        vec![Action::Initialize, Action::Diagnostic, Action::InspectModel]
    );
    assert!(report.succeeded());
    let text = report.render();
    assert!(text.contains("== Inspect external model [ready]"));
    assert!(text.contains("imports 'z3'"));
    assert!(text.ends_with("verdict: SAT (consistent)\n"));
}

#[tokio::test]
async fn headless_run_fails_when_the_model_is_missing() {
    let server = MockServer::start().await;
    let provider = EchoProvider::new();
    let mut inspector = common::inspector(&server, &provider);

    let report = run_headless(&mut inspector).await;

    assert!(!report.succeeded());
    assert_eq!(report.final_status(), InspectionStatus::Error);
    assert!(
        report
            .render()
            .contains("error: HTTP 404 Not Found fetching model")
    );
}

#[tokio::test]
async fn headless_run_against_a_real_interpreter() {
    if resolve_interpreter("python3").is_none() {
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/runtime/v1/bootstrap.py"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BRIDGE))
        .expect(1)
        .mount(&server)
        .await;
    common::serve_model(&server, "import math\nround(math.pi, 2)\n").await;

    let cache = TempDir::new().expect("tempdir");
    let index_url = Url::parse(&format!("{}/runtime/v1/", server.uri())).expect("index");
    let loader = RuntimeLoader::new(
        Arc::new(HttpScriptHost::new(cache.path(), "python3")),
        index_url.join("bootstrap.py").expect("bootstrap"),
        LoaderOptions { index_url },
    );
    let mut inspector = ModelInspector::new(
        Arc::new(loader),
        Arc::new(HttpModelSource::new()),
        common::model_url(&server),
        MarkerPattern::for_module("z3").expect("marker"),
    );

    let report = run_headless(&mut inspector).await;

    assert!(report.succeeded(), "{}", report.render());
    assert!(report.steps[1].log.starts_with("Hello from Python!\nPython 3."));
    assert_eq!(report.steps[2].log, "3.14");
    server.verify().await;
}
