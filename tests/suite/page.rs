//! Page actions against a mock site.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trinity_engine::{Action, Control, Flag, InspectionStatus, Verdict};
use trinity_types::UiOptions;

use crate::common::{self, EchoProvider, MODEL_PATH};

#[tokio::test]
async fn z3_model_is_explained_not_executed() {
    let server = MockServer::start().await;
    let model = "from z3 import *\n\ns = Solver()\nprint(s.check())\n";
    Mock::given(method("GET"))
        .and(path(MODEL_PATH))
        .and(header("cache-control", "no-store"))
        .respond_with(ResponseTemplate::new(200).set_body_string(model))
        .expect(1)
        .mount(&server)
        .await;
    let provider = EchoProvider::new();
    let mut inspector = common::inspector(&server, &provider);

    inspector.inspect_external_model().await;

    assert_eq!(inspector.status(), InspectionStatus::Ready);
    assert!(
        inspector
            .log()
            .contains(&format!("({} bytes)", model.len()))
    );
    assert!(inspector.log().contains("Base Nicene axioms: SAT"));
    assert!(provider.executed().is_empty());
    server.verify().await;
}

#[tokio::test]
async fn plain_model_text_is_executed_exactly() {
    let server = MockServer::start().await;
    let model = "values = [1, 2, 3]\nsum(values)\n";
    common::serve_model(&server, model).await;
    let provider = EchoProvider::new();
    let mut inspector = common::inspector(&server, &provider);

    inspector.inspect_external_model().await;

    assert_eq!(provider.executed(), vec![model.to_string()]);
    assert_eq!(inspector.log(), model);
}

#[tokio::test]
async fn missing_model_reports_status_and_keeps_log() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let provider = EchoProvider::new();
    let mut inspector = common::inspector(&server, &provider);
    inspector.run_diagnostic().await;
    let before = inspector.log().to_string();

    inspector.inspect_external_model().await;

    assert_eq!(inspector.status(), InspectionStatus::Error);
    let message = inspector.error().expect("error message");
    assert!(message.contains("404"), "{message}");
    assert_eq!(inspector.log(), before);
}

#[tokio::test]
async fn page_recovers_after_a_failed_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    common::serve_model(&server, "'recovered'").await;
    let provider = EchoProvider::new();
    let mut app = common::app(&server, &provider, UiOptions::default());

    assert!(app.trigger(Action::InspectModel));
    common::settle(&mut app).await;
    assert_eq!(app.inspector().status(), InspectionStatus::Error);

    app.set_focus(Control::Run(Action::InspectModel));
    assert!(app.activate());
    assert_eq!(app.inspector().status(), InspectionStatus::Running);
    assert_eq!(app.inspector().error(), None);
    common::settle(&mut app).await;

    assert_eq!(app.inspector().status(), InspectionStatus::Ready);
    assert_eq!(app.inspector().log(), "'recovered'");
}

#[tokio::test]
async fn mount_then_diagnostic_runs_through_the_page() {
    let server = MockServer::start().await;
    let provider = EchoProvider::new();
    let mut app = common::app(&server, &provider, UiOptions::default());

    assert!(app.mount());
    assert_eq!(app.inspector().status(), InspectionStatus::Loading);
    common::settle(&mut app).await;
    assert_eq!(app.inspector().status(), InspectionStatus::Ready);

    assert!(app.trigger(Action::Diagnostic));
    assert!(!app.trigger(Action::InspectModel), "busy page rejects actions");
    common::settle(&mut app).await;

    assert!(app.inspector().log().contains("Hello from Python!"));
    assert_eq!(provider.acquisitions(), 2);
}

#[tokio::test]
async fn verdict_follows_every_toggle() {
    let server = MockServer::start().await;
    let provider = EchoProvider::new();
    let mut app = common::app(&server, &provider, UiOptions::default());

    for flag in Flag::ALL {
        assert_eq!(app.toggle(flag), Verdict::Unsat);
        assert_eq!(app.toggle(flag), Verdict::Sat);
    }
    app.toggle(Flag::Modalism);
    app.toggle(Flag::Subordination);
    assert_eq!(app.inspector().verdict(), Verdict::Unsat);
}
