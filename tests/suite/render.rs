//! Rendering against ratatui's `TestBackend`.

use wiremock::MockServer;

use trinity_engine::{Action, Control, Flag};
use trinity_types::UiOptions;

use crate::common::{self, EchoProvider};

const WIDTH: u16 = 140;
const HEIGHT: u16 = 40;

#[tokio::test]
async fn initial_page_shows_controls_and_sat_verdict() {
    let server = MockServer::start().await;
    let provider = EchoProvider::new();
    let app = common::app(&server, &provider, UiOptions::default());

    let screen = common::render(&app, WIDTH, HEIGHT);

    assert!(screen.contains("Trinity Formal Model"));
    for flag in Flag::ALL {
        assert!(screen.contains(flag.title()), "missing {flag}");
    }
    assert!(screen.contains("SAT (consistent)"));
    assert!(screen.contains("Run Python diagnostic"));
    assert!(screen.contains("Status: idle"));
    assert!(screen.contains("pip install z3-solver"));
    assert!(screen.contains("No output yet."));
}

#[tokio::test]
async fn toggled_flag_renders_unsat() {
    let server = MockServer::start().await;
    let provider = EchoProvider::new();
    let mut app = common::app(&server, &provider, UiOptions::default());

    app.toggle(Flag::Tritheism);
    let screen = common::render(&app, WIDTH, HEIGHT);

    assert!(screen.contains("UNSAT (contradiction)"));
}

#[tokio::test]
async fn ascii_mode_uses_ascii_checkboxes() {
    let server = MockServer::start().await;
    let provider = EchoProvider::new();
    let options = UiOptions {
        ascii_only: true,
        high_contrast: true,
        reduced_motion: true,
    };
    let mut app = common::app(&server, &provider, options);

    app.toggle(Flag::Modalism);
    let screen = common::render(&app, WIDTH, HEIGHT);

    assert!(screen.contains("[x] Modalism"));
    assert!(screen.contains("[ ] Tritheism"));
    assert!(!screen.contains('☐'));
}

#[tokio::test]
async fn busy_page_shows_loading_status() {
    let server = MockServer::start().await;
    let provider = EchoProvider::new();
    let mut app = common::app(&server, &provider, UiOptions::default());
    app.set_focus(Control::Run(Action::Diagnostic));

    app.mount();
    let screen = common::render(&app, WIDTH, HEIGHT);

    assert!(screen.contains("loading"));
    assert!(!app.is_enabled(Control::Run(Action::Diagnostic)));
    assert!(app.is_enabled(Control::Flag(Flag::Modalism)));
}

#[tokio::test]
async fn runtime_output_is_sanitized() {
    let server = MockServer::start().await;
    common::serve_model(&server, "\u{1b}[31mred alert\u{1b}[0m").await;
    let provider = EchoProvider::new();
    let mut app = common::app(&server, &provider, UiOptions::default());

    app.trigger(Action::InspectModel);
    common::settle(&mut app).await;
    let screen = common::render(&app, WIDTH, HEIGHT);

    assert!(screen.contains("red alert"));
    assert!(!screen.contains('\u{1b}'));
}

#[tokio::test]
async fn fetch_error_is_rendered() {
    let server = MockServer::start().await;
    let provider = EchoProvider::new();
    let mut app = common::app(&server, &provider, UiOptions::default());

    app.trigger(Action::InspectModel);
    common::settle(&mut app).await;
    let screen = common::render(&app, WIDTH, HEIGHT);

    assert!(screen.contains("Status: error"));
    assert!(screen.contains("HTTP 404 Not Found fetching model"));
}
