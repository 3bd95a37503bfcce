//! Key handling against the full page stack.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use wiremock::MockServer;

use trinity_engine::{Action, App, Control, Flag, InspectionStatus, Verdict};
use trinity_tui::apply_key;
use trinity_types::UiOptions;

use crate::common::{self, EchoProvider};

fn press(app: &mut App, code: KeyCode) {
    apply_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

fn page(server: &MockServer) -> App {
    common::app(server, &EchoProvider::new(), UiOptions::default())
}

#[tokio::test]
async fn focus_keys_move_and_wrap() {
    let server = MockServer::start().await;
    let mut app = page(&server);

    press(&mut app, KeyCode::Down);
    assert_eq!(app.focused(), Control::Flag(Flag::Tritheism));
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.focused(), Control::Flag(Flag::Subordination));
    press(&mut app, KeyCode::Char('j'));
    assert_eq!(app.focused(), Control::Run(Action::Diagnostic));

    press(&mut app, KeyCode::Up);
    assert_eq!(app.focused(), Control::Flag(Flag::Subordination));
    press(&mut app, KeyCode::BackTab);
    assert_eq!(app.focused(), Control::Flag(Flag::Tritheism));
    press(&mut app, KeyCode::Char('k'));
    assert_eq!(app.focused(), Control::Flag(Flag::Modalism));
    press(&mut app, KeyCode::Up);
    assert_eq!(app.focused(), Control::Run(Action::InspectModel));
}

#[tokio::test]
async fn number_keys_toggle_their_flag() {
    let server = MockServer::start().await;
    let mut app = page(&server);

    for (key, flag) in [
        ('1', Flag::Modalism),
        ('2', Flag::Tritheism),
        ('3', Flag::Subordination),
    ] {
        press(&mut app, KeyCode::Char(key));
        assert!(app.inspector().inputs().get(flag), "{key} sets {flag:?}");
        assert_eq!(app.inspector().verdict(), Verdict::Unsat);

        press(&mut app, KeyCode::Char(key));
        assert!(!app.inspector().inputs().get(flag), "{key} clears {flag:?}");
        assert_eq!(app.inspector().verdict(), Verdict::Sat);
    }
}

#[tokio::test]
async fn enter_and_space_activate_the_focused_control() {
    let server = MockServer::start().await;
    let mut app = page(&server);

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.inspector().verdict(), Verdict::Unsat);
    press(&mut app, KeyCode::Char(' '));
    assert_eq!(app.inspector().verdict(), Verdict::Sat);

    app.set_focus(Control::Run(Action::Diagnostic));
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.inspector().status(), InspectionStatus::Running);
    common::settle(&mut app).await;
    assert_eq!(app.inspector().status(), InspectionStatus::Ready);
}

#[tokio::test]
async fn action_keys_are_ignored_while_busy() {
    let server = MockServer::start().await;
    let model = "6 * 7\n";
    common::serve_model(&server, model).await;
    let provider = EchoProvider::new();
    let mut app = common::app(&server, &provider, UiOptions::default());

    press(&mut app, KeyCode::Char('m'));
    assert_eq!(app.inspector().status(), InspectionStatus::Running);
    assert!(!app.actions_enabled());

    press(&mut app, KeyCode::Char('d'));
    press(&mut app, KeyCode::Char('m'));
    common::settle(&mut app).await;

    assert_eq!(app.inspector().status(), InspectionStatus::Ready);
    assert_eq!(provider.executed(), vec![model.to_string()]);
    assert_eq!(app.inspector().log(), model);

    press(&mut app, KeyCode::Char('d'));
    assert_eq!(app.inspector().status(), InspectionStatus::Running);
}

#[tokio::test]
async fn quit_keys() {
    let server = MockServer::start().await;

    for key in [
        KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
        KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
    ] {
        let mut app = page(&server);
        apply_key(&mut app, key);
        assert!(app.should_quit(), "{key:?} quits");
    }

    let mut app = page(&server);
    apply_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE));
    apply_key(&mut app, KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
    assert!(!app.should_quit());
}

#[tokio::test]
async fn key_releases_are_ignored() {
    let server = MockServer::start().await;
    let mut app = page(&server);

    for code in [KeyCode::Char('1'), KeyCode::Down, KeyCode::Char('q')] {
        apply_key(
            &mut app,
            KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release),
        );
    }

    assert_eq!(app.inspector().verdict(), Verdict::Sat);
    assert_eq!(app.focused(), Control::Flag(Flag::Modalism));
    assert!(!app.should_quit());
}
