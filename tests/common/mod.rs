//! Shared fixtures for the integration suite.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trinity_engine::{App, HttpModelSource, MarkerPattern, ModelInspector, RuntimeProvider};
use trinity_runtime::{ExecFut, LoadFut, RuntimeHandle, ScriptRuntime};
use trinity_types::UiOptions;

pub const MODEL_PATH: &str = "/trinity_formal_model.py";

/// Runtime that answers every execution with the source it was given.
struct EchoRuntime {
    executed: Arc<Mutex<Vec<String>>>,
}

impl ScriptRuntime for EchoRuntime {
    fn describe(&self) -> String {
        "echo".to_string()
    }

    fn execute<'a>(&'a self, source: &'a str) -> ExecFut<'a> {
        self.executed
            .lock()
            .expect("executed lock")
            .push(source.to_string());
        Box::pin(async move { Ok(source.to_string()) })
    }
}

/// In-process stand-in for the runtime loader.
pub struct EchoProvider {
    pub acquisitions: AtomicUsize,
    pub executed: Arc<Mutex<Vec<String>>>,
}

impl EchoProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            acquisitions: AtomicUsize::new(0),
            executed: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().expect("executed lock").clone()
    }

    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }
}

impl RuntimeProvider for EchoProvider {
    fn acquire(&self) -> LoadFut<'_, RuntimeHandle> {
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        let handle = RuntimeHandle::new(EchoRuntime {
            executed: Arc::clone(&self.executed),
        });
        Box::pin(async move { Ok(handle) })
    }
}

pub fn model_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}{MODEL_PATH}", server.uri())).expect("model url")
}

pub async fn serve_model(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

pub fn inspector(server: &MockServer, provider: &Arc<EchoProvider>) -> ModelInspector {
    ModelInspector::new(
        Arc::clone(provider) as Arc<dyn RuntimeProvider>,
        Arc::new(HttpModelSource::new()),
        model_url(server),
        MarkerPattern::for_module("z3").expect("marker"),
    )
}

pub fn app(server: &MockServer, provider: &Arc<EchoProvider>, options: UiOptions) -> App {
    App::new(inspector(server, provider), options)
}

/// Tick until at least one background result has been applied.
pub async fn settle(app: &mut App) {
    for _ in 0..400 {
        if app.tick() > 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("background action never finished");
}

/// Draw one frame and return the screen as text, one line per row.
pub fn render(app: &App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
    terminal
        .draw(|frame| trinity_tui::draw(frame, app))
        .expect("draw");
    let buffer = terminal.backend().buffer();
    let mut screen = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            screen.push_str(buffer[(x, y)].symbol());
        }
        screen.push('\n');
    }
    screen
}
