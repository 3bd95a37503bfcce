//! Page controller: focus, activation and background action plumbing.

use trinity_config::ResolvedConfig;
use trinity_types::{Flag, UiOptions, Verdict};
use tracing::debug;

use crate::dispatch::ActionDispatcher;
use crate::init;
use crate::inspector::{Action, ModelInspector};

/// A focusable control on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Flag(Flag),
    Run(Action),
}

impl Control {
    /// Focus order, top to bottom.
    pub const ALL: [Control; 5] = [
        Control::Flag(Flag::Modalism),
        Control::Flag(Flag::Tritheism),
        Control::Flag(Flag::Subordination),
        Control::Run(Action::Diagnostic),
        Control::Run(Action::InspectModel),
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Control::Flag(flag) => flag.title(),
            Control::Run(action) => action.label(),
        }
    }
}

pub struct App {
    inspector: ModelInspector,
    dispatcher: ActionDispatcher,
    focus: usize,
    ui_options: UiOptions,
    mounted: bool,
    should_quit: bool,
    ticks: usize,
}

impl App {
    pub fn new(inspector: ModelInspector, ui_options: UiOptions) -> Self {
        Self {
            inspector,
            dispatcher: ActionDispatcher::new(),
            focus: 0,
            ui_options,
            mounted: false,
            should_quit: false,
            ticks: 0,
        }
    }

    /// Build the page stack from resolved configuration, sharing the
    /// process-wide runtime loader.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, regex::Error> {
        Ok(Self::new(init::inspector_from_config(config)?, config.ui_options))
    }

    /// Kick off the initial runtime acquisition. Only the first call does
    /// anything.
    pub fn mount(&mut self) -> bool {
        if self.mounted {
            return false;
        }
        self.mounted = true;
        self.trigger(Action::Initialize)
    }

    /// Advance one frame and apply finished background actions. Returns how
    /// many results were applied.
    pub fn tick(&mut self) -> usize {
        self.ticks = self.ticks.wrapping_add(1);
        self.dispatcher.drain(&mut self.inspector)
    }

    /// Frames since start, for animation.
    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.ticks
    }

    /// Start `action` on a background task. Must be called inside a tokio
    /// runtime.
    pub fn trigger(&mut self, action: Action) -> bool {
        match self.inspector.begin(action) {
            Some(pending) => {
                self.dispatcher.spawn(pending);
                true
            }
            None => false,
        }
    }

    pub fn toggle(&mut self, flag: Flag) -> Verdict {
        self.inspector.toggle(flag)
    }

    #[must_use]
    pub fn focused(&self) -> Control {
        Control::ALL[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % Control::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + Control::ALL.len() - 1) % Control::ALL.len();
    }

    pub fn set_focus(&mut self, control: Control) {
        if let Some(index) = Control::ALL.iter().position(|c| *c == control) {
            self.focus = index;
        }
    }

    /// Activate the focused control. Disabled controls do nothing.
    pub fn activate(&mut self) -> bool {
        let control = self.focused();
        if !self.is_enabled(control) {
            debug!(?control, "Focused control is disabled");
            return false;
        }
        match control {
            Control::Flag(flag) => {
                self.toggle(flag);
                true
            }
            Control::Run(action) => self.trigger(action),
        }
    }

    #[must_use]
    pub fn is_enabled(&self, control: Control) -> bool {
        match control {
            Control::Flag(_) => true,
            Control::Run(_) => self.actions_enabled(),
        }
    }

    #[must_use]
    pub fn actions_enabled(&self) -> bool {
        !self.inspector.status().is_busy()
    }

    #[must_use]
    pub fn inspector(&self) -> &ModelInspector {
        &self.inspector
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.ui_options
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Steps for running the model outside this page.
    #[must_use]
    pub fn run_locally_steps(&self) -> [String; 3] {
        let module = self.inspector.marker().module();
        let package = if module == "z3" { "z3-solver" } else { module };
        let url = self.inspector.model_url();
        let file = url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .unwrap_or("model.py");
        [
            format!("pip install {package}"),
            format!("Download {url}"),
            format!("python {file}"),
        ]
    }
}
