//! TUI rendering for the Trinity model page using ratatui.

mod input;
mod theme;

pub use input::{InputPump, apply_key, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap},
};
use tracing::trace;

use trinity_engine::{Action, App, Control, InspectionStatus, LoadPhase, Verdict};
use trinity_types::sanitize_terminal_text;

const TITLE: &str = "Trinity Formal Model";
const SUBTITLE: &str = "Toggle a heresy to see the Nicene axioms become unsatisfiable.";

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.bg_dark)),
        frame.area(),
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(8),    // Panels
            Constraint::Length(5), // Run locally
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    draw_header(frame, rows[0], &palette);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);
    draw_toggles(frame, app, columns[0], &palette, &glyphs);
    draw_runtime(frame, app, columns[1], &palette, &glyphs);

    draw_run_locally(frame, app, rows[2], &palette, &glyphs);
    draw_key_hints(frame, rows[3], &palette, &glyphs);
    trace!(status = %app.inspector().status(), "Frame drawn");
}

fn panel<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .title(Span::styled(format!(" {title} "), styles::title(palette)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .style(Style::default().bg(palette.bg_panel))
        .padding(Padding::horizontal(1))
}

fn draw_header(frame: &mut Frame, area: Rect, palette: &Palette) {
    let lines = vec![
        Line::from(Span::styled(TITLE, styles::title(palette))),
        Line::from(Span::styled(
            SUBTITLE,
            Style::default().fg(palette.text_secondary),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_toggles(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let inspector = app.inspector();
    let inputs = inspector.inputs();
    let mut lines = Vec::new();

    for control in Control::ALL {
        let Control::Flag(flag) = control else {
            continue;
        };
        let focused = app.focused() == control;
        let marker = if focused { glyphs.selected } else { " " };
        let check = if inputs.get(flag) {
            glyphs.checked
        } else {
            glyphs.unchecked
        };
        let label_style = if focused {
            styles::focused(palette)
        } else {
            Style::default().fg(palette.text_primary)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker} "), Style::default().fg(palette.accent)),
            Span::styled(format!("{check} {}", flag.title()), label_style),
            Span::styled(format!("  [{}]", flag.hotkey()), styles::key_hint(palette)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", flag.description()),
            Style::default().fg(palette.text_muted),
        )));
    }

    let verdict = inspector.verdict();
    let (pill_style, icon) = match verdict {
        Verdict::Sat => (styles::pill_sat(palette), glyphs.consistent),
        Verdict::Unsat => (styles::pill_unsat(palette), glyphs.contradiction),
    };
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Verdict: ", Style::default().fg(palette.text_secondary)),
        Span::styled(format!(" {icon} {} ", verdict.label()), pill_style),
    ]));

    frame.render_widget(
        Paragraph::new(lines)
            .block(panel("Doctrine", palette))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_runtime(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let inspector = app.inspector();
    let block = panel("Python runtime", palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Buttons
            Constraint::Length(2), // Status + error
            Constraint::Min(1),    // Log
        ])
        .split(inner);

    let mut buttons = Vec::new();
    for control in Control::ALL {
        let Control::Run(action) = control else {
            continue;
        };
        let enabled = app.is_enabled(control);
        let focused = app.focused() == control;
        let style = match (enabled, focused) {
            (false, _) => styles::disabled(palette),
            (true, true) => styles::focused(palette),
            (true, false) => Style::default().fg(palette.text_primary),
        };
        let hotkey = match action {
            Action::Diagnostic => 'd',
            Action::InspectModel => 'm',
            Action::Initialize => continue,
        };
        buttons.push(Span::styled(format!("[ {} ]", action.label()), style));
        buttons.push(Span::styled(format!(" ({hotkey})  "), styles::key_hint(palette)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(buttons)).wrap(Wrap { trim: true }),
        sections[0],
    );

    let status = inspector.status();
    let status_style = match status {
        InspectionStatus::Ready => Style::default().fg(palette.success),
        InspectionStatus::Error => Style::default().fg(palette.error),
        InspectionStatus::Loading | InspectionStatus::Running => {
            Style::default().fg(palette.warning)
        }
        InspectionStatus::Idle => Style::default().fg(palette.text_muted),
    };
    let mut status_line = vec![Span::styled("Status: ", styles::key_hint(palette))];
    if status.is_busy() {
        status_line.push(Span::styled(
            format!("{} ", spinner_frame(app.tick_count(), app.ui_options())),
            status_style,
        ));
    }
    status_line.push(Span::styled(
        status.as_str(),
        status_style.add_modifier(Modifier::BOLD),
    ));
    if inspector.runtime_phase() == LoadPhase::Ready {
        status_line.push(Span::styled(
            "  (runtime loaded)",
            styles::key_hint(palette),
        ));
    }
    let mut status_lines = vec![Line::from(status_line)];
    if let Some(error) = inspector.error() {
        status_lines.push(Line::from(Span::styled(
            format!("{} {}", glyphs.error, sanitize_terminal_text(error)),
            Style::default().fg(palette.error),
        )));
    }
    frame.render_widget(Paragraph::new(status_lines), sections[1]);

    let log = sanitize_terminal_text(inspector.log());
    let body = if log.is_empty() {
        vec![Line::from(Span::styled(
            "No output yet.",
            Style::default().fg(palette.text_muted),
        ))]
    } else {
        log.lines()
            .map(|line| {
                Line::from(Span::styled(
                    line.to_string(),
                    Style::default().fg(palette.text_primary),
                ))
            })
            .collect()
    };
    frame.render_widget(
        Paragraph::new(body)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(palette.bg_border))
                    .title(Span::styled(" Output ", styles::key_hint(palette))),
            )
            .wrap(Wrap { trim: false }),
        sections[2],
    );
}

fn draw_run_locally(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let lines: Vec<Line> = app
        .run_locally_steps()
        .iter()
        .map(|step| {
            Line::from(vec![
                Span::styled(format!("{} ", glyphs.bullet), Style::default().fg(palette.accent)),
                Span::styled(step.clone(), Style::default().fg(palette.text_secondary)),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(panel("Run it locally", palette)),
        area,
    );
}

fn draw_key_hints(frame: &mut Frame, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let hints = [
        (glyphs.arrows, "focus"),
        ("enter", "activate"),
        ("1-3", "toggle"),
        ("d", "diagnostic"),
        ("m", "inspect"),
        ("q", "quit"),
    ];
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, what) in hints {
        spans.push(Span::styled(key, styles::key_highlight(palette)));
        spans.push(Span::styled(format!(" {what}  "), styles::key_hint(palette)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
