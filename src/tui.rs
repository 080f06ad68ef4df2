use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::stdout;

use crate::forms::{Edit, FieldId, FieldKind};
use crate::gateway::Gateway;
use crate::wizard::{Step, SubmitError, Wizard};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Notice {
    None,
    Errors(Vec<String>),
    Saved(String),
    Failed(String),
}

struct AppState {
    wizard: Wizard,
    focus: usize,
    notice: Notice,
}

impl AppState {
    fn new() -> Self {
        Self {
            wizard: Wizard::new(),
            focus: 0,
            notice: Notice::None,
        }
    }

    fn fields(&self) -> Vec<FieldId> {
        self.wizard.visible_fields()
    }

    fn focused(&self) -> Option<FieldId> {
        self.fields().get(self.focus).copied()
    }

    fn clamp_focus(&mut self) {
        let len = self.fields().len();
        if self.focus >= len {
            self.focus = len.saturating_sub(1);
        }
    }

    fn focus_next(&mut self) {
        let len = self.fields().len();
        if len > 0 && self.focus < len - 1 {
            self.focus += 1;
        }
    }

    fn focus_prev(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    fn edit(&mut self, edit: Edit) {
        if let Some(field) = self.focused() {
            self.wizard.edit(field, edit);
            self.clamp_focus();
        }
    }

    fn next_step(&mut self) {
        match self.wizard.next() {
            Ok(_) => {
                self.focus = 0;
                self.notice = Notice::None;
            }
            Err(errors) => {
                self.notice = Notice::Errors(errors.iter().map(ToString::to_string).collect());
            }
        }
    }

    fn back(&mut self) {
        self.wizard.back();
        self.focus = 0;
        self.notice = Notice::None;
    }

    fn submit(&mut self, gateway: &dyn Gateway) {
        self.notice = match self.wizard.submit(gateway) {
            Ok(receipt) => {
                self.focus = 0;
                Notice::Saved(format!(
                    "Record for {} saved to ESB database ({} writes). Thank you for submitting your journey!",
                    receipt.student_id, receipt.writes
                ))
            }
            Err(SubmitError::Validation(errors)) => Notice::Errors(errors),
            Err(SubmitError::Persistence(e)) => {
                let hint = if e.is_duplicate() {
                    " Change the ID and submit again."
                } else if e.is_missing_reference() {
                    " Check the referenced IDs and submit again."
                } else {
                    ""
                };
                Notice::Failed(format!("{}{}", SubmitError::Persistence(e), hint))
            }
            Err(e) => Notice::Failed(e.to_string()),
        };
    }

    /// Returns `false` when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent, gateway: &dyn Gateway) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let kind = self.focused().map(|f| f.kind());
        match key.code {
            KeyCode::Esc => return false,
            KeyCode::Char('n') if ctrl => self.next_step(),
            KeyCode::Char('b') if ctrl => self.back(),
            KeyCode::Char('s') if ctrl => {
                if self.wizard.step() == Step::Job {
                    self.submit(gateway);
                } else {
                    self.next_step();
                }
            }
            KeyCode::Char('u') if ctrl => self.edit(Edit::Clear),
            KeyCode::Char('c') if ctrl => return false,
            KeyCode::Down | KeyCode::Tab | KeyCode::Enter => self.focus_next(),
            KeyCode::Up | KeyCode::BackTab => self.focus_prev(),
            KeyCode::Right if kind != Some(FieldKind::Text) => self.edit(Edit::Next),
            KeyCode::Left if kind != Some(FieldKind::Text) => self.edit(Edit::Prev),
            KeyCode::Backspace => self.edit(Edit::Backspace),
            KeyCode::Char(c) if !ctrl => self.edit(Edit::Insert(c)),
            _ => {}
        }
        true
    }
}

pub fn run_wizard(gateway: &dyn Gateway) -> Result<()> {
    let mut state = AppState::new();

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, gateway);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    gateway: &dyn Gateway,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !state.handle_key(key, gateway) {
                break;
            }
        }
    }
    Ok(())
}

fn step_hint(step: Step) -> &'static str {
    match step {
        Step::StudentInfo => {
            "Select your current status and fill basic details. \
             This will be your main identifier in the database."
        }
        Step::Internship => {
            "If you did an internship during the program, answer Yes and the form will open. \
             If not, leave it as No and continue to the next step."
        }
        Step::Job => {
            "If you already have a job offer or are working, answer Yes and the job form will open. \
             If not, you can submit without a job."
        }
    }
}

fn draw(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(8),
            Constraint::Length(1),
        ])
        .split(frame.area());

    // Step chips
    let mut chips: Vec<Span> = Vec::new();
    for step in Step::ALL {
        let style = if step == state.wizard.step() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::LightBlue)
        };
        chips.push(Span::styled(format!(" {} ", step.title()), style));
        chips.push(Span::raw("  "));
    }
    let header = Paragraph::new(Line::from(chips)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" ESB Alumni & Student Journey Survey "),
    );
    frame.render_widget(header, chunks[0]);

    // Form
    let form = Paragraph::new(build_form(state, chunks[1].width))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", state.wizard.step().title())),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(form, chunks[1]);

    // Messages
    let notice = Paragraph::new(build_notice(&state.notice))
        .block(Block::default().borders(Borders::ALL).title(" Messages "))
        .wrap(Wrap { trim: false });
    frame.render_widget(notice, chunks[2]);

    let help = match state.wizard.step() {
        Step::StudentInfo => " Tab/Up/Down:move  Left/Right/Space:choose  ^N:next  ^U:clear  Esc:quit",
        Step::Internship => " Tab/Up/Down:move  Left/Right/Space:choose  ^N:next  ^B:back  ^U:clear  Esc:quit",
        Step::Job => " Tab/Up/Down:move  Left/Right/Space:choose  ^S:submit  ^B:back  ^U:clear  Esc:quit",
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );
}

fn build_form(state: &AppState, width: u16) -> Text<'static> {
    let mut lines: Vec<Line> = Vec::new();

    let wrap_at = usize::from(width.saturating_sub(4)).max(20);
    for line in textwrap::fill(step_hint(state.wizard.step()), wrap_at).lines() {
        lines.push(Line::from(Span::styled(
            line.to_string(),
            Style::default().fg(Color::Gray),
        )));
    }
    lines.push(Line::from(""));

    if let Some(student) = state.wizard.student_draft() {
        let mut context = format!(
            "Student {} {} ({}, {})",
            student.first_name, student.last_name, student.student_id, student.program_id
        );
        if state.wizard.step() == Step::Job && state.wizard.has_internship() {
            if let Some(internship) = state.wizard.internship_draft() {
                context.push_str(&format!(" · Internship {}", internship.internship_id));
            }
        }
        lines.push(Line::from(Span::styled(context, Style::default().fg(Color::Cyan))));
        lines.push(Line::from(""));
    }

    for (i, field) in state.fields().into_iter().enumerate() {
        let focused = i == state.focus;
        let value = state.wizard.display(field);
        let value = match field.kind() {
            FieldKind::Text if focused => format!("{}_", value),
            FieldKind::Text => value,
            FieldKind::Toggle | FieldKind::Choice | FieldKind::Number => format!("< {} >", value),
        };
        let required = if field.is_required() { "*" } else { "" };
        let marker = if focused { "> " } else { "  " };

        let label_style = if focused {
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{}{}: ", field.label(), required), label_style),
            Span::raw(value),
        ]));
    }

    Text::from(lines)
}

fn build_notice(notice: &Notice) -> Text<'static> {
    match notice {
        Notice::None => Text::raw(""),
        Notice::Errors(errors) => {
            let mut lines = vec![Line::from(Span::styled(
                "Please fix the following before continuing:",
                Style::default().fg(Color::Red),
            ))];
            for e in errors {
                lines.push(Line::from(format!("  • {}", e)));
            }
            Text::from(lines)
        }
        Notice::Saved(msg) => Text::from(Line::from(Span::styled(
            msg.clone(),
            Style::default().fg(Color::Green),
        ))),
        Notice::Failed(msg) => Text::from(Line::from(Span::styled(
            msg.clone(),
            Style::default().fg(Color::Red),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::tests::RecordingGateway;

    fn press(state: &mut AppState, gateway: &RecordingGateway, code: KeyCode) -> bool {
        state.handle_key(KeyEvent::new(code, KeyModifiers::NONE), gateway)
    }

    fn ctrl(state: &mut AppState, gateway: &RecordingGateway, c: char) -> bool {
        state.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL), gateway)
    }

    fn type_str(state: &mut AppState, gateway: &RecordingGateway, text: &str) {
        for c in text.chars() {
            press(state, gateway, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let gateway = RecordingGateway::default();
        let mut state = AppState::new();
        assert_eq!(state.focused(), Some(FieldId::Status));

        press(&mut state, &gateway, KeyCode::Right);
        assert_eq!(state.wizard.display(FieldId::Status), "Graduated (alumni)");

        press(&mut state, &gateway, KeyCode::Tab);
        type_str(&mut state, &gateway, "S1000");
        press(&mut state, &gateway, KeyCode::Backspace);
        assert_eq!(state.wizard.display(FieldId::StudentId), "S100");
    }

    #[test]
    fn test_next_with_missing_fields_lists_errors() {
        let gateway = RecordingGateway::default();
        let mut state = AppState::new();
        ctrl(&mut state, &gateway, 'n');

        match &state.notice {
            Notice::Errors(errors) => {
                assert_eq!(errors.len(), 5);
                assert_eq!(errors[0], "Student ID is required.");
            }
            other => panic!("expected errors, got {:?}", other),
        }
        assert_eq!(state.wizard.step(), Step::StudentInfo);
    }

    #[test]
    fn test_full_run_through_keys() {
        let gateway = RecordingGateway::default();
        let mut state = AppState::new();

        for value in ["S100", "Ada", "Lovelace", "MSBA", "MS Business Analytics"] {
            press(&mut state, &gateway, KeyCode::Down);
            type_str(&mut state, &gateway, value);
        }
        ctrl(&mut state, &gateway, 'n');
        assert_eq!(state.wizard.step(), Step::Internship);
        assert_eq!(state.focus, 0);

        // Answer No and move on.
        ctrl(&mut state, &gateway, 'n');
        assert_eq!(state.wizard.step(), Step::Job);

        ctrl(&mut state, &gateway, 's');
        assert!(matches!(state.notice, Notice::Saved(_)));
        assert_eq!(*gateway.calls.borrow(), vec!["program:MSBA", "student:S100"]);
        assert_eq!(state.wizard.step(), Step::StudentInfo);
    }

    #[test]
    fn test_toggle_clamps_focus() {
        let gateway = RecordingGateway::default();
        let mut state = AppState::new();
        state.wizard.student_form.student_id = "S100".to_string();
        state.wizard.student_form.first_name = "Ada".to_string();
        state.wizard.student_form.last_name = "Lovelace".to_string();
        state.wizard.student_form.program_id = "MSBA".to_string();
        state.wizard.student_form.program_name = "MS Business Analytics".to_string();
        ctrl(&mut state, &gateway, 'n');

        press(&mut state, &gateway, KeyCode::Char(' '));
        assert!(state.wizard.has_internship());
        for _ in 0..20 {
            press(&mut state, &gateway, KeyCode::Down);
        }
        assert_eq!(state.focused(), Some(FieldId::InternshipWebsite));

        state.focus = 0;
        press(&mut state, &gateway, KeyCode::Left);
        assert!(!state.wizard.has_internship());
        assert_eq!(state.fields().len(), 1);
    }

    #[test]
    fn test_escape_quits() {
        let gateway = RecordingGateway::default();
        let mut state = AppState::new();
        assert!(!press(&mut state, &gateway, KeyCode::Esc));
    }
}
