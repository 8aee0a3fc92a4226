use crate::planner::{FormField, Mode, Planner, TaskForm};
use crate::task::day_name;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;

const HELP: &str = "a add  e edit  d delete  space toggle  c clear completed  q quit";

/// Asks for the username that partitions the task files. `None` on Esc.
pub fn prompt_identity<B: Backend>(terminal: &mut Terminal<B>) -> io::Result<Option<String>> {
    let mut input = String::new();
    let mut hint: Option<&str> = None;
    loop {
        terminal.draw(|f| {
            let area = centered(f.area(), 50, 5);
            let lines = vec![
                Line::from(vec![
                    Span::raw("Username: "),
                    Span::styled(input.as_str(), Style::default().fg(Color::White)),
                ]),
                Line::from(Span::styled(
                    hint.unwrap_or("Enter to continue, Esc to quit"),
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            let prompt = Paragraph::new(lines).block(
                Block::default()
                    .title("Daily Task Planner")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
            f.render_widget(prompt, area);
        })?;

        let Some(key) = read_key()? else { continue };
        match key.code {
            KeyCode::Esc => return Ok(None),
            KeyCode::Enter => {
                let name = input.trim();
                if name.is_empty() {
                    hint = Some("Please enter a username!");
                } else {
                    return Ok(Some(name.to_string()));
                }
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, planner: &mut Planner) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, planner))?;

        let Some(key) = read_key()? else { continue };
        match &mut planner.mode {
            Mode::Browse => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('a') => planner.start_add(),
                KeyCode::Char('e') => planner.start_edit(),
                KeyCode::Char('d') => planner.delete_selected(),
                KeyCode::Char(' ') => planner.toggle_selected(),
                KeyCode::Char('c') => planner.purge_completed(),
                KeyCode::Up => planner.select_previous(),
                KeyCode::Down => planner.select_next(),
                _ => {}
            },
            Mode::Form(form) => match key.code {
                KeyCode::Esc => {
                    planner.cancel_form();
                    planner.status = None;
                }
                KeyCode::Enter => planner.submit_form(),
                KeyCode::Tab | KeyCode::BackTab => form.switch_focus(),
                KeyCode::Backspace => {
                    form.focused_mut().pop();
                }
                KeyCode::Char(c) => form.focused_mut().push(c),
                _ => {}
            },
        }
    }
}

fn read_key() -> io::Result<Option<KeyEvent>> {
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}

fn draw(f: &mut Frame, planner: &Planner) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let block = Block::default()
        .title(format!("Your Tasks ({})", planner.identity()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if planner.tasks.is_empty() {
        let empty = Paragraph::new("No tasks added yet. Press 'a' to add a new task!")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, chunks[0]);
    } else {
        let items: Vec<ListItem> = planner
            .tasks
            .iter()
            .map(|t| {
                let check = if t.completed { "[x] " } else { "[ ] " };
                let text_style = if t.completed {
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(Line::from(vec![
                    Span::raw(check),
                    Span::styled(t.description.as_str(), text_style),
                    Span::raw(format!(
                        " (Deadline: {} - {})",
                        t.deadline,
                        day_name(t.day_of_week)
                    )),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));
        let mut state = ListState::default().with_selected(Some(planner.selected));
        f.render_stateful_widget(list, chunks[0], &mut state);
    }

    let status = match &planner.status {
        Some(message) => Span::styled(message.as_str(), Style::default().fg(Color::Red)),
        None if planner.all_completed() => Span::styled(
            "Great job! All tasks are completed!",
            Style::default().fg(Color::Green),
        ),
        None => Span::raw(""),
    };
    f.render_widget(Paragraph::new(Line::from(status)), chunks[1]);
    f.render_widget(
        Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );

    if let Mode::Form(form) = &planner.mode {
        draw_form(f, form);
    }
}

fn draw_form(f: &mut Frame, form: &TaskForm) {
    let area = centered(f.area(), 60, 6);
    let field = |label: &'static str, value: &str, which: FormField| {
        let style = if form.focus == which {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(label, style),
            Span::raw(value.to_string()),
        ])
    };

    let title = if form.editing.is_some() {
        "Edit Task"
    } else {
        "Add a New Task"
    };
    let lines = vec![
        field("Task Description: ", &form.description, FormField::Description),
        field("Deadline (YYYY-MM-DD): ", &form.deadline, FormField::Deadline),
        Line::from(Span::styled(
            "Enter save  Tab switch  Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL)),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
