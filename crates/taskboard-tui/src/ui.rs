use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};
use taskboard_shared::{Priority, Todo};

use crate::api::{Api, SessionStore};
use crate::app::{App, LoginField, Notice, NoticeLevel, View, VimMode};
use crate::calendar::render_calendar;
use crate::edit::{EditDraft, EditField};
use crate::settings::SettingsField;

/// Returns (symbol, color) for a todo's priority indicator
fn priority_indicator(priority: Option<Priority>) -> (&'static str, Color) {
    match priority {
        Some(Priority::High) => ("●", Color::Red),
        Some(Priority::Moderate) => ("●", Color::Yellow),
        Some(Priority::Low) => ("●", Color::Green),
        None => ("○", Color::DarkGray),
    }
}

pub fn draw<A: Api, S: SessionStore>(f: &mut Frame, app: &App<A, S>) {
    match app.view {
        View::Login => draw_login(f, app),
        View::TaskList => draw_task_list(f, app),
        View::Settings => draw_settings(f, app),
    }

    // The edit modal overlays whatever view is underneath
    if let Some(ref draft) = app.edit {
        draw_edit_modal(f, app, draft);
    }

    if let Some(ref notice) = app.notice {
        draw_notice_popup(f, notice);
    }

    if app.loading {
        draw_loading_overlay(f, &app.loading_message);
    }
}

fn field_block(title: impl Into<String>, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    Block::default()
        .title(format!(" {} ", title.into()))
        .borders(Borders::ALL)
        .border_style(style)
}

// ============ Login ============

fn draw_login<A: Api, S: SessionStore>(f: &mut Frame, app: &App<A, S>) {
    let area = f.area();

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(12),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(vertical[1]);

    let form_area = horizontal[1];

    let form_block = Block::default()
        .title(" Login ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = form_block.inner(form_area);
    f.render_widget(form_block, form_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Email
            Constraint::Length(3), // Password
            Constraint::Length(2), // Hint
            Constraint::Min(0),
        ])
        .split(inner);

    let email = Paragraph::new(app.login_email.as_str())
        .block(field_block("Email", app.login_field == LoginField::Email));
    f.render_widget(email, chunks[0]);

    let masked = "*".repeat(app.login_password.len());
    let password = Paragraph::new(masked).block(field_block(
        "Password",
        app.login_field == LoginField::Password,
    ));
    f.render_widget(password, chunks[1]);

    let hint = Paragraph::new("i: edit | Tab: switch field | Enter: login | q: quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[2]);
}

// ============ Task list ============

fn draw_task_list<A: Api, S: SessionStore>(f: &mut Frame, app: &App<A, S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // List
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);

    if app.todos.is_empty() {
        let empty = Paragraph::new("No tasks yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Tasks "));
        f.render_widget(empty, chunks[1]);
    } else {
        let items: Vec<ListItem> = app
            .todos
            .iter()
            .enumerate()
            .map(|(i, todo)| todo_line(todo, i == app.selected_todo))
            .collect();
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(format!(
            " Tasks ({}) ",
            app.todos.len()
        )));
        f.render_widget(list, chunks[1]);
    }

    draw_status_bar(f, chunks[2], app);
}

fn todo_line(todo: &Todo, selected: bool) -> ListItem<'_> {
    let bg_style = if selected {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };

    let (symbol, color) = priority_indicator(todo.priority);
    let done = todo.tasks.iter().filter(|t| t.completed).count();

    let mut spans = vec![
        Span::styled(" ", bg_style),
        Span::styled(symbol, bg_style.fg(color)),
        Span::styled(" ", bg_style),
        Span::styled(todo.title.clone(), bg_style.fg(Color::White)),
        Span::styled(
            format!("  {}/{}", done, todo.tasks.len()),
            bg_style.fg(Color::DarkGray),
        ),
    ];
    if let Some(date) = todo.date {
        spans.push(Span::styled(
            format!("  due {}", date.format("%b %d")),
            bg_style.fg(Color::DarkGray),
        ));
    }
    if !todo.label.is_empty() {
        spans.push(Span::styled(
            format!("  [{}]", todo.label),
            bg_style.fg(Color::Magenta),
        ));
    }
    if !todo.assigned_to.is_empty() {
        spans.push(Span::styled(
            format!("  @{}", todo.assigned_to),
            bg_style.fg(Color::Cyan),
        ));
    }

    ListItem::new(Line::from(spans))
}

fn draw_header<A: Api, S: SessionStore>(f: &mut Frame, area: Rect, app: &App<A, S>) {
    let user = app
        .session
        .current()
        .map(|c| c.name.as_str())
        .unwrap_or("not signed in");

    let header = Paragraph::new(vec![Line::from(vec![
        Span::styled(
            "TASKBOARD",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(user, Style::default().fg(Color::Yellow)),
    ])])
    .block(Block::default().borders(Borders::BOTTOM));

    f.render_widget(header, area);
}

fn draw_status_bar<A: Api, S: SessionStore>(f: &mut Frame, area: Rect, app: &App<A, S>) {
    let (mode, mode_color) = if app.edit.is_some() {
        ("EDIT", Color::Green)
    } else {
        match app.vim_mode {
            VimMode::Normal => ("NORMAL", Color::Blue),
            VimMode::Insert => ("INSERT", Color::Green),
        }
    };

    let hints = if app.edit.is_some() {
        "Tab: next field | s: save | Esc: cancel"
    } else {
        "Enter: edit | r: refresh | s: settings | q: quit"
    };

    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", mode),
            Style::default().bg(mode_color).fg(Color::White),
        ),
        Span::raw(" "),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]));

    f.render_widget(status, area);
}

// ============ Edit modal ============

fn draw_edit_modal<A: Api, S: SessionStore>(f: &mut Frame, app: &App<A, S>, draft: &EditDraft) {
    let area = centered_rect(70, 85, f.area());

    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Edit Task ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Priority
            Constraint::Length(3), // Assignee
            Constraint::Min(5),    // Checklist
            Constraint::Length(3), // Label
            Constraint::Length(3), // Due date
            Constraint::Length(1), // Hint
        ])
        .split(inner);

    let title = Paragraph::new(draft.title.as_str())
        .block(field_block("Title", draft.field == EditField::Title));
    f.render_widget(title, chunks[0]);

    draw_priority_row(f, chunks[1], draft);
    draw_assignee(f, chunks[2], app, draft);
    draw_checklist(f, chunks[3], draft);

    let label = Paragraph::new(draft.label.as_str())
        .block(field_block("Label", draft.field == EditField::Label));
    f.render_widget(label, chunks[4]);

    let date_text = match draft.date {
        Some(date) => date.format("%b %d, %Y").to_string(),
        None => "Select Due Date".to_string(),
    };
    let due = Paragraph::new(date_text)
        .block(field_block("Due Date", draft.field == EditField::DueDate));
    f.render_widget(due, chunks[5]);

    let hint = Paragraph::new(edit_hint(draft))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[6]);

    if draft.calendar.is_some() {
        draw_calendar_popup(f, draft);
    }
}

fn edit_hint(draft: &EditDraft) -> &'static str {
    match draft.field {
        EditField::Priority => "h/l: choose priority | Tab: next field | s: save",
        EditField::Assignee => "j/k: choose | Enter: assign | x: unassign | Tab: next field",
        EditField::Checklist => "a: add | d: delete | Space: toggle | i: edit | j/k: move",
        EditField::DueDate => "Enter: open calendar | Tab: next field | s: save",
        _ => "i: edit | Tab: next field | s: save | Esc: cancel",
    }
}

fn draw_priority_row(f: &mut Frame, area: Rect, draft: &EditDraft) {
    let mut spans = Vec::new();
    for (i, p) in Priority::ALL.iter().enumerate() {
        let chosen = draft.priority == Some(*p);
        let (_, color) = priority_indicator(Some(*p));
        let style = if chosen {
            Style::default().fg(color).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(color)
        };
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(format!(" {} ", p.label()), style));
    }

    let row = Paragraph::new(Line::from(spans)).block(field_block(
        "Priority",
        draft.field == EditField::Priority,
    ));
    f.render_widget(row, area);
}

fn draw_assignee<A: Api, S: SessionStore>(
    f: &mut Frame,
    area: Rect,
    app: &App<A, S>,
    draft: &EditDraft,
) {
    let text = if draft.assigned_to.is_empty() {
        Span::styled("Add an assignee", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(draft.assigned_to.clone(), Style::default().fg(Color::Cyan))
    };

    let assignee = Paragraph::new(Line::from(text)).block(field_block(
        "Assign To",
        draft.field == EditField::Assignee,
    ));
    f.render_widget(assignee, area);

    // Dropdown of directory entries while the field is focused
    if draft.field == EditField::Assignee && !app.users.is_empty() {
        let height = (app.users.len() as u16 + 2).min(8);
        let dropdown = Rect {
            x: area.x + 2,
            y: area.y + area.height,
            width: area.width.saturating_sub(4),
            height,
        }
        .intersection(f.area());
        f.render_widget(Clear, dropdown);

        let items: Vec<ListItem> = app
            .users
            .iter()
            .enumerate()
            .map(|(i, user)| {
                let style = if i == draft.assignee_cursor {
                    Style::default().bg(Color::DarkGray).fg(Color::White)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Span::styled(user.email.clone(), style))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        f.render_widget(list, dropdown);
    }
}

fn draw_checklist(f: &mut Frame, area: Rect, draft: &EditDraft) {
    let (done, total) = draft.progress();
    let focused = draft.field == EditField::Checklist;

    let items: Vec<ListItem> = draft
        .tasks
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if item.completed { "[x] " } else { "[ ] " };
            let style = if focused && i == draft.item_cursor {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else if item.completed {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(Color::White)
            };
            let title = if item.title.is_empty() {
                Span::styled("(empty)", style.fg(Color::DarkGray))
            } else {
                Span::styled(item.title.clone(), style)
            };
            ListItem::new(Line::from(vec![Span::styled(marker, style), title]))
        })
        .collect();

    let list = List::new(items).block(field_block(
        format!("Checklist ({}/{})", done, total),
        focused,
    ));
    f.render_widget(list, area);
}

fn draw_calendar_popup(f: &mut Frame, draft: &EditDraft) {
    let Some(cal) = draft.calendar else {
        return;
    };

    let area = centered_rect(30, 40, f.area());
    f.render_widget(Clear, area);

    let today = chrono::Local::now().date_naive();
    let mut lines = render_calendar(&cal, draft.date, today);
    lines.push(Line::from(Span::styled(
        "Enter: pick | n/p: month | Esc: close",
        Style::default().fg(Color::DarkGray),
    )));

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(" Due Date ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(widget, area);
}

// ============ Settings ============

fn draw_settings<A: Api, S: SessionStore>(f: &mut Frame, app: &App<A, S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);

    let Some(ref draft) = app.settings else {
        return;
    };

    let form_area = centered_rect(50, 70, chunks[1]);
    let block = Block::default()
        .title(" Settings ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(form_area);
    f.render_widget(block, form_area);

    let fields = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Name
            Constraint::Length(3), // Email
            Constraint::Length(3), // Old password
            Constraint::Length(3), // New password
            Constraint::Length(2), // Hint
            Constraint::Min(0),
        ])
        .split(inner);

    let name = Paragraph::new(draft.name.as_str())
        .block(field_block("Name", draft.field == SettingsField::Name));
    f.render_widget(name, fields[0]);

    let email = Paragraph::new(draft.email.as_str())
        .block(field_block("Email", draft.field == SettingsField::Email));
    f.render_widget(email, fields[1]);

    let old_pw = Paragraph::new("*".repeat(draft.old_password.len())).block(field_block(
        "Old Password",
        draft.field == SettingsField::OldPassword,
    ));
    f.render_widget(old_pw, fields[2]);

    let new_pw = Paragraph::new("*".repeat(draft.new_password.len())).block(field_block(
        "New Password",
        draft.field == SettingsField::NewPassword,
    ));
    f.render_widget(new_pw, fields[3]);

    let hint = Paragraph::new("i: edit | Tab: next field | Enter: update | Esc: back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hint, fields[4]);

    draw_status_bar(f, chunks[2], app);
}

// ============ Overlays ============

fn draw_notice_popup(f: &mut Frame, notice: &Notice) {
    let (title, color) = match notice.level {
        NoticeLevel::Success => (" Success ", Color::Green),
        NoticeLevel::Error => (" Error ", Color::Red),
    };

    let area = centered_rect(60, 20, f.area());

    f.render_widget(Clear, area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let text = Paragraph::new(notice.text.as_str())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .block(block);

    f.render_widget(text, area);
}

fn draw_loading_overlay(f: &mut Frame, message: &str) {
    let area = centered_rect(40, 10, f.area());

    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Loading ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let text = Paragraph::new(message)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(block);

    f.render_widget(text, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
