//! Inline month-grid date picker for the edit form's due-date field.

use chrono::{Datelike, Duration, NaiveDate};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Get the number of days in a month
fn days_in_month(year: i32, month: u32) -> u32 {
    // Move to next month, then back one day
    if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .and_then(|d| d.pred_opt())
    .map(|d| d.day())
    .unwrap_or(30)
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

/// Cursor position inside the open picker. Picking a date closes the
/// picker and writes the cursor into the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarState {
    pub cursor: NaiveDate,
}

impl CalendarState {
    /// Open on the draft's current date, falling back to today.
    pub fn open_at(date: Option<NaiveDate>, today: NaiveDate) -> Self {
        Self {
            cursor: date.unwrap_or(today),
        }
    }

    pub fn prev_day(&mut self) {
        self.cursor = self.cursor - Duration::days(1);
    }

    pub fn next_day(&mut self) {
        self.cursor = self.cursor + Duration::days(1);
    }

    pub fn prev_week(&mut self) {
        self.cursor = self.cursor - Duration::days(7);
    }

    pub fn next_week(&mut self) {
        self.cursor = self.cursor + Duration::days(7);
    }

    pub fn prev_month(&mut self) {
        let (year, month) = if self.cursor.month() == 1 {
            (self.cursor.year() - 1, 12)
        } else {
            (self.cursor.year(), self.cursor.month() - 1)
        };
        self.cursor = clamped_date(year, month, self.cursor.day());
    }

    pub fn next_month(&mut self) {
        let (year, month) = if self.cursor.month() == 12 {
            (self.cursor.year() + 1, 1)
        } else {
            (self.cursor.year(), self.cursor.month() + 1)
        };
        self.cursor = clamped_date(year, month, self.cursor.day());
    }
}

fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.min(days_in_month(year, month));
    // Always valid after clamping
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Render the picker month as styled lines for ratatui.
pub fn render_calendar(
    state: &CalendarState,
    selected: Option<NaiveDate>,
    today: NaiveDate,
) -> Vec<Line<'static>> {
    let year = state.cursor.year();
    let month = state.cursor.month();

    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        format!("{} {}", month_name(month), year),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));

    // Weekday header
    let header_style = Style::default().fg(Color::DarkGray);
    lines.push(Line::from(vec![
        Span::styled("Su ", header_style),
        Span::styled("Mo ", header_style),
        Span::styled("Tu ", header_style),
        Span::styled("We ", header_style),
        Span::styled("Th ", header_style),
        Span::styled("Fr ", header_style),
        Span::styled("Sa", header_style),
    ]));

    let first_day = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => return lines,
    };

    // 0 = Sunday, 1 = Monday, ... 6 = Saturday
    let start_weekday = first_day.weekday().num_days_from_sunday() as usize;
    let num_days = days_in_month(year, month);

    let mut current_day = 1u32;

    // Build up to 6 week rows
    for week in 0..6 {
        let mut spans = Vec::new();

        for weekday in 0..7 {
            let cell_idx = week * 7 + weekday;

            if cell_idx < start_weekday || current_day > num_days {
                // Empty cell
                spans.push(Span::raw(if weekday == 6 { "  " } else { "   " }));
            } else {
                let date = clamped_date(year, month, current_day);
                let is_cursor = date == state.cursor;
                let is_selected = selected == Some(date);
                let is_today = date == today;

                let style = if is_cursor {
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else if is_selected {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else if is_today {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };

                // Format day number (2 chars + space, except last column)
                let text = if weekday == 6 {
                    format!("{:2}", current_day)
                } else {
                    format!("{:2} ", current_day)
                };
                spans.push(Span::styled(text, style));

                current_day += 1;
            }
        }

        lines.push(Line::from(spans));

        if current_day > num_days {
            break;
        }
    }

    lines
}
