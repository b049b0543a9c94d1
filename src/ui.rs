// UI module - Rendering logic for the TUI

use crate::app::{App, InputMode, Tab};
use crate::models::{Priority, Task};
use crate::store::Filter;
use chrono::{Datelike, Local, NaiveDate};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs,
        calendar::{CalendarEventStore, Monthly},
    },
};
use time::{Date, Month};
use tui_big_text::{BigText, PixelSize};

pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.area();

    // Split the screen into tabs, main area, and footer
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Main content area
            Constraint::Length(1), // Footer
        ])
        .split(size);

    render_tabs(frame, app, main_layout[0]);

    match app.selected_tab {
        Tab::Tasks => render_tasks_tab(frame, app, main_layout[1]),
        Tab::Stats => render_stats_tab(frame, app, main_layout[1]),
    }

    render_footer(frame, main_layout[2]);

    if app.show_new_task_panel {
        render_new_task_panel(frame, app);
    }

    if app.show_delete_panel {
        render_delete_panel(frame, app);
    }
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles = vec!["Tasks", "Stats"];
    let selected_index = match app.selected_tab {
        Tab::Tasks => 0,
        Tab::Stats => 1,
    };

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(selected_index)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    frame.render_widget(tabs, area);
}

fn render_tasks_tab(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Counts
            Constraint::Length(3), // Filter bar
            Constraint::Min(0),    // Task list
        ])
        .split(area);

    render_counts_row(frame, app, rows[0]);
    render_filter_bar(frame, app, rows[1]);
    render_task_list(frame, app, rows[2]);
}

fn render_counts_row(frame: &mut Frame, app: &App, area: Rect) {
    let counts = app.store.counts();

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(area);

    let cell_titles = ["Total", "Pending", "Completed"];
    let cell_values = [counts.total, counts.pending, counts.completed];
    let cell_colors = [Color::White, Color::Yellow, Color::Green];

    for (i, cell_area) in cells.iter().enumerate() {
        let block = Block::default().title(cell_titles[i]).borders(Borders::ALL);
        let inner = block.inner(*cell_area);
        frame.render_widget(block, *cell_area);

        let value = Paragraph::new(cell_values[i].to_string())
            .style(Style::default().fg(cell_colors[i]).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(value, inner);
    }
}

fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let filters = [Filter::All, Filter::Pending, Filter::Completed];
    let titles: Vec<&str> = filters.iter().map(|f| f.label()).collect();
    let selected_index = filters
        .iter()
        .position(|f| *f == app.store.filter())
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(Block::default().title("Filter").borders(Borders::ALL))
        .select(selected_index)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    frame.render_widget(tabs, area);
}

fn render_task_list(frame: &mut Frame, app: &App, area: Rect) {
    let today = Local::now().date_naive();
    let visible = app.store.visible_tasks();

    let block = Block::default().title("Tasks").borders(Borders::ALL);

    if visible.is_empty() {
        let empty = Paragraph::new("No tasks to show")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|task| ListItem::new(task_line(task, today)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");

    let mut list_state = ListState::default();
    list_state.select(app.selected_index);

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn task_line(task: &Task, today: NaiveDate) -> Line<'static> {
    let marker = if task.completed { "[x] " } else { "[ ] " };

    let text_style = if task.completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else if task.is_overdue(today) {
        Style::default().fg(Color::Red)
    } else if task.is_due_today(today) {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::raw(marker),
        Span::styled(task.text.clone(), text_style),
    ];

    if let Some(due) = &task.due_date {
        spans.push(Span::styled(
            format!("  due {due}"),
            Style::default().fg(Color::Gray),
        ));
    }

    spans.push(Span::styled(
        format!("  [{}]", task.priority.label()),
        priority_style(task.priority),
    ));

    Line::from(spans)
}

fn priority_style(priority: Priority) -> Style {
    match priority {
        Priority::High => Style::default().fg(Color::Red),
        Priority::Medium => Style::default().fg(Color::Yellow),
        Priority::Low => Style::default().fg(Color::DarkGray),
    }
}

fn render_stats_tab(frame: &mut Frame, app: &App, area: Rect) {
    let counts = app.store.counts();

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(area);

    let panel_titles = ["Total", "Pending", "Completed"];
    let panel_counts = [counts.total, counts.pending, counts.completed];
    let panel_colors = [Color::Cyan, Color::Yellow, Color::Green];

    for (i, panel_area) in panels.iter().enumerate() {
        let block = Block::default()
            .title(panel_titles[i])
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(*panel_area);
        frame.render_widget(block, *panel_area);

        let big_text = BigText::builder()
            .pixel_size(PixelSize::Full)
            .style(Style::default().fg(panel_colors[i]).add_modifier(Modifier::BOLD))
            .lines(vec![panel_counts[i].to_string().into()])
            .centered()
            .build();

        // Vertically center the big text
        let vertical_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(50),
                Constraint::Percentage(25),
            ])
            .split(inner);

        frame.render_widget(big_text, vertical_layout[1]);
    }
}

fn render_new_task_panel(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect(60, 60, frame.area());

    frame.render_widget(Clear, popup_area);

    let popup_block = Block::default()
        .title("New Task")
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Black));

    let inner_area = popup_block.inner(popup_area);
    frame.render_widget(popup_block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Task text field
            Constraint::Length(2), // Due date field
            Constraint::Length(2), // Priority field
            Constraint::Min(8),    // Calendar preview
            Constraint::Length(2), // Instructions
        ])
        .split(inner_area);

    let text_style = if app.input_mode == InputMode::EditingText {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let text_para =
        Paragraph::new(format!("Task: {}", app.store.draft_text)).style(text_style);
    frame.render_widget(text_para, chunks[0]);

    let date_style = if app.input_mode == InputMode::EditingDate {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let date_para = Paragraph::new(format!(
        "Due Date (YYYY-MM-DD): {}",
        app.store.draft_due_date
    ))
    .style(date_style);
    frame.render_widget(date_para, chunks[1]);

    let priority_line = if app.input_mode == InputMode::EditingPriority {
        Line::from(vec![
            Span::styled("Priority: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("< {} >", app.store.draft_priority.label()),
                priority_style(app.store.draft_priority).add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        Line::from(vec![
            Span::raw("Priority: "),
            Span::styled(
                app.store.draft_priority.label(),
                priority_style(app.store.draft_priority),
            ),
        ])
    };
    frame.render_widget(Paragraph::new(priority_line), chunks[2]);

    render_draft_calendar(frame, app, chunks[3]);

    let instructions =
        Paragraph::new("Tab: Next field | Enter: Save | Esc: Cancel")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
    frame.render_widget(instructions, chunks[4]);

    // Set cursor position based on which field is being edited
    match app.input_mode {
        InputMode::EditingText => {
            let cursor_x = chunks[0].x + 6 + app.store.draft_text.len() as u16; // "Task: " is 6 chars
            let cursor_y = chunks[0].y;
            if cursor_x < chunks[0].x + chunks[0].width {
                frame.set_cursor_position((cursor_x, cursor_y));
            }
        }
        InputMode::EditingDate => {
            let cursor_x = chunks[1].x + 23 + app.store.draft_due_date.len() as u16; // label is 23 chars
            let cursor_y = chunks[1].y;
            if cursor_x < chunks[1].x + chunks[1].width {
                frame.set_cursor_position((cursor_x, cursor_y));
            }
        }
        _ => {}
    }
}

/// One-month calendar inside the new-task popup: today is highlighted in
/// cyan, the drafted due date (once it parses) in yellow, and the shown
/// month follows the drafted date.
fn render_draft_calendar(frame: &mut Frame, app: &App, area: Rect) {
    let today = Local::now().date_naive();
    let draft_date =
        NaiveDate::parse_from_str(app.store.draft_due_date.trim(), "%Y-%m-%d").ok();
    let display_month = draft_date.unwrap_or(today);

    let mut events = CalendarEventStore::default();
    events.add(
        chrono_to_time_date(today),
        Style::default()
            .bg(Color::Cyan)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    );
    if let Some(date) = draft_date {
        events.add(
            chrono_to_time_date(date),
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );
    }

    let calendar = Monthly::new(chrono_to_time_date(display_month), events)
        .show_month_header(Style::default().add_modifier(Modifier::BOLD))
        .show_weekdays_header(Style::default())
        .show_surrounding(Style::default().fg(Color::DarkGray));

    // The Monthly widget is a fixed ~3x7 grid; center it in the popup
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(24),
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(calendar, columns[1]);
}

fn chrono_to_time_date(date: NaiveDate) -> Date {
    let year = date.year();
    let month = Month::try_from(date.month() as u8).unwrap();
    let day = date.day() as u8;
    Date::from_calendar_date(year, month, day).unwrap()
}

fn render_delete_panel(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect(40, 25, frame.area());

    frame.render_widget(Clear, popup_area);

    let popup_block = Block::default()
        .title("Delete Task")
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Black));

    let inner_area = popup_block.inner(popup_area);
    frame.render_widget(popup_block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(2),    // Message
            Constraint::Length(1), // Buttons
        ])
        .split(inner_area);

    let task_text = app
        .deleting_task_id
        .and_then(|id| app.store.tasks().iter().find(|t| t.id == id))
        .map(|t| t.text.clone())
        .unwrap_or_default();

    let message = Paragraph::new(format!("Delete \"{task_text}\"?"))
        .wrap(ratatui::widgets::Wrap { trim: false })
        .alignment(Alignment::Center);
    frame.render_widget(message, chunks[0]);

    let yes_style = if app.delete_panel_yes_selected {
        Style::default()
            .bg(Color::Red)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let no_style = if app.delete_panel_yes_selected {
        Style::default().fg(Color::Gray)
    } else {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    };

    let buttons = Line::from(vec![
        Span::styled("  Yes  ", yes_style),
        Span::raw("   "),
        Span::styled("  No  ", no_style),
    ]);
    let buttons_para = Paragraph::new(buttons).alignment(Alignment::Center);
    frame.render_widget(buttons_para, chunks[1]);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(
        "q: Quit | +: New | Enter/Space: Toggle | -: Delete | c: Clear completed | 1/2/3 or Left/Right: Filter | Shift+Left/Right: Tabs",
    )
    .style(Style::default().fg(Color::Gray));
    frame.render_widget(footer, area);
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
