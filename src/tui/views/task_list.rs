use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::todotxt::{Task, TodoFile, CONTEXT_TAG, KEYWORD_SEP, PROJECT_TAG};
use crate::tui::app::{App, StatusLevel};
use crate::tui::theme::Theme;

pub fn draw_task_list(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let task_area = chunks[0];
    let status_area = chunks[1];

    let visible = app.visible_tasks();
    let mut items: Vec<ListItem> = visible
        .iter()
        .map(|(index, task)| ListItem::new(format_task_line(*index, task, theme)))
        .collect();

    if items.is_empty() {
        items.push(ListItem::new(empty_message(&app.file)).style(theme.style_muted()));
    }

    let title = match app.window() {
        Some(window) => format!(" {} ({}) ", window.title, visible.len()),
        None => " Tasks ".to_string(),
    };
    let depth = app.windows.len();
    let tasks_block = Block::default()
        .title(title)
        .title_bottom(format!(" window {} ", depth))
        .borders(Borders::ALL)
        .border_style(theme.style_muted());

    let list = List::new(items)
        .block(tasks_block)
        .highlight_style(theme.style_selected().add_modifier(Modifier::BOLD));

    let selected = app.window().map(|w| w.selected).filter(|_| !visible.is_empty());
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, task_area, &mut state);

    let status_text = if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme.style_default(),
            StatusLevel::Success => theme.style_success(),
            StatusLevel::Warning => theme.style_warning(),
            StatusLevel::Error => theme.style_error(),
        };
        Line::from(vec![Span::styled(msg.clone(), style)])
    } else {
        Line::from(vec![
            Span::styled("↑/↓", theme.style_accent()),
            Span::styled(" navigate  ", theme.style_muted()),
            Span::styled("x", theme.style_accent()),
            Span::styled(" complete  ", theme.style_muted()),
            Span::styled("/", theme.style_accent()),
            Span::styled(" filter  ", theme.style_muted()),
            Span::styled("q", theme.style_accent()),
            Span::styled(" close  ", theme.style_muted()),
            Span::styled("?", theme.style_accent()),
            Span::styled(" help", theme.style_muted()),
        ])
    };

    let status_bar = Paragraph::new(Text::from(vec![status_text])).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.style_muted()),
    );
    f.render_widget(status_bar, status_area);
}

/// `    3. (A) Call mom +Family`, with tags and keywords colored.
fn format_task_line(index: usize, task: &Task, theme: &Theme) -> Line<'static> {
    let number = Span::styled(format!("{:5}. ", index), theme.style_muted());

    if task.is_done() {
        return Line::from(vec![number, Span::styled(task.to_string(), theme.style_done())]);
    }

    let base = theme.style_priority(task.priority());
    let mut spans = vec![number];
    let text = task.to_string();
    for (i, word) in text.split(' ').enumerate() {
        if i > 0 {
            spans.push(Span::styled(" ", base));
        }
        let style = if task.has_tag(word) {
            match word.chars().next() {
                Some(PROJECT_TAG) => theme.style_highlight(),
                Some(CONTEXT_TAG) => theme.style_accent(),
                _ => base,
            }
        } else if word.contains(KEYWORD_SEP) {
            theme.style_muted()
        } else {
            base
        };
        spans.push(Span::styled(word.to_string(), style));
    }

    Line::from(spans)
}

pub fn draw_help(f: &mut Frame, theme: &Theme, area: Rect) {
    let keys = [
        ("j, ↓", "Move selection down"),
        ("k, ↑", "Move selection up"),
        ("g, G", "Jump to first / last task"),
        ("x, Enter", "Mark task done"),
        ("/", "Open a window filtered by tags"),
        ("s", "Toggle priority sort"),
        ("r", "Reload the file"),
        ("o", "Open task in $EDITOR"),
        ("?", "Toggle this help"),
        ("q, Esc", "Close window (quit on the last)"),
    ];

    let mut help_text = vec![
        Line::from(vec![Span::styled(
            "Keybindings",
            theme.style_accent().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];
    for (key, desc) in keys {
        help_text.push(Line::from(vec![
            Span::styled(format!("{:<10}", key), theme.style_accent()),
            Span::styled(desc, theme.style_default()),
        ]));
    }
    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![Span::styled(
        "Filters are +project and @context tags; a task must carry all of them.",
        theme.style_muted(),
    )]));

    let help_paragraph = Paragraph::new(Text::from(help_text)).block(
        Block::default()
            .title(" Help (any key to close) ")
            .borders(Borders::ALL)
            .border_style(theme.style_accent()),
    );

    let area = super::centered_rect(60, 70, area);
    f.render_widget(Clear, area);
    f.render_widget(help_paragraph, area);
}

fn empty_message(file: &TodoFile) -> &'static str {
    if file.is_empty() {
        "No tasks in this file."
    } else {
        "No matching tasks."
    }
}
