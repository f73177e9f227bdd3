use ratatui::{
    layout::{Alignment, Rect},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::app::App;
use crate::tui::theme::Theme;

pub fn draw_input(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let input_block = Block::default()
        .title(" Open window ")
        .borders(Borders::ALL)
        .border_style(theme.style_accent());

    let input = Paragraph::new(app.input_buffer.clone())
        .block(input_block)
        .style(theme.style_default());

    let area = super::centered_rect(80, 20, area);
    f.render_widget(Clear, area);
    f.render_widget(input, area);

    let cursor_x = area.x + app.input_buffer.chars().count() as u16 + 1;
    let cursor_y = area.y + 1;
    f.set_cursor_position((cursor_x, cursor_y));

    let hint = Paragraph::new("Tags to filter by, e.g. +Family @phone. Enter opens, Esc cancels")
        .style(theme.style_muted())
        .alignment(Alignment::Center);

    let hint_area = Rect {
        x: area.x,
        y: area.y + area.height + 1,
        width: area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}
