mod header;
mod help;
mod import_dialog;
mod input;
pub mod loading;
mod preview;
pub mod table;

use crate::app::{App, InputMode, NotificationLevel};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    // Main vertical layout: header (3) + content + status bar (1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title / selection / import button
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status/help bar
        ])
        .split(size);

    header::draw(f, app, chunks[0]);
    draw_content(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);

    // Overlays (modals, dropdowns, help)
    match app.input_mode {
        InputMode::Help => help::draw_popup(f, app, size),
        InputMode::PageSizeSelect => input::draw_page_size_dropdown(f, app, size),
        InputMode::ImportDialog => import_dialog::draw(f, app, size),
        InputMode::ProjectSelect => {
            import_dialog::draw(f, app, size);
            input::draw_project_dropdown(f, app, size);
        }
        InputMode::RequirementSelect => {
            import_dialog::draw(f, app, size);
            input::draw_requirement_dropdown(f, app, size);
        }
        InputMode::Normal => {}
    }
}

fn draw_content(f: &mut Frame, app: &mut App, area: Rect) {
    // Table on top, preview of the highlighted row below
    let content = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    if app.table.is_loading() {
        loading::draw(f, app, content[0]);
    } else {
        table::draw(f, app, content[0]);
    }
    preview::draw(f, app, content[1]);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.config.theme;

    if let Some(msg) = &app.status_message {
        let color = match app.status_level {
            NotificationLevel::Info => Color::DarkGray,
            NotificationLevel::Success => theme.parse_color(&theme.success),
            NotificationLevel::Warning => theme.parse_color(&theme.warning),
            NotificationLevel::Error => theme.parse_color(&theme.error),
        };
        f.render_widget(Paragraph::new(msg.as_str()).style(Style::default().fg(color)), area);
        return;
    }

    let hints = match app.input_mode {
        InputMode::Normal => {
            "j/k:nav  h/l:page  Space:select  a:all  s:sort  z:page size  i:import  r:reload  ?:help  q:quit"
        }
        InputMode::ImportDialog => "Tab:next field  Enter:choose/save  Esc:close",
        InputMode::ProjectSelect | InputMode::RequirementSelect => "type:filter  ↑/↓:select  Enter:confirm  Esc:back",
        InputMode::PageSizeSelect => "j/k:select  Enter:confirm  Esc:cancel",
        InputMode::Help => "?/Esc:close",
    };
    f.render_widget(Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)), area);
}

// Helper: create a centered rect
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

// Helper: centered rect sized as a percentage of the area
pub fn centered_rect_percent(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

// Helper: styled block with focus indicator
pub fn styled_block<'a>(title: &'a str, focused: bool, theme: &'a crate::config::Theme) -> Block<'a> {
    let border_color = if focused {
        theme.parse_color(&theme.border_active)
    } else {
        theme.parse_color(&theme.border)
    };

    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {title} "))
}

/// Flatten a rendered buffer into one string per row, for render tests
#[cfg(test)]
pub(crate) fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.y..area.y + area.height)
        .map(|y| {
            (area.x..area.x + area.width)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect::<String>()
        })
        .collect()
}
