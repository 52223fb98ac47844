use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::{Cell, Row, Table};

pub const SKELETON_ROWS: usize = 10;

/// Header column widths in percent
pub const HEADER_WIDTHS: [u16; 4] = [10, 30, 45, 15];
/// Body column widths in percent; the description column is a touch narrower
pub const BODY_WIDTHS: [u16; 4] = [10, 30, 44, 15];

const SHIMMER: &str = "░";

/// Placeholder table shown while the work item list is loading
pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let title = format!("Work Items {} Loading...", app.spinner_char());
    let block = crate::ui::styled_block(&title, false, &app.config.theme);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Body
        ])
        .split(inner);

    let muted = app.config.theme.parse_color(&app.config.theme.text_muted);
    let header_bg = app.config.theme.parse_color(&app.config.theme.header_bg);

    let header = Table::new(vec![skeleton_row().style(Style::default().bg(header_bg))], widths(HEADER_WIDTHS))
        .style(Style::default().fg(muted));
    f.render_widget(header, chunks[0]);

    let rows: Vec<Row> = (0..SKELETON_ROWS).map(|_| skeleton_row()).collect();
    let body = Table::new(rows, widths(BODY_WIDTHS)).style(Style::default().fg(muted));
    f.render_widget(body, chunks[1]);
}

fn widths(percent: [u16; 4]) -> [Constraint; 4] {
    percent.map(Constraint::Percentage)
}

fn skeleton_row() -> Row<'static> {
    // Cells clip to their column, so one long bar fills any width
    let bar = SHIMMER.repeat(256);
    Row::new((0..4).map(|_| Cell::from(bar.clone())))
}
