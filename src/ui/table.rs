use crate::app::App;
use crate::azure::WorkItem;
use crate::config::Theme;
use crate::table::{format_date, format_description, format_text, HeaderCheck, LoadState, SortField, SortOrder};
use ratatui::prelude::*;
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};

pub const EMPTY_MESSAGE: &str = "No Azure DevOps data to show.";

/// Checkbox, ID, Title, Description, Created Date
pub const COLUMN_COUNT: usize = 5;

fn column_widths() -> [Constraint; COLUMN_COUNT] {
    [
        Constraint::Length(4),
        Constraint::Fill(10),
        Constraint::Fill(30),
        Constraint::Fill(45),
        Constraint::Fill(15),
    ]
}

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let block = crate::ui::styled_block("Work Items", app.dialog.is_none(), &app.config.theme);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(1), // Pagination
        ])
        .split(inner);

    let theme = &app.config.theme;
    let header = header_row(app, theme);
    let table = &app.table;

    if table.items.is_empty() {
        // Header only; the message spans every column below it
        let empty = Table::new(Vec::<Row>::new(), column_widths()).header(header);
        f.render_widget(empty, chunks[0]);

        let body = Rect {
            y: chunks[0].y.saturating_add(1),
            height: chunks[0].height.saturating_sub(1),
            ..chunks[0]
        };
        let (message, color) = match &table.load_state {
            LoadState::Failed(err) => (
                format!("Failed to load work items: {err}  (press {} to retry)", app.config.keybindings.reload),
                theme.parse_color(&theme.error),
            ),
            _ => (EMPTY_MESSAGE.to_string(), theme.parse_color(&theme.text_muted)),
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, body);
    } else {
        let selected_bg = theme.parse_color(&theme.selected_bg);
        let rows: Vec<Row> = table
            .visible_rows()
            .iter()
            .map(|item| render_row(item, table.is_selected(&item.id), selected_bg))
            .collect();

        let widget = Table::new(rows, column_widths())
            .header(header)
            .row_highlight_style(Style::default().bg(Color::Rgb(35, 55, 85)))
            .highlight_symbol("▶ ");

        let mut state = TableState::default().with_selected(Some(table.cursor));
        f.render_stateful_widget(widget, chunks[0], &mut state);
    }

    draw_pagination(f, app, chunks[1]);
}

fn header_row(app: &App, theme: &Theme) -> Row<'static> {
    let checkbox = match app.table.header_check() {
        HeaderCheck::Unchecked => "[ ]",
        HeaderCheck::Indeterminate => "[-]",
        HeaderCheck::Checked => "[x]",
    };

    let sort_marker = match (app.table.sort_by, app.table.order) {
        (Some(SortField::CreatedDate), SortOrder::Asc) => " ▲",
        (Some(SortField::CreatedDate), SortOrder::Desc) => " ▼",
        (None, _) => "",
    };

    Row::new(vec![
        Cell::from(checkbox),
        Cell::from("ID"),
        Cell::from("Title"),
        Cell::from("Description"),
        Cell::from(format!("Created Date{sort_marker}")),
    ])
    .style(
        Style::default()
            .bg(theme.parse_color(&theme.header_bg))
            .add_modifier(Modifier::BOLD),
    )
}

fn render_row(item: &WorkItem, selected: bool, selected_bg: Color) -> Row<'static> {
    let checkbox = if selected { "[x]" } else { "[ ]" };
    let row = Row::new(vec![
        Cell::from(checkbox),
        Cell::from(item.id.to_string()),
        Cell::from(format_text(item.title.as_deref())),
        Cell::from(format_description(item.description.as_deref())),
        Cell::from(format_date(item)),
    ]);
    if selected {
        row.style(Style::default().bg(selected_bg))
    } else {
        row
    }
}

fn draw_pagination(f: &mut Frame, app: &App, area: Rect) {
    let table = &app.table;
    let (first, last) = table.visible_range();
    let keys = &app.config.keybindings;
    let text = format!(
        "Rows per page: {} [{}]   {}–{} of {}   page {}/{}   ◀ {}  {} ▶",
        table.page_size,
        keys.page_size,
        first,
        last,
        table.items.len(),
        table.page + 1,
        table.page_count(),
        keys.prev_page,
        keys.next_page,
    );
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right);
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{make_app, make_item, MockBackend};
    use crate::azure::WorkItemId;
    use crate::ui::buffer_lines;
    use ratatui::backend::TestBackend;

    fn render(app: &App, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                draw(f, app, area)
            })
            .unwrap();
        buffer_lines(terminal.backend().buffer())
    }

    #[test]
    fn test_empty_data_message_spans_all_columns() {
        let (mut app, _) = make_app(MockBackend::default());
        app.table.set_items(vec![]);

        let lines = render(&app, 100, 12);
        // Border, header, then the message row
        let row = &lines[2];
        assert!(row.contains(EMPTY_MESSAGE));

        // Centered over the full inner width, not confined to one column
        let byte_start = row.find(EMPTY_MESSAGE).unwrap();
        let start = row[..byte_start].chars().count();
        let inner_width = 98;
        let expected = 1 + (inner_width - EMPTY_MESSAGE.len()) / 2;
        assert!(start.abs_diff(expected) <= 1, "message starts at {start}");
        assert_eq!(COLUMN_COUNT, column_widths().len());
    }

    #[test]
    fn test_failed_load_shows_retry() {
        let (mut app, _) = make_app(MockBackend::default());
        app.table.set_failed("HTTP 503");

        let text = render(&app, 120, 12).join("\n");
        assert!(text.contains("Failed to load work items: HTTP 503"));
        assert!(text.contains("press r to retry"));
    }

    #[test]
    fn test_rows_show_checkbox_and_sort_marker() {
        let (mut app, _) = make_app(MockBackend::default());
        let mut long = make_item(2);
        long.description = Some("d".repeat(80));
        long.title = None;
        app.table.set_items(vec![make_item(1), long]);
        app.table.toggle_row(&WorkItemId::Number(2));
        app.table.toggle_sort(SortField::CreatedDate);

        let text = render(&app, 200, 12).join("\n");
        assert!(text.contains("[-]"), "header shows partial selection");
        assert!(text.contains("[x]"));
        assert!(text.contains("Created Date ▲"));
        assert!(text.contains(&format!("{}...", "d".repeat(60))));
        assert!(!text.contains(&"d".repeat(61)));
        assert!(text.contains("--/--"));
        assert!(text.contains("1–2 of 2"));
    }
}
