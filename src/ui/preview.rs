use crate::app::App;
use crate::table::{format_date, format_text};
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

/// Details of the highlighted work item, description rendered from HTML
pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let block = crate::ui::styled_block("Preview", false, &app.config.theme);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let theme = &app.config.theme;
    let Some(item) = app.table.cursor_item() else {
        let empty = Paragraph::new("Select a work item")
            .style(Style::default().fg(theme.parse_color(&theme.text_muted)));
        f.render_widget(empty, inner);
        return;
    };

    let selected = app.table.is_selected(&item.id);
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(
            format!(" #{} ", item.id),
            Style::default()
                .fg(Color::Rgb(180, 210, 255))
                .bg(Color::Rgb(30, 45, 70))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format_text(item.title.as_deref()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Created ", Style::default().fg(theme.parse_color(&theme.text_muted))),
        Span::raw(format_date(item)),
        Span::raw("   "),
        if selected {
            Span::styled("● selected for import", Style::default().fg(theme.parse_color(&theme.success)))
        } else {
            Span::styled("○ not selected", Style::default().fg(theme.parse_color(&theme.text_muted)))
        },
    ]));
    lines.push(Line::from(""));

    match item.description.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(desc) => {
            let plain = html2text::from_read(desc.as_bytes(), inner.width.max(20) as usize);
            // Split by newline to preserve empty lines (lines() skips them)
            for line in plain.split('\n') {
                lines.push(Line::from(Span::styled(
                    line.to_string(),
                    Style::default().fg(Color::Rgb(180, 180, 180)),
                )));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "No description",
            Style::default().fg(theme.parse_color(&theme.text_muted)),
        ))),
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(paragraph, inner);
}
