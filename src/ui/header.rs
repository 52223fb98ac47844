use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45), // Title + user
            Constraint::Percentage(30), // Selection count
            Constraint::Percentage(25), // Import button
        ])
        .split(area);

    draw_title(f, app, chunks[0]);
    draw_selection(f, app, chunks[1]);
    draw_import_button(f, app, chunks[2]);
}

fn draw_title(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Azure DevOps ");
    let user = if app.session.user_id.is_empty() {
        "No user".to_string()
    } else {
        format!("{} @ {}", app.session.user_id, app.session.org_id)
    };
    let text = Paragraph::new(user)
        .block(block)
        .style(Style::default().fg(app.config.theme.parse_color(&app.config.theme.text)));
    f.render_widget(text, area);
}

fn draw_selection(f: &mut Frame, app: &App, area: Rect) {
    let selected = app.table.selection.len();
    let total = app.table.items.len();
    let block = Block::default().borders(Borders::ALL).title(" Selected ");
    let text = Paragraph::new(format!("{selected} of {total}")).block(block);
    f.render_widget(text, area);
}

fn draw_import_button(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.config.theme;
    let (label, style) = if app.table.can_import() {
        (
            format!("⇪ Import [{}]", app.config.keybindings.import),
            Style::default()
                .fg(Color::Black)
                .bg(theme.parse_color(&theme.highlight))
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            "⇪ Import".to_string(),
            Style::default().fg(theme.parse_color(&theme.text_muted)),
        )
    };

    let block = Block::default().borders(Borders::ALL);
    let button = Paragraph::new(label)
        .block(block)
        .style(style)
        .alignment(Alignment::Center);
    f.render_widget(button, area);
}
