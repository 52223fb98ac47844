use crate::app::App;
use crate::import::DialogField;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub const PROJECT_PLACEHOLDER: &str = "Select project...";
pub const REQUIREMENT_PLACEHOLDER: &str = "Select requirement...";

/// Render the import dialog as a centered popup
pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let Some(dialog) = &app.dialog else {
        return;
    };
    let theme = &app.config.theme;

    let popup = super::centered_rect_percent(50, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Azure DevOps Import ")
        .title_bottom(Line::from(" [Esc] Close ").right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    // Layout: summary, project, requirement, save button
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Summary
            Constraint::Length(3), // Project
            Constraint::Length(3), // Requirement
            Constraint::Min(0),    // Spacer
            Constraint::Length(3), // Save
        ])
        .split(inner);

    let summary = Paragraph::new(format!("{} work items selected", dialog.selected_ids.len()))
        .style(Style::default().fg(theme.parse_color(&theme.text_muted)));
    f.render_widget(summary, chunks[0]);

    draw_field(
        f,
        chunks[1],
        "Project",
        dialog.project.as_deref(),
        PROJECT_PLACEHOLDER,
        dialog.focus == DialogField::Project,
        true,
    );
    draw_field(
        f,
        chunks[2],
        "Requirement",
        dialog.requirement.as_deref(),
        REQUIREMENT_PLACEHOLDER,
        dialog.focus == DialogField::Requirement,
        dialog.requirement_enabled(),
    );

    let focused = dialog.focus == DialogField::Save;
    let (label, style) = if dialog.saving {
        (
            format!("{} Saving...", app.spinner_char()),
            Style::default().fg(Color::Yellow),
        )
    } else if dialog.can_save() {
        let style = if focused {
            Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        };
        (" [Enter] Save ".to_string(), style)
    } else {
        (" Save ".to_string(), Style::default().fg(Color::DarkGray))
    };

    let save_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[4])[1];
    let button_border = if focused { Color::Cyan } else { Color::DarkGray };
    let save = Paragraph::new(label)
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(button_border)));
    f.render_widget(save, save_area);
}

fn draw_field(
    f: &mut Frame,
    area: Rect,
    label: &str,
    value: Option<&str>,
    placeholder: &str,
    focused: bool,
    enabled: bool,
) {
    let border = match (enabled, focused) {
        (false, _) => Color::Rgb(60, 60, 60),
        (true, true) => Color::Cyan,
        (true, false) => Color::Gray,
    };
    let text = match value {
        Some(v) => Line::from(Span::styled(v.to_string(), Style::default().fg(Color::White))),
        None => Line::from(Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray))),
    };
    let block = Block::default()
        .title(format!(" {label}: "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    f.render_widget(Paragraph::new(text).block(block), area);
}
