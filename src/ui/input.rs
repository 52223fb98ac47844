use crate::app::App;
use crate::table::PAGE_SIZE_OPTIONS;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};

const NO_DATA: &str = "No data...";

pub fn draw_page_size_dropdown(f: &mut Frame, app: &mut App, area: Rect) {
    let current = app.table.page_size;
    let items: Vec<ListItem> = PAGE_SIZE_OPTIONS
        .iter()
        .map(|&size| {
            let marker = if size == current { "● " } else { "  " };
            ListItem::new(format!("{marker}{size}"))
        })
        .collect();

    let height = (items.len() + 2) as u16;
    let inner = super::centered_rect(24, height, area);
    f.render_widget(Clear, inner);

    let block = Block::default().borders(Borders::ALL).title(" Rows per page ");
    let list = List::new(items).block(block).highlight_style(
        Style::default().bg(app.config.theme.parse_color(&app.config.theme.selected_bg)),
    );

    f.render_stateful_widget(list, inner, &mut app.dropdown_list_state);
}

pub fn draw_project_dropdown(f: &mut Frame, app: &mut App, area: Rect) {
    let projects = app.filtered_projects();
    let filter_input = app.filter_input.clone();
    draw_searchable_dropdown(f, app, area, " Project ", projects, &filter_input);
}

pub fn draw_requirement_dropdown(f: &mut Frame, app: &mut App, area: Rect) {
    let requirements = app.filtered_requirements();
    let filter_input = app.filter_input.clone();
    draw_searchable_dropdown(f, app, area, " Requirement ", requirements, &filter_input);
}

fn draw_searchable_dropdown(
    f: &mut Frame,
    app: &mut App,
    area: Rect,
    title: &str,
    names: Vec<String>,
    filter_input: &str,
) {
    let empty = names.is_empty();
    let items: Vec<ListItem> = if empty {
        vec![ListItem::new(NO_DATA).style(Style::default().fg(Color::DarkGray))]
    } else {
        names.into_iter().map(ListItem::new).collect()
    };

    // +3 for search input area
    let height = (items.len() + 5).min(18) as u16;
    let inner = super::centered_rect(45, height, area);
    f.render_widget(Clear, inner);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input
            Constraint::Min(0),    // List
        ])
        .split(inner);

    // Search input
    let search_block = Block::default().borders(Borders::ALL).title(title);
    let search_para = Paragraph::new(format!("🔍 {filter_input}")).block(search_block);
    f.render_widget(search_para, chunks[0]);

    // Show cursor
    f.set_cursor_position(Position::new(
        chunks[0].x + 4 + filter_input.chars().count() as u16,
        chunks[0].y + 1,
    ));

    let list_block = Block::default().borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM);
    let list = List::new(items).block(list_block);

    if empty {
        // Nothing pickable, so nothing highlighted
        f.render_widget(list, chunks[1]);
    } else {
        let list = list.highlight_style(
            Style::default().bg(app.config.theme.parse_color(&app.config.theme.selected_bg)),
        );
        f.render_stateful_widget(list, chunks[1], &mut app.dropdown_list_state);
    }
}
