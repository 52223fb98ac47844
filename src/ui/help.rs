use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

pub fn draw_popup(f: &mut Frame, app: &App, area: Rect) {
    let keys = &app.config.keybindings;
    let key = |c: char| if c == ' ' { "Space".to_string() } else { c.to_string() };

    let help_text = format!(
        r#"
NAVIGATION
  {down}/{up} ↑/↓       Move up/down
  {prev}/{next} ←/→       Previous/next page
  {size}             Rows per page

SELECTION
  {row:<13} Select/deselect row
  {all}             Select/deselect all (every page)
  {sort}             Sort by created date

ACTIONS
  {import}             Import selected (up to 50)
  {reload}             Reload work items
  {help}             Toggle help
  {quit}             Quit

IMPORT DIALOG
  Tab/Shift+Tab Move between fields
  Enter         Open picker / save
  Esc           Close (not while saving)
"#,
        down = key(keys.down),
        up = key(keys.up),
        prev = key(keys.prev_page),
        next = key(keys.next_page),
        size = key(keys.page_size),
        row = key(keys.toggle_row),
        all = key(keys.toggle_all),
        sort = key(keys.sort),
        import = key(keys.import),
        reload = key(keys.reload),
        help = key(keys.help),
        quit = key(keys.quit),
    );

    let height = (help_text.lines().count() as u16 + 2).min(area.height);
    let popup = super::centered_rect(52, height, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Help - Press ? or Esc to close ");

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, popup);
}
