//! Selection, sorting and pagination state for the work item table.

use crate::azure::{WorkItem, WorkItemId};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Page sizes offered by the page size picker
pub const PAGE_SIZE_OPTIONS: [usize; 6] = [10, 20, 30, 50, 70, 100];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Upper bound on work items in one import
pub const MAX_IMPORT_ITEMS: usize = 50;

/// Shown for any missing field
pub const PLACEHOLDER: &str = "--/--";

pub const DESCRIPTION_MAX_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Tri-state of the header checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheck {
    Unchecked,
    Indeterminate,
    Checked,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

/// Result of pressing Import
#[derive(Debug, Clone, PartialEq)]
pub enum ImportCheck {
    NothingSelected,
    TooMany(usize),
    Ready(Vec<WorkItemId>),
}

/// Ids chosen for import. Membership is a set; insertion order is kept so
/// the request lists ids in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    order: Vec<WorkItemId>,
    members: HashSet<WorkItemId>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &WorkItemId) -> bool {
        self.members.contains(id)
    }

    /// Add the id if absent, remove it if present
    pub fn toggle(&mut self, id: &WorkItemId) {
        if self.members.remove(id) {
            self.order.retain(|x| x != id);
        } else {
            self.members.insert(id.clone());
            self.order.push(id.clone());
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    pub fn replace_with<'a>(&mut self, ids: impl IntoIterator<Item = &'a WorkItemId>) {
        self.clear();
        for id in ids {
            if self.members.insert(id.clone()) {
                self.order.push(id.clone());
            }
        }
    }

    /// Drop ids that are no longer loaded
    pub fn retain_loaded(&mut self, loaded: &HashSet<&WorkItemId>) {
        self.order.retain(|id| loaded.contains(id));
        self.members.retain(|id| loaded.contains(id));
    }

    pub fn ids(&self) -> &[WorkItemId] {
        &self.order
    }
}

/// State behind the work item table: data, selection, sort and page
#[derive(Debug, Clone)]
pub struct WorkItemTable {
    pub items: Vec<WorkItem>,
    pub selection: Selection,
    pub load_state: LoadState,
    pub sort_by: Option<SortField>,
    pub order: SortOrder,
    pub page: usize,
    pub page_size: usize,
    /// Highlighted row, relative to the visible page
    pub cursor: usize,
    /// Distinct ids among `items`; the backend may repeat an id
    distinct_ids: usize,
}

impl Default for WorkItemTable {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl WorkItemTable {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            selection: Selection::default(),
            load_state: LoadState::Loading,
            sort_by: None,
            order: SortOrder::Asc,
            page: 0,
            page_size: snap_page_size(page_size),
            cursor: 0,
            distinct_ids: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    /// Start of a mount: data is pending again
    pub fn begin_load(&mut self) {
        self.load_state = LoadState::Loading;
    }

    /// Replace the working data set with freshly loaded items
    pub fn set_items(&mut self, items: Vec<WorkItem>) {
        self.items = items;
        self.load_state = LoadState::Loaded;
        let loaded: HashSet<&WorkItemId> = self.items.iter().map(|i| &i.id).collect();
        self.distinct_ids = loaded.len();
        self.selection.retain_loaded(&loaded);
        self.sort_by = None;
        self.order = SortOrder::Asc;
        self.page = 0;
        self.cursor = 0;
    }

    /// Loading failed: keep the table empty and remember why
    pub fn set_failed(&mut self, message: impl Into<String>) {
        self.items.clear();
        self.distinct_ids = 0;
        self.selection.clear();
        self.load_state = LoadState::Failed(message.into());
        self.page = 0;
        self.cursor = 0;
    }

    // Sorting

    /// Sort by created date. Ascending unless already ascending by date.
    /// Undated rows always go last. Resets to the first page.
    pub fn toggle_sort(&mut self, field: SortField) {
        let descending = self.sort_by == Some(field) && self.order == SortOrder::Asc;
        match field {
            SortField::CreatedDate => {
                self.items.sort_by(|a, b| compare_dates(a, b, descending));
            }
        }
        self.order = if descending { SortOrder::Desc } else { SortOrder::Asc };
        self.sort_by = Some(field);
        self.page = 0;
        self.cursor = 0;
    }

    // Pagination

    pub fn page_count(&self) -> usize {
        self.items.len().div_ceil(self.page_size).max(1)
    }

    pub fn visible_rows(&self) -> &[WorkItem] {
        let start = (self.page * self.page_size).min(self.items.len());
        let end = (start + self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    /// Row range shown on the current page, 1-based, for the footer
    pub fn visible_range(&self) -> (usize, usize) {
        let rows = self.visible_rows().len();
        if rows == 0 {
            return (0, 0);
        }
        let start = self.page * self.page_size;
        (start + 1, start + rows)
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = snap_page_size(size);
        self.page = 0;
        self.cursor = 0;
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            self.cursor = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.cursor = 0;
        }
    }

    // Cursor

    pub fn cursor_down(&mut self) {
        let rows = self.visible_rows().len();
        if rows > 0 {
            self.cursor = (self.cursor + 1) % rows;
        }
    }

    pub fn cursor_up(&mut self) {
        let rows = self.visible_rows().len();
        if rows > 0 {
            self.cursor = if self.cursor == 0 { rows - 1 } else { self.cursor - 1 };
        }
    }

    pub fn cursor_item(&self) -> Option<&WorkItem> {
        self.visible_rows().get(self.cursor)
    }

    // Selection

    pub fn toggle_row(&mut self, id: &WorkItemId) {
        self.selection.toggle(id);
    }

    pub fn toggle_cursor_row(&mut self) {
        if let Some(id) = self.cursor_item().map(|i| i.id.clone()) {
            self.toggle_row(&id);
        }
    }

    /// Select every loaded item, across all pages
    pub fn select_all(&mut self) {
        self.selection.replace_with(self.items.iter().map(|i| &i.id));
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    /// Header checkbox click: clears when fully checked, otherwise selects all
    pub fn toggle_all(&mut self) {
        if self.header_check() == HeaderCheck::Checked {
            self.deselect_all();
        } else {
            self.select_all();
        }
    }

    pub fn is_selected(&self, id: &WorkItemId) -> bool {
        self.selection.contains(id)
    }

    pub fn header_check(&self) -> HeaderCheck {
        let selected = self.selection.len();
        let total = self.distinct_ids;
        if total > 0 && selected == total {
            HeaderCheck::Checked
        } else if selected > 0 && selected < total {
            HeaderCheck::Indeterminate
        } else {
            HeaderCheck::Unchecked
        }
    }

    pub fn can_import(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn check_import(&self) -> ImportCheck {
        match self.selection.len() {
            0 => ImportCheck::NothingSelected,
            n if n > MAX_IMPORT_ITEMS => ImportCheck::TooMany(n),
            _ => ImportCheck::Ready(self.selection.ids().to_vec()),
        }
    }
}

/// Nearest allowed page size at or above `size` (largest option if beyond)
pub fn snap_page_size(size: usize) -> usize {
    PAGE_SIZE_OPTIONS
        .iter()
        .copied()
        .find(|&opt| opt >= size)
        .unwrap_or(PAGE_SIZE_OPTIONS[PAGE_SIZE_OPTIONS.len() - 1])
}

fn compare_dates(a: &WorkItem, b: &WorkItem, descending: bool) -> Ordering {
    match (a.created_millis(), b.created_millis()) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// Cell formatting

/// First 60 characters plus `...` when longer; placeholder when absent
pub fn format_description(description: Option<&str>) -> String {
    match description {
        None | Some("") => PLACEHOLDER.to_string(),
        Some(text) if text.chars().count() <= DESCRIPTION_MAX_CHARS => text.to_string(),
        Some(text) => {
            let head: String = text.chars().take(DESCRIPTION_MAX_CHARS).collect();
            format!("{head}...")
        }
    }
}

pub fn format_text(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Long date such as `January 5, 2024`
pub fn format_date(item: &WorkItem) -> String {
    item.created_at()
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(id: i64, created: Option<&str>) -> WorkItem {
        WorkItem {
            id: WorkItemId::Number(id),
            title: Some(format!("Item {id}")),
            description: None,
            created_date: created.map(|s| s.to_string()),
        }
    }

    fn make_table(count: i64) -> WorkItemTable {
        let mut table = WorkItemTable::default();
        table.set_items(
            (1..=count)
                .map(|i| make_item(i, Some(&format!("2024-01-{:02}T00:00:00Z", (i % 28) + 1))))
                .collect(),
        );
        table
    }

    fn ids(table: &WorkItemTable) -> Vec<i64> {
        table
            .items
            .iter()
            .map(|i| match &i.id {
                WorkItemId::Number(n) => *n,
                WorkItemId::Text(_) => -1,
            })
            .collect()
    }

    #[test]
    fn test_select_all_covers_every_page() {
        let mut table = make_table(35);
        assert_eq!(table.visible_rows().len(), 10);

        table.select_all();
        assert_eq!(table.selection.len(), 35, "select all is global, not page-local");
        assert_eq!(table.header_check(), HeaderCheck::Checked);

        // Rows on a later page are selected too
        table.next_page();
        table.next_page();
        table.next_page();
        assert!(table.visible_rows().iter().all(|r| table.is_selected(&r.id)));

        table.deselect_all();
        assert!(table.selection.is_empty());
        assert_eq!(table.header_check(), HeaderCheck::Unchecked);
    }

    #[test]
    fn test_toggle_all_from_partial_selects_all() {
        let mut table = make_table(5);
        table.toggle_row(&WorkItemId::Number(2));
        assert_eq!(table.header_check(), HeaderCheck::Indeterminate);

        table.toggle_all();
        assert_eq!(table.selection.len(), 5);

        table.toggle_all();
        assert!(table.selection.is_empty());
    }

    #[test]
    fn test_toggle_row_twice_restores_selection() {
        let mut table = make_table(5);
        table.toggle_row(&WorkItemId::Number(1));
        table.toggle_row(&WorkItemId::Number(3));
        let before = table.selection.clone();

        table.toggle_row(&WorkItemId::Number(4));
        table.toggle_row(&WorkItemId::Number(4));
        assert_eq!(table.selection, before);

        table.toggle_row(&WorkItemId::Number(1));
        table.toggle_row(&WorkItemId::Number(1));
        assert!(table.is_selected(&WorkItemId::Number(1)));
        assert_eq!(table.selection.len(), 2);
    }

    #[test]
    fn test_toggle_all_with_repeated_ids() {
        let mut table = WorkItemTable::default();
        table.set_items(vec![make_item(1, None), make_item(1, None), make_item(2, None)]);

        table.toggle_all();
        assert_eq!(table.selection.len(), 2);
        assert_eq!(table.header_check(), HeaderCheck::Checked);

        table.toggle_all();
        assert!(table.selection.is_empty());
        assert_eq!(table.header_check(), HeaderCheck::Unchecked);

        table.toggle_row(&WorkItemId::Number(1));
        assert_eq!(table.header_check(), HeaderCheck::Indeterminate);
    }

    #[test]
    fn test_header_check_empty_data() {
        let table = make_table(0);
        assert_eq!(table.header_check(), HeaderCheck::Unchecked);
        assert!(!table.can_import());
        assert_eq!(table.check_import(), ImportCheck::NothingSelected);
    }

    #[test]
    fn test_sort_toggles_direction() {
        let mut table = WorkItemTable::default();
        table.set_items(vec![
            make_item(1, Some("2024-03-01T00:00:00Z")),
            make_item(2, Some("2024-01-01T00:00:00Z")),
            make_item(3, Some("2024-02-01T00:00:00Z")),
        ]);

        table.toggle_sort(SortField::CreatedDate);
        assert_eq!(table.order, SortOrder::Asc);
        assert_eq!(ids(&table), vec![2, 3, 1]);

        table.toggle_sort(SortField::CreatedDate);
        assert_eq!(table.order, SortOrder::Desc);
        assert_eq!(ids(&table), vec![1, 3, 2]);

        table.toggle_sort(SortField::CreatedDate);
        assert_eq!(table.order, SortOrder::Asc);
        assert_eq!(ids(&table), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_resets_page() {
        let mut table = make_table(25);
        table.next_page();
        table.cursor_down();
        assert_eq!(table.page, 1);

        table.toggle_sort(SortField::CreatedDate);
        assert_eq!(table.page, 0);
        assert_eq!(table.cursor, 0);
    }

    #[test]
    fn test_undated_rows_sort_last_both_ways() {
        let mut table = WorkItemTable::default();
        table.set_items(vec![
            make_item(1, Some("garbage")),
            make_item(2, Some("2024-05-01")),
            make_item(3, None),
            make_item(4, Some("2023-05-01")),
        ]);

        table.toggle_sort(SortField::CreatedDate);
        assert_eq!(ids(&table), vec![4, 2, 1, 3]);

        table.toggle_sort(SortField::CreatedDate);
        assert_eq!(ids(&table), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut table = make_table(45);
        table.next_page();
        table.next_page();
        assert_eq!(table.page, 2);

        table.set_page_size(20);
        assert_eq!(table.page, 0);
        assert_eq!(table.page_size, 20);
        assert_eq!(table.visible_rows().len(), 20);
    }

    #[test]
    fn test_last_page_row_count() {
        for (count, size, last) in [(45, 10, 5), (40, 10, 10), (45, 20, 5), (7, 30, 7), (100, 50, 50)] {
            let mut table = make_table(count);
            table.set_page_size(size);
            while table.page + 1 < table.page_count() {
                assert_eq!(table.visible_rows().len(), size);
                table.next_page();
            }
            assert_eq!(table.visible_rows().len(), last, "{count} rows at {size} per page");
        }
    }

    #[test]
    fn test_page_navigation_is_clamped() {
        let mut table = make_table(15);
        table.prev_page();
        assert_eq!(table.page, 0);
        table.next_page();
        table.next_page();
        assert_eq!(table.page, 1);
        assert_eq!(table.visible_range(), (11, 15));
    }

    #[test]
    fn test_snap_page_size() {
        assert_eq!(snap_page_size(10), 10);
        assert_eq!(snap_page_size(11), 20);
        assert_eq!(snap_page_size(0), 10);
        assert_eq!(snap_page_size(500), 100);
    }

    #[test]
    fn test_import_limit() {
        let mut table = make_table(60);
        for id in 1..=51 {
            table.toggle_row(&WorkItemId::Number(id));
        }
        assert_eq!(table.check_import(), ImportCheck::TooMany(51));

        table.toggle_row(&WorkItemId::Number(51));
        match table.check_import() {
            ImportCheck::Ready(ids) => {
                assert_eq!(ids.len(), 50);
                assert_eq!(ids[0], WorkItemId::Number(1));
            }
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn test_reload_prunes_vanished_selection() {
        let mut table = make_table(5);
        table.toggle_row(&WorkItemId::Number(2));
        table.toggle_row(&WorkItemId::Number(5));

        table.set_items(vec![make_item(2, None), make_item(3, None)]);
        assert_eq!(table.selection.ids(), &[WorkItemId::Number(2)]);
    }

    #[test]
    fn test_failed_load_is_empty() {
        let mut table = make_table(5);
        table.select_all();
        table.set_failed("boom");
        assert!(table.items.is_empty());
        assert!(table.selection.is_empty());
        assert_eq!(table.load_state, LoadState::Failed("boom".into()));
    }

    #[test]
    fn test_cursor_wraps_within_page() {
        let mut table = make_table(3);
        table.cursor_up();
        assert_eq!(table.cursor, 2);
        table.cursor_down();
        assert_eq!(table.cursor, 0);
        table.toggle_cursor_row();
        assert!(table.is_selected(&WorkItemId::Number(1)));
    }

    #[test]
    fn test_format_description() {
        assert_eq!(format_description(None), PLACEHOLDER);
        assert_eq!(format_description(Some("")), PLACEHOLDER);
        assert_eq!(format_description(Some("short")), "short");

        let exact = "x".repeat(60);
        assert_eq!(format_description(Some(&exact)), exact);

        let long = "é".repeat(61);
        let formatted = format_description(Some(&long));
        assert_eq!(formatted, format!("{}...", "é".repeat(60)));
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&make_item(1, Some("2024-01-05T12:00:00Z"))), "January 5, 2024");
        assert_eq!(format_date(&make_item(1, Some("nope"))), PLACEHOLDER);
        assert_eq!(format_date(&make_item(1, None)), PLACEHOLDER);
    }

    #[test]
    fn test_format_text() {
        assert_eq!(format_text(Some("Title")), "Title");
        assert_eq!(format_text(Some("")), PLACEHOLDER);
        assert_eq!(format_text(None), PLACEHOLDER);
    }
}
